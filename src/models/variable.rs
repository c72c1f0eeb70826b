use serde::{Deserialize, Serialize};

use crate::models::RowId;

/// Imported climate variables, identified in file names by a short token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimateVariable {
    Precipitation,
    MaxTemperature,
    MinTemperature,
}

impl ClimateVariable {
    /// Import order.
    pub const ALL: [ClimateVariable; 3] = [
        ClimateVariable::Precipitation,
        ClimateVariable::MaxTemperature,
        ClimateVariable::MinTemperature,
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ppt" => Some(ClimateVariable::Precipitation),
            "tmax" => Some(ClimateVariable::MaxTemperature),
            "tmin" => Some(ClimateVariable::MinTemperature),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            ClimateVariable::Precipitation => "ppt",
            ClimateVariable::MaxTemperature => "tmax",
            ClimateVariable::MinTemperature => "tmin",
        }
    }

    /// Unique key of the stored variable row.
    pub fn net_var_name(&self) -> &'static str {
        match self {
            ClimateVariable::Precipitation => "Precip_Climatology",
            ClimateVariable::MaxTemperature => "Tx_Climatology",
            ClimateVariable::MinTemperature => "Tn_Climatology",
        }
    }
}

impl std::fmt::Display for ClimateVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl std::str::FromStr for ClimateVariable {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_token(s)
            .ok_or_else(|| format!("unknown variable '{}' (expected ppt, tmax or tmin)", s))
    }
}

/// Static description of a variable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableDefinition {
    pub duration: &'static str,
    pub unit: &'static str,
    pub standard_name: &'static str,
    pub display_name: &'static str,
    pub short_name: &'static str,
    pub cell_methods: &'static str,
    pub net_var_name: &'static str,
}

/// The full variable set. The mean temperature entry is never imported
/// but is registered so legacy climatologies can refer to it.
pub const VARIABLE_DEFINITIONS: [VariableDefinition; 4] = [
    VariableDefinition {
        duration: "monthly",
        unit: "mm",
        standard_name: "lwe_thickness_of_precipitation_amount",
        display_name: "Precipitation Climatology",
        short_name: "lwe_thickness_of_precipitation_amount t: sum within months t: mean over years",
        cell_methods: "t: sum within months t: mean over years",
        net_var_name: "Precip_Climatology",
    },
    VariableDefinition {
        duration: "monthly",
        unit: "celsius",
        standard_name: "air_temperature",
        display_name: "Temperature Climatology (Max.)",
        short_name: "air_temperature t: maximum within days t: mean within months t: mean over years",
        cell_methods: "t: maximum within days t: mean within months t: mean over years",
        net_var_name: "Tx_Climatology",
    },
    VariableDefinition {
        duration: "monthly",
        unit: "celsius",
        standard_name: "air_temperature",
        display_name: "Temperature Climatology (Min.)",
        short_name: "air_temperature t: minimum within days t: mean within months t: mean over years",
        cell_methods: "t: minimum within days t: mean within months t: mean over years",
        net_var_name: "Tn_Climatology",
    },
    VariableDefinition {
        duration: "monthly",
        unit: "celsius",
        standard_name: "air_temperature",
        display_name: "Temperature Climatology (Mean)",
        short_name: "air_temperature t: mean within days t: mean within months t: mean over years",
        cell_methods: "t: mean within days t: mean within months t: mean over years",
        net_var_name: "T_mean_Climatology",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRow {
    pub id: RowId,
    pub duration: String,
    pub unit: String,
    pub standard_name: String,
    pub display_name: String,
    pub short_name: String,
    pub cell_methods: String,
    pub net_var_name: String,
}

impl VariableRow {
    pub fn from_definition(id: RowId, def: &VariableDefinition) -> Self {
        Self {
            id,
            duration: def.duration.to_string(),
            unit: def.unit.to_string(),
            standard_name: def.standard_name.to_string(),
            display_name: def.display_name.to_string(),
            short_name: def.short_name.to_string(),
            cell_methods: def.cell_methods.to_string(),
            net_var_name: def.net_var_name.to_string(),
        }
    }
}
