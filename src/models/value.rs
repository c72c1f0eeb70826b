use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ImportError, Result};
use crate::models::history::is_sentinel;

/// One row of a monthly value file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    /// Kept verbatim, not checked against a calendar.
    pub obs_time: String,
    pub datum: f64,
}

impl ValueRecord {
    pub fn new(obs_time: impl Into<String>, datum: f64) -> Self {
        Self {
            obs_time: obs_time.into(),
            datum,
        }
    }

    pub fn from_fields(fields: &HashMap<String, String>, line: u64) -> Result<Self> {
        let obs_time = fields
            .get("obs_time")
            .ok_or_else(|| ImportError::malformed(line, "obs_time", "", "missing column"))?;
        if obs_time.is_empty() {
            return Err(ImportError::malformed(
                line,
                "obs_time",
                obs_time,
                "required value is empty",
            ));
        }

        let raw = fields
            .get("datum")
            .ok_or_else(|| ImportError::malformed(line, "datum", "", "missing column"))?;
        // f64 parsing accepts "NaN", so sentinels are rejected before parsing.
        if is_sentinel(raw) {
            return Err(ImportError::malformed(line, "datum", raw, "datum may not be absent"));
        }
        let datum = raw
            .parse::<f64>()
            .map_err(|e| ImportError::malformed(line, "datum", raw, e.to_string()))?;
        // Non-finite values cannot be written to the JSON snapshot.
        if !datum.is_finite() {
            return Err(ImportError::malformed(line, "datum", raw, "datum is not finite"));
        }

        Ok(Self::new(obs_time.clone(), datum))
    }
}
