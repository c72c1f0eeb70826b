use std::collections::HashSet;
use std::fs;
use std::path::Path;

use climo_import::models::history::station_info_headers;
use climo_import::models::{ClimateVariable, ClimatologyPeriod, HistoryId, HistoryRole, StationType};
use climo_import::processors::{ImportPipeline, Preflight};
use climo_import::store::{ClimoStore, MemoryStore};
use climo_import::utils::PathResolver;
use climo_import::ImportError;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Contributing years and joint ids for one period, or `None` for a period
/// without data (written as NaN cells).
type PeriodCells = Option<(Vec<i32>, [Option<HistoryId>; 3])>;

fn station_line(history_id: HistoryId, basin: Option<i32>, periods: &[PeriodCells; 3]) -> String {
    let mut cells = vec![
        history_id.to_string(),
        "49.25".to_string(),
        "-123.1".to_string(),
        "70.0".to_string(),
        basin.map(|b| b.to_string()).unwrap_or_else(|| "NaN".to_string()),
    ];
    for period in periods {
        match period {
            Some((years, joints)) => {
                cells.extend(years.iter().map(|y| y.to_string()));
                cells.extend(
                    joints
                        .iter()
                        .map(|j| j.map(|id| id.to_string()).unwrap_or_else(|| "NaN".to_string())),
                );
            }
            None => cells.extend(std::iter::repeat("NaN".to_string()).take(15)),
        }
    }
    cells.join(",")
}

fn write_station_info(paths: &PathResolver, variable: ClimateVariable, lines: &[String]) {
    let path = paths.station_info_path(variable);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut body = station_info_headers().join(",");
    body.push('\n');
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }
    fs::write(path, body).unwrap();
}

fn write_value_file(
    paths: &PathResolver,
    variable: ClimateVariable,
    period: ClimatologyPeriod,
    history_id: HistoryId,
) {
    let path = paths.value_file_path(variable, period, history_id);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut body = String::from("obs_time,datum\n");
    for month in 1..=12 {
        body.push_str(&format!(
            "{}-{:02}-15,{}.25\n",
            period.start_year(),
            month,
            month * 10
        ));
    }
    fs::write(path, body).unwrap();
}

fn full_years() -> Vec<i32> {
    vec![30; 12]
}

fn composite_fixture(root: &Path) -> PathResolver {
    let paths = PathResolver::new(root);
    let line = station_line(
        12345,
        Some(5),
        &[
            Some(((21..=32).collect(), [Some(101), Some(102), Some(103)])),
            None,
            None,
        ],
    );
    write_station_info(&paths, ClimateVariable::Precipitation, &[line]);
    write_value_file(
        &paths,
        ClimateVariable::Precipitation,
        ClimatologyPeriod::P1971To2000,
        12345,
    );
    paths
}

#[test]
fn test_composite_station_round_trip() {
    let dir = TempDir::new().unwrap();
    let paths = composite_fixture(dir.path());
    let mut store = MemoryStore::new();

    let report = ImportPipeline::new(paths)
        .with_variables(&[ClimateVariable::Precipitation])
        .run_all(&mut store, None)
        .unwrap();

    let tables = store.committed();
    assert_eq!(tables.periods.len(), 3);
    assert_eq!(tables.variables.len(), 4);
    assert_eq!(tables.stations.len(), 1);

    let station = &tables.stations[0];
    assert_eq!(station.station_type, StationType::Composite);
    assert_eq!(station.basin_id, Some(5));
    let period = tables.period(station.climo_period_id).unwrap();
    assert_eq!(period.period(), Some(ClimatologyPeriod::P1971To2000));

    let links: Vec<(HistoryId, HistoryRole)> = tables
        .links_for(station.id)
        .map(|l| (l.history_id, l.role))
        .collect();
    assert_eq!(
        links,
        vec![
            (12345, HistoryRole::Base),
            (101, HistoryRole::Joint),
            (102, HistoryRole::Joint),
            (103, HistoryRole::Joint),
        ]
    );

    let years: Vec<i32> = tables
        .values_for(station.id)
        .map(|v| v.value.num_contributing_years)
        .collect();
    assert_eq!(years, (21..=32).collect::<Vec<_>>());

    let ppt = tables
        .variables
        .iter()
        .find(|v| v.net_var_name == ClimateVariable::Precipitation.net_var_name())
        .unwrap();
    assert!(tables
        .values_for(station.id)
        .all(|v| v.value.climo_variable_id == ppt.id));

    assert_eq!(report.total_stations(), 1);
    assert_eq!(report.total_values(), 12);
    assert_eq!(report.variables[0].composite_stations, 1);
    assert_eq!(report.variables[0].joint_links, 3);
    assert!(!store.has_uncommitted_changes());
}

#[test]
fn test_long_record_station_in_every_period() {
    let dir = TempDir::new().unwrap();
    let paths = PathResolver::new(dir.path());
    let full = Some((full_years(), [None, None, None]));
    write_station_info(
        &paths,
        ClimateVariable::MaxTemperature,
        &[station_line(777, None, &[full.clone(), full.clone(), full])],
    );
    for period in ClimatologyPeriod::ALL {
        write_value_file(&paths, ClimateVariable::MaxTemperature, period, 777);
    }

    let mut store = MemoryStore::new();
    let report = ImportPipeline::new(paths)
        .with_variables(&[ClimateVariable::MaxTemperature])
        .run_all(&mut store, None)
        .unwrap();

    let tables = store.committed();
    assert_eq!(tables.stations.len(), 3);
    assert!(tables
        .stations
        .iter()
        .all(|s| s.station_type == StationType::LongRecord && s.basin_id.is_none()));
    assert!(tables
        .station_histories
        .iter()
        .all(|l| l.role == HistoryRole::Base && l.history_id == 777));
    assert_eq!(tables.station_histories.len(), 3);
    assert_eq!(tables.values.len(), 36);
    assert_eq!(report.variables[0].stations_per_period, [1, 1, 1]);
    assert_eq!(report.variables[0].long_record_stations, 3);
}

#[test]
fn test_line_without_any_period_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let paths = PathResolver::new(dir.path());
    let mut partial = full_years();
    partial[6] = 0;
    // A single absent month makes the whole period absent.
    let gap = station_line(2, None, &[Some((full_years(), [None; 3])), None, None]);
    let mut cells: Vec<&str> = gap.split(',').collect();
    cells[5 + 3] = "NaN";
    let lines = vec![
        cells.join(","),
        station_line(1, None, &[None, None, Some((partial, [None; 3]))]),
    ];
    write_station_info(&paths, ClimateVariable::MinTemperature, &lines);
    write_value_file(
        &paths,
        ClimateVariable::MinTemperature,
        ClimatologyPeriod::P1991To2020,
        1,
    );

    let mut store = MemoryStore::new();
    let report = ImportPipeline::new(paths)
        .with_variables(&[ClimateVariable::MinTemperature])
        .run_all(&mut store, None)
        .unwrap();

    assert_eq!(report.variables[0].history_lines, 2);
    assert_eq!(report.variables[0].stations_per_period, [0, 0, 1]);
    let tables = store.committed();
    assert_eq!(tables.stations.len(), 1);
    let zero_month = tables.values_for(tables.stations[0].id).nth(6).unwrap();
    assert_eq!(zero_month.value.num_contributing_years, 0);
}

#[test]
fn test_missing_value_file_rolls_back_everything() {
    let dir = TempDir::new().unwrap();
    let paths = composite_fixture(dir.path());
    let second = station_line(999, None, &[Some((full_years(), [None; 3])), None, None]);
    let first = station_line(
        12345,
        Some(5),
        &[
            Some(((21..=32).collect(), [Some(101), Some(102), Some(103)])),
            None,
            None,
        ],
    );
    write_station_info(&paths, ClimateVariable::Precipitation, &[first, second]);

    let mut store = MemoryStore::new();
    let err = ImportPipeline::new(paths)
        .with_variables(&[ClimateVariable::Precipitation])
        .run_all(&mut store, None)
        .unwrap_err();

    assert!(matches!(err, ImportError::FileNotFound { .. }));
    assert!(store.tables().periods.is_empty());
    assert!(store.tables().stations.is_empty());
    assert!(store.tables().values.is_empty());
    assert!(!store.has_uncommitted_changes());
}

#[test]
fn test_malformed_station_line_aborts_import() {
    let dir = TempDir::new().unwrap();
    let paths = PathResolver::new(dir.path());
    let line = station_line(5, None, &[None, None, None]).replacen("49.25", "north", 1);
    write_station_info(&paths, ClimateVariable::Precipitation, &[line]);

    let mut store = MemoryStore::new();
    let err = ImportPipeline::new(paths)
        .with_variables(&[ClimateVariable::Precipitation])
        .run_all(&mut store, None)
        .unwrap_err();

    match err {
        ImportError::MalformedRecord { field, value, .. } => {
            assert_eq!(field, "lat");
            assert_eq!(value, "north");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(store.committed().periods.is_empty());
}

#[test]
fn test_rerun_reuses_reference_rows() {
    let dir = TempDir::new().unwrap();
    let paths = composite_fixture(dir.path());
    let pipeline = ImportPipeline::new(paths).with_variables(&[ClimateVariable::Precipitation]);
    let mut store = MemoryStore::new();

    pipeline.run_all(&mut store, None).unwrap();
    pipeline.run_all(&mut store, None).unwrap();

    let tables = store.committed();
    assert_eq!(tables.periods.len(), 3);
    assert_eq!(tables.variables.len(), 4);
    assert_eq!(tables.stations.len(), 2);
    assert_eq!(tables.values.len(), 24);
}

#[test]
fn test_snapshot_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let paths = composite_fixture(&dir.path().join("data"));
    let store_path = dir.path().join("store").join("climo.json");

    let mut store = MemoryStore::open(&store_path).unwrap();
    ImportPipeline::new(paths)
        .with_variables(&[ClimateVariable::Precipitation])
        .run_all(&mut store, None)
        .unwrap();
    assert!(store_path.exists());

    let reopened = MemoryStore::open(&store_path).unwrap();
    let summary = reopened.committed().summary();
    assert_eq!(summary.stations, 1);
    assert_eq!(summary.composite_stations, 1);
    assert_eq!(summary.base_links, 1);
    assert_eq!(summary.joint_links, 3);
    assert_eq!(summary.values, 12);
    assert_eq!(reopened.count_values(1).unwrap(), 12);
}

#[test]
fn test_failed_import_leaves_snapshot_untouched() {
    let dir = TempDir::new().unwrap();
    let paths = composite_fixture(&dir.path().join("data"));
    let store_path = dir.path().join("climo.json");

    let mut store = MemoryStore::open(&store_path).unwrap();
    let err = ImportPipeline::new(paths)
        .run_all(&mut store, None)
        .unwrap_err();

    assert!(matches!(err, ImportError::FileNotFound { .. }));
    assert!(!store_path.exists());
}

#[test]
fn test_non_finite_datum_keeps_snapshot_readable() {
    let dir = TempDir::new().unwrap();
    let paths = composite_fixture(&dir.path().join("data"));
    let store_path = dir.path().join("climo.json");
    let pipeline =
        ImportPipeline::new(paths.clone()).with_variables(&[ClimateVariable::Precipitation]);

    let mut store = MemoryStore::open(&store_path).unwrap();
    pipeline.run_all(&mut store, None).unwrap();

    let value_file = paths.value_file_path(
        ClimateVariable::Precipitation,
        ClimatologyPeriod::P1971To2000,
        12345,
    );
    let body = fs::read_to_string(&value_file).unwrap();
    fs::write(&value_file, body.replacen("10.25", "inf", 1)).unwrap();

    let err = pipeline.run_all(&mut store, None).unwrap_err();
    match err {
        ImportError::MalformedRecord { field, value, .. } => {
            assert_eq!(field, "datum");
            assert_eq!(value, "inf");
        }
        other => panic!("unexpected error: {}", other),
    }

    let reopened = MemoryStore::open(&store_path).unwrap();
    assert_eq!(reopened.committed().stations.len(), 1);
    assert_eq!(reopened.committed().values.len(), 12);
}

#[test]
fn test_variable_subset_skips_other_files() {
    let dir = TempDir::new().unwrap();
    let paths = composite_fixture(dir.path());

    let pipeline =
        ImportPipeline::new(paths.clone()).with_variables(&[ClimateVariable::Precipitation]);
    assert_eq!(pipeline.variables(), &[ClimateVariable::Precipitation]);
    assert!(pipeline.run_all(&mut MemoryStore::new(), None).is_ok());

    let everything = ImportPipeline::new(paths);
    assert_eq!(everything.variables(), &ClimateVariable::ALL);
    assert!(everything.run_all(&mut MemoryStore::new(), None).is_err());
}

#[test]
fn test_history_catalog_rejects_unknown_joint() {
    let dir = TempDir::new().unwrap();
    let paths = composite_fixture(dir.path());
    let catalog: HashSet<HistoryId> = [12345, 101, 102].into_iter().collect();
    let mut store = MemoryStore::new().with_history_catalog(catalog);

    let err = ImportPipeline::new(paths)
        .with_variables(&[ClimateVariable::Precipitation])
        .run_all(&mut store, None)
        .unwrap_err();

    assert!(err.is_reference_error());
    assert!(store.tables().stations.is_empty());
}

#[test]
fn test_preflight_collects_missing_files() {
    let dir = TempDir::new().unwrap();
    let paths = PathResolver::new(dir.path());
    let full = Some((full_years(), [None; 3]));
    write_station_info(
        &paths,
        ClimateVariable::Precipitation,
        &[
            station_line(1, None, &[full.clone(), None, None]),
            station_line(2, None, &[None, full.clone(), full]),
        ],
    );
    write_value_file(&paths, ClimateVariable::Precipitation, ClimatologyPeriod::P1971To2000, 1);
    write_value_file(&paths, ClimateVariable::Precipitation, ClimatologyPeriod::P1981To2010, 2);

    let report = Preflight::new(paths, 2)
        .check(&[ClimateVariable::Precipitation, ClimateVariable::MaxTemperature], None)
        .unwrap();

    assert_eq!(report.history_lines, 2);
    assert_eq!(report.value_files_checked, 3);
    assert!(!report.is_clean());

    let mut located: Vec<(ClimateVariable, Option<HistoryId>, Option<ClimatologyPeriod>)> = report
        .issues
        .iter()
        .map(|i| (i.variable, i.history_id, i.period))
        .collect();
    located.sort_by_key(|(v, h, _)| (v.token(), *h));
    assert_eq!(
        located,
        vec![
            (ClimateVariable::Precipitation, Some(2), Some(ClimatologyPeriod::P1991To2020)),
            (ClimateVariable::MaxTemperature, None, None),
        ]
    );
}
