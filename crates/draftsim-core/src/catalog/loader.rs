// Catalog loading from CSV files.
//
// The prospects file carries one row per player with the reference draft slot
// and ranking columns. Profiles and college statistics are optional side
// files keyed by `player_id` whose remaining columns are kept as free-form
// attributes.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use super::{Attributes, Catalog, DraftPosition, Player, PlayerId, Position};
use crate::error::CatalogError;

/// Locations of the catalog data files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogPaths {
    pub prospects: PathBuf,
    #[serde(default)]
    pub profiles: Option<PathBuf>,
    #[serde(default)]
    pub college_stats: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Raw CSV rows
// ---------------------------------------------------------------------------

/// One prospects row. Numeric columns are read as floats because the source
/// data is exported from a dataframe and may contain `12.0`, `NaN` or blanks.
#[derive(Debug, Deserialize)]
struct RawProspect {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    player_id: Option<f64>,
    #[serde(default)]
    player_name: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    year: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    overall: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    round: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pick: Option<f64>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    ovr_rk: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pos_rk: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    height: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    weight: Option<f64>,
    #[serde(default)]
    school: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A non-negative whole number, or None.
fn whole(value: Option<f64>) -> Option<u64> {
    value
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as u64)
}

fn whole_u32(value: Option<f64>) -> Option<u32> {
    whole(value).and_then(|v| u32::try_from(v).ok())
}

fn rank(value: Option<f64>) -> Option<u32> {
    value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u32)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Convert one free-form CSV cell into a JSON-safe value.
fn cell_value(raw: &str) -> serde_json::Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return serde_json::Value::Null;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => serde_json::Number::from_f64(v)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Ok(_) => serde_json::Value::Null,
        Err(_) => serde_json::Value::String(trimmed.to_string()),
    }
}

fn convert_prospect(raw: RawProspect) -> Option<Player> {
    let Some(id) = whole(raw.player_id) else {
        warn!("skipping prospect row without a valid player_id");
        return None;
    };
    let Some(year) = whole(raw.year).and_then(|y| u16::try_from(y).ok()) else {
        warn!("skipping player {id}: missing or invalid year");
        return None;
    };

    let drafted = match (whole_u32(raw.overall), whole_u32(raw.round), whole_u32(raw.pick)) {
        (Some(overall), Some(round), Some(pick)) if overall > 0 => Some(DraftPosition {
            overall,
            round,
            pick,
        }),
        (Some(overall), _, _) => {
            warn!("player {id}: overall pick {overall} without round/pick, no slot assigned");
            None
        }
        _ => None,
    };

    Some(Player {
        id,
        name: non_blank(raw.player_name).unwrap_or_default(),
        year,
        team: non_blank(raw.team),
        position: raw.position.as_deref().and_then(Position::parse),
        drafted,
        overall_rank: rank(raw.ovr_rk),
        position_rank: rank(raw.pos_rk),
        height: raw.height.filter(|v| v.is_finite()),
        weight: raw.weight.filter(|v| v.is_finite()),
        school: non_blank(raw.school),
    })
}

// ---------------------------------------------------------------------------
// Reader-based loaders
// ---------------------------------------------------------------------------

fn load_prospects_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawProspect>() {
        match result {
            Ok(raw) => players.extend(convert_prospect(raw)),
            Err(e) => warn!("skipping malformed prospect row: {}", e),
        }
    }
    Ok(players)
}

fn load_attributes_from_reader<R: Read>(
    rdr: R,
) -> Result<HashMap<PlayerId, Attributes>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers = reader.headers()?.clone();
    let Some(id_col) = headers.iter().position(|h| h.trim() == "player_id") else {
        warn!("attribute file has no player_id column, ignoring it");
        return Ok(HashMap::new());
    };

    let mut records = HashMap::new();
    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping malformed attribute row: {}", e);
                continue;
            }
        };
        let Some(id) = whole(record.get(id_col).and_then(|s| s.trim().parse().ok())) else {
            warn!("skipping attribute row without a valid player_id");
            continue;
        };

        let attributes: Attributes = headers
            .iter()
            .zip(record.iter())
            .enumerate()
            .filter(|(col, _)| *col != id_col)
            .map(|(_, (name, value))| (name.trim().to_string(), cell_value(value)))
            .collect();

        if records.insert(id, attributes).is_some() {
            warn!("duplicate attribute row for player {}, using latest", id);
        }
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, CatalogError> {
    std::fs::File::open(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the prospects file.
pub fn load_prospects(path: &Path) -> Result<Vec<Player>, CatalogError> {
    load_prospects_from_reader(open(path)?).map_err(|e| CatalogError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load a profile or statistics file keyed by `player_id`.
pub fn load_attributes(path: &Path) -> Result<HashMap<PlayerId, Attributes>, CatalogError> {
    load_attributes_from_reader(open(path)?).map_err(|e| CatalogError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load and index the whole catalog.
pub fn load_catalog(paths: &CatalogPaths) -> Result<Catalog, CatalogError> {
    let players = load_prospects(&paths.prospects)?;
    if players.is_empty() {
        return Err(CatalogError::Validation(format!(
            "prospects file {} produced zero valid rows",
            paths.prospects.display()
        )));
    }
    info!("Loaded {} prospects from {}", players.len(), paths.prospects.display());

    let mut catalog = Catalog::from_players(players);

    if let Some(path) = &paths.profiles {
        let profiles = load_attributes(path)?;
        info!("Loaded {} profiles from {}", profiles.len(), path.display());
        catalog = catalog.with_profiles(profiles);
    }
    if let Some(path) = &paths.college_stats {
        let stats = load_attributes(path)?;
        info!("Loaded {} stat lines from {}", stats.len(), path.display());
        catalog = catalog.with_stats(stats);
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PROSPECTS: &str = "\
player_id,player_name,year,overall,round,pick,team,position,ovr_rk,pos_rk,height,weight,school
1,Trevor Lawrence,2021,1,1,1,Jaguars,QB,1,1,78,213,Clemson
2,Zach Wilson,2021,2.0,1.0,2.0,Jets,qb,5,2,74,214,BYU
3,Walk On,2021,,,,,WR,,,NaN,inf,
";

    #[test]
    fn prospects_parse_slots_and_ranks() {
        let players = load_prospects_from_reader(PROSPECTS.as_bytes()).unwrap();
        assert_eq!(players.len(), 3);

        let lawrence = &players[0];
        assert_eq!(lawrence.id, 1);
        assert_eq!(lawrence.year, 2021);
        assert_eq!(lawrence.team.as_deref(), Some("Jaguars"));
        assert_eq!(
            lawrence.drafted,
            Some(DraftPosition {
                overall: 1,
                round: 1,
                pick: 1
            })
        );
        assert_eq!(lawrence.overall_rank, Some(1));
        assert_eq!(lawrence.school.as_deref(), Some("Clemson"));

        let wilson = &players[1];
        assert_eq!(wilson.drafted.map(|d| d.overall), Some(2));
        assert_eq!(wilson.position.as_ref().map(Position::as_str), Some("QB"));
    }

    #[test]
    fn undrafted_row_has_no_slot_and_safe_floats() {
        let players = load_prospects_from_reader(PROSPECTS.as_bytes()).unwrap();
        let walk_on = &players[2];
        assert!(walk_on.drafted.is_none());
        assert!(walk_on.team.is_none());
        assert!(walk_on.overall_rank.is_none());
        assert!(walk_on.height.is_none());
        assert!(walk_on.weight.is_none());
        assert!(walk_on.school.is_none());
    }

    #[test]
    fn rows_without_id_or_year_are_skipped() {
        let csv_data = "\
player_id,player_name,year,overall,round,pick
,Nobody,2021,1,1,1
abc,Garbage,2021,2,1,2
5,No Year,,3,1,3
6,Kept,2021,4,1,4";
        let players = load_prospects_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, 6);
    }

    #[test]
    fn overall_without_round_gets_no_slot() {
        let csv_data = "\
player_id,player_name,year,overall,round,pick
7,Half Slot,2021,9,,";
        let players = load_prospects_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
        assert!(players[0].drafted.is_none());
    }

    #[test]
    fn extra_columns_ignored() {
        let csv_data = "\
player_id,player_name,year,overall,round,pick,guid,link
8,Extra,2021,1,1,1,abc-123,http://example.com";
        let players = load_prospects_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Extra");
    }

    #[test]
    fn attributes_keyed_by_player_id() {
        let csv_data = "\
player_id,games,yards,note
1,12,3500.5,captain
2,,NaN,
2,13,4000,latest";
        let records = load_attributes_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[&1];
        assert_eq!(first["games"], 12.0);
        assert_eq!(first["yards"], 3500.5);
        assert_eq!(first["note"], "captain");
        assert!(!first.contains_key("player_id"));

        let second = &records[&2];
        assert_eq!(second["note"], "latest");
    }

    #[test]
    fn non_finite_and_blank_cells_become_null() {
        assert!(cell_value("").is_null());
        assert!(cell_value("NaN").is_null());
        assert!(cell_value("-inf").is_null());
        assert_eq!(cell_value(" 6-4 "), serde_json::json!("6-4"));
    }

    #[test]
    fn attribute_file_without_id_column_is_empty() {
        let csv_data = "name,games\nA,1";
        let records = load_attributes_from_reader(csv_data.as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn load_catalog_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let prospects = dir.path().join("prospects.csv");
        std::fs::File::create(&prospects)
            .unwrap()
            .write_all(PROSPECTS.as_bytes())
            .unwrap();
        let stats = dir.path().join("stats.csv");
        std::fs::write(&stats, "player_id,games\n1,15\n404,1\n").unwrap();

        let catalog = load_catalog(&CatalogPaths {
            prospects,
            profiles: None,
            college_stats: Some(stats),
        })
        .unwrap();

        assert_eq!(catalog.years(), vec![2021]);
        assert_eq!(catalog.player_count(), 3);
        assert_eq!(catalog.player_detail(1).unwrap().stats["games"], 15.0);
        assert!(catalog.player_detail(2).unwrap().stats.is_empty());
    }

    #[test]
    fn load_catalog_rejects_empty_prospects() {
        let dir = tempfile::tempdir().unwrap();
        let prospects = dir.path().join("prospects.csv");
        std::fs::write(&prospects, "player_id,player_name,year\n").unwrap();
        let err = load_catalog(&CatalogPaths {
            prospects,
            profiles: None,
            college_stats: None,
        })
        .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn load_catalog_missing_file_is_io_error() {
        let err = load_catalog(&CatalogPaths {
            prospects: PathBuf::from("/nonexistent/prospects.csv"),
            profiles: None,
            college_stats: None,
        })
        .unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
