// Player catalog: the read-only, process-lifetime dataset of draft prospects.

pub mod index;
pub mod loader;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::DraftError;

pub use index::YearIndex;

/// Catalog-wide player identifier.
pub type PlayerId = u64;

/// A player's position as catalogued (e.g. "QB", "EDGE", "OT").
///
/// Stored trimmed and upper-cased so that position matching during
/// simulation is a plain equality check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(String);

impl Position {
    /// Normalize a raw position string. Returns None for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Position(trimmed.to_uppercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a player was taken in the reference draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPosition {
    /// 1-based pick number across the whole draft.
    pub overall: u32,
    pub round: u32,
    /// Pick number within the round.
    pub pick: u32,
}

/// A single catalogued player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub year: u16,
    /// Team that held the reference draft slot, if any.
    pub team: Option<String>,
    pub position: Option<Position>,
    /// Reference draft slot. None for players never assigned an overall number.
    pub drafted: Option<DraftPosition>,
    pub overall_rank: Option<u32>,
    pub position_rank: Option<u32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub school: Option<String>,
}

/// Free-form descriptive fields keyed by column name.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// A player together with the optional profile and statistics records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerDetail {
    #[serde(flatten)]
    pub player: Player,
    pub profile: Attributes,
    pub stats: Attributes,
}

/// The full player catalog, indexed by year and by identifier.
#[derive(Debug, Default)]
pub struct Catalog {
    years: BTreeMap<u16, YearIndex>,
    year_of: HashMap<PlayerId, u16>,
    profiles: HashMap<PlayerId, Attributes>,
    stats: HashMap<PlayerId, Attributes>,
}

impl Catalog {
    /// Build a catalog from players in file order.
    ///
    /// The first occurrence of a duplicated identifier wins. Within a year,
    /// the first player claiming an overall number keeps the slot; later
    /// claimants are kept as players without a slot.
    pub fn from_players(players: impl IntoIterator<Item = Player>) -> Self {
        let mut by_year: BTreeMap<u16, Vec<Player>> = BTreeMap::new();
        let mut year_of = HashMap::new();

        for player in players {
            if year_of.contains_key(&player.id) {
                warn!("duplicate player id {}, keeping first occurrence", player.id);
                continue;
            }
            year_of.insert(player.id, player.year);
            by_year.entry(player.year).or_default().push(player);
        }

        let years: BTreeMap<u16, YearIndex> = by_year
            .into_iter()
            .map(|(year, players)| (year, YearIndex::build(year, players)))
            .collect();

        info!(
            "Catalog built: {} players across {} years",
            year_of.len(),
            years.len()
        );

        Catalog {
            years,
            year_of,
            profiles: HashMap::new(),
            stats: HashMap::new(),
        }
    }

    /// Attach profile records. Records for unknown players are dropped.
    pub fn with_profiles(mut self, profiles: HashMap<PlayerId, Attributes>) -> Self {
        self.profiles = self.retain_known(profiles, "profile");
        self
    }

    /// Attach college statistics records. Records for unknown players are dropped.
    pub fn with_stats(mut self, stats: HashMap<PlayerId, Attributes>) -> Self {
        self.stats = self.retain_known(stats, "stats");
        self
    }

    fn retain_known(
        &self,
        records: HashMap<PlayerId, Attributes>,
        kind: &str,
    ) -> HashMap<PlayerId, Attributes> {
        let before = records.len();
        let kept: HashMap<PlayerId, Attributes> = records
            .into_iter()
            .filter(|(id, _)| self.year_of.contains_key(id))
            .collect();
        if kept.len() < before {
            warn!(
                "dropped {} {} records for players missing from the catalog",
                before - kept.len(),
                kind
            );
        }
        kept
    }

    /// All catalogued draft years, ascending.
    pub fn years(&self) -> Vec<u16> {
        self.years.keys().copied().collect()
    }

    pub fn has_year(&self, year: u16) -> bool {
        self.years.contains_key(&year)
    }

    /// The per-year index, or NotFound for an unknown year.
    pub fn year(&self, year: u16) -> Result<&YearIndex, DraftError> {
        self.years
            .get(&year)
            .ok_or_else(|| DraftError::year_not_found(year))
    }

    /// Players for a year, ordered by overall number (unslotted players last).
    pub fn players_for_year(&self, year: u16) -> Result<Vec<&Player>, DraftError> {
        Ok(self.year(year)?.players_by_overall().collect())
    }

    /// Sorted, de-duplicated team names for a year.
    pub fn teams_for_year(&self, year: u16) -> Result<Vec<String>, DraftError> {
        Ok(self.year(year)?.teams().to_vec())
    }

    pub fn player_by_id(&self, id: PlayerId) -> Result<&Player, DraftError> {
        self.year_of
            .get(&id)
            .and_then(|year| self.years.get(year))
            .and_then(|index| index.player(id))
            .ok_or_else(|| DraftError::player_not_found(id))
    }

    /// A player with profile and statistics attached, numeric fields
    /// normalized to JSON-safe values.
    pub fn player_detail(&self, id: PlayerId) -> Result<PlayerDetail, DraftError> {
        let player = self.player_by_id(id)?;
        Ok(PlayerDetail {
            player: json_safe_player(player),
            profile: self.profiles.get(&id).cloned().unwrap_or_default(),
            stats: self.stats.get(&id).cloned().unwrap_or_default(),
        })
    }

    pub fn player_count(&self) -> usize {
        self.year_of.len()
    }
}

/// Drop NaN and infinite values.
pub fn json_safe(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn json_safe_player(player: &Player) -> Player {
    Player {
        height: json_safe(player.height),
        weight: json_safe(player.weight),
        ..player.clone()
    }
}
