// Per-year lookup structures, built once when the catalog is loaded.

use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use super::{Player, PlayerId, Position};

/// Ordering key for rank-based selection: the rank (absent ranks sort last)
/// followed by the player id, so ties resolve deterministically.
pub type RankKey = (u32, PlayerId);

pub(crate) fn rank_key(rank: Option<u32>, id: PlayerId) -> RankKey {
    (rank.unwrap_or(u32::MAX), id)
}

/// Everything the draft engine needs to know about one draft year.
#[derive(Debug)]
pub struct YearIndex {
    year: u16,
    /// Players in file order.
    players: Vec<Player>,
    by_id: HashMap<PlayerId, usize>,
    /// Indices into `players` for slot entries, ascending by overall number.
    slots: Vec<usize>,
    /// Overall number -> scheduled player.
    scheduled: HashMap<u32, usize>,
    by_overall_rank: Vec<RankKey>,
    by_position: HashMap<Position, Vec<RankKey>>,
    teams: Vec<String>,
}

impl YearIndex {
    pub(crate) fn build(year: u16, mut players: Vec<Player>) -> Self {
        let mut scheduled: HashMap<u32, usize> = HashMap::new();
        for (idx, player) in players.iter_mut().enumerate() {
            let Some(drafted) = player.drafted else {
                continue;
            };
            if scheduled.contains_key(&drafted.overall) {
                warn!(
                    "year {}: overall pick {} already claimed, cataloguing player {} without a slot",
                    year, drafted.overall, player.id
                );
                player.drafted = None;
                continue;
            }
            scheduled.insert(drafted.overall, idx);
        }

        let mut slots: Vec<usize> = scheduled.values().copied().collect();
        slots.sort_by_key(|&idx| players[idx].drafted.map(|d| d.overall));

        let by_id = players
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.id, idx))
            .collect();

        let mut by_overall_rank: Vec<RankKey> = players
            .iter()
            .map(|p| rank_key(p.overall_rank, p.id))
            .collect();
        by_overall_rank.sort_unstable();

        let mut by_position: HashMap<Position, Vec<RankKey>> = HashMap::new();
        for p in &players {
            if let Some(position) = &p.position {
                by_position
                    .entry(position.clone())
                    .or_default()
                    .push(rank_key(p.position_rank, p.id));
            }
        }
        for keys in by_position.values_mut() {
            keys.sort_unstable();
        }

        let teams: BTreeSet<String> = players.iter().filter_map(|p| p.team.clone()).collect();

        YearIndex {
            year,
            players,
            by_id,
            slots,
            scheduled,
            by_overall_rank,
            by_position,
            teams: teams.into_iter().collect(),
        }
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.by_id.get(&id).map(|&idx| &self.players[idx])
    }

    /// Players in file order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Players that hold a reference slot, ascending by overall number.
    pub fn slot_entries(&self) -> impl Iterator<Item = &Player> {
        self.slots.iter().map(|&idx| &self.players[idx])
    }

    /// Slot entries first, then the remaining players in file order.
    pub fn players_by_overall(&self) -> impl Iterator<Item = &Player> {
        self.slot_entries()
            .chain(self.players.iter().filter(|p| p.drafted.is_none()))
    }

    /// The player who filled `overall` in the reference draft.
    pub fn scheduled(&self, overall: u32) -> Option<&Player> {
        self.scheduled.get(&overall).map(|&idx| &self.players[idx])
    }

    /// Every player of the year, sorted by overall rank.
    pub fn overall_rank_keys(&self) -> &[RankKey] {
        &self.by_overall_rank
    }

    /// Position -> players at that position sorted by position rank.
    pub fn position_rank_keys(&self) -> &HashMap<Position, Vec<RankKey>> {
        &self.by_position
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }
}
