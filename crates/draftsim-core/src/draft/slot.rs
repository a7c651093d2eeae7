// Draft slots and draft status.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Player, PlayerId};

/// Where a draft stands relative to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    /// A simulated team is on the clock.
    Simulating,
    /// The user's team is on the clock.
    WaitingForUser,
    /// Every slot has been filled.
    Complete,
}

impl DraftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStatus::Simulating => "simulating",
            DraftStatus::WaitingForUser => "waiting_for_user",
            DraftStatus::Complete => "complete",
        }
    }
}

impl fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a slot was filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickSource {
    /// The reference draft's player for this slot was still available.
    Scheduled,
    /// Best available player at the scheduled player's position.
    PositionNeed,
    /// Best available player by overall rank.
    BestAvailable,
    /// Chosen by the user.
    User,
}

/// One pick opportunity in the draft order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftSlot {
    pub overall: u32,
    pub round: u32,
    pub pick: u32,
    pub team: Option<String>,
    player_id: Option<PlayerId>,
    source: Option<PickSource>,
}

impl DraftSlot {
    /// An empty slot mirroring a catalogued slot entry.
    ///
    /// Returns None for players without a reference slot.
    pub(crate) fn from_entry(entry: &Player) -> Option<Self> {
        let drafted = entry.drafted?;
        Some(DraftSlot {
            overall: drafted.overall,
            round: drafted.round,
            pick: drafted.pick,
            team: entry.team.clone(),
            player_id: None,
            source: None,
        })
    }

    pub fn player_id(&self) -> Option<PlayerId> {
        self.player_id
    }

    pub fn source(&self) -> Option<PickSource> {
        self.source
    }

    pub fn is_filled(&self) -> bool {
        self.player_id.is_some()
    }

    /// Whether `team` owns this slot.
    pub fn belongs_to(&self, team: &str) -> bool {
        self.team.as_deref() == Some(team)
    }

    /// Assign a player. A slot is filled at most once.
    pub(crate) fn fill(&mut self, player_id: PlayerId, source: PickSource) {
        debug_assert!(self.player_id.is_none(), "slot {} filled twice", self.overall);
        self.player_id = Some(player_id);
        self.source = Some(source);
    }
}
