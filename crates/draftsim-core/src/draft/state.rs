// Draft state machine: slot sequence, availability, turn-taking.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info};

use super::pool::AvailablePool;
use super::slot::{DraftSlot, DraftStatus, PickSource};
use super::DraftId;
use crate::catalog::{Player, PlayerId, YearIndex};
use crate::error::DraftError;

/// A single completed pick, as reported back to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PickRecord {
    /// Index of the filled slot.
    pub index: usize,
    pub overall: u32,
    pub player_id: PlayerId,
    pub source: PickSource,
}

/// The complete state of one draft.
///
/// All mutation goes through [`Draft::simulate_pick`], [`Draft::draft_player`]
/// and [`Draft::advance`], which keep the slot sequence, the available pool
/// and the status in lockstep.
#[derive(Debug, Clone)]
pub struct Draft {
    id: DraftId,
    year: u16,
    user_team: String,
    created_at: DateTime<Utc>,
    /// Index of the slot on the clock. Equals `slots.len()` once complete.
    current_index: usize,
    /// Round and pick of the slot on the clock, or the last slot once complete.
    round: u32,
    pick: u32,
    available: AvailablePool,
    slots: Vec<DraftSlot>,
    status: DraftStatus,
}

impl Draft {
    /// Create a draft for `index`'s year with `user_team` on the user's side.
    ///
    /// The user team need not exist in the year: a draft for an unknown
    /// team simply simulates every pick.
    pub fn new(id: DraftId, index: &YearIndex, user_team: &str) -> Self {
        let slots: Vec<DraftSlot> = index
            .slot_entries()
            .filter_map(DraftSlot::from_entry)
            .collect();

        let (round, pick) = slots.first().map(|s| (s.round, s.pick)).unwrap_or((1, 1));

        let mut draft = Draft {
            id,
            year: index.year(),
            user_team: user_team.to_string(),
            created_at: Utc::now(),
            current_index: 0,
            round,
            pick,
            available: AvailablePool::from_year(index),
            slots,
            status: DraftStatus::Simulating,
        };
        draft.refresh_status();
        draft
    }

    pub fn id(&self) -> DraftId {
        self.id
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn user_team(&self) -> &str {
        &self.user_team
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn pick(&self) -> u32 {
        self.pick
    }

    pub fn status(&self) -> DraftStatus {
        self.status
    }

    pub fn slots(&self) -> &[DraftSlot] {
        &self.slots
    }

    pub fn available(&self) -> &AvailablePool {
        &self.available
    }

    /// The slot on the clock, if any.
    pub fn current_slot(&self) -> Option<&DraftSlot> {
        self.slots.get(self.current_index)
    }

    pub fn remaining_slots(&self) -> usize {
        self.slots.len() - self.current_index
    }

    pub fn is_complete(&self) -> bool {
        self.status == DraftStatus::Complete
    }

    /// Status as a function of the current index and the team on the clock.
    fn refresh_status(&mut self) {
        self.status = match self.current_slot() {
            None => DraftStatus::Complete,
            Some(slot) if slot.belongs_to(&self.user_team) => DraftStatus::WaitingForUser,
            Some(_) => DraftStatus::Simulating,
        };
    }

    /// Fill the slot on the clock with `player` and move to the next slot.
    ///
    /// Callers guarantee the draft is not complete and the player is
    /// available.
    fn assign_pick(&mut self, player: &Player, source: PickSource) -> PickRecord {
        let removed = self.available.remove(player);
        debug_assert!(removed, "player {} assigned while unavailable", player.id);

        let index = self.current_index;
        let slot = &mut self.slots[index];
        slot.fill(player.id, source);
        let overall = slot.overall;

        self.current_index += 1;
        if let Some(next) = self.slots.get(self.current_index) {
            self.round = next.round;
            self.pick = next.pick;
        }
        self.refresh_status();

        debug!(
            "draft {}: pick {} -> player {} ({:?})",
            self.id, overall, player.id, source
        );
        if self.is_complete() {
            info!("Draft {} complete after {} picks", self.id, self.slots.len());
        }

        PickRecord {
            index,
            overall,
            player_id: player.id,
            source,
        }
    }

    /// Make one automatic pick for the team on the clock.
    ///
    /// Takes the reference draft's player for this slot when still
    /// available; otherwise the best available player at that player's
    /// position by position rank; otherwise the best available player by
    /// overall rank. Returns None when nothing could be picked.
    pub fn simulate_pick(&mut self, index: &YearIndex) -> Option<PickRecord> {
        if self.current_slot().is_none() {
            self.refresh_status();
            return None;
        }

        let overall = self.current_index as u32 + 1;
        let scheduled = index.scheduled(overall);

        if let Some(player) = scheduled.filter(|p| self.available.contains(p.id)) {
            return Some(self.assign_pick(player, PickSource::Scheduled));
        }

        if self.available.is_empty() {
            self.refresh_status();
            return None;
        }

        let by_position = scheduled
            .and_then(|p| p.position.as_ref())
            .and_then(|position| self.available.best_at_position(position));

        let (player_id, source) = match by_position {
            Some(id) => (id, PickSource::PositionNeed),
            None => (self.available.best_overall()?, PickSource::BestAvailable),
        };

        let Some(player) = index.player(player_id) else {
            error!(
                "draft {}: available player {} missing from the {} catalog",
                self.id, player_id, self.year
            );
            return None;
        };
        Some(self.assign_pick(player, source))
    }

    /// Record the user's pick. The draft is left untouched on error.
    pub fn draft_player(
        &mut self,
        index: &YearIndex,
        player_id: PlayerId,
    ) -> Result<PickRecord, DraftError> {
        if self.status != DraftStatus::WaitingForUser {
            return Err(DraftError::InvalidTurn {
                status: self.status,
            });
        }
        if !self.available.contains(player_id) {
            return Err(DraftError::PlayerUnavailable { player_id });
        }
        let player = index
            .player(player_id)
            .ok_or(DraftError::PlayerUnavailable { player_id })?;

        let record = self.assign_pick(player, PickSource::User);
        info!(
            "draft {}: user took player {} at pick {}",
            self.id, player_id, record.overall
        );
        Ok(record)
    }

    /// Simulate picks until the user is on the clock or the draft is over.
    ///
    /// Bounded by the number of remaining slots.
    pub fn advance(&mut self, index: &YearIndex) -> Vec<PickRecord> {
        let bound = self.remaining_slots();
        let mut picks = Vec::new();
        for _ in 0..bound {
            if self.status != DraftStatus::Simulating {
                break;
            }
            match self.simulate_pick(index) {
                Some(record) => picks.push(record),
                None => break,
            }
        }
        picks
    }
}
