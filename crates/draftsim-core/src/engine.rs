// Draft engine: the operations exposed to the transport layer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::catalog::{json_safe, Catalog, PlayerDetail, PlayerId, Position};
use crate::draft::{Draft, DraftId, DraftSlot, DraftStatus};
use crate::error::DraftError;
use crate::store::{lock, DraftHandle, DraftStore};

/// Where a draft currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub round: u32,
    pub pick: u32,
    pub status: DraftStatus,
    pub index: usize,
}

/// Result of an advance or a submitted pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvanceView {
    #[serde(flatten)]
    pub status: StatusView,
    /// Number of picks simulated by this call.
    pub simulated: usize,
}

/// The full draft board.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub draft_id: DraftId,
    pub year: u16,
    pub user_team: String,
    pub created_at: DateTime<Utc>,
    pub current_index: usize,
    pub status: DraftStatus,
    pub board: Vec<DraftSlot>,
}

/// One row of the available-players list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailablePlayer {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Option<Position>,
    pub team: Option<String>,
    pub school: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub overall_rank: Option<u32>,
    pub position_rank: Option<u32>,
}

/// Owns the catalog and every active draft.
#[derive(Debug)]
pub struct DraftEngine {
    catalog: Arc<Catalog>,
    store: DraftStore,
}

impl DraftEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        DraftEngine {
            catalog,
            store: DraftStore::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Number of drafts currently registered.
    pub fn active_drafts(&self) -> usize {
        self.store.len()
    }

    fn handle(&self, id: &DraftId) -> Result<DraftHandle, DraftError> {
        self.store
            .get(id)
            .ok_or_else(|| DraftError::draft_not_found(id))
    }

    /// Start a new draft for `year` with the user controlling `user_team`.
    pub fn create_draft(&self, year: u16, user_team: &str) -> Result<DraftId, DraftError> {
        let index = self.catalog.year(year)?;
        let draft = Draft::new(DraftId::new(), index, user_team);
        info!(
            "Draft {} created: year={}, user_team='{}', {} slots, status={}",
            draft.id(),
            year,
            user_team,
            draft.slots().len(),
            draft.status()
        );
        Ok(self.store.insert(draft))
    }

    /// Remove a draft from the store.
    pub fn delete_draft(&self, id: &DraftId) -> Result<(), DraftError> {
        if self.store.remove(id) {
            info!("Draft {} deleted", id);
            Ok(())
        } else {
            Err(DraftError::draft_not_found(id))
        }
    }

    pub fn status(&self, id: &DraftId) -> Result<StatusView, DraftError> {
        let handle = self.handle(id)?;
        let draft = lock(&handle);
        Ok(status_view(&draft))
    }

    /// Simulate until the user is on the clock or the draft is complete.
    pub fn advance(&self, id: &DraftId) -> Result<AdvanceView, DraftError> {
        let handle = self.handle(id)?;
        let mut draft = lock(&handle);
        let index = self.catalog.year(draft.year())?;
        let picks = draft.advance(index);
        Ok(AdvanceView {
            status: status_view(&draft),
            simulated: picks.len(),
        })
    }

    /// Record the user's pick, then simulate until the user is needed again.
    pub fn submit_pick(
        &self,
        id: &DraftId,
        player_id: PlayerId,
    ) -> Result<AdvanceView, DraftError> {
        let handle = self.handle(id)?;
        let mut draft = lock(&handle);
        let index = self.catalog.year(draft.year())?;
        draft.draft_player(index, player_id)?;
        let picks = draft.advance(index);
        Ok(AdvanceView {
            status: status_view(&draft),
            simulated: picks.len(),
        })
    }

    pub fn board(&self, id: &DraftId) -> Result<BoardView, DraftError> {
        let handle = self.handle(id)?;
        let draft = lock(&handle);
        Ok(BoardView {
            draft_id: draft.id(),
            year: draft.year(),
            user_team: draft.user_team().to_string(),
            created_at: draft.created_at(),
            current_index: draft.current_index(),
            status: draft.status(),
            board: draft.slots().to_vec(),
        })
    }

    /// Players still available, best overall rank first.
    pub fn available(&self, id: &DraftId) -> Result<Vec<AvailablePlayer>, DraftError> {
        let handle = self.handle(id)?;
        let draft = lock(&handle);
        let index = self.catalog.year(draft.year())?;

        let mut players: Vec<_> = draft
            .available()
            .ids()
            .filter_map(|pid| index.player(pid))
            .collect();
        players.sort_by_key(|p| {
            (
                p.overall_rank.unwrap_or(u32::MAX),
                p.drafted.map_or(u32::MAX, |d| d.overall),
                p.id,
            )
        });

        Ok(players
            .into_iter()
            .map(|p| AvailablePlayer {
                player_id: p.id,
                name: p.name.clone(),
                position: p.position.clone(),
                team: p.team.clone(),
                school: p.school.clone(),
                height: json_safe(p.height),
                weight: json_safe(p.weight),
                overall_rank: p.overall_rank,
                position_rank: p.position_rank,
            })
            .collect())
    }

    pub fn years(&self) -> Vec<u16> {
        self.catalog.years()
    }

    pub fn teams(&self, year: u16) -> Result<Vec<String>, DraftError> {
        self.catalog.teams_for_year(year)
    }

    pub fn player(&self, id: PlayerId) -> Result<PlayerDetail, DraftError> {
        self.catalog.player_detail(id)
    }
}

fn status_view(draft: &Draft) -> StatusView {
    StatusView {
        round: draft.round(),
        pick: draft.pick(),
        status: draft.status(),
        index: draft.current_index(),
    }
}
