// JSON request/response messages and their dispatch onto the draft engine.
//
// Every request is a JSON object tagged by `type`; every reply is
// `{"type": ..., "payload": ...}`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use draftsim_core::catalog::PlayerDetail;
use draftsim_core::engine::{AdvanceView, AvailablePlayer, BoardView, StatusView};
use draftsim_core::{DraftEngine, DraftError, DraftId, PlayerId};

/// Messages accepted from clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    Health,
    ListYears,
    ListTeams { year: u16 },
    StartDraft { year: u16, user_team: String },
    GetStatus { draft_id: String },
    Advance { draft_id: String },
    SubmitPick { draft_id: String, player_id: PlayerId },
    GetBoard { draft_id: String },
    ListAvailable { draft_id: String },
    GetPlayer { player_id: PlayerId },
    DeleteDraft { draft_id: String },
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    InvalidTurn,
    PlayerUnavailable,
    BadRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&DraftError> for ErrorPayload {
    fn from(err: &DraftError) -> Self {
        let code = match err {
            DraftError::NotFound { .. } => ErrorCode::NotFound,
            DraftError::InvalidTurn { .. } => ErrorCode::InvalidTurn,
            DraftError::PlayerUnavailable { .. } => ErrorCode::PlayerUnavailable,
        };
        ErrorPayload {
            code,
            message: err.to_string(),
        }
    }
}

/// Messages sent back to clients.
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Response {
    Health { status: &'static str },
    Years(Vec<u16>),
    Teams(Vec<String>),
    DraftStarted { draft_id: DraftId },
    Status(StatusView),
    Advanced(AdvanceView),
    Board(BoardView),
    Available(Vec<AvailablePlayer>),
    Player(Box<PlayerDetail>),
    DraftDeleted { draft_id: DraftId },
    Error(ErrorPayload),
}

/// An unparseable identifier cannot name any registered draft.
fn parse_draft_id(raw: &str) -> Result<DraftId, DraftError> {
    raw.parse().map_err(|_| DraftError::NotFound {
        what: format!("draft {raw}"),
    })
}

/// Run one request against the engine.
pub fn handle_request(engine: &DraftEngine, request: Request) -> Result<Response, DraftError> {
    let response = match request {
        Request::Health => Response::Health { status: "ok" },
        Request::ListYears => Response::Years(engine.years()),
        Request::ListTeams { year } => Response::Teams(engine.teams(year)?),
        Request::StartDraft { year, user_team } => Response::DraftStarted {
            draft_id: engine.create_draft(year, &user_team)?,
        },
        Request::GetStatus { draft_id } => {
            Response::Status(engine.status(&parse_draft_id(&draft_id)?)?)
        }
        Request::Advance { draft_id } => {
            Response::Advanced(engine.advance(&parse_draft_id(&draft_id)?)?)
        }
        Request::SubmitPick {
            draft_id,
            player_id,
        } => Response::Advanced(engine.submit_pick(&parse_draft_id(&draft_id)?, player_id)?),
        Request::GetBoard { draft_id } => {
            Response::Board(engine.board(&parse_draft_id(&draft_id)?)?)
        }
        Request::ListAvailable { draft_id } => {
            Response::Available(engine.available(&parse_draft_id(&draft_id)?)?)
        }
        Request::GetPlayer { player_id } => {
            Response::Player(Box::new(engine.player(player_id)?))
        }
        Request::DeleteDraft { draft_id } => {
            let draft_id = parse_draft_id(&draft_id)?;
            engine.delete_draft(&draft_id)?;
            Response::DraftDeleted { draft_id }
        }
    };
    Ok(response)
}

/// Parse, dispatch and serialize one text message. Always yields a reply.
pub fn handle_message(engine: &DraftEngine, text: &str) -> String {
    let response = match serde_json::from_str::<Request>(text) {
        Ok(request) => handle_request(engine, request).unwrap_or_else(|err| {
            warn!("request rejected: {}", err);
            Response::Error(ErrorPayload::from(&err))
        }),
        Err(e) => {
            warn!("unparseable request: {}", e);
            Response::Error(ErrorPayload {
                code: ErrorCode::BadRequest,
                message: e.to_string(),
            })
        }
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        warn!("failed to serialize response: {}", e);
        r#"{"type":"ERROR","payload":{"code":"BAD_REQUEST","message":"unserializable response"}}"#
            .to_string()
    })
}
