// Library root for the draft simulator core: player catalog, draft state
// machine, automatic pick selection, and the engine that ties them together.

pub mod catalog;
pub mod draft;
pub mod engine;
pub mod error;
pub mod store;

pub use catalog::{Catalog, Player, PlayerId, Position};
pub use draft::{Draft, DraftId, DraftSlot, DraftStatus, PickSource};
pub use engine::DraftEngine;
pub use error::{CatalogError, DraftError};
