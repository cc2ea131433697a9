//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: chat entries and session records (`ChatEntry`, `SessionRecord`, `SessionId`)
//! - `repository`: storage seam for archived sessions (`SessionArchive`)
//! - `store`: the active session plus the archive (`SessionStore`)

mod model;
mod repository;
mod store;

pub use model::{ChatEntry, SessionId, SessionRecord};
pub use repository::SessionArchive;
pub use store::SessionStore;
