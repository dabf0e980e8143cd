//! High-level Folio API.
//!
//! [`Folio`] wires a key-value driver into the full engine stack (blob and
//! metadata stores, status, history, merge, and sync) for one project
//! checkout. The individual engine crates stay usable on their own; this
//! crate is the convenient front door.

pub mod config;
pub mod error;
pub mod workspace;

pub use config::FolioConfig;
pub use error::{FolioError, FolioResult};
pub use workspace::Folio;
