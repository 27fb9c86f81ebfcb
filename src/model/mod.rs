//! Database models
//!
//! Row structs for every persisted entity live in models.rs; table.rs
//! holds the typed table handle the DAO layer hangs its queries on.

mod models;
mod table;

pub use models::*;

pub use table::Table;
