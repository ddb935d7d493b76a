pub mod config;
pub mod error;
pub mod metadata;
pub mod model;
pub mod repertoire;
pub mod scheduler;
pub mod store;
pub mod tunebook;

pub use config::Config;
pub use error::*;
pub use metadata::{extract, extract_strict, TuneMetadata};
pub use model::*;
pub use repertoire::Repertoire;
pub use scheduler::{due_tunes, next_due, record_session, schedule, ReviewUpdate};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use tunebook::{
    ensure_headers, ensure_headers_with, export_all, export_all_with, import_tunebook,
    split_tunebook, HeaderDefaults,
};
