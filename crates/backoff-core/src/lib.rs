//! Failure backoff counter kept in memory that survives sleep and reset.
//!
//! [`BackoffState`] borrows a caller-owned [`PersistentBackoffRecord`] and
//! maps the stored failure count onto a [`BackoffTable`] of wait times.
//! [`retained::RetainedFile`] and [`config::BackoffConfig`] let a host
//! process keep records and tables on disk.

pub mod config;
pub mod cycle;
pub mod error;
pub mod record;
pub mod retained;
pub mod state;
pub mod table;

pub use error::BackoffError;
pub use record::PersistentBackoffRecord;
pub use state::BackoffState;
pub use table::BackoffTable;
