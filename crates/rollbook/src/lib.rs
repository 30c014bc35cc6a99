//! `rollbook` - a single-user student record book
//!
//! Records (name, university id, email, contact number) are validated with
//! fixed format rules, kept in insertion order, and persisted as one JSON blob
//! in a local key-value slot so they survive between sessions.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod notify;
pub mod record;
pub mod render;
pub mod storage;
pub mod store;
pub mod validation;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
pub use form::{FormController, Mode};
pub use logging::init_logging;
pub use notify::{NoticeKind, Notifier};
pub use record::{Record, RecordData, RecordId};
pub use render::{render, TableView};
pub use storage::{MemorySlotStore, SlotStore, SqliteSlotStore};
pub use store::RecordStore;
pub use validation::{validate, Field};
