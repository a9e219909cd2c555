//! Service layer for the Clean House site.
//! - `backend`: generic query/mutate interface with Postgres and JSON-file implementations.
//! - `content`: typed collections with a shared query cache (the Data Access Layer).
//! - `inline_edit`: edit-mode flag and per-field Display/Editing state.
//! - `upload`: image validation and object storage.
//! - `lead`: contact-form relay to Telegram.

pub mod errors;
pub mod backend;
pub mod storage;
pub mod content;
pub mod inline_edit;
pub mod upload;
pub mod lead;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
