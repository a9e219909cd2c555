//! Entity definitions for the four record collections of the site:
//! services, "why us" features, contacts and keyed site-content blocks.
//!
//! Each collection module carries the sea-orm entity (`Model`) plus a
//! `*Draft` used for inserts and a `*Patch` used for partial updates.

pub mod errors;
pub mod db;
pub mod patch;
pub mod service;
pub mod feature;
pub mod contact;
pub mod site_content;
