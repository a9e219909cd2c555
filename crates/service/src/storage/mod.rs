//! File-backed persistence used by the JSON-file data backend and by local
//! object storage for uploaded images.

pub mod json_map_store;
pub mod objects;
