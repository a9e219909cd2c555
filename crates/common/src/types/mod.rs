use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Uniform JSON error body returned by every API handler.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), detail: None }
    }

    pub fn with_detail(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { error: error.into(), detail: Some(detail.into()) }
    }
}

/// Acknowledgement body for fire-and-forget endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SuccessBody {
    pub success: bool,
}

impl SuccessBody {
    pub const OK: SuccessBody = SuccessBody { success: true };
}
