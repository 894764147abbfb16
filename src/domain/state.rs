use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conditional-request state remembered per source URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceState {
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl SourceState {
    pub fn new(etag: Option<String>, last_modified: Option<String>) -> Self {
        Self {
            etag,
            last_modified,
            fetched_at: Some(Utc::now()),
        }
    }
}
