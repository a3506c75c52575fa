//! Message Attachment entity.

use serde::{Deserialize, Serialize};

/// Represents a file attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Snowflake ID
    pub id: String,

    /// Original filename
    pub filename: String,

    /// MIME type (e.g., "image/png", "application/pdf")
    #[serde(default)]
    pub content_type: Option<String>,

    /// File size in bytes
    #[serde(default)]
    pub size: u64,

    /// CDN URL for file access
    pub url: String,

    /// Proxied URL
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// Width in pixels (for images/videos)
    #[serde(default)]
    pub width: Option<u32>,

    /// Height in pixels (for images/videos)
    #[serde(default)]
    pub height: Option<u32>,
}
