use base64::prelude::{Engine as _, BASE64_STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_types::ObjectId;

/// Maximum ids per missing-blob query.
pub const MISSING_PAGE_SIZE: usize = 500;

/// Maximum blobs per upload batch.
pub const UPLOAD_BATCH_SIZE: usize = 20;

/// A branch record as the remote service reports it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteBranch {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub snapshots: Vec<ObjectId>,
}

/// One blob in an upload batch: id plus base64-encoded canonical content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobUpload {
    pub id: ObjectId,
    pub content: String,
}

impl BlobUpload {
    /// Encode canonical blob bytes for transport.
    pub fn new(id: ObjectId, bytes: &[u8]) -> Self {
        Self {
            id,
            content: BASE64_STANDARD.encode(bytes),
        }
    }

    /// Decode the transported content back to canonical bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64_STANDARD.decode(&self.content)
    }
}

/// What a push actually transferred.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PushSummary {
    pub snapshots_sent: usize,
    pub blobs_sent: usize,
}

impl PushSummary {
    /// Returns `true` if the remote was already up to date.
    pub fn is_noop(&self) -> bool {
        self.snapshots_sent == 0 && self.blobs_sent == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_upload_roundtrips_content() {
        let upload = BlobUpload::new(ObjectId::from_digest([1; 20]), br#"{"id":"bar"}"#);
        assert_eq!(upload.decode().unwrap(), br#"{"id":"bar"}"#);
    }

    #[test]
    fn push_summary_noop() {
        assert!(PushSummary::default().is_noop());
        let sent = PushSummary {
            snapshots_sent: 1,
            blobs_sent: 0,
        };
        assert!(!sent.is_noop());
    }
}
