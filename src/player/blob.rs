// In-memory audio blobs
// Local files are read once and addressed by an opaque "blob:tapeflow/N" url.
// Revoke a url when its track leaves the playlist or the bytes stay resident.

use std::collections::HashMap;
use std::sync::Arc;

const BLOB_PREFIX: &str = "blob:tapeflow/";

#[derive(Debug, Clone)]
pub struct Blob {
    pub data: Arc<[u8]>,
    pub mime: String,
}

#[derive(Debug, Default)]
pub struct BlobStore {
    blobs: HashMap<String, Blob>,
    next_id: u64,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, data: Vec<u8>, mime: &str) -> String {
        // Ids are never reused, even after revoke
        self.next_id += 1;
        let url = format!("{}{}", BLOB_PREFIX, self.next_id);
        self.blobs.insert(
            url.clone(),
            Blob {
                data: Arc::from(data),
                mime: mime.to_string(),
            },
        );
        url
    }

    pub fn get(&self, url: &str) -> Option<Blob> {
        self.blobs.get(url).cloned()
    }

    pub fn revoke(&mut self, url: &str) -> bool {
        let removed = self.blobs.remove(url).is_some();
        if removed {
            tracing::debug!(%url, "blob revoked");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub fn is_blob_url(url: &str) -> bool {
        url.starts_with(BLOB_PREFIX)
    }
}
