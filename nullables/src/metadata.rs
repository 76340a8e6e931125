//! Nullable metadata source — serves a fixed document and counts fetches.

use async_trait::async_trait;
use govgate_registry::{MetadataDocument, MetadataSource, ResolutionError};
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct StaticMetadataSource {
    document: MetadataDocument,
    fetches: AtomicUsize,
}

impl StaticMetadataSource {
    pub fn new(document: MetadataDocument) -> Self {
        Self {
            document,
            fetches: AtomicUsize::new(0),
        }
    }

    /// How many times the document has been fetched.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataSource for StaticMetadataSource {
    async fn fetch(&self) -> Result<MetadataDocument, ResolutionError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.document.clone())
    }

    fn describe(&self) -> String {
        "static document".to_string()
    }
}
