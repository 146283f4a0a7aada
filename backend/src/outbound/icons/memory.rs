//! In-memory icon store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::IconKey;
use crate::domain::ports::{IconStore, IconStoreError};

/// [`IconStore`] keeping blobs in process memory. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIconStore {
    blobs: Arc<RwLock<HashMap<IconKey, String>>>,
}

impl InMemoryIconStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> IconStoreError {
    IconStoreError::io("icon store lock poisoned")
}

#[async_trait]
impl IconStore for InMemoryIconStore {
    async fn get(&self, key: &IconKey) -> Result<Option<String>, IconStoreError> {
        let blobs = self.blobs.read().map_err(|_| poisoned())?;
        Ok(blobs.get(key).cloned())
    }

    async fn put(&self, key: &IconKey, blob: &str) -> Result<(), IconStoreError> {
        let mut blobs = self.blobs.write().map_err(|_| poisoned())?;
        blobs.insert(key.clone(), blob.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Username;

    #[tokio::test]
    async fn stores_and_overwrites() {
        let store = InMemoryIconStore::new();
        let key = IconKey::for_username(&Username::new("bob").expect("username"));

        assert_eq!(store.get(&key).await, Ok(None));
        store.put(&key, "a").await.expect("put");
        store.put(&key, "b").await.expect("put");
        assert_eq!(store.get(&key).await, Ok(Some("b".to_owned())));
    }
}
