//! Avatar icon service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{IconCommand, IconQuery, IconStore, IconStoreError};
use crate::domain::{Error, IconKey, Username};

/// Service implementing the icon driving ports over an [`IconStore`].
#[derive(Clone)]
pub struct IconService<S> {
    store: Arc<S>,
}

impl<S> IconService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

fn map_store_error(error: IconStoreError) -> Error {
    Error::internal(format!("icon store error: {error}"))
}

#[async_trait]
impl<S: IconStore> IconQuery for IconService<S> {
    async fn get_icon(&self, username: &Username) -> Result<String, Error> {
        let key = IconKey::for_username(username);
        let blob = self.store.get(&key).await.map_err(map_store_error)?;
        // A user without an icon is a normal state, not a failure.
        Ok(blob.unwrap_or_default())
    }
}

#[async_trait]
impl<S: IconStore> IconCommand for IconService<S> {
    async fn update_icon(&self, username: &Username, icon_image: String) -> Result<String, Error> {
        let key = IconKey::for_username(username);
        self.store
            .put(&key, &icon_image)
            .await
            .map_err(map_store_error)?;
        Ok(icon_image)
    }
}
