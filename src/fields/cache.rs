//! Lazily populated catalog shared by one endpoint

use super::catalog::FieldCatalog;
use crate::error::Result;
use crate::service::ReportRequestClient;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Holds at most one resolved catalog; a refresh swaps it out whole
#[derive(Debug, Default)]
pub struct FieldCatalogCache {
    inner: RwLock<Option<Arc<FieldCatalog>>>,
}

impl FieldCatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog if one has been resolved
    pub async fn current(&self) -> Option<Arc<FieldCatalog>> {
        self.inner.read().await.clone()
    }

    /// Return the cached catalog, fetching it on first use
    pub async fn get_or_fetch(
        &self,
        client: &ReportRequestClient,
        api_key: &str,
        controller: &str,
    ) -> Result<Arc<FieldCatalog>> {
        if let Some(catalog) = self.current().await {
            return Ok(catalog);
        }

        let mut guard = self.inner.write().await;
        if let Some(catalog) = guard.as_ref() {
            return Ok(Arc::clone(catalog));
        }
        let catalog = Arc::new(FieldCatalog::fetch(client, api_key, controller).await?);
        *guard = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Fetch again and replace the cached catalog
    ///
    /// On failure the previous catalog stays in place.
    pub async fn refresh(
        &self,
        client: &ReportRequestClient,
        api_key: &str,
        controller: &str,
    ) -> Result<Arc<FieldCatalog>> {
        let catalog = Arc::new(FieldCatalog::fetch(client, api_key, controller).await?);
        *self.inner.write().await = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Install a catalog directly
    pub async fn set(&self, catalog: FieldCatalog) {
        *self.inner.write().await = Some(Arc::new(catalog));
    }
}
