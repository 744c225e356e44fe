//! Shared application state handed to every handler.

use std::sync::Arc;

use chrono::Duration;

use crate::{
    catalog::CatalogRepository,
    services::{
        key_issuer::{IssuancePolicy, KeyIssuer},
        key_validator::KeyValidator,
    },
    store::KeyStore,
};

#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<dyn KeyStore>,
    pub issuer: KeyIssuer,
    pub validator: KeyValidator,
    pub catalog: Arc<dyn CatalogRepository>,
}

impl AppState {
    /// Wire the key services over one shared key store.
    pub fn new(
        keys: Arc<dyn KeyStore>,
        catalog: Arc<dyn CatalogRepository>,
        policy: IssuancePolicy,
        key_ttl: Duration,
    ) -> Self {
        Self {
            issuer: KeyIssuer::new(keys.clone(), policy, key_ttl),
            validator: KeyValidator::new(keys.clone()),
            keys,
            catalog,
        }
    }
}
