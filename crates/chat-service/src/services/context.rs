//! Service context - dependency container for services
//!
//! Holds the store facade and the broadcast publisher. Both are cheap to
//! clone and shared by every request.

use chat_cache::Publisher;
use chat_store::Store;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    store: Store,
    publisher: Publisher,
}

impl ServiceContext {
    /// Create a new ServiceContext
    pub fn new(store: Store, publisher: Publisher) -> Self {
        Self { store, publisher }
    }

    /// Start building a ServiceContext
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::default()
    }

    /// Get the store facade
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Get the broadcast publisher
    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &self.store)
            .field("publisher", &self.publisher)
            .finish()
    }
}

/// Builder for ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    store: Option<Store>,
    publisher: Option<Publisher>,
}

impl ServiceContextBuilder {
    pub fn store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    pub fn publisher(mut self, publisher: Publisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Build the ServiceContext
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            store: self
                .store
                .ok_or_else(|| ServiceError::validation("store is required"))?,
            publisher: self
                .publisher
                .ok_or_else(|| ServiceError::validation("publisher is required"))?,
        })
    }
}
