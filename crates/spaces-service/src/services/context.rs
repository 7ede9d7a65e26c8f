//! Service context - dependency container for services
//!
//! Holds the store, the clock, the id generator and the moderation policy.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use spaces_common::AppConfig;
use spaces_core::traits::{Clock, Store, SystemClock, UnitOfWork};
use spaces_core::{ModerationPolicy, Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    moderation: ModerationPolicy,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        moderation: ModerationPolicy,
    ) -> Self {
        Self {
            store,
            clock,
            snowflake_generator,
            moderation,
        }
    }

    /// Context wired from loaded configuration, using the system clock
    pub fn from_config(store: Arc<dyn Store>, config: &AppConfig) -> ServiceResult<Self> {
        let moderation = config
            .moderation_policy()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        ServiceContextBuilder::new()
            .store(store)
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
            .moderation(moderation)
            .build()
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Open a unit of work on the store
    pub async fn begin(&self) -> ServiceResult<Box<dyn UnitOfWork>> {
        Ok(self.store.begin().await?)
    }

    /// Current time according to the configured clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn moderation(&self) -> &ModerationPolicy {
        &self.moderation
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &"dyn Store")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .field("moderation", &self.moderation)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext with custom configuration
///
/// Only the store is required; the clock defaults to [`SystemClock`], the
/// generator to worker 0 and the policy to blocking every restraint kind.
#[derive(Default)]
pub struct ServiceContextBuilder {
    store: Option<Arc<dyn Store>>,
    clock: Option<Arc<dyn Clock>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    moderation: Option<ModerationPolicy>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn moderation(mut self, policy: ModerationPolicy) -> Self {
        self.moderation = Some(policy);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if the store is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.store
                .ok_or_else(|| ServiceError::validation("store is required"))?,
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            self.snowflake_generator
                .unwrap_or_else(|| Arc::new(SnowflakeGenerator::new(0))),
            self.moderation.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_store() {
        let err = ServiceContextBuilder::new().build().unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
