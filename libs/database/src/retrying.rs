use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::retry::{retry_with_backoff, RetryConfig};
use crate::store::{Condition, Document, DocumentStore, QueryOutput, ReadParams};

/// Store wrapper that routes every operation through the retry policy.
///
/// Only transient error kinds ([`StoreError::is_transient`]) are re-attempted;
/// everything else propagates on the first failure.
pub struct RetryingStore<S> {
    inner: S,
    config: RetryConfig,
}

impl<S: DocumentStore> RetryingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            config: RetryConfig::default(),
        }
    }

    pub fn with_config(inner: S, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for RetryingStore<S> {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        retry_with_backoff(
            || self.inner.get(collection, id),
            &self.config,
            StoreError::is_transient,
        )
        .await
    }

    async fn put(&self, collection: &str, item: Document) -> Result<(), StoreError> {
        retry_with_backoff(
            || self.inner.put(collection, item.clone()),
            &self.config,
            StoreError::is_transient,
        )
        .await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: serde_json::Map<String, Value>,
    ) -> Result<Document, StoreError> {
        retry_with_backoff(
            || self.inner.update(collection, id, fields.clone()),
            &self.config,
            StoreError::is_transient,
        )
        .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        retry_with_backoff(
            || self.inner.delete(collection, id),
            &self.config,
            StoreError::is_transient,
        )
        .await
    }

    async fn query(
        &self,
        collection: &str,
        key: Condition,
        params: ReadParams,
    ) -> Result<QueryOutput, StoreError> {
        retry_with_backoff(
            || self.inner.query(collection, key.clone(), params.clone()),
            &self.config,
            StoreError::is_transient,
        )
        .await
    }

    async fn scan(&self, collection: &str, params: ReadParams) -> Result<QueryOutput, StoreError> {
        retry_with_backoff(
            || self.inner.scan(collection, params.clone()),
            &self.config,
            StoreError::is_transient,
        )
        .await
    }

    async fn batch_get(
        &self,
        collection: &str,
        ids: &[String],
    ) -> Result<Vec<Document>, StoreError> {
        retry_with_backoff(
            || self.inner.batch_get(collection, ids),
            &self.config,
            StoreError::is_transient,
        )
        .await
    }

    async fn batch_write(&self, collection: &str, items: Vec<Document>) -> Result<(), StoreError> {
        retry_with_backoff(
            || self.inner.batch_write(collection, items.clone()),
            &self.config,
            StoreError::is_transient,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreErrorKind;
    use crate::memory::InMemoryStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Store that fails with a configurable error kind a fixed number of
    /// times before delegating to an in-memory store.
    struct FlakyStore {
        inner: InMemoryStore,
        failures: AtomicU32,
        kind: StoreErrorKind,
        calls: Arc<AtomicU32>,
    }

    impl FlakyStore {
        fn new(failures: u32, kind: StoreErrorKind) -> Self {
            Self {
                inner: InMemoryStore::new(),
                failures: AtomicU32::new(failures),
                kind,
                calls: Arc::new(AtomicU32::new(0)),
            }
        }

        fn fail_or<T>(&self, ok: T) -> Result<T, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                Err(StoreError::new(self.kind, "injected failure"))
            } else {
                Ok(ok)
            }
        }
    }

    #[async_trait]
    impl DocumentStore for FlakyStore {
        async fn get(&self, c: &str, id: &str) -> Result<Option<Document>, StoreError> {
            self.fail_or(())?;
            self.inner.get(c, id).await
        }
        async fn put(&self, c: &str, item: Document) -> Result<(), StoreError> {
            self.fail_or(())?;
            self.inner.put(c, item).await
        }
        async fn update(
            &self,
            c: &str,
            id: &str,
            fields: serde_json::Map<String, Value>,
        ) -> Result<Document, StoreError> {
            self.fail_or(())?;
            self.inner.update(c, id, fields).await
        }
        async fn delete(&self, c: &str, id: &str) -> Result<(), StoreError> {
            self.fail_or(())?;
            self.inner.delete(c, id).await
        }
        async fn query(
            &self,
            c: &str,
            key: Condition,
            params: ReadParams,
        ) -> Result<QueryOutput, StoreError> {
            self.fail_or(())?;
            self.inner.query(c, key, params).await
        }
        async fn scan(&self, c: &str, params: ReadParams) -> Result<QueryOutput, StoreError> {
            self.fail_or(())?;
            self.inner.scan(c, params).await
        }
        async fn batch_get(&self, c: &str, ids: &[String]) -> Result<Vec<Document>, StoreError> {
            self.fail_or(())?;
            self.inner.batch_get(c, ids).await
        }
        async fn batch_write(&self, c: &str, items: Vec<Document>) -> Result<(), StoreError> {
            self.fail_or(())?;
            self.inner.batch_write(c, items).await
        }
    }

    fn fast_config() -> RetryConfig {
        RetryConfig::new().with_initial_delay(1).with_max_delay(5)
    }

    #[tokio::test]
    async fn recovers_from_transient_failures() {
        let flaky = FlakyStore::new(2, StoreErrorKind::Throttling);
        let calls = flaky.calls.clone();
        let store = RetryingStore::with_config(flaky, fast_config());

        store
            .put("Products", json!({"id": "p1", "name": "Rice"}))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let doc = store.get("Products", "p1").await.unwrap().unwrap();
        assert_eq!(doc["name"], "Rice");
    }

    #[tokio::test]
    async fn non_transient_failure_is_not_retried() {
        let flaky = FlakyStore::new(1, StoreErrorKind::Serialization);
        let calls = flaky.calls.clone();
        let store = RetryingStore::with_config(flaky, fast_config());

        let err = store
            .put("Products", json!({"id": "p1"}))
            .await
            .unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::Serialization);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_the_error() {
        let flaky = FlakyStore::new(10, StoreErrorKind::ServiceUnavailable);
        let calls = flaky.calls.clone();
        let store = RetryingStore::with_config(flaky, fast_config());

        let err = store.get("Products", "p1").await.unwrap_err();
        assert!(err.is_transient());
        // 1 initial call + 3 retries
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
