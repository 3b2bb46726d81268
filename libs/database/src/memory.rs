use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{document_id, Condition, Document, DocumentStore, QueryOutput, ReadParams};

/// In-memory document store for development and testing.
///
/// Collections are id-ordered maps, so cursor pagination is deterministic:
/// `last_evaluated_key` is the id of the last examined document and
/// `exclusive_start_key` resumes strictly after it.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<String, BTreeMap<String, Document>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_page(
        collection: &BTreeMap<String, Document>,
        key: Option<&Condition>,
        params: &ReadParams,
    ) -> QueryOutput {
        let ids: Vec<&String> = if params.scan_forward {
            collection.keys().collect()
        } else {
            collection.keys().rev().collect()
        };

        let mut started = params.exclusive_start_key.is_none();
        let mut items = Vec::new();
        let mut scanned = 0usize;
        let mut last_key = None;
        let mut exhausted = true;

        for id in ids {
            if !started {
                if Some(id.as_str()) == params.exclusive_start_key.as_deref() {
                    started = true;
                }
                continue;
            }

            let doc = &collection[id];

            // Key condition narrows the examined set, as an index would.
            if let Some(key) = key {
                if !key.matches(doc) {
                    continue;
                }
            }

            scanned += 1;
            last_key = Some(id.clone());

            if params.filter.iter().all(|c| c.matches(doc)) {
                items.push(doc.clone());
            }

            if let Some(limit) = params.limit {
                if items.len() >= limit {
                    exhausted = false;
                    break;
                }
            }
        }

        QueryOutput {
            count: items.len(),
            scanned_count: scanned,
            last_evaluated_key: if exhausted { None } else { last_key },
            items,
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|c| c.get(id))
            .cloned())
    }

    async fn put(&self, collection: &str, item: Document) -> Result<(), StoreError> {
        let id = document_id(&item)?;
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, item);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: serde_json::Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().await;
        let table = collections.entry(collection.to_string()).or_default();

        let doc = table
            .entry(id.to_string())
            .or_insert_with(|| serde_json::json!({ "id": id }));

        let obj = doc
            .as_object_mut()
            .ok_or_else(|| StoreError::serialization("stored document is not an object"))?;
        for (field, value) in fields {
            obj.insert(field, value);
        }

        Ok(doc.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        if let Some(table) = collections.get_mut(collection) {
            table.remove(id);
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        key: Condition,
        params: ReadParams,
    ) -> Result<QueryOutput, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|c| Self::read_page(c, Some(&key), &params))
            .unwrap_or_default())
    }

    async fn scan(&self, collection: &str, params: ReadParams) -> Result<QueryOutput, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|c| Self::read_page(c, None, &params))
            .unwrap_or_default())
    }

    async fn batch_get(
        &self,
        collection: &str,
        ids: &[String],
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(table) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(ids.iter().filter_map(|id| table.get(id).cloned()).collect())
    }

    async fn batch_write(&self, collection: &str, items: Vec<Document>) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let table = collections.entry(collection.to_string()).or_default();
        for item in items {
            let id = document_id(&item)?;
            table.insert(id, item);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_get_delete_roundtrip() {
        let store = InMemoryStore::new();
        store
            .put("Products", json!({"id": "p1", "name": "Milk"}))
            .await
            .unwrap();

        let doc = store.get("Products", "p1").await.unwrap().unwrap();
        assert_eq!(doc["name"], "Milk");

        store.delete("Products", "p1").await.unwrap();
        assert!(store.get("Products", "p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_without_id_is_rejected() {
        let store = InMemoryStore::new();
        let err = store
            .put("Products", json!({"name": "anonymous"}))
            .await
            .unwrap_err();
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn update_merges_fields_and_returns_document() {
        let store = InMemoryStore::new();
        store
            .put("Products", json!({"id": "p1", "stock": 10, "status": "in-stock"}))
            .await
            .unwrap();

        let mut fields = serde_json::Map::new();
        fields.insert("stock".into(), json!(0));
        fields.insert("status".into(), json!("out-of-stock"));

        let updated = store.update("Products", "p1", fields).await.unwrap();
        assert_eq!(updated["stock"], 0);
        assert_eq!(updated["status"], "out-of-stock");
        // untouched field survives
        assert_eq!(updated["id"], "p1");
    }

    #[tokio::test]
    async fn query_filters_by_key_condition() {
        let store = InMemoryStore::new();
        for (id, cat) in [("p1", "cat_1"), ("p2", "cat_2"), ("p3", "cat_1")] {
            store
                .put("Products", json!({"id": id, "categoryId": cat}))
                .await
                .unwrap();
        }

        let out = store
            .query(
                "Products",
                Condition::eq("categoryId", "cat_1"),
                ReadParams::default(),
            )
            .await
            .unwrap();

        assert_eq!(out.count, 2);
        assert!(out.last_evaluated_key.is_none());
    }

    #[tokio::test]
    async fn scan_paginates_with_cursor() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store
                .put("Products", json!({"id": format!("p{}", i)}))
                .await
                .unwrap();
        }

        let first = store
            .scan("Products", ReadParams::default().with_limit(2))
            .await
            .unwrap();
        assert_eq!(first.count, 2);
        let cursor = first.last_evaluated_key.clone().unwrap();

        let second = store
            .scan(
                "Products",
                ReadParams::default().with_limit(10).with_start_key(Some(cursor)),
            )
            .await
            .unwrap();
        assert_eq!(second.count, 3);
        assert!(second.last_evaluated_key.is_none());

        let mut ids: Vec<String> = first
            .items
            .iter()
            .chain(second.items.iter())
            .map(|d| d["id"].as_str().unwrap().to_string())
            .collect();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn batch_write_and_get() {
        let store = InMemoryStore::new();
        store
            .batch_write(
                "Products",
                vec![json!({"id": "a"}), json!({"id": "b"}), json!({"id": "c"})],
            )
            .await
            .unwrap();

        let docs = store
            .batch_get("Products", &["a".into(), "c".into(), "missing".into()])
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);
    }
}
