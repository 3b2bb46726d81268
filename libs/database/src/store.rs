use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;

use crate::error::StoreError;

/// A stored document. Always a JSON object with a string `id` field.
pub type Document = Value;

/// Comparison operators supported by store filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    BeginsWith,
    Exists,
}

/// Right-hand side of a condition: a literal value or another field of the
/// same document (for filters like `stock <= lowStockAlert`).
#[derive(Debug, Clone)]
pub enum Comparand {
    Value(Value),
    Field(String),
}

/// A declarative filter condition.
///
/// The concrete expression syntax of the store binding (update/filter
/// expressions, BSON filters, ...) is an implementation detail; query layers
/// build conditions and each binding translates them.
#[derive(Debug, Clone)]
pub struct Condition {
    pub field: String,
    pub op: CompareOp,
    pub comparand: Comparand,
}

impl Condition {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: CompareOp::Eq,
            comparand: Comparand::Value(value.into()),
        }
    }

    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: CompareOp::Ge,
            comparand: Comparand::Value(value.into()),
        }
    }

    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: CompareOp::Le,
            comparand: Comparand::Value(value.into()),
        }
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: CompareOp::Gt,
            comparand: Comparand::Value(value.into()),
        }
    }

    pub fn begins_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: CompareOp::BeginsWith,
            comparand: Comparand::Value(Value::String(prefix.into())),
        }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: CompareOp::Exists,
            comparand: Comparand::Value(Value::Null),
        }
    }

    pub fn le_field(field: impl Into<String>, other: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: CompareOp::Le,
            comparand: Comparand::Field(other.into()),
        }
    }

    /// Evaluate this condition against a document.
    pub fn matches(&self, doc: &Document) -> bool {
        let lhs = doc.get(&self.field);

        if self.op == CompareOp::Exists {
            return lhs.is_some_and(|v| !v.is_null());
        }

        let Some(lhs) = lhs else { return false };

        let rhs_owned;
        let rhs = match &self.comparand {
            Comparand::Value(v) => v,
            Comparand::Field(other) => match doc.get(other) {
                Some(v) => {
                    rhs_owned = v.clone();
                    &rhs_owned
                }
                None => return false,
            },
        };

        match self.op {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::BeginsWith => match (lhs.as_str(), rhs.as_str()) {
                (Some(s), Some(prefix)) => s.starts_with(prefix),
                _ => false,
            },
            CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => {
                match compare_values(lhs, rhs) {
                    Some(ord) => match self.op {
                        CompareOp::Lt => ord == Ordering::Less,
                        CompareOp::Le => ord != Ordering::Greater,
                        CompareOp::Gt => ord == Ordering::Greater,
                        CompareOp::Ge => ord != Ordering::Less,
                        _ => unreachable!(),
                    },
                    None => false,
                }
            }
            CompareOp::Exists => unreachable!(),
        }
    }
}

/// Order numbers numerically and strings lexicographically; mixed types do
/// not compare.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Options shared by query and scan reads.
#[derive(Debug, Clone)]
pub struct ReadParams {
    pub filter: Vec<Condition>,
    pub limit: Option<usize>,
    /// Resume after this document id (cursor from a previous page's
    /// `last_evaluated_key`).
    pub exclusive_start_key: Option<String>,
    /// Iterate ids in descending order when false.
    pub scan_forward: bool,
}

impl Default for ReadParams {
    fn default() -> Self {
        Self {
            filter: Vec::new(),
            limit: None,
            exclusive_start_key: None,
            scan_forward: true,
        }
    }
}

impl ReadParams {
    pub fn with_filter(mut self, condition: Condition) -> Self {
        self.filter.push(condition);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_start_key(mut self, key: Option<String>) -> Self {
        self.exclusive_start_key = key;
        self
    }

    pub fn descending(mut self) -> Self {
        self.scan_forward = false;
        self
    }
}

/// Normalized result envelope for query and scan operations.
#[derive(Debug, Clone, Default)]
pub struct QueryOutput {
    pub items: Vec<Document>,
    pub count: usize,
    pub scanned_count: usize,
    /// Cursor for the next page; `None` when the read reached the end.
    pub last_evaluated_key: Option<String>,
}

/// Operations every document store binding provides.
///
/// Collections are named tables of JSON documents keyed by a string `id`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Full overwrite put. The item must carry a string `id` field.
    async fn put(&self, collection: &str, item: Document) -> Result<(), StoreError>;

    /// Partial update: every entry of `fields` becomes one assignment on the
    /// stored document; the merged document is returned. Upserts when the id
    /// is absent, as the managed store does.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: serde_json::Map<String, Value>,
    ) -> Result<Document, StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Indexed read: documents matching the `key` equality condition, then
    /// filtered by `params.filter`.
    async fn query(
        &self,
        collection: &str,
        key: Condition,
        params: ReadParams,
    ) -> Result<QueryOutput, StoreError>;

    /// Full-collection read with optional filters and cursor pagination.
    async fn scan(&self, collection: &str, params: ReadParams) -> Result<QueryOutput, StoreError>;

    async fn batch_get(
        &self,
        collection: &str,
        ids: &[String],
    ) -> Result<Vec<Document>, StoreError>;

    async fn batch_write(&self, collection: &str, items: Vec<Document>) -> Result<(), StoreError>;
}

/// Extract the required string id from a document.
pub(crate) fn document_id(item: &Document) -> Result<String, StoreError> {
    item.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StoreError::serialization("document is missing a string 'id' field"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn eq_and_begins_with() {
        let doc = json!({"id": "p1", "name": "Organic Tomatoes", "categoryId": "cat_1"});

        assert!(Condition::eq("categoryId", "cat_1").matches(&doc));
        assert!(!Condition::eq("categoryId", "cat_2").matches(&doc));
        assert!(Condition::begins_with("name", "Organic").matches(&doc));
        assert!(!Condition::begins_with("name", "Tomato").matches(&doc));
    }

    #[test]
    fn numeric_ordering() {
        let doc = json!({"id": "p1", "basePrice": 49.5});

        assert!(Condition::ge("basePrice", 40).matches(&doc));
        assert!(Condition::le("basePrice", 49.5).matches(&doc));
        assert!(!Condition::gt("basePrice", 49.5).matches(&doc));
    }

    #[test]
    fn field_to_field_comparison() {
        let low = json!({"id": "p1", "stock": 3, "lowStockAlert": 5});
        let ok = json!({"id": "p2", "stock": 50, "lowStockAlert": 5});

        let cond = Condition::le_field("stock", "lowStockAlert");
        assert!(cond.matches(&low));
        assert!(!cond.matches(&ok));
    }

    #[test]
    fn exists_ignores_null() {
        let rated = json!({"id": "p1", "rating": 4.2});
        let unrated = json!({"id": "p2"});
        let null_rated = json!({"id": "p3", "rating": null});

        let cond = Condition::exists("rating");
        assert!(cond.matches(&rated));
        assert!(!cond.matches(&unrated));
        assert!(!cond.matches(&null_rated));
    }

    #[test]
    fn mixed_types_never_order() {
        let doc = json!({"id": "p1", "stock": "many"});
        assert!(!Condition::ge("stock", 5).matches(&doc));
    }
}
