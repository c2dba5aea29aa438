//! Persistence gateway
//!
//! [`Gateway`] owns an injected [`Backend`] handle and enforces the write rules
//! every collection shares: column allow-lists, tag parsing and the
//! update-if-id-else-insert choice. Reads degrade per collection; writes
//! propagate the backend error untouched.

mod memory;
mod rest;

pub use memory::MemoryBackend;
pub use rest::RestBackend;
pub(crate) use rest::extract_message;

use crate::category::{allowed_columns, Category, FOLDERS_TABLE};
use crate::error::GatewayError;
use crate::folders::Folder;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

/// Sort order for a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

impl Order {
    pub const NEWEST_FIRST: Order = Order {
        column: "created_at",
        ascending: false,
    };
    pub const BY_NAME: Order = Order {
        column: "name",
        ascending: true,
    };
}

/// Row-level operations against the hosted collections.
pub trait Backend {
    fn select(&self, table: &str, order: Order) -> Result<Vec<Value>, GatewayError>;
    fn insert(&self, table: &str, row: Map<String, Value>) -> Result<(), GatewayError>;
    fn update(&self, table: &str, id: &str, row: Map<String, Value>) -> Result<(), GatewayError>;
    fn delete(&self, table: &str, id: &str) -> Result<(), GatewayError>;

    /// Short description for status lines and logs.
    fn describe(&self) -> String;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn select(&self, table: &str, order: Order) -> Result<Vec<Value>, GatewayError> {
        (**self).select(table, order)
    }

    fn insert(&self, table: &str, row: Map<String, Value>) -> Result<(), GatewayError> {
        (**self).insert(table, row)
    }

    fn update(&self, table: &str, id: &str, row: Map<String, Value>) -> Result<(), GatewayError> {
        (**self).update(table, id, row)
    }

    fn delete(&self, table: &str, id: &str) -> Result<(), GatewayError> {
        (**self).delete(table, id)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Split a comma-separated tag string into trimmed, non-empty tags.
///
/// Order and duplicates are kept; no case folding.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reduce a form payload to the columns `table` accepts.
pub fn clean_row(table: &str, data: &Map<String, Value>) -> Result<Map<String, Value>, GatewayError> {
    let allowed =
        allowed_columns(table).ok_or_else(|| GatewayError::UnknownTable(table.to_string()))?;

    let tags: Vec<Value> = match (data.get("tags_string"), data.get("tags")) {
        (Some(Value::String(s)), _) => parse_tags(s).into_iter().map(Value::String).collect(),
        (Some(Value::Null), _) => Vec::new(),
        (_, Some(Value::Array(existing))) => existing.clone(),
        _ => Vec::new(),
    };

    let mut clean = Map::new();
    for col in allowed {
        match *col {
            "tags" => {
                clean.insert("tags".to_string(), Value::Array(tags.clone()));
            }
            "folder_id" => match data.get("folder_id") {
                Some(Value::String(s)) if s.is_empty() => {
                    clean.insert("folder_id".to_string(), Value::Null);
                }
                Some(v) => {
                    clean.insert("folder_id".to_string(), v.clone());
                }
                None => {}
            },
            name => {
                if let Some(v) = data.get(name) {
                    clean.insert(name.to_string(), v.clone());
                }
            }
        }
    }
    Ok(clean)
}

pub struct Gateway<B> {
    backend: B,
}

impl<B: Backend> Gateway<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch every category, newest first. A failing category comes back empty.
    pub fn list_all(&self) -> BTreeMap<Category, Vec<Value>> {
        let mut results = BTreeMap::new();
        for category in Category::ALL {
            let rows = match self.backend.select(category.table(), Order::NEWEST_FIRST) {
                Ok(rows) => {
                    debug!(table = category.table(), rows = rows.len(), "loaded collection");
                    rows
                }
                Err(e) => {
                    warn!(table = category.table(), error = %e, "failed to load collection");
                    Vec::new()
                }
            };
            results.insert(category, rows);
        }
        results
    }

    /// Insert, or update when `id` is given.
    pub fn save(
        &self,
        category: Category,
        data: &Map<String, Value>,
        id: Option<&str>,
    ) -> Result<(), GatewayError> {
        let table = category.table();
        let row = clean_row(table, data)?;
        info!(table, id = id.unwrap_or("<new>"), columns = row.len(), "saving record");

        let result = match id {
            Some(id) => self.backend.update(table, id, row),
            None => self.backend.insert(table, row),
        };
        result.map_err(|e| {
            error!(table, error = %e, "save failed");
            e
        })
    }

    pub fn delete(&self, category: Category, id: &str) -> Result<(), GatewayError> {
        let table = category.table();
        info!(table, id, "deleting record");
        self.backend.delete(table, id).map_err(|e| {
            error!(table, id, error = %e, "delete failed");
            e
        })
    }

    /// All folders ordered by name. Failures degrade to an empty list.
    pub fn list_folders(&self) -> Vec<Folder> {
        let rows = match self.backend.select(FOLDERS_TABLE, Order::BY_NAME) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "failed to load folders");
                return Vec::new();
            }
        };
        rows.into_iter()
            .filter_map(|row| match serde_json::from_value::<Folder>(row) {
                Ok(f) => Some(f),
                Err(e) => {
                    warn!(error = %e, "skipping malformed folder row");
                    None
                }
            })
            .collect()
    }

    /// Create a top-level folder. `name` must already be validated.
    pub fn create_folder(&self, category: Category, name: &str) -> Result<(), GatewayError> {
        info!(category = category.table(), name, "creating folder");
        let row = json!({ "category": category.table(), "name": name, "parent_id": null });
        self.backend.insert(FOLDERS_TABLE, into_map(row))
    }

    pub fn rename_folder(&self, id: &str, name: &str) -> Result<(), GatewayError> {
        info!(id, name, "renaming folder");
        self.backend
            .update(FOLDERS_TABLE, id, into_map(json!({ "name": name })))
    }

    /// Remove the folder row only; records keep their `folder_id`.
    pub fn delete_folder(&self, id: &str) -> Result<(), GatewayError> {
        info!(id, "deleting folder");
        self.backend.delete(FOLDERS_TABLE, id)
    }
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(v: Value) -> Map<String, Value> {
        into_map(v)
    }

    #[test]
    fn test_parse_tags_keeps_order_and_duplicates() {
        assert_eq!(parse_tags("a, b, ,a"), vec!["a", "b", "a"]);
        assert_eq!(parse_tags("  Trailer ,trailer"), vec!["Trailer", "trailer"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_clean_row_strips_unknown_columns() {
        let data = obj(json!({
            "nome": "Epic", "link_audio": "https://a", "tags_string": "x, y",
            "id": "hijack", "created_at": "2020-01-01", "personagem": "nope", "extra": 1
        }));
        let row = clean_row("musicas", &data).unwrap();
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        for key in &keys {
            assert!(allowed_columns("musicas").unwrap().contains(key), "{} leaked", key);
        }
        assert_eq!(row["tags"], json!(["x", "y"]));
        assert!(!row.contains_key("folder_id"));
    }

    #[test]
    fn test_clean_row_folder_and_existing_tags() {
        let row = clean_row("sfx", &obj(json!({"folder_id": "", "tags": ["keep"]}))).unwrap();
        assert_eq!(row["folder_id"], Value::Null);
        assert_eq!(row["tags"], json!(["keep"]));

        let row = clean_row("sfx", &obj(json!({"folder_id": "f1", "tags_string": "", "tags": ["old"]}))).unwrap();
        assert_eq!(row["folder_id"], json!("f1"));
        assert_eq!(row["tags"], json!([]));
    }

    #[test]
    fn test_clean_row_unknown_table() {
        let err = clean_row("nope", &Map::new()).unwrap_err();
        assert!(matches!(err, GatewayError::UnknownTable(t) if t == "nope"));
    }

    #[test]
    fn test_list_all_isolates_failures() {
        let backend = MemoryBackend::new();
        backend.seed(Category::Music.table(), vec![json!({"nome": "Epic"})]);
        backend.seed(Category::Sfx.table(), vec![json!({"nome": "Whoosh"})]);
        backend.fail_reads(Category::Music.table(), "permission denied");
        let gw = Gateway::new(backend);

        let all = gw.list_all();
        assert_eq!(all.len(), 9);
        assert!(all[&Category::Music].is_empty());
        assert_eq!(all[&Category::Sfx].len(), 1);
    }

    #[test]
    fn test_save_propagates_backend_error_verbatim() {
        let backend = MemoryBackend::new();
        backend.fail_writes("duplicate key value violates unique constraint");
        let gw = Gateway::new(backend);
        let err = gw
            .save(Category::Sfx, &obj(json!({"nome": "x"})), None)
            .unwrap_err();
        assert_eq!(err.to_string(), "duplicate key value violates unique constraint");
    }

    #[test]
    fn test_save_inserts_then_updates() {
        let gw = Gateway::new(MemoryBackend::new());
        gw.save(Category::Sfx, &obj(json!({"nome": "a", "tags_string": "t"})), None)
            .unwrap();
        let rows = gw.backend().rows(Category::Sfx.table());
        let id = rows[0]["id"].as_str().unwrap().to_string();

        gw.save(Category::Sfx, &obj(json!({"nome": "b"})), Some(&id)).unwrap();
        let rows = gw.backend().rows(Category::Sfx.table());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["nome"], json!("b"));
        assert_eq!(rows[0]["tags"], json!([]));
    }

    #[test]
    fn test_folders_sorted_by_name_and_degrade() {
        let gw = Gateway::new(MemoryBackend::new());
        gw.create_folder(Category::Music, "Zeta").unwrap();
        gw.create_folder(Category::Music, "Alpha").unwrap();
        let names: Vec<String> = gw.list_folders().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);

        gw.backend().fail_reads(FOLDERS_TABLE, "boom");
        assert!(gw.list_folders().is_empty());
    }
}
