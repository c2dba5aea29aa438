//! In-process backend
//!
//! Keeps every collection in memory. Used by the test-suite and by `--demo`,
//! with switches to make reads or writes fail on demand.

use super::{Backend, Order};
use crate::category::{Category, FOLDERS_TABLE};
use crate::error::GatewayError;
use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use serde_json::{json, Map, Value};
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

pub struct MemoryBackend {
    tables: RefCell<BTreeMap<String, Vec<Map<String, Value>>>>,
    next_id: Cell<u64>,
    clock: Cell<DateTime<Utc>>,
    read_failures: RefCell<HashMap<String, String>>,
    write_failure: RefCell<Option<String>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_key(row: &Map<String, Value>, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => format!("{:>20}", n),
        _ => String::new(),
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            tables: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
            clock: Cell::new(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().unwrap_or_default()),
            read_failures: RefCell::new(HashMap::new()),
            write_failure: RefCell::new(None),
        }
    }

    fn tick(&self) -> String {
        let now = self.clock.get() + Duration::minutes(1);
        self.clock.set(now);
        now.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    fn fresh_id(&self) -> String {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id.to_string()
    }

    fn stamp(&self, mut row: Map<String, Value>) -> Map<String, Value> {
        if !row.contains_key("id") {
            row.insert("id".to_string(), Value::String(self.fresh_id()));
        }
        if !row.contains_key("created_at") {
            row.insert("created_at".to_string(), Value::String(self.tick()));
        }
        row
    }

    /// Load rows as-is, filling in `id` and `created_at` when missing.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let stamped: Vec<_> = rows
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(self.stamp(map)),
                _ => None,
            })
            .collect();
        self.tables
            .borrow_mut()
            .entry(table.to_string())
            .or_default()
            .extend(stamped);
    }

    /// Current rows of `table`, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .borrow()
            .get(table)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    /// Make every select on `table` fail with `message`.
    pub fn fail_reads(&self, table: &str, message: &str) {
        self.read_failures
            .borrow_mut()
            .insert(table.to_string(), message.to_string());
    }

    /// Make every write fail with `message`.
    pub fn fail_writes(&self, message: &str) {
        *self.write_failure.borrow_mut() = Some(message.to_string());
    }

    pub fn clear_failures(&self) {
        self.read_failures.borrow_mut().clear();
        *self.write_failure.borrow_mut() = None;
    }

    fn check_write(&self) -> Result<(), GatewayError> {
        match self.write_failure.borrow().as_ref() {
            Some(message) => Err(GatewayError::Backend {
                status: Some(400),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    /// A small library covering every category, with folders and related
    /// deepfake / voice / original entries.
    pub fn demo() -> Self {
        let backend = Self::new();
        backend.seed(
            FOLDERS_TABLE,
            vec![
                json!({"id": "f-hooks", "category": "musicas", "name": "Hooks", "parent_id": null}),
                json!({"id": "f-cta", "category": "musicas", "name": "CTA", "parent_id": null}),
                json!({"id": "f-trans", "category": "sfx", "name": "Transições", "parent_id": null}),
                json!({"id": "f-famosos", "category": "deepfakes", "name": "Famosos", "parent_id": null}),
            ],
        );
        backend.seed(
            Category::OriginalVideos.table(),
            vec![
                json!({"nome_video": "Entrevista Adele 2019", "link_video_original": "https://drive.google.com/file/d/1AdeleOriginalVideoFileId0001/view", "tags": ["Adele", "entrevista"]}),
                json!({"nome_video": "Keynote", "link_video_original": "https://example.com/keynote.mp4", "tags": ["palco"]}),
            ],
        );
        backend.seed(
            Category::VoiceClones.table(),
            vec![
                json!({"voz_nome": "Adele", "duracao": "0:45", "link_minimax": "https://minimax.example/adele", "tags": ["feminina", "britanica"]}),
                json!({"voz_nome": "Locutor Grave", "duracao": "1:10", "link_minimax": "https://minimax.example/locutor", "tags": ["masculina"]}),
            ],
        );
        backend.seed(
            Category::Deepfakes.table(),
            vec![
                json!({"personagem": "Adele", "versao": "Final", "duracao": "0:32", "video_link": "https://drive.google.com/file/d/1AdeleDeepfakeVideoFileId00002/view", "tags": ["vsl", "emocional"], "folder_id": "f-famosos"}),
                json!({"personagem": "Morgan", "versao": "V2", "duracao": "0:58", "video_link": "https://example.com/morgan.mp4", "tags": ["narrador"], "folder_id": null}),
            ],
        );
        backend.seed(
            Category::Tiktok.table(),
            vec![
                json!({"nicho": "Emagrecimento", "tipo": "Hook", "genero": "MULHER", "link_video": "https://example.com/tt1.mp4", "tags": ["viral"]}),
                json!({"nicho": "Finanças", "tipo": "Depoimento", "genero": "HOMEM", "link_video": "https://example.com/tt2.mp4", "tags": []}),
            ],
        );
        backend.seed(
            Category::Music.table(),
            vec![
                json!({"nome": "Epic Rise", "momento_vsl": "Abertura", "emocao": "Urgência", "link_audio": "https://example.com/epic.mp3", "tags": ["trailer"], "folder_id": "f-hooks"}),
                json!({"nome": "Calm Piano", "momento_vsl": "História", "emocao": "Alívio", "link_audio": "https://example.com/piano.mp3", "tags": ["calmo"], "folder_id": null}),
                json!({"nome": "Countdown", "momento_vsl": "CTA", "emocao": "Urgência", "link_audio": "https://example.com/count.mp3", "tags": ["tensao"], "folder_id": "f-cta"}),
            ],
        );
        backend.seed(
            Category::Sfx.table(),
            vec![
                json!({"nome": "Whoosh", "momento_vsl": "Transição", "emocao": "Energia", "link_audio": "https://example.com/whoosh.wav", "tags": ["rapido"], "folder_id": "f-trans"}),
                json!({"momento_vsl": "Impacto", "link_audio": "https://example.com/boom.wav", "tags": [], "folder_id": null}),
            ],
        );
        backend.seed(
            Category::Veo3.table(),
            vec![json!({"produto_insert": "Suplemento X", "dimensao": "9:16", "duracao": "0:08", "link_video": "https://example.com/veo1.mp4", "tags": ["produto"]})],
        );
        backend.seed(
            Category::SocialProof.table(),
            vec![json!({"nicho": "Emagrecimento", "genero": "MULHER", "link_imagem": "https://example.com/print1.png", "tags": ["whatsapp"]})],
        );
        backend.seed(
            Category::UgcTestimonials.table(),
            vec![json!({"genero": "HOMEM", "idade": "ADULTO", "duracao": "0:40", "link_video": "https://example.com/ugc1.mp4", "tags": ["selfie"]})],
        );
        backend
    }
}

impl Backend for MemoryBackend {
    fn select(&self, table: &str, order: Order) -> Result<Vec<Value>, GatewayError> {
        if let Some(message) = self.read_failures.borrow().get(table) {
            return Err(GatewayError::Backend {
                status: Some(500),
                message: message.clone(),
            });
        }
        let mut rows = self.tables.borrow().get(table).cloned().unwrap_or_default();
        rows.sort_by(|a, b| {
            let ord = sort_key(a, order.column).cmp(&sort_key(b, order.column));
            if order.ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        Ok(rows.into_iter().map(Value::Object).collect())
    }

    fn insert(&self, table: &str, row: Map<String, Value>) -> Result<(), GatewayError> {
        self.check_write()?;
        let mut row = row;
        row.remove("id");
        row.remove("created_at");
        let row = self.stamp(row);
        self.tables
            .borrow_mut()
            .entry(table.to_string())
            .or_default()
            .push(row);
        Ok(())
    }

    fn update(&self, table: &str, id: &str, row: Map<String, Value>) -> Result<(), GatewayError> {
        self.check_write()?;
        let mut tables = self.tables.borrow_mut();
        let existing = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| row_id(r) == Some(id)))
            .ok_or_else(|| GatewayError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;
        for (k, v) in row {
            if k != "id" && k != "created_at" {
                existing.insert(k, v);
            }
        }
        Ok(())
    }

    fn delete(&self, table: &str, id: &str) -> Result<(), GatewayError> {
        self.check_write()?;
        let mut tables = self.tables.borrow_mut();
        let rows = tables.entry(table.to_string()).or_default();
        let before = rows.len();
        rows.retain(|r| row_id(r) != Some(id));
        match before.cmp(&rows.len()) {
            Ordering::Equal => Err(GatewayError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn describe(&self) -> String {
        "in-memory demo library".to_string()
    }
}

fn row_id(row: &Map<String, Value>) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}
