//! Integration tests for bhhub
//!
//! End-to-end flows through `Session` over the in-memory backend.

use bhhub::category::{Category, FOLDERS_TABLE};
use bhhub::error::{GatewayError, SessionError};
use bhhub::filter::Scope;
use bhhub::folders::{ActiveFolder, FolderMode, FolderRef};
use bhhub::gateway::MemoryBackend;
use bhhub::session::{RelatedTarget, Session};
use serde_json::{json, Map, Value};

/// Two music folders (A, B) and one record in each plus one unfiled.
fn music_library() -> Session<MemoryBackend> {
    let backend = MemoryBackend::new();
    backend.seed(
        FOLDERS_TABLE,
        vec![
            json!({"id": "fa", "category": "musicas", "name": "A", "parent_id": null}),
            json!({"id": "fb", "category": "musicas", "name": "B", "parent_id": null}),
        ],
    );
    backend.seed(
        Category::Music.table(),
        vec![
            json!({"id": "r1", "nome": "Epic Rise", "link_audio": "https://x/1.mp3", "tags": [], "folder_id": "fa"}),
            json!({"id": "r2", "nome": "Epic Fall", "link_audio": "https://x/2.mp3", "tags": [], "folder_id": "fb"}),
            json!({"id": "r3", "nome": "Calm Piano", "link_audio": "https://x/3.mp3", "tags": [], "folder_id": null}),
        ],
    );
    let mut session = Session::open(backend);
    session.select_scope(Scope::Category(Category::Music));
    session
}

fn visible_ids(session: &Session<MemoryBackend>) -> Vec<String> {
    session.visible_assets().iter().map(|a| a.id.clone()).collect()
}

fn draft(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[test]
fn test_folder_visibility_is_exclusive() {
    let mut session = music_library();

    session.open_folder(FolderRef::Id("fa".to_string())).unwrap();
    assert_eq!(visible_ids(&session), vec!["r1"]);

    session.open_folder(FolderRef::Id("fb".to_string())).unwrap();
    assert_eq!(visible_ids(&session), vec!["r2"]);

    session.open_folder(FolderRef::Raw).unwrap();
    assert_eq!(visible_ids(&session), vec!["r3"]);
}

#[test]
fn test_open_folder_of_other_category_is_rejected() {
    let mut session = music_library();
    session.select_scope(Scope::Category(Category::Sfx));
    let err = session.open_folder(FolderRef::Id("fa".to_string())).unwrap_err();
    assert!(matches!(err, SessionError::FolderNotFound(_)));
}

#[test]
fn test_deleting_open_folder_returns_to_root_and_orphans_records() {
    let mut session = music_library();
    session.open_folder(FolderRef::Id("fa".to_string())).unwrap();

    assert!(session.delete_folder("fa", |_| true).unwrap());

    assert_eq!(session.view().active_folder, ActiveFolder::Root);
    assert_eq!(session.view().folder_mode, FolderMode::Folders);
    assert!(session.folders().iter().all(|f| f.id != "fa"));

    // The record keeps its stale folder id.
    let r1 = session.find_asset(Category::Music, "r1").unwrap();
    assert_eq!(r1.record.folder_id.as_deref(), Some("fa"));

    let listing = session.root_listing();
    let names: Vec<&str> = listing.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Raw Assets", "Orphaned", "B"]);
    assert_eq!(session.count_in_folder(&FolderRef::Raw), 1);
    assert_eq!(session.count_in_folder(&FolderRef::Orphaned), 1);
}

#[test]
fn test_declined_folder_delete_has_no_effect() {
    let mut session = music_library();
    let before = session.folders().to_vec();
    assert!(!session.delete_folder("fa", |_| false).unwrap());
    assert_eq!(session.folders(), before.as_slice());
}

#[test]
fn test_tag_string_is_split_on_save() {
    let mut session = music_library();
    session
        .save_record(
            Category::Music,
            &draft(json!({"nome": "Tagged", "link_audio": "https://x/t.mp3", "tags_string": "a, b, ,a"})),
            None,
        )
        .unwrap();

    let rows = session.gateway().backend().rows(Category::Music.table());
    let stored = rows.iter().find(|r| r["nome"] == "Tagged").unwrap();
    assert_eq!(stored["tags"], json!(["a", "b", "a"]));

    let asset = session
        .assets()
        .iter()
        .find(|a| a.title == "Tagged")
        .unwrap();
    assert_eq!(asset.tags, vec!["a", "b", "a"]);
}

#[test]
fn test_unknown_columns_are_not_written() {
    let mut session = music_library();
    session
        .save_record(
            Category::Music,
            &draft(json!({
                "nome": "Clean",
                "link_audio": "https://x/c.mp3",
                "bogus": "x",
                "created_at": "2020-01-01T00:00:00Z",
                "folder_id": ""
            })),
            None,
        )
        .unwrap();

    let rows = session.gateway().backend().rows(Category::Music.table());
    let stored = rows.iter().find(|r| r["nome"] == "Clean").unwrap();
    assert!(stored.get("bogus").is_none());
    assert!(stored.get("tags_string").is_none());
    assert_eq!(stored["folder_id"], Value::Null);
    assert_ne!(stored["created_at"], "2020-01-01T00:00:00Z");
}

#[test]
fn test_edit_updates_in_place() {
    let mut session = music_library();
    let mut edit = session.snapshot().find(Category::Music, "r3").unwrap().to_draft();
    edit.insert("emocao".to_string(), json!("Alívio"));
    session.save_record(Category::Music, &edit, Some("r3")).unwrap();

    let r3 = session.snapshot().find(Category::Music, "r3").unwrap();
    assert_eq!(r3.column("emocao"), Some("Alívio"));
    assert_eq!(session.snapshot().records(Category::Music).len(), 3);
}

#[test]
fn test_category_fetch_failure_is_isolated() {
    let backend = MemoryBackend::demo();
    backend.fail_reads(Category::Music.table(), "permission denied");
    let session = Session::open(backend);

    assert!(session.snapshot().records(Category::Music).is_empty());
    assert!(!session.snapshot().records(Category::Deepfakes).is_empty());
    assert!(!session.snapshot().records(Category::Sfx).is_empty());
}

#[test]
fn test_back_restores_view_exactly() {
    let mut session = Session::open(MemoryBackend::demo());
    session.select_scope(Scope::Category(Category::Deepfakes));
    session.set_search("ade");
    session.set_filter("versao", "Final").unwrap();
    let saved = session.view().clone();

    let adele = session.visible_assets()[0].clone();
    session.follow_related(&adele, RelatedTarget::Voice);
    assert_eq!(session.view().scope, Scope::Category(Category::VoiceClones));
    assert_eq!(session.view().search, adele.title);
    assert!(!session.visible_assets().is_empty());

    assert!(session.back());
    assert_eq!(session.view(), &saved);
    assert!(!session.back());
}

#[test]
fn test_sidebar_selection_drops_history() {
    let mut session = Session::open(MemoryBackend::demo());
    session.select_scope(Scope::Category(Category::Deepfakes));
    let adele = session.visible_assets()[0].clone();
    session.follow_related(&adele, RelatedTarget::Original);
    session.follow_related(&adele, RelatedTarget::Voice);
    assert_eq!(session.history().depth(), 2);

    session.select_scope(Scope::All);
    assert_eq!(session.history().depth(), 0);
    assert!(session.view().search.is_empty());
}

#[test]
fn test_failed_write_leaves_state_unchanged() {
    let mut session = music_library();
    session.gateway().backend().fail_writes("new row violates row-level security policy");
    let assets = session.assets().to_vec();
    let folders = session.folders().to_vec();

    let err = session
        .save_record(
            Category::Music,
            &draft(json!({"nome": "Nope", "link_audio": "https://x/n.mp3"})),
            None,
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "new row violates row-level security policy");
    assert!(matches!(err, SessionError::Gateway(GatewayError::Backend { .. })));

    assert!(session.delete_record(Category::Music, "r1", |_| true).is_err());
    assert!(session.create_folder("C").is_err());

    assert_eq!(session.assets(), assets.as_slice());
    assert_eq!(session.folders(), folders.as_slice());
}

#[test]
fn test_validation_runs_before_backend() {
    let mut session = music_library();
    session.gateway().backend().fail_writes("should not be reached");
    let err = session
        .save_record(Category::Music, &draft(json!({"nome": "  "})), None)
        .unwrap_err();
    assert!(matches!(err, SessionError::Validation(_)));
    assert!(err.to_string().contains("link_audio"));
}

#[test]
fn test_declined_record_delete_has_no_effect() {
    let mut session = music_library();
    let rows = session.gateway().backend().rows(Category::Music.table());
    assert!(!session.delete_record(Category::Music, "r1", |_| false).unwrap());
    assert_eq!(session.gateway().backend().rows(Category::Music.table()), rows);
    assert!(session.find_asset(Category::Music, "r1").is_some());
}

#[test]
fn test_folder_counts_never_grow_with_stricter_search() {
    let mut session = music_library();
    let loose = session.root_listing();

    session.set_search("epic");
    let strict = session.root_listing();
    for entry in &strict {
        let before = loose
            .iter()
            .find(|e| e.folder == entry.folder)
            .map(|e| e.count)
            .unwrap_or(0);
        assert!(entry.count <= before, "{} grew", entry.name);
    }
    // Calm Piano no longer matches, so Raw disappears.
    assert!(strict.iter().all(|e| e.folder != FolderRef::Raw));
}

#[test]
fn test_rename_folder_cancel_is_noop() {
    let mut session = music_library();
    assert!(!session.rename_folder("fa", None).unwrap());
    assert!(session.rename_folder("fa", Some("  Hooks  ")).unwrap());
    let fa = session.folders().iter().find(|f| f.id == "fa").unwrap();
    assert_eq!(fa.name, "Hooks");
}

#[test]
fn test_foreign_and_nested_folder_references_stay_listed() {
    let backend = MemoryBackend::new();
    backend.seed(
        FOLDERS_TABLE,
        vec![
            json!({"id": "fa", "category": "musicas", "name": "A", "parent_id": null}),
            json!({"id": "nested", "category": "musicas", "name": "Inner", "parent_id": "fa"}),
            json!({"id": "fs", "category": "sfx", "name": "Hits", "parent_id": null}),
        ],
    );
    backend.seed(
        Category::Music.table(),
        vec![
            json!({"id": "m1", "nome": "Borrowed", "link_audio": "https://x/1.mp3", "tags": [], "folder_id": "fs"}),
            json!({"id": "m2", "nome": "Deep", "link_audio": "https://x/2.mp3", "tags": [], "folder_id": "nested"}),
            json!({"id": "m3", "nome": "Home", "link_audio": "https://x/3.mp3", "tags": [], "folder_id": "fa"}),
        ],
    );
    let mut session = Session::open(backend);
    session.select_scope(Scope::Category(Category::Music));

    for folder in ["fs", "nested"] {
        let err = session
            .save_record(
                Category::Music,
                &draft(json!({"nome": "New", "link_audio": "https://x/n.mp3", "folder_id": folder})),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, SessionError::FolderNotFound(_)));
    }
    assert_eq!(session.snapshot().records(Category::Music).len(), 3);

    let visible = session.visible_assets().len();
    let listing = session.root_listing();
    let listed: usize = listing.iter().map(|e| e.count).sum();
    assert_eq!(visible, listed);
    assert_eq!(session.count_in_folder(&FolderRef::Orphaned), 2);

    session.open_folder(FolderRef::Orphaned).unwrap();
    let mut ids = visible_ids(&session);
    ids.sort();
    assert_eq!(ids, vec!["m1", "m2"]);
}
