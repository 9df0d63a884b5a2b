//! Integration tests for homelinks

use std::sync::Arc;

use homelinks::builder::{AddLinks, LinkBuilder};
use homelinks::config::Config;
use homelinks::document::{BookmarkDraft, BookmarkPatch, EmptyCategoryPolicy, MoveTarget};
use homelinks::editor::{LinkEditor, SAMPLE_YAML};
use homelinks::enrich::OfflineEnricher;
use homelinks::format::{deserialize, serialize};
use homelinks::reports::render_document;
use homelinks::storage::{KeyValueStore, MemoryStore, SqliteStore};

/// Configuration exported by a homepage dashboard user
const DASHBOARD_YAML: &str = r#"
- Media:
    - Jellyfin:
        - abbr: JF
          href: http://192.168.1.20:8096
          description: "Movies: 4K & HDR"
          icon: jellyfin.png
    - Plex:
        - href: https://app.plex.tv
- Infra:
    - Proxmox:
        - abbr: PX
          href: https://pve.lan:8006
          description: '# hypervisor'
"#;

#[tokio::test]
async fn test_builder_to_editor_workflow() {
    let store = Arc::new(MemoryStore::new());
    let config = Config::default();

    let mut builder = LinkBuilder::open(Arc::clone(&store), OfflineEnricher::default(), &config);
    let report = builder
        .add_links(
            AddLinks::batch("https://github.com\nhttps://www.rust-lang.org\nhttps://github.com")
                .in_category("Dev"),
        )
        .await
        .unwrap();
    assert_eq!(report.added.len(), 3);
    assert_eq!(builder.deduplicate().len(), 1);

    let yaml = builder.export_yaml();
    let mut editor = LinkEditor::load(&yaml).unwrap();
    assert_eq!(editor.document(), builder.document());

    editor
        .add_bookmark(0, BookmarkDraft::new("Crates", "https://crates.io"))
        .unwrap();
    editor.move_bookmark(0, 2, 0, MoveTarget::Onto(0)).unwrap();
    let names: Vec<_> = editor.document().categories()[0]
        .entries
        .iter()
        .map(|b| b.name.as_str())
        .collect();
    assert_eq!(names, ["Crates", "github.com", "www.rust-lang.org"]);

    builder.import_yaml(&editor.export_yaml()).unwrap();
    assert_eq!(builder.document().total_bookmarks(), 3);

    let reopened = LinkBuilder::open(store, OfflineEnricher::default(), &config);
    assert_eq!(reopened.document(), builder.document());
}

#[test]
fn test_dashboard_configuration_round_trip() {
    let document = deserialize(DASHBOARD_YAML).unwrap();

    let jellyfin = document.bookmark(0, 0).unwrap();
    assert_eq!(jellyfin.url, "http://192.168.1.20:8096");
    assert_eq!(jellyfin.description, "Movies: 4K & HDR");
    assert_eq!(jellyfin.icon.as_deref(), Some("jellyfin.png"));

    let plex = document.bookmark(0, 1).unwrap();
    assert_eq!(plex.abbr, "AP");
    assert_eq!(plex.description, "app.plex.tv");
    assert_eq!(plex.icon, None);

    assert_eq!(document.bookmark(1, 0).unwrap().description, "# hypervisor");

    let text = serialize(&document);
    let reparsed = deserialize(&text).unwrap();
    assert_eq!(reparsed, document);
    assert_eq!(serialize(&reparsed), text);
}

#[test]
fn test_editor_session_against_sample() {
    let mut editor = LinkEditor::load(SAMPLE_YAML).unwrap();

    let patch = BookmarkPatch {
        abbr: Some("gh".to_string()),
        ..Default::default()
    };
    editor.edit_bookmark(0, 0, &patch).unwrap();
    assert_eq!(editor.document().bookmark(0, 0).unwrap().abbr, "GH");
    assert!(!editor.has_changes());

    editor.delete_bookmark(2, 0).unwrap();
    editor.delete_bookmark(2, 0).unwrap();
    assert!(editor.has_changes());
    assert_eq!(editor.document().categories().len(), 3);
    assert_eq!(editor.document().policy(), EmptyCategoryPolicy::KeepEmpty);

    let listing = render_document(editor.document());
    assert!(listing.contains("[2] Productivity (0)"));

    editor.reset();
    assert_eq!(editor.document().total_bookmarks(), 7);
}

#[test]
fn test_sqlite_store_holds_builder_layout() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("store.db")).unwrap();
    store
        .set(
            "homepageBookmarks",
            r#"[["Tools",[{"url":"https://docs.rs","title":"Docs.rs","category":"Tools","favicon":"https://docs.rs/favicon.ico","abbr":"DO","id":1.5,"description":"docs.rs"}]]]"#,
        )
        .unwrap();

    let builder = LinkBuilder::open(store, OfflineEnricher::default(), &Config::default());
    let docs = builder.document().bookmark(0, 0).unwrap();
    assert_eq!(docs.name, "Docs.rs");
    assert_eq!(docs.icon.as_deref(), Some("https://docs.rs/favicon.ico"));
    assert!(builder.export_yaml().contains("icon: https://docs.rs/favicon.ico"));
}
