use pretty_assertions::assert_eq;
use studymd::nav::{Direction, Navigator, ThemeMode, THEME_KEY, VISITED_KEY};
use studymd::parse_guide;
use studymd::store::{FileStore, KeyValueStore};

const GUIDE: &str = "\
# Systems Design

Start with the overview.

## 2. Caching

Write-through versus write-back.

```md
## 9. Not a section
```

## 1. Queues

Backpressure.

## Quick Reference

Latency numbers.
";

#[test]
fn sections_keep_document_order_and_skip_fenced_headings() {
    let guide = parse_guide(GUIDE);
    assert_eq!(guide.title.as_deref(), Some("Systems Design"));

    let ids: Vec<&str> = guide.sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["intro", "section-2", "section-1", "quick-ref"]);
    let caching = &guide.sections[1];
    assert_eq!(caching.title, "2. Caching");
    assert!(caching.content.contains("## 9. Not a section"));
}

#[test]
fn progress_and_theme_survive_reopening_the_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    {
        let mut nav = Navigator::new(parse_guide(GUIDE).sections, FileStore::open(&path));
        nav.select_first();
        nav.navigate(Direction::Next);
        nav.toggle_theme();
        assert!(nav.take_store_error().is_none());
    }

    let store = FileStore::open(&path);
    assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));
    assert_eq!(
        store.get(VISITED_KEY).as_deref(),
        Some(r#"["intro","section-2"]"#)
    );

    let nav = Navigator::new(parse_guide(GUIDE).sections, store);
    assert_eq!(nav.theme(), ThemeMode::Light);
    assert_eq!(nav.visited_count(), 2);
    assert_eq!(nav.progress(), 50);
    assert_eq!(nav.active_id(), "");
}

#[test]
fn unknown_stored_theme_falls_back_to_dark() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{"studymd-theme": "banana"}"#).unwrap();

    let nav = Navigator::new(parse_guide(GUIDE).sections, FileStore::open(&path));
    assert_eq!(nav.theme(), ThemeMode::Dark);
}

#[test]
fn corrupt_state_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "not json").unwrap();

    let mut nav = Navigator::new(parse_guide(GUIDE).sections, FileStore::open(&path));
    assert_eq!(nav.visited_count(), 0);

    nav.select_section("quick-ref");
    assert!(nav.take_store_error().is_none());
    let reopened = FileStore::open(&path);
    assert_eq!(reopened.get(VISITED_KEY).as_deref(), Some(r#"["quick-ref"]"#));
}
