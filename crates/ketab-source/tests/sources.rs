//! Loading, auditing and rewriting book directories on disk.

use std::fs;
use std::path::Path;

use ketab_source::{
    audit, clean_discussions, deletion_targets, status, Book, SourceDocument, SourceError,
    SourceFormat,
};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, data: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, data).unwrap();
}

const LEGACY_ROOT: &str = r#"{
    "book_title": "Legacy Book",
    "book_slug": "legacy-book",
    "book_uuid": "legacy-uuid",
    "author": "Someone",
    "description": "Old layout",
    "image": "",
    "acts": [
        {"title": "One", "chapters": [
            {"chapter_number": "01", "chapter_title": "First", "chapter_uuid": "c1", "discussion_id": "aa"},
            {"chapter_number": "02", "chapter_title": "Second", "chapter_uuid": "c2"}
        ]}
    ]
}"#;

const LEGACY_CHAPTER_01: &str = r#"{
    "chapter_title": "First",
    "chapter_number": "01",
    "chapter_uuid": "c1",
    "scenes": [
        {"scene_number": 1, "scene_file": "s1.md", "scene_title": "Opening", "ketab_uuid": "u1"},
        {"scene_number": 2, "scene_file": "s2.md", "scene_title": "Close", "ketab_uuid": "u2"}
    ],
    "ketabs": [
        {"ketab_number": 1, "ketab_file": "old.md", "ketab_title": "Old", "ketab_uuid": "old"}
    ]
}"#;

fn legacy_book(with_chapter_two: bool) -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "book-metadata.json", LEGACY_ROOT);
    write(root, "01/chapter-metadata.json", LEGACY_CHAPTER_01);
    write(root, "01/s1.md", "# Scene 1: Opening\n\nIt began.\n");
    write(root, "01/s2.md", "#Scene 2\n\n\nIt ended.  \n");
    if with_chapter_two {
        write(
            root,
            "02/chapter-metadata.json",
            r#"{"chapter_uuid": "c2", "ketabs": [
                {"ketab_number": 1, "ketab_file": "k1.md", "ketab_title": "Only", "ketab_uuid": "u3"}
            ]}"#,
        );
        write(root, "02/k1.md", "Plain text.");
    }
    dir
}

fn unified_book(missing_unit: bool) -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "book.json",
        r#"{
            "title": "Unified Book",
            "slug": "unified-book",
            "uuid": "unified-uuid",
            "author": "Someone",
            "description": "New layout",
            "ref_block_id": "block-9",
            "acts": [{"title": "One", "chapters": [
                {"number": "01", "title": "First", "uuid": "c1", "discussion_id": "bb",
                 "ketabs": [{"title": "A", "uuid": "u1", "file": "text/a.md"},
                            {"title": "B", "uuid": "", "file": "text/b.md"}]}
            ]}]
        }"#,
    );
    write(root, "text/a.md", "# Scene 1\nAlpha");
    if !missing_unit {
        write(root, "text/b.md", "Beta");
    }
    dir
}

#[test]
fn test_detects_formats() {
    let legacy = legacy_book(true);
    let unified = unified_book(false);
    let empty = TempDir::new().unwrap();

    assert_eq!(SourceFormat::detect(legacy.path()).unwrap(), SourceFormat::Legacy);
    assert_eq!(SourceFormat::detect(unified.path()).unwrap(), SourceFormat::Unified);
    assert!(matches!(
        SourceFormat::detect(empty.path()),
        Err(SourceError::Load(_))
    ));
}

#[test]
fn test_unified_document_wins_when_both_exist() {
    let dir = unified_book(false);
    write(dir.path(), "book-metadata.json", LEGACY_ROOT);
    assert_eq!(SourceFormat::detect(dir.path()).unwrap(), SourceFormat::Unified);
}

#[test]
fn test_legacy_load() {
    let dir = legacy_book(true);
    let book = Book::load(dir.path()).unwrap();

    assert_eq!(book.id, "legacy-uuid");
    assert_eq!(book.image, None);
    let first = book.chapter("01").unwrap();
    assert_eq!(first.units.len(), 2);
    assert_eq!(first.units[0].id, "u1");
    assert_eq!(first.units[0].body, "It began.");
    assert_eq!(first.units[1].body, "It ended.");
    assert_eq!(first.discussion_id.as_deref(), Some("aa"));

    let second = book.chapter("02").unwrap();
    assert_eq!(second.units[0].body, "Plain text.");
    assert_eq!(second.units[0].ordinal, 1);
}

#[test]
fn test_legacy_missing_chapter_is_skipped() {
    let dir = legacy_book(false);
    let book = Book::load(dir.path()).unwrap();

    assert_eq!(book.chapters().count(), 2);
    assert_eq!(book.chapter_numbers(), vec!["01"]);
    assert!(book.chapter("02").is_none());
}

#[test]
fn test_unified_load() {
    let dir = unified_book(false);
    let book = Book::load(dir.path()).unwrap();

    assert_eq!(book.block_id.as_deref(), Some("block-9"));
    let chapter = book.chapter("01").unwrap();
    assert_eq!(chapter.units[0].body, "Alpha");
    assert_eq!(chapter.units[1].ordinal, 2);
    assert_eq!(chapter.compiled_body(), "Alpha\n\n---\n\nBeta");
}

#[test]
fn test_unified_missing_unit_is_fatal() {
    let dir = unified_book(true);
    assert!(matches!(
        Book::load(dir.path()),
        Err(SourceError::PartialContent(_))
    ));
}

#[test]
fn test_malformed_root_document() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "book.json", "{ not json");
    assert!(matches!(
        Book::load(dir.path()),
        Err(SourceError::Parse { .. })
    ));
}

#[test]
fn test_audit_clean_legacy() {
    let dir = legacy_book(true);
    assert!(audit(dir.path()).is_empty());
}

#[test]
fn test_audit_reports_missing_pieces() {
    let dir = legacy_book(false);
    fs::remove_file(dir.path().join("01/s2.md")).unwrap();

    let issues = audit(dir.path());
    assert!(issues.contains(&"missing chapter directory: 02".to_string()));
    assert!(issues.contains(&"chapter 01: missing unit file s2.md".to_string()));
}

#[test]
fn test_audit_unified() {
    let dir = unified_book(true);
    let issues = audit(dir.path());
    assert!(issues.contains(&"chapter 01: missing unit file text/b.md".to_string()));
    assert!(issues.contains(&"chapter 01: unit text/b.md missing uuid".to_string()));
}

#[test]
fn test_audit_empty_directory() {
    let dir = TempDir::new().unwrap();
    assert_eq!(audit(dir.path()).len(), 1);
}

#[test]
fn test_status_summary() {
    let dir = legacy_book(false);
    let summary = status(dir.path()).unwrap();

    assert_eq!(summary.format, Some(SourceFormat::Legacy));
    assert_eq!(summary.title, "Legacy Book");
    assert_eq!(summary.chapter_count, 2);
    assert_eq!(summary.total_units, 2);
    assert!(!summary.has_shape);
    assert!(summary.chapters[0].is_complete());
    assert!(!summary.chapters[1].has_metadata);
}

#[test]
fn test_status_with_shape() {
    let dir = legacy_book(true);
    write(
        dir.path(),
        "book-shape.json",
        r#"{"title": "Legacy Book", "shape": [[{"title": "First", "d_tag": "c1"}]]}"#,
    );
    assert!(status(dir.path()).unwrap().has_shape);
    let book = Book::load(dir.path()).unwrap();
    assert_eq!(book.shape.map(|s| s.len()), Some(1));
}

#[test]
fn test_deletion_targets() {
    let dir = legacy_book(true);
    let book = Book::load(dir.path()).unwrap();

    let all = deletion_targets(&book, &[]);
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].chapter, "01");
    assert_eq!(all[0].discussion_id, "aa");

    assert!(deletion_targets(&book, &["02".to_string()]).is_empty());
}

#[test]
fn test_clean_discussions_legacy() {
    let dir = legacy_book(true);
    let before = fs::read_to_string(dir.path().join("book-metadata.json")).unwrap();

    assert_eq!(clean_discussions(dir.path(), &["02".to_string()]).unwrap(), 0);
    let untouched = fs::read_to_string(dir.path().join("book-metadata.json")).unwrap();
    assert_eq!(before, untouched);

    assert_eq!(clean_discussions(dir.path(), &[]).unwrap(), 1);
    let book = Book::load(dir.path()).unwrap();
    assert!(book.chapters().all(|c| c.discussion_id.is_none()));
    assert_eq!(book.title, "Legacy Book");
}

#[test]
fn test_clean_discussions_unified() {
    let dir = unified_book(false);
    assert_eq!(clean_discussions(dir.path(), &["01".to_string()]).unwrap(), 1);

    let document = SourceDocument::read(dir.path()).unwrap();
    assert_eq!(document.format(), SourceFormat::Unified);
    let book = Book::load(dir.path()).unwrap();
    assert_eq!(book.chapter("01").unwrap().discussion_id, None);
    assert_eq!(book.block_id.as_deref(), Some("block-9"));
}
