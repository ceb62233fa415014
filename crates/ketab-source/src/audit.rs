//! Structural checks and status summaries for book directories.
//!
//! Unlike [`Book::load`](crate::Book::load), which skips what it cannot read,
//! these functions report every problem they find.

use std::path::Path;

use crate::error::Result;
use crate::layout::{
    LegacyBookMetadata, LegacyChapterMetadata, UnifiedBook, UnitFile, CHAPTER_METADATA_FILE,
    LEGACY_METADATA_FILE, SHAPE_FILE, UNIFIED_FILE,
};
use crate::normalize::{read_json, SourceDocument, SourceFormat};

/// Summary of what exists on disk for one book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookStatus {
    pub format: Option<SourceFormat>,
    pub title: String,
    pub slug: String,
    pub id: String,
    pub author: String,
    pub chapter_count: usize,
    pub total_units: usize,
    pub has_shape: bool,
    pub chapters: Vec<ChapterStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterStatus {
    pub number: String,
    pub title: String,
    pub id: String,
    pub unit_count: usize,
    pub has_metadata: bool,
    pub missing_files: Vec<String>,
}

impl ChapterStatus {
    pub fn is_complete(&self) -> bool {
        self.has_metadata && self.missing_files.is_empty()
    }
}

/// List every structural issue in the book directory at `root`.
///
/// An empty list means the directory is complete.
pub fn audit(root: impl AsRef<Path>) -> Vec<String> {
    let root = root.as_ref();
    match SourceFormat::detect(root) {
        Ok(SourceFormat::Legacy) => audit_legacy(root),
        Ok(SourceFormat::Unified) => audit_unified(root),
        Err(_) => vec![format!("missing {} or {}", UNIFIED_FILE, LEGACY_METADATA_FILE)],
    }
}

fn require(issues: &mut Vec<String>, file: &str, field: &str, value: &str) {
    if value.is_empty() {
        issues.push(format!("{file}: missing {field}"));
    }
}

fn audit_units(issues: &mut Vec<String>, dir: &Path, number: &str, units: &[UnitFile]) {
    for unit in units {
        if !dir.join(&unit.file).is_file() {
            issues.push(format!("chapter {number}: missing unit file {}", unit.file));
        }
        if unit.id.is_empty() {
            issues.push(format!("chapter {number}: unit {} missing uuid", unit.file));
        }
    }
}

fn audit_legacy(root: &Path) -> Vec<String> {
    let mut issues = Vec::new();
    let meta: LegacyBookMetadata = match read_json(&root.join(LEGACY_METADATA_FILE)) {
        Ok(meta) => meta,
        Err(e) => return vec![format!("invalid {LEGACY_METADATA_FILE}: {e}")],
    };

    if !root.join(SHAPE_FILE).is_file() {
        tracing::info!("no {} (optional)", SHAPE_FILE);
    }

    require(&mut issues, LEGACY_METADATA_FILE, "book_title", &meta.book_title);
    require(&mut issues, LEGACY_METADATA_FILE, "book_slug", &meta.book_slug);
    require(&mut issues, LEGACY_METADATA_FILE, "author", &meta.author);
    require(&mut issues, LEGACY_METADATA_FILE, "book_uuid", &meta.book_uuid);

    for reference in meta.chapter_refs() {
        let number = &reference.chapter_number;
        let dir = root.join(number);
        if !dir.is_dir() {
            issues.push(format!("missing chapter directory: {number}"));
            continue;
        }
        let meta_path = dir.join(CHAPTER_METADATA_FILE);
        if !meta_path.is_file() {
            issues.push(format!("chapter {number}: missing {CHAPTER_METADATA_FILE}"));
            continue;
        }
        let chapter: LegacyChapterMetadata = match read_json(&meta_path) {
            Ok(chapter) => chapter,
            Err(e) => {
                issues.push(format!("chapter {number}: invalid {CHAPTER_METADATA_FILE}: {e}"));
                continue;
            }
        };
        if chapter.chapter_uuid.is_empty() {
            issues.push(format!("chapter {number}: missing chapter_uuid"));
        }
        audit_units(&mut issues, &dir, number, &chapter.unit_files());
    }

    issues
}

fn audit_unified(root: &Path) -> Vec<String> {
    let mut issues = Vec::new();
    let doc: UnifiedBook = match read_json(&root.join(UNIFIED_FILE)) {
        Ok(doc) => doc,
        Err(e) => return vec![format!("invalid {UNIFIED_FILE}: {e}")],
    };

    require(&mut issues, UNIFIED_FILE, "title", &doc.title);
    require(&mut issues, UNIFIED_FILE, "slug", &doc.slug);
    require(&mut issues, UNIFIED_FILE, "author", &doc.author);
    require(&mut issues, UNIFIED_FILE, "uuid", &doc.uuid);

    for chapter in doc.chapters() {
        if chapter.uuid.is_empty() {
            issues.push(format!("chapter {}: missing uuid", chapter.number));
        }
        audit_units(&mut issues, root, &chapter.number, &chapter.unit_files());
    }

    issues
}

/// Summarize the book directory at `root`.
///
/// Fails only when the root document cannot be read.
pub fn status(root: impl AsRef<Path>) -> Result<BookStatus> {
    let root = root.as_ref();
    let document = SourceDocument::read(root)?;
    let format = Some(document.format());

    let status = match document {
        SourceDocument::Legacy { metadata, shape } => {
            let chapters: Vec<ChapterStatus> = metadata
                .chapter_refs()
                .map(|reference| {
                    let dir = root.join(&reference.chapter_number);
                    let mut status = ChapterStatus {
                        number: reference.chapter_number.clone(),
                        title: reference.chapter_title.clone(),
                        id: reference.chapter_uuid.clone(),
                        ..Default::default()
                    };
                    if let Ok(chapter) =
                        read_json::<LegacyChapterMetadata>(&dir.join(CHAPTER_METADATA_FILE))
                    {
                        status.has_metadata = true;
                        fill_units(&mut status, &dir, &chapter.unit_files());
                    }
                    status
                })
                .collect();
            BookStatus {
                format,
                title: metadata.book_title,
                slug: metadata.book_slug,
                id: metadata.book_uuid,
                author: metadata.author,
                chapter_count: chapters.len(),
                total_units: chapters.iter().map(|c| c.unit_count).sum(),
                has_shape: shape.is_some(),
                chapters,
            }
        }
        SourceDocument::Unified(doc) => {
            let chapters: Vec<ChapterStatus> = doc
                .chapters()
                .map(|chapter| {
                    let mut status = ChapterStatus {
                        number: chapter.number.clone(),
                        title: chapter.title.clone(),
                        id: chapter.uuid.clone(),
                        has_metadata: true,
                        ..Default::default()
                    };
                    fill_units(&mut status, root, &chapter.unit_files());
                    status
                })
                .collect();
            BookStatus {
                format,
                title: doc.title,
                slug: doc.slug,
                id: doc.uuid,
                author: doc.author,
                chapter_count: chapters.len(),
                total_units: chapters.iter().map(|c| c.unit_count).sum(),
                has_shape: false,
                chapters,
            }
        }
    };

    Ok(status)
}

fn fill_units(status: &mut ChapterStatus, dir: &Path, units: &[UnitFile]) {
    status.unit_count = units.len();
    status.missing_files = units
        .iter()
        .filter(|u| !dir.join(&u.file).is_file())
        .map(|u| u.file.clone())
        .collect();
}
