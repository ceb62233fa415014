//! Format detection and normalization into the canonical model.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::body::strip_header;
use crate::error::{Result, SourceError};
use crate::layout::{
    BookShapeDoc, LegacyBookMetadata, LegacyChapterMetadata, LegacyChapterRef, UnifiedBook,
    UnitFile, CHAPTER_METADATA_FILE, LEGACY_METADATA_FILE, SHAPE_FILE, UNIFIED_FILE,
};
use crate::model::{Act, Book, Chapter, Unit};

/// Which generation of source documents a book directory uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Legacy,
    Unified,
}

impl SourceFormat {
    /// Decide the generation from the documents present under `root`.
    pub fn detect(root: &Path) -> Result<Self> {
        if root.join(UNIFIED_FILE).is_file() {
            Ok(Self::Unified)
        } else if root.join(LEGACY_METADATA_FILE).is_file() {
            Ok(Self::Legacy)
        } else {
            Err(SourceError::Load(format!(
                "no {} or {} in {}",
                UNIFIED_FILE,
                LEGACY_METADATA_FILE,
                root.display()
            )))
        }
    }

    /// The root document file name of this generation.
    pub fn root_file(self) -> &'static str {
        match self {
            Self::Legacy => LEGACY_METADATA_FILE,
            Self::Unified => UNIFIED_FILE,
        }
    }
}

/// The root documents of a book directory, parsed with the typed model of
/// their generation.
#[derive(Debug, Clone)]
pub enum SourceDocument {
    Legacy {
        metadata: LegacyBookMetadata,
        shape: Option<BookShapeDoc>,
    },
    Unified(UnifiedBook),
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
    serde_json::from_str(&data).map_err(|e| SourceError::parse(path, e))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut data = serde_json::to_string_pretty(value).map_err(|e| SourceError::parse(path, e))?;
    data.push('\n');
    fs::write(path, data).map_err(|e| SourceError::io(path, e))
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn read_unit(dir: &Path, file: &UnitFile) -> Result<Unit> {
    let path = dir.join(&file.file);
    let raw = fs::read_to_string(&path).map_err(|e| {
        SourceError::PartialContent(format!("cannot read unit file {}: {}", path.display(), e))
    })?;
    Ok(Unit {
        ordinal: file.ordinal,
        title: file.title.clone(),
        id: file.id.clone(),
        body: strip_header(&raw),
    })
}

impl SourceDocument {
    /// Detect the generation under `root` and parse its root documents.
    pub fn read(root: &Path) -> Result<Self> {
        match SourceFormat::detect(root)? {
            SourceFormat::Unified => Ok(Self::Unified(read_json(&root.join(UNIFIED_FILE))?)),
            SourceFormat::Legacy => {
                let metadata = read_json(&root.join(LEGACY_METADATA_FILE))?;
                let shape_path = root.join(SHAPE_FILE);
                let shape = if shape_path.is_file() {
                    Some(read_json(&shape_path)?)
                } else {
                    None
                };
                Ok(Self::Legacy { metadata, shape })
            }
        }
    }

    pub fn format(&self) -> SourceFormat {
        match self {
            Self::Legacy { .. } => SourceFormat::Legacy,
            Self::Unified(_) => SourceFormat::Unified,
        }
    }

    /// Write the root document back to `root`. The shape document is never
    /// rewritten.
    pub fn write(&self, root: &Path) -> Result<()> {
        match self {
            Self::Legacy { metadata, .. } => write_json(&root.join(LEGACY_METADATA_FILE), metadata),
            Self::Unified(book) => write_json(&root.join(UNIFIED_FILE), book),
        }
    }

    /// Build the canonical book, reading unit files relative to `root`.
    pub fn normalize(self, root: &Path) -> Result<Book> {
        let book = match self {
            Self::Legacy { metadata, shape } => normalize_legacy(root, metadata, shape),
            Self::Unified(doc) => normalize_unified(root, doc)?,
        };
        if book.id.is_empty() {
            return Err(SourceError::Load("book id is empty".into()));
        }
        tracing::debug!(
            id = %book.id,
            chapters = book.chapters().count(),
            loaded = book.loaded_chapters().count(),
            "normalized book"
        );
        Ok(book)
    }
}

fn normalize_legacy(
    root: &Path,
    metadata: LegacyBookMetadata,
    shape: Option<BookShapeDoc>,
) -> Book {
    let acts = metadata
        .acts
        .iter()
        .map(|act| Act {
            title: act.title.clone(),
            chapters: act
                .chapters
                .iter()
                .map(|r| load_legacy_chapter(root, r))
                .collect(),
        })
        .collect();

    Book {
        title: metadata.book_title,
        slug: metadata.book_slug,
        id: metadata.book_uuid,
        author: metadata.author,
        description: metadata.description,
        summary: non_empty(&metadata.summary),
        image: non_empty(&metadata.image),
        thumb: non_empty(&metadata.thumb),
        block_id: None,
        shape: shape.map(|s| s.shape),
        acts,
    }
}

/// Load one legacy chapter. Missing or broken content leaves the chapter in
/// the tree but marks it not loaded.
fn load_legacy_chapter(root: &Path, reference: &LegacyChapterRef) -> Chapter {
    let mut chapter = Chapter {
        number: reference.chapter_number.clone(),
        title: reference.chapter_title.clone(),
        id: reference.chapter_uuid.clone(),
        discussion_id: reference.discussion_id.clone().filter(|d| !d.is_empty()),
        units: Vec::new(),
        loaded: false,
    };

    match read_legacy_units(root, &reference.chapter_number) {
        Ok((meta, units)) => {
            if chapter.id.is_empty() {
                chapter.id = meta.chapter_uuid;
            }
            chapter.units = units;
            chapter.loaded = true;
        }
        Err(e) => {
            tracing::warn!(chapter = %reference.chapter_number, "skipping chapter: {}", e);
        }
    }
    chapter
}

fn read_legacy_units(root: &Path, number: &str) -> Result<(LegacyChapterMetadata, Vec<Unit>)> {
    let dir = root.join(number);
    let meta: LegacyChapterMetadata = read_json(&dir.join(CHAPTER_METADATA_FILE))
        .map_err(|e| SourceError::PartialContent(e.to_string()))?;
    let units = meta
        .unit_files()
        .iter()
        .map(|file| read_unit(&dir, file))
        .collect::<Result<Vec<_>>>()?;
    Ok((meta, units))
}

fn normalize_unified(root: &Path, doc: UnifiedBook) -> Result<Book> {
    let mut acts = Vec::with_capacity(doc.acts.len());
    for act in &doc.acts {
        let mut chapters = Vec::with_capacity(act.chapters.len());
        for ch in &act.chapters {
            let units = ch
                .unit_files()
                .iter()
                .map(|file| read_unit(root, file))
                .collect::<Result<Vec<_>>>()?;
            chapters.push(Chapter {
                number: ch.number.clone(),
                title: ch.title.clone(),
                id: ch.uuid.clone(),
                discussion_id: ch.discussion_id.clone().filter(|d| !d.is_empty()),
                units,
                loaded: true,
            });
        }
        acts.push(Act {
            title: act.title.clone(),
            chapters,
        });
    }

    let opt = |v: &Option<String>| v.as_deref().and_then(non_empty);
    Ok(Book {
        summary: opt(&doc.summary),
        image: opt(&doc.image),
        thumb: opt(&doc.thumb),
        block_id: opt(&doc.ref_block_id),
        title: doc.title,
        slug: doc.slug,
        id: doc.uuid,
        author: doc.author,
        description: doc.description,
        shape: None,
        acts,
    })
}
