//! On-disk document schemas for both source generations.
//!
//! Field names are the ones authors write. Unknown fields are kept in `extra`
//! so a document can be rewritten without losing them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use ketab_core::ShapeChapter;

/// Root document of the legacy generation.
pub const LEGACY_METADATA_FILE: &str = "book-metadata.json";
/// Optional presentational document of the legacy generation.
pub const SHAPE_FILE: &str = "book-shape.json";
/// Per-chapter document of the legacy generation.
pub const CHAPTER_METADATA_FILE: &str = "chapter-metadata.json";
/// Single document of the unified generation.
pub const UNIFIED_FILE: &str = "book.json";

// ─────────────────────────────────────────────────────────────────────────
// Legacy generation
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyBookMetadata {
    #[serde(default)]
    pub book_title: String,
    #[serde(default)]
    pub book_slug: String,
    #[serde(default)]
    pub book_uuid: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thumb: String,
    #[serde(default)]
    pub acts: Vec<LegacyActRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LegacyBookMetadata {
    /// Every chapter reference in act order.
    pub fn chapter_refs(&self) -> impl Iterator<Item = &LegacyChapterRef> {
        self.acts.iter().flat_map(|act| act.chapters.iter())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyActRef {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub chapters: Vec<LegacyChapterRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyChapterRef {
    pub chapter_number: String,
    #[serde(default)]
    pub chapter_title: String,
    #[serde(default)]
    pub chapter_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `book-shape.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookShapeDoc {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub shape: Vec<Vec<ShapeChapter>>,
}

/// `<chapter>/chapter-metadata.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyChapterMetadata {
    #[serde(default)]
    pub chapter_title: String,
    #[serde(default)]
    pub chapter_number: String,
    #[serde(default)]
    pub chapter_uuid: String,
    /// Current generation of the unit list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenes: Vec<SceneRef>,
    /// Previous generation of the unit list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ketabs: Vec<KetabRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneRef {
    pub scene_number: u32,
    pub scene_file: String,
    #[serde(default)]
    pub scene_title: String,
    #[serde(default)]
    pub ketab_uuid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KetabRef {
    pub ketab_number: u32,
    pub ketab_file: String,
    #[serde(default)]
    pub ketab_title: String,
    #[serde(default)]
    pub ketab_uuid: String,
}

/// A unit listing with its file, regardless of generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFile {
    pub ordinal: u32,
    pub file: String,
    pub title: String,
    pub id: String,
}

impl LegacyChapterMetadata {
    /// The unit listing. A non-empty `scenes` list wins and `ketabs` is then
    /// ignored entirely.
    pub fn unit_files(&self) -> Vec<UnitFile> {
        if !self.scenes.is_empty() {
            return self
                .scenes
                .iter()
                .map(|s| UnitFile {
                    ordinal: s.scene_number,
                    file: s.scene_file.clone(),
                    title: s.scene_title.clone(),
                    id: s.ketab_uuid.clone(),
                })
                .collect();
        }
        self.ketabs
            .iter()
            .map(|k| UnitFile {
                ordinal: k.ketab_number,
                file: k.ketab_file.clone(),
                title: k.ketab_title.clone(),
                id: k.ketab_uuid.clone(),
            })
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Unified generation
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnifiedBook {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_block_id: Option<String>,
    #[serde(default)]
    pub acts: Vec<UnifiedAct>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UnifiedBook {
    pub fn chapters(&self) -> impl Iterator<Item = &UnifiedChapter> {
        self.acts.iter().flat_map(|act| act.chapters.iter())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnifiedAct {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub chapters: Vec<UnifiedChapter>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnifiedChapter {
    pub number: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion_id: Option<String>,
    #[serde(default)]
    pub ketabs: Vec<UnifiedUnit>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UnifiedChapter {
    /// Unit listing with ordinals derived from position.
    pub fn unit_files(&self) -> Vec<UnitFile> {
        self.ketabs
            .iter()
            .zip(1u32..)
            .map(|(k, ordinal)| UnitFile {
                ordinal,
                file: k.file.clone(),
                title: k.title.clone(),
                id: k.uuid.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedUnit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub uuid: String,
    pub file: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
