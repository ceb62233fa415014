//! The canonical book model.
//!
//! Both source generations normalize into these types. The tree is owned
//! exclusively by the [`Book`] and is immutable once built.

use std::path::Path;

use ketab_core::ShapeChapter;

use crate::error::Result;
use crate::normalize::SourceDocument;

/// The top-level publishable unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub slug: String,
    /// Durable addressable key. Never empty.
    pub id: String,
    /// Display name of the author.
    pub author: String,
    pub description: String,
    pub summary: Option<String>,
    /// Cover image.
    pub image: Option<String>,
    pub thumb: Option<String>,
    /// Block anchor recorded in the source document.
    pub block_id: Option<String>,
    /// Presentational structure from a shape document.
    pub shape: Option<Vec<Vec<ShapeChapter>>>,
    pub acts: Vec<Act>,
}

/// A positional group of chapters. Acts carry no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Act {
    pub title: String,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Sortable key, also the chapter's directory name. Unique within a book.
    pub number: String,
    pub title: String,
    pub id: String,
    /// Event id of a discussion thread attached to this chapter.
    pub discussion_id: Option<String>,
    pub units: Vec<Unit>,
    /// False when the chapter is listed but its content could not be read.
    pub loaded: bool,
}

/// The leaf content item: a numbered passage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// 1-based, as authored.
    pub ordinal: u32,
    pub title: String,
    pub id: String,
    /// Header-stripped, trimmed text.
    pub body: String,
}

impl Unit {
    /// 0-based position derived from the ordinal.
    pub fn index(&self) -> u32 {
        self.ordinal.saturating_sub(1)
    }
}

impl Chapter {
    /// All unit bodies joined by a visible separator.
    pub fn compiled_body(&self) -> String {
        self.units
            .iter()
            .map(|u| u.body.as_str())
            .collect::<Vec<_>>()
            .join(Chapter::BODY_SEPARATOR)
    }

    pub const BODY_SEPARATOR: &'static str = "\n\n---\n\n";
}

impl Book {
    /// Load and normalize the book rooted at `root`.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        SourceDocument::read(root)?.normalize(root)
    }

    /// Every referenced chapter in act order, loaded or not.
    pub fn chapters(&self) -> impl Iterator<Item = &Chapter> {
        self.acts.iter().flat_map(|act| act.chapters.iter())
    }

    /// Chapters whose content was loaded.
    pub fn loaded_chapters(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters().filter(|ch| ch.loaded)
    }

    /// Look up a loaded chapter by number.
    pub fn chapter(&self, number: &str) -> Option<&Chapter> {
        self.loaded_chapters().find(|ch| ch.number == number)
    }

    /// Sorted numbers of the loaded chapters.
    pub fn chapter_numbers(&self) -> Vec<String> {
        let mut numbers: Vec<String> = self.loaded_chapters().map(|ch| ch.number.clone()).collect();
        numbers.sort();
        numbers
    }

    /// Total number of loaded units.
    pub fn unit_count(&self) -> usize {
        self.loaded_chapters().map(|ch| ch.units.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(ordinal: u32, body: &str) -> Unit {
        Unit {
            ordinal,
            title: format!("U{ordinal}"),
            id: format!("u{ordinal}"),
            body: body.into(),
        }
    }

    fn chapter(number: &str, loaded: bool) -> Chapter {
        Chapter {
            number: number.into(),
            title: format!("Chapter {number}"),
            id: format!("ch-{number}"),
            discussion_id: None,
            units: if loaded { vec![unit(1, "a"), unit(2, "b")] } else { vec![] },
            loaded,
        }
    }

    fn book() -> Book {
        Book {
            title: "T".into(),
            slug: "t".into(),
            id: "book".into(),
            author: "A".into(),
            description: "D".into(),
            summary: None,
            image: None,
            thumb: None,
            block_id: None,
            shape: None,
            acts: vec![
                Act {
                    title: "Act I".into(),
                    chapters: vec![chapter("02", true), chapter("01", true)],
                },
                Act {
                    title: "Act II".into(),
                    chapters: vec![chapter("03", false)],
                },
            ],
        }
    }

    #[test]
    fn test_chapter_numbers_sorted_and_loaded_only() {
        assert_eq!(book().chapter_numbers(), vec!["01", "02"]);
        assert_eq!(book().chapters().count(), 3);
    }

    #[test]
    fn test_chapter_lookup_skips_unloaded() {
        let b = book();
        assert!(b.chapter("01").is_some());
        assert!(b.chapter("03").is_none());
        assert_eq!(b.unit_count(), 4);
    }

    #[test]
    fn test_compiled_body() {
        assert_eq!(chapter("01", true).compiled_body(), "a\n\n---\n\nb");
    }

    #[test]
    fn test_unit_index() {
        assert_eq!(unit(1, "").index(), 0);
        assert_eq!(unit(0, "").index(), 0);
    }
}
