//! Discussion threads attached to chapters.
//!
//! Each chapter reference may carry the event id of a discussion thread. The
//! chapter number is always read from the same record, never inferred.

use std::path::Path;

use crate::error::Result;
use crate::model::Book;
use crate::normalize::SourceDocument;

/// A discussion thread to be withdrawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionRef {
    pub chapter: String,
    pub discussion_id: String,
}

fn selected(chapters: &[String], number: &str) -> bool {
    chapters.is_empty() || chapters.iter().any(|c| c == number)
}

/// Threads recorded for the given chapter numbers, or for every chapter when
/// `chapters` is empty. Requested chapters without a thread are logged.
pub fn deletion_targets(book: &Book, chapters: &[String]) -> Vec<DiscussionRef> {
    let targets: Vec<DiscussionRef> = book
        .chapters()
        .filter(|ch| selected(chapters, &ch.number))
        .filter_map(|ch| {
            ch.discussion_id.as_ref().map(|id| DiscussionRef {
                chapter: ch.number.clone(),
                discussion_id: id.clone(),
            })
        })
        .collect();

    for number in chapters {
        if !targets.iter().any(|t| &t.chapter == number) {
            tracing::warn!(chapter = %number, "no discussion thread recorded");
        }
    }
    targets
}

/// Remove the `discussion_id` of the selected chapters from the root document
/// under `root` and write it back. Returns how many ids were removed; the
/// document is left untouched when that is zero.
pub fn clean_discussions(root: impl AsRef<Path>, chapters: &[String]) -> Result<usize> {
    let root = root.as_ref();
    let mut document = SourceDocument::read(root)?;

    let removed = match &mut document {
        SourceDocument::Legacy { metadata, .. } => metadata
            .acts
            .iter_mut()
            .flat_map(|act| act.chapters.iter_mut())
            .filter(|ch| selected(chapters, &ch.chapter_number))
            .filter_map(|ch| ch.discussion_id.take())
            .count(),
        SourceDocument::Unified(doc) => doc
            .acts
            .iter_mut()
            .flat_map(|act| act.chapters.iter_mut())
            .filter(|ch| selected(chapters, &ch.number))
            .filter_map(|ch| ch.discussion_id.take())
            .count(),
    };

    if removed > 0 {
        document.write(root)?;
        tracing::info!(removed, file = document.format().root_file(), "cleaned discussion ids");
    }
    Ok(removed)
}
