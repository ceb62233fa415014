//! Sample books written to temporary directories.
//!
//! A [`SampleBook`] describes one book independently of its on-disk format
//! and can be written as either source generation. Both renderings normalize
//! to the same [`Book`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

use ketab_core::{Keypair, Signer};
use ketab_source::{Act, Book, Chapter, Unit};

#[derive(Debug, Clone)]
pub struct SampleUnit {
    pub title: String,
    pub id: String,
    /// Body as it should appear after normalization.
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct SampleChapter {
    pub number: String,
    pub title: String,
    pub id: String,
    pub discussion_id: Option<String>,
    pub units: Vec<SampleUnit>,
}

#[derive(Debug, Clone)]
pub struct SampleAct {
    pub title: String,
    pub chapters: Vec<SampleChapter>,
}

/// A format-independent book description.
#[derive(Debug, Clone)]
pub struct SampleBook {
    pub title: String,
    pub slug: String,
    pub id: String,
    pub author: String,
    pub description: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub acts: Vec<SampleAct>,
}

impl SampleBook {
    /// Two acts, three chapters, two units each. Chapter 02 has a discussion.
    pub fn standard() -> Self {
        let chapter = |number: &str, title: &str, discussion: Option<&str>| SampleChapter {
            number: number.into(),
            title: title.into(),
            id: format!("chapter-{number}-uuid"),
            discussion_id: discussion.map(String::from),
            units: (1..=2)
                .map(|n| SampleUnit {
                    title: format!("Part {n}"),
                    id: format!("unit-{number}-{n}-uuid"),
                    body: format!("Chapter {number}, part {n}.\n\nSecond paragraph."),
                })
                .collect(),
        };

        Self {
            title: "The Long Road".into(),
            slug: "the-long-road".into(),
            id: "3f1c7a52-book-uuid".into(),
            author: "R. Writer".into(),
            description: "A journey in three chapters.".into(),
            summary: Some("A journey.".into()),
            image: Some("https://images.example/cover.jpg".into()),
            acts: vec![
                SampleAct {
                    title: "Departure".into(),
                    chapters: vec![
                        chapter("01", "The Gate", None),
                        chapter("02", "The River", Some(&"d1".repeat(32))),
                    ],
                },
                SampleAct {
                    title: "Return".into(),
                    chapters: vec![chapter("03", "Home", None)],
                },
            ],
        }
    }

    pub fn chapters(&self) -> impl Iterator<Item = &SampleChapter> {
        self.acts.iter().flat_map(|a| a.chapters.iter())
    }

    /// The book both source generations should normalize to.
    pub fn expected(&self) -> Book {
        Book {
            title: self.title.clone(),
            slug: self.slug.clone(),
            id: self.id.clone(),
            author: self.author.clone(),
            description: self.description.clone(),
            summary: self.summary.clone(),
            image: self.image.clone(),
            thumb: None,
            block_id: None,
            shape: None,
            acts: self
                .acts
                .iter()
                .map(|act| Act {
                    title: act.title.clone(),
                    chapters: act
                        .chapters
                        .iter()
                        .map(|ch| Chapter {
                            number: ch.number.clone(),
                            title: ch.title.clone(),
                            id: ch.id.clone(),
                            discussion_id: ch.discussion_id.clone(),
                            units: ch
                                .units
                                .iter()
                                .zip(1u32..)
                                .map(|(u, ordinal)| Unit {
                                    ordinal,
                                    title: u.title.clone(),
                                    id: u.id.clone(),
                                    body: u.body.clone(),
                                })
                                .collect(),
                            loaded: true,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Write the legacy layout: root metadata plus one directory per chapter.
    ///
    /// Chapter metadata lists units under `scenes`.
    pub fn write_legacy(&self, root: &Path) -> io::Result<()> {
        let acts: Vec<Value> = self
            .acts
            .iter()
            .map(|act| {
                let chapters: Vec<Value> = act
                    .chapters
                    .iter()
                    .map(|ch| {
                        let mut v = json!({
                            "chapter_number": ch.number,
                            "chapter_title": ch.title,
                            "chapter_uuid": ch.id,
                        });
                        if let Some(d) = &ch.discussion_id {
                            v["discussion_id"] = json!(d);
                        }
                        v
                    })
                    .collect();
                json!({ "title": act.title, "chapters": chapters })
            })
            .collect();

        write_json(
            &root.join("book-metadata.json"),
            &json!({
                "book_title": self.title,
                "book_slug": self.slug,
                "book_uuid": self.id,
                "author": self.author,
                "description": self.description,
                "summary": self.summary.clone().unwrap_or_default(),
                "image": self.image.clone().unwrap_or_default(),
                "acts": acts,
            }),
        )?;

        for ch in self.chapters() {
            let dir = root.join(&ch.number);
            fs::create_dir_all(&dir)?;
            let scenes: Vec<Value> = ch
                .units
                .iter()
                .zip(1u32..)
                .map(|(u, n)| {
                    json!({
                        "scene_number": n,
                        "scene_file": format!("scene-{n}.md"),
                        "scene_title": u.title,
                        "ketab_uuid": u.id,
                    })
                })
                .collect();
            write_json(
                &dir.join("chapter-metadata.json"),
                &json!({
                    "chapter_title": ch.title,
                    "chapter_number": ch.number,
                    "chapter_uuid": ch.id,
                    "scenes": scenes,
                }),
            )?;
            for (u, n) in ch.units.iter().zip(1u32..) {
                fs::write(dir.join(format!("scene-{n}.md")), raw_body(n, u))?;
            }
        }
        Ok(())
    }

    /// Write the unified layout: one `book.json` with file paths relative to
    /// the root.
    pub fn write_unified(&self, root: &Path) -> io::Result<()> {
        let acts: Vec<Value> = self
            .acts
            .iter()
            .map(|act| {
                let chapters: Vec<Value> = act
                    .chapters
                    .iter()
                    .map(|ch| {
                        let ketabs: Vec<Value> = ch
                            .units
                            .iter()
                            .zip(1u32..)
                            .map(|(u, n)| {
                                json!({
                                    "title": u.title,
                                    "uuid": u.id,
                                    "file": format!("chapters/{}/{n}.md", ch.number),
                                })
                            })
                            .collect();
                        let mut v = json!({
                            "number": ch.number,
                            "title": ch.title,
                            "uuid": ch.id,
                            "ketabs": ketabs,
                        });
                        if let Some(d) = &ch.discussion_id {
                            v["discussion_id"] = json!(d);
                        }
                        v
                    })
                    .collect();
                json!({ "title": act.title, "chapters": chapters })
            })
            .collect();

        let mut doc = json!({
            "title": self.title,
            "slug": self.slug,
            "uuid": self.id,
            "author": self.author,
            "description": self.description,
            "acts": acts,
        });
        if let Some(summary) = &self.summary {
            doc["summary"] = json!(summary);
        }
        if let Some(image) = &self.image {
            doc["image"] = json!(image);
        }
        write_json(&root.join("book.json"), &doc)?;

        for ch in self.chapters() {
            let dir = root.join("chapters").join(&ch.number);
            fs::create_dir_all(&dir)?;
            for (u, n) in ch.units.iter().zip(1u32..) {
                fs::write(dir.join(format!("{n}.md")), raw_body(n, u))?;
            }
        }
        Ok(())
    }
}

/// Unit text as authored: a scene header followed by the body.
fn raw_body(n: u32, unit: &SampleUnit) -> String {
    format!("# Scene {n}: {}\n\n{}\n", unit.title, unit.body)
}

fn write_json(path: &Path, value: &Value) -> io::Result<()> {
    let data = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    fs::write(path, data)
}

/// A sample book on disk with a deterministic author key.
pub struct BookFixture {
    dir: TempDir,
    pub sample: SampleBook,
    pub keypair: Keypair,
}

impl BookFixture {
    /// The standard sample in the legacy layout.
    pub fn legacy() -> Self {
        Self::write(SampleBook::standard(), SampleBook::write_legacy)
    }

    /// The standard sample in the unified layout.
    pub fn unified() -> Self {
        Self::write(SampleBook::standard(), SampleBook::write_unified)
    }

    /// A directory with nothing in it.
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
            sample: SampleBook::standard(),
            keypair: Keypair::from_seed(&[0x42; 32]),
        }
    }

    fn write(sample: SampleBook, render: fn(&SampleBook, &Path) -> io::Result<()>) -> Self {
        let fixture = Self {
            sample,
            ..Self::empty()
        };
        render(&fixture.sample, fixture.root()).expect("write sample book");
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn public_key(&self) -> ketab_core::PublicKey {
        self.keypair.public_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_fixture_layout() {
        let fixture = BookFixture::legacy();
        assert!(fixture.path("book-metadata.json").is_file());
        assert!(fixture.path("02/chapter-metadata.json").is_file());
        assert!(fixture.path("03/scene-2.md").is_file());
    }

    #[test]
    fn test_unified_fixture_layout() {
        let fixture = BookFixture::unified();
        assert!(fixture.path("book.json").is_file());
        assert!(fixture.path("chapters/01/1.md").is_file());
        assert!(!fixture.path("book-metadata.json").exists());
    }

    #[test]
    fn test_expected_book_shape() {
        let book = SampleBook::standard().expected();
        assert_eq!(book.chapter_numbers(), vec!["01", "02", "03"]);
        assert_eq!(book.unit_count(), 6);
    }
}
