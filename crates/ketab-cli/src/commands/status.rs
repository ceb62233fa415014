//! `ketab status <dir>`

use std::path::Path;

use anyhow::Context;

use ketab::source::status;

pub fn run(dir: &Path) -> anyhow::Result<()> {
    let summary = status(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    println!("{}", summary.title);
    if let Some(format) = summary.format {
        println!("   Format: {format:?}");
    }
    println!("   Slug: {}", summary.slug);
    println!("   UUID: {}", summary.id);
    println!("   Author: {}", summary.author);
    println!("   Chapters: {}", summary.chapter_count);
    println!("   Total units: {}", summary.total_units);
    println!("   Has shape: {}\n", summary.has_shape);

    for chapter in &summary.chapters {
        let marker = if chapter.is_complete() { "ok" } else { "!!" };
        println!(
            "  {marker} {}: {} ({} units)",
            chapter.number, chapter.title, chapter.unit_count
        );
        if !chapter.has_metadata {
            println!("       missing chapter metadata");
        }
        for file in &chapter.missing_files {
            println!("       missing: {file}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ketab_testkit::BookFixture;

    #[test]
    fn test_status() {
        assert!(run(BookFixture::unified().root()).is_ok());
        assert!(run(BookFixture::empty().root()).is_err());
    }
}
