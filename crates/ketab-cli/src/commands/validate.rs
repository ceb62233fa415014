//! `ketab validate <dir>`

use std::path::Path;

use anyhow::bail;

use ketab::source::audit;

pub fn run(dir: &Path) -> anyhow::Result<()> {
    let issues = audit(dir);
    if issues.is_empty() {
        println!("Book directory is valid");
        return Ok(());
    }

    println!("{} issues found:", issues.len());
    for issue in &issues {
        println!("  - {issue}");
    }
    bail!("{} validation errors", issues.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ketab_testkit::BookFixture;

    #[test]
    fn test_valid_directory() {
        assert!(run(BookFixture::legacy().root()).is_ok());
        assert!(run(BookFixture::unified().root()).is_ok());
    }

    #[test]
    fn test_broken_directory_fails() {
        let fixture = BookFixture::legacy();
        std::fs::remove_dir_all(fixture.path("03")).unwrap();
        assert!(run(fixture.root()).is_err());
        assert!(run(BookFixture::empty().root()).is_err());
    }
}
