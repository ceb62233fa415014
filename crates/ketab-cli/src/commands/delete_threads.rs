//! `ketab delete-threads <dir>`

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use ketab::relay::WebSocketTransport;
use ketab::source::{clean_discussions, deletion_targets};
use ketab::{Book, PublishOptions, Publisher, SchnorrKeypair};

use super::{chapter_list, AnchorArgs, RelayArgs};
use crate::output;

#[derive(Args, Debug)]
pub struct DeleteThreadsArgs {
    /// Book directory
    pub dir: PathBuf,

    /// Comma-separated chapter numbers (default: every chapter with a thread)
    #[arg(long, value_delimiter = ',')]
    pub chapters: Option<Vec<String>>,

    /// Show what would be deleted without sending anything
    #[arg(long)]
    pub dry_run: bool,

    /// Also remove the thread ids from the source document and republish the
    /// book
    #[arg(long)]
    pub clean_metadata: bool,

    #[command(flatten)]
    pub relays: RelayArgs,

    #[command(flatten)]
    pub anchor: AnchorArgs,
}

pub async fn run(args: DeleteThreadsArgs, keypair: SchnorrKeypair) -> anyhow::Result<()> {
    let book = Book::load(&args.dir)
        .with_context(|| format!("failed to load book from {}", args.dir.display()))?;
    let chapters = chapter_list(&args.chapters);

    let targets = deletion_targets(&book, &chapters);
    if targets.is_empty() {
        println!("No discussion threads found in book metadata");
        return Ok(());
    }
    for target in &targets {
        println!("Chapter {}: {}", target.chapter, target.discussion_id);
    }

    let publisher = Publisher::new(keypair, WebSocketTransport::default(), args.relays.config());
    let report = publisher.delete_threads(&targets, args.dry_run).await;
    output::print_report(&report);

    if args.clean_metadata {
        if args.dry_run {
            println!("Dry run: discussion ids would be removed and the book republished");
        } else {
            let removed = clean_discussions(&args.dir, &chapters)?;
            println!("Removed {removed} discussion ids from the source document");

            if removed > 0 {
                let book = Book::load(&args.dir).context("failed to reload book")?;
                let options = PublishOptions {
                    anchor: args.anchor.anchor()?,
                    ..Default::default()
                };
                let report = publisher.publish_book(&book, &options).await?;
                output::print_report(&report);
            }
        }
    }

    println!("Note: relays may ignore deletion requests");
    Ok(())
}
