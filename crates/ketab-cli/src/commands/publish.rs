//! `ketab publish <dir>`

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;

use ketab::relay::WebSocketTransport;
use ketab::{
    Book, LibraryOptions, PublishOptions, Publisher, SchnorrKeypair, Signer, DEFAULT_LIBRARY_ID,
    DEFAULT_LIBRARY_NAME,
};

use super::{chapter_list, AnchorArgs, RelayArgs};
use crate::output;

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Book directory
    pub dir: PathBuf,

    /// Comma-separated chapter numbers (default: every loaded chapter)
    #[arg(long, value_delimiter = ',')]
    pub chapters: Option<Vec<String>>,

    /// Publish units, the book and the library but no chapter events
    #[arg(long, alias = "ketabs-only")]
    pub units_only: bool,

    /// Sign events without delivering them
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, default_value = DEFAULT_LIBRARY_ID)]
    pub library_id: String,

    #[arg(long, default_value = DEFAULT_LIBRARY_NAME)]
    pub library_name: String,

    #[command(flatten)]
    pub relays: RelayArgs,

    #[command(flatten)]
    pub anchor: AnchorArgs,
}

pub async fn run(args: PublishArgs, keypair: SchnorrKeypair) -> anyhow::Result<()> {
    let book = Book::load(&args.dir)
        .with_context(|| format!("failed to load book from {}", args.dir.display()))?;

    let chapters = chapter_list(&args.chapters);
    let options = PublishOptions {
        chapters: (!chapters.is_empty()).then_some(chapters),
        skip_chapters: args.units_only,
        dry_run: args.dry_run,
        library: LibraryOptions {
            id: args.library_id,
            name: args.library_name,
        },
        anchor: args.anchor.anchor()?,
        created_at: None,
    };

    let relays = args.relays.config();
    println!("Pubkey: {}", keypair.public_key());
    println!("Book: {} ({})", book.title, book.id);
    println!("Relays: {}", relays.endpoints.join(", "));
    if options.dry_run {
        println!("Dry run: events are signed but not delivered");
    }

    let publisher = Publisher::new(keypair, WebSocketTransport::default(), relays);
    let report = publisher.publish(&book, &options).await?;

    output::print_report(&report);
    if let Some(coordinate) = &report.book_coordinate {
        println!("Book coordinate: {coordinate}");
    }

    if report.attempted > 0 && report.succeeded == 0 {
        bail!("no event was published");
    }
    Ok(())
}
