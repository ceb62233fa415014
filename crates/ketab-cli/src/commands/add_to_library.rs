//! `ketab add-to-library <book-coordinate>`

use anyhow::{bail, Context};
use clap::Args;

use ketab::core::ReadStatus;
use ketab::relay::WebSocketTransport;
use ketab::{Coordinate, EntryOptions, Publisher, SchnorrKeypair, Signer, DEFAULT_LIBRARY_ID};

use super::{AnchorArgs, RelayArgs};
use crate::output;

#[derive(Args, Debug)]
pub struct AddToLibraryArgs {
    /// Book coordinate, `38891:<author pubkey>:<book id>`
    pub book: String,

    #[arg(long, default_value = DEFAULT_LIBRARY_ID)]
    pub library_id: String,

    /// Personal notes about the book
    #[arg(long)]
    pub notes: Option<String>,

    /// Rating from 1 to 5
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub rating: Option<u8>,

    /// want-to-read, reading, finished or abandoned
    #[arg(long, default_value = "reading")]
    pub status: ReadStatus,

    /// Comma-separated tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Sign the entry without delivering it
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub relays: RelayArgs,

    #[command(flatten)]
    pub anchor: AnchorArgs,
}

impl AddToLibraryArgs {
    fn entry_options(&self) -> EntryOptions {
        EntryOptions {
            library_id: self.library_id.clone(),
            notes: self.notes.clone(),
            rating: self.rating,
            tags: self
                .tags
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            read_status: Some(self.status),
        }
    }
}

pub async fn run(args: AddToLibraryArgs, keypair: SchnorrKeypair) -> anyhow::Result<()> {
    let book: Coordinate = args
        .book
        .parse()
        .with_context(|| format!("invalid book coordinate: {}", args.book))?;
    let options = args.entry_options();
    let anchor = args.anchor.anchor()?;

    println!("Librarian: {}", keypair.public_key());
    println!("Book: {book}");
    println!("Library: {}", options.library_id);

    let publisher = Publisher::new(keypair, WebSocketTransport::default(), args.relays.config());
    let report = publisher
        .add_to_library(&book, &options, anchor.as_ref(), args.dry_run)
        .await?;
    output::print_report(&report);

    if report.succeeded == 0 {
        bail!("library entry was not published");
    }
    Ok(())
}
