use std::io::{Write, stdout};

use clap::Args as A;
use eyre::Result;

use libmgit::{commit::Commit, hash::ObjectHash, repository::Repository, tree::Tree};

use crate::unwrap;

#[derive(A)]
pub struct Args {
    /// Print the object's content.
    #[arg(short = 'p', conflicts_with_all = ["size", "kind"])]
    print: bool,

    /// Print the object's decompressed size in bytes.
    #[arg(short = 's', conflicts_with = "kind")]
    size: bool,

    /// Print the object's kind.
    #[arg(short = 't')]
    kind: bool,

    /// The hash of the object to inspect.
    hash: String
}

pub fn parse(args: Args) -> Result<()> {
    let repo = Repository::load()?;

    let hash: ObjectHash = unwrap!(
        args.hash.parse(),
        "{:?} is not a valid object hash",
        args.hash
    );

    let content = repo.store.get(hash)?;

    if args.print {
        stdout().write_all(&content)?;
    }
    else if args.size {
        println!("Size: {} bytes", content.len());
    }
    else if args.kind {
        println!("Type: {}", infer_kind(&content));
    }
    else {
        eyre::bail!("one of -p, -s or -t is required.");
    }

    Ok(())
}

// Objects are not self-describing on disk, so the kind is inferred by
// parsing. An empty object is reported as a blob.
fn infer_kind(content: &[u8]) -> &'static str {
    if !content.is_empty() && Tree::parse(content).is_ok() {
        "tree"
    }
    else if Commit::parse(content).is_ok() {
        "commit"
    }
    else {
        "blob"
    }
}
