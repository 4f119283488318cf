use clap::Args as A;
use eyre::Result;

use libmgit::{hash::ObjectHash, repository::Repository, tree::{EntryKind, Tree}};

use crate::unwrap;

#[derive(A)]
pub struct Args {
    /// The hash of the tree object to list.
    tree: String,

    /// Only print entry names.
    #[arg(long)]
    name_only: bool
}

pub fn parse(args: Args) -> Result<()> {
    let repo = Repository::load()?;

    let hash: ObjectHash = unwrap!(
        args.tree.parse(),
        "{:?} is not a valid tree hash",
        args.tree
    );

    let tree = Tree::parse(repo.store.get(hash)?)?;

    for entry in &tree.entries {
        if args.name_only {
            println!("{}", entry.name);
            continue;
        }

        let mode = match entry.kind {
            EntryKind::Blob => "100644",
            EntryKind::Tree => "040000"
        };

        println!("{mode} {} {} {}", entry.kind, entry.hash, entry.name);
    }

    Ok(())
}
