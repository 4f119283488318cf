use clap::Args as A;
use eyre::Result;

use libmgit::{hash::ObjectHash, repository::Repository};

use crate::unwrap;

#[derive(A)]
pub struct Args {
    /// The hash of the commit to check out.
    commit: String
}

pub fn parse(args: Args) -> Result<()> {
    let repo = Repository::load()?;

    let target: ObjectHash = unwrap!(
        args.commit.parse(),
        "{:?} is not a valid commit hash",
        args.commit
    );

    repo.checkout(target)?;

    println!("Checked out commit {target}");

    Ok(())
}
