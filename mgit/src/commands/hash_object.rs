use std::{fs, path::PathBuf};

use clap::Args as A;
use eyre::Result;

use libmgit::{hash_raw_bytes, repository::Repository};

use crate::unwrap;

#[derive(A)]
pub struct Args {
    /// The file to hash.
    file: PathBuf,

    /// Also write the blob into the object store.
    #[arg(short, long)]
    write: bool
}

pub fn parse(args: Args) -> Result<()> {
    let content = unwrap!(
        fs::read(&args.file),
        "failed to read {}",
        args.file.display()
    );

    let hash = if args.write {
        let repo = Repository::load()?;

        repo.store.put(content)?
    }
    else {
        hash_raw_bytes(content)
    };

    println!("{hash}");

    Ok(())
}
