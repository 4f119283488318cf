use std::{env::current_dir, path::PathBuf};

use clap::Args as A;
use eyre::Result;

use libmgit::repository::Repository;

#[derive(A)]
pub struct Args {
    /// The directory to create the repository in.
    /// Defaults to where this command was invoked.
    directory: Option<PathBuf>
}

pub fn parse(args: Args) -> Result<()> {
    let root_dir = match args.directory {
        Some(directory) => directory,
        None => current_dir()?
    };

    let repo = Repository::init(&root_dir)?;

    println!("Initialized empty mgit repository in {}", repo.main_dir().display());

    Ok(())
}
