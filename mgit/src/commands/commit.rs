use std::env;

use clap::Args as A;
use eyre::Result;

use libmgit::repository::Repository;

#[derive(A)]
pub struct Args {
    /// The message describing this commit.
    #[arg(short, long)]
    message: Option<String>
}

pub fn parse(args: Args) -> Result<()> {
    let repo = Repository::load()?;

    let name = env::var("USER").unwrap_or_else(|_| whoami::username());

    let email = env::var("EMAIL").unwrap_or_else(|_| "unknown@localhost".to_string());

    let message = args.message.as_deref().unwrap_or("Default commit message");

    let hash = repo.commit(&format!("{name} {email}"), message)?;

    println!("Commit SHA: {hash}");

    Ok(())
}
