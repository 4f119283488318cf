use clap::Args as A;
use color_eyre::owo_colors::OwoColorize;
use eyre::Result;

use libmgit::repository::Repository;

#[derive(A)]
pub struct Args {
    /// How many commits to display.
    #[arg(short = 'n', long)]
    limit: Option<usize>
}

pub fn parse(args: Args) -> Result<()> {
    let repo = Repository::load()?;

    let head = repo.head()?;

    let limit = args.limit.unwrap_or(usize::MAX);

    for step in repo.history()?.take(limit) {
        let (hash, commit) = step?;

        let line = format!("Commit SHA: {hash}");

        if head == Some(hash) {
            println!("{}", line.green());
        }
        else {
            println!("{line}");
        }

        if let Some(parent) = commit.parent {
            println!("Parent SHA: {parent}");
        }

        println!("Author: {}", commit.author);
        println!("Message: {}", commit.message);
        println!("-----------------------------------------");
    }

    Ok(())
}
