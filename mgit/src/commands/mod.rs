mod add;
mod cat_file;
mod checkout;
mod commit;
mod hash_object;
mod init;
mod log;
mod ls_tree;
mod write_tree;

use clap::{Parser, Subcommand};

/// A miniature content-addressed version control tool.
#[derive(Parser)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new repository.
    Init(init::Args),

    /// Hash files into the object store and record them in the staging index.
    Add(add::Args),

    /// Snapshot the working tree as a new commit.
    #[command(visible_alias = "ci")]
    Commit(commit::Args),

    /// View the commit history of the repository.
    Log(log::Args),

    /// Replace the working tree with another commit's snapshot.
    Checkout(checkout::Args),

    /// Print the blob hash of a file.
    HashObject(hash_object::Args),

    /// Inspect a stored object by hash.
    CatFile(cat_file::Args),

    /// Snapshot the working tree and print its tree hash.
    WriteTree,

    /// List the entries of a tree object.
    LsTree(ls_tree::Args)
}

pub fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    use Commands::*;

    match cli.command {
        Init(args) => init::parse(args),
        Add(args) => add::parse(args),
        Commit(args) => commit::parse(args),
        Log(args) => log::parse(args),
        Checkout(args) => checkout::parse(args),
        HashObject(args) => hash_object::parse(args),
        CatFile(args) => cat_file::parse(args),
        WriteTree => write_tree::parse(),
        LsTree(args) => ls_tree::parse(args)
    }
}
