use eyre::Result;

use libmgit::repository::Repository;

pub fn parse() -> Result<()> {
    let repo = Repository::load()?;

    let hash = repo.write_tree()?;

    println!("{hash}");

    Ok(())
}
