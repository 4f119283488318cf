use std::{fs, path::{Path, PathBuf}};

use clap::Args as A;
use eyre::Result;

use libmgit::{hash_raw_bytes, repository::{REPO_DIR, Repository}};

#[derive(A)]
pub struct Args {
    /// The files to record, or `.` for every file under the repository root.
    #[arg(required = true)]
    paths: Vec<PathBuf>
}

pub fn parse(args: Args) -> Result<()> {
    let repo = Repository::load()?;

    let files = if args.paths.iter().any(|p| p.as_os_str() == ".") {
        collect_files(&repo.root_dir)?
    }
    else {
        args.paths
    };

    let index = repo.index();

    for file in files {
        let content = match fs::read(&file) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Failed to read {}: {e}", file.display());
                continue;
            }
        };

        let hash = hash_raw_bytes(&content);

        if index.contains(hash)? {
            println!("Skipped {}, already staged.", file.display());
            continue;
        }

        repo.store.put(content)?;

        index.append(hash, &file)?;

        println!("Added {} to staging area.", file.display());
    }

    Ok(())
}

fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = vec![];

    for entry in fs::read_dir(dir)? {
        let entry = entry?;

        if entry.file_name() == REPO_DIR {
            continue;
        }

        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            files.extend(collect_files(&entry.path())?);
        }
        else if file_type.is_file() {
            files.push(entry.path());
        }
    }

    Ok(files)
}
