use std::{env, fs, io::ErrorKind, path::{Path, PathBuf}};

use chrono::Local;

use crate::{commit::{Commit, History}, error::{Error, Result}, hash::ObjectHash, index::Index, store::ObjectStore, tree};

/// Name of the metadata directory that marks a repository root.
pub const REPO_DIR: &str = ".mgit";

/// An open repository: a working directory with a metadata directory
/// inside it holding the object store, the HEAD pointer and the index.
pub struct Repository {
    pub root_dir: PathBuf,
    pub store: ObjectStore
}

impl Repository {
    /// Create the repository layout inside `root` and return the opened
    /// repository.
    ///
    /// This builds `.mgit/` with its objects directory, the (unused)
    /// refs scaffolding and an empty config file. Running init again
    /// over an existing repository is harmless and leaves its contents
    /// alone.
    pub fn init(root: impl AsRef<Path>) -> Result<Repository> {
        let root_dir = root
            .as_ref()
            .canonicalize()
            .map_err(Error::read(root.as_ref()))?;

        let main_dir = root_dir.join(REPO_DIR);

        for subdir in ["objects", "refs/heads", "refs/tags"] {
            let path = main_dir.join(subdir);

            fs::create_dir_all(&path).map_err(Error::write(&path))?;
        }

        let config = main_dir.join("config");

        if !config.is_file() {
            fs::write(&config, "").map_err(Error::write(&config))?;
        }

        Ok(Repository {
            root_dir,
            store: ObjectStore::new(main_dir.join("objects"))
        })
    }

    /// Load the repository containing the current working directory,
    /// searching upwards until a directory holding `.mgit` is found.
    pub fn load() -> Result<Repository> {
        let start = env::current_dir()
            .map_err(|e| Error::StorageRead { path: PathBuf::from("."), source: e })?;

        let Some(root_dir) = locate_root_dir(&start)? else {
            return Err(Error::NotARepository(start));
        };

        Repository::load_from(root_dir)
    }

    /// Load the repository rooted exactly at `root_dir`.
    ///
    /// This does **NOT** search upwards for a valid directory, and will
    /// simply fail.
    pub fn load_from(root_dir: impl AsRef<Path>) -> Result<Repository> {
        let root_dir = root_dir
            .as_ref()
            .canonicalize()
            .map_err(Error::read(root_dir.as_ref()))?;

        if !root_dir.join(REPO_DIR).is_dir() {
            return Err(Error::NotARepository(root_dir));
        }

        let store = ObjectStore::new(root_dir.join(REPO_DIR).join("objects"));

        Ok(Repository { root_dir, store })
    }

    /// Get the directory the repository keeps its metadata in.
    pub fn main_dir(&self) -> PathBuf {
        self.root_dir.join(REPO_DIR)
    }

    /// Where the HEAD pointer lives.
    pub fn head_path(&self) -> PathBuf {
        self.main_dir().join("HEAD")
    }

    /// Open the staging index.
    pub fn index(&self) -> Index {
        Index::new(self.main_dir().join("index"))
    }

    /// Read the hash of the current commit.
    ///
    /// Before the first commit there is nothing to point at, so this is
    /// `None` when the HEAD file is absent or empty.
    pub fn head(&self) -> Result<Option<ObjectHash>> {
        let content = match fs::read_to_string(self.head_path()) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::StorageRead { path: self.head_path(), source: e });
            }
        };

        let trimmed = content.trim();

        if trimmed.is_empty() {
            return Ok(None);
        }

        Ok(Some(trimmed.parse()?))
    }

    /// Point HEAD at a commit.
    pub fn set_head(&self, hash: ObjectHash) -> Result<()> {
        fs::write(self.head_path(), hash.full()).map_err(Error::write(self.head_path()))
    }

    /// Snapshot the working tree into the object store, returning the
    /// hash of its root tree object.
    pub fn write_tree(&self) -> Result<ObjectHash> {
        tree::write_tree(&self.store, &self.root_dir)
    }

    /// Fetch and parse a commit object.
    pub fn read_commit(&self, hash: ObjectHash) -> Result<Commit> {
        Commit::parse(self.store.get(hash)?)
    }

    /// Snapshot the working tree and record it as a new commit, moving
    /// HEAD forward.
    ///
    /// The commit HEAD pointed at before, if any, becomes the new
    /// commit's parent. `author` is stored as given, with the current
    /// local time appended.
    pub fn commit(&self, author: &str, message: &str) -> Result<ObjectHash> {
        let tree = self.write_tree()?;

        let parent = self.head()?;

        let timestamp = Local::now().format("%a %b %e %H:%M:%S %Y");

        let commit = Commit {
            tree,
            parent,
            author: format!("{author} {timestamp}"),
            message: message.to_string()
        };

        let hash = self.store.put(commit.serialize())?;

        self.set_head(hash)?;

        Ok(hash)
    }

    /// Walk the commit chain from HEAD back to the first commit.
    pub fn history(&self) -> Result<History<'_>> {
        let Some(head) = self.head()? else {
            return Err(Error::NoCommits);
        };

        Ok(History::new(&self.store, Some(head)))
    }

    /// Replace the working tree with another commit's snapshot and move
    /// HEAD to that commit.
    ///
    /// The target is fetched and parsed before anything is deleted, so a
    /// missing or malformed commit leaves both the working tree and HEAD
    /// exactly as they were.
    pub fn checkout(&self, target: ObjectHash) -> Result<()> {
        let commit = self.read_commit(target)?;

        if !self.store.exists(commit.tree) {
            return Err(Error::ObjectNotFound(commit.tree));
        }

        self.clear_working_tree()?;

        tree::restore_tree(&self.store, commit.tree, &self.root_dir)?;

        self.set_head(target)?;

        Ok(())
    }

    // Remove everything in the working tree except the metadata
    // directory. Entries that refuse to go are reported and skipped.
    fn clear_working_tree(&self) -> Result<()> {
        let listing = fs::read_dir(&self.root_dir).map_err(Error::read(&self.root_dir))?;

        for entry in listing {
            let entry = entry.map_err(Error::read(&self.root_dir))?;

            if entry.file_name() == REPO_DIR {
                continue;
            }

            let path = entry.path();

            let removed = match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => fs::remove_dir_all(&path),
                Ok(_) => fs::remove_file(&path),
                Err(e) => Err(e)
            };

            if let Err(e) = removed {
                tracing::warn!("Failed to remove {}: {}", path.display(), e);
            }
        }

        Ok(())
    }
}

fn locate_root_dir(from: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    let absolute = from
        .as_ref()
        .canonicalize()
        .map_err(Error::read(from.as_ref()))?;

    let mut current: &Path = &absolute;

    while !current.join(REPO_DIR).is_dir() {
        let Some(parent) = current.parent() else {
            return Ok(None);
        };

        current = parent;
    }

    Ok(Some(current.to_path_buf()))
}
