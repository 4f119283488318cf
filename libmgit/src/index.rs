use std::{fs::{self, OpenOptions}, io::Write, path::{Path, PathBuf}};

use crate::{error::{Error, Result}, hash::ObjectHash};

/// The staging index: an append-only text file of `<hash> <path>` lines.
///
/// The index only records what `add` has already hashed, so repeated
/// adds of unchanged content can say so instead of storing again.
/// Commits snapshot the whole working tree and never consult it.
pub struct Index {
    path: PathBuf
}

impl Index {
    /// Open the index stored at the given path. The file itself is only
    /// created once something is recorded.
    pub fn new(path: impl Into<PathBuf>) -> Index {
        Index { path: path.into() }
    }

    /// Check whether a hash has already been recorded.
    pub fn contains(&self, hash: ObjectHash) -> Result<bool> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                return Err(Error::StorageRead { path: self.path.clone(), source: e });
            }
        };

        let needle = hash.full();

        Ok(content
            .lines()
            .any(|line| line.split(' ').next() == Some(needle.as_str())))
    }

    /// Record a hash and the path its content came from.
    pub fn append(&self, hash: ObjectHash, source: impl AsRef<Path>) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(Error::write(&self.path))?;

        writeln!(file, "{hash} {}", source.as_ref().display())
            .map_err(Error::write(&self.path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::Index;
    use crate::hash_raw_bytes;

    #[test]
    fn a_missing_index_contains_nothing() {
        let dir = TempDir::new().unwrap();

        let index = Index::new(dir.path().join("index"));

        assert!(!index.contains(hash_raw_bytes("anything")).unwrap());
    }

    #[test]
    fn records_hashes_one_line_at_a_time() {
        let dir = TempDir::new().unwrap();

        let path = dir.path().join("index");

        let index = Index::new(&path);

        let first = hash_raw_bytes("one");
        let second = hash_raw_bytes("two");

        index.append(first, "one.txt").unwrap();
        index.append(second, "deeply/nested/two.txt").unwrap();

        assert!(index.contains(first).unwrap());
        assert!(index.contains(second).unwrap());
        assert!(!index.contains(hash_raw_bytes("three")).unwrap());

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{first} one.txt\n{second} deeply/nested/two.txt\n")
        );
    }
}
