use std::{fs, io::{ErrorKind, Write}, path::PathBuf};

use tempfile::NamedTempFile;

use crate::{compress_data, decompress_data, error::{Error, Result}, hash::ObjectHash, hash_raw_bytes};

/// A content-addressed store of compressed objects.
///
/// Objects live under a single directory, sharded by the first two hex
/// characters of their hash: an object named `abcdef...` is kept at
/// `<objects>/ab/cdef...`. Content is deflated on the way in and
/// inflated on the way out.
///
/// Identical content always maps to the same path, so storing the same
/// bytes twice writes nothing the second time.
pub struct ObjectStore {
    objects_dir: PathBuf,
}

impl ObjectStore {
    /// Open a store rooted at the given objects directory.
    ///
    /// The directory is expected to exist already. Shard subdirectories
    /// are created on demand as objects arrive.
    pub fn new(objects_dir: impl Into<PathBuf>) -> ObjectStore {
        ObjectStore { objects_dir: objects_dir.into() }
    }

    /// Convert an [`ObjectHash`] to its location on disk.
    pub fn object_path(&self, hash: ObjectHash) -> PathBuf {
        let full = hash.full();

        let (dir, rest) = full.split_at(2);

        self.objects_dir
            .join(dir)
            .join(rest)
    }

    /// Check whether an object with this hash is already stored.
    pub fn exists(&self, hash: ObjectHash) -> bool {
        self.object_path(hash).is_file()
    }

    /// Hash `content`, save it compressed, and return its [`ObjectHash`].
    ///
    /// If the object already exists, nothing is written. New objects are
    /// staged in a temporary file and moved into place in one step, so a
    /// crash mid-write never leaves a partial object behind.
    pub fn put(&self, content: impl AsRef<[u8]>) -> Result<ObjectHash> {
        let hash = hash_raw_bytes(&content);

        let path = self.object_path(hash);

        if path.is_file() {
            return Ok(hash);
        }

        if let Some(shard) = path.parent() {
            fs::create_dir_all(shard).map_err(Error::write(shard))?;
        }

        let mut staged = NamedTempFile::new_in(&self.objects_dir)
            .map_err(Error::write(&self.objects_dir))?;

        staged
            .write_all(&compress_data(content))
            .map_err(Error::write(&path))?;

        staged
            .persist(&path)
            .map_err(|e| Error::StorageWrite { path: path.clone(), source: e.error })?;

        Ok(hash)
    }

    /// Fetch the object with this hash and decompress it.
    pub fn get(&self, hash: ObjectHash) -> Result<Vec<u8>> {
        let path = self.object_path(hash);

        let raw = fs::read(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::ObjectNotFound(hash)
            }
            else {
                Error::StorageRead { path: path.clone(), source: e }
            }
        })?;

        decompress_data(raw)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use tempfile::TempDir;

    use super::ObjectStore;
    use crate::{error::Error, hash::ObjectHash};

    fn empty_store() -> (TempDir, ObjectStore) {
        let dir = TempDir::new().unwrap();

        let store = ObjectStore::new(dir.path());

        (dir, store)
    }

    #[test]
    fn stores_and_fetches_content() {
        let (_dir, store) = empty_store();

        let hash = store.put("hello world").unwrap();

        assert!(store.exists(hash));
        assert_eq!(store.get(hash).unwrap(), b"hello world");
    }

    #[test]
    fn shards_objects_by_hash_prefix() {
        let (dir, store) = empty_store();

        let hash = store.put("hello world").unwrap();

        let expected = dir
            .path()
            .join(&hash.full()[..2])
            .join(&hash.full()[2..]);

        assert!(expected.is_file());
    }

    #[test]
    fn storing_twice_is_a_no_op() {
        let (_dir, store) = empty_store();

        let first = store.put("same bytes").unwrap();

        // Replace the stored object with a sentinel. A second put of the
        // same content must skip the write and leave the sentinel alone.
        std::fs::write(store.object_path(first), b"sentinel").unwrap();

        let second = store.put("same bytes").unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(store.object_path(first)).unwrap(), b"sentinel");
    }

    #[test]
    fn missing_objects_are_reported_as_not_found() {
        let (_dir, store) = empty_store();

        let absent = ObjectHash::from_str("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();

        assert!(matches!(
            store.get(absent),
            Err(Error::ObjectNotFound(_))
        ));
    }
}
