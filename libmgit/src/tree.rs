use std::{fs, path::Path, str::FromStr};

use derive_more::Display;

use crate::{error::{Error, Result}, hash::ObjectHash, repository::REPO_DIR, store::ObjectStore};

/// What a [`TreeEntry`] points at.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum EntryKind {
    #[display("blob")]
    Blob,

    #[display("tree")]
    Tree
}

/// A single line of a tree object: a named blob or subtree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeEntry {
    pub kind: EntryKind,
    pub hash: ObjectHash,
    pub name: String
}

/// One directory level of a snapshot, as stored in the object store.
///
/// The stored form is plain text, one `<kind> <hash> <name>` line per
/// entry, sorted by name. An empty directory is an empty tree object.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>
}

impl Tree {
    /// Parse a tree object from its stored form.
    pub fn parse(content: impl AsRef<[u8]>) -> Result<Tree> {
        let text = std::str::from_utf8(content.as_ref())
            .map_err(|_| Error::malformed_tree("content is not valid utf-8"))?;

        let mut entries = vec![];

        for line in text.lines() {
            entries.push(parse_entry(line)?);
        }

        Ok(Tree { entries })
    }

    /// Serialize into the stored form.
    pub fn serialize(&self) -> String {
        let mut out = String::new();

        for TreeEntry { kind, hash, name } in &self.entries {
            out.push_str(&format!("{kind} {hash} {name}\n"));
        }

        out
    }
}

fn parse_entry(line: &str) -> Result<TreeEntry> {
    // Names can contain spaces, so only the first two fields are split off.
    let mut fields = line.splitn(3, ' ');

    let (Some(kind), Some(hash), Some(name)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(Error::malformed_tree(format!("too few fields in entry {line:?}")));
    };

    let kind = match kind {
        "blob" => EntryKind::Blob,
        "tree" => EntryKind::Tree,
        other => {
            return Err(Error::malformed_tree(format!("unknown entry kind {other:?}")));
        }
    };

    let hash = ObjectHash::from_str(hash)
        .map_err(|_| Error::malformed_tree(format!("bad hash in entry {line:?}")))?;

    if name.is_empty() {
        return Err(Error::malformed_tree(format!("empty name in entry {line:?}")));
    }

    Ok(TreeEntry { kind, hash, name: name.to_string() })
}

/// Snapshot the directory at `path` into the store, returning the hash
/// of the tree object written for it.
///
/// Files become blob objects and subdirectories become nested trees,
/// built bottom-up so a tree's entries always reference objects that are
/// already stored. The repository's own metadata directory is skipped at
/// every level, as are symlinks and other non-regular files. A file that
/// cannot be read is skipped with a warning rather than failing the
/// whole snapshot.
pub fn write_tree(store: &ObjectStore, path: impl AsRef<Path>) -> Result<ObjectHash> {
    let path = path.as_ref();

    let listing = fs::read_dir(path).map_err(Error::read(path))?;

    let mut entries: Vec<TreeEntry> = vec![];

    for entry in listing {
        let entry = entry.map_err(Error::read(path))?;

        let entry_path = entry.path();

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => {
                tracing::warn!("Skipping {}: name is not valid utf-8", entry_path.display());
                continue;
            }
        };

        if name == REPO_DIR {
            continue;
        }

        let file_type = entry.file_type().map_err(Error::read(&entry_path))?;

        if file_type.is_dir() {
            let hash = write_tree(store, &entry_path)?;

            entries.push(TreeEntry { kind: EntryKind::Tree, hash, name });
        }
        else if file_type.is_file() {
            let content = match fs::read(&entry_path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Skipping unreadable file {}: {}", entry_path.display(), e);
                    continue;
                }
            };

            let hash = store.put(content)?;

            entries.push(TreeEntry { kind: EntryKind::Blob, hash, name });
        }
    }

    // readdir order is platform-dependent; sort so equal content hashes equal.
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    store.put(Tree { entries }.serialize())
}

/// Rebuild files and directories under `path` from a stored tree object.
///
/// The target directory must already exist. Blobs that cannot be fetched
/// or written are skipped with a warning so one bad file does not stop
/// the rest of the restore. Structural problems fail hard: a missing or
/// malformed subtree, an uncreatable directory, or a tree that contains
/// itself somewhere down its own chain.
pub fn restore_tree(store: &ObjectStore, hash: ObjectHash, path: impl AsRef<Path>) -> Result<()> {
    let mut ancestors = vec![];

    restore_tree_inner(store, hash, path.as_ref(), &mut ancestors)
}

fn restore_tree_inner(
    store: &ObjectStore,
    hash: ObjectHash,
    path: &Path,
    ancestors: &mut Vec<ObjectHash>
) -> Result<()> {
    if ancestors.contains(&hash) {
        return Err(Error::malformed_tree(format!("{hash} is its own ancestor")));
    }

    let tree = Tree::parse(store.get(hash)?)?;

    ancestors.push(hash);

    for entry in &tree.entries {
        let target = path.join(&entry.name);

        match entry.kind {
            EntryKind::Blob => {
                let content = match store.get(entry.hash) {
                    Ok(content) => content,
                    Err(e) => {
                        tracing::warn!("Skipping {}: {}", target.display(), e);
                        continue;
                    }
                };

                if let Err(e) = fs::write(&target, content) {
                    tracing::warn!("Failed to restore {}: {}", target.display(), e);
                }
            }

            EntryKind::Tree => {
                fs::create_dir_all(&target).map_err(Error::write(&target))?;

                restore_tree_inner(store, entry.hash, &target, ancestors)?;
            }
        }
    }

    ancestors.pop();

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::str::FromStr;

    use tempfile::TempDir;

    use super::{EntryKind, Tree, TreeEntry, restore_tree, write_tree};
    use crate::{error::Error, hash::ObjectHash, store::ObjectStore};

    const BLOB_HASH: &str = "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed";
    const TREE_HASH: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    #[test]
    fn serialized_trees_parse_back() {
        let tree = Tree {
            entries: vec![
                TreeEntry {
                    kind: EntryKind::Blob,
                    hash: ObjectHash::from_str(BLOB_HASH).unwrap(),
                    name: "a name with spaces.txt".to_string()
                },
                TreeEntry {
                    kind: EntryKind::Tree,
                    hash: ObjectHash::from_str(TREE_HASH).unwrap(),
                    name: "src".to_string()
                },
            ]
        };

        let text = tree.serialize();

        assert_eq!(
            text,
            format!("blob {BLOB_HASH} a name with spaces.txt\ntree {TREE_HASH} src\n")
        );

        assert_eq!(Tree::parse(text).unwrap(), tree);
    }

    #[test]
    fn empty_trees_serialize_to_nothing() {
        let tree = Tree::default();

        assert_eq!(tree.serialize(), "");
        assert_eq!(Tree::parse("").unwrap(), tree);
    }

    #[test]
    fn rejects_malformed_entries() {
        let bad = [
            "blob".to_string(),
            format!("blob {BLOB_HASH}"),
            format!("blob {BLOB_HASH} "),
            format!("link {BLOB_HASH} target"),
            "blob nothex file.txt".to_string(),
        ];

        for line in bad {
            assert!(matches!(
                Tree::parse(&line),
                Err(Error::MalformedObject { kind: "tree", .. })
            ));
        }
    }

    #[test]
    fn written_trees_are_sorted_by_name() {
        let workdir = TempDir::new().unwrap();
        let objects = TempDir::new().unwrap();

        let store = ObjectStore::new(objects.path());

        fs::write(workdir.path().join("zebra.txt"), "z").unwrap();
        fs::write(workdir.path().join("apple.txt"), "a").unwrap();
        fs::create_dir(workdir.path().join("mango")).unwrap();

        let hash = write_tree(&store, workdir.path()).unwrap();

        let tree = Tree::parse(store.get(hash).unwrap()).unwrap();

        let names: Vec<&str> = tree.entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, ["apple.txt", "mango", "zebra.txt"]);
    }

    #[test]
    fn restores_what_was_written() {
        let source = TempDir::new().unwrap();
        let objects = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();

        let store = ObjectStore::new(objects.path());

        fs::write(source.path().join("hello.txt"), "hello").unwrap();
        fs::create_dir(source.path().join("nested")).unwrap();
        fs::write(source.path().join("nested").join("world.txt"), "world").unwrap();

        let hash = write_tree(&store, source.path()).unwrap();

        restore_tree(&store, hash, dest.path()).unwrap();

        assert_eq!(fs::read_to_string(dest.path().join("hello.txt")).unwrap(), "hello");
        assert_eq!(
            fs::read_to_string(dest.path().join("nested").join("world.txt")).unwrap(),
            "world"
        );
    }

    #[test]
    fn identical_directories_share_one_tree_object() {
        let workdir = TempDir::new().unwrap();
        let objects = TempDir::new().unwrap();

        let store = ObjectStore::new(objects.path());

        for dir in ["left", "right"] {
            let path = workdir.path().join(dir);

            fs::create_dir(&path).unwrap();
            fs::write(path.join("same.txt"), "identical content").unwrap();
        }

        let hash = write_tree(&store, workdir.path()).unwrap();

        let tree = Tree::parse(store.get(hash).unwrap()).unwrap();

        assert_eq!(tree.entries.len(), 2);
        assert_eq!(tree.entries[0].hash, tree.entries[1].hash);
    }

    #[test]
    fn self_referencing_trees_fail_restore() {
        let workdir = TempDir::new().unwrap();
        let objects = TempDir::new().unwrap();

        let store = ObjectStore::new(objects.path());

        // Handcraft a tree whose single entry is the tree itself.
        let empty = store.put(Tree::default().serialize()).unwrap();

        let looped = Tree {
            entries: vec![TreeEntry {
                kind: EntryKind::Tree,
                hash: empty,
                name: "inner".to_string()
            }]
        };

        let text = looped.serialize();

        // Overwrite the empty tree's object with content that references
        // its own hash, then try to restore it.
        let payload = crate::compress_data(&text);

        fs::write(store.object_path(empty), payload).unwrap();

        let result = restore_tree(&store, empty, workdir.path());

        assert!(matches!(
            result,
            Err(Error::MalformedObject { kind: "tree", .. })
        ));
    }
}
