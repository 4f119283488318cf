use std::collections::HashSet;

use crate::{error::{Error, Result}, hash::ObjectHash, store::ObjectStore};

/// A commit object: a tree, at most one parent, an author line and a
/// message.
///
/// The stored form is plain text:
///
/// ```text
/// tree <hash>
/// parent <hash>        (omitted on the first commit)
/// author <name> <email> <timestamp>
///
/// <message>
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Commit {
    pub tree: ObjectHash,
    pub parent: Option<ObjectHash>,
    pub author: String,
    pub message: String
}

impl Commit {
    /// Parse a commit object from its stored form.
    pub fn parse(content: impl AsRef<[u8]>) -> Result<Commit> {
        let text = std::str::from_utf8(content.as_ref())
            .map_err(|_| Error::malformed_commit("content is not valid utf-8"))?;

        let (headers, message) = text
            .split_once("\n\n")
            .ok_or_else(|| Error::malformed_commit("no blank line before the message"))?;

        let mut tree = None;
        let mut parent = None;
        let mut author: Option<String> = None;

        for line in headers.lines() {
            if let Some(rest) = line.strip_prefix("tree ") {
                if tree.is_some() {
                    return Err(Error::malformed_commit("more than one tree header"));
                }

                tree = Some(parse_header_hash("tree", rest)?);
            }
            else if let Some(rest) = line.strip_prefix("parent ") {
                if parent.is_some() {
                    return Err(Error::malformed_commit("more than one parent header"));
                }

                parent = Some(parse_header_hash("parent", rest)?);
            }
            else if let Some(rest) = line.strip_prefix("author ") {
                if author.is_some() {
                    return Err(Error::malformed_commit("more than one author header"));
                }

                author = Some(rest.to_string());
            }
            else {
                return Err(Error::malformed_commit(format!("unrecognised header {line:?}")));
            }
        }

        let Some(tree) = tree else {
            return Err(Error::MissingTreeReference);
        };

        let Some(author) = author else {
            return Err(Error::malformed_commit("missing author header"));
        };

        let message = message
            .strip_suffix('\n')
            .unwrap_or(message)
            .to_string();

        Ok(Commit { tree, parent, author, message })
    }

    /// Serialize into the stored form.
    pub fn serialize(&self) -> String {
        let mut out = format!("tree {}\n", self.tree);

        if let Some(parent) = self.parent {
            out.push_str(&format!("parent {parent}\n"));
        }

        out.push_str(&format!("author {}\n", self.author));

        out.push_str(&format!("\n{}\n", self.message));

        out
    }
}

fn parse_header_hash(header: &str, value: &str) -> Result<ObjectHash> {
    value
        .parse()
        .map_err(|_| Error::malformed_commit(format!("bad hash in {header} header: {value:?}")))
}

/// An iterator over a commit chain, newest first.
///
/// Each step fetches and parses one commit, yielding its hash alongside
/// the parsed [`Commit`]. A hash that shows up twice in the chain is
/// reported as a malformed commit instead of looping forever. After any
/// error the iterator is exhausted.
pub struct History<'a> {
    store: &'a ObjectStore,
    next: Option<ObjectHash>,
    seen: HashSet<ObjectHash>
}

impl<'a> History<'a> {
    /// Start walking from the given commit, or nowhere if `None`.
    pub fn new(store: &'a ObjectStore, from: Option<ObjectHash>) -> History<'a> {
        History {
            store,
            next: from,
            seen: HashSet::new()
        }
    }
}

impl Iterator for History<'_> {
    type Item = Result<(ObjectHash, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let hash = self.next?;

        if !self.seen.insert(hash) {
            self.next = None;

            return Some(Err(Error::malformed_commit(format!(
                "{hash} repeats in its own parent chain"
            ))));
        }

        let commit = match self.store.get(hash).and_then(Commit::parse) {
            Ok(commit) => commit,
            Err(e) => {
                self.next = None;

                return Some(Err(e));
            }
        };

        self.next = commit.parent;

        Some(Ok((hash, commit)))
    }
}
