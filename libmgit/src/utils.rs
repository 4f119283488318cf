use miniz_oxide::{deflate::compress_to_vec, inflate::decompress_to_vec};
use sha1::{Digest, Sha1};

use crate::{error::{Error, Result}, hash::{ObjectHash, RawObjectHash}};

/// Compress data using [`miniz_oxide::deflate::compress_to_vec`].
pub fn compress_data(input: impl AsRef<[u8]>) -> Vec<u8> {
    compress_to_vec(input.as_ref(), 6)
}

/// Decompress data using [`miniz_oxide::inflate::decompress_to_vec`].
///
/// The inflate buffer grows on demand, so callers never have to guess
/// the decompressed size up front.
pub fn decompress_data(input: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    let buf = decompress_to_vec(input.as_ref())
        .map_err(|e| Error::Decompression(e.status))?;

    Ok(buf)
}

/// Compute a SHA-1 hash from the given bytes.
pub fn hash_raw_bytes(input: impl AsRef<[u8]>) -> ObjectHash {
    let mut hasher = Sha1::new();

    hasher.update(input);

    let raw_hash: RawObjectHash = hasher.finalize().into();

    raw_hash.into()
}
