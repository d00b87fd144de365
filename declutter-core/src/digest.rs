//! Content digests for hash matching.
//!
//! Hashing reads the whole file, so the walker only asks for a digest when the
//! rule set actually has `remove_hash` entries and the entry is a regular file.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Computes a content digest for a file, as lower-case hex.
pub trait Digester {
    fn digest(&self, path: &Path) -> io::Result<String>;
}

/// SHA-256 over the full file content.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Digester;

impl Digester for Sha256Digester {
    fn digest(&self, path: &Path) -> io::Result<String> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut hasher = Sha256::new();
        io::copy(&mut reader, &mut hasher)?;
        Ok(hex::encode(hasher.finalize()))
    }
}
