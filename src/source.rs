use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Where log files come from. The scanner only ever reads.
pub trait LogSource {
    fn exists(&self, path: &Path) -> bool;
    fn read_lines(&self, path: &Path) -> Result<Vec<String>>;
}

/// Reads from the local filesystem. Invalid UTF-8 is replaced, not rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLogSource;

impl LogSource for FsLogSource {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading log: {}", path.display()))?;
        Ok(String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect())
    }
}

/// In-memory files keyed by path. Lets a caller scan log text it already
/// fetched some other way (a copied share, an archive, a test fixture) through
/// the same [`Scanner`](crate::scanner::Scanner) used for the local disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogSource {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryLogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }
}

impl LogSource for MemoryLogSource {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        let text = self
            .files
            .get(path)
            .with_context(|| format!("no such log: {}", path.display()))?;
        Ok(text.lines().map(str::to_string).collect())
    }
}
