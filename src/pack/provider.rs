use super::{sanitize_packs, PackError, WordPack};
use include_dir::{include_dir, Dir};
use serde_json::from_str;
use std::fs;
use std::path::{Path, PathBuf};

static PACK_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/packs");

/// Source of word packs. Runs on the loader thread, so implementations
/// must be movable across threads.
pub trait PackProvider: Send + 'static {
    /// Fetch the ordered list of packs. An empty list is a valid answer.
    fn fetch_packs(&self) -> Result<Vec<WordPack>, PackError>;

    /// Human readable origin, used in logs
    fn describe(&self) -> String;
}

/// Packs compiled into the binary from `src/packs`
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledProvider;

impl PackProvider for BundledProvider {
    fn fetch_packs(&self) -> Result<Vec<WordPack>, PackError> {
        let mut packs = PACK_DIR
            .files()
            .filter(|f| f.path().extension().is_some_and(|ext| ext == "json"))
            .map(|file| {
                let origin = file.path().display().to_string();
                let contents = file
                    .contents_utf8()
                    .ok_or_else(|| PackError::Missing(origin.clone()))?;
                from_str::<WordPack>(contents).map_err(|source| PackError::Parse { origin, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        packs.sort_by_key(|p| p.id);
        Ok(sanitize_packs(packs))
    }

    fn describe(&self) -> String {
        "bundled packs".to_string()
    }
}

/// Packs read from a JSON file holding an array of packs
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl PackProvider for FileProvider {
    fn fetch_packs(&self) -> Result<Vec<WordPack>, PackError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| PackError::Io {
            path: self.path.clone(),
            source,
        })?;
        let packs: Vec<WordPack> = from_str(&contents).map_err(|source| PackError::Parse {
            origin: self.path.display().to_string(),
            source,
        })?;
        Ok(sanitize_packs(packs))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory packs
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    packs: Vec<WordPack>,
}

impl StaticProvider {
    pub fn new(packs: Vec<WordPack>) -> Self {
        Self { packs }
    }
}

impl PackProvider for StaticProvider {
    fn fetch_packs(&self) -> Result<Vec<WordPack>, PackError> {
        Ok(sanitize_packs(self.packs.clone()))
    }

    fn describe(&self) -> String {
        format!("{} in-memory packs", self.packs.len())
    }
}
