//! Run-scoped file registry.
//!
//! Resolves the relative paths found in a report against the project root,
//! turning each into a canonical `file://` URI and recording one
//! [`FileData`] entry per distinct URI. Content-type inference and MD5
//! hashing happen at most once per file per run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::debug;
use url::Url;

use crate::sarif::{FileData, FileHash};

pub(crate) struct FileRegistry {
    project_root: PathBuf,
    compute_hashes: bool,
    files: BTreeMap<String, FileData>,
}

impl FileRegistry {
    /// `project_root` must be absolute so that joined paths form valid file URIs.
    pub(crate) fn new(project_root: &Path, compute_hashes: bool) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            compute_hashes,
            files: BTreeMap::new(),
        }
    }

    /// Resolve a report path to its file URI, registering the file on first use.
    pub(crate) fn resolve(&mut self, relative: &str) -> Result<String> {
        let absolute = self.project_root.join(relative);
        let uri = Url::from_file_path(&absolute)
            .map_err(|_| anyhow!("cannot build a file URI for {}", absolute.display()))?
            .to_string();
        if !self.files.contains_key(&uri) {
            let mime_type = mime_guess::from_path(&absolute)
                .first()
                .map(|mime| mime.to_string());
            let hashes = if self.compute_hashes {
                hash_file(&absolute)?
            } else {
                None
            };
            debug!(uri = %uri, hashed = hashes.is_some(), "registered file");
            self.files.insert(
                uri.clone(),
                FileData {
                    uri: uri.clone(),
                    mime_type,
                    hashes,
                },
            );
        }
        Ok(uri)
    }

    /// Final URI to file-record catalog for the run.
    pub(crate) fn into_entries(self) -> BTreeMap<String, FileData> {
        self.files
    }
}

// A file missing from disk is expected (e.g. generated sources cleaned up
// after the Infer run) and skips hashing without error.
fn hash_file(path: &Path) -> Result<Option<Vec<FileHash>>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let digest = md5::compute(&bytes);
    Ok(Some(vec![FileHash {
        value: format!("{digest:x}"),
        algorithm: "md5".to_string(),
    }]))
}
