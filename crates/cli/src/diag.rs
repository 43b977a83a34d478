//! Diagnostics directory: `parse_tree.txt`, `model.json` and `log.txt`.

use std::fs::File;
use std::path::{Path, PathBuf};

use fsmgen_core::ParseTree;

pub(crate) const PARSE_TREE_FILE: &str = "parse_tree.txt";
pub(crate) const MODEL_FILE: &str = "model.json";
pub(crate) const LOG_FILE: &str = "log.txt";

#[derive(Debug)]
pub(crate) struct DiagDir {
    root: PathBuf,
}

impl DiagDir {
    /// Creates `dir` (and its parents) if missing.
    pub(crate) fn create(dir: &Path) -> Result<Self, String> {
        std::fs::create_dir_all(dir).map_err(|e| {
            format!("could not create diagnostics directory '{}': {}", dir.display(), e)
        })?;
        Ok(DiagDir {
            root: dir.to_path_buf(),
        })
    }

    /// Truncates and opens the log file.
    pub(crate) fn log_file(&self) -> Result<File, String> {
        let path = self.root.join(LOG_FILE);
        File::create(&path).map_err(|e| format!("could not create '{}': {}", path.display(), e))
    }

    pub(crate) fn write_parse_tree(&self, tree: &ParseTree) -> Result<(), String> {
        self.write(PARSE_TREE_FILE, &tree.to_string())
    }

    pub(crate) fn write_model(&self, json: &str) -> Result<(), String> {
        self.write(MODEL_FILE, json)
    }

    fn write(&self, name: &str, contents: &str) -> Result<(), String> {
        let path = self.root.join(name);
        std::fs::write(&path, contents)
            .map_err(|e| format!("could not write '{}': {}", path.display(), e))?;
        tracing::debug!(path = %path.display(), "diagnostics written");
        Ok(())
    }
}
