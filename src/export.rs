//! Save a tab's code as a plain source file

use crate::tabs::Tab;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension given to every exported file
pub const SOURCE_EXTENSION: &str = "cpp";

const FALLBACK_STEM: &str = "untitled";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Turn a tab name into a safe file stem.
///
/// Keeps ASCII letters, digits, `-` and `_`; everything else becomes `_`,
/// runs of `_` collapse, and leading/trailing `_` are dropped. A name with
/// nothing usable left becomes `untitled`. A trailing `.cpp` in the name is
/// ignored so `main.cpp` exports as `main.cpp`, not `main_cpp.cpp`.
pub fn sanitize_file_stem(name: &str) -> String {
    let name = name.trim();
    let name = name
        .strip_suffix(&format!(".{}", SOURCE_EXTENSION))
        .unwrap_or(name);

    let mut stem = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            stem.push(c);
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }

    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// File name a tab exports to
pub fn export_file_name(tab: &Tab) -> String {
    format!("{}.{}", sanitize_file_stem(tab.name()), SOURCE_EXTENSION)
}

/// Write the tab's code into `dir`, replacing any existing file of the same name
pub fn export_tab(tab: &Tab, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(tab));
    let io_err = |source| ExportError::Io {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(dir).map_err(io_err)?;
    fs::write(&path, tab.code()).map_err(io_err)?;
    log::info!("Exported tab {} to {:?}", tab.id(), path);
    Ok(path)
}
