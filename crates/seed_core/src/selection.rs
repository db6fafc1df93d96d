//! The user's current set of chosen image files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
enum FileSource {
    Disk(PathBuf),
    Memory(Vec<u8>),
}

/// One file chosen by the user. Contents are read only when uploading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    source: FileSource,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            source: FileSource::Disk(path),
        }
    }

    pub fn in_memory(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Memory(bytes.into()),
        }
    }

    /// File name sent with the multipart part.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Disk(p) => Some(p),
            FileSource::Memory(_) => None,
        }
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.source {
            FileSource::Disk(p) => {
                fs::read(p).with_context(|| format!("cannot read {}", p.display()))
            }
            FileSource::Memory(b) => Ok(b.clone()),
        }
    }

    /// Content type guessed from the extension.
    pub fn content_type(&self) -> &'static str {
        match Path::new(&self.name).extension().and_then(|s| s.to_str()) {
            Some(ext) => match ext.to_ascii_lowercase().as_str() {
                "jpg" | "jpeg" => "image/jpeg",
                "png" => "image/png",
                "bmp" => "image/bmp",
                "gif" => "image/gif",
                "webp" => "image/webp",
                "tif" | "tiff" => "image/tiff",
                _ => "application/octet-stream",
            },
            None => "application/octet-stream",
        }
    }
}

/// Ordered selection, replaced wholesale on every pick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    files: Vec<SelectedFile>,
}

impl FileSelection {
    /// Replace the selection verbatim. No dedup and no filtering.
    pub fn set_files(&mut self, selection: impl IntoIterator<Item = SelectedFile>) {
        self.files = selection.into_iter().collect();
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
