use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::BadgeResult;

/// Suffix appended to every downloaded badge.
pub const DOWNLOAD_SUFFIX: &str = "_HER_DAO_Badge.png";

/// `<name with whitespace runs replaced by "_">_HER_DAO_Badge.png`.
///
/// Path separators are replaced too, so the result is always a bare file name.
pub fn download_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + DOWNLOAD_SUFFIX.len());
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        out.push(if matches!(ch, '/' | '\\') { '_' } else { ch });
    }
    out.push_str(DOWNLOAD_SUFFIX);
    out
}

/// Receives a finished badge as a named file.
pub trait DownloadSink {
    /// Store `bytes` under `file_name`, returning where they went.
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> BadgeResult<PathBuf>;
}

/// Saves downloads into a directory, creating it on first use.
#[derive(Clone, Debug)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    /// Downloads land in `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectoryDownloads {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> BadgeResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create download dir '{}'", self.dir.display()))?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)
            .with_context(|| format!("write badge to '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "saved download");
        Ok(path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/share/download.rs"]
mod tests;
