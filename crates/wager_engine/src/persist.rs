//! Export files on disk.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use engine_logging::{engine_debug, engine_info};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Attempts at a free `name_N.ext` before giving up.
const MAX_NAME_SUFFIX: u32 = 99;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("no free file name for {0}")]
    NameTaken(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// A directory that receives timestamped exports.
///
/// Files are staged in a temp file next to their destination and linked into
/// place without replacing anything: a second export landing on a taken name
/// (two runs within the same second) gets a numeric suffix instead.
#[derive(Debug, Clone)]
pub struct ExportDir {
    root: PathBuf,
}

impl ExportDir {
    /// Creates `root` when missing and checks that it accepts new files.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let root = root.into();
        let unusable = |e: io::Error| PersistError::OutputDir(format!("{}: {e}", root.display()));
        match fs::metadata(&root) {
            Ok(meta) if !meta.is_dir() => {
                return Err(PersistError::OutputDir(format!(
                    "{} is not a directory",
                    root.display()
                )));
            }
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {
                fs::create_dir_all(&root).map_err(unusable)?;
                engine_info!("Created export directory {}", root.display());
            }
            Err(err) => return Err(unusable(err)),
        }
        NamedTempFile::new_in(&root).map_err(unusable)?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes `content` under `filename`, or the first free suffixed variant.
    pub fn save(&self, filename: &str, content: impl AsRef<[u8]>) -> Result<PathBuf, PersistError> {
        let mut staged = NamedTempFile::new_in(&self.root)?;
        staged.write_all(content.as_ref())?;
        staged.as_file_mut().sync_all()?;

        for attempt in 0..=MAX_NAME_SUFFIX {
            let target = self.root.join(suffixed(filename, attempt));
            match staged.persist_noclobber(&target) {
                Ok(_) => {
                    engine_debug!("Wrote {}", target.display());
                    return Ok(target);
                }
                Err(err) if err.error.kind() == ErrorKind::AlreadyExists => {
                    engine_debug!("{} exists, trying next name", target.display());
                    staged = err.file;
                }
                Err(err) => return Err(err.error.into()),
            }
        }
        Err(PersistError::NameTaken(filename.to_string()))
    }
}

/// `bets.csv` -> `bets_2.csv` for `attempt` 2; attempt 0 keeps the name.
fn suffixed(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{attempt}.{ext}"),
        _ => format!("{filename}_{attempt}"),
    }
}

#[cfg(test)]
mod tests {
    use super::suffixed;

    #[test]
    fn suffix_goes_before_the_extension() {
        assert_eq!(suffixed("fanduel_bets.csv", 0), "fanduel_bets.csv");
        assert_eq!(suffixed("fanduel_bets.csv", 2), "fanduel_bets_2.csv");
        assert_eq!(suffixed("export", 1), "export_1");
        assert_eq!(suffixed(".hidden", 1), ".hidden_1");
    }
}
