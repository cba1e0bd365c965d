//! Input manager for collecting resume documents

use crate::error::{Result, ResumeRankerError};
use crate::input::file_detector::FileType;
use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Suffix of the field-tree files that sit next to a resume.
pub const SIDECAR_SUFFIX: &str = ".fields.json";

/// One resume submitted for ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeDocument {
    pub path: PathBuf,
    pub file_name: String,
    pub file_type: FileType,
}

impl ResumeDocument {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                ResumeRankerError::InvalidInput(format!("Not a file path: {}", path.display()))
            })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ResumeRankerError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            file_type: FileType::from_extension(extension),
        })
    }

    /// Path of the `<file>.fields.json` sidecar holding pre-extracted fields.
    pub fn sidecar_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(SIDECAR_SUFFIX);
        PathBuf::from(name)
    }
}

pub struct InputManager {
    extensions: Vec<String>,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            extensions: vec!["pdf".to_string(), "json".to_string()],
        }
    }

    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        self.extensions = extensions.iter().map(|ext| ext.to_lowercase()).collect();
        self
    }

    /// Collect resumes from files and directories, in submission order.
    ///
    /// Directories are scanned one level deep and their entries sorted by
    /// file name. Files with other extensions are skipped inside directories
    /// but rejected when named explicitly.
    pub async fn collect(&self, paths: &[PathBuf]) -> Result<Vec<ResumeDocument>> {
        let mut documents = Vec::new();

        for path in paths {
            if !path.exists() {
                return Err(ResumeRankerError::InvalidInput(format!(
                    "Path does not exist: {}",
                    path.display()
                )));
            }

            if path.is_dir() {
                let found = self.scan_directory(path).await?;
                info!("Found {} resumes in {}", found.len(), path.display());
                documents.extend(found);
            } else {
                if !self.is_accepted(path) {
                    return Err(ResumeRankerError::UnsupportedFormat(format!(
                        "{} (accepted: {})",
                        path.display(),
                        self.extensions.join(", ")
                    )));
                }
                documents.push(ResumeDocument::from_path(path)?);
            }
        }

        Ok(documents)
    }

    async fn scan_directory(&self, dir: &Path) -> Result<Vec<ResumeDocument>> {
        let mut entries = fs::read_dir(dir).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if is_sidecar(&path) {
                continue;
            }
            if self.is_accepted(&path) {
                files.push(path);
            } else {
                debug!("Skipping {}", path.display());
            }
        }

        files.sort();
        files.iter().map(|path| ResumeDocument::from_path(path)).collect()
    }

    fn is_accepted(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

fn is_sidecar(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(SIDECAR_SUFFIX))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_path() {
        let doc = ResumeDocument::from_path(Path::new("resumes/jane.pdf")).unwrap();
        assert_eq!(doc.file_name, "jane.pdf");
        assert_eq!(doc.file_type, FileType::Pdf);
        assert_eq!(doc.sidecar_path(), PathBuf::from("resumes/jane.pdf.fields.json"));
    }

    #[test]
    fn test_path_without_extension() {
        assert!(ResumeDocument::from_path(Path::new("resumes/README")).is_err());
    }

    #[tokio::test]
    async fn test_collect_directory_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.pdf", "a.pdf.fields.json", "notes.txt", "c.json"] {
            std::fs::write(dir.path().join(name), b"{}").unwrap();
        }

        let manager = InputManager::new();
        let docs = manager.collect(&[dir.path().to_path_buf()]).await.unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.file_name.as_str()).collect();

        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.json"]);
    }

    #[tokio::test]
    async fn test_explicit_unsupported_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        std::fs::write(&path, b"").unwrap();

        let result = InputManager::new().collect(&[path]).await;
        assert!(matches!(result, Err(ResumeRankerError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_missing_path() {
        let result = InputManager::new()
            .collect(&[PathBuf::from("does/not/exist.pdf")])
            .await;
        assert!(result.is_err());
    }
}
