//! Scratch space for job media.
//!
//! Every job gets its own input and output path under one root directory.
//! Paths are derived from the job id, so two jobs never share a file.
//! Removal is best-effort: a file that is already gone is fine, any other
//! failure is logged and otherwise ignored.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use strum::{AsRefStr, Display};
use uuid::Uuid;

/// What a scratch file holds for its job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ScratchRole {
    /// Media downloaded from the chat
    Input,
    /// Encoder output sent back to the chat
    Output,
}

/// Root directory that hands out per-job file paths.
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    root: PathBuf,
}

impl ScratchSpace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root directory if it does not exist yet.
    pub async fn prepare(&self) -> std::io::Result<()> {
        fs_err::tokio::create_dir_all(&self.root).await
    }

    /// Returns the path a job should use for `role`.
    ///
    /// Nothing is created on disk; the stage that writes the file does that.
    pub fn allocate(&self, job_id: Uuid, role: ScratchRole, extension: &str) -> PathBuf {
        let extension = sanitize_extension(extension);
        self.root.join(format!("{}_{}.{}", job_id, role, extension))
    }

    /// Deletes `path`, swallowing every error.
    pub async fn release(&self, path: &Path) {
        match fs_err::tokio::remove_file(path).await {
            Ok(()) => log::debug!("Removed scratch file {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove scratch file: {}", e),
        }
    }

    /// Blocking variant of [`release`](Self::release) for drop paths,
    /// where no runtime may be available.
    pub fn release_blocking(&self, path: &Path) {
        match fs_err::remove_file(path) {
            Ok(()) => log::debug!("Removed scratch file {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove scratch file: {}", e),
        }
    }
}

/// Keeps only a short alphanumeric extension; anything else becomes `mp4`.
fn sanitize_extension(extension: &str) -> String {
    let ext = extension.trim_start_matches('.');
    if !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        ext.to_ascii_lowercase()
    } else {
        "mp4".to_string()
    }
}

/// Extension of a user-supplied file name, if it has a usable one.
pub fn extension_of(display_name: &str) -> &str {
    Path::new(display_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("mp4")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_is_unique_per_job_and_role() {
        let scratch = ScratchSpace::new("/tmp/scratch");
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let a_in = scratch.allocate(a, ScratchRole::Input, "mp4");
        let a_out = scratch.allocate(a, ScratchRole::Output, "mp4");
        let b_in = scratch.allocate(b, ScratchRole::Input, "mp4");

        assert_ne!(a_in, a_out);
        assert_ne!(a_in, b_in);
        assert!(a_in.starts_with("/tmp/scratch"));
        assert!(a_in.to_string_lossy().ends_with("_input.mp4"));
        assert!(a_out.to_string_lossy().ends_with("_output.mp4"));
    }

    #[test]
    fn test_sanitize_extension() {
        assert_eq!(sanitize_extension("MKV"), "mkv");
        assert_eq!(sanitize_extension(".webm"), "webm");
        assert_eq!(sanitize_extension(""), "mp4");
        assert_eq!(sanitize_extension("../../etc"), "mp4");
        assert_eq!(sanitize_extension("averyverylongext"), "mp4");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("clip.mov"), "mov");
        assert_eq!(extension_of("clip"), "mp4");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
    }

    #[tokio::test]
    async fn test_prepare_creates_nested_root() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchSpace::new(dir.path().join("a/b/c"));
        scratch.prepare().await.unwrap();
        assert!(scratch.root().is_dir());
        // Idempotent
        scratch.prepare().await.unwrap();
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchSpace::new(dir.path());
        let path = scratch.allocate(Uuid::new_v4(), ScratchRole::Input, "mp4");

        tokio::fs::write(&path, b"data").await.unwrap();
        scratch.release(&path).await;
        assert!(!path.exists());

        // Second release of a missing file is silent
        scratch.release(&path).await;
        scratch.release_blocking(&path);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_release_swallows_non_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchSpace::new(dir.path());
        let nested = dir.path().join("a_directory");
        tokio::fs::create_dir(&nested).await.unwrap();

        // Removing a directory with remove_file fails; must not panic or propagate
        scratch.release(&nested).await;
        scratch.release_blocking(&nested);
        assert!(nested.exists());
    }
}
