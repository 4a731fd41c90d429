//! Infrastructure implementation of the `SettingsStore` port.
//!
//! `LocalSettingsStore` resolves `Pulumi.{yaml,yml,json}` and
//! `Pulumi.<stack>.{yaml,yml,json}` inside a working directory. Reads use the
//! first existing extension in priority order; writes keep that extension
//! (or create `.yaml`) and replace the whole file atomically via a temp file
//! and rename.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use automation_settings::{ProjectSettings, SettingsDocument, SettingsFormat, StackSettings};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::application::ports::SettingsStore;
use crate::domain::error::WorkspaceError;
use crate::domain::stack::{
    DEFAULT_SETTINGS_EXTENSION, PROJECT_SETTINGS_STEM, SETTINGS_EXTENSIONS, settings_file_name,
    settings_format, stack_settings_stem,
};

/// Settings files of one working directory.
#[derive(Debug, Clone)]
pub struct LocalSettingsStore {
    work_dir: PathBuf,
}

impl LocalSettingsStore {
    #[must_use]
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn candidate(&self, stem: &str, ext: &str) -> PathBuf {
        self.work_dir.join(settings_file_name(stem, ext))
    }

    /// Path and format a write of `stem` goes to: the first existing regular
    /// file in priority order, else `<stem>.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if an existence check fails for a reason other than
    /// the file being absent.
    pub async fn resolve_write_target(&self, stem: &str) -> Result<(PathBuf, SettingsFormat)> {
        for ext in SETTINGS_EXTENSIONS {
            let path = self.candidate(stem, ext);
            if is_regular_file(&path).await? {
                return Ok((path, settings_format(ext)));
            }
        }
        let ext = DEFAULT_SETTINGS_EXTENSION;
        Ok((self.candidate(stem, ext), settings_format(ext)))
    }

    async fn read<T: SettingsDocument>(
        &self,
        stem: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<T>> {
        for ext in SETTINGS_EXTENSIONS {
            let path = self.candidate(stem, ext);
            let is_file = tokio::select! {
                found = is_regular_file(&path) => found?,
                () = cancel.cancelled() => return Err(WorkspaceError::Cancelled.into()),
            };
            if !is_file {
                continue;
            }
            let content = tokio::select! {
                read = tokio::fs::read_to_string(&path) => read,
                () = cancel.cancelled() => return Err(WorkspaceError::Cancelled.into()),
            };
            let content = match content {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("reading {}", path.display()));
                }
            };
            tracing::debug!(path = %path.display(), "read settings file");
            let settings = settings_format(ext)
                .decode(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            return Ok(Some(settings));
        }
        Ok(None)
    }

    async fn write<T: Serialize>(
        &self,
        stem: &str,
        settings: &T,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let (path, format) = tokio::select! {
            target = self.resolve_write_target(stem) => target?,
            () = cancel.cancelled() => return Err(WorkspaceError::Cancelled.into()),
        };
        let content = format
            .encode(settings)
            .with_context(|| format!("serializing {}", path.display()))?;

        // Cancellation is honoured up to here. Once started, the write runs to
        // completion so the file is either the old or the new document.
        if cancel.is_cancelled() {
            return Err(WorkspaceError::Cancelled.into());
        }
        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&target, &content))
            .await
            .context("settings write task panicked")??;
        tracing::debug!(path = %path.display(), %format, "wrote settings file");
        Ok(())
    }
}

/// Directories and other non-files at a candidate path are not settings.
async fn is_regular_file(path: &Path) -> Result<bool> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("checking {}", path.display())),
    }
}

/// Write via a sibling temp file then rename over `path`. The temp file is
/// removed again when either step fails.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{file_name}.tmp"));
    let result = std::fs::write(&temp_path, content)
        .with_context(|| format!("writing temp file {}", temp_path.display()))
        .and_then(|()| {
            std::fs::rename(&temp_path, path)
                .with_context(|| format!("finalizing settings file {}", path.display()))
        });
    if result.is_err() {
        match std::fs::remove_file(&temp_path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %temp_path.display(),
                error = %e,
                "failed to remove temp settings file"
            ),
        }
    }
    result
}

impl SettingsStore for LocalSettingsStore {
    async fn load_project(&self, cancel: &CancellationToken) -> Result<Option<ProjectSettings>> {
        self.read(PROJECT_SETTINGS_STEM, cancel).await
    }

    async fn save_project(
        &self,
        settings: &ProjectSettings,
        cancel: &CancellationToken,
    ) -> Result<()> {
        settings.validate()?;
        self.write(PROJECT_SETTINGS_STEM, settings, cancel).await
    }

    async fn load_stack(
        &self,
        stack_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<StackSettings>> {
        self.read(&stack_settings_stem(stack_name), cancel).await
    }

    async fn save_stack(
        &self,
        stack_name: &str,
        settings: &StackSettings,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.write(&stack_settings_stem(stack_name), settings, cancel)
            .await
    }
}
