use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

const NAMED_SAMPLE_SIZE: usize = 5;
const BIND_HEAD_LINES: usize = 5;

#[derive(Debug, Clone)]
pub struct BindSnapshot {
    pub files: Vec<String>,
    pub head: String,
}

#[derive(Debug, Clone)]
pub struct TmpfsRoundTrip {
    pub wrote: PathBuf,
    pub read_back: String,
}

/// Reads and writes the three mount points the volumes demo exposes.
pub struct VolumeService {
    named_path: PathBuf,
    bind_path: PathBuf,
    bind_sample_file: String,
    tmpfs_path: PathBuf,
}

impl VolumeService {
    pub fn new(
        named_path: impl Into<PathBuf>,
        bind_path: impl Into<PathBuf>,
        bind_sample_file: impl Into<String>,
        tmpfs_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            named_path: named_path.into(),
            bind_path: bind_path.into(),
            bind_sample_file: bind_sample_file.into(),
            tmpfs_path: tmpfs_path.into(),
        }
    }

    pub fn named_path(&self) -> &Path {
        &self.named_path
    }

    pub fn bind_path(&self) -> &Path {
        &self.bind_path
    }

    pub fn tmpfs_path(&self) -> &Path {
        &self.tmpfs_path
    }

    async fn list_dir(path: &Path) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(path)
            .await
            .with_context(|| format!("Failed to read directory {}", path.display()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    /// First few entries of the named volume.
    pub async fn sample_named(&self) -> Result<Vec<String>> {
        let mut names = Self::list_dir(&self.named_path).await?;
        names.truncate(NAMED_SAMPLE_SIZE);
        Ok(names)
    }

    pub async fn inspect_bind(&self) -> Result<BindSnapshot> {
        let files = Self::list_dir(&self.bind_path).await?;
        let sample = self.bind_path.join(&self.bind_sample_file);
        let content = tokio::fs::read_to_string(&sample)
            .await
            .with_context(|| format!("Failed to read {}", sample.display()))?;
        let head = content
            .split('\n')
            .take(BIND_HEAD_LINES)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(BindSnapshot { files, head })
    }

    /// Write a timestamped file to the tmpfs mount and read it straight back.
    pub async fn round_trip_tmpfs(&self) -> Result<TmpfsRoundTrip> {
        let now = Utc::now();
        let wrote = self
            .tmpfs_path
            .join(format!("demo-{}.txt", now.timestamp_millis()));
        let payload = format!(
            "Written at {} by PID {}",
            now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            std::process::id()
        );

        tokio::fs::write(&wrote, &payload)
            .await
            .with_context(|| format!("Failed to write {}", wrote.display()))?;
        let read_back = tokio::fs::read_to_string(&wrote)
            .await
            .with_context(|| format!("Failed to read {}", wrote.display()))?;

        Ok(TmpfsRoundTrip { wrote, read_back })
    }
}
