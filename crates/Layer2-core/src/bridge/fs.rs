//! FS API - 프로젝트 루트 아래로 제한된 파일 접근
//!
//! 읽기 계열(`read_file`, `read_dir`, `stats`)은 실패하면 fault를 보고하고 에러도 돌려줍니다.
//! `spawn_write`는 결과를 받을 곳이 없으므로 실패를 fault로만 보고합니다.

use super::Bridge;
use crate::path::scoped_join;
use bridge_foundation::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `stats` 결과 (심볼릭 링크는 따라가지 않음)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    pub is_file: bool,
    pub is_dir: bool,
    pub is_symlink: bool,
    pub len: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl From<std::fs::Metadata> for FileStats {
    fn from(meta: std::fs::Metadata) -> Self {
        Self {
            is_file: meta.is_file(),
            is_dir: meta.is_dir(),
            is_symlink: meta.file_type().is_symlink(),
            len: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        }
    }
}

pub struct FsApi<'a> {
    bridge: &'a Bridge,
}

impl<'a> FsApi<'a> {
    pub(crate) fn new(bridge: &'a Bridge) -> Self {
        Self { bridge }
    }

    /// 상대 경로를 프로젝트 루트 아래 절대 경로로
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        scoped_join(&self.bridge.host().paths.project_root(), path)
    }

    fn reported<T>(&self, result: Result<T>) -> Result<T> {
        result.map_err(|e| {
            self.bridge.report(&e);
            e
        })
    }

    pub async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let result: Result<Vec<u8>> = async {
            let full = self.resolve(path)?;
            Ok(tokio::fs::read(&full).await?)
        }
        .await;
        self.reported(result)
    }

    /// UTF-8 텍스트로 읽기
    pub async fn read_to_string(&self, path: &str) -> Result<String> {
        let bytes = self.read_file(path).await?;
        String::from_utf8(bytes).map_err(|e| {
            let err = Error::corrupt(path, e.to_string());
            self.bridge.report(&err);
            err
        })
    }

    pub fn read_file_sync(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(path)?;
        Ok(std::fs::read(full)?)
    }

    /// 파일 쓰기 (부모 디렉토리가 없으면 생성)
    pub async fn write_file(&self, path: &str, data: impl AsRef<[u8]>) -> Result<()> {
        let full = self.resolve(path)?;
        write_with_parents(&full, data.as_ref()).await?;
        debug!(plugin_id = %self.bridge.id(), path, "Wrote project file");
        Ok(())
    }

    /// 백그라운드 쓰기
    ///
    /// tokio 런타임 밖에서 호출되면 fault로 보고합니다.
    pub fn spawn_write(&self, path: &str, data: impl Into<Vec<u8>>) {
        let full = match self.resolve(path) {
            Ok(full) => full,
            Err(e) => return self.bridge.report(&e),
        };
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => return self.bridge.report(&Error::Internal(e.to_string())),
        };

        let data = data.into();
        let bridge = self.bridge.clone();
        handle.spawn(async move {
            if let Err(e) = write_with_parents(&full, &data).await {
                bridge.report(&e);
            }
        });
    }

    /// 디렉토리 항목 이름 (정렬됨)
    pub async fn read_dir(&self, path: &str) -> Result<Vec<String>> {
        let result: Result<Vec<String>> = async {
            let full = self.resolve(path)?;
            let mut entries = tokio::fs::read_dir(&full).await?;
            let mut names = Vec::new();
            while let Some(entry) = entries.next_entry().await? {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
            names.sort();
            Ok(names)
        }
        .await;
        self.reported(result)
    }

    /// 경로 존재 여부 (에러 없음)
    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|full| full.exists()).unwrap_or(false)
    }

    pub async fn stats(&self, path: &str) -> Result<FileStats> {
        let result: Result<FileStats> = async {
            let full = self.resolve(path)?;
            Ok(FileStats::from(tokio::fs::symlink_metadata(&full).await?))
        }
        .await;
        self.reported(result)
    }
}

async fn write_with_parents(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, data).await?;
    Ok(())
}
