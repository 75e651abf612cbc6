//! JSON 문서 저장소
//!
//! `<base_dir>/<name>` 파일 하나에 JSON 문서 하나를 저장합니다.
//! 확장자는 강제하지 않습니다.

use super::finite::ensure_finite;
use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON 문서 저장소
#[derive(Debug, Clone)]
pub struct JsonStore {
    base_dir: PathBuf,
    pretty: bool,
}

impl JsonStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            pretty: false,
        }
    }

    /// 글로벌 설정 디렉토리 (~/.config/plugin-bridge/)
    pub fn global() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot find config directory".to_string()))?
            .join("plugin-bridge");
        Ok(Self::new(dir).pretty(true))
    }

    /// 프로젝트 설정 디렉토리 (.plugin-bridge/)
    pub fn project(root: impl Into<PathBuf>) -> Self {
        Self::new(root.into().join(".plugin-bridge")).pretty(true)
    }

    /// 현재 디렉토리 프로젝트 설정
    pub fn current_project() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| Error::Config(format!("Cannot get current directory: {}", e)))?;
        Ok(Self::project(cwd))
    }

    /// 저장 시 pretty-print 여부
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// 디렉토리 생성 (이미 존재해도 에러 아님)
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }

    /// JSON 로드
    ///
    /// 일반 파일이 아니면 `NotFound`, 파싱할 수 없으면 `Corrupt`
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.file_path(name);
        if !path.is_file() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(path.display().to_string()));
            }
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Err(Error::corrupt(name, e.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|e| Error::corrupt(name, e.to_string()))
    }

    /// JSON 로드 (Optional)
    pub fn load_optional<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.load(name) {
            Ok(value) => Ok(Some(value)),
            Err(Error::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// JSON 저장
    ///
    /// 직렬화가 끝난 뒤에만 파일을 씁니다. 직렬화 실패나 NaN/±inf는 `ContentValidation`.
    pub fn save<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> Result<()> {
        ensure_finite(data).map_err(|e| Error::ContentValidation(e.to_string()))?;
        let content = if self.pretty {
            serde_json::to_string_pretty(data)
        } else {
            serde_json::to_string(data)
        }
        .map_err(|e| Error::ContentValidation(e.to_string()))?;

        self.ensure_dir()?;
        let path = self.file_path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        debug!(path = %path.display(), "Saved JSON document");
        Ok(())
    }

    /// 파일 존재 여부
    pub fn exists(&self, name: &str) -> bool {
        self.file_path(name).is_file()
    }

    /// 파일 삭제
    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.file_path(name);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// 저장된 문서 이름 목록 (정렬됨)
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}
