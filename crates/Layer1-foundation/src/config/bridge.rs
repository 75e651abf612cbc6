//! Bridge Config - 플러그인 브릿지 설정
//!
//! 글로벌 설정 위에 프로젝트 설정을 덮어씁니다.

use crate::storage::JsonStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 설정 파일명
pub const BRIDGE_CONFIG_FILE: &str = "bridge.json";

const DEFAULT_CACHE_FILE: &str = ".bridge-cache.json";
const DEFAULT_LOG_LEVEL: &str = "info";

/// 플러그인 브릿지 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// 프로젝트들이 위치한 디렉토리
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<PathBuf>,

    /// 플러그인 스토어 루트
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,

    /// 프로젝트별 캐시 파일 이름
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<String>,

    /// 저장 문서 pretty-print
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty_store: Option<bool>,

    /// 기본 tracing 필터
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        if let Ok(global) = JsonStore::global() {
            if let Some(global_config) = global.load_optional::<BridgeConfig>(BRIDGE_CONFIG_FILE)? {
                config.merge(global_config);
            }
        }

        if let Ok(project) = JsonStore::current_project() {
            if let Some(project_config) =
                project.load_optional::<BridgeConfig>(BRIDGE_CONFIG_FILE)?
            {
                config.merge(project_config);
            }
        }

        Ok(config)
    }

    /// 특정 파일에서 로드
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Config(format!("Invalid config path: {}", path.display())))?;
        JsonStore::new(dir).load(name)
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선)
    pub fn merge(&mut self, other: BridgeConfig) {
        if other.base_path.is_some() {
            self.base_path = other.base_path;
        }
        if other.store_dir.is_some() {
            self.store_dir = other.store_dir;
        }
        if other.cache_file.is_some() {
            self.cache_file = other.cache_file;
        }
        if other.pretty_store.is_some() {
            self.pretty_store = other.pretty_store;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }

    // ========================================================================
    // Resolved values
    // ========================================================================

    /// 프로젝트 디렉토리 (기본: `<data dir>/plugin-bridge/projects`)
    pub fn base_path(&self) -> PathBuf {
        self.base_path
            .clone()
            .unwrap_or_else(|| data_dir().join("projects"))
    }

    /// 스토어 루트 (기본: `<data dir>/plugin-bridge/plugin-store`)
    pub fn store_dir(&self) -> PathBuf {
        self.store_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("plugin-store"))
    }

    pub fn cache_file(&self) -> &str {
        self.cache_file.as_deref().unwrap_or(DEFAULT_CACHE_FILE)
    }

    pub fn pretty_store(&self) -> bool {
        self.pretty_store.unwrap_or(false)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    pub fn with_store_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_dir = Some(path.into());
        self
    }

    pub fn with_cache_file(mut self, name: impl Into<String>) -> Self {
        self.cache_file = Some(name.into());
        self
    }

    pub fn with_pretty_store(mut self, pretty: bool) -> Self {
        self.pretty_store = Some(pretty);
        self
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plugin-bridge")
}
