//! Host Services - 경로, 문서, 셸, fault 보고, 캐시

use crate::cache::{CacheBackend, ProjectCaches};
use bridge_foundation::{BridgeConfig, Error};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use super::commands::{NullSink, UiStateSink};

// ============================================================================
// PathResolver
// ============================================================================

/// 호스트가 해석한 루트 경로들
///
/// 코어는 절대 경로를 직접 해석하지 않고 이 prefix만 사용합니다.
pub trait PathResolver: Send + Sync {
    /// 현재 프로젝트 루트
    fn project_root(&self) -> PathBuf;

    /// 플러그인 스토어 루트
    fn store_root(&self) -> PathBuf;

    /// 프로젝트들이 위치한 디렉토리
    fn base_path(&self) -> PathBuf;
}

/// 고정 경로 resolver
#[derive(Debug)]
pub struct StaticPaths {
    base_path: PathBuf,
    store_root: PathBuf,
    project: RwLock<Option<String>>,
}

impl StaticPaths {
    pub fn new(base_path: impl Into<PathBuf>, store_root: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            store_root: store_root.into(),
            project: RwLock::new(None),
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.base_path(), config.store_dir())
    }

    pub fn with_project(self, project: impl Into<String>) -> Self {
        *self.project.write() = Some(project.into());
        self
    }

    /// 현재 프로젝트 변경
    pub fn set_project(&self, project: Option<String>) {
        *self.project.write() = project;
    }

    pub fn project(&self) -> Option<String> {
        self.project.read().clone()
    }
}

impl PathResolver for StaticPaths {
    fn project_root(&self) -> PathBuf {
        match self.project.read().as_deref() {
            Some(project) => self.base_path.join(project),
            None => self.base_path.clone(),
        }
    }

    fn store_root(&self) -> PathBuf {
        self.store_root.clone()
    }

    fn base_path(&self) -> PathBuf {
        self.base_path.clone()
    }
}

// ============================================================================
// DocumentHost
// ============================================================================

/// 호스트 문서 시스템에 넘기는 문서
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDocument {
    pub content: String,
    pub raw_content: String,
    pub path: PathBuf,
    pub file_name: String,
}

/// 현재 선택된 파일
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFile {
    pub file_path: String,
    pub content: String,
}

/// 호스트 탭/문서 모델
pub trait DocumentHost: Send + Sync {
    /// 문서 열기
    fn open(&self, document: OpenDocument);

    /// 현재 프로젝트 이름
    fn current_project(&self) -> Option<String>;

    /// 현재 선택된 탐색기 노드
    fn current_selected(&self) -> Option<Value> {
        None
    }

    /// 현재 선택된 파일
    fn current_file(&self) -> Option<ActiveFile> {
        None
    }
}

/// 메모리 기반 문서 호스트
#[derive(Debug, Default)]
pub struct MemoryDocumentHost {
    project: RwLock<Option<String>>,
    selected: RwLock<Option<Value>>,
    active: RwLock<Option<ActiveFile>>,
    opened: Mutex<Vec<OpenDocument>>,
}

impl MemoryDocumentHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, project: impl Into<String>) -> Self {
        *self.project.write() = Some(project.into());
        self
    }

    pub fn set_selected(&self, selected: Option<Value>) {
        *self.selected.write() = selected;
    }

    pub fn set_active_file(&self, file: Option<ActiveFile>) {
        *self.active.write() = file;
    }

    /// 열린 문서 목록
    pub fn opened(&self) -> Vec<OpenDocument> {
        self.opened.lock().clone()
    }
}

impl DocumentHost for MemoryDocumentHost {
    fn open(&self, document: OpenDocument) {
        self.opened.lock().push(document);
    }

    fn current_project(&self) -> Option<String> {
        self.project.read().clone()
    }

    fn current_selected(&self) -> Option<Value> {
        self.selected.read().clone()
    }

    fn current_file(&self) -> Option<ActiveFile> {
        self.active.read().clone()
    }
}

// ============================================================================
// ShellHost
// ============================================================================

/// 외부 열기 (브라우저, 파일 관리자 등)
///
/// 경로는 검증 없이 그대로 전달됩니다.
pub trait ShellHost: Send + Sync {
    fn open_external(&self, target: &str);
}

/// 로그만 남기는 셸
#[derive(Debug, Default)]
pub struct LoggingShell;

impl ShellHost for LoggingShell {
    fn open_external(&self, target: &str) {
        info!(target_path = target, "Open external requested");
    }
}

// ============================================================================
// FaultReporter
// ============================================================================

/// 플러그인 fault 보고
///
/// 한 플러그인의 처리되지 않은 에러가 호스트를 멈추지 않도록 플러그인 파일 경로로 귀속시킵니다.
pub trait FaultReporter: Send + Sync {
    fn report(&self, plugin_path: &str, error: &Error);
}

/// tracing으로 보고
#[derive(Debug, Default)]
pub struct TracingFaultReporter;

impl FaultReporter for TracingFaultReporter {
    fn report(&self, plugin_path: &str, error: &Error) {
        error!(plugin = plugin_path, error = %error, "Plugin fault");
    }
}

/// 보고된 fault를 모아두는 reporter (플러그인 에러 패널 등)
#[derive(Debug, Default)]
pub struct RecordingFaultReporter {
    faults: Mutex<Vec<(String, String)>>,
}

impl RecordingFaultReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// (플러그인 경로, 에러 메시지) 목록
    pub fn faults(&self) -> Vec<(String, String)> {
        self.faults.lock().clone()
    }
}

impl FaultReporter for RecordingFaultReporter {
    fn report(&self, plugin_path: &str, error: &Error) {
        error!(plugin = plugin_path, error = %error, "Plugin fault");
        self.faults
            .lock()
            .push((plugin_path.to_string(), error.to_string()));
    }
}

// ============================================================================
// HostServices
// ============================================================================

/// 브릿지에 주입되는 호스트 서비스 묶음
#[derive(Clone)]
pub struct HostServices {
    pub ui: Arc<dyn UiStateSink>,
    pub paths: Arc<dyn PathResolver>,
    pub documents: Arc<dyn DocumentHost>,
    pub shell: Arc<dyn ShellHost>,
    pub faults: Arc<dyn FaultReporter>,
    pub cache: Arc<dyn CacheBackend>,
}

impl HostServices {
    /// 기본 서비스로 생성
    ///
    /// 캐시는 호출 시점 프로젝트의 `<project root>/<cache file>`을 씁니다 ([`ProjectCaches`]).
    pub fn new(paths: Arc<dyn PathResolver>, cache_file: &str) -> Self {
        let cache = Arc::new(ProjectCaches::new(Arc::clone(&paths), cache_file));
        Self {
            ui: Arc::new(NullSink),
            paths,
            documents: Arc::new(MemoryDocumentHost::new()),
            shell: Arc::new(LoggingShell),
            faults: Arc::new(TracingFaultReporter),
            cache,
        }
    }

    /// 설정에서 생성
    ///
    /// 경로와 문서 호스트 모두 같은 프로젝트를 가리킵니다.
    pub fn from_config(config: &BridgeConfig, project: Option<&str>) -> Self {
        let mut paths = StaticPaths::from_config(config);
        let mut documents = MemoryDocumentHost::new();
        if let Some(project) = project {
            paths = paths.with_project(project);
            documents = documents.with_project(project);
        }
        Self::new(Arc::new(paths), config.cache_file()).with_documents(Arc::new(documents))
    }

    pub fn with_ui(mut self, ui: Arc<dyn UiStateSink>) -> Self {
        self.ui = ui;
        self
    }

    pub fn with_documents(mut self, documents: Arc<dyn DocumentHost>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_shell(mut self, shell: Arc<dyn ShellHost>) -> Self {
        self.shell = shell;
        self
    }

    pub fn with_faults(mut self, faults: Arc<dyn FaultReporter>) -> Self {
        self.faults = faults;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn CacheBackend>) -> Self {
        self.cache = cache;
        self
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("project_root", &self.paths.project_root())
            .field("store_root", &self.paths.store_root())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_paths_project_root() {
        let paths = StaticPaths::new("/projects", "/store");
        assert_eq!(paths.project_root(), PathBuf::from("/projects"));

        paths.set_project(Some("demo".into()));
        assert_eq!(paths.project_root(), PathBuf::from("/projects/demo"));
        assert_eq!(paths.store_root(), PathBuf::from("/store"));
    }

    #[test]
    fn test_recording_fault_reporter() {
        let reporter = RecordingFaultReporter::new();
        reporter.report("plugins/a.rs", &Error::Config("namespace".into()));

        let faults = reporter.faults();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].0, "plugins/a.rs");
        assert!(faults[0].1.contains("namespace"));
    }

    #[test]
    fn test_from_config_selects_project_everywhere() {
        let config = BridgeConfig::default()
            .with_base_path("/projects")
            .with_store_dir("/store");
        let host = HostServices::from_config(&config, Some("demo"));

        assert_eq!(host.paths.project_root(), PathBuf::from("/projects/demo"));
        assert_eq!(host.documents.current_project().as_deref(), Some("demo"));

        let host = HostServices::from_config(&config, None);
        assert_eq!(host.documents.current_project(), None);
    }

    #[test]
    fn test_memory_document_host() {
        let host = MemoryDocumentHost::new().with_project("demo");
        host.open(OpenDocument {
            content: "{}".into(),
            raw_content: "{}".into(),
            path: PathBuf::from("/projects/demo/a.json"),
            file_name: "a.json".into(),
        });

        assert_eq!(host.current_project().as_deref(), Some("demo"));
        assert_eq!(host.opened().len(), 1);
        assert!(host.current_file().is_none());
    }
}
