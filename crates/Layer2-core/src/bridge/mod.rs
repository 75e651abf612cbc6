//! # Bridge
//!
//! 플러그인 하나에 넘겨지는 capability facade
//!
//! 브릿지는 plugin id와 플러그인 파일 경로에 묶여 있으며, 하위 API는 모두
//! `&Bridge`를 빌리는 가벼운 view입니다.
//!
//! | 접근자              | 역할                                   |
//! |---------------------|----------------------------------------|
//! | `store()`           | 네임스페이스 단위 JSON 문서 저장소      |
//! | `cache()`           | 프로젝트 캐시 (miss는 빈 값)            |
//! | `fs()`              | 프로젝트 루트 아래 파일 접근            |
//! | `menu()` 등         | UI 기여 레지스트리                      |
//! | `language()`        | 구문 정의 / 키워드                      |
//! | `utils()`           | 현재 프로젝트/파일 조회                 |
//!
//! 이벤트는 [`Events`] 구현으로 제공됩니다.

mod cache;
mod fs;
mod language;
mod store;
mod ui;
mod utils;

pub use cache::CacheApi;
pub use fs::{FileStats, FsApi};
pub use language::{HighlighterApi, LanguageApi};
pub use store::StoreApi;
pub use ui::{BuildableFileApi, FooterApi, MenuApi, SidebarApi, WindowApi};
pub use utils::UtilsApi;

use crate::host::{HostServices, OpenDocument, UiCommand};
use crate::path::scoped_join;
use crate::plugin::{
    Deferred, EventListener, Events, PluginId, PluginInfo, PluginState, RuntimeState,
};
use bridge_foundation::{Error, Result};
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// `Bridge::open` 요청
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRequest {
    pub content: String,
    #[serde(alias = "file_name")]
    pub file_name: String,
    /// 프로젝트 루트 기준 상대 경로
    pub path: String,
}

/// 플러그인별 capability 브릿지
#[derive(Clone)]
pub struct Bridge {
    id: PluginId,
    file_path: Arc<str>,
    state: Arc<RuntimeState>,

    /// `store().setup`으로 정해지는 네임스페이스
    namespace: Arc<RwLock<Option<String>>>,
}

impl Bridge {
    pub(crate) fn new(id: PluginId, file_path: &str, state: Arc<RuntimeState>) -> Self {
        Self {
            id,
            file_path: Arc::from(file_path),
            state,
            namespace: Arc::new(RwLock::new(None)),
        }
    }

    pub fn id(&self) -> PluginId {
        self.id
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// 플러그인 메타데이터 등록
    ///
    /// `id` 필드는 항상 브릿지 파일 경로로 덮어씁니다.
    pub fn register_plugin(&self, info: Value) -> Result<()> {
        let Value::Object(mut map) = info else {
            return Err(Error::Config("Plugin info must be an object".to_string()));
        };
        map.insert("id".to_string(), Value::String(self.file_path.to_string()));

        let info: PluginInfo = serde_json::from_value(Value::Object(map))
            .map_err(|e| Error::Config(format!("Invalid plugin info: {}", e)))?;

        if self.state.plugins.set_state(self.id, PluginState::Registered(info)) {
            Ok(())
        } else {
            Err(Error::NotFound(format!("plugin record {}", self.id)))
        }
    }

    /// 호스트 문서 시스템에 버퍼 열기 (현재 프로젝트 루트 기준)
    pub fn open(&self, request: OpenRequest) -> Result<()> {
        let path = scoped_join(&self.host().paths.project_root(), &request.path)?;
        debug!(plugin_id = %self.id, path = %path.display(), "Open document");
        self.host().documents.open(OpenDocument {
            raw_content: request.content.clone(),
            content: request.content,
            path,
            file_name: request.file_name,
        });
        Ok(())
    }

    /// 호스트 셸로 그대로 전달
    pub fn open_external(&self, target: &str) {
        self.host().shell.open_external(target);
    }

    pub fn store(&self) -> StoreApi<'_> {
        StoreApi::new(self)
    }

    pub fn cache(&self) -> CacheApi<'_> {
        CacheApi::new(self)
    }

    pub fn fs(&self) -> FsApi<'_> {
        FsApi::new(self)
    }

    pub fn menu(&self) -> MenuApi<'_> {
        MenuApi::new(self)
    }

    pub fn sidebar(&self) -> SidebarApi<'_> {
        SidebarApi::new(self)
    }

    pub fn footer(&self) -> FooterApi<'_> {
        FooterApi::new(self)
    }

    pub fn window(&self) -> WindowApi<'_> {
        WindowApi::new(self)
    }

    pub fn buildable_file(&self) -> BuildableFileApi<'_> {
        BuildableFileApi::new(self)
    }

    pub fn language(&self) -> LanguageApi<'_> {
        LanguageApi::new(self)
    }

    /// Deprecated
    pub fn highlighter(&self) -> HighlighterApi {
        HighlighterApi
    }

    pub fn utils(&self) -> UtilsApi<'_> {
        UtilsApi::new(self)
    }

    // ------------------------------------------------------------------------
    // 하위 API 공용
    // ------------------------------------------------------------------------

    pub(crate) fn state(&self) -> &RuntimeState {
        &self.state
    }

    pub(crate) fn host(&self) -> &HostServices {
        &self.state.host
    }

    pub(crate) fn commit(&self, command: UiCommand) {
        debug!(plugin_id = %self.id, command = command.name(), "Commit UI command");
        self.state.host.ui.commit(command);
    }

    /// 이 플러그인으로 귀속되는 fault 보고
    pub(crate) fn report(&self, error: &Error) {
        self.state.host.faults.report(&self.file_path, error);
    }
}

impl Events for Bridge {
    fn add_listener(&self, name: &str, listener: EventListener) {
        debug!(plugin_id = %self.id, event = name, "Plugin registered listener");
        self.state.events.add_listener(name, listener);
    }

    fn trigger(&self, name: &str, arg: Value) -> Deferred<Vec<Value>> {
        self.state.events.trigger(name, arg)
    }

    fn overwrite_trigger(&self, name: &str, arg: Value) -> Deferred<Value> {
        self.state.events.overwrite_trigger(name, arg)
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("id", &self.id)
            .field("file_path", &self.file_path)
            .field("namespace", &*self.namespace.read())
            .finish()
    }
}

/// 단일 객체 또는 배열을 항목 목록으로
pub(crate) fn one_or_many(input: Value) -> Vec<Value> {
    match input {
        Value::Array(items) => items,
        item => vec![item],
    }
}
