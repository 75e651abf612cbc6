//! bridge-core: Plugin Capability Bridge
//!
//! Layer2 - 플러그인 런타임과 플러그인별 capability facade
//!
//! # 주요 모듈
//!
//! - `plugin`: 플러그인 레지스트리, UI 기여 레지스트리, 이벤트 트리거, 런타임
//! - `bridge`: 플러그인 하나에 넘겨지는 `Bridge`와 하위 API (store, cache, fs, UI, language, utils)
//! - `host`: 호스트 애플리케이션 협력자 trait (UI 상태 저장소, 경로, 문서, 셸, fault)
//! - `cache`: 프로젝트 캐시 백엔드
//! - `path`: 플러그인 상대 경로 검증
//!
//! # 사용 예시
//!
//! ```ignore
//! use bridge_core::{Events, PluginRuntime};
//!
//! let runtime = PluginRuntime::from_config(BridgeConfig::load()?, Some("my-project"));
//! let bridge = runtime.create_bridge(true, "plugins/highlight");
//!
//! bridge.register_plugin(json!({ "name": "Highlight" }))?;
//! bridge.on("bridge:beforeSave", |file| file);
//!
//! // fan-out: 모든 리스너 결과를 등록 순서대로
//! let results = bridge.trigger("bridge:change", json!({})).resolve().await;
//!
//! // waterfall: 앞 리스너 결과가 다음 리스너 입력
//! let content = bridge.overwrite_trigger("bridge:beforeSave", json!("...")).resolve().await;
//! ```

pub mod bridge;
pub mod cache;
pub mod host;
pub mod path;
pub mod plugin;

// Re-exports: Bridge
pub use bridge::{
    Bridge, BuildableFileApi, CacheApi, FileStats, FooterApi, FsApi, HighlighterApi, LanguageApi,
    MenuApi, OpenRequest, SidebarApi, StoreApi, UtilsApi, WindowApi,
};

// Re-exports: Cache
pub use cache::{CacheBackend, CacheSnapshot, ProjectCache, ProjectCaches};

// Re-exports: Host
pub use host::{
    ActiveFile, DocumentHost, FaultReporter, HostServices, LoggingShell, MemoryDocumentHost,
    NullSink, OpenDocument, PathResolver, RecordingFaultReporter, RecordingSink, ShellHost,
    StaticPaths, TracingFaultReporter, UiCommand, UiStateSink,
};

// Re-exports: Plugin
pub use plugin::{
    Contribution, ContributionKind, ContributionRegistry, Deferred, EventListener, EventTriggers,
    Events, LanguageEntry, LanguageRegistry, PluginId, PluginInfo, PluginModule, PluginRecord,
    PluginRegistry, PluginRuntime, PluginState, RegistryChange, SidebarView, UiRegistries,
};

// Layer1 re-exports
pub use bridge_foundation::{BridgeConfig, Error, JsonStore, Result};

/// Layer2 버전
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
