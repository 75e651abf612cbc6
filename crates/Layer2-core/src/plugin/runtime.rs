//! Plugin Runtime - 세션 단위 공유 상태와 플러그인 로드/언로드
//!
//! 모든 브릿지는 같은 [`RuntimeState`]를 공유합니다. 전역 상태 대신 런타임 하나를
//! 만들어 넘기므로, 테스트마다 독립된 세션을 만들 수 있습니다.

use super::contribution::{Contribution, SidebarView, UiRegistries};
use super::events::EventTriggers;
use super::language::LanguageRegistry;
use super::registry::{PluginId, PluginRecord, PluginRegistry, PluginState};
use crate::bridge::Bridge;
use crate::host::{HostServices, UiCommand};
use async_trait::async_trait;
use bridge_foundation::{BridgeConfig, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info};

// ============================================================================
// PluginModule
// ============================================================================

/// 로드 가능한 플러그인
///
/// 로드 시 정확히 하나의 [`Bridge`]를 받습니다. 보통 `init`에서 `register_plugin`,
/// 리스너, UI 기여를 등록하며, 세션 중 언제든 다시 호출할 수 있습니다.
#[async_trait]
pub trait PluginModule: Send + Sync {
    /// 로그용 이름
    fn name(&self) -> &str;

    /// 초기화
    async fn init(&self, bridge: &Bridge) -> Result<()>;
}

// ============================================================================
// RuntimeState
// ============================================================================

/// 세션 공유 상태
pub struct RuntimeState {
    pub(crate) plugins: PluginRegistry,
    pub(crate) ui: UiRegistries,
    pub(crate) events: EventTriggers,
    pub(crate) languages: LanguageRegistry,
    pub(crate) host: HostServices,
    pub(crate) config: BridgeConfig,
}

impl RuntimeState {
    fn commit(&self, command: UiCommand) {
        debug!(command = command.name(), "Commit UI command");
        self.host.ui.commit(command);
    }
}

// ============================================================================
// PluginRuntime
// ============================================================================

/// 플러그인 런타임 (cheap clone)
#[derive(Clone)]
pub struct PluginRuntime {
    state: Arc<RuntimeState>,
}

impl PluginRuntime {
    pub fn new(host: HostServices, config: BridgeConfig) -> Self {
        Self {
            state: Arc::new(RuntimeState {
                plugins: PluginRegistry::new(),
                ui: UiRegistries::new(),
                events: EventTriggers::new(),
                languages: LanguageRegistry::new(),
                host,
                config,
            }),
        }
    }

    /// 설정으로 기본 호스트 서비스 구성
    pub fn from_config(config: BridgeConfig, project: Option<&str>) -> Self {
        let host = HostServices::from_config(&config, project);
        Self::new(host, config)
    }

    /// 브릿지 생성
    ///
    /// 식별자를 발급하고 `module`/`unknown` 상태의 초기 레코드를 등록합니다.
    pub fn create_bridge(&self, is_module: bool, file_path: &str) -> Bridge {
        let id = self.state.plugins.allocate();
        self.state.plugins.set_record(PluginRecord {
            id,
            file_path: file_path.to_string(),
            state: PluginState::initial(is_module),
            loaded_at: Utc::now(),
        });
        Bridge::new(id, file_path, Arc::clone(&self.state))
    }

    /// 플러그인 로드
    ///
    /// `init`이 실패하면 fault를 보고하고, 그때까지 등록된 기여를 정리한 뒤 에러를 반환합니다.
    pub async fn load(
        &self,
        module: Arc<dyn PluginModule>,
        is_module: bool,
        file_path: &str,
    ) -> Result<PluginId> {
        info!("Loading plugin: {} ({})", module.name(), file_path);
        let bridge = self.create_bridge(is_module, file_path);

        if let Err(e) = module.init(&bridge).await {
            error!("Plugin {} failed to load: {}", module.name(), e);
            self.state.host.faults.report(file_path, &e);
            self.unload(bridge.id());
            return Err(e);
        }

        info!("Plugin {} loaded as {}", module.name(), bridge.id());
        Ok(bridge.id())
    }

    /// 호스트 측 정리
    ///
    /// 플러그인이 소유한 모든 기여와 언어를 제거하고 레코드를 해제합니다.
    /// 리스너는 세션 동안 유지됩니다.
    pub fn unload(&self, id: PluginId) -> bool {
        let state = &self.state;
        let ui = &state.ui;

        if !ui.menus.remove_owned_by(id).is_empty() {
            state.commit(UiCommand::RemoveAppMenu { plugin: id });
        }

        for sidebar in ui.sidebars.remove_owned_by(id) {
            if ui.sidebar_view() == SidebarView::Plugin(sidebar.id.clone()) {
                ui.set_sidebar_view(SidebarView::Closed);
                state.commit(UiCommand::SetSidebarMenu(0));
            }
            state.commit(UiCommand::RemovePluginSidebar(sidebar.id));
        }

        for footer in ui.footers.remove_owned_by(id) {
            state.commit(UiCommand::RemovePluginFooter(footer.id));
        }

        for window in ui.windows.remove_owned_by(id) {
            ui.set_window_visible(&window.id, false);
            state.commit(UiCommand::RemovePluginWindow(window.id));
        }

        let files = ui.buildable_files.remove_owned_by(id);
        let languages = state.languages.remove_owned_by(id);

        match state.plugins.release(id) {
            Some(record) => {
                info!(
                    plugin_id = %id,
                    file = %record.file_path,
                    buildable_files = files.len(),
                    languages = languages.len(),
                    "Plugin unloaded"
                );
                true
            }
            None => false,
        }
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.state.plugins
    }

    pub fn ui(&self) -> &UiRegistries {
        &self.state.ui
    }

    pub fn events(&self) -> &EventTriggers {
        &self.state.events
    }

    pub fn languages(&self) -> &LanguageRegistry {
        &self.state.languages
    }

    pub fn host(&self) -> &HostServices {
        &self.state.host
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.state.config
    }

    /// 플러그인이 소유한 모든 UI 기여 (호스트 목록 화면용)
    pub fn contributions_of(&self, id: PluginId) -> Vec<Contribution> {
        let ui = &self.state.ui;
        [
            &ui.menus,
            &ui.sidebars,
            &ui.footers,
            &ui.windows,
            &ui.buildable_files,
        ]
        .into_iter()
        .flat_map(|registry| registry.list_owned_by(id))
        .collect()
    }
}

impl std::fmt::Debug for PluginRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRuntime")
            .field("plugins", &self.state.plugins.len())
            .field("host", &self.state.host)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{RecordingFaultReporter, RecordingSink, StaticPaths};
    use crate::plugin::Events;
    use bridge_foundation::Error;
    use serde_json::json;
    use tempfile::TempDir;

    fn runtime(dir: &TempDir) -> (PluginRuntime, Arc<RecordingSink>, Arc<RecordingFaultReporter>) {
        let sink = Arc::new(RecordingSink::new());
        let faults = Arc::new(RecordingFaultReporter::new());
        let paths = StaticPaths::new(dir.path().join("projects"), dir.path().join("store"));
        let host = HostServices::new(Arc::new(paths), ".cache.json")
            .with_ui(sink.clone())
            .with_faults(faults.clone());
        (PluginRuntime::new(host, BridgeConfig::default()), sink, faults)
    }

    struct Failing;

    #[async_trait]
    impl PluginModule for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn init(&self, bridge: &Bridge) -> Result<()> {
            bridge.footer().register(json!({ "id": "half-done" }))?;
            bridge.window().register(json!({ "title": "no id" }))?;
            Ok(())
        }
    }

    #[test]
    fn test_create_bridge_records_initial_state() {
        let dir = TempDir::new().unwrap();
        let (runtime, _, _) = runtime(&dir);

        let module = runtime.create_bridge(true, "plugins/a");
        let script = runtime.create_bridge(false, "plugins/b");

        assert_ne!(module.id(), script.id());
        let all = runtime.plugins().get_all();
        assert_eq!(all[0].state, PluginState::Module);
        assert_eq!(all[1].state, PluginState::Unknown);
    }

    #[tokio::test]
    async fn test_failed_init_is_reported_and_cleaned_up() {
        let dir = TempDir::new().unwrap();
        let (runtime, _, faults) = runtime(&dir);

        let err = runtime
            .load(Arc::new(Failing), false, "plugins/failing")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(runtime.ui().footers.is_empty());
        assert!(runtime.plugins().is_empty());
        assert_eq!(faults.faults()[0].0, "plugins/failing");
    }

    #[test]
    fn test_unload_removes_owned_contributions_only() {
        let dir = TempDir::new().unwrap();
        let (runtime, sink, _) = runtime(&dir);
        let a = runtime.create_bridge(false, "plugins/a");
        let b = runtime.create_bridge(false, "plugins/b");

        a.menu().register(json!({ "id": "m", "label": "A" })).unwrap();
        a.window().register(json!({ "id": "w" })).unwrap();
        a.window().open("w");
        b.footer().register(json!({ "id": "f" })).unwrap();
        a.on("E", |v| v);
        sink.take();

        assert!(runtime.unload(a.id()));
        assert!(!runtime.unload(a.id()));

        assert!(runtime.ui().menus.is_empty());
        assert!(!runtime.ui().is_window_visible("w"));
        assert_eq!(runtime.ui().footers.len(), 1);
        assert_eq!(runtime.events().listener_count("E"), 1);
        assert!(sink
            .commands()
            .contains(&UiCommand::RemoveAppMenu { plugin: a.id() }));
        assert!(sink
            .commands()
            .contains(&UiCommand::RemovePluginWindow("w".into())));
        assert_eq!(runtime.contributions_of(b.id()).len(), 1);
    }
}
