//! # Plugin System
//!
//! 플러그인 런타임과 그 아래의 공유 레지스트리
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      PluginRuntime                          │
//! │  ┌────────────────┬────────────────┬─────────────────────┐ │
//! │  │ PluginRegistry │  UiRegistries  │   EventTriggers     │ │
//! │  │ (id, record)   │ menu/sidebar/  │ trigger (fan-out)   │ │
//! │  │                │ footer/window/ │ overwrite_trigger   │ │
//! │  │                │ buildable file │ (waterfall)         │ │
//! │  └────────────────┴────────────────┴─────────────────────┘ │
//! │                          │                                  │
//! │            create_bridge(is_module, file_path)              │
//! │                          ▼                                  │
//! │     Bridge (plugin id + file path에 묶인 capability 묶음)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 예시
//!
//! ```ignore
//! struct MyPlugin;
//!
//! #[async_trait]
//! impl PluginModule for MyPlugin {
//!     fn name(&self) -> &str { "my-plugin" }
//!
//!     async fn init(&self, bridge: &Bridge) -> Result<()> {
//!         bridge.register_plugin(json!({ "name": "My Plugin" }))?;
//!         bridge.footer().register(json!({ "id": "status", "text": "ready" }))?;
//!         bridge.on("bridge:saveFile", |file| file);
//!         Ok(())
//!     }
//! }
//!
//! let runtime = PluginRuntime::from_config(BridgeConfig::load()?, Some("my-project"));
//! runtime.load(Arc::new(MyPlugin), true, "plugins/my-plugin").await?;
//! ```

mod contribution;
mod events;
mod language;
mod registry;
mod runtime;

pub use contribution::{
    Contribution, ContributionKind, ContributionRegistry, RegistryChange, SidebarView,
    UiRegistries,
};
pub use events::{Deferred, EventListener, EventTriggers, Events};
pub use language::{LanguageEntry, LanguageRegistry};
pub use registry::{PluginId, PluginInfo, PluginRecord, PluginRegistry, PluginState};
pub use runtime::{PluginModule, PluginRuntime, RuntimeState};
