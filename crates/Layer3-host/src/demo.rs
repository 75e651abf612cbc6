//! Demo session - 샘플 플러그인 두 개로 레지스트리와 트리거 동작 확인
//!
//! 임시 디렉토리에 프로젝트/스토어를 만들고 끝나면 지웁니다.

use async_trait::async_trait;
use bridge_core::{
    Bridge, BridgeConfig, Events, HostServices, MemoryDocumentHost, PluginModule, PluginRuntime,
    RecordingSink, Result, StaticPaths,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// 엔티티 파일 도우미 (동기 리스너, 메뉴/사이드바/푸터)
struct EntityHelper;

#[async_trait]
impl PluginModule for EntityHelper {
    fn name(&self) -> &str {
        "entity-helper"
    }

    async fn init(&self, bridge: &Bridge) -> Result<()> {
        bridge.register_plugin(json!({
            "name": "Entity Helper",
            "author": "demo",
            "version": "1.0.0",
        }))?;

        bridge.store().setup("entity-helper")?;
        if !bridge.store().exists("settings")? {
            bridge.store().save("settings", &json!({ "indent": 2 }))?;
        }

        bridge.menu().register(json!({
            "id": "entity-helper.menu",
            "label": "Entities",
            "trusted": true,
        }))?;
        bridge.sidebar().register(json!({ "id": "entities", "title": "Entity Browser" }))?;
        bridge.footer().register(json!({ "id": "entity-count", "text": "0 entities" }))?;
        bridge.language().register("molang", json!({ "keywords": ["query", "math"] }));
        bridge
            .buildable_file()
            .register(json!({ "display_name": "Entity", "path": "entities/" }))?;

        bridge.on("bridge:fileOpened", |file| json!({ "helper": file["name"] }));
        bridge.on("bridge:beforeSave", |content| {
            json!(format!("{}\n", content.as_str().unwrap_or_default()))
        });
        Ok(())
    }
}

/// 저장 전 포맷터 (비동기 리스너, 윈도우)
struct FormatOnSave;

#[async_trait]
impl PluginModule for FormatOnSave {
    fn name(&self) -> &str {
        "format-on-save"
    }

    async fn init(&self, bridge: &Bridge) -> Result<()> {
        bridge.register_plugin(json!({ "name": "Format on Save" }))?;

        bridge.window().register(json!({ "id": "format-log", "title": "Format Log" }))?;
        bridge.window().open("format-log");

        bridge.on_async("bridge:fileOpened", |file| async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            json!({ "formatter": file["name"] })
        });
        bridge.on_async("bridge:beforeSave", |content| async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            json!(content.as_str().unwrap_or_default().trim_start())
        });
        Ok(())
    }
}

pub async fn run() -> anyhow::Result<()> {
    let root = std::env::temp_dir().join(format!("plugin-bridge-demo-{}", std::process::id()));
    let result = run_in(&root).await;
    if let Err(e) = std::fs::remove_dir_all(&root) {
        warn!(dir = %root.display(), error = %e, "Failed to clean up demo directory");
    }
    result
}

async fn run_in(root: &Path) -> anyhow::Result<()> {
    let config = BridgeConfig::default()
        .with_base_path(root.join("projects"))
        .with_store_dir(root.join("store"));
    std::fs::create_dir_all(config.base_path().join("demo"))?;

    let sink = Arc::new(RecordingSink::new());
    let paths = StaticPaths::from_config(&config).with_project("demo");
    let host = HostServices::new(Arc::new(paths), config.cache_file())
        .with_ui(sink.clone())
        .with_documents(Arc::new(MemoryDocumentHost::new().with_project("demo")));
    let runtime = PluginRuntime::new(host, config);

    runtime
        .load(Arc::new(EntityHelper), true, "plugins/entity-helper")
        .await?;
    runtime
        .load(Arc::new(FormatOnSave), false, "plugins/format-on-save")
        .await?;

    println!("\n🔌 Plugins\n");
    println!("{:<10} {:<28} {:<20}", "ID", "FILE", "NAME");
    println!("{}", "-".repeat(60));
    for record in runtime.plugins().get_all() {
        println!(
            "{:<10} {:<28} {:<20}",
            record.id.to_string(),
            record.file_path,
            record.display_name()
        );
    }

    println!("\n🧩 Contributions\n");
    for record in runtime.plugins().get_all() {
        for contribution in runtime.contributions_of(record.id) {
            println!("  {:<14} {}", record.id.to_string(), contribution.payload);
        }
    }
    println!("  visible windows: {:?}", runtime.ui().visible_windows());
    println!("  languages: {:?}", runtime.languages().names());

    println!("\n📨 UI commands\n");
    for command in sink.commands() {
        println!("  {}", serde_json::to_string(&command)?);
    }

    let events = runtime.events();
    let opened: Vec<Value> = events
        .trigger("bridge:fileOpened", json!({ "name": "zombie.json" }))
        .resolve()
        .await;
    let saved = events
        .overwrite_trigger("bridge:beforeSave", json!("   { \"format_version\": \"1.16.0\" }"))
        .resolve()
        .await;

    println!("\n⚡ Triggers\n");
    println!("  trigger(bridge:fileOpened)          = {}", Value::Array(opened));
    println!("  overwrite_trigger(bridge:beforeSave) = {}", saved);
    println!();
    Ok(())
}
