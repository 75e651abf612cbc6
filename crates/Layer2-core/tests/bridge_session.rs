//! 브릿지 세션 통합 테스트 - 플러그인 로드부터 트리거까지
//!
//! `cargo test -p bridge-core --test bridge_session`

use async_trait::async_trait;
use bridge_core::{
    Bridge, BridgeConfig, Error, Events, HostServices, PluginModule, PluginRuntime, PluginState,
    RecordingFaultReporter, RecordingSink, Result, StaticPaths, UiCommand,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct Session {
    _dir: TempDir,
    runtime: PluginRuntime,
    sink: Arc<RecordingSink>,
    faults: Arc<RecordingFaultReporter>,
}

fn session() -> Session {
    let dir = TempDir::new().expect("tempdir");
    let config = BridgeConfig::default()
        .with_base_path(dir.path().join("projects"))
        .with_store_dir(dir.path().join("store"));
    std::fs::create_dir_all(config.base_path().join("demo")).expect("project dir");

    let sink = Arc::new(RecordingSink::new());
    let faults = Arc::new(RecordingFaultReporter::new());
    let paths = StaticPaths::from_config(&config).with_project("demo");
    let host = HostServices::new(Arc::new(paths), config.cache_file())
        .with_ui(sink.clone())
        .with_faults(faults.clone());

    Session {
        _dir: dir,
        runtime: PluginRuntime::new(host, config),
        sink,
        faults,
    }
}

/// 테스트용 플러그인: init 동작을 클로저로 주입
struct Scripted<F>(&'static str, F);

#[async_trait]
impl<F> PluginModule for Scripted<F>
where
    F: Fn(&Bridge) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        self.0
    }

    async fn init(&self, bridge: &Bridge) -> Result<()> {
        (self.1)(bridge)
    }
}

fn scripted<F>(name: &'static str, init: F) -> Arc<dyn PluginModule>
where
    F: Fn(&Bridge) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(Scripted(name, init))
}

#[tokio::test]
async fn test_identities_are_distinct() {
    let s = session();
    let mut ids = HashSet::new();
    for i in 0..20 {
        let id = s
            .runtime
            .load(scripted("noop", |_| Ok(())), i % 2 == 0, &format!("plugins/{}", i))
            .await
            .expect("load");
        assert!(ids.insert(id), "identity {} issued twice", id);
    }

    let first = *ids.iter().min().expect("ids");
    assert!(s.runtime.unload(first));
    let next = s.runtime.create_bridge(false, "plugins/late").id();
    assert!(!ids.contains(&next));
}

#[tokio::test]
async fn test_store_round_trip_and_exists() {
    let s = session();
    let bridge = s.runtime.create_bridge(true, "plugins/store");
    let store = bridge.store();
    store.setup("store-plugin").expect("setup");

    let docs = [
        json!(null),
        json!(42),
        json!("text"),
        json!([1, [2, [3]], { "k": false }]),
        json!({ "a": { "b": { "c": [1.5, -2, "x"] } } }),
    ];
    for (i, doc) in docs.iter().enumerate() {
        let name = format!("doc-{}.json", i);
        assert!(!store.exists(&name).expect("exists"));
        assert!(store.load::<Value>(&name).expect_err("missing").is_not_found());

        store.save(&name, doc).expect("save");
        assert!(store.exists(&name).expect("exists"));
        assert_eq!(&store.load::<Value>(&name).expect("load"), doc);
    }
}

#[tokio::test]
async fn test_fan_out_keeps_registration_order() {
    let s = session();
    s.runtime
        .load(
            scripted("listeners", |bridge| {
                bridge.on_async("E", |x| async move {
                    tokio::time::sleep(Duration::from_millis(40)).await;
                    json!(["L1", x])
                });
                bridge.on_async("E", |x| async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    json!(["L2", x])
                });
                bridge.on("E", |x| json!(["L3", x]));
                Ok(())
            }),
            true,
            "plugins/listeners",
        )
        .await
        .expect("load");

    let host = s.runtime.create_bridge(false, "host");
    let results = host.trigger("E", json!(1)).resolve().await;
    assert_eq!(
        results,
        vec![json!(["L1", 1]), json!(["L2", 1]), json!(["L3", 1])]
    );
}

#[tokio::test]
async fn test_overwrite_chain_across_plugins() {
    let s = session();
    let add = scripted("add", |bridge| {
        bridge.on("F", |v| json!(v.as_i64().unwrap_or_default() + 1));
        Ok(())
    });
    let double = scripted("double", |bridge| {
        bridge.on_async("F", |v| async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            json!(v.as_i64().unwrap_or_default() * 2)
        });
        Ok(())
    });
    s.runtime.load(add, true, "plugins/add").await.expect("load");
    s.runtime.load(double, true, "plugins/double").await.expect("load");

    let events = s.runtime.events();
    assert_eq!(events.overwrite_trigger("F", json!(5)).resolve().await, json!(12));
    assert_eq!(events.overwrite_trigger("G", json!(7)).resolve().await, json!(7));
}

#[tokio::test]
async fn test_ui_registry_remove_twice_and_window_without_id() {
    let s = session();
    let bridge = s.runtime.create_bridge(false, "plugins/ui");

    bridge.sidebar().register(json!({ "id": "a", "title": "A" })).expect("register");
    assert!(bridge.sidebar().remove("a").expect("remove"));
    assert!(!bridge.sidebar().remove("a").expect("second remove is a no-op"));
    assert!(s.runtime.ui().sidebars.is_empty());

    let err = bridge
        .window()
        .register(json!({ "title": "anonymous" }))
        .expect_err("window without id");
    assert!(matches!(err, Error::Config(_)));
    assert!(s.runtime.ui().windows.is_empty());
}

#[tokio::test]
async fn test_menus_are_always_untrusted() {
    let s = session();
    s.runtime
        .load(
            scripted("menus", |bridge| {
                bridge.menu().register(json!([
                    { "id": "one", "trusted": true },
                    { "id": "two", "trusted": "yes" },
                ]))?;
                bridge.menu().update(json!({ "id": "one", "trusted": true, "label": "One" }))?;
                Ok(())
            }),
            true,
            "plugins/menus",
        )
        .await
        .expect("load");

    for menu in s.runtime.ui().menus.list() {
        assert_eq!(menu.payload["trusted"], json!(false), "{}", menu.id);
    }
    let last_snapshot = s
        .sink
        .commands()
        .into_iter()
        .rev()
        .find_map(|command| match command {
            UiCommand::AddToAppMenu { menus, .. } => Some(menus),
            _ => None,
        })
        .expect("menu snapshot");
    assert!(last_snapshot.iter().all(|m| m["trusted"] == json!(false)));
}

#[tokio::test]
async fn test_register_plugin_and_failed_load() {
    let s = session();
    let ok = scripted("ok", |bridge| {
        bridge.register_plugin(json!({ "id": "plugins/someone-else", "name": "Ok" }))
    });
    let id = s.runtime.load(ok, false, "plugins/ok").await.expect("load");
    match s.runtime.plugins().get(id).expect("record").state {
        PluginState::Registered(info) => assert_eq!(info.id, "plugins/ok"),
        other => panic!("unexpected state {:?}", other),
    }

    let broken = scripted("broken", |bridge| {
        bridge.footer().register(json!({ "id": "will-be-removed" }))?;
        bridge.store().save("x", &json!(1))
    });
    let err = s
        .runtime
        .load(broken, false, "plugins/broken")
        .await
        .expect_err("store without namespace");
    assert!(matches!(err, Error::Config(_)));
    assert!(s.runtime.ui().footers.is_empty());
    assert_eq!(s.runtime.plugins().len(), 1);
    assert_eq!(s.faults.faults()[0].0, "plugins/broken");
}
