//! Cache API - 프로젝트 캐시 read-through 어댑터
//!
//! 캐시 miss는 흔한 일이므로 읽기 실패는 에러로 올리지 않습니다.

use super::Bridge;
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub struct CacheApi<'a> {
    bridge: &'a Bridge,
}

impl<'a> CacheApi<'a> {
    pub(crate) fn new(bridge: &'a Bridge) -> Self {
        Self { bridge }
    }

    /// 비동기 조회 (miss/에러 시 `{}`)
    pub async fn open(&self, path: &str) -> Value {
        match self.bridge.host().cache.get(path).await {
            Ok(data) => data,
            Err(e) if e.is_not_found() => {
                debug!(path, "Cache miss");
                Value::Object(Map::new())
            }
            Err(e) => {
                warn!(path, error = %e, "Cache lookup failed");
                Value::Object(Map::new())
            }
        }
    }

    /// 동기 조회
    ///
    /// 메모리 스냅샷을 먼저 보고, 없으면 스냅샷을 새로 읽습니다.
    /// `None`은 캐시되지 않았다는 뜻입니다.
    pub fn open_sync(&self, path: &str) -> Option<Value> {
        let cache = &self.bridge.host().cache;
        if let Some(value) = cache.cached_snapshot().and_then(|s| s.get(path).cloned()) {
            return Some(value);
        }

        match cache.load_snapshot() {
            Ok(snapshot) => snapshot.get(path).cloned(),
            Err(e) => {
                warn!(path, error = %e, "Cache snapshot refresh failed");
                None
            }
        }
    }

    /// 엔트리 교체 (실패는 플러그인 fault로 보고)
    pub fn write(&self, path: &str, value: Value) {
        if let Err(e) = self.bridge.host().cache.save(path, value) {
            self.bridge.report(&e);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::bridge::test_support::Fixture;
    use serde_json::json;

    #[tokio::test]
    async fn test_open_miss_is_empty_object() {
        let fx = Fixture::new();
        let bridge = fx.runtime.create_bridge(false, "plugins/a");

        assert_eq!(bridge.cache().open("entities/zombie.json").await, json!({}));
        assert_eq!(bridge.cache().open_sync("entities/zombie.json"), None);
    }

    #[tokio::test]
    async fn test_write_then_read_both_ways() {
        let fx = Fixture::new();
        let bridge = fx.runtime.create_bridge(false, "plugins/a");

        bridge.cache().write("a.json", json!({ "keys": ["x"] }));
        bridge.cache().write("a.json", json!({ "keys": ["y"] }));

        assert_eq!(bridge.cache().open("a.json").await, json!({ "keys": ["y"] }));
        assert_eq!(bridge.cache().open_sync("a.json"), Some(json!({ "keys": ["y"] })));
        assert!(fx.project_root().join(".cache.json").is_file());
    }

    #[test]
    fn test_open_sync_refreshes_from_disk() {
        let fx = Fixture::new();
        std::fs::write(
            fx.project_root().join(".cache.json"),
            r#"{ "b.json": { "n": 1 } }"#,
        )
        .unwrap();
        let bridge = fx.runtime.create_bridge(false, "plugins/a");

        assert_eq!(bridge.cache().open_sync("b.json"), Some(json!({ "n": 1 })));
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_swallowed_on_read_and_reported_on_write() {
        let fx = Fixture::new();
        std::fs::write(fx.project_root().join(".cache.json"), "not json").unwrap();
        let bridge = fx.runtime.create_bridge(false, "plugins/broken");

        assert_eq!(bridge.cache().open("x").await, json!({}));
        assert_eq!(bridge.cache().open_sync("x"), None);

        bridge.cache().write("x", json!(1));
        assert_eq!(fx.faults.faults()[0].0, "plugins/broken");
    }

    #[tokio::test]
    async fn test_cache_follows_current_project() {
        let fx = Fixture::new();
        let bridge = fx.runtime.create_bridge(false, "plugins/a");
        bridge.cache().write("a.json", json!("demo"));

        fx.paths.set_project(Some("other".into()));
        assert_eq!(bridge.cache().open("a.json").await, json!({}));
        bridge.cache().write("a.json", json!("other"));

        let other = fx.dir.path().join("projects/other/.cache.json");
        assert!(other.is_file());
        assert_eq!(bridge.cache().open_sync("a.json"), Some(json!("other")));

        fx.paths.set_project(Some("demo".into()));
        assert_eq!(bridge.cache().open_sync("a.json"), Some(json!("demo")));
        assert!(fx.faults.faults().is_empty());
    }
}
