//! Store API - `<store root>/<namespace>/<name>` JSON 문서

use super::Bridge;
use crate::path::{scoped_join, validate_segment};
use bridge_foundation::{Error, JsonStore, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

const NAMESPACE_UNSET: &str =
    "You need to define a namespace using store().setup(namespace)";

/// 네임스페이스 저장소
pub struct StoreApi<'a> {
    bridge: &'a Bridge,
}

impl<'a> StoreApi<'a> {
    pub(crate) fn new(bridge: &'a Bridge) -> Self {
        Self { bridge }
    }

    /// 네임스페이스 지정 및 디렉토리 생성
    ///
    /// 같은 값으로 다시 호출해도 되고, 다른 값이면 이후 호출이 새 네임스페이스를 가리킵니다.
    pub fn setup(&self, namespace: &str) -> Result<()> {
        validate_segment(namespace)?;
        let namespace = namespace.trim().trim_matches(['/', '\\']).to_string();

        let dir = scoped_join(&self.bridge.host().paths.store_root(), &namespace)?;
        std::fs::create_dir_all(&dir)?;

        debug!(plugin_id = %self.bridge.id(), namespace = %namespace, "Store namespace set");
        *self.bridge.namespace.write() = Some(namespace);
        Ok(())
    }

    pub fn namespace(&self) -> Option<String> {
        self.bridge.namespace.read().clone()
    }

    fn store(&self) -> Result<JsonStore> {
        let namespace = self
            .namespace()
            .ok_or_else(|| Error::Config(NAMESPACE_UNSET.to_string()))?;
        let dir = scoped_join(&self.bridge.host().paths.store_root(), &namespace)?;
        Ok(JsonStore::new(dir).pretty(self.bridge.state().config.pretty_store()))
    }

    /// 문서 이름이 네임스페이스 밖으로 나가지 않는지 확인
    fn checked(&self, name: &str) -> Result<JsonStore> {
        let store = self.store()?;
        scoped_join(store.base_dir(), name)?;
        Ok(store)
    }

    /// 문서 로드 (`NotFound` / `Corrupt`)
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        self.checked(name)?.load(name)
    }

    /// 문서 저장
    ///
    /// 인코딩할 수 없는 값은 `ContentValidation`이며 파일은 쓰지 않습니다.
    pub fn save<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> Result<()> {
        self.checked(name)?.save(name, data)
    }

    /// 문서 존재 여부
    ///
    /// 네임스페이스가 없을 때만 에러입니다.
    pub fn exists(&self, name: &str) -> Result<bool> {
        let store = self.store()?;
        if scoped_join(store.base_dir(), name).is_err() {
            return Ok(false);
        }
        Ok(store.exists(name))
    }

    /// 네임스페이스의 문서 이름 목록
    pub fn list(&self) -> Result<Vec<String>> {
        self.store()?.list()
    }
}

#[cfg(test)]
mod tests {
    use crate::bridge::test_support::Fixture;
    use bridge_foundation::Error;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    #[test]
    fn test_requires_namespace() {
        let fx = Fixture::new();
        let bridge = fx.runtime.create_bridge(false, "plugins/a");

        assert!(matches!(bridge.store().exists("x"), Err(Error::Config(_))));
        assert!(matches!(
            bridge.store().load::<Value>("x"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            bridge.store().save("x", &json!(1)),
            Err(Error::Config(_))
        ));
        assert!(matches!(bridge.store().setup(""), Err(Error::Config(_))));
    }

    #[test]
    fn test_round_trip_and_exists() {
        let fx = Fixture::new();
        let bridge = fx.runtime.create_bridge(false, "plugins/a");
        let store = bridge.store();
        store.setup("my-plugin").unwrap();
        store.setup("my-plugin").unwrap();

        let doc = json!({ "list": [1, 2.5, "three"], "nested": { "ok": true }, "none": null });
        assert!(!store.exists("settings").unwrap());
        assert!(store.load::<Value>("settings").unwrap_err().is_not_found());

        store.save("settings", &doc).unwrap();
        assert!(store.exists("settings").unwrap());
        assert_eq!(store.load::<Value>("settings").unwrap(), doc);
        assert!(fx.dir.path().join("store/my-plugin/settings").is_file());
    }

    #[test]
    fn test_invalid_content_writes_nothing() {
        let fx = Fixture::new();
        let bridge = fx.runtime.create_bridge(false, "plugins/a");
        bridge.store().setup("ns").unwrap();

        let mut bad = HashMap::new();
        bad.insert((1, 2), "tuple keys are not valid object keys");

        assert!(matches!(
            bridge.store().save("bad", &bad),
            Err(Error::ContentValidation(_))
        ));
        assert!(!bridge.store().exists("bad").unwrap());
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let fx = Fixture::new();
        let bridge = fx.runtime.create_bridge(false, "plugins/a");
        bridge.store().setup("ns").unwrap();

        assert!(matches!(
            bridge.store().save("nan", &f64::NAN),
            Err(Error::ContentValidation(_))
        ));
        assert!(!bridge.store().exists("nan").unwrap());
        assert!(bridge.store().load::<Value>("nan").unwrap_err().is_not_found());

        bridge.store().save("ratio", &0.1f64).unwrap();
        let loaded: f64 = bridge.store().load("ratio").unwrap();
        assert_eq!(loaded.to_bits(), 0.1f64.to_bits());
    }

    #[test]
    fn test_directories_are_not_documents() {
        let fx = Fixture::new();
        let bridge = fx.runtime.create_bridge(false, "plugins/a");
        bridge.store().setup("ns").unwrap();
        bridge.store().save("sub/doc", &json!(true)).unwrap();

        for name in ["sub", ""] {
            assert!(!bridge.store().exists(name).unwrap());
            assert!(bridge.store().load::<Value>(name).unwrap_err().is_not_found());
        }
    }

    #[test]
    fn test_corrupt_document() {
        let fx = Fixture::new();
        let bridge = fx.runtime.create_bridge(false, "plugins/a");
        bridge.store().setup("ns").unwrap();
        std::fs::write(fx.dir.path().join("store/ns/broken"), "{ not json").unwrap();

        assert!(matches!(
            bridge.store().load::<Value>("broken"),
            Err(Error::Corrupt { .. })
        ));
    }

    #[test]
    fn test_escaping_names_are_refused() {
        let fx = Fixture::new();
        let bridge = fx.runtime.create_bridge(false, "plugins/a");
        bridge.store().setup("ns").unwrap();

        assert!(!bridge.store().exists("../../secret").unwrap());
        assert!(matches!(
            bridge.store().save("../escape", &json!(1)),
            Err(Error::PathEscape(_))
        ));
        assert!(matches!(bridge.store().setup("../up"), Err(Error::PathEscape(_))));
    }

    #[test]
    fn test_resetup_repoints() {
        let fx = Fixture::new();
        let bridge = fx.runtime.create_bridge(false, "plugins/a");
        bridge.store().setup("one").unwrap();
        bridge.store().save("doc", &json!("first")).unwrap();

        bridge.store().setup("two").unwrap();
        assert!(!bridge.store().exists("doc").unwrap());
        assert_eq!(bridge.store().namespace().as_deref(), Some("two"));
    }
}
