//! Utils API - 현재 프로젝트와 선택된 파일 조회

use super::Bridge;
use bridge_foundation::{Error, Result};
use serde_json::Value;
use std::path::PathBuf;

pub struct UtilsApi<'a> {
    bridge: &'a Bridge,
}

impl<'a> UtilsApi<'a> {
    pub(crate) fn new(bridge: &'a Bridge) -> Self {
        Self { bridge }
    }

    /// `<base path>/<current project>/`
    pub fn base_path(&self) -> Result<PathBuf> {
        let project = self
            .current_project()
            .ok_or_else(|| Error::Config("No project selected".to_string()))?;
        Ok(self.bridge.host().paths.base_path().join(project))
    }

    pub fn current_project(&self) -> Option<String> {
        self.bridge.host().documents.current_project()
    }

    /// 탐색기에서 선택된 노드
    pub fn current_selected(&self) -> Option<Value> {
        self.bridge.host().documents.current_selected()
    }

    /// 선택된 파일 경로 (`/` 구분자)
    pub fn current_file_path(&self) -> Option<String> {
        self.bridge
            .host()
            .documents
            .current_file()
            .map(|file| file.file_path.replace('\\', "/"))
    }

    pub fn current_file_content(&self) -> Option<String> {
        self.bridge
            .host()
            .documents
            .current_file()
            .map(|file| file.content)
    }
}

#[cfg(test)]
mod tests {
    use crate::bridge::test_support::Fixture;
    use crate::host::ActiveFile;
    use crate::plugin::PluginRuntime;
    use bridge_foundation::BridgeConfig;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_runtime_from_config_selects_project() {
        let dir = TempDir::new().unwrap();
        let config = BridgeConfig::default()
            .with_base_path(dir.path().join("projects"))
            .with_store_dir(dir.path().join("store"));
        let runtime = PluginRuntime::from_config(config, Some("demo"));
        let bridge = runtime.create_bridge(false, "plugins/a");

        let root = dir.path().join("projects/demo");
        assert_eq!(bridge.utils().current_project().as_deref(), Some("demo"));
        assert_eq!(bridge.utils().base_path().unwrap(), root);
        assert_eq!(bridge.fs().resolve("a.json").unwrap(), root.join("a.json"));
    }

    #[test]
    fn test_reads_from_document_host() {
        let fx = Fixture::new();
        let bridge = fx.runtime.create_bridge(false, "plugins/a");
        let utils = bridge.utils();

        assert_eq!(utils.current_project().as_deref(), Some("demo"));
        assert_eq!(utils.base_path().unwrap(), fx.dir.path().join("projects/demo"));
        assert!(utils.current_file_path().is_none());

        fx.documents.set_active_file(Some(ActiveFile {
            file_path: "C:\\projects\\demo\\entities\\a.json".into(),
            content: "{}".into(),
        }));
        fx.documents.set_selected(Some(json!({ "name": "entities" })));

        assert_eq!(
            utils.current_file_path().as_deref(),
            Some("C:/projects/demo/entities/a.json")
        );
        assert_eq!(utils.current_file_content().as_deref(), Some("{}"));
        assert_eq!(utils.current_selected(), Some(json!({ "name": "entities" })));
    }
}
