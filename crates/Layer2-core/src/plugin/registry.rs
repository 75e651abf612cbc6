//! Plugin Registry - 플러그인 식별자와 레코드 저장소

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

// ============================================================================
// PluginId
// ============================================================================

/// 브릿지 인스턴스마다 한 번 발급되는 런타임 식별자
///
/// 프로세스 수명 동안 재사용되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginId(u64);

impl PluginId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PluginId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "plugin-{}", self.0)
    }
}

// ============================================================================
// PluginRecord
// ============================================================================

/// `registerPlugin`으로 선언된 메타데이터
///
/// 문자열이 아닌 `name`은 `extra`에 그대로 남습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct PluginInfo {
    /// 플러그인 파일 경로 (호출자가 넘긴 값은 무시됨)
    pub id: String,

    /// 표시 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// 나머지 임의 필드 (author, version, description ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for PluginInfo {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let id = match map.remove("id") {
            Some(Value::String(id)) => id,
            _ => return Err("plugin info needs a string id".to_string()),
        };
        let name = match map.remove("name") {
            Some(Value::String(name)) => Some(name),
            Some(other) => {
                map.insert("name".to_string(), other);
                None
            }
            None => None,
        };

        Ok(Self {
            id,
            name,
            extra: map,
        })
    }
}

/// 플러그인 라이프사이클 태그
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "info", rename_all = "snake_case")]
pub enum PluginState {
    /// 스크립트 형태로 로드됨, 아직 registerPlugin 호출 전
    Unknown,
    /// 모듈 형태로 로드됨, 아직 registerPlugin 호출 전
    Module,
    /// registerPlugin 완료
    Registered(PluginInfo),
}

impl PluginState {
    pub fn initial(is_module: bool) -> Self {
        if is_module {
            Self::Module
        } else {
            Self::Unknown
        }
    }

    pub fn info(&self) -> Option<&PluginInfo> {
        match self {
            Self::Registered(info) => Some(info),
            _ => None,
        }
    }
}

/// 플러그인 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginRecord {
    pub id: PluginId,

    /// 플러그인 파일 경로
    pub file_path: String,

    pub state: PluginState,

    pub loaded_at: DateTime<Utc>,
}

impl PluginRecord {
    /// 표시용 이름 (등록 이름 → 파일 경로)
    pub fn display_name(&self) -> &str {
        self.state
            .info()
            .and_then(|info| info.name.as_deref())
            .unwrap_or(&self.file_path)
    }
}

// ============================================================================
// PluginRegistry
// ============================================================================

/// 플러그인 레지스트리
///
/// 식별자 발급은 단조 증가 카운터이며, 해제된 식별자는 재사용하지 않습니다.
pub struct PluginRegistry {
    /// 다음에 발급할 식별자
    next_id: AtomicU64,

    /// 활성 플러그인 레코드
    records: RwLock<BTreeMap<PluginId, PluginRecord>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// 새 식별자 발급
    pub fn allocate(&self) -> PluginId {
        PluginId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// 레코드 추가/교체
    pub fn set_record(&self, record: PluginRecord) {
        debug!(plugin_id = %record.id, file = %record.file_path, "Set plugin record");
        self.records.write().insert(record.id, record);
    }

    /// 상태만 교체 (레코드가 없으면 false)
    pub fn set_state(&self, id: PluginId, state: PluginState) -> bool {
        let mut records = self.records.write();
        match records.get_mut(&id) {
            Some(record) => {
                if let PluginState::Registered(info) = &state {
                    info!(plugin_id = %id, name = ?info.name, "Plugin registered metadata");
                }
                record.state = state;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: PluginId) -> Option<PluginRecord> {
        self.records.read().get(&id).cloned()
    }

    /// 모든 활성 레코드 (발급 순서)
    pub fn get_all(&self) -> Vec<PluginRecord> {
        self.records.read().values().cloned().collect()
    }

    /// 레코드 해제 (식별자는 회수하지 않음)
    pub fn release(&self, id: PluginId) -> Option<PluginRecord> {
        let removed = self.records.write().remove(&id);
        if removed.is_some() {
            debug!(plugin_id = %id, "Released plugin record");
        }
        removed
    }

    pub fn contains(&self, id: PluginId) -> bool {
        self.records.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn record(registry: &PluginRegistry, path: &str, is_module: bool) -> PluginId {
        let id = registry.allocate();
        registry.set_record(PluginRecord {
            id,
            file_path: path.to_string(),
            state: PluginState::initial(is_module),
            loaded_at: Utc::now(),
        });
        id
    }

    #[test]
    fn test_allocate_is_unique() {
        let registry = PluginRegistry::new();
        let ids: HashSet<_> = (0..100).map(|_| registry.allocate()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_released_ids_are_not_recycled() {
        let registry = PluginRegistry::new();
        let first = record(&registry, "a", false);
        registry.release(first);

        let second = registry.allocate();
        assert!(second > first);
        assert!(!registry.contains(first));
    }

    #[test]
    fn test_initial_state_and_upgrade() {
        let registry = PluginRegistry::new();
        let module = record(&registry, "plugins/m", true);
        let script = record(&registry, "plugins/s", false);

        assert_eq!(registry.get(module).unwrap().state, PluginState::Module);
        assert_eq!(registry.get(script).unwrap().state, PluginState::Unknown);

        let info = PluginInfo {
            id: "plugins/s".into(),
            name: Some("Script".into()),
            extra: Map::new(),
        };
        assert!(registry.set_state(script, PluginState::Registered(info)));
        assert_eq!(registry.get(script).unwrap().display_name(), "Script");
        assert_eq!(registry.get(module).unwrap().display_name(), "plugins/m");
    }

    #[test]
    fn test_get_all_in_allocation_order() {
        let registry = PluginRegistry::new();
        let a = record(&registry, "a", false);
        let b = record(&registry, "b", false);

        let all: Vec<_> = registry.get_all().into_iter().map(|r| r.id).collect();
        assert_eq!(all, vec![a, b]);
        assert!(!registry.set_state(registry.allocate(), PluginState::Module));
    }

    #[test]
    fn test_info_flattens_extra_fields() {
        let info: PluginInfo = serde_json::from_value(serde_json::json!({
            "id": "x",
            "name": "X",
            "author": "someone",
        }))
        .unwrap();

        assert_eq!(info.extra.get("author"), Some(&serde_json::json!("someone")));
        assert!(!info.extra.contains_key("name"));
    }

    #[test]
    fn test_info_keeps_non_string_name() {
        let info: PluginInfo = serde_json::from_value(serde_json::json!({
            "id": "x",
            "name": 42,
        }))
        .unwrap();

        assert_eq!(info.name, None);
        assert_eq!(info.extra.get("name"), Some(&serde_json::json!(42)));
        assert_eq!(serde_json::to_value(&info).unwrap()["name"], serde_json::json!(42));

        let missing_id = serde_json::from_value::<PluginInfo>(serde_json::json!({ "name": "x" }));
        assert!(missing_id.is_err());
    }
}
