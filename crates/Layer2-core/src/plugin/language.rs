//! Language Registry - 플러그인이 추가한 구문 정의

use super::registry::PluginId;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// 등록된 언어 정의
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageEntry {
    pub owner: PluginId,
    pub definition: Value,
}

/// 이름 → 언어 정의 (먼저 등록한 쪽 우선)
#[derive(Debug, Default)]
pub struct LanguageRegistry {
    languages: RwLock<BTreeMap<String, LanguageEntry>>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 이름이 비어 있을 때만 추가
    pub fn register(&self, owner: PluginId, name: &str, definition: Value) -> bool {
        let mut languages = self.languages.write();
        if languages.contains_key(name) {
            debug!(language = name, by = %owner, "Language already registered");
            return false;
        }
        languages.insert(name.to_string(), LanguageEntry { owner, definition });
        debug!(language = name, by = %owner, "Registered language");
        true
    }

    pub fn remove(&self, name: &str) -> Option<LanguageEntry> {
        self.languages.write().remove(name)
    }

    /// 플러그인이 등록한 언어 모두 제거 (제거된 이름 반환)
    pub fn remove_owned_by(&self, owner: PluginId) -> Vec<String> {
        let mut languages = self.languages.write();
        let names: Vec<String> = languages
            .iter()
            .filter(|(_, entry)| entry.owner == owner)
            .map(|(name, _)| name.clone())
            .collect();
        for name in &names {
            languages.remove(name);
        }
        names
    }

    pub fn get(&self, name: &str) -> Option<LanguageEntry> {
        self.languages.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.languages.read().contains_key(name)
    }

    /// 등록된 이름 (정렬됨)
    pub fn names(&self) -> Vec<String> {
        self.languages.read().keys().cloned().collect()
    }
}
