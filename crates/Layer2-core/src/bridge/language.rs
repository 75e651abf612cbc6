//! Language API - 구문 정의와 에디터 키워드

use super::Bridge;
use crate::host::UiCommand;
use bridge_foundation::{Error, Result};
use serde_json::Value;

pub struct LanguageApi<'a> {
    bridge: &'a Bridge,
}

impl<'a> LanguageApi<'a> {
    pub(crate) fn new(bridge: &'a Bridge) -> Self {
        Self { bridge }
    }

    /// 아직 없는 이름일 때만 등록 (추가되었으면 true)
    pub fn register(&self, name: &str, definition: Value) -> bool {
        self.bridge
            .state()
            .languages
            .register(self.bridge.id(), name, definition)
    }

    /// 있으면 제거
    pub fn remove(&self, name: &str) -> bool {
        self.bridge.state().languages.remove(name).is_some()
    }

    pub fn add_keywords(&self, keywords: Value) {
        self.bridge.commit(UiCommand::AddPluginKeywords(keywords));
    }

    pub fn add_titles(&self, titles: Value) {
        self.bridge.commit(UiCommand::AddPluginTitles(titles));
    }

    pub fn add_symbols(&self, symbols: Value) {
        self.bridge.commit(UiCommand::AddPluginSymbols(symbols));
    }
}

/// 이전 하이라이터 API
///
/// 모든 호출이 `Deprecated` 에러입니다. [`LanguageApi`]를 사용하세요.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlighterApi;

impl HighlighterApi {
    pub fn register_language(&self, _name: &str, _definition: Value) -> Result<()> {
        Err(Error::Deprecated(
            "Using Highlighter.registerLanguage(...) is deprecated.".to_string(),
        ))
    }

    pub fn unregister_language(&self, _name: &str) -> Result<()> {
        Err(Error::Deprecated(
            "Using Highlighter.unregisterLanguage(...) is deprecated.".to_string(),
        ))
    }
}
