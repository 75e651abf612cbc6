//! UI Contribution Registries - 메뉴, 사이드바, 푸터, 윈도우, 생성 가능 파일
//!
//! 각 기여는 레지스트리 안에서 유일한 id와 등록한 플러그인(owner)을 가집니다.
//!
//! - 등록: Footer/Window는 id 필수, 나머지는 없으면 생성
//! - 같은 플러그인이 같은 id로 다시 등록하면 교체, 다른 플러그인의 id면 `Conflict`
//! - 수정: payload 전체 교체, 모르는 id는 no-op
//! - 삭제: 없는 id는 no-op, 다른 플러그인의 기여는 `Ownership`
//! - Menu 기여는 항상 `trusted: false`

use super::registry::PluginId;
use bridge_foundation::{Error, Result};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

// ============================================================================
// ContributionKind
// ============================================================================

/// 기여 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    Menu,
    Sidebar,
    Footer,
    Window,
    BuildableFile,
}

impl ContributionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Sidebar => "sidebar",
            Self::Footer => "footer",
            Self::Window => "window",
            Self::BuildableFile => "buildable_file",
        }
    }

    /// 등록 시 id가 필수인지
    pub fn requires_id(&self) -> bool {
        matches!(self, Self::Footer | Self::Window)
    }
}

impl std::fmt::Display for ContributionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Contribution
// ============================================================================

/// 등록된 UI 기여
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub id: String,
    pub owner: PluginId,
    /// 표시용 payload (항상 `id` 필드 포함)
    pub payload: Value,
}

/// 등록 결과
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryChange {
    Added(Contribution),
    Replaced(Contribution),
}

impl RegistryChange {
    pub fn contribution(&self) -> &Contribution {
        match self {
            Self::Added(c) | Self::Replaced(c) => c,
        }
    }
}

// ============================================================================
// ContributionRegistry
// ============================================================================

/// 순서가 있는, id 기반 기여 레지스트리
pub struct ContributionRegistry {
    kind: ContributionKind,

    /// 등록 순서 유지
    entries: RwLock<Vec<Contribution>>,

    /// id 없는 기여에 붙일 일련번호
    generated: AtomicU64,
}

impl ContributionRegistry {
    pub fn new(kind: ContributionKind) -> Self {
        Self {
            kind,
            entries: RwLock::new(Vec::new()),
            generated: AtomicU64::new(0),
        }
    }

    pub fn kind(&self) -> ContributionKind {
        self.kind
    }

    /// payload 정규화 - 객체 여부, id 추출/생성, menu trusted 강제
    ///
    /// 호출자가 준 id 값은 그대로 두고, 문자열 형태는 레지스트리 키로만 씁니다.
    fn normalize(&self, owner: PluginId, item: Value, require_id: bool) -> Result<(String, Value)> {
        let Value::Object(mut map) = item else {
            return Err(Error::Config(format!(
                "A {} contribution must be an object",
                self.kind
            )));
        };

        let id = match map.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ if require_id => {
                return Err(Error::Config(format!("No {} id defined.", self.kind)));
            }
            _ => {
                let id = format!(
                    "{}-{}-{}",
                    self.kind,
                    owner.as_u64(),
                    self.generated.fetch_add(1, Ordering::SeqCst)
                );
                map.insert("id".to_string(), Value::String(id.clone()));
                id
            }
        };

        if self.kind == ContributionKind::Menu {
            map.insert("trusted".to_string(), Value::Bool(false));
        }

        Ok((id, Value::Object(map)))
    }

    /// 하나 이상의 기여 등록
    ///
    /// 모든 항목을 먼저 검증하므로, 하나라도 실패하면 아무것도 추가되지 않습니다.
    pub fn register(&self, owner: PluginId, items: Vec<Value>) -> Result<Vec<RegistryChange>> {
        let require_id = self.kind.requires_id();
        let normalized = items
            .into_iter()
            .map(|item| self.normalize(owner, item, require_id))
            .collect::<Result<Vec<_>>>()?;

        let mut entries = self.entries.write();
        for (id, _) in &normalized {
            if let Some(existing) = entries.iter().find(|c| &c.id == id) {
                if existing.owner != owner {
                    warn!(
                        kind = %self.kind,
                        id = %id,
                        owner = %existing.owner,
                        by = %owner,
                        "Refusing contribution id owned by another plugin"
                    );
                    return Err(Error::Conflict(format!(
                        "{} id '{}' is already registered by {}",
                        self.kind, id, existing.owner
                    )));
                }
            }
        }

        let mut changes = Vec::with_capacity(normalized.len());
        for (id, payload) in normalized {
            let contribution = Contribution { id, owner, payload };
            match entries.iter_mut().find(|c| c.id == contribution.id) {
                Some(existing) => {
                    *existing = contribution.clone();
                    changes.push(RegistryChange::Replaced(contribution));
                }
                None => {
                    entries.push(contribution.clone());
                    changes.push(RegistryChange::Added(contribution));
                }
            }
        }

        debug!(kind = %self.kind, owner = %owner, count = changes.len(), "Registered contributions");
        Ok(changes)
    }

    /// payload 전체 교체
    ///
    /// 모르는 id는 `Ok(None)`.
    pub fn update(&self, owner: PluginId, item: Value) -> Result<Option<Contribution>> {
        let (id, payload) = self.normalize(owner, item, true)?;

        let mut entries = self.entries.write();
        let Some(existing) = entries.iter_mut().find(|c| c.id == id) else {
            debug!(kind = %self.kind, id = %id, "Ignoring update for unknown contribution");
            return Ok(None);
        };
        if existing.owner != owner {
            return Err(Error::Ownership {
                id,
                owner: existing.owner.as_u64(),
            });
        }

        existing.payload = payload;
        Ok(Some(existing.clone()))
    }

    /// id로 삭제 (없으면 `Ok(None)`)
    pub fn remove(&self, owner: PluginId, id: &str) -> Result<Option<Contribution>> {
        let mut entries = self.entries.write();
        let Some(index) = entries.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        if entries[index].owner != owner {
            return Err(Error::Ownership {
                id: id.to_string(),
                owner: entries[index].owner.as_u64(),
            });
        }

        let removed = entries.remove(index);
        debug!(kind = %self.kind, id, "Removed contribution");
        Ok(Some(removed))
    }

    /// 플러그인이 소유한 기여 모두 삭제 (호스트 측 정리)
    pub fn remove_owned_by(&self, owner: PluginId) -> Vec<Contribution> {
        let mut entries = self.entries.write();
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut *entries).into_iter().partition(|c| c.owner == owner);
        *entries = kept;
        removed
    }

    pub fn get(&self, id: &str) -> Option<Contribution> {
        self.entries.read().iter().find(|c| c.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().iter().any(|c| c.id == id)
    }

    /// 등록 순서대로 전체 목록
    pub fn list(&self) -> Vec<Contribution> {
        self.entries.read().clone()
    }

    pub fn list_owned_by(&self, owner: PluginId) -> Vec<Contribution> {
        self.entries
            .read()
            .iter()
            .filter(|c| c.owner == owner)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

// ============================================================================
// UiRegistries
// ============================================================================

/// 사이드바 표시 상태 (레지스트리 내용과 별개)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarView {
    Closed,
    Default,
    Plugin(String),
}

/// 런타임이 소유하는 모든 UI 기여 레지스트리
pub struct UiRegistries {
    pub menus: ContributionRegistry,
    pub sidebars: ContributionRegistry,
    pub footers: ContributionRegistry,
    pub windows: ContributionRegistry,
    pub buildable_files: ContributionRegistry,
    sidebar_view: RwLock<SidebarView>,
    visible_windows: RwLock<BTreeSet<String>>,
}

impl UiRegistries {
    pub fn new() -> Self {
        Self {
            menus: ContributionRegistry::new(ContributionKind::Menu),
            sidebars: ContributionRegistry::new(ContributionKind::Sidebar),
            footers: ContributionRegistry::new(ContributionKind::Footer),
            windows: ContributionRegistry::new(ContributionKind::Window),
            buildable_files: ContributionRegistry::new(ContributionKind::BuildableFile),
            sidebar_view: RwLock::new(SidebarView::Closed),
            visible_windows: RwLock::new(BTreeSet::new()),
        }
    }

    pub fn registry(&self, kind: ContributionKind) -> &ContributionRegistry {
        match kind {
            ContributionKind::Menu => &self.menus,
            ContributionKind::Sidebar => &self.sidebars,
            ContributionKind::Footer => &self.footers,
            ContributionKind::Window => &self.windows,
            ContributionKind::BuildableFile => &self.buildable_files,
        }
    }

    pub fn sidebar_view(&self) -> SidebarView {
        self.sidebar_view.read().clone()
    }

    pub fn set_sidebar_view(&self, view: SidebarView) {
        *self.sidebar_view.write() = view;
    }

    pub fn is_window_visible(&self, id: &str) -> bool {
        self.visible_windows.read().contains(id)
    }

    pub fn set_window_visible(&self, id: &str, visible: bool) {
        let mut windows = self.visible_windows.write();
        if visible {
            windows.insert(id.to_string());
        } else {
            windows.remove(id);
        }
    }

    /// 보이는 윈도우 id 목록 (정렬됨)
    pub fn visible_windows(&self) -> Vec<String> {
        self.visible_windows.read().iter().cloned().collect()
    }
}

impl Default for UiRegistries {
    fn default() -> Self {
        Self::new()
    }
}
