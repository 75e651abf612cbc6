//! UI API - 메뉴, 사이드바, 푸터, 윈도우, 생성 가능 파일
//!
//! 레지스트리를 바꾼 뒤 호스트 UI 상태 저장소에 대응하는 명령을 보냅니다.
//! `register`는 단일 객체 또는 배열을 받습니다.

use super::{one_or_many, Bridge};
use crate::host::UiCommand;
use crate::plugin::{ContributionKind, ContributionRegistry, RegistryChange, SidebarView};
use bridge_foundation::Result;
use serde_json::Value;

/// 종류별 add/update/remove 명령
fn add_command(kind: ContributionKind, payload: Value) -> Option<UiCommand> {
    match kind {
        ContributionKind::Sidebar => Some(UiCommand::AddPluginSidebar(payload)),
        ContributionKind::Footer => Some(UiCommand::AddPluginFooter(payload)),
        ContributionKind::Window => Some(UiCommand::AddPluginWindow(payload)),
        _ => None,
    }
}

fn update_command(kind: ContributionKind, payload: Value) -> Option<UiCommand> {
    match kind {
        ContributionKind::Sidebar => Some(UiCommand::UpdatePluginSidebar(payload)),
        ContributionKind::Footer => Some(UiCommand::UpdatePluginFooter(payload)),
        ContributionKind::Window => Some(UiCommand::UpdatePluginWindow(payload)),
        _ => None,
    }
}

fn remove_command(kind: ContributionKind, id: String) -> Option<UiCommand> {
    match kind {
        ContributionKind::Sidebar => Some(UiCommand::RemovePluginSidebar(id)),
        ContributionKind::Footer => Some(UiCommand::RemovePluginFooter(id)),
        ContributionKind::Window => Some(UiCommand::RemovePluginWindow(id)),
        _ => None,
    }
}

/// 레지스트리 하나에 대한 공통 CRUD
struct Contributions<'a> {
    bridge: &'a Bridge,
    kind: ContributionKind,
}

impl<'a> Contributions<'a> {
    fn new(bridge: &'a Bridge, kind: ContributionKind) -> Self {
        Self { bridge, kind }
    }

    fn registry(&self) -> &'a ContributionRegistry {
        self.bridge.state().ui.registry(self.kind)
    }

    fn register(&self, input: Value) -> Result<Vec<RegistryChange>> {
        let changes = self.registry().register(self.bridge.id(), one_or_many(input))?;
        for change in &changes {
            let command = match change {
                RegistryChange::Added(c) => add_command(self.kind, c.payload.clone()),
                RegistryChange::Replaced(c) => update_command(self.kind, c.payload.clone()),
            };
            if let Some(command) = command {
                self.bridge.commit(command);
            }
        }
        Ok(changes)
    }

    fn update(&self, item: Value) -> Result<bool> {
        match self.registry().update(self.bridge.id(), item)? {
            Some(updated) => {
                if let Some(command) = update_command(self.kind, updated.payload) {
                    self.bridge.commit(command);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&self, id: &str) -> Result<bool> {
        match self.registry().remove(self.bridge.id(), id)? {
            Some(removed) => {
                if let Some(command) = remove_command(self.kind, removed.id) {
                    self.bridge.commit(command);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 이 플러그인의 payload 목록
    fn owned(&self) -> Vec<Value> {
        self.registry()
            .list_owned_by(self.bridge.id())
            .into_iter()
            .map(|c| c.payload)
            .collect()
    }
}

// ============================================================================
// Menu
// ============================================================================

/// 앱 메뉴
///
/// 변경될 때마다 이 플러그인의 메뉴 전체를 `AddToAppMenu`로 다시 보냅니다.
/// 저장되는 항목은 항상 `trusted: false`입니다.
pub struct MenuApi<'a> {
    inner: Contributions<'a>,
}

impl<'a> MenuApi<'a> {
    pub(crate) fn new(bridge: &'a Bridge) -> Self {
        Self {
            inner: Contributions::new(bridge, ContributionKind::Menu),
        }
    }

    fn publish(&self) {
        let menus = self.inner.owned();
        let plugin = self.inner.bridge.id();
        if menus.is_empty() {
            self.inner.bridge.commit(UiCommand::RemoveAppMenu { plugin });
        } else {
            self.inner
                .bridge
                .commit(UiCommand::AddToAppMenu { plugin, menus });
        }
    }

    pub fn register(&self, input: Value) -> Result<()> {
        self.inner.register(input)?;
        self.publish();
        Ok(())
    }

    pub fn update(&self, item: Value) -> Result<bool> {
        let updated = self.inner.update(item)?;
        if updated {
            self.publish();
        }
        Ok(updated)
    }

    pub fn remove(&self, id: &str) -> Result<bool> {
        let removed = self.inner.remove(id)?;
        if removed {
            self.publish();
        }
        Ok(removed)
    }

    pub fn list(&self) -> Vec<Value> {
        self.inner.owned()
    }
}

// ============================================================================
// Sidebar
// ============================================================================

/// 사이드바
///
/// `open`/`open_default`/`close`는 레지스트리가 아니라 표시 상태만 바꿉니다.
pub struct SidebarApi<'a> {
    inner: Contributions<'a>,
}

impl<'a> SidebarApi<'a> {
    pub(crate) fn new(bridge: &'a Bridge) -> Self {
        Self {
            inner: Contributions::new(bridge, ContributionKind::Sidebar),
        }
    }

    pub fn register(&self, input: Value) -> Result<()> {
        self.inner.register(input).map(|_| ())
    }

    pub fn update(&self, item: Value) -> Result<bool> {
        self.inner.update(item)
    }

    pub fn remove(&self, id: &str) -> Result<bool> {
        let removed = self.inner.remove(id)?;
        let ui = &self.inner.bridge.state().ui;
        if removed && ui.sidebar_view() == SidebarView::Plugin(id.to_string()) {
            ui.set_sidebar_view(SidebarView::Closed);
            self.inner.bridge.commit(UiCommand::SetSidebarMenu(0));
        }
        Ok(removed)
    }

    pub fn open(&self, id: &str) {
        self.inner
            .bridge
            .state()
            .ui
            .set_sidebar_view(SidebarView::Plugin(id.to_string()));
        self.inner
            .bridge
            .commit(UiCommand::OpenPluginSidebar(id.to_string()));
    }

    pub fn open_default(&self) {
        self.inner.bridge.state().ui.set_sidebar_view(SidebarView::Default);
        self.inner.bridge.commit(UiCommand::SetSidebarMenu(1));
    }

    pub fn close(&self) {
        self.inner.bridge.state().ui.set_sidebar_view(SidebarView::Closed);
        self.inner.bridge.commit(UiCommand::SetSidebarMenu(0));
    }
}

// ============================================================================
// Footer
// ============================================================================

pub struct FooterApi<'a> {
    inner: Contributions<'a>,
}

impl<'a> FooterApi<'a> {
    pub(crate) fn new(bridge: &'a Bridge) -> Self {
        Self {
            inner: Contributions::new(bridge, ContributionKind::Footer),
        }
    }

    /// `id` 없는 항목은 `Config` 에러
    pub fn register(&self, input: Value) -> Result<()> {
        self.inner.register(input).map(|_| ())
    }

    pub fn update(&self, item: Value) -> Result<bool> {
        self.inner.update(item)
    }

    pub fn remove(&self, id: &str) -> Result<bool> {
        self.inner.remove(id)
    }
}

// ============================================================================
// Window
// ============================================================================

pub struct WindowApi<'a> {
    inner: Contributions<'a>,
}

impl<'a> WindowApi<'a> {
    pub(crate) fn new(bridge: &'a Bridge) -> Self {
        Self {
            inner: Contributions::new(bridge, ContributionKind::Window),
        }
    }

    /// `id` 없는 항목은 `Config` 에러
    pub fn register(&self, input: Value) -> Result<()> {
        self.inner.register(input).map(|_| ())
    }

    pub fn update(&self, item: Value) -> Result<bool> {
        self.inner.update(item)
    }

    pub fn remove(&self, id: &str) -> Result<bool> {
        let removed = self.inner.remove(id)?;
        if removed {
            self.inner.bridge.state().ui.set_window_visible(id, false);
        }
        Ok(removed)
    }

    pub fn open(&self, id: &str) {
        self.set_visible(id, true);
    }

    pub fn close(&self, id: &str) {
        self.set_visible(id, false);
    }

    fn set_visible(&self, id: &str, visible: bool) {
        self.inner.bridge.state().ui.set_window_visible(id, visible);
        self.inner.bridge.commit(UiCommand::SetWindowIsVisible {
            id: id.to_string(),
            visible,
        });
    }
}

// ============================================================================
// BuildableFile
// ============================================================================

/// 파일 생성 창에 추가되는 템플릿
pub struct BuildableFileApi<'a> {
    inner: Contributions<'a>,
}

impl<'a> BuildableFileApi<'a> {
    pub(crate) fn new(bridge: &'a Bridge) -> Self {
        Self {
            inner: Contributions::new(bridge, ContributionKind::BuildableFile),
        }
    }

    pub fn register(&self, input: Value) -> Result<()> {
        self.inner.register(input).map(|_| ())
    }

    pub fn list(&self) -> Vec<Value> {
        self.inner.owned()
    }
}
