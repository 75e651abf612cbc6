//! UI State Commands - 호스트 UI 상태 저장소로 보내는 명령

use crate::plugin::PluginId;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

/// 호스트 UI 상태 저장소 명령
///
/// 저장소는 명령을 동기적으로 적용한다고 가정합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", content = "payload", rename_all = "camelCase")]
pub enum UiCommand {
    /// 플러그인의 전체 메뉴 스냅샷
    AddToAppMenu { plugin: PluginId, menus: Vec<Value> },
    /// 플러그인 언로드 시 메뉴 섹션 제거
    RemoveAppMenu { plugin: PluginId },

    AddPluginSidebar(Value),
    UpdatePluginSidebar(Value),
    RemovePluginSidebar(String),
    OpenPluginSidebar(String),
    /// 0 = 닫힘, 1 = 기본 사이드바
    SetSidebarMenu(u8),

    AddPluginFooter(Value),
    UpdatePluginFooter(Value),
    RemovePluginFooter(String),

    AddPluginWindow(Value),
    UpdatePluginWindow(Value),
    RemovePluginWindow(String),
    SetWindowIsVisible { id: String, visible: bool },

    AddPluginKeywords(Value),
    AddPluginTitles(Value),
    AddPluginSymbols(Value),
}

impl UiCommand {
    /// 명령 이름 (로그용)
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddToAppMenu { .. } => "addToAppMenu",
            Self::RemoveAppMenu { .. } => "removeAppMenu",
            Self::AddPluginSidebar(_) => "addPluginSidebar",
            Self::UpdatePluginSidebar(_) => "updatePluginSidebar",
            Self::RemovePluginSidebar(_) => "removePluginSidebar",
            Self::OpenPluginSidebar(_) => "openPluginSidebar",
            Self::SetSidebarMenu(_) => "setSidebarMenu",
            Self::AddPluginFooter(_) => "addPluginFooter",
            Self::UpdatePluginFooter(_) => "updatePluginFooter",
            Self::RemovePluginFooter(_) => "removePluginFooter",
            Self::AddPluginWindow(_) => "addPluginWindow",
            Self::UpdatePluginWindow(_) => "updatePluginWindow",
            Self::RemovePluginWindow(_) => "removePluginWindow",
            Self::SetWindowIsVisible { .. } => "setWindowIsVisible",
            Self::AddPluginKeywords(_) => "addPluginKeywords",
            Self::AddPluginTitles(_) => "addPluginTitles",
            Self::AddPluginSymbols(_) => "addPluginSymbols",
        }
    }
}

/// 호스트 UI 상태 저장소 (write-only sink)
pub trait UiStateSink: Send + Sync {
    fn commit(&self, command: UiCommand);
}

/// 명령을 버리는 sink
#[derive(Debug, Default)]
pub struct NullSink;

impl UiStateSink for NullSink {
    fn commit(&self, command: UiCommand) {
        trace!(command = command.name(), "Dropping UI command");
    }
}

/// 명령을 순서대로 기록하는 sink
#[derive(Debug, Default)]
pub struct RecordingSink {
    commands: Mutex<Vec<UiCommand>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기록된 명령 복사본
    pub fn commands(&self) -> Vec<UiCommand> {
        self.commands.lock().clone()
    }

    /// 기록된 명령을 꺼내고 비움
    pub fn take(&self) -> Vec<UiCommand> {
        std::mem::take(&mut *self.commands.lock())
    }

    pub fn len(&self) -> usize {
        self.commands.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.lock().is_empty()
    }
}

impl UiStateSink for RecordingSink {
    fn commit(&self, command: UiCommand) {
        trace!(command = command.name(), "Recording UI command");
        self.commands.lock().push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.commit(UiCommand::SetSidebarMenu(1));
        sink.commit(UiCommand::RemovePluginFooter("f".into()));

        assert_eq!(
            sink.take(),
            vec![
                UiCommand::SetSidebarMenu(1),
                UiCommand::RemovePluginFooter("f".into())
            ]
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_command_serialization() {
        let cmd = UiCommand::SetWindowIsVisible {
            id: "w".into(),
            visible: true,
        };
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({ "command": "setWindowIsVisible", "payload": { "id": "w", "visible": true } })
        );
        assert_eq!(cmd.name(), "setWindowIsVisible");
    }
}
