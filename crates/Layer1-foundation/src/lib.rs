//! # bridge-foundation
//!
//! Foundation layer for the plugin bridge:
//! - Error: 플러그인 브릿지 전체에서 쓰는 에러 분류
//! - Config: 경로/캐시/로그 설정 (글로벌 + 프로젝트 병합)
//! - Storage: JsonStore (디렉토리 단위 JSON 문서 저장소)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  bridge-core (Plugin Registry, Bridge, Event Triggers)  │
//! │                     │                                   │
//! │          ┌──────────┴──────────┐                        │
//! │          ▼                     ▼                        │
//! │     BridgeConfig           JsonStore                    │
//! │  (global + project)   (<store root>/<ns>/<name>)        │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{BridgeConfig, BRIDGE_CONFIG_FILE};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::JsonStore;
