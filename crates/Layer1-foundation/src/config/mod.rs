//! Config - 통합 설정 관리
//!
//! - `bridge.rs` - BridgeConfig (경로, 캐시 파일, 로그 레벨)

mod bridge;

pub use bridge::{BridgeConfig, BRIDGE_CONFIG_FILE};
