//! # Project Cache
//!
//! 프로젝트 파일 경로별로 미리 계산된 데이터를 보관하는 캐시
//!
//! ## 읽기 경로
//!
//! 1. `get` (async) - 메모리 스냅샷, 없으면 디스크에서 로드
//! 2. `cached_snapshot` - 메모리 스냅샷만
//! 3. `load_snapshot` - 디스크에서 새로 로드 후 메모리 갱신
//!
//! 쓰기(`save`)는 경로의 엔트리를 병합 없이 통째로 교체합니다.

mod project;

pub use project::{ProjectCache, ProjectCaches};

use async_trait::async_trait;
use bridge_foundation::Result;
use serde_json::Value;
use std::sync::Arc;

/// 경로 → 캐시 값 스냅샷
pub type CacheSnapshot = serde_json::Map<String, Value>;

/// 캐시 백엔드 trait
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// 경로의 캐시 값 (없으면 `NotFound`)
    async fn get(&self, path: &str) -> Result<Value>;

    /// 메모리에 올라와 있는 스냅샷
    fn cached_snapshot(&self) -> Option<Arc<CacheSnapshot>>;

    /// 새 스냅샷 계산 (메모리 갱신)
    fn load_snapshot(&self) -> Result<Arc<CacheSnapshot>>;

    /// 경로의 엔트리 교체
    fn save(&self, path: &str, value: Value) -> Result<()>;
}
