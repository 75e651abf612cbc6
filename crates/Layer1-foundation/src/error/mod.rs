//! Error types for the plugin bridge
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Plugin bridge 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련 (플러그인 작성자 실수 - 즉시 실패)
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 저장소 관련
    // ========================================================================
    #[error("Provided data is not a valid store content: {0}")]
    ContentValidation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corrupt document {name}: {message}")]
    Corrupt { name: String, message: String },

    // ========================================================================
    // UI 기여 레지스트리 관련
    // ========================================================================
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Contribution {id} is owned by plugin {owner}")]
    Ownership { id: String, owner: u64 },

    // ========================================================================
    // 경로 / 권한
    // ========================================================================
    #[error("Path escapes its scoped root: {0}")]
    PathEscape(String),

    #[error("Deprecated: {0}")]
    Deprecated(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 플러그인 코드의 잘못으로 발생한 에러인지 확인
    ///
    /// Fault reporter가 플러그인 파일 경로로 귀속시킬 에러들
    pub fn is_plugin_fault(&self) -> bool {
        matches!(
            self,
            Error::Config(_)
                | Error::ContentValidation(_)
                | Error::Ownership { .. }
                | Error::Conflict(_)
                | Error::PathEscape(_)
                | Error::Deprecated(_)
        )
    }

    /// Corrupt 에러 생성 헬퍼
    pub fn corrupt(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Corrupt {
            name: name.into(),
            message: message.into(),
        }
    }

    /// NotFound 여부
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
