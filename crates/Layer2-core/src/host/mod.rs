//! # Host Seams
//!
//! 브릿지가 호스트 애플리케이션에 위임하는 외부 협력자들
//!
//! ```text
//! Bridge ──commit──▶ UiStateSink      (write-only UI 상태 저장소)
//!        ──paths───▶ PathResolver     (project / store / base 경로 prefix)
//!        ──open────▶ DocumentHost     (탭/문서 모델)
//!        ──shell───▶ ShellHost        (외부 열기)
//!        ──fault───▶ FaultReporter    (플러그인 파일 경로로 귀속)
//!        ──cache───▶ CacheBackend     (프로젝트 캐시)
//! ```

mod commands;
mod services;

pub use commands::{NullSink, RecordingSink, UiCommand, UiStateSink};
pub use services::{
    ActiveFile, DocumentHost, FaultReporter, HostServices, LoggingShell, MemoryDocumentHost,
    OpenDocument, PathResolver, RecordingFaultReporter, ShellHost, StaticPaths,
    TracingFaultReporter,
};
