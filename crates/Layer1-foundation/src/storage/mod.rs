//! Storage module for the plugin bridge
//!
//! - `json`: JSON - 문서 단위 파일 저장/로드 (설정, 플러그인 스토어)

mod json;

pub use json::JsonStore;
