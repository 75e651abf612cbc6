//! Scoped paths - 플러그인 경로를 루트 안으로 제한
//!
//! 플러그인은 `/`와 `\` 둘 다 구분자로 씁니다. 앞쪽 구분자는 무시하고,
//! `..` 또는 드라이브 prefix가 있으면 거부합니다.

use bridge_foundation::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// 상대 경로를 루트 아래로 결합
pub fn scoped_join(root: &Path, relative: &str) -> Result<PathBuf> {
    let mut joined = root.to_path_buf();
    for segment in relative.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => return Err(Error::PathEscape(relative.to_string())),
            _ => {}
        }

        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => joined.push(part),
            _ => return Err(Error::PathEscape(relative.to_string())),
        }
    }
    Ok(joined)
}

/// 단일 경로 세그먼트 검증 (스토어 네임스페이스)
pub fn validate_segment(segment: &str) -> Result<()> {
    let trimmed = segment.trim().trim_matches(['/', '\\']);
    if trimmed.is_empty() {
        return Err(Error::Config("You need to define a namespace".to_string()));
    }
    scoped_join(Path::new(""), trimmed).map(|_| ())
}
