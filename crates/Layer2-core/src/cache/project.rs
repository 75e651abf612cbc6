//! ProjectCache - JSON 파일 기반 캐시 백엔드

use super::{CacheBackend, CacheSnapshot};
use crate::host::PathResolver;
use async_trait::async_trait;
use bridge_foundation::{Error, Result};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// `<project root>/<cache file>` 에 저장되는 캐시
#[derive(Debug)]
pub struct ProjectCache {
    /// 캐시 파일 경로
    file: PathBuf,

    /// 메모리 스냅샷
    snapshot: RwLock<Option<Arc<CacheSnapshot>>>,
}

impl ProjectCache {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            snapshot: RwLock::new(None),
        }
    }

    /// 프로젝트 루트 + 파일 이름
    pub fn for_project(project_root: impl AsRef<Path>, cache_file: &str) -> Self {
        Self::new(project_root.as_ref().join(cache_file))
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    fn read_file_sync(&self) -> Result<CacheSnapshot> {
        match std::fs::read_to_string(&self.file) {
            Ok(content) => self.parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CacheSnapshot::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_file(&self) -> Result<CacheSnapshot> {
        match tokio::fs::read_to_string(&self.file).await {
            Ok(content) => self.parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CacheSnapshot::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn parse(&self, content: &str) -> Result<CacheSnapshot> {
        let name = self.file.display().to_string();
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(Error::corrupt(
                name,
                format!("expected an object, found {}", json_kind(&other)),
            )),
            Err(e) => Err(Error::corrupt(name, e.to_string())),
        }
    }

    fn persist(&self, snapshot: &CacheSnapshot) -> Result<()> {
        let content = serde_json::to_string(snapshot)
            .map_err(|e| Error::ContentValidation(e.to_string()))?;
        if let Some(parent) = self.file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.file, content)?;
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for ProjectCache {
    async fn get(&self, path: &str) -> Result<Value> {
        let snapshot = match self.cached_snapshot() {
            Some(snapshot) => snapshot,
            None => {
                let loaded = Arc::new(self.read_file().await?);
                self.snapshot
                    .write()
                    .get_or_insert_with(|| Arc::clone(&loaded))
                    .clone()
            }
        };

        snapshot
            .get(path)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("cache entry {}", path)))
    }

    fn cached_snapshot(&self) -> Option<Arc<CacheSnapshot>> {
        self.snapshot.read().clone()
    }

    fn load_snapshot(&self) -> Result<Arc<CacheSnapshot>> {
        let snapshot = Arc::new(self.read_file_sync()?);
        *self.snapshot.write() = Some(Arc::clone(&snapshot));
        debug!(file = %self.file.display(), entries = snapshot.len(), "Loaded cache snapshot");
        Ok(snapshot)
    }

    fn save(&self, path: &str, value: Value) -> Result<()> {
        let mut guard = self.snapshot.write();
        let mut next = match guard.as_ref() {
            Some(current) => (**current).clone(),
            None => self.read_file_sync()?,
        };
        next.insert(path.to_string(), value);
        self.persist(&next)?;
        *guard = Some(Arc::new(next));
        debug!(path, "Saved cache entry");
        Ok(())
    }
}

// ============================================================================
// ProjectCaches
// ============================================================================

/// 현재 프로젝트를 따라가는 캐시
///
/// 호출마다 프로젝트 루트를 다시 해석하고, 루트별 [`ProjectCache`]를 재사용합니다.
pub struct ProjectCaches {
    paths: Arc<dyn PathResolver>,
    cache_file: String,
    caches: RwLock<HashMap<PathBuf, Arc<ProjectCache>>>,
}

impl ProjectCaches {
    pub fn new(paths: Arc<dyn PathResolver>, cache_file: impl Into<String>) -> Self {
        Self {
            paths,
            cache_file: cache_file.into(),
            caches: RwLock::new(HashMap::new()),
        }
    }

    /// 현재 프로젝트 루트의 캐시
    pub fn current(&self) -> Arc<ProjectCache> {
        let root = self.paths.project_root();
        if let Some(cache) = self.caches.read().get(&root) {
            return Arc::clone(cache);
        }

        let mut caches = self.caches.write();
        let cache = caches
            .entry(root.clone())
            .or_insert_with(|| Arc::new(ProjectCache::for_project(&root, &self.cache_file)));
        Arc::clone(cache)
    }
}

impl std::fmt::Debug for ProjectCaches {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectCaches")
            .field("cache_file", &self.cache_file)
            .field("projects", &self.caches.read().len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CacheBackend for ProjectCaches {
    async fn get(&self, path: &str) -> Result<Value> {
        self.current().get(path).await
    }

    fn cached_snapshot(&self) -> Option<Arc<CacheSnapshot>> {
        self.current().cached_snapshot()
    }

    fn load_snapshot(&self) -> Result<Arc<CacheSnapshot>> {
        self.current().load_snapshot()
    }

    fn save(&self, path: &str, value: Value) -> Result<()> {
        self.current().save(path, value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
