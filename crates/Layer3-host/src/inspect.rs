//! store / cache 조회 명령

use anyhow::Context;
use bridge_core::path::{scoped_join, validate_segment};
use bridge_core::{CacheBackend, ProjectCache};
use bridge_foundation::{BridgeConfig, JsonStore};
use serde_json::Value;

/// 네임스페이스 목록, 또는 네임스페이스의 문서 목록
pub fn store_list(config: &BridgeConfig, namespace: Option<&str>) -> anyhow::Result<()> {
    let root = config.store_dir();

    let Some(namespace) = namespace else {
        let mut namespaces = Vec::new();
        match std::fs::read_dir(&root) {
            Ok(entries) => {
                for entry in entries {
                    let entry = entry?;
                    if entry.file_type()?.is_dir() {
                        namespaces.push(entry.file_name().to_string_lossy().into_owned());
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).context(format!("reading {}", root.display())),
        }
        namespaces.sort();

        println!("\n📦 Plugin store: {}\n", root.display());
        if namespaces.is_empty() {
            println!("No namespaces found.");
        }
        for namespace in namespaces {
            println!("  {}", namespace);
        }
        return Ok(());
    };

    validate_segment(namespace)?;
    let store = JsonStore::new(scoped_join(&root, namespace)?);
    let names = store.list()?;

    println!("\n📦 {}\n", store.base_dir().display());
    if names.is_empty() {
        println!("No documents found.");
    }
    for name in names {
        println!("  {}", name);
    }
    Ok(())
}

/// 저장된 문서 출력
pub fn store_show(config: &BridgeConfig, namespace: &str, name: &str) -> anyhow::Result<()> {
    validate_segment(namespace)?;
    let dir = scoped_join(&config.store_dir(), namespace)?;
    scoped_join(&dir, name)?;

    let document: Value = JsonStore::new(dir)
        .load(name)
        .with_context(|| format!("loading {}/{}", namespace, name))?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

/// 프로젝트 캐시 출력
pub fn cache_show(config: &BridgeConfig, project: &str, path: Option<&str>) -> anyhow::Result<()> {
    validate_segment(project)?;
    let root = scoped_join(&config.base_path(), project)?;
    let cache = ProjectCache::for_project(&root, config.cache_file());
    let snapshot = cache
        .load_snapshot()
        .with_context(|| format!("reading {}", cache.file().display()))?;

    match path {
        Some(path) => match snapshot.get(path) {
            Some(entry) => println!("{}", serde_json::to_string_pretty(entry)?),
            None => println!("{} is not cached.", path),
        },
        None => {
            println!("\n🗂  {} ({} entries)\n", cache.file().display(), snapshot.len());
            println!("{}", serde_json::to_string_pretty(&*snapshot)?);
        }
    }
    Ok(())
}
