//! Event Triggers - 플러그인 간 이벤트 시스템
//!
//! 두 가지 디스패치 방식:
//!
//! - `trigger` (fan-out): 모든 리스너에 같은 인자를 전달하고 결과를 등록 순서대로 모읍니다.
//! - `overwrite_trigger` (waterfall): 리스너를 하나씩 실행하며, k번째 결과가 k+1번째의 인자가 됩니다.
//!
//! 리스너는 즉시 값([`Deferred::Ready`]) 또는 지연 값([`Deferred::Pending`])을 반환할 수 있습니다.
//! 디스패치 시작 시점의 리스너 목록을 스냅샷으로 사용하므로, 실행 중에 등록된 리스너는
//! 현재 디스패치에 영향을 주지 않습니다.

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, trace};

// ============================================================================
// Deferred - 즉시 값 또는 지연 계산
// ============================================================================

/// 즉시 값 또는 아직 끝나지 않은 계산
pub enum Deferred<T> {
    Ready(T),
    Pending(BoxFuture<'static, T>),
}

impl<T: Send + 'static> Deferred<T> {
    pub fn ready(value: T) -> Self {
        Self::Ready(value)
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::Pending(future.boxed())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// 즉시 값이면 꺼냄
    pub fn into_ready(self) -> Result<T, Self> {
        match self {
            Self::Ready(value) => Ok(value),
            pending => Err(pending),
        }
    }

    /// 항상 future 형태로 정규화
    pub fn into_future(self) -> BoxFuture<'static, T> {
        match self {
            Self::Ready(value) => futures::future::ready(value).boxed(),
            Self::Pending(future) => future,
        }
    }

    /// 값이 나올 때까지 대기
    pub async fn resolve(self) -> T {
        match self {
            Self::Ready(value) => value,
            Self::Pending(future) => future.await,
        }
    }

    pub fn map<U, F>(self, f: F) -> Deferred<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        match self {
            Self::Ready(value) => Deferred::Ready(f(value)),
            Self::Pending(future) => Deferred::Pending(future.map(f).boxed()),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

impl From<Value> for Deferred<Value> {
    fn from(value: Value) -> Self {
        Self::Ready(value)
    }
}

// ============================================================================
// EventListener
// ============================================================================

/// 이벤트 리스너 콜백
///
/// 개별 식별자가 없고 세션 동안 제거되지 않습니다.
pub type EventListener = Arc<dyn Fn(Value) -> Deferred<Value> + Send + Sync>;

/// 리스너 등록과 두 가지 트리거
pub trait Events {
    /// 리스너를 이벤트 이름 뒤에 추가
    fn add_listener(&self, name: &str, listener: EventListener);

    /// fan-out 트리거
    fn trigger(&self, name: &str, arg: Value) -> Deferred<Vec<Value>>;

    /// waterfall 트리거
    fn overwrite_trigger(&self, name: &str, arg: Value) -> Deferred<Value>;

    /// 동기 리스너 (또는 `Deferred`를 직접 반환하는 리스너)
    fn on<F, R>(&self, name: &str, listener: F)
    where
        Self: Sized,
        F: Fn(Value) -> R + Send + Sync + 'static,
        R: Into<Deferred<Value>>,
    {
        self.add_listener(
            name,
            Arc::new(move |arg: Value| -> Deferred<Value> { listener(arg).into() }),
        );
    }

    /// 비동기 리스너
    fn on_async<F, Fut>(&self, name: &str, listener: F)
    where
        Self: Sized,
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        self.add_listener(
            name,
            Arc::new(move |arg: Value| Deferred::pending(listener(arg))),
        );
    }
}

// ============================================================================
// EventTriggers
// ============================================================================

/// 이벤트 이름 → 등록 순서대로의 리스너 목록
#[derive(Default)]
pub struct EventTriggers {
    listeners: RwLock<HashMap<String, Vec<EventListener>>>,
}

impl EventTriggers {
    pub fn new() -> Self {
        Self::default()
    }

    /// 디스패치용 스냅샷
    fn snapshot(&self, name: &str) -> Vec<EventListener> {
        self.listeners
            .read()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// 이벤트의 리스너 수
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.read().get(name).map_or(0, Vec::len)
    }
}

impl Events for EventTriggers {
    fn add_listener(&self, name: &str, listener: EventListener) {
        let mut listeners = self.listeners.write();
        let entry = listeners.entry(name.to_string()).or_default();
        entry.push(listener);
        trace!(event = name, count = entry.len(), "Registered event listener");
    }

    fn trigger(&self, name: &str, arg: Value) -> Deferred<Vec<Value>> {
        let listeners = self.snapshot(name);
        debug!(event = name, listeners = listeners.len(), "Dispatching fan-out trigger");

        let results: Vec<Deferred<Value>> = listeners
            .iter()
            .map(|listener| listener(arg.clone()))
            .collect();

        if results.iter().all(Deferred::is_ready) {
            return Deferred::Ready(
                results
                    .into_iter()
                    .filter_map(|result| result.into_ready().ok())
                    .collect(),
            );
        }

        // join_all은 완료 순서와 무관하게 입력 순서를 유지
        let pending: Vec<_> = results.into_iter().map(Deferred::into_future).collect();
        Deferred::pending(join_all(pending))
    }

    fn overwrite_trigger(&self, name: &str, arg: Value) -> Deferred<Value> {
        let listeners = self.snapshot(name);
        debug!(event = name, listeners = listeners.len(), "Dispatching overwrite trigger");

        let mut value = arg;
        for (index, listener) in listeners.iter().enumerate() {
            match listener(value) {
                Deferred::Ready(next) => value = next,
                Deferred::Pending(future) => {
                    // 남은 체인은 앞 단계가 끝난 뒤에만 실행
                    let rest = listeners[index + 1..].to_vec();
                    return Deferred::pending(async move {
                        let mut value = future.await;
                        for listener in rest {
                            value = listener(value).resolve().await;
                        }
                        value
                    });
                }
            }
        }
        Deferred::Ready(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn as_i64(value: &Value) -> i64 {
        value.as_i64().unwrap()
    }

    #[test]
    fn test_fan_out_sync_is_ready() {
        let events = EventTriggers::new();
        events.on("E", |v| json!(as_i64(&v) + 1));
        events.on("E", |v| json!(as_i64(&v) * 10));

        let result = events.trigger("E", json!(2));
        assert!(result.is_ready());
        assert_eq!(tokio_test::block_on(result.resolve()), vec![json!(3), json!(20)]);
    }

    #[test]
    fn test_fan_out_without_listeners_is_empty() {
        let events = EventTriggers::new();
        let result = events.trigger("nothing", json!(null));
        assert!(matches!(result, Deferred::Ready(ref v) if v.is_empty()));
    }

    #[tokio::test]
    async fn test_fan_out_preserves_registration_order() {
        let events = EventTriggers::new();
        events.on_async("E", |v| async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            json!(format!("slow:{}", v))
        });
        events.on("E", |v| json!(format!("sync:{}", v)));
        events.on_async("E", |v| async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            json!(format!("fast:{}", v))
        });

        let result = events.trigger("E", json!(1));
        assert!(!result.is_ready());
        assert_eq!(
            result.resolve().await,
            vec![json!("slow:1"), json!("sync:1"), json!("fast:1")]
        );
    }

    #[test]
    fn test_overwrite_chains_values() {
        let events = EventTriggers::new();
        events.on("F", |v| json!(as_i64(&v) + 1));
        events.on("F", |v| json!(as_i64(&v) * 2));

        let result = events.overwrite_trigger("F", json!(5));
        assert!(matches!(result, Deferred::Ready(ref v) if *v == json!(12)));
    }

    #[test]
    fn test_overwrite_without_listeners_passes_through() {
        let events = EventTriggers::new();
        let result = events.overwrite_trigger("G", json!(7));
        assert_eq!(tokio_test::block_on(result.resolve()), json!(7));
    }

    #[tokio::test]
    async fn test_overwrite_waits_for_pending_step() {
        let events = EventTriggers::new();
        events.on("F", |v| json!(as_i64(&v) + 1));
        events.on_async("F", |v| async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            json!(as_i64(&v) * 2)
        });
        events.on("F", |v| json!(as_i64(&v) - 3));

        let result = events.overwrite_trigger("F", json!(5));
        assert!(!result.is_ready());
        assert_eq!(result.resolve().await, json!(9));
    }

    #[test]
    fn test_registration_during_dispatch_does_not_affect_current() {
        let events = Arc::new(EventTriggers::new());
        let inner = Arc::clone(&events);
        events.on("E", move |v| {
            inner.on("E", |_| json!("late"));
            v
        });

        let first = tokio_test::block_on(events.trigger("E", json!("x")).resolve());
        assert_eq!(first, vec![json!("x")]);
        assert_eq!(events.listener_count("E"), 2);
    }

    #[test]
    fn test_deferred_map() {
        let mapped = Deferred::ready(2).map(|v| v * 3);
        assert_eq!(mapped.into_ready().ok(), Some(6));
    }
}
