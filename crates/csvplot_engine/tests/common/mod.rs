#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use csvplot_engine::{BackendLoader, ComputeBackend, EngineEvent, EngineHandle, InvocationError, LoadError};
use serde_json::Value;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(plot_logging::initialize_for_tests);
}

pub type Reply = fn(&str, &str) -> Result<Value, InvocationError>;

/// In-process backend whose stages and entry point are scripted by the test.
pub struct FakeLoader {
    pub instantiate_calls: AtomicUsize,
    instantiate: Result<(), String>,
    start: Result<(), String>,
    reply: Reply,
}

impl FakeLoader {
    pub fn ok(reply: Reply) -> Self {
        Self {
            instantiate_calls: AtomicUsize::new(0),
            instantiate: Ok(()),
            start: Ok(()),
            reply,
        }
    }

    pub fn failing_instantiate(message: &str) -> Self {
        Self {
            instantiate: Err(message.to_string()),
            ..Self::ok(echo)
        }
    }

    pub fn failing_start(message: &str) -> Self {
        Self {
            start: Err(message.to_string()),
            ..Self::ok(echo)
        }
    }

    pub fn calls(&self) -> usize {
        self.instantiate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BackendLoader for FakeLoader {
    async fn instantiate(&self) -> Result<Arc<dyn ComputeBackend>, LoadError> {
        self.instantiate_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.instantiate.clone().map_err(LoadError::Instantiate)?;
        Ok(Arc::new(FakeBackend {
            start: self.start.clone(),
            reply: self.reply,
        }))
    }
}

struct FakeBackend {
    start: Result<(), String>,
    reply: Reply,
}

#[async_trait::async_trait]
impl ComputeBackend for FakeBackend {
    async fn start(&self) -> Result<(), LoadError> {
        self.start.clone().map_err(LoadError::Start)
    }

    fn invoke(&self, dataset: &str, options_json: &str) -> Result<Value, InvocationError> {
        (self.reply)(dataset, options_json)
    }
}

/// Replies with the inputs it was given.
pub fn echo(dataset: &str, options_json: &str) -> Result<Value, InvocationError> {
    Ok(serde_json::json!({
        "dataset": dataset,
        "options": serde_json::from_str::<Value>(options_json).unwrap_or(Value::Null),
    }))
}

pub fn next_event(engine: &EngineHandle) -> EngineEvent {
    engine
        .recv_timeout(Duration::from_secs(10))
        .expect("engine event within timeout")
}
