use std::sync::Arc;

use plot_logging::{plot_info, plot_warn};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("backend instantiation failed: {0}")]
    Instantiate(String),
    #[error("backend startup failed: {0}")]
    Start(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("computation backend is not loaded")]
    NotLoaded,
    #[error("computation backend crashed: {0}")]
    Crashed(String),
    #[error("{0}")]
    Failed(String),
    #[error("computation backend produced unreadable output: {0}")]
    InvalidOutput(String),
}

/// A loaded computation backend.
///
/// `invoke` is the single entry point: it takes the dataset text and the
/// serialized plot options and returns the raw response value. Interpreting
/// that value is up to the caller.
#[async_trait::async_trait]
pub trait ComputeBackend: Send + Sync {
    /// Secondary startup step run after instantiation.
    ///
    /// Backends that are usable straight after instantiation keep the default.
    async fn start(&self) -> Result<(), LoadError> {
        Ok(())
    }

    fn invoke(&self, dataset: &str, options_json: &str) -> Result<Value, InvocationError>;
}

#[async_trait::async_trait]
pub trait BackendLoader: Send + Sync {
    async fn instantiate(&self) -> Result<Arc<dyn ComputeBackend>, LoadError>;
}

/// Runs both loading stages. The backend is only returned once `start` has
/// succeeded too.
pub async fn load_backend(
    loader: &dyn BackendLoader,
) -> Result<Arc<dyn ComputeBackend>, LoadError> {
    let backend = loader.instantiate().await.inspect_err(|err| {
        plot_warn!("Backend instantiation failed: {}", err);
    })?;
    backend.start().await.inspect_err(|err| {
        plot_warn!("Backend startup failed after instantiation: {}", err);
    })?;
    plot_info!("Computation backend ready");
    Ok(backend)
}
