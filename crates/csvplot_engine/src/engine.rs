use std::any::Any;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, OnceLock};
use std::thread;
use std::time::Duration;

use plot_logging::{enter_request, plot_debug, plot_error, plot_info, plot_warn};
use serde_json::Value;
use tokio::runtime::Runtime;

use crate::{
    load_backend, read_dataset, save_png, BackendLoader, ComputeBackend, EngineEvent,
    InvocationError, RequestId, SelectionId,
};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Directory saved images are written to.
    pub output_dir: PathBuf,
    /// Files larger than this are refused instead of read into memory.
    pub max_dataset_bytes: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            max_dataset_bytes: 256 * 1024 * 1024,
        }
    }
}

enum EngineCommand {
    LoadBackend,
    ReadFile {
        selection_id: SelectionId,
        path: PathBuf,
    },
    Invoke {
        request_id: RequestId,
        dataset: Arc<str>,
        options_json: String,
    },
    SaveImage {
        base64_image: String,
        file_name: String,
    },
}

type BackendSlot = Arc<OnceLock<Arc<dyn ComputeBackend>>>;

pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(loader: Arc<dyn BackendLoader>, settings: EngineSettings) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = Runtime::new()?;

        thread::spawn(move || {
            let worker = Worker {
                loader,
                settings,
                backend: Arc::new(OnceLock::new()),
                load_started: false,
                event_tx,
            };
            worker.run(&runtime, cmd_rx);
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn load_backend(&self) {
        self.send(EngineCommand::LoadBackend);
    }

    pub fn read_file(&self, selection_id: SelectionId, path: impl Into<PathBuf>) {
        self.send(EngineCommand::ReadFile {
            selection_id,
            path: path.into(),
        });
    }

    pub fn invoke(&self, request_id: RequestId, dataset: Arc<str>, options_json: impl Into<String>) {
        self.send(EngineCommand::Invoke {
            request_id,
            dataset,
            options_json: options_json.into(),
        });
    }

    pub fn save_image(&self, base64_image: impl Into<String>, file_name: impl Into<String>) {
        self.send(EngineCommand::SaveImage {
            base64_image: base64_image.into(),
            file_name: file_name.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            plot_error!("Engine worker is gone; command dropped");
        }
    }
}

struct Worker {
    loader: Arc<dyn BackendLoader>,
    settings: EngineSettings,
    backend: BackendSlot,
    load_started: bool,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl Worker {
    fn run(mut self, runtime: &Runtime, cmd_rx: mpsc::Receiver<EngineCommand>) {
        while let Ok(command) = cmd_rx.recv() {
            self.dispatch(runtime, command);
        }
        plot_debug!("Engine command channel closed");
    }

    fn dispatch(&mut self, runtime: &Runtime, command: EngineCommand) {
        let event_tx = self.event_tx.clone();
        match command {
            EngineCommand::LoadBackend => {
                if self.load_started {
                    plot_warn!("Backend load requested twice; ignoring");
                    return;
                }
                self.load_started = true;
                let loader = self.loader.clone();
                let slot = self.backend.clone();
                runtime.spawn(async move {
                    let result = load_backend(loader.as_ref()).await.map(|backend| {
                        let _ = slot.set(backend);
                    });
                    let _ = event_tx.send(EngineEvent::BackendLoaded(result));
                });
            }
            EngineCommand::ReadFile { selection_id, path } => {
                let max_bytes = self.settings.max_dataset_bytes;
                runtime.spawn(async move {
                    let file_name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    let result = read_dataset(&path, max_bytes).await;
                    if let Err(err) = &result {
                        plot_warn!("Reading {:?} failed: {}", path, err);
                    }
                    let _ = event_tx.send(EngineEvent::FileRead {
                        selection_id,
                        file_name,
                        result,
                    });
                });
            }
            EngineCommand::Invoke {
                request_id,
                dataset,
                options_json,
            } => {
                let backend = self.backend.get().cloned();
                runtime.spawn(async move {
                    plot_info!(
                        "Invoking backend request_id={} dataset_len={} options={}",
                        request_id,
                        dataset.len(),
                        options_json
                    );
                    let result = invoke(backend, request_id, dataset, options_json).await;
                    if let Err(err) = &result {
                        plot_warn!("Request {} failed: {}", request_id, err);
                    }
                    let _ = event_tx.send(EngineEvent::InvocationCompleted { request_id, result });
                });
            }
            EngineCommand::SaveImage {
                base64_image,
                file_name,
            } => {
                let output_dir = self.settings.output_dir.clone();
                runtime.spawn_blocking(move || {
                    let result = save_png(&output_dir, &file_name, &base64_image);
                    let _ = event_tx.send(EngineEvent::ImageSaved(result));
                });
            }
        }
    }
}

/// Runs the synchronous entry point on the blocking pool.
async fn invoke(
    backend: Option<Arc<dyn ComputeBackend>>,
    request_id: RequestId,
    dataset: Arc<str>,
    options_json: String,
) -> Result<Value, InvocationError> {
    let backend = backend.ok_or(InvocationError::NotLoaded)?;
    tokio::task::spawn_blocking(move || {
        let _request = enter_request(request_id);
        backend.invoke(&dataset, &options_json)
    })
    .await
    .map_err(|err| {
        if err.is_panic() {
            InvocationError::Crashed(panic_message(err.into_panic()))
        } else {
            InvocationError::Crashed(err.to_string())
        }
    })?
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
