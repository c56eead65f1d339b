use std::sync::Arc;
use std::time::Duration;

use csvplot_core::{DatasetPayload, Effect, GenerationOutcome, Msg, PlotResult};
use csvplot_engine::{BackendLoader, EngineEvent, EngineHandle, EngineSettings};
use plot_logging::{plot_debug, plot_info, plot_warn};

/// Hands core effects to the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(loader: Arc<dyn BackendLoader>, settings: EngineSettings) -> std::io::Result<Self> {
        let engine = EngineHandle::new(loader, settings)?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadBackend => {
                    plot_info!("LoadBackend");
                    self.engine.load_backend();
                }
                Effect::ReadFile { selection_id, path } => {
                    plot_info!("ReadFile selection_id={} path={:?}", selection_id, path);
                    self.engine.read_file(selection_id, path);
                }
                Effect::InvokeBackend {
                    request_id,
                    dataset,
                    options_json,
                } => {
                    plot_debug!("InvokeBackend request_id={}", request_id);
                    self.engine.invoke(request_id, dataset, options_json);
                }
                Effect::SaveImage {
                    base64_image,
                    file_name,
                } => {
                    plot_info!("SaveImage file_name={}", file_name);
                    self.engine.save_image(base64_image, file_name);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::BackendLoaded(Ok(())) => Msg::BackendReady,
        EngineEvent::BackendLoaded(Err(err)) => Msg::BackendFailed {
            detail: err.to_string(),
        },
        EngineEvent::FileRead {
            selection_id,
            file_name,
            result,
        } => match result {
            Ok(text) => Msg::FileLoaded {
                selection_id,
                payload: DatasetPayload {
                    file_name,
                    text: Arc::from(text.text),
                    encoding: text.encoding,
                },
            },
            Err(err) => Msg::FileLoadFailed {
                selection_id,
                file_name,
                detail: err.to_string(),
            },
        },
        EngineEvent::InvocationCompleted { request_id, result } => {
            let outcome = match result {
                Ok(value) => {
                    let result = PlotResult::from_response(&value);
                    if let PlotResult::Malformed { raw } = &result {
                        plot_warn!("Request {} returned an unrecognized response: {}", request_id, raw);
                    }
                    GenerationOutcome::Completed(result)
                }
                Err(err) => GenerationOutcome::InvocationFailed(err.to_string()),
            };
            Msg::GenerationFinished {
                request_id,
                outcome,
            }
        }
        EngineEvent::ImageSaved(result) => Msg::ImageSaved {
            result: result.map_err(|err| err.to_string()),
        },
    }
}
