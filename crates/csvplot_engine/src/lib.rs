//! csvplot engine: backend loading, file acquisition and effect execution.
mod backend;
mod dataset;
mod decode;
mod engine;
mod export;
mod process;
mod types;

pub use backend::{load_backend, BackendLoader, ComputeBackend, InvocationError, LoadError};
pub use dataset::{read_dataset, DatasetText, ReadError};
pub use decode::{decode_text, DecodeError, DecodedText};
pub use engine::{EngineHandle, EngineSettings};
pub use export::{ensure_output_dir, save_png, AtomicFileWriter, ExportError};
pub use process::{ProcessBackend, ProcessLoader, ProcessSettings};
pub use types::{EngineEvent, RequestId, SelectionId};
