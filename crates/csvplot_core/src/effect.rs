use std::path::PathBuf;
use std::sync::Arc;

use crate::{RequestId, SelectionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load and start the computation backend. Emitted at most once per session.
    LoadBackend,
    ReadFile {
        selection_id: SelectionId,
        path: PathBuf,
    },
    InvokeBackend {
        request_id: RequestId,
        dataset: Arc<str>,
        options_json: String,
    },
    SaveImage {
        base64_image: String,
        file_name: String,
    },
}
