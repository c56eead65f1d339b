use std::path::PathBuf;

use serde_json::Value;

use crate::{DatasetText, ExportError, InvocationError, LoadError, ReadError};

pub type SelectionId = u64;
pub type RequestId = u64;

#[derive(Debug)]
pub enum EngineEvent {
    /// Both loading stages finished, or one of them failed.
    BackendLoaded(Result<(), LoadError>),
    FileRead {
        selection_id: SelectionId,
        file_name: String,
        result: Result<DatasetText, ReadError>,
    },
    InvocationCompleted {
        request_id: RequestId,
        result: Result<Value, InvocationError>,
    },
    ImageSaved(Result<PathBuf, ExportError>),
}
