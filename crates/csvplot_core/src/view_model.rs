use std::path::PathBuf;

use crate::{BackendStatus, FormFields};

/// Category of a user-visible message. Categories are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Backend failed to load or start.
    Lifecycle,
    /// Selected file could not be read.
    Input,
    /// Request rejected locally; backend not contacted.
    Validation,
    /// Backend returned an explicit error.
    Domain,
    /// Backend returned neither an image nor an error.
    ContractViolation,
    /// Calling the backend failed.
    Invocation,
    /// Generate pressed while the backend or dataset was missing.
    Gate,
    /// Saving the image failed.
    Export,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl UserMessage {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub backend: BackendStatus,
    pub dataset_name: Option<String>,
    pub reading_file: Option<String>,
    pub generating: bool,
    pub generate_enabled: bool,
    pub save_enabled: bool,
    /// `data:image/png;base64,...` reference for the display surface.
    pub image_uri: Option<String>,
    pub saved_path: Option<PathBuf>,
    pub status: String,
    pub message: Option<UserMessage>,
    pub form: FormFields,
    pub dirty: bool,
}
