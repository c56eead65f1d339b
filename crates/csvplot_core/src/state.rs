use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::view_model::{AppViewModel, MessageKind, UserMessage};
use crate::{image_data_uri, FormField, FormFields, RequestPolicy};

pub type SelectionId = u64;
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Loading,
    Ready,
    Failed {
        detail: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Generating {
        request_id: RequestId,
    },
}

/// Text content of the currently selected input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPayload {
    pub file_name: String,
    pub text: Arc<str>,
    pub encoding: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingRead {
    selection_id: SelectionId,
    file_name: String,
}

/// Session context: everything the orchestrator needs, owned in one place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    policy: RequestPolicy,
    backend: BackendStatus,
    startup_requested: bool,
    payload: Option<DatasetPayload>,
    latest_selection: SelectionId,
    pending_read: Option<PendingRead>,
    form: FormFields,
    phase: Phase,
    last_request_id: RequestId,
    image: Option<String>,
    saved_path: Option<PathBuf>,
    status: String,
    message: Option<UserMessage>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RequestPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            backend: self.backend.clone(),
            dataset_name: self.payload.as_ref().map(|p| p.file_name.clone()),
            reading_file: self.pending_read.as_ref().map(|r| r.file_name.clone()),
            generating: self.is_generating(),
            generate_enabled: self.gate_open(),
            save_enabled: self.image.is_some() && !self.is_generating(),
            image_uri: self.image.as_deref().map(image_data_uri),
            saved_path: self.saved_path.clone(),
            status: self.status.clone(),
            message: self.message.clone(),
            form: self.form.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn policy(&self) -> &RequestPolicy {
        &self.policy
    }

    pub fn form(&self) -> &FormFields {
        &self.form
    }

    pub fn backend(&self) -> &BackendStatus {
        &self.backend
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn payload(&self) -> Option<&DatasetPayload> {
        self.payload.as_ref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.phase, Phase::Generating { .. })
    }

    /// Generate is allowed iff the backend is ready, a dataset is loaded and
    /// nothing is in flight.
    pub fn gate_open(&self) -> bool {
        self.backend == BackendStatus::Ready && self.payload.is_some() && !self.is_generating()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns true only for the first call in a session.
    pub(crate) fn request_startup(&mut self) -> bool {
        if self.startup_requested {
            return false;
        }
        self.startup_requested = true;
        self.status = "Initializing computation backend...".to_string();
        self.mark_dirty();
        true
    }

    pub(crate) fn backend_ready(&mut self) {
        if self.backend != BackendStatus::Loading {
            return;
        }
        self.backend = BackendStatus::Ready;
        self.status = if self.payload.is_some() {
            "Ready.".to_string()
        } else {
            "Ready. Select a CSV file.".to_string()
        };
        self.mark_dirty();
    }

    pub(crate) fn backend_failed(&mut self, detail: String) {
        if matches!(self.backend, BackendStatus::Failed { .. }) {
            return;
        }
        self.backend = BackendStatus::Failed { detail };
        self.show_lifecycle_failure();
    }

    /// Puts the session-fatal backend failure back in front of the user.
    pub(crate) fn show_lifecycle_failure(&mut self) {
        let BackendStatus::Failed { detail } = &self.backend else {
            return;
        };
        let text = format!("Error: failed to initialize the computation backend ({detail})");
        self.show_message(MessageKind::Lifecycle, text);
        self.status = "Backend initialization failed.".to_string();
    }

    /// Starts a new selection, invalidating any read still in flight.
    pub(crate) fn begin_selection(&mut self, path: Option<&Path>) -> Option<SelectionId> {
        self.latest_selection += 1;
        self.payload = None;
        self.mark_dirty();
        let Some(path) = path else {
            self.pending_read = None;
            self.status = "No file selected.".to_string();
            return None;
        };
        let file_name = display_name(path);
        self.status = format!("Reading \"{file_name}\"...");
        self.pending_read = Some(PendingRead {
            selection_id: self.latest_selection,
            file_name,
        });
        Some(self.latest_selection)
    }

    fn is_current_read(&self, selection_id: SelectionId) -> bool {
        self.pending_read
            .as_ref()
            .is_some_and(|r| r.selection_id == selection_id)
    }

    pub(crate) fn apply_file_loaded(&mut self, selection_id: SelectionId, payload: DatasetPayload) {
        if !self.is_current_read(selection_id) {
            return;
        }
        self.pending_read = None;
        self.status = format!("Loaded file \"{}\".", payload.file_name);
        self.payload = Some(payload);
        if !self.has_message(MessageKind::Lifecycle) {
            self.message = None;
        }
        self.mark_dirty();
    }

    pub(crate) fn apply_file_failed(&mut self, selection_id: SelectionId, file_name: &str, detail: &str) {
        if !self.is_current_read(selection_id) {
            return;
        }
        self.pending_read = None;
        self.payload = None;
        self.show_message(
            MessageKind::Input,
            format!("Error: failed to read file \"{file_name}\" ({detail})"),
        );
    }

    pub(crate) fn set_field(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::Columns => &mut self.form.columns,
            FormField::Title => &mut self.form.title,
            FormField::Size => &mut self.form.size,
            FormField::MaxRange => &mut self.form.max_range,
            FormField::Skip => &mut self.form.skip,
            FormField::Xscale => &mut self.form.xscale,
        };
        if *slot != value {
            *slot = value;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_xdata(&mut self, xdata: bool) {
        if self.form.xdata != xdata {
            self.form.xdata = xdata;
            self.mark_dirty();
        }
    }

    pub(crate) fn has_message(&self, kind: MessageKind) -> bool {
        self.message.as_ref().is_some_and(|m| m.kind == kind)
    }

    pub(crate) fn show_message(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.message = Some(UserMessage::new(kind, text));
        self.status.clear();
        self.mark_dirty();
    }

    /// Enters `Generating` and returns the id of the new request.
    pub(crate) fn start_generation(&mut self) -> RequestId {
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.phase = Phase::Generating { request_id };
        self.image = None;
        self.saved_path = None;
        self.message = None;
        self.status = "Generating plot...".to_string();
        self.mark_dirty();
        request_id
    }

    /// Leaves `Generating` if `request_id` is the request in flight.
    pub(crate) fn finish_generation(&mut self, request_id: RequestId) -> bool {
        if self.phase != (Phase::Generating { request_id }) {
            return false;
        }
        self.phase = Phase::Idle;
        self.mark_dirty();
        true
    }

    pub(crate) fn set_image(&mut self, base64_image: String) {
        self.image = Some(base64_image);
        self.status = "Plot generated.".to_string();
        self.mark_dirty();
    }

    /// File name offered when saving the current image.
    pub(crate) fn export_file_name(&self) -> String {
        self.payload
            .as_ref()
            .and_then(|p| Path::new(&p.file_name).file_stem())
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(|stem| format!("{stem}.png"))
            .unwrap_or_else(|| "plot.png".to_string())
    }

    pub(crate) fn set_saved(&mut self, path: PathBuf) {
        self.status = format!("Saved plot to {}.", path.display());
        self.saved_path = Some(path);
        self.mark_dirty();
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
