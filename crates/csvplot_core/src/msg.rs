use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Columns,
    Title,
    Size,
    MaxRange,
    Skip,
    Xscale,
}

/// How a backend invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The entry point returned a value.
    Completed(crate::PlotResult),
    /// The call itself failed (crash, spawn failure, unreadable output).
    InvocationFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Session start; triggers the one and only backend load.
    Startup,
    /// Backend instantiated and started.
    BackendReady,
    /// Backend failed to instantiate or start. Terminal for the session.
    BackendFailed { detail: String },
    /// User picked a file, or cleared the selection with `None`.
    FileSelected(Option<PathBuf>),
    /// File read finished for the given selection.
    FileLoaded {
        selection_id: crate::SelectionId,
        payload: crate::DatasetPayload,
    },
    /// File read failed for the given selection.
    FileLoadFailed {
        selection_id: crate::SelectionId,
        file_name: String,
        detail: String,
    },
    /// User edited a text field of the form.
    FieldEdited { field: FormField, value: String },
    /// User toggled the "first column is X data" checkbox.
    XdataToggled(bool),
    /// User clicked Generate.
    GenerateClicked,
    /// Backend invocation for `request_id` returned.
    GenerationFinished {
        request_id: crate::RequestId,
        outcome: GenerationOutcome,
    },
    /// User clicked Save on the rendered image.
    SaveClicked,
    /// Result of writing the image to disk.
    ImageSaved { result: Result<PathBuf, String> },
    /// Poll timeout in the driver loop; changes nothing.
    Tick,
}
