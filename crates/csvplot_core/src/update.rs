use crate::view_model::MessageKind;
use crate::{
    build_request, AppState, BackendStatus, Effect, GenerationOutcome, Msg, PlotResult,
};

const GATE_CLOSED: &str = "The computation backend is not ready or no CSV file is selected.";
const CONTRACT_VIOLATION: &str =
    "Unexpected error: the backend response is invalid (neither an image nor an error).";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Startup => {
            if state.request_startup() {
                vec![Effect::LoadBackend]
            } else {
                Vec::new()
            }
        }
        Msg::BackendReady => {
            state.backend_ready();
            Vec::new()
        }
        Msg::BackendFailed { detail } => {
            state.backend_failed(detail);
            Vec::new()
        }
        Msg::FileSelected(path) => {
            let selection = state.begin_selection(path.as_deref());
            match (selection, path) {
                (Some(selection_id), Some(path)) => vec![Effect::ReadFile { selection_id, path }],
                _ => Vec::new(),
            }
        }
        Msg::FileLoaded {
            selection_id,
            payload,
        } => {
            state.apply_file_loaded(selection_id, payload);
            Vec::new()
        }
        Msg::FileLoadFailed {
            selection_id,
            file_name,
            detail,
        } => {
            state.apply_file_failed(selection_id, &file_name, &detail);
            Vec::new()
        }
        Msg::FieldEdited { field, value } => {
            state.set_field(field, value);
            Vec::new()
        }
        Msg::XdataToggled(xdata) => {
            state.set_xdata(xdata);
            Vec::new()
        }
        Msg::GenerateClicked => generate(&mut state),
        Msg::GenerationFinished {
            request_id,
            outcome,
        } => {
            if state.finish_generation(request_id) {
                apply_outcome(&mut state, outcome);
            }
            Vec::new()
        }
        Msg::SaveClicked => match state.image() {
            Some(image) if !state.is_generating() => vec![Effect::SaveImage {
                base64_image: image.to_string(),
                file_name: state.export_file_name(),
            }],
            _ => Vec::new(),
        },
        Msg::ImageSaved { result } => {
            match result {
                Ok(path) => state.set_saved(path),
                Err(detail) => state.show_message(
                    MessageKind::Export,
                    format!("Error: failed to save image ({detail})"),
                ),
            }
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn generate(state: &mut AppState) -> Vec<Effect> {
    // The trigger is disabled while a request is in flight.
    if state.is_generating() {
        return Vec::new();
    }
    if !state.gate_open() {
        if matches!(state.backend(), BackendStatus::Failed { .. }) {
            state.show_lifecycle_failure();
        } else {
            state.show_message(MessageKind::Gate, GATE_CLOSED);
        }
        return Vec::new();
    }

    let request = match build_request(state.form(), state.policy()) {
        Ok(request) => request,
        Err(err) => {
            state.show_message(MessageKind::Validation, format!("Error: {err}."));
            return Vec::new();
        }
    };
    let options_json = match request.to_options_json() {
        Ok(json) => json,
        Err(err) => {
            state.show_message(
                MessageKind::Invocation,
                format!("Runtime error: could not encode plot options: {err}"),
            );
            return Vec::new();
        }
    };
    let Some(dataset) = state.payload().map(|p| p.text.clone()) else {
        return Vec::new();
    };

    let request_id = state.start_generation();
    vec![Effect::InvokeBackend {
        request_id,
        dataset,
        options_json,
    }]
}

fn apply_outcome(state: &mut AppState, outcome: GenerationOutcome) {
    match outcome {
        GenerationOutcome::Completed(PlotResult::Image { base64_image }) => {
            state.set_image(base64_image);
        }
        GenerationOutcome::Completed(PlotResult::BackendError { message }) => {
            state.show_message(MessageKind::Domain, message);
        }
        GenerationOutcome::Completed(PlotResult::Malformed { .. }) => {
            state.show_message(MessageKind::ContractViolation, CONTRACT_VIOLATION);
        }
        GenerationOutcome::InvocationFailed(detail) => {
            state.show_message(MessageKind::Invocation, format!("Runtime error: {detail}"));
        }
    }
}
