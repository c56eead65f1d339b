#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;

use csvplot_core::{update, AppState, DatasetPayload, Effect, FormField, Msg, RequestId};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(plot_logging::initialize_for_tests);
}

pub fn payload(file_name: &str, text: &str) -> DatasetPayload {
    DatasetPayload {
        file_name: file_name.to_string(),
        text: text.into(),
        encoding: "UTF-8".to_string(),
    }
}

/// Selects a file and completes its read with `text`.
pub fn load_file(state: AppState, file_name: &str, text: &str) -> AppState {
    let (state, effects) = update(state, Msg::FileSelected(Some(PathBuf::from(file_name))));
    let selection_id = match effects.as_slice() {
        [Effect::ReadFile { selection_id, .. }] => *selection_id,
        other => panic!("expected a single ReadFile effect, got {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::FileLoaded {
            selection_id,
            payload: payload(file_name, text),
        },
    );
    state
}

pub fn edit(state: AppState, field: FormField, value: &str) -> AppState {
    update(
        state,
        Msg::FieldEdited {
            field,
            value: value.to_string(),
        },
    )
    .0
}

/// A session with a ready backend and `data.csv` loaded.
pub fn ready_session() -> AppState {
    let (state, _) = update(AppState::new(), Msg::Startup);
    let (state, _) = update(state, Msg::BackendReady);
    load_file(state, "data.csv", "x,y\n1,2\n")
}

/// Clicks Generate and returns the request id and options JSON of the invocation.
pub fn click_generate(state: AppState) -> (AppState, RequestId, serde_json::Value) {
    let (state, effects) = update(state, Msg::GenerateClicked);
    match effects.as_slice() {
        [Effect::InvokeBackend {
            request_id,
            options_json,
            ..
        }] => {
            let options = serde_json::from_str(options_json).expect("options json");
            (state, *request_id, options)
        }
        other => panic!("expected a single InvokeBackend effect, got {other:?}"),
    }
}
