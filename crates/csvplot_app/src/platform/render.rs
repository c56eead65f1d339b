use csvplot_core::{AppViewModel, BackendStatus, MessageKind};

/// Renders the view model as log-friendly lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let backend = match &view.backend {
        BackendStatus::Loading => "loading",
        BackendStatus::Ready => "ready",
        BackendStatus::Failed { .. } => "failed",
    };
    let dataset = match (&view.reading_file, &view.dataset_name) {
        (Some(reading), _) => format!("reading {reading}"),
        (None, Some(name)) => name.clone(),
        (None, None) => "none".to_string(),
    };
    let trigger = if view.generating {
        "generating"
    } else if view.generate_enabled {
        "enabled"
    } else {
        "disabled"
    };

    let mut lines = vec![format!(
        "Backend: {backend} | File: {dataset} | Generate: {trigger}"
    )];
    if !view.status.is_empty() {
        lines.push(format!("Status: {}", view.status));
    }
    if let Some(message) = &view.message {
        lines.push(format!("{}: {}", kind_label(message.kind), message.text));
    }
    if let Some(uri) = &view.image_uri {
        lines.push(format!("Image: data URI, {} bytes", uri.len()));
    }
    lines
}

fn kind_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Lifecycle => "Backend error",
        MessageKind::Input => "Input error",
        MessageKind::Validation => "Validation error",
        MessageKind::Domain => "Plot error",
        MessageKind::ContractViolation => "Contract violation",
        MessageKind::Invocation => "Invocation error",
        MessageKind::Gate => "Not ready",
        MessageKind::Export => "Save error",
    }
}
