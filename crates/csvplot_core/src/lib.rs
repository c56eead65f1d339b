//! csvplot core: pure plot-request state machine and view-model helpers.
mod effect;
mod msg;
mod request;
mod result;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{FormField, GenerationOutcome, Msg};
pub use request::{
    build_request, FormFields, MaxRangePolicy, PlotRequest, RequestPolicy, SkipPolicy,
    ValidationError, DEFAULT_SIZE, DEFAULT_TITLE,
};
pub use result::{image_data_uri, PlotResult};
pub use state::{AppState, BackendStatus, DatasetPayload, Phase, RequestId, SelectionId};
pub use update::update;
pub use view_model::{AppViewModel, MessageKind, UserMessage};
