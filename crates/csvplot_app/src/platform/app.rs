use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use csvplot_core::{
    update, AppState, AppViewModel, BackendStatus, FormField, FormFields, MessageKind, Msg,
    RequestPolicy, UserMessage,
};
use csvplot_engine::{BackendLoader, EngineSettings, ProcessLoader};
use log::LevelFilter;
use plot_logging::{plot_debug, plot_info};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::logging;
use super::render::render;
use crate::cli::Cli;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let (mut config, source) = AppConfig::load(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);

    let level = if config.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(config.log, level);
    match &source {
        Some(path) => plot_info!("Loaded configuration from {:?}", path),
        None => plot_info!("No configuration file; using defaults"),
    }

    let loader = Arc::new(ProcessLoader::new(config.process_settings()));
    let mut app = App::new(config.policy.clone(), loader, config.engine_settings())
        .context("starting engine")?;

    match app.run_job(&PlotJob::from_cli(&cli)) {
        RunOutcome::Saved(path) => println!("{}", path.display()),
        RunOutcome::Rendered { data_uri } => println!("{data_uri}"),
        RunOutcome::Failed(message) => anyhow::bail!(message.text),
    }
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(program) = &cli.backend {
        config.backend.program = program.clone();
        config.backend.args.clear();
    }
    config.backend.args.extend(cli.backend_args.iter().cloned());
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(log) = cli.log {
        config.log = log;
    }
}

/// One plot to produce: the file plus the form as the user filled it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotJob {
    pub file: PathBuf,
    pub form: FormFields,
    /// Save the image instead of returning its data URI.
    pub save: bool,
}

impl PlotJob {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            file: cli.file.clone(),
            form: FormFields {
                columns: cli.columns.clone(),
                title: cli.title.clone(),
                size: cli.size.clone(),
                max_range: cli.max_range.clone(),
                skip: cli.skip.clone(),
                xdata: cli.xdata,
                xscale: cli.xscale.clone(),
            },
            save: !cli.print_uri,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Saved(PathBuf),
    Rendered { data_uri: String },
    Failed(UserMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobStage {
    AwaitingGate,
    Generating,
    Saving,
}

pub struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    pub fn new(
        policy: RequestPolicy,
        loader: Arc<dyn BackendLoader>,
        settings: EngineSettings,
    ) -> std::io::Result<Self> {
        Ok(Self {
            state: AppState::with_policy(policy),
            runner: EffectRunner::new(loader, settings)?,
        })
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            for line in render(&state.view()) {
                plot_info!("{}", line);
            }
        }
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Drives the session like a user would: fill the form, pick the file,
    /// press Generate once the gate opens, then save. Blocks until the cycle ends.
    pub fn run_job(&mut self, job: &PlotJob) -> RunOutcome {
        self.dispatch(Msg::Startup);
        self.fill_form(&job.form);
        self.dispatch(Msg::FileSelected(Some(job.file.clone())));

        let mut stage = JobStage::AwaitingGate;
        loop {
            let view = self.view();
            match stage {
                JobStage::AwaitingGate => {
                    if let Some(message) = blocking_failure(&view) {
                        return RunOutcome::Failed(message);
                    }
                    if view.generate_enabled {
                        self.dispatch(Msg::GenerateClicked);
                        stage = JobStage::Generating;
                        continue;
                    }
                }
                JobStage::Generating if !view.generating => match view.image_uri {
                    Some(_) if job.save => {
                        self.dispatch(Msg::SaveClicked);
                        stage = JobStage::Saving;
                        continue;
                    }
                    Some(data_uri) => return RunOutcome::Rendered { data_uri },
                    None => return RunOutcome::Failed(failure_message(view.message)),
                },
                JobStage::Generating => {}
                JobStage::Saving => {
                    if let Some(path) = view.saved_path {
                        return RunOutcome::Saved(path);
                    }
                    if let Some(message) = view.message.filter(|m| m.kind == MessageKind::Export) {
                        return RunOutcome::Failed(message);
                    }
                }
            }

            match self.runner.next_msg(POLL_INTERVAL) {
                Some(msg) => self.dispatch(msg),
                None => {
                    plot_debug!("Waiting in stage {:?}", stage);
                    self.dispatch(Msg::Tick);
                }
            }
        }
    }

    fn fill_form(&mut self, form: &FormFields) {
        let fields = [
            (FormField::Columns, &form.columns),
            (FormField::Title, &form.title),
            (FormField::Size, &form.size),
            (FormField::MaxRange, &form.max_range),
            (FormField::Skip, &form.skip),
            (FormField::Xscale, &form.xscale),
        ];
        for (field, value) in fields {
            self.dispatch(Msg::FieldEdited {
                field,
                value: value.clone(),
            });
        }
        self.dispatch(Msg::XdataToggled(form.xdata));
    }
}

/// Failures that keep the gate closed for good in a one-shot run.
fn blocking_failure(view: &AppViewModel) -> Option<UserMessage> {
    if matches!(view.backend, BackendStatus::Failed { .. }) {
        return view.message.clone();
    }
    let input_failed = view.reading_file.is_none() && view.dataset_name.is_none();
    view.message
        .clone()
        .filter(|m| input_failed && m.kind == MessageKind::Input)
}

fn failure_message(message: Option<UserMessage>) -> UserMessage {
    message.unwrap_or_else(|| {
        UserMessage::new(MessageKind::ContractViolation, "plot generation produced no result")
    })
}
