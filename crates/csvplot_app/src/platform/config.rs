use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use csvplot_core::RequestPolicy;
use csvplot_engine::{EngineSettings, ProcessSettings};
use serde::Deserialize;

use super::logging::LogDestination;

const DEFAULT_CONFIG_FILE: &str = "csvplot.ron";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub probe_args: Option<Vec<String>>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("csvplot-backend"),
            args: Vec::new(),
            probe_args: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub policy: RequestPolicy,
    pub output_dir: PathBuf,
    pub max_dataset_bytes: u64,
    pub log: LogDestination,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let engine = EngineSettings::default();
        Self {
            backend: BackendConfig::default(),
            policy: RequestPolicy::default(),
            output_dir: engine.output_dir,
            max_dataset_bytes: engine.max_dataset_bytes,
            log: LogDestination::default(),
            verbose: false,
        }
    }
}

impl AppConfig {
    /// Loads `path`, or `./csvplot.ron` when no path is given and the file exists.
    /// Returns the file the configuration came from, if any.
    pub fn load(path: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok((Self::default(), None));
                }
                default
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok((config, Some(path)))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn process_settings(&self) -> ProcessSettings {
        ProcessSettings {
            program: self.backend.program.clone(),
            args: self.backend.args.clone(),
            probe_args: self.backend.probe_args.clone(),
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            output_dir: self.output_dir.clone(),
            max_dataset_bytes: self.max_dataset_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvplot_core::{MaxRangePolicy, SkipPolicy};

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(AppConfig::parse("()").unwrap(), AppConfig::default());
    }

    #[test]
    fn full_config_parses() {
        let config = AppConfig::parse(
            r#"(
                backend: (program: "/opt/plot/backend", args: ["--png"], probe_args: Some(["--version"])),
                policy: (max_range: ZeroWhenUnparsable, skip: DefaultThenReject, default_size: "640x480"),
                output_dir: "plots",
                log: Both,
            )"#,
        )
        .unwrap();
        assert_eq!(config.backend.program, PathBuf::from("/opt/plot/backend"));
        assert_eq!(config.backend.args, vec!["--png".to_string()]);
        assert_eq!(config.backend.probe_args, Some(vec!["--version".to_string()]));
        assert_eq!(config.policy.max_range, MaxRangePolicy::ZeroWhenUnparsable);
        assert_eq!(config.policy.skip, SkipPolicy::DefaultThenReject);
        assert_eq!(config.policy.default_size, "640x480");
        assert_eq!(config.output_dir, PathBuf::from("plots"));
        assert_eq!(config.log, LogDestination::Both);
    }

    #[test]
    fn load_reports_the_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.ron");
        fs::write(&path, "(verbose: true)").unwrap();

        let (config, source) = AppConfig::load(Some(&path)).unwrap();
        assert!(config.verbose);
        assert_eq!(source, Some(path));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(AppConfig::parse("(policy: (skip: Sometimes))").is_err());
    }
}
