//! Computation backend hosted in an external executable.
//!
//! The program receives the dataset on stdin and the options JSON as its last
//! argument, and prints the response object to stdout.

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use plot_logging::{plot_debug, plot_info};
use serde_json::Value;

use crate::{BackendLoader, ComputeBackend, InvocationError, LoadError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSettings {
    /// Executable path, or a bare name looked up on `PATH`.
    pub program: PathBuf,
    /// Arguments placed before the options JSON.
    pub args: Vec<String>,
    /// When set, the backend runs `program probe_args...` once at startup and
    /// must exit successfully to become ready.
    pub probe_args: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct ProcessLoader {
    settings: ProcessSettings,
}

impl ProcessLoader {
    pub fn new(settings: ProcessSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl BackendLoader for ProcessLoader {
    async fn instantiate(&self) -> Result<Arc<dyn ComputeBackend>, LoadError> {
        let search_path = std::env::var_os("PATH");
        let exe = resolve_program(&self.settings.program, search_path.as_deref())?;
        plot_info!("Resolved backend program to {:?}", exe);
        Ok(Arc::new(ProcessBackend {
            exe,
            settings: self.settings.clone(),
        }))
    }
}

#[derive(Debug, Clone)]
pub struct ProcessBackend {
    exe: PathBuf,
    settings: ProcessSettings,
}

impl ProcessBackend {
    pub fn exe(&self) -> &Path {
        &self.exe
    }
}

#[async_trait::async_trait]
impl ComputeBackend for ProcessBackend {
    async fn start(&self) -> Result<(), LoadError> {
        let Some(probe_args) = &self.settings.probe_args else {
            return Ok(());
        };
        let output = tokio::process::Command::new(&self.exe)
            .args(probe_args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| LoadError::Start(format!("failed to run probe: {err}")))?;
        if !output.status.success() {
            return Err(LoadError::Start(format!(
                "probe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        plot_debug!("Backend probe succeeded");
        Ok(())
    }

    fn invoke(&self, dataset: &str, options_json: &str) -> Result<Value, InvocationError> {
        let mut child = Command::new(&self.exe)
            .args(&self.settings.args)
            .arg(options_json)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| InvocationError::Failed(format!("failed to start backend: {err}")))?;

        let stdin = child.stdin.take();
        // Feed stdin from a second thread so a chatty backend cannot deadlock on a full stdout pipe.
        let output = std::thread::scope(|scope| {
            if let Some(mut stdin) = stdin {
                scope.spawn(move || {
                    if let Err(err) = stdin.write_all(dataset.as_bytes()) {
                        plot_debug!("Backend closed stdin early: {}", err);
                    }
                });
            }
            child.wait_with_output()
        })
        .map_err(|err| InvocationError::Failed(format!("failed to wait for backend: {err}")))?;

        if !output.status.success() {
            return Err(InvocationError::Failed(format!(
                "backend exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        plot_debug!("Backend returned {} bytes", output.stdout.len());
        serde_json::from_slice(&output.stdout)
            .map_err(|err| InvocationError::InvalidOutput(err.to_string()))
    }
}

/// Resolves `program` to an executable file. Bare names are searched in
/// `search_path`; names with a directory part are taken relative to the working directory.
fn resolve_program(program: &Path, search_path: Option<&OsStr>) -> Result<PathBuf, LoadError> {
    let cwd = std::env::current_dir()
        .map_err(|err| LoadError::Instantiate(format!("no working directory: {err}")))?;
    which::which_in(program, search_path, cwd).map_err(|err| {
        LoadError::Instantiate(format!("backend program {program:?} is not usable: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_explicit_path_does_not_resolve() {
        assert!(matches!(
            resolve_program(Path::new("./definitely/not/here"), None),
            Err(LoadError::Instantiate(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn bare_name_needs_the_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("plot-backend");
        std::fs::write(&script, "#!/bin/sh\necho '{}'\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644)).unwrap();

        let search_path = dir.path().as_os_str();
        assert!(matches!(
            resolve_program(Path::new("plot-backend"), Some(search_path)),
            Err(LoadError::Instantiate(_))
        ));

        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let resolved = resolve_program(Path::new("plot-backend"), Some(search_path)).unwrap();
        assert_eq!(resolved, script);
    }
}
