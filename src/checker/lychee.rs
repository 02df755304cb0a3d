//! lychee as the link-checking engine
//!
//! lychee exits with status 2 when it finds broken links. That is a normal
//! outcome here, so the exit status is only logged; results come from the
//! JSON file it writes.

use crate::checker::engine::{EngineInvocation, LinkEngine};
use crate::config::DEFAULT_ENGINE_PROGRAM;
use crate::CheckError;
use std::ffi::OsString;
use std::process::Command;

/// Where to get lychee when it is missing
pub const LYCHEE_INSTALL_URL: &str = "https://github.com/lycheeverse/lychee";

/// Runs the lychee binary as a subprocess
#[derive(Debug, Clone)]
pub struct LycheeEngine {
    program: String,
}

impl LycheeEngine {
    /// Creates an engine for the given executable name or path
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the executable this engine runs
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns true if the executable can be found
    pub fn is_installed(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    /// Builds the lychee command-line arguments for an invocation
    pub fn build_args(invocation: &EngineInvocation<'_>) -> Vec<OsString> {
        let options = invocation.options;

        let mut args: Vec<OsString> = vec![
            "--max-concurrency".into(),
            options.max_concurrency.to_string().into(),
            "--timeout".into(),
            options.timeout.to_string().into(),
            "--files-from".into(),
            invocation.urls_file.into(),
            // Always JSON so results can be parsed
            "--format".into(),
            "json".into(),
            "--output".into(),
            invocation.output_file.into(),
        ];

        if options.no_progress {
            args.push("--no-progress".into());
        }

        if let Some(config) = &options.engine_config {
            args.push("--config".into());
            args.push(config.into());
        }

        for exclude in &options.excludes {
            args.push("--exclude".into());
            args.push(exclude.into());
        }

        args
    }
}

impl Default for LycheeEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE_PROGRAM)
    }
}

impl LinkEngine for LycheeEngine {
    fn name(&self) -> &str {
        &self.program
    }

    fn run(&self, invocation: &EngineInvocation<'_>) -> Result<(), CheckError> {
        let args = Self::build_args(invocation);

        let command_line = format!(
            "{} {}",
            self.program,
            args.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        if invocation.options.verbose {
            tracing::info!("Running: {}", command_line);
        } else {
            tracing::debug!("Running: {}", command_line);
        }

        // stdout/stderr are inherited so lychee's progress UI reaches the user
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|source| CheckError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        tracing::debug!("{} exited with {}", self.program, status);

        Ok(())
    }
}
