//! Optional TOML configuration for `fsmgen`.
//!
//! Every key is optional; command-line flags win over file values.
//!
//! # Example
//!
//! ```toml
//! [statemachine]
//! id = "door"
//! name = "Door controller"
//!
//! [build]
//! implicit_states = false
//!
//! [logging]
//! level = "fsmgen_core=debug"
//!
//! [diagnostics]
//! dir = "target/fsmgen-diag"
//! ```

use std::path::{Path, PathBuf};

use fsmgen_core::BuildOptions;
use serde::Deserialize;

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub statemachine: StateMachineSettings,
    pub build: BuildSettings,
    pub logging: LoggingSettings,
    pub diagnostics: DiagnosticsSettings,
}

/// `[statemachine]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateMachineSettings {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSettings {
    /// `false` makes every build strict, as if `--strict` were given.
    pub implicit_states: Option<bool>,
}

/// `[logging]` section. `level` is an `EnvFilter` directive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    pub level: Option<String>,
}

/// `[diagnostics]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsSettings {
    pub dir: Option<PathBuf>,
}

// ── Functions ─────────────────────────────────────────────────────────────────

/// Read and parse a config TOML file from `path`.
///
/// Returns a human-readable error string on failure.
pub fn read_config(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

impl Config {
    /// Build options for one run. `id` and `strict` come from the command
    /// line and override the file.
    pub fn build_options(&self, id: Option<&str>, strict: bool) -> BuildOptions {
        let defaults = BuildOptions::default();
        BuildOptions {
            statemachine_id: id
                .map(str::to_owned)
                .or_else(|| self.statemachine.id.clone())
                .unwrap_or(defaults.statemachine_id),
            name: self.statemachine.name.clone().unwrap_or(defaults.name),
            source_diagram: None,
            implicit_states: !strict && self.build.implicit_states.unwrap_or(true),
        }
    }
}
