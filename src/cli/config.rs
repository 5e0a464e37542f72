use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::analyze::client::DEFAULT_ANALYZE_ENDPOINT;
use crate::dispatch::dispatcher::DispatchPolicy;
use crate::dispatch::executor::DEFAULT_EXECUTOR_ENDPOINT;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "page-actions",
    version,
    about = "Show and run the interactive elements detected on a web page"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Executor endpoint that performs actions
    #[arg(long, global = true)]
    pub executor_endpoint: Option<String>,

    /// Path to config file (default: page-actions.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the actions of a page description
    Show {
        /// Percent-encoded element description (the `actions` query value)
        #[arg(long, conflicts_with = "actions_file")]
        actions: Option<String>,

        /// File holding the element description as plain JSON
        #[arg(long)]
        actions_file: Option<String>,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,
    },

    /// Run one element's action against the executor
    Exec {
        /// Percent-encoded element description (the `actions` query value)
        #[arg(long, conflicts_with = "actions_file")]
        actions: Option<String>,

        /// File holding the element description as plain JSON
        #[arg(long)]
        actions_file: Option<String>,

        /// Identity of the element to run
        #[arg(long)]
        element: String,

        /// Value for an input element, or the option for a select element
        #[arg(long)]
        value: Option<String>,

        /// Form field value as <field identity>=<value> (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,

        /// Toggle the form open or closed before running
        #[arg(long)]
        toggle: bool,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,
    },

    /// Ask the page analyzer for a description of a URL
    Analyze {
        /// Page to analyze
        #[arg(long)]
        url: String,
    },

    /// Read or change the accessibility preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommand {
    /// Print the stored preferences
    Show,

    /// Update some preferences, keeping the others
    Set {
        #[arg(long)]
        dyslexic: Option<bool>,

        /// true, false, protanopia, deuteranopia or tritanopia
        #[arg(long)]
        color_blind: Option<String>,

        #[arg(long)]
        deaf: Option<bool>,

        /// normal, large or extra-large
        #[arg(long)]
        font_size: Option<String>,

        #[arg(long)]
        high_contrast: Option<bool>,

        #[arg(long)]
        reduce_motion: Option<bool>,
    },

    /// Replace the preferences with an empty set
    Reset,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `page-actions.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub prefs: PrefsConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    #[serde(default = "default_executor_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_analyze_endpoint")]
    pub analyze_endpoint: String,

    pub timeout_ms: Option<u64>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_executor_endpoint(),
            analyze_endpoint: default_analyze_endpoint(),
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub policy: DispatchPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrefsConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_executor_endpoint() -> String { DEFAULT_EXECUTOR_ENDPOINT.to_string() }
fn default_analyze_endpoint() -> String { DEFAULT_ANALYZE_ENDPOINT.to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("page-actions.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = config_path, error = %e, "malformed config file, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Executor endpoint: CLI flag, then config file, then default.
pub fn resolve_executor_endpoint<'a>(cli: Option<&'a str>, config: &'a AppConfig) -> &'a str {
    cli.unwrap_or(&config.executor.endpoint)
}

/// Parse a `<field identity>=<value>` argument.
pub fn parse_field_arg(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field.to_string(), value.to_string())),
        _ => Err(format!("expected <field identity>=<value>, got '{}'", arg)),
    }
}
