use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::analyze::client::{AnalyzerClient, actions_query};
use crate::cli::config::{AppConfig, PrefsCommand, parse_field_arg, resolve_executor_endpoint};
use crate::dispatch::dispatcher::{DispatchOutcome, Dispatcher};
use crate::dispatch::executor::{Executor, HttpExecutor};
use crate::prefs::prefs_model::{ColorBlindness, FontSize, UserConfig};
use crate::prefs::store::{FilePreferenceStore, PreferenceHandle, PreferenceStore};
use crate::schema::element_model::ElementKind;
use crate::schema::error::DecodeError;
use crate::trace::logger::TraceLogger;
use crate::view::actions_view::ActionsView;
use crate::view::console::format_console_view;
use crate::view::view_model::ViewModel;

// ============================================================================
// show subcommand
// ============================================================================

/// Render a description. A payload that fails to decode is shown as the
/// error banner, not returned as an error.
pub fn cmd_show(
    config: &AppConfig,
    actions: Option<&str>,
    actions_file: Option<&str>,
    format: &str,
    executor_endpoint: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = build_view(config, executor_endpoint)?;
    let _ = load_description(&mut view, actions, actions_file)?;

    print!("{}", render(&view, format)?);
    Ok(())
}

// ============================================================================
// exec subcommand
// ============================================================================

/// Run one element and return whether its dispatch succeeded.
pub async fn cmd_exec(
    config: &AppConfig,
    actions: Option<&str>,
    actions_file: Option<&str>,
    element: &str,
    value: Option<&str>,
    fields: &[String],
    toggle: bool,
    format: &str,
    executor_endpoint: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut view = build_view(config, executor_endpoint)?;
    load_description(&mut view, actions, actions_file)??;

    let kind = view
        .collection()
        .and_then(|c| c.get(element))
        .map(|e| e.element.kind.clone())
        .ok_or_else(|| format!("no element with identity '{}'", element))?;

    if let Some(value) = value {
        match kind {
            ElementKind::Input { .. } => view.set_input_value(element, value)?,
            ElementKind::Select { .. } => view.set_select_value(element, value)?,
            ElementKind::Click | ElementKind::Form { .. } => {
                return Err(format!("--value does not apply to element '{}'", element).into());
            }
        }
    }

    for arg in fields {
        let (field, field_value) = parse_field_arg(arg)?;
        view.set_field_value(element, &field, &field_value)?;
    }

    if toggle {
        view.toggle_form(element)?;
    }

    let succeeded = match view.trigger(element).await? {
        DispatchOutcome::Completed(completion) => completion.succeeded(),
        DispatchOutcome::Ignored | DispatchOutcome::Dropped => false,
    };

    print!("{}", render(&view, format)?);
    Ok(succeeded)
}

// ============================================================================
// analyze subcommand
// ============================================================================

pub async fn cmd_analyze(config: &AppConfig, url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = AnalyzerClient::new(&config.executor.analyze_endpoint);
    let encoded = client.analyze(url).await?;
    println!("{}", actions_query(&encoded));
    Ok(())
}

// ============================================================================
// prefs subcommand
// ============================================================================

pub fn cmd_prefs(config: &AppConfig, command: &PrefsCommand) -> Result<(), Box<dyn std::error::Error>> {
    let store = preference_store(config);
    let mut handle = PreferenceHandle::new(store);

    match command {
        PrefsCommand::Show => {}
        PrefsCommand::Set {
            dyslexic,
            color_blind,
            deaf,
            font_size,
            high_contrast,
            reduce_motion,
        } => {
            let patch = UserConfig {
                is_dyslexic: *dyslexic,
                is_color_blind: color_blind.as_deref().map(str::parse::<ColorBlindness>).transpose()?,
                is_deaf: *deaf,
                font_size: font_size.as_deref().map(str::parse::<FontSize>).transpose()?,
                high_contrast: *high_contrast,
                reduce_motion: *reduce_motion,
            };
            handle.update(&patch);
        }
        PrefsCommand::Reset => handle.reset(),
    }

    let current = handle.config().cloned().unwrap_or_default();
    println!("{}", serde_json::to_string_pretty(&current)?);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn preference_store(config: &AppConfig) -> Arc<dyn PreferenceStore> {
    let path = config
        .prefs
        .path
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(FilePreferenceStore::default_path);
    Arc::new(FilePreferenceStore::new(path))
}

/// Build a view wired to the configured executor, dispatch policy, trace
/// file and stored preferences.
pub fn build_view(
    config: &AppConfig,
    executor_endpoint: Option<&str>,
) -> Result<ActionsView, Box<dyn std::error::Error>> {
    let endpoint = resolve_executor_endpoint(executor_endpoint, config);
    let executor: Arc<dyn Executor> = match config.executor.timeout_ms {
        Some(ms) => Arc::new(HttpExecutor::with_timeout(endpoint, Duration::from_millis(ms))?),
        None => Arc::new(HttpExecutor::new(endpoint)),
    };

    let tracer = match &config.trace.path {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };
    let dispatcher = Dispatcher::new(executor)
        .with_policy(config.dispatch.policy)
        .with_tracer(Arc::new(tracer));

    let mut view = ActionsView::new(dispatcher);
    let prefs = PreferenceHandle::new(preference_store(config));
    view.set_preferences(prefs.config());
    Ok(view)
}

/// Load whichever description source was given. The outer error is an I/O
/// failure, the inner one a description that did not decode.
fn load_description(
    view: &mut ActionsView,
    actions: Option<&str>,
    actions_file: Option<&str>,
) -> Result<Result<(), DecodeError>, std::io::Error> {
    match (actions, actions_file) {
        (_, Some(path)) => {
            let json = std::fs::read_to_string(path)?;
            Ok(view.load_json(Some(&json)))
        }
        (encoded, None) => Ok(view.load(encoded)),
    }
}

fn render(view: &ActionsView, format: &str) -> Result<String, serde_json::Error> {
    let model = ViewModel::build(view);
    match format {
        "json" => serde_json::to_string_pretty(&model).map(|s| s + "\n"),
        _ => Ok(format_console_view(&model)),
    }
}
