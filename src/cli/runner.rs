//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::PaginatorSettings;
use crate::error::{Error, Result, ResultExt};
use crate::normalize::normalize_value;
use crate::paginator::{PageChangeStream, PaginatorController, ViewStream};
use crate::source::MemorySource;
use crate::types::{JsonValue, NavigationStep};
use futures::{FutureExt, StreamExt};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Browse {
                data,
                per_page,
                latency_ms,
                settings,
                script,
            } => {
                self.browse(data, *per_page, *latency_ms, settings.as_deref(), script)
                    .await
            }
            Commands::Normalize { input } => self.normalize(input),
        }
    }

    /// Run a navigation script against the items in `data`
    async fn browse(
        &self,
        data: &Path,
        per_page: u32,
        latency_ms: u64,
        settings: Option<&Path>,
        script: &str,
    ) -> Result<()> {
        let steps = NavigationStep::parse_script(script)
            .map_err(|step| Error::invalid_value("script", format!("unknown step '{step}'")))?;
        let items = load_items(data)?;
        let settings = match settings {
            Some(path) => PaginatorSettings::from_file(path)?,
            None => PaginatorSettings::default(),
        };

        let mut source = MemorySource::new(items, per_page)?;
        if latency_ms > 0 {
            source = source.with_latency(Duration::from_millis(latency_ms));
        }
        let source = Arc::new(source);

        info!(
            pages = source.last_page(),
            per_page,
            steps = steps.len(),
            "browsing"
        );

        let paginator: PaginatorController<JsonValue> = settings.builder()?.build();
        let mut changes = paginator.page_changes();
        let mut views = paginator.get_page_from(Arc::clone(&source));

        // Initial page
        changes.next().await;
        self.emit_next_view(&mut views, None).await?;

        for step in steps {
            debug!(?step, "applying step");
            apply_step(&paginator, step);

            if page_requested(&mut changes) {
                self.emit_next_view(&mut views, Some(step)).await?;
            } else {
                let message = format!("{step:?} left page {} unchanged", paginator.current_page());
                self.output_message(&json!({
                    "type": "LOG",
                    "log": { "level": "INFO", "message": message }
                }));
            }
        }

        self.output_message(&json!({
            "type": "SUMMARY",
            "summary": {
                "current_page": paginator.current_page(),
                "last_page": paginator.last_known_page(),
                "cached_pages": paginator.cached_pages(),
                "requests": source.fetch_count(),
            }
        }));

        paginator.destroy();
        Ok(())
    }

    /// Wait for the next view and print it
    ///
    /// Page request failures are printed and do not stop the script.
    async fn emit_next_view(
        &self,
        views: &mut ViewStream<JsonValue>,
        step: Option<NavigationStep>,
    ) -> Result<()> {
        let item = views
            .next()
            .await
            .ok_or_else(|| Error::Other("view stream ended unexpectedly".to_string()))?;

        match item {
            Ok(view) => self.output_message(&json!({
                "type": "VIEW",
                "step": step,
                "view": view,
            })),
            Err(e) => self.output_message(&json!({
                "type": "ERROR",
                "step": step,
                "error": e.to_string(),
            })),
        }
        Ok(())
    }

    /// Normalize a raw response file and print the record
    fn normalize(&self, input: &Path) -> Result<()> {
        let raw = read_json(input)?;
        let record = normalize_value::<JsonValue>(raw)?;

        self.output_message(&json!({
            "type": "RECORD",
            "record": record,
        }));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn apply_step<T>(paginator: &PaginatorController<T>, step: NavigationStep)
where
    T: Clone + Send + Sync + 'static,
{
    match step {
        NavigationStep::First => paginator.first_page(),
        NavigationStep::Prev => paginator.prev_page(),
        NavigationStep::Next => paginator.next_page(),
        NavigationStep::Last => paginator.last_page(),
        NavigationStep::Goto(page) => paginator.set_page(page),
        NavigationStep::Clear => paginator.clear_cache(),
        NavigationStep::Refresh => paginator.refresh_current_page(),
    }
}

/// Check whether the last step requested a page, without waiting
fn page_requested(changes: &mut PageChangeStream) -> bool {
    matches!(changes.next().now_or_never(), Some(Some(_)))
}

fn read_json(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).with_context(|| format!("reading {}", path.display()))
}

/// Load the item array browsed by `browse`
fn load_items(path: &Path) -> Result<Vec<JsonValue>> {
    match read_json(path)? {
        Value::Array(items) => Ok(items),
        other => Err(Error::config(format!(
            "{} must hold a JSON array of items, found {}",
            path.display(),
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
