#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use std::env;
use std::path::Path;
use tokio::fs;
use tracing::info;

use palatine_client::client::Credentials;
use palatine_client::task::{
    self, FilePart, InputItem, ItemParams, Operation, PollSettings, Setting, SummarizeOptions,
    DEFAULT_BINARY_PROPERTY,
};
use palatine_client::utils::logger;

#[tokio::main]
async fn main() -> Result<()> {
    palatine_client::init_env();
    let _guard = logger::init("./logs".to_string())?;

    info!("Starting Palatine speech task client ({})", env!("GIT_HASH"));

    let paths: Vec<String> = env::args().skip(1).collect();
    if paths.is_empty() {
        anyhow::bail!("usage: palatine-client <audio-file>...");
    }

    let credentials = Credentials::from_env()?;
    let operation: Operation = env_or("PALATINE_TASK", "transcribe")
        .parse()
        .map_err(|message: String| anyhow::anyhow!(message))?;

    let mut items = Vec::new();
    for path in &paths {
        let data = fs::read(path).await?;
        info!("loaded '{}' ({} bytes)", path, data.len());

        let mut part = FilePart::new(data);
        if let Some(file_name) = Path::new(path).file_name().and_then(|name| name.to_str()) {
            part = part.with_file_name(file_name);
        }

        items.push(InputItem::new(item_params(operation)).with_binary(DEFAULT_BINARY_PROPERTY, part));
    }

    let continue_on_fail = env_or("PALATINE_CONTINUE_ON_FAIL", "false") == "true";
    let runner = task::create_runner(credentials).continue_on_fail(continue_on_fail);
    let outputs = runner.run(items).await?;

    for output in &outputs {
        println!("{}", serde_json::to_string_pretty(output)?);
    }

    Ok(())
}

fn item_params(operation: Operation) -> ItemParams {
    let mut params = ItemParams::new(operation).with_poll(poll_settings());

    if let Ok(model) = env::var("PALATINE_MODEL") {
        params = params.with_model(model);
    }

    if operation == Operation::Summarize {
        params = params.with_summarize(SummarizeOptions {
            task: env::var("PALATINE_SUMMARIZE_TASK").ok(),
            prompt: env::var("PALATINE_SUMMARIZE_PROMPT").unwrap_or_default(),
            thinking: env_or("PALATINE_SUMMARIZE_THINKING", "false") == "true",
        });
    }

    params
}

fn poll_settings() -> PollSettings {
    PollSettings {
        interval_ms: env_setting("PALATINE_POLL_INTERVAL_MS"),
        max_attempts: env_setting("PALATINE_MAX_POLL_ATTEMPTS"),
        summarize_interval_ms: env_setting("PALATINE_POLL_INTERVAL_MS_SUMMARIZE"),
        summarize_max_attempts: env_setting("PALATINE_MAX_POLL_ATTEMPTS_SUMMARIZE"),
    }
}

// an env var the user set is an explicit choice; anything else stays unset
fn env_setting<T: std::str::FromStr + Copy>(name: &str) -> Setting<T> {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .map(Setting::Explicit)
        .unwrap_or(Setting::Unset)
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
