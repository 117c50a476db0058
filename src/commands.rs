//! Command handlers behind the `restclient` binary.

use std::io::Write;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::api::RestApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get { path: String },
    Post { path: String, data: String },
    Delete { path: String },
}

/// Runs one command against `api`, writing any JSON result to `out`.
pub async fn run<W: Write>(api: &dyn RestApi, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Get { path } => {
            let items = api.try_get(&path).await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&items)?)?;
        }
        Command::Post { path, data } => {
            let payload: Value = serde_json::from_str(&data).context("--data is not valid JSON")?;
            if let Some(created) = api.try_post(&path, &payload).await? {
                writeln!(out, "{}", serde_json::to_string_pretty(&created)?)?;
            }
        }
        Command::Delete { path } => api.try_delete(&path).await?,
    }
    Ok(())
}
