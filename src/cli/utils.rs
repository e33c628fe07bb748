use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::client::{ClientError, SyncOutcome};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(map)) = data {
                response.as_object_mut().unwrap().extend(map);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a named collection in the appropriate format
pub fn output_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    items: Value,
    text_lines: Vec<String>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ collection_name: items }))?
            );
        }
        OutputFormat::Text => {
            if text_lines.is_empty() {
                println!("No {} found", collection_name);
            } else {
                for line in text_lines {
                    println!("{}", line);
                }
            }
        }
    }
    Ok(())
}

/// Map a view outcome to CLI behavior: a redirect request becomes a
/// hard error telling the user to establish a session again.
pub fn require_session(outcome: SyncOutcome) -> anyhow::Result<()> {
    match outcome {
        SyncOutcome::Done => Ok(()),
        SyncOutcome::RedirectToLogin => anyhow::bail!(
            "session expired - set {} to a valid token (see `tracker auth mint`)",
            crate::cli::TOKEN_ENV
        ),
    }
}

/// Same session handling for direct (non-view) client calls.
pub fn map_client_err(err: ClientError) -> anyhow::Error {
    match err {
        ClientError::SessionExpired => anyhow::anyhow!(
            "session expired - set {} to a valid token (see `tracker auth mint`)",
            crate::cli::TOKEN_ENV
        ),
        other => other.into(),
    }
}
