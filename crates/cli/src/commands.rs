//! CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;
use serde_json::Value;
use storefront_http::{RequestOptions, ResponseEnvelope, StorefrontClient};
use tracing::info;

#[derive(Subcommand)]
pub enum Commands {
    /// Send a GET request
    Get {
        /// Logical path (e.g. /api/products) or absolute URL
        url: String,
    },

    /// Send a POST request with a JSON body
    Post {
        url: String,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },

    /// Send a PUT request with a JSON body
    Put {
        url: String,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },

    /// Send a DELETE request
    Delete { url: String },

    /// Log in and store the issued credentials
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the session and forget stored credentials
    Logout,

    /// Show the stored session
    Whoami,
}

impl Commands {
    /// Run the command. Returns `false` when the server reported an error.
    pub async fn execute(self, client: &StorefrontClient) -> Result<bool> {
        match self {
            Self::Get { url } => {
                let envelope: ResponseEnvelope<Value> =
                    client.get(&url, RequestOptions::default()).await;
                print_envelope(&envelope)
            }
            Self::Post { url, body } => {
                let body = parse_body(body.as_deref())?;
                let envelope: ResponseEnvelope<Value> =
                    client.post(&url, &body, RequestOptions::default()).await;
                print_envelope(&envelope)
            }
            Self::Put { url, body } => {
                let body = parse_body(body.as_deref())?;
                let envelope: ResponseEnvelope<Value> =
                    client.put(&url, &body, RequestOptions::default()).await;
                print_envelope(&envelope)
            }
            Self::Delete { url } => {
                let envelope: ResponseEnvelope<Value> =
                    client.delete(&url, RequestOptions::default()).await;
                print_envelope(&envelope)
            }
            Self::Login { email, password } => {
                let envelope = client.login(&email, &password).await;
                if let Some(body) = envelope.data.as_ref().filter(|body| body.success) {
                    info!(server_message = body.message.as_deref().unwrap_or_default(), "Login succeeded");
                }
                // Never echo tokens back to the terminal
                let redacted = ResponseEnvelope {
                    data: envelope.data.as_ref().map(|body| {
                        serde_json::json!({
                            "success": body.success,
                            "code": body.code,
                            "message": body.message,
                        })
                    }),
                    error: envelope.error.clone(),
                    status: envelope.status,
                };
                Ok(print_envelope(&redacted)? && envelope.data.is_some_and(|body| body.success))
            }
            Self::Logout => {
                let envelope = client.logout().await;
                print_envelope(&envelope)
            }
            Self::Whoami => {
                match client.session().await? {
                    Some(session) => {
                        let role = if session.is_admin() { "admin" } else { "user" };
                        println!(
                            "{} (member #{}, {role})",
                            session.nickname, session.member_id
                        );
                    }
                    None => println!("Not logged in"),
                }
                Ok(true)
            }
        }
    }
}

/// `None` and empty input mean "no body"
fn parse_body(raw: Option<&str>) -> Result<Value> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Value::Null),
        Some(raw) => serde_json::from_str(raw).context("--body is not valid JSON"),
    }
}

fn print_envelope<T: Serialize>(envelope: &ResponseEnvelope<T>) -> Result<bool> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(envelope.is_ok())
}
