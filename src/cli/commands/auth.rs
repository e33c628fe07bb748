use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{self, Claims, ACCESS_ADMIN, ACCESS_USER};
use crate::cli::utils::output_success;
use crate::cli::{OutputFormat, TOKEN_ENV};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Mint a token from the locally configured secret (dev/test use)")]
    Mint {
        #[arg(help = "Email address for the principal")]
        email: String,
        #[arg(long, help = "User ID (random if omitted)")]
        user_id: Option<Uuid>,
        #[arg(long, help = "Mint an administrator token")]
        admin: bool,
    },

    #[command(about = "Show the current session token's claims")]
    Status,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Mint { email, user_id, admin } => {
            let user_id = user_id.unwrap_or_else(Uuid::new_v4);
            let access = if admin { ACCESS_ADMIN } else { ACCESS_USER };
            let claims = Claims::new(user_id, email.clone(), access.to_string());
            let token = auth::mint_token(&claims)?;

            output_success(
                &output_format,
                &format!("Minted token for {} ({})", email, access),
                Some(json!({ "token": token, "user_id": user_id })),
            )?;
            if matches!(output_format, OutputFormat::Text) {
                println!("export {}={}", TOKEN_ENV, token);
            }
            Ok(())
        }
        AuthCommands::Status => {
            let token = std::env::var(TOKEN_ENV).unwrap_or_default();
            if token.trim().is_empty() {
                anyhow::bail!("no session: {} is not set", TOKEN_ENV);
            }

            let claims = auth::verify_token(&token)
                .map_err(|e| anyhow::anyhow!("session invalid: {}", e))?;

            output_success(
                &output_format,
                &format!("Session valid for {}", claims.email),
                Some(json!({
                    "user_id": claims.sub,
                    "email": claims.email,
                    "access": claims.access,
                    "expires_at": claims.exp,
                })),
            )
        }
    }
}
