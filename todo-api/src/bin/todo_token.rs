//! Mints a bearer token for local development
//!
//! Uses the same `JWT_SECRET` / `JWT_ALGORITHM` as the server.
//!
//! ```bash
//! cargo run -p todo-api --bin todo-token -- user-123 --hours 8
//! ```

use chrono::Utc;
use clap::Parser;
use todo_api::config::token_settings_from_env;
use todo_shared::auth::jwt::{check_expiration_hours, issue_token, TokenClaims};

#[derive(Debug, Parser)]
#[command(name = "todo-token", version, about = "Mint a development bearer token")]
struct Args {
    /// Subject (user ID) the token is issued for
    user_id: String,

    /// Lifetime in hours (defaults to JWT_EXPIRATION_HOURS)
    #[arg(long)]
    hours: Option<i64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.user_id.is_empty() {
        anyhow::bail!("user_id must not be empty");
    }

    let mut settings = token_settings_from_env()?;
    if let Some(hours) = args.hours {
        let hours = check_expiration_hours(hours).map_err(|e| anyhow::anyhow!("--hours: {}", e))?;
        settings = settings.with_expiration_hours(hours);
    }

    let claims = TokenClaims::for_subject(args.user_id, Utc::now(), settings.lifetime());
    let token = issue_token(&claims, &settings)?;

    println!("{}", token);
    Ok(())
}
