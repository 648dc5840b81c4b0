//! Developer helper: mint a bearer token for local testing
//!
//! Signs with JWT_SECRET / JWT_ISSUER / ROLES_CLAIM from the environment
//! (or .env), the same values the server verifies against.

use anyhow::{Context, Result};
use clap::Parser;
use moderation_core::common::Role;
use moderation_core::domains::auth::{IdentityProvider, JwtService, DEFAULT_ROLES_CLAIM};
use std::env;

#[derive(Parser)]
#[command(name = "issue_token")]
#[command(about = "Issue a signed session token for local development")]
struct Cli {
    /// Subject id (becomes the author id)
    #[arg(long, default_value = "dev|local-user")]
    subject: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    name: Option<String>,

    /// Grant the ADMIN role
    #[arg(long)]
    admin: bool,

    /// Token lifetime in hours
    #[arg(long, default_value_t = 24)]
    ttl_hours: i64,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
    let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "moderation-server".to_string());
    let roles_claim = env::var("ROLES_CLAIM").unwrap_or_else(|_| DEFAULT_ROLES_CLAIM.to_string());

    let provider = IdentityProvider::new(JwtService::new(&secret, issuer), roles_claim);

    let roles = if cli.admin {
        vec![Role::Admin]
    } else {
        vec![Role::User]
    };

    let token = provider
        .issue_token(
            &cli.subject,
            &cli.email,
            cli.name.as_deref(),
            &roles,
            chrono::Duration::hours(cli.ttl_hours),
        )
        .context("Failed to sign token")?;

    println!("{}", token);
    Ok(())
}
