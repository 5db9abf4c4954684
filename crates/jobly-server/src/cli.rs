//! Command-line interface and configuration.
//!
//! Every option can also come from the environment (`main` loads `.env`
//! first), so a deployment only needs `DATABASE_URL` and `JOBLY_SECRET_KEY`.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::net::SocketAddr;

use crate::{auth, server, state::AppState};

#[derive(Debug, Parser)]
#[command(name = "jobly", version, about = "Job listings API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Apply pending database migrations
    Migrate(DatabaseArgs),
    /// Mint a signed bearer token
    Token(TokenArgs),
}

#[derive(Debug, Clone, Args)]
pub struct DatabaseArgs {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "JOBLY_POOL_SIZE", default_value_t = jobly::DEFAULT_POOL_SIZE)]
    pub pool_size: usize,
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Address to listen on
    #[arg(long, env = "JOBLY_LISTEN", default_value = "0.0.0.0:3001")]
    pub listen: SocketAddr,

    /// Secret used to verify bearer tokens
    #[arg(long, env = "JOBLY_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,
}

#[derive(Debug, Clone, Args)]
pub struct TokenArgs {
    #[arg(long)]
    pub username: String,

    /// Grant admin rights
    #[arg(long)]
    pub admin: bool,

    /// Lifetime in minutes
    #[arg(long, default_value_t = 60)]
    pub ttl_minutes: u64,

    /// Secret used to sign the token
    #[arg(long, env = "JOBLY_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,
}

/// Parse `args` and run the selected command.
pub async fn run<I, T>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match cli.command {
        Command::Serve(args) => {
            let pool = jobly::create_pool(&args.database.database_url, args.database.pool_size)
                .context("failed to configure database pool")?;
            let state = AppState::new(pool, args.secret_key);
            server::serve(args.listen, state)
                .await
                .with_context(|| format!("server on {} failed", args.listen))
        }
        Command::Migrate(args) => {
            let pool = jobly::create_pool(&args.database_url, args.pool_size)
                .context("failed to configure database pool")?;
            let report = jobly::migrate::run_pool(&pool)
                .await
                .context("migration failed")?;
            tracing::info!(applied = report.applied_migrations().len(), "migrations complete");
            Ok(())
        }
        Command::Token(args) => {
            let token = auth::create_token(&args.secret_key, &args.username, args.admin, args.ttl_minutes)
                .context("failed to sign token")?;
            println!("{token}");
            Ok(())
        }
    }
}
