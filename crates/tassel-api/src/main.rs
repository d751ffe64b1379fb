//! tassel-server — HTTP server and maintenance CLI for the clearance portal.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the
//! SQLite store and the blob directory, and serves the portal API. The
//! administrative subcommands act on the same store directly and exit;
//! they are how registry staff provision accounts and assert the
//! payment/readiness flags the portal itself never writes.
//!
//! # Password hash generation
//!
//! To print the argon2 PHC string for a password without touching a store:
//!
//! ```
//! cargo run -p tassel-api --bin tassel-server -- hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tassel_api::{AppState, ServerConfig, auth, sessions::SessionRegistry};
use tassel_blob_fs::FsBlobStore;
use tassel_core::{
  Portal,
  portal::reconcile_blobs,
  store::ClearanceStore,
  student::{MatricNo, NewStudent, Role},
};
use tassel_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Tassel clearance portal server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Run the HTTP server (the default when no subcommand is given).
  Serve,
  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
  /// Provision an account; the password is read from stdin.
  Provision {
    /// Matric number (or staff identifier for administrators).
    matric: String,
    /// Contact email recorded on the account.
    #[arg(long)]
    email:  String,
    /// Provision an administrator instead of a student.
    #[arg(long)]
    admin:  bool,
  },
  /// Assert that a student's certificate is ready for collection.
  MarkReady {
    matric: String,
    /// Withdraw the assertion instead.
    #[arg(long)]
    revoke: bool,
  },
  /// Assert that a student's certificate payment has cleared.
  ConfirmPayment {
    matric: String,
    /// Withdraw the assertion instead.
    #[arg(long)]
    revoke: bool,
  },
  /// Delete blobs no record references any more and report what went.
  SweepBlobs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let command = cli.command.unwrap_or(Command::Serve);

  // Helper mode: hash a password and exit. Needs no configuration.
  if let Command::HashPassword = command {
    let password = password_from_stdin()?;
    let hash = auth::hash_password(&password)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("TASSEL"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in filesystem paths.
  let store_path = expand_tilde(&server_cfg.store_path);
  let blob_root = expand_tilde(&server_cfg.blob_root);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match command {
    // Returned before configuration loading.
    Command::HashPassword => Ok(()),

    Command::Serve => {
      let blobs = FsBlobStore::open(&blob_root)
        .await
        .with_context(|| format!("failed to open blob root {blob_root:?}"))?;

      let state = AppState {
        portal:   Arc::new(Portal::new(store, blobs, auth::Argon2Verifier)),
        sessions: Arc::new(SessionRegistry::new(chrono::Duration::minutes(
          server_cfg.session_ttl_minutes,
        ))),
        config:   Arc::new(server_cfg.clone()),
      };

      let app = tassel_api::router(state);
      let address = format!("{}:{}", server_cfg.host, server_cfg.port);

      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

      axum::serve(listener, app).await.context("server error")?;
      Ok(())
    }

    Command::Provision { matric, email, admin } => {
      let password = password_from_stdin()?;
      let hash = auth::hash_password(&password)
        .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;

      let role = if admin { Role::Admin } else { Role::Student };
      let student = store
        .create_student(NewStudent {
          matric:        MatricNo::new(matric),
          password_hash: hash,
          role,
          email,
        })
        .await
        .context("failed to provision account")?;

      println!("provisioned {} ({})", student.matric, student.role);
      Ok(())
    }

    Command::MarkReady { matric, revoke } => {
      let matric = MatricNo::new(matric);
      store
        .set_certificate_ready(&matric, !revoke)
        .await
        .context("failed to update the certificate flag")?;
      println!(
        "{matric}: certificate {}",
        if revoke { "not ready" } else { "ready for collection" }
      );
      Ok(())
    }

    Command::ConfirmPayment { matric, revoke } => {
      let matric = MatricNo::new(matric);
      store
        .set_payment_confirmed(&matric, !revoke)
        .await
        .context("failed to update the payment flag")?;
      println!(
        "{matric}: payment {}",
        if revoke { "no longer confirmed" } else { "confirmed" }
      );
      Ok(())
    }

    Command::SweepBlobs => {
      let blobs = FsBlobStore::open(&blob_root)
        .await
        .with_context(|| format!("failed to open blob root {blob_root:?}"))?;

      let report =
        reconcile_blobs(&store, &blobs).await.context("sweep failed")?;
      println!("{}", serde_json::to_string_pretty(&report)?);
      Ok(())
    }
  }
}

/// Read a password from the first line of stdin.
fn password_from_stdin() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write as _};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
