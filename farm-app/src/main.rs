//! farm - command line client for the farm management API

use chrono::Utc;
use clap::Parser;
use tracing::{debug, error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use farm_app::{
    cli::{self, App},
    config::Args,
    router::Route,
    AppError,
};
use farm_client::{FarmClient, FileTokenStore, Session, SessionEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.to_ascii_lowercase();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("farm={0},farm_app={0},farm_client={0},info", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(2);
    }

    let (app, mut session_events) = if args.demo {
        debug!("Running against the in-memory demo backend");
        (App::demo(), None)
    } else {
        let session = Session::new(FileTokenStore::new(&args.token_file));
        let events = session.subscribe();
        let client = FarmClient::new(args.client_config(), session)?;
        (App::remote(client), Some(events))
    };

    let result = cli::execute(&app, args.command, Utc::now()).await;

    // The client already cleared the token; point the user at the login screen
    let login_required = session_events
        .as_mut()
        .map(|rx| {
            std::iter::from_fn(|| rx.try_recv().ok()).any(|e| e == SessionEvent::LoginRequired)
        })
        .unwrap_or(false);
    if login_required {
        warn!("Session expired, redirecting to {}", Route::Login);
    }

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(AppError::Redirected(Route::Login)) => {
            eprintln!("Not signed in. Run `farm login --email <email>` first.");
            std::process::exit(1);
        }
        Err(e) => {
            if login_required {
                eprintln!("Your session has expired. Run `farm login --email <email>` to sign in again.");
            } else {
                eprintln!("{}", e.user_message());
            }
            std::process::exit(1);
        }
    }
}
