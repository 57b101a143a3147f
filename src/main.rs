mod config;
mod domain;
mod infrastructure;
mod usecase;

use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use sea_orm::{ConnectOptions, Database};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{CliArgs, Config},
    domain::{error::RegistrationError, models::user::PersistedUser},
    infrastructure::{
        nats_event_publisher::JetStreamEventPublisher,
        reference_repository::MySqlReferenceRepository,
        user_registration_repository::MySqlUserRegistrationRepository,
    },
    usecase::register_user_usecase::RegisterUserUsecase,
};

/// Exit status when the user row is committed but the event is missing
const EXIT_USER_WITHOUT_EVENT: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional; it must be loaded before the arguments read the environment
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "ignoring unreadable .env file");
        }
    }

    let args = CliArgs::parse();
    match run(args).await {
        Ok(user) => {
            println!("User registered successfully with ID: {}", user.id());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(
                stage = ?e.stage(),
                user_persisted = e.user_persisted(),
                "Registration error: {e}"
            );
            eprintln!("Error: {e}");
            if e.user_persisted() {
                ExitCode::from(EXIT_USER_WITHOUT_EVENT)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(args: CliArgs) -> Result<PersistedUser, RegistrationError> {
    info!("Starting user registration process");
    let config = Config::try_from(args)?;

    info!(database = ?config.database, "Connecting to database");
    let mut opt = ConnectOptions::new(config.database.url.clone());
    opt.max_connections(1)
        .min_connections(1)
        .connect_timeout(config.database.connect_timeout)
        .sqlx_logging(true);

    let db = Arc::new(
        Database::connect(opt)
            .await
            .map_err(|e| RegistrationError::StoreUnavailable(e.to_string()))?,
    );

    let register_user_usecase = RegisterUserUsecase::new(
        MySqlReferenceRepository::new(db.clone()),
        MySqlUserRegistrationRepository::new(db),
        JetStreamEventPublisher::new(config.nats),
    );

    register_user_usecase.execute(config.request).await
}
