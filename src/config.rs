//! Invocation surface: flags and environment variables, validated once into [`Config`].

use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::domain::{
    error::RegistrationError,
    models::{reference::EntityReference, user::UserRegistrationRequest},
};

/// `user-registrar` arguments. Every flag can also be given through its environment variable.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "user-registrar",
    about = "Register a user in MySQL and announce it on NATS JetStream",
    version
)]
pub struct CliArgs {
    /// Full name of the user.
    #[arg(long, env = "USER_NAME")]
    pub user_name: Option<String>,
    /// Email address of the user; unique across users.
    #[arg(long, env = "USER_EMAIL")]
    pub user_email: Option<String>,
    /// Identifier of the corporate customer.
    #[arg(long, env = "CUSTOMER_ID")]
    pub customer_id: Option<String>,
    /// Name of the corporate customer, looked up when no id is given.
    #[arg(long, env = "CUSTOMER_NAME")]
    pub customer_name: Option<String>,
    /// Identifier of the role.
    #[arg(long, env = "ROLE_ID")]
    pub role_id: Option<String>,
    /// Name of the role, looked up when no id is given.
    #[arg(long, env = "ROLE_NAME")]
    pub role_name: Option<String>,

    /// Full MySQL URL. Takes precedence over the DB_* parts.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,
    #[arg(long, env = "DB_PORT", default_value_t = 3306)]
    pub db_port: u16,
    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,
    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,
    /// Seconds to wait for a database connection.
    #[arg(long, env = "DB_CONNECT_TIMEOUT", default_value_t = 10)]
    pub db_connect_timeout: u64,

    #[arg(long, env = "NATS_SERVER")]
    pub nats_server: Option<String>,
    #[arg(long, env = "NATS_STREAM")]
    pub nats_stream: Option<String>,
    #[arg(long, env = "NATS_SUBJECT")]
    pub nats_subject: Option<String>,
    #[arg(long, env = "NATS_USER")]
    pub nats_user: Option<String>,
    #[arg(long, env = "NATS_PASSWORD", hide_env_values = true)]
    pub nats_password: Option<String>,
    /// Seconds to wait for the broker connection.
    #[arg(long, env = "NATS_CONNECT_TIMEOUT", default_value_t = 10)]
    pub nats_connect_timeout: u64,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Compose a MySQL URL; credentials and database name are percent-encoded.
    pub fn from_parts(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        database: &str,
    ) -> Result<Url, RegistrationError> {
        let invalid = |what: &str| RegistrationError::ConfigurationInvalid(what.to_string());

        let mut url = Url::parse(&format!("mysql://{host}:{port}"))
            .map_err(|e| RegistrationError::ConfigurationInvalid(format!("DB_HOST: {e}")))?;
        url.set_username(user).map_err(|_| invalid("DB_USER"))?;
        url.set_password(Some(password))
            .map_err(|_| invalid("DB_PASSWORD"))?;
        url.path_segments_mut()
            .map_err(|_| invalid("DB_NAME"))?
            .clear()
            .push(database);
        Ok(url)
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let url = Url::parse(&self.url)
            .map(|mut url| {
                if url.password().is_some() {
                    let _ = url.set_password(Some("***"));
                }
                url.to_string()
            })
            .unwrap_or_else(|_| "<invalid>".to_string());
        f.debug_struct("DatabaseConfig")
            .field("url", &url)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

#[derive(Clone)]
pub struct NatsConfig {
    pub server: String,
    pub stream: String,
    pub subject: String,
    pub user: String,
    pub password: String,
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for NatsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NatsConfig")
            .field("server", &self.server)
            .field("stream", &self.stream)
            .field("subject", &self.subject)
            .field("user", &self.user)
            .field("password", &"***")
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Everything one run needs, checked at the boundary
#[derive(Debug, Clone)]
pub struct Config {
    pub request: UserRegistrationRequest,
    pub database: DatabaseConfig,
    pub nats: NatsConfig,
}

impl TryFrom<CliArgs> for Config {
    type Error = RegistrationError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let database_url = match present(args.database_url) {
            Some(url) => url,
            None => DatabaseConfig::from_parts(
                &required(args.db_host, "DB_HOST")?,
                args.db_port,
                &required(args.db_user, "DB_USER")?,
                &required(args.db_password, "DB_PASSWORD")?,
                &required(args.db_name, "DB_NAME")?,
            )?
            .to_string(),
        };

        let nats = NatsConfig {
            server: required(args.nats_server, "NATS_SERVER")?,
            stream: required(args.nats_stream, "NATS_STREAM")?,
            subject: required(args.nats_subject, "NATS_SUBJECT")?,
            user: required(args.nats_user, "NATS_USER")?,
            password: required(args.nats_password, "NATS_PASSWORD")?,
            connect_timeout: Duration::from_secs(args.nats_connect_timeout),
        };

        let request = UserRegistrationRequest::new(
            required(args.user_name, "USER_NAME")?,
            required(args.user_email, "USER_EMAIL")?,
            EntityReference::new(args.customer_id, args.customer_name),
            EntityReference::new(args.role_id, args.role_name),
        )?;

        Ok(Self {
            request,
            database: DatabaseConfig {
                url: database_url,
                connect_timeout: Duration::from_secs(args.db_connect_timeout),
            },
            nats,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String, RegistrationError> {
    present(value).ok_or_else(|| RegistrationError::ConfigurationMissing(name.to_string()))
}
