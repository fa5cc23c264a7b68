// ABOUTME: PostgreSQL session management for source and target databases
// ABOUTME: Handles connection parameters, TLS setup, and connection lifecycle

use crate::error::{driver_error_message, CompareError, Result};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use std::fmt;
use tokio::task::JoinHandle;
use tokio_postgres::config::SslMode;
use tokio_postgres::Client;

/// Which side of the comparison a database plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseRole {
    Source,
    Target,
}

impl fmt::Display for DatabaseRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseRole::Source => write!(f, "Source"),
            DatabaseRole::Target => write!(f, "Target"),
        }
    }
}

/// Validated connection parameters plus the schema to compare
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub schema: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"********")
            .field("schema", &self.schema)
            .finish()
    }
}

impl DatabaseConfig {
    /// Build the driver configuration (SSL is preferred, not required)
    pub fn to_pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.dbname)
            .user(&self.user)
            .password(&self.password)
            .ssl_mode(SslMode::Prefer);
        config
    }
}

/// An open connection to one database
///
/// Dropping the session drops the client, which ends the connection driver
/// task. `close` does the same but also waits for the driver to finish.
pub struct Session {
    role: DatabaseRole,
    client: Client,
    driver: JoinHandle<()>,
}

impl Session {
    /// Open a session for the given role
    pub async fn open(role: DatabaseRole, config: &DatabaseConfig) -> Result<Self> {
        tracing::info!(
            "Connecting to {} database {}@{}:{}/{}...",
            role,
            config.user,
            config.host,
            config.port,
            config.dbname
        );
        let session = connect(role, config).await?;
        tracing::info!("✓ Connected to {} database", role);
        Ok(session)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Close the session and wait for the connection driver to exit
    pub async fn close(self) {
        let Session {
            role,
            client,
            driver,
        } = self;
        drop(client);
        if let Err(e) = driver.await {
            tracing::warn!("{} connection task ended abnormally: {}", role, e);
        }
        tracing::debug!("Closed {} database connection", role);
    }
}

/// Connect to PostgreSQL with TLS support
pub async fn connect(role: DatabaseRole, config: &DatabaseConfig) -> Result<Session> {
    let tls_connector = TlsConnector::builder()
        .danger_accept_invalid_certs(false)
        .build()
        .map_err(|e| CompareError::Connection {
            role,
            message: format!("Failed to build TLS connector: {}", e),
        })?;
    let tls = MakeTlsConnector::new(tls_connector);

    let (client, connection) =
        config
            .to_pg_config()
            .connect(tls)
            .await
            .map_err(|e| CompareError::Connection {
                role,
                message: describe_connect_error(&driver_error_message(&e)),
            })?;

    let driver = tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("{} connection error: {}", role, e);
        }
    });

    Ok(Session {
        role,
        client,
        driver,
    })
}

/// Open and immediately close a session to check the credentials
pub async fn probe(role: DatabaseRole, config: &DatabaseConfig) -> Result<()> {
    let session = connect(role, config).await?;
    session.close().await;
    Ok(())
}

/// Turn a driver error message into an operator-facing explanation
fn describe_connect_error(error_msg: &str) -> String {
    if error_msg.contains("password authentication failed") {
        format!(
            "Authentication failed: Invalid username or password.\n\
             Error: {}",
            error_msg
        )
    } else if error_msg.contains("database") && error_msg.contains("does not exist") {
        format!(
            "Database does not exist: {}\n\
             Please check the database name.",
            error_msg
        )
    } else if error_msg.contains("Connection refused") || error_msg.contains("could not connect")
    {
        format!(
            "Connection refused: Unable to reach database server.\n\
             Please check:\n\
             - The host and port are correct\n\
             - The database server is running\n\
             - Firewall rules allow connections\n\
             Error: {}",
            error_msg
        )
    } else if error_msg.contains("timeout") || error_msg.contains("timed out") {
        format!(
            "Connection timeout: Database server did not respond in time.\n\
             Error: {}",
            error_msg
        )
    } else if error_msg.contains("SSL") || error_msg.contains("TLS") {
        format!(
            "TLS/SSL error: Failed to establish secure connection.\n\
             Error: {}",
            error_msg
        )
    } else if error_msg.contains("no pg_hba.conf entry") {
        format!(
            "Access denied: No pg_hba.conf entry for host.\n\
             Contact your database administrator to update pg_hba.conf.\n\
             Error: {}",
            error_msg
        )
    } else {
        format!("Failed to connect to database: {}", error_msg)
    }
}
