// ABOUTME: Interactive collection of database credentials and exclusions
// ABOUTME: Bounds password retries and verifies each attempt with a trial connection

use crate::compare::parse_exclusions;
use crate::error::{CompareError, Result};
use crate::postgres::{DatabaseConfig, DatabaseRole};
use dialoguer::{theme::ColorfulTheme, Input, Password};
use std::collections::BTreeSet;
use std::future::Future;

/// Source of operator answers
///
/// The terminal implementation is [`TerminalPrompter`]; tests use scripted
/// answers.
pub trait Prompter {
    /// Free-text answer; empty answers are allowed when `allow_empty` is set
    fn input(&mut self, prompt: &str, allow_empty: bool) -> Result<String>;

    fn port(&mut self, prompt: &str, default: u16) -> Result<u16>;

    /// Hidden answer
    fn password(&mut self, prompt: &str) -> Result<String>;
}

/// Prompts on the controlling terminal using dialoguer
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str, allow_empty: bool) -> Result<String> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .interact_text()?;
        Ok(answer)
    }

    fn port(&mut self, prompt: &str, default: u16) -> Result<u16> {
        let port: u16 = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_text()?;
        Ok(port)
    }

    fn password(&mut self, prompt: &str) -> Result<String> {
        let password = Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?;
        Ok(password)
    }
}

/// Collect connection details for one database, retrying the password
///
/// Host, port, database, user, and schema are asked once. The password is
/// asked up to `max_attempts` times; each attempt is checked with `probe`.
/// Connection errors consume an attempt, any other error is returned as is.
///
/// # Errors
///
/// Returns [`CompareError::ConnectionEstablishment`] once every attempt has
/// failed to connect.
///
/// # Examples
///
/// ```no_run
/// # use pg_table_compare::error::Result;
/// # use pg_table_compare::interactive::{collect_connection_details, TerminalPrompter};
/// # use pg_table_compare::postgres::{probe, DatabaseRole};
/// # async fn example() -> Result<()> {
/// let mut prompter = TerminalPrompter::new();
/// let config = collect_connection_details(DatabaseRole::Source, &mut prompter, 3, |cfg| async move {
///     probe(DatabaseRole::Source, &cfg).await
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn collect_connection_details<P, F, Fut>(
    role: DatabaseRole,
    prompter: &mut P,
    max_attempts: u32,
    mut probe: F,
) -> Result<DatabaseConfig>
where
    P: Prompter,
    F: FnMut(DatabaseConfig) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    println!();
    println!("🔐 Enter details for the {} database:", role);

    let host = prompter.input(&format!("{} DB Host", role), false)?;
    let port = prompter.port(&format!("{} DB Port", role), 5432)?;
    let dbname = prompter.input(&format!("{} DB Name", role), false)?;
    let user = prompter.input(&format!("{} DB User", role), false)?;
    let schema = prompter.input(&format!("{} Schema Name", role), false)?;

    for attempt in 1..=max_attempts {
        let password = prompter.password(&format!(
            "{} DB Password (attempt {}/{})",
            role, attempt, max_attempts
        ))?;

        let config = DatabaseConfig {
            host: host.clone(),
            port,
            dbname: dbname.clone(),
            user: user.clone(),
            password,
            schema: schema.clone(),
        };

        match probe(config.clone()).await {
            Ok(()) => {
                tracing::info!("✓ Connected to {} database", role);
                return Ok(config);
            }
            Err(e) if e.is_connection_error() => {
                tracing::error!("❌ {}", e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(CompareError::ConnectionEstablishment {
        role,
        attempts: max_attempts,
    })
}

/// Ask for an optional comma-separated list of tables to exclude
pub fn prompt_exclusions<P: Prompter>(prompter: &mut P) -> Result<BTreeSet<String>> {
    println!();
    println!("🚫 Optional: Enter table names to exclude (comma-separated). If none, just press Enter.");
    let answer = prompter.input("Tables to exclude (comma-separated)", true)?;
    let exclusions = parse_exclusions(&answer);

    if exclusions.is_empty() {
        tracing::info!("No tables excluded");
    } else {
        tracing::info!("✓ Excluding {} table(s):", exclusions.len());
        for table in &exclusions {
            tracing::info!("  - {}", table);
        }
    }

    Ok(exclusions)
}
