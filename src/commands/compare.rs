// ABOUTME: Compare command implementation - table existence and row counts
// ABOUTME: Collects credentials, reconciles both schemas, and writes the reports

use crate::compare::{ComparisonRow, ComparisonSummary, Reconciler, TablePartition};
use crate::config::CompareConfig;
use crate::interactive::{self, Prompter, TerminalPrompter};
use crate::postgres::{self, DatabaseConfig, DatabaseRole, SchemaCounter, Session};
use crate::report;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;

/// Interactively compare two schemas
///
/// Prompts for the source and then the target connection details (each with
/// a bounded number of password attempts), optionally asks for tables to
/// exclude, and then runs [`run_comparison`].
///
/// # Errors
///
/// Returns an error if either database cannot be reached within the password
/// budget, a prompt fails, or the comparison itself fails.
pub async fn compare(config: CompareConfig) -> Result<Vec<ComparisonRow>> {
    let mut prompter = TerminalPrompter::new();
    compare_with_prompter(config, &mut prompter).await
}

/// [`compare`] with a caller-supplied prompter
pub async fn compare_with_prompter<P: Prompter>(
    mut config: CompareConfig,
    prompter: &mut P,
) -> Result<Vec<ComparisonRow>> {
    config.validate()?;

    let source = collect(DatabaseRole::Source, prompter, &config).await?;
    let target = collect(DatabaseRole::Target, prompter, &config).await?;

    resolve_exclusions(&mut config, prompter)?;

    run_comparison(&source, &target, &config).await
}

/// Merge prompted exclusions into the configured ones when prompting is on
fn resolve_exclusions<P: Prompter>(config: &mut CompareConfig, prompter: &mut P) -> Result<()> {
    if config.prompt_for_exclusions {
        let extra = interactive::prompt_exclusions(prompter)
            .context("Failed to read table exclusions")?;
        config.exclusions.extend(extra);
    }
    Ok(())
}

async fn collect<P: Prompter>(
    role: DatabaseRole,
    prompter: &mut P,
    config: &CompareConfig,
) -> Result<DatabaseConfig> {
    let details = interactive::collect_connection_details(
        role,
        prompter,
        config.max_password_attempts,
        move |candidate| async move { postgres::probe(role, &candidate).await },
    )
    .await?;
    Ok(details)
}

/// Compare base tables and row counts between two schemas
///
/// Opens one session per database, lists the base tables on both sides,
/// reconciles them, and writes the CSV (and HTML, when enabled) report. Both
/// sessions are closed before returning, whether or not the comparison
/// succeeded. No report is written when the run fails.
///
/// # Examples
///
/// ```no_run
/// # use anyhow::Result;
/// # use pg_table_compare::commands::run_comparison;
/// # use pg_table_compare::config::CompareConfig;
/// # use pg_table_compare::postgres::DatabaseConfig;
/// # async fn example(source: DatabaseConfig, target: DatabaseConfig) -> Result<()> {
/// let rows = run_comparison(&source, &target, &CompareConfig::default()).await?;
/// println!("Compared {} tables", rows.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_comparison(
    source: &DatabaseConfig,
    target: &DatabaseConfig,
    config: &CompareConfig,
) -> Result<Vec<ComparisonRow>> {
    tracing::info!("Starting table comparison...");

    let source_session = Session::open(DatabaseRole::Source, source)
        .await
        .context("Failed to connect to source database")?;

    let target_session = match Session::open(DatabaseRole::Target, target).await {
        Ok(session) => session,
        Err(e) => {
            source_session.close().await;
            return Err(e).context("Failed to connect to target database");
        }
    };

    let exclusions: BTreeSet<String> = config.exclusions.iter().cloned().collect();
    let outcome = compare_sessions(
        &source_session,
        &target_session,
        &source.schema,
        &target.schema,
        &exclusions,
    )
    .await;

    source_session.close().await;
    target_session.close().await;

    let rows = outcome?;
    write_reports(&rows, config)?;
    Ok(rows)
}

async fn compare_sessions(
    source: &Session,
    target: &Session,
    source_schema: &str,
    target_schema: &str,
    exclusions: &BTreeSet<String>,
) -> Result<Vec<ComparisonRow>> {
    tracing::info!("📋 Fetching table lists...");
    let source_tables = postgres::list_base_tables(source.client(), source_schema)
        .await
        .context("Failed to list tables from source database")?;
    let target_tables = postgres::list_base_tables(target.client(), target_schema)
        .await
        .context("Failed to list tables from target database")?;

    tracing::info!(
        "Found {} table(s) in source schema '{}', {} in target schema '{}'",
        source_tables.len(),
        source_schema,
        target_tables.len(),
        target_schema
    );

    let partition = TablePartition::new(source_tables, target_tables, exclusions);
    log_partition(&partition);

    if partition.is_empty() {
        tracing::warn!("⚠ No tables found to compare");
        return Ok(Vec::new());
    }

    let progress = ProgressBar::new(partition.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    let source_counter = SchemaCounter::new(source.client(), source_schema);
    let target_counter = SchemaCounter::new(target.client(), target_schema);
    let rows = Reconciler::new(&source_counter, &target_counter)
        .with_progress(progress)
        .reconcile(&partition)
        .await;

    Ok(rows)
}

fn log_partition(partition: &TablePartition) {
    let join = |names: &BTreeSet<String>| names.iter().cloned().collect::<Vec<_>>().join(", ");

    tracing::info!("");
    tracing::info!(
        "🧾 Tables in Source Only ({}): [{}]",
        partition.only_source.len(),
        join(&partition.only_source)
    );
    tracing::info!(
        "🧾 Tables in Target Only ({}): [{}]",
        partition.only_target.len(),
        join(&partition.only_target)
    );
    tracing::info!("🔁 Common Tables: {}", partition.common.len());
    tracing::info!("");
}

fn write_reports(rows: &[ComparisonRow], config: &CompareConfig) -> Result<()> {
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    report::write_csv(rows, config.status_encoding, &config.csv_path())
        .context("Failed to write CSV report")?;

    if config.emit_html {
        report::write_html(rows, &config.html_path()).context("Failed to write HTML report")?;
    }

    println!();
    println!("📊 Final Summary:");
    println!("{}", report::render_table(rows, config.status_encoding));

    let summary = ComparisonSummary::from_rows(rows);
    tracing::info!("");
    tracing::info!("========================================");
    tracing::info!("Comparison Summary");
    tracing::info!("========================================");
    tracing::info!("Total tables: {}", summary.total);
    tracing::info!("✓ Matches: {}", summary.matches);
    tracing::info!("✗ Row count mismatches: {}", summary.mismatches);
    tracing::info!("✗ Missing in target: {}", summary.missing_in_target);
    tracing::info!("✗ Missing in source: {}", summary.missing_in_source);
    if summary.errors > 0 {
        tracing::warn!("⚠ Tables with count errors: {}", summary.errors);
    }
    if summary.all_match() {
        tracing::info!("✓ ALL TABLES MATCH");
    } else {
        tracing::warn!(
            "⚠ {} table(s) differ between source and target",
            summary.total - summary.matches
        );
    }
    tracing::info!("========================================");

    Ok(())
}
