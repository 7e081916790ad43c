//! Apiprobe CLI - End-to-end checks for the superhero and pet-store APIs
//!
//! Run checks against the services to verify their behaviour, waiting out
//! their eventual consistency instead of sleeping.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use apiprobe::checks::{
    Check, CheckContext, CheckError, CheckOptions, CheckResult, OPT_INCLUDE_KNOWN_ISSUES,
    registry::CHECKS,
};
use apiprobe::config::Config;
use apiprobe::utils::{WithId, run_bounded};

/// Apiprobe - end-to-end checks for the superhero and pet-store APIs
#[derive(Debug, Parser)]
#[command(name = "apiprobe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run checks against the services
    Check {
        /// Path to configuration file
        #[arg(short, long, default_value = "apiprobe.yaml")]
        config: String,

        /// Specific checks to run (comma-separated)
        #[arg(short = 'C', long)]
        checks: Option<String>,

        /// Timeout for all checks
        #[arg(short, long, default_value = "30m")]
        timeout: String,

        /// Maximum number of checks running at once
        #[arg(short, long, default_value_t = 1)]
        parallel: usize,

        /// Also run scenarios documenting known service defects
        #[arg(long)]
        include_known_issues: bool,
    },

    /// Generate a default configuration file
    Init {
        /// Output file path
        #[arg(short, long, default_value = "apiprobe.yaml")]
        output: String,
    },

    /// List available checks
    List,

    /// Validate a configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long, default_value = "apiprobe.yaml")]
        config: String,
    },
}

fn setup_logging(verbose: bool, json: bool) {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.json);

    match cli.command {
        Commands::Check {
            config: config_path,
            checks: check_filter,
            timeout,
            parallel,
            include_known_issues,
        } => {
            let timeout = humantime::parse_duration(&timeout)
                .with_context(|| format!("Invalid timeout '{timeout}'"))?;
            run_checks(
                &config_path,
                check_filter.as_deref(),
                timeout,
                parallel,
                include_known_issues,
            )
            .await
        }

        Commands::Init { output } => init_config(&output),

        Commands::List => {
            list_checks();
            Ok(())
        }

        Commands::Validate {
            config: config_path,
        } => validate_config(&config_path),
    }
}

/// Run checks against the services
async fn run_checks(
    config_path: &str,
    check_filter: Option<&str>,
    timeout: Duration,
    parallel: usize,
    include_known_issues: bool,
) -> Result<()> {
    tracing::info!(config = %config_path, "Loading configuration");

    let config = Config::from_file(config_path)
        .with_context(|| format!("Failed to load config from {config_path}"))?;

    tracing::info!(
        superhero = %config.services.superhero.endpoint(),
        petstore = %config.services.petstore.endpoint(),
        wait_timeout = ?config.wait.timeout,
        wait_interval = ?config.wait.interval,
        deadline = %config.wait.deadline,
        "Service configuration loaded"
    );

    let ctx = config
        .to_check_context()
        .context("Failed to create check context")?;

    // Determine which checks to run
    let checks_to_run: Vec<Arc<dyn Check>> = if let Some(filter) = check_filter {
        filter
            .split(',')
            .filter_map(|name| {
                let name = name.trim();
                CHECKS.get(name).cloned().or_else(|| {
                    tracing::warn!(check = name, "Unknown check, skipping");
                    None
                })
            })
            .collect()
    } else {
        // Run all enabled checks from config
        CHECKS
            .iter()
            .filter(|(name, _)| config.is_check_enabled(name))
            .map(|(_, check)| check.clone())
            .collect()
    };

    if checks_to_run.is_empty() {
        tracing::warn!("No checks to run");
        return Ok(());
    }

    tracing::info!(
        count = checks_to_run.len(),
        parallel,
        checks = ?checks_to_run.iter().map(|c| c.name()).collect::<Vec<_>>(),
        "Running checks"
    );

    let items: Vec<_> = checks_to_run
        .into_iter()
        .map(|check| {
            // Get options from config or use defaults
            let mut opts = config
                .check_config(check.name())
                .map(|c| c.to_check_options(&check.default_options()))
                .unwrap_or_else(|| check.default_options());
            if include_known_issues {
                opts = opts.with_extra(OPT_INCLUDE_KNOWN_ISSUES, true);
            }
            WithId::new(check.name(), (check, opts))
        })
        .collect();

    let ctx = &ctx;
    let run = run_bounded(items, parallel, |item| async move {
        let (check, opts) = item.value;
        tracing::info!(check = %check.name(), "Starting check");
        run_with_retries(check.as_ref(), ctx, &opts).await
    });

    let results = tokio::time::timeout(timeout, run)
        .await
        .map_err(|_| anyhow::anyhow!("Checks did not finish within {timeout:?}"))?;

    // Collect results
    let mut all_passed = true;
    for task_result in results {
        let check_name = task_result.id;
        match task_result.value {
            Ok(result) => {
                if result.passed {
                    tracing::info!(
                        check = %check_name,
                        duration_ms = result.duration.as_millis(),
                        message = ?result.message,
                        "Check PASSED"
                    );
                } else {
                    tracing::error!(
                        check = %check_name,
                        duration_ms = result.duration.as_millis(),
                        message = ?result.message,
                        failed_scenarios = result.scenario_results.iter().filter(|r| !r.passed).count(),
                        "Check FAILED"
                    );
                    all_passed = false;
                }

                // Log individual scenario results at debug level
                for scenario in &result.scenario_results {
                    if scenario.passed {
                        tracing::debug!(
                            check = %check_name,
                            scenario = %scenario.scenario,
                            skipped = scenario.is_skipped(),
                            "Scenario passed"
                        );
                    } else {
                        tracing::warn!(
                            check = %check_name,
                            scenario = %scenario.scenario,
                            error = ?scenario.error,
                            "Scenario failed"
                        );
                    }
                }
            }
            Err(e) => {
                tracing::error!(check = %check_name, error = %e, "Check error");
                all_passed = false;
            }
        }
    }

    if all_passed {
        tracing::info!("All checks PASSED");
        Ok(())
    } else {
        tracing::error!("Some checks FAILED");
        anyhow::bail!("Some checks FAILED")
    }
}

/// Run a check, retrying failed runs as configured
///
/// Each attempt is bounded by the check's own timeout.
async fn run_with_retries(
    check: &dyn Check,
    ctx: &CheckContext,
    opts: &CheckOptions,
) -> Result<CheckResult, CheckError> {
    let timeout = opts.timeout_or(Duration::from_secs(300));
    let retry_delay = opts.retry_delay_or(Duration::from_secs(2));
    let mut attempt = 0;

    loop {
        let outcome = match tokio::time::timeout(timeout, check.run(ctx, opts)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(CheckError::Timeout(timeout)),
        };

        let failed = !matches!(&outcome, Ok(result) if result.passed);
        if !failed || attempt >= opts.retries {
            return outcome;
        }

        attempt += 1;
        tracing::warn!(
            check = %check.name(),
            attempt,
            retries = opts.retries,
            delay_ms = retry_delay.as_millis(),
            "Check failed, retrying"
        );
        tokio::time::sleep(retry_delay).await;
    }
}

/// Generate a default configuration file
fn init_config(output: &str) -> Result<()> {
    let config = Config::default_config();
    let yaml = config.to_yaml().context("Failed to serialize config")?;

    std::fs::write(output, &yaml).with_context(|| format!("Failed to write config to {output}"))?;

    tracing::info!(path = %output, "Configuration file created");
    println!("Created {output}");
    println!();
    println!("Edit the file to point at your services, then run:");
    println!("  apiprobe check --config {output}");

    Ok(())
}

/// List available checks
fn list_checks() {
    println!("Available checks (in run order):");
    println!();

    for (name, check) in CHECKS.iter() {
        println!("  {name:20} - {}", check.description());
    }

    println!();
    println!("Run specific checks with:");
    println!("  apiprobe check --checks superhero-create,user-lifecycle");
}

/// Validate a configuration file
fn validate_config(config_path: &str) -> Result<()> {
    tracing::info!(config = %config_path, "Validating configuration");

    let config = Config::from_file(config_path)
        .with_context(|| format!("Failed to load config from {config_path}"))?;

    println!("Configuration is valid!");
    println!();
    println!("Superhero service: {}", config.services.superhero.endpoint());
    println!("Pet-store service: {}", config.services.petstore.endpoint());
    println!(
        "Wait: timeout {}, interval {}, deadline {}",
        humantime::format_duration(config.wait.timeout),
        humantime::format_duration(config.wait.interval),
        config.wait.deadline
    );

    println!();
    println!("Checks configured: {}", config.checks.len());

    let mut names: Vec<_> = config.checks.keys().collect();
    names.sort();
    for name in names {
        let status = if config.is_check_enabled(name) {
            "enabled"
        } else {
            "disabled"
        };
        let known = if CHECKS.contains_key(name.as_str()) {
            ""
        } else {
            " (unknown check)"
        };
        println!("  - {name}: {status}{known}");
    }

    Ok(())
}
