//! Notehub firmware deployer - Entry Point
//!
//! Reads deployment inputs, uploads the host firmware to Notehub and
//! triggers a DFU on the targeted devices.

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use tracing::{error, info};

use notehub_deploy::app::outputs::OutputSink;
use notehub_deploy::config::inputs::Inputs;
use notehub_deploy::deploy::session::{run, STATUS_FAILED};
use notehub_deploy::logs::{init_logging, LogOptions};
use notehub_deploy::utils::version_info;
use notehub_deploy::NotehubClient;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("Failed to encode version info: {e}"),
        }
        return ExitCode::SUCCESS;
    }

    match deploy(&cli_args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Deployment failed:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn deploy(cli_args: &HashMap<String, String>) -> anyhow::Result<()> {
    let inputs = Inputs::load(cli_args).context("invalid deployment inputs")?;

    // Initialize logging
    let log_options = LogOptions {
        log_level: inputs.log_level.clone(),
        json_format: cli_args.contains_key("json-logs"),
    };
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let config = inputs.deployment;
    info!(
        "Deploying {} to project {}",
        config.firmware_file().display(),
        config.project_uid()
    );

    let outputs = OutputSink::from_env();
    let mut client = NotehubClient::new().context("failed to create Notehub client")?;

    match run(&mut client, &config, await_shutdown_signal()).await {
        Ok(outcome) => {
            outputs
                .write(&outcome.status, Some(outcome.firmware_filename.as_str()))
                .await
                .context("failed to write outputs")?;
            eprintln!(
                "{} {} deployed to project {}",
                "✓".green().bold(),
                outcome.firmware_filename,
                config.project_uid()
            );
            Ok(())
        }
        Err(failure) => {
            if let Err(e) = outputs
                .write(STATUS_FAILED, failure.firmware_filename.as_deref())
                .await
            {
                error!("Failed to write outputs: {}", e);
            }
            Err(failure.into())
        }
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                error!("Unable to listen for SIGTERM: {}", e);
                if tokio::signal::ctrl_c().await.is_err() {
                    std::future::pending::<()>().await;
                }
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, cancelling deployment...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, cancelling deployment...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl+C received, cancelling deployment..."),
            Err(_) => std::future::pending::<()>().await,
        }
    }
}
