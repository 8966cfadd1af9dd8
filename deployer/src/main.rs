//! appdeploy - Entry Point
//!
//! Deploys a container image to DigitalOcean App Platform and waits for the
//! rollout, or tears a released app down again.

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use appdeploy::authn::probe::{auth_help, validate_auth};
use appdeploy::deploy::fsm::FsmSettings;
use appdeploy::deploy::lock::NameLocks;
use appdeploy::deploy::release::{destroy, release};
use appdeploy::errors::DeployError;
use appdeploy::http::client::HttpClient;
use appdeploy::logs::{init_logging, LogOptions};
use appdeploy::models::deployment::{ImageRef, Release};
use appdeploy::status::TerminalStatus;
use appdeploy::storage::layout::StorageLayout;
use appdeploy::storage::settings::{Settings, ACCESS_TOKEN_ENV};
use appdeploy::utils::version_info;
use appdeploy::workers::deployer::{self, Deployer};

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

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
            Err(e) => eprintln!("Failed to render version: {e}"),
        }
        return ExitCode::SUCCESS;
    }

    let layout = match cli_args.get("dir") {
        Some(dir) => StorageLayout::new(dir),
        None => StorageLayout::default(),
    };

    let settings = match load_settings(&layout).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings file: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        json_format: settings.json_logs,
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        await_shutdown_signal().await;
        cancel_on_signal.cancel();
    });

    let result = if cli_args.contains_key("auth") {
        run_auth(&settings, &cancel).await
    } else if cli_args.contains_key("deploy") {
        run_deploy(&settings, &layout, &cli_args, &cancel).await
    } else if cli_args.contains_key("destroy") {
        run_destroy(&settings, &layout, &cancel).await
    } else {
        eprintln!("Usage: appdeploy [--dir=<settings dir>] --deploy --image=<repository> [--tag=<tag>] [--app=<name>]");
        eprintln!("       appdeploy [--dir=<settings dir>] --destroy | --auth | --version");
        return ExitCode::FAILURE;
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn load_settings(layout: &StorageLayout) -> Result<Settings, DeployError> {
    let settings_file = layout.settings_file();
    if !settings_file.exists().await {
        return Ok(Settings::default());
    }
    settings_file.read_json::<Settings>().await
}

fn platform_client(settings: &Settings) -> Result<HttpClient, DeployError> {
    let token = settings
        .api
        .resolve_access_token(env::var(ACCESS_TOKEN_ENV).ok())?;
    HttpClient::new(&settings.api.base_url, token)
}

async fn run_auth(settings: &Settings, cancel: &CancellationToken) -> Result<(), DeployError> {
    let client = match platform_client(settings) {
        Ok(client) => client,
        Err(e) => {
            println!("{}", auth_help());
            return Err(e);
        }
    };

    validate_auth(&client, &TerminalStatus, cancel).await?;
    Ok(())
}

async fn run_deploy(
    settings: &Settings,
    layout: &StorageLayout,
    cli_args: &HashMap<String, String>,
    cancel: &CancellationToken,
) -> Result<(), DeployError> {
    let image = ImageRef {
        image: cli_args
            .get("image")
            .cloned()
            .ok_or_else(|| DeployError::ConfigError("--image is required".to_string()))?,
        tag: cli_args
            .get("tag")
            .cloned()
            .unwrap_or_else(|| "latest".to_string()),
    };
    let desired = settings
        .deploy
        .resolve(cli_args.get("app").map(String::as_str))?;

    let client = Arc::new(platform_client(settings)?);
    let options = deployer::Options {
        locator: (&settings.locator).into(),
        fsm_settings: FsmSettings::try_from(&settings.poller)?,
    };
    let deployer = Deployer::new(client, Arc::new(NameLocks::new()), options);

    let outcome = deployer
        .deploy(&desired, &image, &TerminalStatus, tokio::time::sleep, cancel)
        .await?;
    let deployment = outcome.into_deployment(&desired.name)?;

    let handle = release(&deployment);
    layout.release_file().write_json(&handle).await?;
    info!("Release handle written to {}", layout.release_file().path().display());

    Ok(())
}

async fn run_destroy(
    settings: &Settings,
    layout: &StorageLayout,
    cancel: &CancellationToken,
) -> Result<(), DeployError> {
    let release_file = layout.release_file();
    if !release_file.exists().await {
        return Err(DeployError::NotFound(format!(
            "no release handle at {}",
            release_file.path().display()
        )));
    }
    let release: Release = release_file.read_json().await?;

    let client = platform_client(settings)?;
    destroy(&client, &release, &TerminalStatus, cancel).await?;
    release_file.delete().await?;

    Ok(())
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                _ => {
                    error!("Failed to install signal handlers, falling back to Ctrl+C");
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, cancelling...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, cancelling...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, cancelling...");
        }
    }
}
