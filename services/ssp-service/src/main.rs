// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Self-service portal backend service
//!
//! Serves the SSP API over HTTP. Providers are enabled by configuration;
//! endpoints of a provider that is not configured answer with a client error.

use anyhow::{Context, Result};
use dropshot::{ConfigDropshot, ConfigLogging, ConfigLoggingLevel, HttpServerStarter};
use ssp_service::config::DEFAULT_PORT;
use ssp_service::{ApiContext, SspConfig};
use tracing::info;

/// Default maximum request body size (bytes).
const DEFAULT_BODY_MAX_BYTES: usize = 1024 * 1024; // 1MB

fn print_version() {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");
    let buildstamp = option_env!("STAMP").unwrap_or("no-STAMP");
    println!("{} {} ({})", name, version, buildstamp);
}

fn print_usage(program: &str) {
    print_version();
    println!("Usage: {} [OPTIONS]", program);
    println!();
    println!("Options:");
    println!("  -h, --help       Display this information");
    println!("  -V, --version    Display the program's version number");
    println!();
    println!("Environment variables:");
    println!("  BIND_ADDRESS       Server bind address (default: 0.0.0.0:$PORT)");
    println!("  PORT               Listen port (default: {})", DEFAULT_PORT);
    println!("  DEBUG              Verbose logging when true");
    println!("  KEYCLOAK_URL       Keycloak base URL (required)");
    println!("  KEYCLOAK_REALM     Keycloak realm (required)");
    println!("  OS_AUTH_URL        OTC identity URL; enables OTC with the other OS_* variables");
    println!("  SEMATEXT_API_KEY   Enables Sematext");
    println!("  TOWER_BASE_URL     Enables Ansible Tower with TOWER_USERNAME/TOWER_PASSWORD");
    println!("  DDC_API            Enables DDC features");
    println!("  CONFIG_FILE        JSON file with OpenShift clusters and Tower policy");
    println!("  RUST_LOG           Log filter (default: ssp_service=info,dropshot=info)");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --version and --help
    let args: Vec<String> = std::env::args().collect();
    #[allow(clippy::never_loop)] // Intentional: early return on first recognized arg
    for arg in &args[1..] {
        match arg.as_str() {
            "-V" | "--version" => {
                print_version();
                return Ok(());
            }
            "-h" | "--help" => {
                print_usage(&args[0]);
                return Ok(());
            }
            _ => {
                eprintln!("Unknown option: {}", arg);
                std::process::exit(1);
            }
        }
    }

    let mut config = SspConfig::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.default_log_filter().to_string()),
        ))
        .init();

    print_version();

    config
        .load_file()
        .await
        .context("Failed to load configuration file")?;
    info!(
        keycloak = %config.keycloak.url,
        realm = %config.keycloak.realm,
        "Keycloak configured"
    );

    let api_context = ApiContext::new(&config).context("Failed to create API context")?;
    let api = ssp_service::api_description()?;

    let config_dropshot = ConfigDropshot {
        bind_address: config.bind_address,
        default_request_body_max_bytes: DEFAULT_BODY_MAX_BYTES,
        default_handler_task_mode: dropshot::HandlerTaskMode::Detached,
        ..Default::default()
    };

    let config_logging = ConfigLogging::StderrTerminal {
        level: if config.debug {
            ConfigLoggingLevel::Debug
        } else {
            ConfigLoggingLevel::Info
        },
    };

    let log = config_logging
        .to_logger("ssp-service")
        .map_err(|error| anyhow::anyhow!("failed to create logger: {}", error))?;

    // Start the server
    let server = HttpServerStarter::new(&config_dropshot, api, api_context, &log)
        .map_err(|error| anyhow::anyhow!("failed to create server: {}", error))?
        .start();

    info!("SSP service running on http://{}", config.bind_address);

    server
        .await
        .map_err(|error| anyhow::anyhow!("server failed: {}", error))
}
