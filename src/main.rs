// Copyright 2025 The Econ Model API Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Allow println! in main.rs for CLI user-facing output
#![allow(clippy::print_stdout)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use econ_model_api::config::{load_config_file, save_config_file, ServerConfig};
use econ_model_api::resources;
use econ_model_api::ApiServer;

#[derive(Parser)]
#[command(name = "econ-model-api")]
#[command(about = "REST API for econ models with batch validation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the configuration file
    #[arg(short, long, default_value = "config/server.yaml", global = true)]
    config: PathBuf,

    /// Override the server port
    #[arg(short, long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server (default if no subcommand specified)
    Run,

    /// Validate a configuration file without starting the server
    Validate {
        /// Print the configuration with environment variables expanded
        #[arg(long)]
        show_resolved: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Run) => run_server(&cli.config, cli.port).await,
        Some(Commands::Validate { show_resolved }) => validate_config(&cli.config, show_resolved),
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn run_server(config_path: &Path, port_override: Option<u16>) -> Result<()> {
    let existed = config_path.exists();
    let mut config = if existed {
        load_config_file(config_path)?
    } else {
        let config = ServerConfig::default();
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        save_config_file(&config, config_path)?;
        config
    };
    if let Some(port) = port_override {
        config.port = port;
        config.validate()?;
    }

    init_logging(&config.log_level);
    if !existed {
        warn!(
            "Config file '{}' not found. Wrote the default configuration.",
            config_path.display()
        );
    }
    info!("Config file: {}", config_path.display());
    debug!("Server configuration: {config:?}");

    ApiServer::new(config).run().await
}

fn validate_config(config_path: &Path, show_resolved: bool) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!("[ERROR] Configuration file not found: {}", config_path.display());
        std::process::exit(1);
    }

    match load_config_file(config_path) {
        Ok(config) => {
            println!("[OK] Configuration file is valid");
            println!();
            println!("Summary:");
            println!("  Listen: {}:{}", config.host, config.port);
            println!("  Log level: {}", config.log_level);
            println!(
                "  Record limits: read {}, write {}, default take {}",
                config.engine.read_record_limit,
                config.engine.write_record_limit,
                config.engine.default_take
            );
            println!("  Reference projects: {}", config.references.len());
            let kinds: Vec<&str> = resources::all().iter().map(|r| r.kind).collect();
            println!("  Resources: {}", kinds.join(", "));

            if show_resolved {
                println!();
                println!("Resolved configuration:");
                print!("{}", serde_yaml::to_string(&config)?);
            }
            Ok(())
        }
        Err(e) => {
            println!("[ERROR] Configuration is invalid:");
            println!("  {e}");
            std::process::exit(1);
        }
    }
}
