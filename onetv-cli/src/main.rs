mod cli;
mod commands;
mod config;
mod error;
mod output;
mod select;

use crate::{
    cli::{Args, Commands},
    commands::{CommandExecutor, ExtractOptions},
    config::AppConfig,
    error::Result,
};
use clap::Parser;
#[cfg(feature = "colored-output")]
use colored::*;
use std::{process, time::Duration};
use tracing::{Level, error, info};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        error!("Application error: {}", e);
        #[cfg(feature = "colored-output")]
        {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        #[cfg(not(feature = "colored-output"))]
        {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    // Load configuration
    let config = AppConfig::load(args.config.as_deref())?;
    info!("Starting onetv with config: {:?}", config);

    match args.command {
        Commands::Extract {
            url,
            extras,
            output,
            output_file,
            quality,
            format,
            auto_select,
            list,
            no_extras,
        } => {
            let output_format = output.unwrap_or(config.default_output_format);
            let include_extras = config.include_extras && !no_extras;
            let timeout = Duration::from_secs(args.timeout.unwrap_or(config.default_timeout));
            let retries = args.retries.unwrap_or(config.default_retries);

            let executor = executor(config, args.proxy, args.proxy_username, args.proxy_password)?;
            executor
                .extract_single(ExtractOptions {
                    url: &url,
                    extras: extras.as_deref(),
                    output_file: output_file.as_deref(),
                    quality: quality.as_deref(),
                    format: format.as_deref(),
                    auto_select,
                    list,
                    include_extras,
                    output_format,
                    timeout,
                    retries,
                })
                .await?;
        }

        Commands::Channels { output } => {
            executor(config, None, None, None)?.list_channels(&output)?;
        }

        Commands::Completions { shell } => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Args::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        }

        Commands::Config { show, reset } => {
            if reset {
                AppConfig::reset(args.config.as_deref())?;
                println!("✓ Configuration reset to defaults");
            } else if show {
                println!("{}", config.show()?);
            } else {
                println!(
                    "Use --show to display current configuration or --reset to reset to defaults"
                );
            }
        }
    }

    Ok(())
}

/// Command line proxy settings take precedence over the configured ones.
fn executor(
    config: AppConfig,
    proxy: Option<String>,
    proxy_username: Option<String>,
    proxy_password: Option<String>,
) -> Result<CommandExecutor> {
    if proxy.is_some() || proxy_username.is_some() || proxy_password.is_some() {
        CommandExecutor::new_with_proxy(config, proxy, proxy_username, proxy_password)
    } else {
        CommandExecutor::new(config)
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(verbose),
        )
        .with(filter)
        .init();
}
