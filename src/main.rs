use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use solar_estimator::config::{Command, StoreKind};
use solar_estimator::domain::irradiance::IrradianceQuery;
use solar_estimator::utils::{logger, validation::Validate};
use solar_estimator::{AppConfig, CliConfig, Services};

fn load_config(cli: &CliConfig) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => AppConfig::default(),
    };

    if let Some(records) = &cli.records {
        config.store.r#type = StoreKind::Memory;
        config.store.csv_path = Some(records.clone());
    }
    if let Command::Serve {
        bind: Some(bind), ..
    } = &cli.command
    {
        config.server.bind = bind.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match &cli.command {
        Command::Serve {
            json_logs: true, ..
        } => logger::init_server_logger(cli.verbose),
        _ => logger::init_cli_logger(cli.verbose),
    }

    tracing::info!("Starting solar-estimator");
    tracing::debug!("CLI config: {:?}", cli);

    let config = load_config(&cli)?;
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let services = Services::from_config(&config)?;

    match &cli.command {
        Command::Serve { .. } => {
            let addr = config.bind_addr()?;
            solar_estimator::api::serve(Arc::new(services), addr).await?;
        }
        Command::Estimate { input } => {
            let raw = tokio::fs::read_to_string(input)
                .await
                .with_context(|| format!("failed to read {}", input))?;
            let body: serde_json::Value =
                serde_json::from_str(&raw).with_context(|| format!("{} is not JSON", input))?;

            match services.batch.run(&body).await {
                Ok(results) => println!("{}", serde_json::to_string_pretty(&results)?),
                Err(e) => {
                    eprintln!("❌ {}", e);
                    println!("{}", serde_json::to_string_pretty(&e.to_body())?);
                    std::process::exit(2);
                }
            }
        }
        Command::Irradiance {
            lat,
            lon,
            angle,
            aspect,
        } => {
            let query = IrradianceQuery {
                lat: Some(lat.clone()),
                lon: Some(lon.clone()),
                angle: angle.clone(),
                aspect: aspect.clone(),
            };
            match services.irradiance.fetch(&query).await {
                Ok(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
                Err(e) => {
                    eprintln!("❌ {} ({})", e, e.status_code());
                    std::process::exit(if e.is_client_error() { 2 } else { 1 });
                }
            }
        }
    }

    Ok(())
}
