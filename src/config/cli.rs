use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "solar-estimator")]
#[command(about = "Solar yield and revenue estimation service")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Load solar records from this CSV file")]
    pub records: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start the HTTP API
    Serve {
        #[arg(long, help = "Override server.bind")]
        bind: Option<String>,

        #[arg(long, help = "Emit logs as JSON")]
        json_logs: bool,
    },
    /// Run one batch from a JSON file and print the result mapping
    Estimate {
        #[arg(long)]
        input: String,
    },
    /// Query the irradiance provider once
    Irradiance {
        #[arg(long, allow_hyphen_values = true)]
        lat: String,
        #[arg(long, allow_hyphen_values = true)]
        lon: String,
        #[arg(long, allow_hyphen_values = true)]
        angle: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        aspect: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_irradiance_with_negative_aspect() {
        let cli = CliConfig::parse_from([
            "solar-estimator",
            "irradiance",
            "--lat",
            "48.85",
            "--lon",
            "2.35",
            "--aspect",
            "-45",
        ]);

        match cli.command {
            Command::Irradiance { lat, aspect, .. } => {
                assert_eq!(lat, "48.85");
                assert_eq!(aspect.as_deref(), Some("-45"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = CliConfig::parse_from([
            "solar-estimator",
            "serve",
            "--bind",
            "127.0.0.1:9000",
            "--verbose",
        ]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Serve { bind: Some(_), .. }));
    }
}
