use crate::config::AppConfig;
use crate::render::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "nbrb")]
#[command(about = "Exchange rates and refinancing rate of the National Bank of the Republic of Belarus")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file (default: ./nbrb.toml if present)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Currency code cache file")]
    pub cache: Option<String>,

    #[arg(long, global = true, help = "Base URL of the bank API")]
    pub base_url: Option<String>,

    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Download the table mapping ISO codes (USD) to the bank's internal currency codes
    Init,

    /// Official exchange rates
    Rate {
        /// Currency to show, all currencies when omitted
        currency: Option<String>,

        #[arg(short = 'd', long, conflicts_with_all = ["from", "to"], help = "Date of the rate")]
        date: Option<String>,

        #[arg(long, requires = "to", help = "Start of the period")]
        from: Option<String>,

        #[arg(long, requires = "from", help = "End of the period")]
        to: Option<String>,

        #[arg(short = 'g', long, help = "Draw a chart of the period")]
        chart: bool,
    },

    /// Refinancing rate
    #[command(name = "ref")]
    Refinancing {
        #[arg(short = 'd', long, conflicts_with_all = ["all", "from", "to"], help = "Date of the rate")]
        date: Option<String>,

        #[arg(short = 'a', long, help = "Whole history of the rate")]
        all: bool,

        #[arg(long, requires = "to", help = "Start of the period")]
        from: Option<String>,

        #[arg(long, requires = "from", help = "End of the period")]
        to: Option<String>,

        #[arg(short = 'g', long, help = "Draw a chart of the rate history")]
        chart: bool,
    },

    /// Convert an amount between currencies, e.g. `conv 100 usd eur`
    Conv {
        amount: String,
        cur_from: String,
        cur_to: String,

        #[arg(short = 'd', long, help = "Date of the rates")]
        date: Option<String>,
    },
}

impl CliConfig {
    /// Command line flags win over the configuration file.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(cache) = &self.cache {
            config.cache.path = Some(cache.clone());
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
    }
}

impl Command {
    /// `-g` draws a chart; `ref --all` plots the history by itself when the
    /// output is a table.
    pub fn draws_chart(&self, format: OutputFormat) -> bool {
        match self {
            Command::Rate { chart, .. } => *chart,
            Command::Refinancing { chart, all, .. } => {
                *chart || (*all && format == OutputFormat::Table)
            }
            Command::Init | Command::Conv { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_with_range() {
        let cli = CliConfig::try_parse_from([
            "nbrb", "rate", "usd", "--from", "01.07.16", "--to", "30.07.16", "-g",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Rate {
                currency: Some("usd".to_string()),
                date: None,
                from: Some("01.07.16".to_string()),
                to: Some("30.07.16".to_string()),
                chart: true,
            }
        );
    }

    #[test]
    fn test_range_needs_both_ends() {
        assert!(CliConfig::try_parse_from(["nbrb", "rate", "usd", "--from", "01.07.16"]).is_err());
        assert!(CliConfig::try_parse_from([
            "nbrb", "rate", "usd", "-d", "01.07.16", "--from", "01.07.16", "--to", "02.07.16"
        ])
        .is_err());
    }

    #[test]
    fn test_refinancing_and_conversion() {
        let cli = CliConfig::try_parse_from(["nbrb", "ref", "--all", "-g"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Refinancing { all: true, chart: true, .. }
        ));

        let cli =
            CliConfig::try_parse_from(["nbrb", "conv", "100", "usd", "eur", "-d", "010119"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Conv {
                amount: "100".to_string(),
                cur_from: "usd".to_string(),
                cur_to: "eur".to_string(),
                date: Some("010119".to_string()),
            }
        );
    }

    #[test]
    fn test_full_refinancing_history_is_plotted() {
        let all = CliConfig::try_parse_from(["nbrb", "ref", "--all"]).unwrap();
        assert!(all.command.draws_chart(OutputFormat::Table));
        assert!(!all.command.draws_chart(OutputFormat::Csv));

        let on_date = CliConfig::try_parse_from(["nbrb", "ref", "-d", "01.01.19"]).unwrap();
        assert!(!on_date.command.draws_chart(OutputFormat::Table));

        let rate = CliConfig::try_parse_from(["nbrb", "rate", "usd"]).unwrap();
        assert!(!rate.command.draws_chart(OutputFormat::Table));

        let explicit = CliConfig::try_parse_from(["nbrb", "rate", "usd", "-g"]).unwrap();
        assert!(explicit.command.draws_chart(OutputFormat::Json));
    }

    #[test]
    fn test_flags_override_config() {
        let cli = CliConfig::try_parse_from([
            "nbrb",
            "--base-url",
            "http://localhost:1/API",
            "--format",
            "json",
            "init",
            "--cache",
            "/tmp/codes.json",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config.api.base_url, "http://localhost:1/API");
        assert_eq!(config.cache_file(), "/tmp/codes.json");
        assert_eq!(config.output.format, OutputFormat::Json);
    }
}
