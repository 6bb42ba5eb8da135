use clap::Parser;
use nbrb_rates::adapters::storage::default_cache_dir;
use nbrb_rates::render::chart::DEFAULT_CHART_HEIGHT;
use nbrb_rates::render::{write_table, LineChart, OutputFormat, Table};
use nbrb_rates::utils::{logger, validation::Validate};
use nbrb_rates::{
    AppConfig, CliConfig, Command, LocalStorage, MappingCache, NbrbClient, RateQuery, RatesError,
    RatesService,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting nbrb");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("❌ Command failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: CliConfig) -> Result<(), RatesError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;
    tracing::debug!("Effective config: {:?}", config);

    // a --cache given on the command line is relative to the working directory
    let cache_dir = if cli.cache.is_some() {
        std::env::current_dir()?
    } else {
        default_cache_dir()
    };
    let storage = LocalStorage::new(cache_dir);
    let cache_location = storage.full_path(config.cache_file());
    let cache = MappingCache::new(storage, config.cache_file());

    let client = NbrbClient::from_config(&config)?;
    let service = RatesService::new(client, cache);
    let format = config.output.format;
    let mut stdout = std::io::stdout();
    let chart = cli.command.draws_chart(format);

    match cli.command {
        Command::Init => {
            let count = service.init_cache().await?;
            println!(
                "✅ Saved {} currency codes to {}",
                count,
                cache_location.display()
            );
        }
        Command::Rate {
            currency,
            date,
            from,
            to,
            ..
        } => {
            let query = RateQuery {
                currency,
                date,
                range: from.zip(to),
            };
            let report = service.rates(&query).await?;
            let table = Table::from_rates(&report.records, report.request.is_series());
            write_table(&table, format, &mut stdout)?;

            if chart {
                show_chart(LineChart::from_rates(&report.records), format)?;
            }
        }
        Command::Refinancing {
            date,
            all,
            from,
            to,
            ..
        } => {
            let range = from.as_deref().zip(to.as_deref());
            let report = service.refinancing(date.as_deref(), all, range).await?;
            write_table(&Table::from_refinancing(&report.rates), format, &mut stdout)?;

            if chart {
                show_chart(LineChart::from_refinancing(&report.rates), format)?;
            }
        }
        Command::Conv {
            amount,
            cur_from,
            cur_to,
            date,
        } => {
            let conversion = service
                .convert(&amount, &cur_from, &cur_to, date.as_deref())
                .await?;
            let table = Table::from_conversion(&conversion, config.output.precision);
            write_table(&table, format, &mut stdout)?;
        }
    }

    Ok(())
}

fn show_chart(chart: LineChart, format: OutputFormat) -> Result<(), RatesError> {
    if format != OutputFormat::Table {
        tracing::warn!("Charts are only drawn with table output");
        return Ok(());
    }
    if chart.len() < 2 {
        eprintln!("A chart needs a period: pass --from and --to (or --all for ref)");
        return Ok(());
    }
    chart.show(DEFAULT_CHART_HEIGHT)
}
