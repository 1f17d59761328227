use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use feed_reader::{
    cli::{
        commands::{Cli, Commands},
        params::build_request,
    },
    news::{FinvizNewsSource, fetch_news},
    providers::{DataProvider, alpaca_rest::AlpacaProvider},
};
use shared_utils::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info");

    let cli = Cli::parse();

    match cli.command {
        Commands::Bars {
            symbols,
            amount,
            unit,
            start,
            end,
            out,
        } => {
            let params = build_request(&symbols, amount, &unit, &start, &end)?;
            let provider = AlpacaProvider::new().context("creating alpaca provider")?;
            let tables = provider.fetch_bars(params).await?;

            match out {
                #[cfg(feature = "ipc")]
                Some(dir) => {
                    use feed_reader::io::{dataframe::FeatherSink, sink::DataSink};

                    for path in FeatherSink::new(dir).write(&tables).await? {
                        println!("{}", path.display());
                    }
                }
                #[cfg(not(feature = "ipc"))]
                Some(_) => anyhow::bail!("--out needs the `ipc` feature"),
                None => println!("{}", serde_json::to_string_pretty(&tables)?),
            }
        }

        Commands::News { symbol } => {
            let source = FinvizNewsSource::new()?;
            let items = fetch_news(&source, &symbol, Utc::now().date_naive()).await?;
            for item in items {
                println!("{}\t{}", item.timestamp_text, item.headline);
            }
        }
    }

    Ok(())
}
