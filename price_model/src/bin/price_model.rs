use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use feed_reader::{
    models::{bar_table::BarTable, request_params::BarsRequestParams},
    providers::{DataProvider, alpaca_rest::AlpacaProvider},
};
use price_model::{
    classify::label_table,
    config::PipelineConfig,
    learner::LinearLearner,
    session::{evaluate, predict_next, prepare, train},
    timer::EpochTimer,
};
use shared_utils::logging::init_tracing;
use tracing::warn;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Pipeline config file (TOML)
    #[arg(short, long, default_value = "pipeline.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch bars and report how many samples they yield
    Prepare,
    /// Train the linear learner, then report holdout RMSE and the next close
    Train,
    /// Print a buy/hold/sell label for every bar
    Classify,
}

async fn fetch_table(config: &PipelineConfig) -> anyhow::Result<BarTable> {
    let params = BarsRequestParams::trailing(
        config.symbol.clone(),
        config.timeframe()?,
        config.lookback_days,
        Utc::now(),
    );
    let provider = AlpacaProvider::new().context("creating alpaca provider")?;
    provider
        .fetch_bars(params)
        .await?
        .into_iter()
        .find(|t| t.symbol() == config.symbol)
        .with_context(|| format!("no bars returned for {}", config.symbol))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info");

    let cli = Cli::parse();
    let config = PipelineConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let table = fetch_table(&config).await?;

    match cli.command {
        Command::Prepare => {
            let data = prepare(&table, &config.window)?;
            println!(
                "{}: {} rows, {} training samples, {} holdout samples",
                table.symbol(),
                data.series.rows(),
                data.train.len(),
                data.holdout.len()
            );
        }

        Command::Train => {
            let data = prepare(&table, &config.window)?;
            let mut learner = LinearLearner::new();
            let mut timer = EpochTimer::new();
            let report = train(&mut learner, &data, &config.training, &mut timer)?;
            println!(
                "trained {} epochs in {:.3}s, final loss {:.6}",
                report.history.epoch_losses.len(),
                report.total.as_secs_f64(),
                report.history.final_loss().unwrap_or(f64::NAN)
            );

            if data.holdout.is_empty() {
                warn!("no holdout samples, skipping evaluation");
            } else {
                let evaluation = evaluate(&learner, &data)?;
                println!("holdout rmse {:.4} over {} samples", evaluation.rmse, evaluation.samples);
            }

            let next = predict_next(&learner, &data.series, config.window.window_length)?;
            println!("next close {next:.2}");
        }

        Command::Classify => {
            let labels = label_table(&table, &config.thresholds)?;
            for (bar, label) in table.iter().zip(labels) {
                println!("{}\t{label}", bar.timestamp.format("%Y-%m-%d %H:%M"));
            }
        }
    }

    Ok(())
}
