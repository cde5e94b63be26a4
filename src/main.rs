use clap::Parser;
use gatherer_sql::{run, Args, Config, HttpFetcher, InquirePrompt};
use log::{error, info, warn};
use std::process::ExitCode;

const QUIT_EXIT_CODE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let fetcher = match HttpFetcher::new(config.timeout, config.retries) {
        Ok(fetcher) => fetcher,
        Err(err) => {
            error!("Failed to build HTTP client: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match run(&config, &fetcher, InquirePrompt).await {
        Ok(report) if report.quit => ExitCode::from(QUIT_EXIT_CODE),
        Ok(report) => {
            info!(
                "Done: {} sets, {} cards, {} files written, {} skipped",
                report.sets,
                report.cards,
                report.written.len(),
                report.skipped.len()
            );
            if report.failures.is_empty() {
                ExitCode::SUCCESS
            } else {
                warn!("{} operations failed", report.failures.len());
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
