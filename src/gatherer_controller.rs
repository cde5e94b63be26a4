use crate::api::Fetcher;
use crate::card::CardSet;
use crate::card_details::fetch_card;
use crate::config::{Config, WritePolicy};
use crate::error::Error;
use crate::expansions;
use crate::listing::{LinkSource, ListingPages};
use crate::output::{OutputWriter, WriteOutcome};
use crate::prompt::ConflictPrompt;
use crate::sql::{render_cards, render_sets, set_file_name, SETS_FILE_NAME};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::pin::pin;

#[derive(Debug, Default)]
pub struct RunReport {
    pub sets: usize,
    pub cards: usize,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<Error>,
    /// Set when the user answered "quit" at a collision prompt.
    pub quit: bool,
}

pub async fn run<F: Fetcher, P: ConflictPrompt>(
    config: &Config,
    fetcher: &F,
    prompt: P,
) -> Result<RunReport, Error> {
    let mut policy = config.policy;
    let mut writer = OutputWriter::new(prompt);
    let mut report = RunReport::default();

    let mut sets = expansions::resolve(fetcher, &config.catalog, &config.sets).await?;
    info!("Processing {} sets", sets.len());
    report.sets = sets.len();

    let sets_path = config.output_dir.join(SETS_FILE_NAME);
    write_file(&mut writer, &mut policy, &sets_path, &render_sets(&sets), &mut report);
    if report.quit || config.only_sets {
        return Ok(report);
    }

    for set in sets.iter_mut() {
        if let Err(err) = crawl_set(fetcher, config, set).await {
            error!("{}", err);
            report.failures.push(err);
            continue;
        }
        report.cards += set.cards.len();

        let path = config.output_dir.join(set_file_name(&set.name));
        write_file(&mut writer, &mut policy, &path, &render_cards(set), &mut report);
        if report.quit {
            break;
        }
    }

    Ok(report)
}

async fn crawl_set<F: Fetcher>(fetcher: &F, config: &Config, set: &mut CardSet) -> Result<(), Error> {
    let progress = progress_bar(config, &set.name);
    let mut pages = ListingPages::new(fetcher, &config.catalog, &set.name)?;
    let mut page_count = 0;

    while let Some(links) = pages.next_page().await? {
        page_count += 1;
        let other_printings = links
            .iter()
            .filter(|link| link.source == LinkSource::OtherPrinting)
            .count();
        debug!(
            "{} page {}: {} card links ({} other printings)",
            set.name,
            page_count,
            links.len(),
            other_printings
        );

        let mut cards = pin!(stream::iter(&links)
            .map(|link| fetch_card(fetcher, &link.url, config.verbose))
            .buffered(config.concurrency));

        while let Some(card) = cards.next().await {
            set.cards.push(card?);
            progress.inc(1);
        }
    }

    progress.finish_and_clear();
    info!(
        "Retrieved {} cards for {} from {} pages",
        set.cards.len(),
        set.name,
        page_count
    );
    Ok(())
}

fn progress_bar(config: &Config, set_name: &str) -> ProgressBar {
    if config.quiet || config.verbose {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_message(format!("Retrieving {}", set_name));
    bar
}

fn write_file<P: ConflictPrompt>(
    writer: &mut OutputWriter<P>,
    policy: &mut WritePolicy,
    path: &Path,
    content: &str,
    report: &mut RunReport,
) {
    match writer.write(policy, path, content) {
        Ok(WriteOutcome::Written) => report.written.push(path.to_path_buf()),
        Ok(outcome) => {
            report.quit = outcome.is_quit();
            report.skipped.push(path.to_path_buf());
        }
        Err(err) => {
            error!("{}", err);
            report.failures.push(err);
        }
    }
}
