/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Resumable ATH market-cap scraping.
//!
//! A record without `athMarketCap` is pending; one with it is done. Each pass
//! walks the store in order, skips finished records, and commits every record
//! through [`RecordStore::upsert`] (or [`RecordStore::delete`]) before moving on,
//! so stopping the process at any point loses at most the record in flight and
//! the next run picks up where this one stopped.
//!
//! A page timeout ends the pass; after a fixed pause a new pass starts from the
//! top, which only costs the records still pending. Passes are bounded by
//! [`RetryConfig::max_attempts`].

use athrank_core::{Config, RetryConfig, ThousandsFactor};
use indicatif::ProgressBar;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::browser::Browser;
use crate::error::{LoaderError, LoaderResult};
use crate::number_parser::NumberParser;
use crate::store::RecordStore;
use crate::types::CoinRecord;

/// Label of the page region carrying the ATH figure.
pub const ATH_MARKET_CAP_LABEL: &str = "ATH Market Cap";

/// Index of the value text inside the labelled region (0 is the label).
const VALUE_TEXT_INDEX: usize = 1;

/// Configuration for the ATH stage
#[derive(Debug, Clone)]
pub struct AthEnricherConfig {
  pub page_base_url: String,
  pub retry: RetryConfig,
  pub thousands_factor: ThousandsFactor,
  /// Leave records whose page cannot be read pending and carry on
  pub skip_failed_pages: bool,
  pub show_progress: bool,
}

impl Default for AthEnricherConfig {
  fn default() -> Self {
    Self::from(&Config::default())
  }
}

impl From<&Config> for AthEnricherConfig {
  fn from(config: &Config) -> Self {
    Self {
      page_base_url: config.coin_page_base_url.clone(),
      retry: config.retry,
      thousands_factor: config.thousands_factor,
      skip_failed_pages: config.skip_failed_pages,
      show_progress: config.show_progress,
    }
  }
}

/// Counts from one ATH run, across all passes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AthEnrichmentReport {
  /// Records that already had a figure when the run started
  pub already_enriched: usize,
  pub enriched: usize,
  pub deleted: usize,
  /// Records left pending under `skip_failed_pages`
  pub failed: Vec<String>,
  pub passes: u32,
}

enum Outcome {
  Enriched,
  Deleted,
}

pub struct AthEnricher {
  config: AthEnricherConfig,
  parser: NumberParser,
}

impl AthEnricher {
  pub fn new(config: AthEnricherConfig) -> Self {
    let parser = NumberParser::new(config.thousands_factor);
    Self { config, parser }
  }

  /// Run passes until every record is enriched, deleted, or (when skipping)
  /// failed, or until the retry budget is spent.
  pub async fn enrich<B>(
    &self,
    store: &dyn RecordStore,
    browser: &mut B,
  ) -> LoaderResult<AthEnrichmentReport>
  where
    B: Browser + ?Sized,
  {
    let mut report = AthEnrichmentReport::default();
    let mut failed = HashSet::new();
    let max_attempts = self.config.retry.max_attempts.max(1);

    loop {
      report.passes += 1;

      match self.run_pass(store, browser, &mut report, &mut failed).await {
        Ok(()) => break,
        Err(LoaderError::Timeout { key, .. }) if report.passes < max_attempts => {
          warn!(
            "Timed out loading {} (pass {}/{}), retrying in {}ms",
            key, report.passes, max_attempts, self.config.retry.backoff_ms
          );
          tokio::time::sleep(Duration::from_millis(self.config.retry.backoff_ms)).await;
        }
        Err(LoaderError::Timeout { key, .. }) => {
          error!("Giving up on ATH enrichment after {} passes", report.passes);
          return Err(LoaderError::Timeout { key, attempts: report.passes });
        }
        Err(e) => return Err(e),
      }
    }

    info!(
      "ATH enrichment complete: {} enriched, {} deleted, {} already done, {} failed, {} pass(es)",
      report.enriched,
      report.deleted,
      report.already_enriched,
      report.failed.len(),
      report.passes
    );
    Ok(report)
  }

  async fn run_pass<B>(
    &self,
    store: &dyn RecordStore,
    browser: &mut B,
    report: &mut AthEnrichmentReport,
    failed: &mut HashSet<String>,
  ) -> LoaderResult<()>
  where
    B: Browser + ?Sized,
  {
    let records = store.load().await?;
    let total = records.len();

    if report.passes == 1 {
      report.already_enriched = records.iter().filter(|r| r.is_enriched()).count();
    }

    let pending: Vec<(usize, CoinRecord)> = records
      .into_iter()
      .enumerate()
      .filter(|(_, r)| !r.is_enriched() && !failed.contains(&r.key))
      .collect();

    if pending.is_empty() {
      debug!("No records pending ATH enrichment");
      return Ok(());
    }

    let progress = self.config.show_progress.then(|| ProgressBar::new(pending.len() as u64));

    for (index, record) in pending {
      info!("{}/{} Parsing ATH market cap for {}", index + 1, total, record.key);
      if let Some(pb) = &progress {
        pb.set_message(record.key.clone());
      }

      match self.process_record(store, browser, &record).await {
        Ok(Outcome::Enriched) => report.enriched += 1,
        Ok(Outcome::Deleted) => report.deleted += 1,
        Err(e @ LoaderError::Enrichment { .. }) if self.config.skip_failed_pages => {
          error!("Skipping {}: {}", record.key, e);
          failed.insert(record.key.clone());
          report.failed.push(record.key);
        }
        Err(e) => {
          if let Some(pb) = &progress {
            pb.abandon();
          }
          return Err(e);
        }
      }

      if let Some(pb) = &progress {
        pb.inc(1);
      }
    }

    if let Some(pb) = progress {
      pb.finish_with_message("ATH enrichment pass complete");
    }
    Ok(())
  }

  async fn process_record<B>(
    &self,
    store: &dyn RecordStore,
    browser: &mut B,
    record: &CoinRecord,
  ) -> LoaderResult<Outcome>
  where
    B: Browser + ?Sized,
  {
    if !record.has_valid_symbol() {
      info!("Removing {}: symbol {:?} is not alphanumeric", record.key, record.symbol);
      store.delete(&record.key).await?;
      return Ok(Outcome::Deleted);
    }

    let ath = self.scrape_ath(browser, record).await?;
    store.upsert(&record.key, Box::new(move |r| r.ath_market_cap = Some(ath))).await?;

    debug!("{} ATH market cap {}", record.key, ath);
    Ok(Outcome::Enriched)
  }

  async fn scrape_ath<B>(&self, browser: &mut B, record: &CoinRecord) -> LoaderResult<u64>
  where
    B: Browser + ?Sized,
  {
    let key = record.key.as_str();
    let keyed = |e: LoaderError| match e {
      LoaderError::Timeout { attempts, .. } => {
        LoaderError::Timeout { key: key.to_string(), attempts }
      }
      LoaderError::Enrichment { reason, .. } => LoaderError::enrichment(key, reason),
      other => other,
    };

    browser.navigate(&record.page_url(&self.config.page_base_url)).await.map_err(keyed)?;
    browser.wait_for_network_idle().await.map_err(keyed)?;

    let region = browser
      .query_by_label(ATH_MARKET_CAP_LABEL)
      .await
      .map_err(keyed)?
      .ok_or_else(|| {
        LoaderError::enrichment(key, format!("no {:?} region", ATH_MARKET_CAP_LABEL))
      })?;

    let text = region
      .text(VALUE_TEXT_INDEX)
      .ok_or_else(|| LoaderError::enrichment(key, "ATH region has no value text"))?;

    self.parser.parse(text).map_err(|e| LoaderError::enrichment(key, e.to_string()))
  }
}
