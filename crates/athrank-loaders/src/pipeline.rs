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

//! Runs the stages in order: snapshot, ATH enrichment, launch dates, ranking.
//!
//! Each stage reads what the previous one committed to the store, so the
//! stages never overlap.

use athrank_core::Config;
use std::time::Duration;
use tracing::{info, warn};

use crate::browser::{Browser, HttpBrowser};
use crate::error::LoaderResult;
use crate::loaders::{
  AthEnricher, AthEnricherConfig, AthEnrichmentReport, LaunchDateEnricher, LaunchDateReport,
  MarketSnapshotFetcher, SnapshotReport,
};
use crate::providers::{CoinMarketCapProvider, CryptoRankProvider};
use crate::ranking::{RankedCoin, RankingEngine};
use crate::store::{JsonRecordStore, RecordStore};
use crate::traits::{LaunchDateProvider, MarketDataProvider};

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
  /// `None` when an existing store was resumed instead of re-seeded
  pub snapshot: Option<SnapshotReport>,
  pub ath: AthEnrichmentReport,
  pub launch_dates: LaunchDateReport,
  pub ranking: Vec<RankedCoin>,
}

pub struct Pipeline {
  config: Config,
  store: Box<dyn RecordStore>,
  market: Box<dyn MarketDataProvider>,
  launch: Box<dyn LaunchDateProvider>,
  browser: Box<dyn Browser>,
}

impl Pipeline {
  pub fn new(
    config: Config,
    store: Box<dyn RecordStore>,
    market: Box<dyn MarketDataProvider>,
    launch: Box<dyn LaunchDateProvider>,
    browser: Box<dyn Browser>,
  ) -> Self {
    Self { config, store, market, launch, browser }
  }

  /// Wire the production collaborators: JSON store, HTTP providers, HTTP browser.
  pub fn from_config(config: Config) -> LoaderResult<Self> {
    config.validate()?;

    let market = CryptoRankProvider::new(
      config.require_cryptorank_key()?,
      config.market_data_base_url.as_str(),
    );
    let launch =
      CoinMarketCapProvider::new(config.require_cmc_key()?, config.launch_date_base_url.as_str());
    let browser = HttpBrowser::new(Duration::from_secs(config.page_timeout_secs))?;
    let store = JsonRecordStore::new(config.store_path.clone());

    Ok(Self::new(config, Box::new(store), Box::new(market), Box::new(launch), Box::new(browser)))
  }

  pub fn store(&self) -> &dyn RecordStore {
    self.store.as_ref()
  }

  pub async fn run(&mut self) -> LoaderResult<PipelineOutput> {
    let snapshot = if self.config.refresh_snapshot || self.store.is_empty().await? {
      let fetcher = MarketSnapshotFetcher::new(self.market.as_ref(), self.config.top_coins_count);
      Some(fetcher.seed(self.store.as_ref()).await?)
    } else {
      info!("Store already holds records, resuming without a new snapshot");
      None
    };

    let ath = AthEnricher::new(AthEnricherConfig::from(&self.config))
      .enrich(self.store.as_ref(), self.browser.as_mut())
      .await?;

    let launch_dates = LaunchDateEnricher::new(self.config.launch_batch_size)?
      .enrich(self.store.as_ref(), self.launch.as_ref())
      .await?;

    let records = self.store.load().await?;
    let (complete, pending): (Vec<_>, Vec<_>) = records.into_iter().partition(|r| r.is_enriched());
    if !pending.is_empty() {
      warn!(
        "{} records still lack an ATH market cap and are left out of the ranking",
        pending.len()
      );
    }

    let filtered =
      RankingEngine::filter(complete, self.config.cutoff_date, self.config.filter_enabled);
    let ranking = RankingEngine::new(self.config.coin_page_base_url.as_str()).rank(&filtered)?;

    info!("Ranked {} coins", ranking.len());
    Ok(PipelineOutput { snapshot, ath, launch_dates, ranking })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::browser::PageRegion;
  use crate::error::LoaderError;
  use crate::store::MemoryRecordStore;
  use crate::types::{CoinRecord, LaunchInfo};
  use async_trait::async_trait;
  use std::collections::HashMap;

  struct FixedMarket(Vec<CoinRecord>);

  #[async_trait]
  impl MarketDataProvider for FixedMarket {
    async fn fetch_top(&self, limit: u32) -> Result<Vec<CoinRecord>, LoaderError> {
      Ok(self.0.iter().take(limit as usize).cloned().collect())
    }

    fn source_name(&self) -> &'static str {
      "fixed"
    }
  }

  struct NoLaunchDates;

  #[async_trait]
  impl LaunchDateProvider for NoLaunchDates {
    async fn fetch_launch_info(&self, _: &[String]) -> Result<Vec<LaunchInfo>, LoaderError> {
      Ok(Vec::new())
    }

    fn source_name(&self) -> &'static str {
      "none"
    }
  }

  /// Every page shows the ATH text registered for its URL.
  #[derive(Default)]
  struct StaticPages {
    pages: HashMap<String, String>,
    current: Option<String>,
  }

  #[async_trait]
  impl Browser for StaticPages {
    async fn navigate(&mut self, url: &str) -> LoaderResult<()> {
      self.current = Some(url.to_string());
      Ok(())
    }

    async fn wait_for_network_idle(&mut self) -> LoaderResult<()> {
      Ok(())
    }

    async fn query_by_label(&self, label: &str) -> LoaderResult<Option<PageRegion>> {
      let ath = self.current.as_ref().and_then(|url| self.pages.get(url));
      Ok(ath.map(|ath| PageRegion::new(vec![label.to_string(), ath.clone()])))
    }
  }

  fn pipeline(store: MemoryRecordStore, market: Vec<CoinRecord>) -> Pipeline {
    let config = Config { show_progress: false, ..Config::default() };
    let mut browser = StaticPages::default();
    for (key, ath) in [("bitcoin", "$2B"), ("ethereum", "$300M")] {
      browser.pages.insert(format!("{}/{}", config.coin_page_base_url, key), ath.to_string());
    }
    Pipeline::new(
      config,
      Box::new(store),
      Box::new(FixedMarket(market)),
      Box::new(NoLaunchDates),
      Box::new(browser),
    )
  }

  fn market() -> Vec<CoinRecord> {
    vec![
      CoinRecord::new("bitcoin", "BTC", 1_000_000_000.0),
      CoinRecord::new("ethereum", "ETH", 100_000_000.0),
    ]
  }

  #[tokio::test]
  async fn test_run_seeds_enriches_and_ranks() {
    let mut pipeline = pipeline(MemoryRecordStore::new(), market());

    let output = pipeline.run().await.unwrap();

    assert_eq!(output.snapshot.map(|s| s.seeded), Some(2));
    assert_eq!(output.ath.enriched, 2);
    let keys: Vec<&str> = output.ranking.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["ethereum", "bitcoin"]);
    assert_eq!(output.ranking[0].ratio, 3.0);
  }

  #[tokio::test]
  async fn test_existing_store_skips_snapshot() {
    let mut done = CoinRecord::new("ethereum", "ETH", 100_000_000.0);
    done.ath_market_cap = Some(1_000_000_000);
    let store = MemoryRecordStore::with_records(vec![done]).unwrap();
    let mut pipeline = pipeline(store, market());

    let output = pipeline.run().await.unwrap();

    assert!(output.snapshot.is_none());
    assert_eq!(output.ath.enriched, 0);
    assert_eq!(pipeline.store().load().await.unwrap().len(), 1);
    assert_eq!(output.ranking[0].ratio, 10.0);
  }

  #[test]
  fn test_from_config_requires_keys() {
    let err = Pipeline::from_config(Config::default()).err().unwrap();
    assert!(matches!(err, LoaderError::Config(ref m) if m.contains("CRYPTORANK_API_KEY")));

    let config = Config { cryptorank_api_key: Some("k".to_string()), ..Config::default() };
    let err = Pipeline::from_config(config).err().unwrap();
    assert!(matches!(err, LoaderError::Config(ref m) if m.contains("CMC_API_KEY")));
  }

  #[test]
  fn test_from_config_with_keys() {
    let config = Config {
      cryptorank_api_key: Some("cr".to_string()),
      cmc_api_key: Some("cmc".to_string()),
      ..Config::default()
    };
    assert!(Pipeline::from_config(config).is_ok());
  }
}
