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

//! Seeds the record store from the bulk market-data provider.

use std::collections::HashSet;
use tracing::{info, warn};

use crate::error::LoaderResult;
use crate::store::RecordStore;
use crate::traits::MarketDataProvider;

/// Counts from one snapshot run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotReport {
  pub fetched: usize,
  pub seeded: usize,
  pub duplicates_dropped: usize,
  pub unusable_market_cap: usize,
}

/// Pulls the top-N snapshot and replaces the store contents with it.
pub struct MarketSnapshotFetcher<'a> {
  provider: &'a dyn MarketDataProvider,
  limit: u32,
}

impl<'a> MarketSnapshotFetcher<'a> {
  pub fn new(provider: &'a dyn MarketDataProvider, limit: u32) -> Self {
    Self { provider, limit }
  }

  pub async fn seed(&self, store: &dyn RecordStore) -> LoaderResult<SnapshotReport> {
    let coins = self.provider.fetch_top(self.limit).await?;

    let mut report = SnapshotReport { fetched: coins.len(), ..Default::default() };
    let mut seen = HashSet::with_capacity(coins.len());
    let mut records = Vec::with_capacity(coins.len());

    for coin in coins {
      if !seen.insert(coin.key.clone()) {
        warn!(
          "Duplicate key {} in {} snapshot, keeping first",
          coin.key,
          self.provider.source_name()
        );
        report.duplicates_dropped += 1;
        continue;
      }
      // nothing can be ranked against a zero or missing market cap
      let market_cap = coin.market_cap.value();
      if !(market_cap.is_finite() && market_cap > 0.0) {
        warn!("Dropping {}: market cap {} is not positive", coin.key, coin.market_cap.raw());
        report.unusable_market_cap += 1;
        continue;
      }
      records.push(coin);
    }

    report.seeded = records.len();
    store.save(records).await?;

    info!(
      "Snapshot seeded {} of {} coins from {}",
      report.seeded,
      report.fetched,
      self.provider.source_name()
    );
    Ok(report)
  }
}
