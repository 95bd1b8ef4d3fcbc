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

//! Merges launch and listing dates into the stored records by symbol.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::error::{LoaderError, LoaderResult};
use crate::store::RecordStore;
use crate::traits::LaunchDateProvider;
use crate::types::{CoinRecord, LaunchInfo};

/// Counts from one launch-date run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchDateReport {
  pub queried_symbols: usize,
  pub batches: usize,
  pub matched_records: usize,
}

/// Queries every stored symbol, chunked to the batch size, and rewrites the
/// store once with the merged dates.
///
/// Nothing is written unless every batch succeeds.
pub struct LaunchDateEnricher {
  batch_size: usize,
}

impl LaunchDateEnricher {
  pub fn new(batch_size: usize) -> LoaderResult<Self> {
    if batch_size == 0 {
      return Err(LoaderError::Config("launch batch size must be at least 1".to_string()));
    }
    Ok(Self { batch_size })
  }

  pub async fn enrich(
    &self,
    store: &dyn RecordStore,
    provider: &dyn LaunchDateProvider,
  ) -> LoaderResult<LaunchDateReport> {
    let mut records = store.load().await?;
    let symbols = unique_symbols(&records);

    let batch_size = effective_batch_size(self.batch_size, provider.max_batch_size());
    let mut report = LaunchDateReport { queried_symbols: symbols.len(), ..Default::default() };

    let mut infos = Vec::new();
    for chunk in symbols.chunks(batch_size) {
      report.batches += 1;
      debug!("Launch-date batch {} with {} symbols", report.batches, chunk.len());
      infos.extend(provider.fetch_launch_info(chunk).await?);
    }

    report.matched_records = merge_launch_info(&mut records, &infos);
    store.save(records).await?;

    info!(
      "Launch dates from {}: {} symbols in {} batch(es), {} records matched",
      provider.source_name(),
      report.queried_symbols,
      report.batches,
      report.matched_records
    );
    Ok(report)
  }
}

/// The configured size, lowered to the provider's cap. Never zero.
fn effective_batch_size(configured: usize, provider_cap: Option<usize>) -> usize {
  provider_cap.map_or(configured, |cap| cap.min(configured)).max(1)
}

/// Symbols in first-seen order, case-insensitively de-duplicated.
fn unique_symbols(records: &[CoinRecord]) -> Vec<String> {
  let mut seen = HashSet::new();
  records
    .iter()
    .filter(|r| !r.symbol.is_empty() && seen.insert(r.symbol.to_ascii_lowercase()))
    .map(|r| r.symbol.clone())
    .collect()
}

/// Copies dates onto every record whose symbol matches, ignoring case. Dates the
/// provider does not report leave the record's field as it was. Returns the
/// number of distinct records touched.
fn merge_launch_info(records: &mut [CoinRecord], infos: &[LaunchInfo]) -> usize {
  let mut matched = HashSet::new();

  for info in infos {
    for (index, record) in records.iter_mut().enumerate() {
      if !record.symbol.eq_ignore_ascii_case(&info.symbol) {
        continue;
      }
      if let Some(launched) = &info.date_launched {
        record.date_launched = Some(launched.clone());
      }
      if let Some(added) = &info.date_added {
        record.date_cmc_added = Some(added.clone());
      }
      matched.insert(index);
    }
  }

  matched.len()
}
