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

//! Launch-date filtering and ranking by ATH-to-current market-cap ratio.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt;
use tracing::{debug, warn};

use crate::error::{LoaderError, LoaderResult};
use crate::types::CoinRecord;

/// One line of the final ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCoin {
  /// 1-based position
  pub rank: usize,
  /// ATH market cap divided by current market cap
  pub ratio: f64,
  pub key: String,
  pub symbol: String,
  pub url: String,
}

impl fmt::Display for RankedCoin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}. Ratio: {:.2}, {}", self.rank, self.ratio, self.url)
  }
}

pub struct RankingEngine {
  page_base_url: String,
}

impl RankingEngine {
  pub fn new(page_base_url: impl Into<String>) -> Self {
    Self { page_base_url: page_base_url.into() }
  }

  /// Keep records launched on or after `cutoff` (midnight UTC).
  ///
  /// The launch date is used when present, the listing date otherwise; records
  /// with neither, or with a date that does not parse, are dropped. With
  /// filtering disabled the input is returned as is.
  pub fn filter(
    records: Vec<CoinRecord>,
    cutoff: NaiveDate,
    filter_enabled: bool,
  ) -> Vec<CoinRecord> {
    if !filter_enabled {
      return records;
    }

    let cutoff = cutoff.and_time(NaiveTime::MIN).and_utc();
    let before = records.len();

    let kept: Vec<CoinRecord> = records
      .into_iter()
      .filter(|record| {
        let Some(raw) = record.launch_timestamp() else {
          debug!("Excluding {}: no launch or listing date", record.key);
          return false;
        };
        match parse_timestamp(raw) {
          Some(launched) => launched >= cutoff,
          None => {
            warn!("Excluding {}: unparseable launch date {:?}", record.key, raw);
            false
          }
        }
      })
      .collect();

    debug!("Launch filter kept {} of {} records", kept.len(), before);
    kept
  }

  /// Order by ratio, highest first. Equal ratios keep their input order.
  pub fn rank(&self, records: &[CoinRecord]) -> LoaderResult<Vec<RankedCoin>> {
    let mut scored = Vec::with_capacity(records.len());
    for record in records {
      scored.push((ratio(record)?, record));
    }

    // sort_by is stable
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    Ok(
      scored
        .into_iter()
        .enumerate()
        .map(|(i, (ratio, record))| RankedCoin {
          rank: i + 1,
          ratio,
          key: record.key.clone(),
          symbol: record.symbol.clone(),
          url: record.page_url(&self.page_base_url),
        })
        .collect(),
    )
  }
}

fn ratio(record: &CoinRecord) -> LoaderResult<f64> {
  let ath = record.ath_market_cap.ok_or_else(|| {
    LoaderError::IncompleteRecord(format!("{} has no ATH market cap", record.key))
  })?;

  let market_cap = record.market_cap.value();
  if !(market_cap.is_finite() && market_cap > 0.0) {
    return Err(LoaderError::IncompleteRecord(format!(
      "{} has market cap {}",
      record.key, market_cap
    )));
  }

  Ok(ath as f64 / market_cap)
}

/// RFC 3339 first (`2020-06-01T00:00:00.000Z`); naive timestamps and bare dates
/// are read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
  let raw = raw.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }
  if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
    return Some(naive.and_utc());
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
  }

  fn enriched(key: &str, market_cap: f64, ath: u64) -> CoinRecord {
    let mut record = CoinRecord::new(key, key.to_uppercase(), market_cap);
    record.ath_market_cap = Some(ath);
    record
  }

  fn dated(key: &str, launched: Option<&str>, added: Option<&str>) -> CoinRecord {
    let mut record = CoinRecord::new(key, "X", 1.0);
    record.date_launched = launched.map(str::to_string);
    record.date_cmc_added = added.map(str::to_string);
    record
  }

  fn keys(records: &[CoinRecord]) -> Vec<&str> {
    records.iter().map(|r| r.key.as_str()).collect()
  }

  #[test]
  fn test_filter_disabled_returns_everything() {
    let records =
      vec![dated("a", None, None), dated("b", Some("2010-01-01T00:00:00.000Z"), None)];
    assert_eq!(RankingEngine::filter(records.clone(), cutoff(), false), records);
  }

  #[test]
  fn test_filter_by_launch_then_added_date() {
    let records = vec![
      dated("old-launch", Some("2020-06-01T00:00:00.000Z"), None),
      dated("new-listing", None, Some("2022-01-01T00:00:00.000Z")),
      dated("undated", None, None),
      dated("empty-launch", Some(""), Some("2021-03-01T00:00:00.000Z")),
      dated(
        "old-launch-new-listing",
        Some("2019-01-01T00:00:00.000Z"),
        Some("2023-01-01T00:00:00.000Z"),
      ),
      dated("on-cutoff", Some("2021-01-01T00:00:00.000Z"), None),
      dated("garbage", Some("yesterday"), None),
    ];

    let kept = RankingEngine::filter(records, cutoff(), true);
    assert_eq!(keys(&kept), vec!["new-listing", "empty-launch", "on-cutoff"]);
  }

  #[test]
  fn test_parse_timestamp_variants() {
    let expected =
      NaiveDate::from_ymd_opt(2022, 1, 1).unwrap().and_time(NaiveTime::MIN).and_utc();
    assert_eq!(parse_timestamp("2022-01-01T00:00:00.000Z"), Some(expected));
    assert_eq!(parse_timestamp("2022-01-01T00:00:00"), Some(expected));
    assert_eq!(parse_timestamp("2022-01-01"), Some(expected));
    assert_eq!(parse_timestamp("2022-01-01T02:00:00+02:00"), Some(expected));
    assert_eq!(parse_timestamp("01/01/2022"), None);
  }

  #[test]
  fn test_rank_orders_by_ratio() {
    let engine = RankingEngine::new("https://cryptorank.io/price");
    let records =
      vec![enriched("one", 100.0, 400), enriched("two", 50.0, 50), enriched("three", 10.0, 1000)];

    let ranked = engine.rank(&records).unwrap();

    let order: Vec<&str> = ranked.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(order, vec!["three", "one", "two"]);
    assert_eq!(ranked.iter().map(|r| r.ratio).collect::<Vec<_>>(), vec![100.0, 4.0, 1.0]);
    assert_eq!(ranked[0].rank, 1);
    assert_eq!(ranked[0].url, "https://cryptorank.io/price/three");
  }

  #[test]
  fn test_equal_ratios_keep_input_order() {
    let engine = RankingEngine::new("https://cryptorank.io/price");
    let records = vec![
      enriched("a", 10.0, 20),
      enriched("b", 1.0, 50),
      enriched("c", 5.0, 10),
      enriched("d", 100.0, 200),
    ];

    let first = engine.rank(&records).unwrap();
    let second = engine.rank(&records).unwrap();

    let order: Vec<&str> = first.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(order, vec!["b", "a", "c", "d"]);
    assert_eq!(first, second);
  }

  #[test]
  fn test_rank_requires_ath() {
    let engine = RankingEngine::new("https://cryptorank.io/price");
    let records = vec![enriched("a", 1.0, 1), CoinRecord::new("b", "B", 1.0)];
    assert!(matches!(engine.rank(&records), Err(LoaderError::IncompleteRecord(_))));
  }

  #[test]
  fn test_rank_refuses_zero_market_cap() {
    let engine = RankingEngine::new("https://cryptorank.io/price");
    assert!(matches!(
      engine.rank(&[enriched("a", 0.0, 1)]),
      Err(LoaderError::IncompleteRecord(_))
    ));
  }

  #[test]
  fn test_display_format() {
    let coin = RankedCoin {
      rank: 3,
      ratio: 12.346,
      key: "sui".to_string(),
      symbol: "SUI".to_string(),
      url: "https://cryptorank.io/price/sui".to_string(),
    };
    assert_eq!(coin.to_string(), "3. Ratio: 12.35, https://cryptorank.io/price/sui");
  }
}
