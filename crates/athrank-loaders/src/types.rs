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

//! Core types for the enrichment pipeline.
//!
//! A [`CoinRecord`] is created by the snapshot stage, gains `athMarketCap` in the
//! scraping stage and launch dates in the launch-date stage, and is finally read by
//! the ranking engine. Fields the pipeline does not use are kept in `extra` so the
//! staged document stays a superset of what the provider returned.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// One tracked cryptocurrency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinRecord {
  /// Stable identifier, also the last path segment of the coin page URL
  pub key: String,

  pub symbol: String,

  /// Current market capitalization at snapshot time
  pub market_cap: MarketCap,

  /// Absent until the ATH stage has processed this record
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ath_market_cap: Option<u64>,

  #[serde(default, alias = "date_launched", skip_serializing_if = "Option::is_none")]
  pub date_launched: Option<String>,

  #[serde(default, alias = "date_cmc_added", skip_serializing_if = "Option::is_none")]
  pub date_cmc_added: Option<String>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl CoinRecord {
  pub fn new(key: impl Into<String>, symbol: impl Into<String>, market_cap: f64) -> Self {
    Self {
      key: key.into(),
      symbol: symbol.into(),
      market_cap: MarketCap::from(market_cap),
      ath_market_cap: None,
      date_launched: None,
      date_cmc_added: None,
      extra: Map::new(),
    }
  }

  /// True once the ATH stage has committed a figure for this record.
  pub fn is_enriched(&self) -> bool {
    self.ath_market_cap.is_some()
  }

  /// Symbols that are empty or contain anything but letters and digits are
  /// display artifacts, not tickers.
  pub fn has_valid_symbol(&self) -> bool {
    !self.symbol.is_empty() && self.symbol.chars().all(char::is_alphanumeric)
  }

  /// Canonical coin page, `{base}/{key}`.
  pub fn page_url(&self, base: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), self.key)
  }

  /// The timestamp used for the launch cutoff: the launch date when known,
  /// otherwise the date the coin was listed. Empty strings count as absent.
  pub fn launch_timestamp(&self) -> Option<&str> {
    self
      .date_launched
      .as_deref()
      .filter(|d| !d.trim().is_empty())
      .or_else(|| self.date_cmc_added.as_deref().filter(|d| !d.trim().is_empty()))
  }
}

/// The persisted document: records under `data`, anything else carried along.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordDocument {
  #[serde(default)]
  pub data: Vec<CoinRecord>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// Launch information for one symbol as reported by a launch-date provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchInfo {
  pub symbol: String,

  #[serde(default)]
  pub date_launched: Option<String>,

  #[serde(default)]
  pub date_added: Option<String>,
}

/// A market cap as the provider sent it, a JSON number or a numeric string,
/// together with its parsed value. It is written back exactly as it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketCap {
  raw: Value,
  value: f64,
}

impl MarketCap {
  pub fn value(&self) -> f64 {
    self.value
  }

  pub fn raw(&self) -> &Value {
    &self.raw
  }
}

impl From<f64> for MarketCap {
  fn from(value: f64) -> Self {
    Self { raw: Value::from(value), value }
  }
}

impl Serialize for MarketCap {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.raw.serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for MarketCap {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    let value = match &raw {
      Value::Number(n) => n.as_f64(),
      Value::String(s) => s.trim().parse::<f64>().ok(),
      _ => None,
    }
    .ok_or_else(|| serde::de::Error::custom(format!("invalid market cap {}", raw)))?;

    Ok(Self { raw, value })
  }
}
