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

//! Configuration management for the ranking pipeline

use crate::error::{Error, Result};
use chrono::NaiveDate;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Multiplier applied to the `K` magnitude suffix.
///
/// The figures scraped historically were converted with ×100,000 for `K`, not
/// ×1,000. `Legacy` keeps that behaviour so rankings stay comparable with older
/// runs; `Standard` applies the conventional thousand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ThousandsFactor {
  #[default]
  Legacy,
  Standard,
}

impl ThousandsFactor {
  pub fn multiplier(self) -> u64 {
    match self {
      ThousandsFactor::Legacy => 100_000,
      ThousandsFactor::Standard => 1_000,
    }
  }
}

/// Retry policy for page-load timeouts during ATH enrichment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryConfig {
  /// Number of enrichment passes before a timeout becomes fatal
  pub max_attempts: u32,

  /// Fixed pause between passes in milliseconds
  pub backoff_ms: u64,
}

impl Default for RetryConfig {
  fn default() -> Self {
    Self { max_attempts: 5, backoff_ms: 5_000 }
  }
}

/// Main configuration struct, built once and passed into the pipeline
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
  /// Bulk market-data API key (`X-Api-Key`)
  pub cryptorank_api_key: Option<String>,

  /// Launch-date API key (`X-CMC_PRO_API_KEY`)
  pub cmc_api_key: Option<String>,

  /// Staged record document
  pub store_path: PathBuf,

  /// How many coins the snapshot requests
  pub top_coins_count: u32,

  /// Coins launched before this date are dropped when filtering is enabled
  pub cutoff_date: NaiveDate,

  pub filter_enabled: bool,

  pub market_data_base_url: String,
  pub launch_date_base_url: String,
  pub coin_page_base_url: String,

  /// Page-load timeout in seconds
  pub page_timeout_secs: u64,

  pub retry: RetryConfig,

  /// Maximum symbols per launch-date request
  pub launch_batch_size: usize,

  pub thousands_factor: ThousandsFactor,

  /// Log and continue past pages that load but cannot be parsed
  pub skip_failed_pages: bool,

  /// Re-fetch the snapshot even when the store already holds records
  pub refresh_snapshot: bool,

  pub show_progress: bool,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      cryptorank_api_key: None,
      cmc_api_key: None,
      store_path: PathBuf::from(crate::DEFAULT_STORE_PATH),
      top_coins_count: crate::DEFAULT_TOP_COINS_COUNT,
      cutoff_date: default_cutoff_date(),
      filter_enabled: false,
      market_data_base_url: crate::CRYPTORANK_API_BASE_URL.to_string(),
      launch_date_base_url: crate::CMC_API_BASE_URL.to_string(),
      coin_page_base_url: crate::COIN_PAGE_BASE_URL.to_string(),
      page_timeout_secs: 30,
      retry: RetryConfig::default(),
      launch_batch_size: 100,
      thousands_factor: ThousandsFactor::default(),
      skip_failed_pages: false,
      refresh_snapshot: false,
      show_progress: true,
    }
  }
}

fn default_cutoff_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default()
}

impl Config {
  /// Load configuration from environment variables
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Build a configuration from an arbitrary variable source.
  ///
  /// Unset variables fall back to [`Config::default`]; set but malformed values
  /// are an error.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let defaults = Config::default();

    let cutoff_date = match lookup("ATHRANK_CUTOFF_DATE") {
      Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")?,
      None => defaults.cutoff_date,
    };

    let thousands_factor = if parse_or(&lookup, "ATHRANK_STANDARD_THOUSANDS", false)? {
      ThousandsFactor::Standard
    } else {
      ThousandsFactor::Legacy
    };

    let config = Config {
      cryptorank_api_key: lookup("CRYPTORANK_API_KEY").filter(|k| !k.is_empty()),
      cmc_api_key: lookup("CMC_API_KEY").filter(|k| !k.is_empty()),
      store_path: lookup("ATHRANK_STORE_PATH").map(PathBuf::from).unwrap_or(defaults.store_path),
      top_coins_count: parse_or(&lookup, "ATHRANK_TOP_COINS", defaults.top_coins_count)?,
      cutoff_date,
      filter_enabled: parse_or(&lookup, "ATHRANK_FILTER_ENABLED", defaults.filter_enabled)?,
      market_data_base_url: lookup("ATHRANK_MARKET_DATA_URL")
        .unwrap_or(defaults.market_data_base_url),
      launch_date_base_url: lookup("ATHRANK_LAUNCH_DATE_URL")
        .unwrap_or(defaults.launch_date_base_url),
      coin_page_base_url: lookup("ATHRANK_COIN_PAGE_URL").unwrap_or(defaults.coin_page_base_url),
      page_timeout_secs: parse_or(
        &lookup,
        "ATHRANK_PAGE_TIMEOUT_SECS",
        defaults.page_timeout_secs,
      )?,
      retry: RetryConfig {
        max_attempts: parse_or(&lookup, "ATHRANK_MAX_ATTEMPTS", defaults.retry.max_attempts)?,
        backoff_ms: parse_or(&lookup, "ATHRANK_BACKOFF_MS", defaults.retry.backoff_ms)?,
      },
      launch_batch_size: parse_or(
        &lookup,
        "ATHRANK_LAUNCH_BATCH_SIZE",
        defaults.launch_batch_size,
      )?,
      thousands_factor,
      skip_failed_pages: parse_or(
        &lookup,
        "ATHRANK_SKIP_FAILED_PAGES",
        defaults.skip_failed_pages,
      )?,
      refresh_snapshot: parse_or(&lookup, "ATHRANK_REFRESH_SNAPSHOT", defaults.refresh_snapshot)?,
      show_progress: parse_or(&lookup, "ATHRANK_SHOW_PROGRESS", defaults.show_progress)?,
    };

    config.validate()?;
    Ok(config)
  }

  /// Check cross-field constraints
  pub fn validate(&self) -> Result<()> {
    if self.top_coins_count == 0 {
      return Err(Error::Config("top_coins_count must be at least 1".to_string()));
    }
    if self.launch_batch_size == 0 {
      return Err(Error::Config("launch_batch_size must be at least 1".to_string()));
    }
    if self.retry.max_attempts == 0 {
      return Err(Error::Config("retry.max_attempts must be at least 1".to_string()));
    }
    if self.page_timeout_secs == 0 {
      return Err(Error::Config("page_timeout_secs must be at least 1".to_string()));
    }

    Url::parse(&self.market_data_base_url)?;
    Url::parse(&self.launch_date_base_url)?;
    Url::parse(&self.coin_page_base_url)?;

    Ok(())
  }

  pub fn require_cryptorank_key(&self) -> Result<&str> {
    self
      .cryptorank_api_key
      .as_deref()
      .ok_or_else(|| Error::ApiKey("CRYPTORANK_API_KEY not set".to_string()))
  }

  pub fn require_cmc_key(&self) -> Result<&str> {
    self.cmc_api_key.as_deref().ok_or_else(|| Error::ApiKey("CMC_API_KEY not set".to_string()))
  }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
  F: Fn(&str) -> Option<String>,
  T: FromStr,
{
  match lookup(name) {
    Some(raw) => raw.trim().parse().map_err(|_| Error::Config(format!("Invalid {}", name))),
    None => Ok(default),
  }
}
