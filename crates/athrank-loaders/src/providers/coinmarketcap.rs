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

//! Launch-date provider backed by the `/v2/cryptocurrency/info` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use url::Url;

use super::check_status;
use crate::error::LoaderError;
use crate::traits::LaunchDateProvider;
use crate::types::LaunchInfo;

const SOURCE: &str = "CoinMarketCap";

/// CoinMarketCap metadata lookup by comma-joined symbol list.
pub struct CoinMarketCapProvider {
  api_key: String,
  base_url: String,
  client: Client,
}

#[derive(Debug, Deserialize)]
struct CmcInfoResponse {
  status: CmcStatus,
  #[serde(default)]
  data: BTreeMap<String, Vec<LaunchInfo>>,
}

#[derive(Debug, Deserialize)]
struct CmcStatus {
  error_code: i32,
  error_message: Option<String>,
}

impl CoinMarketCapProvider {
  pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
    Self::with_client(api_key, base_url, Client::new())
  }

  /// Create provider with a custom HTTP client.
  pub fn with_client(
    api_key: impl Into<String>,
    base_url: impl Into<String>,
    client: Client,
  ) -> Self {
    Self { api_key: api_key.into(), base_url: base_url.into(), client }
  }

  fn endpoint(&self, symbols: &[String]) -> Result<Url, LoaderError> {
    let mut url =
      Url::parse(&format!("{}/v2/cryptocurrency/info", self.base_url.trim_end_matches('/')))
        .map_err(|e| LoaderError::Config(format!("Invalid {} base URL: {}", SOURCE, e)))?;
    url.query_pairs_mut().append_pair("symbol", &symbols.join(","));
    Ok(url)
  }

  fn into_launch_info(response: CmcInfoResponse) -> Result<Vec<LaunchInfo>, LoaderError> {
    if response.status.error_code != 0 {
      return Err(LoaderError::provider(
        SOURCE,
        response.status.error_message.unwrap_or_else(|| "Unknown CMC error".to_string()),
      ));
    }

    // several assets can share a ticker; the first listed is the one CMC ranks highest
    Ok(
      response
        .data
        .into_iter()
        .filter_map(|(symbol, entries)| {
          let first = entries.into_iter().next();
          if first.is_none() {
            warn!("{} returned no entries for {}", SOURCE, symbol);
          }
          first
        })
        .collect(),
    )
  }
}

#[async_trait]
impl LaunchDateProvider for CoinMarketCapProvider {
  async fn fetch_launch_info(&self, symbols: &[String]) -> Result<Vec<LaunchInfo>, LoaderError> {
    if symbols.is_empty() {
      return Ok(Vec::new());
    }

    info!("Fetching launch dates for {} symbols from {}", symbols.len(), SOURCE);

    let response = self
      .client
      .get(self.endpoint(symbols)?)
      .header("X-CMC_PRO_API_KEY", &self.api_key)
      .header("Accept", "application/json")
      .send()
      .await
      .map_err(|e| LoaderError::provider(SOURCE, format!("request failed: {}", e)))?;

    let response = check_status(SOURCE, response).await?;
    let parsed: CmcInfoResponse = response
      .json()
      .await
      .map_err(|e| LoaderError::provider(SOURCE, format!("malformed payload: {}", e)))?;

    let infos = Self::into_launch_info(parsed)?;
    debug!("{} returned launch info for {} symbols", SOURCE, infos.len());
    Ok(infos)
  }

  fn source_name(&self) -> &'static str {
    SOURCE
  }
}
