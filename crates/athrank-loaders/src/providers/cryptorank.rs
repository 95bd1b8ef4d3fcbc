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

//! Bulk market-data provider for the initial snapshot.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use super::check_status;
use crate::error::LoaderError;
use crate::traits::MarketDataProvider;
use crate::types::CoinRecord;

const SOURCE: &str = "CryptoRank";

/// Snapshot of the top coins by market cap from the `/v2/currencies` endpoint.
pub struct CryptoRankProvider {
  api_key: String,
  base_url: String,
  client: Client,
}

#[derive(Debug, Deserialize)]
struct CurrenciesResponse {
  data: Vec<CoinRecord>,
}

impl CryptoRankProvider {
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

  fn endpoint(&self, limit: u32) -> Result<Url, LoaderError> {
    let mut url = Url::parse(&format!("{}/v2/currencies", self.base_url.trim_end_matches('/')))
      .map_err(|e| LoaderError::Config(format!("Invalid {} base URL: {}", SOURCE, e)))?;
    url.query_pairs_mut().append_pair("limit", &limit.to_string());
    Ok(url)
  }
}

#[async_trait]
impl MarketDataProvider for CryptoRankProvider {
  async fn fetch_top(&self, limit: u32) -> Result<Vec<CoinRecord>, LoaderError> {
    info!("Fetching top {} coins from {}", limit, SOURCE);

    let response = self
      .client
      .get(self.endpoint(limit)?)
      .header("X-Api-Key", &self.api_key)
      .header("Accept", "application/json")
      .send()
      .await
      .map_err(|e| LoaderError::provider(SOURCE, format!("request failed: {}", e)))?;

    let response = check_status(SOURCE, response).await?;
    let text = response
      .text()
      .await
      .map_err(|e| LoaderError::provider(SOURCE, format!("failed to read body: {}", e)))?;

    let parsed: CurrenciesResponse = serde_json::from_str(&text)
      .map_err(|e| LoaderError::provider(SOURCE, format!("malformed payload: {}", e)))?;

    debug!("{} returned {} coins", SOURCE, parsed.data.len());
    Ok(parsed.data)
  }

  fn source_name(&self) -> &'static str {
    SOURCE
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_endpoint_includes_limit() {
    let provider = CryptoRankProvider::new("key", "https://api.cryptorank.io/");
    let url = provider.endpoint(100).unwrap();
    assert_eq!(url.as_str(), "https://api.cryptorank.io/v2/currencies?limit=100");
  }

  #[test]
  fn test_response_parsing() {
    let json_response = r#"{
      "data": [
        {"id": 1, "key": "bitcoin", "symbol": "BTC", "marketCap": "1300000000000"},
        {"id": 2, "key": "ethereum", "symbol": "ETH", "name": "Ethereum",
         "marketCap": 400000000000.5}
      ],
      "status": {"usedCredits": 1}
    }"#;

    let response: CurrenciesResponse = serde_json::from_str(json_response).unwrap();
    assert_eq!(response.data.len(), 2);
    assert_eq!(response.data[0].market_cap.value(), 1.3e12);
    assert_eq!(response.data[1].extra["name"], "Ethereum");
  }

  #[test]
  fn test_source_name() {
    assert_eq!(CryptoRankProvider::new("key", "http://localhost").source_name(), "CryptoRank");
  }
}
