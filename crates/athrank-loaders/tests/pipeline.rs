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

//! Full runs against a mock market API, mock coin pages and a file-backed store.

use athrank_core::{Config, RetryConfig};
use athrank_loaders::{CoinRecord, JsonRecordStore, Pipeline, RecordStore};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page(ath: &str) -> ResponseTemplate {
  ResponseTemplate::new(200).set_body_string(format!(
    "<html><body><div><p>ATH Market Cap</p><p>{}</p></div></body></html>",
    ath
  ))
}

fn config(server: &MockServer, store_path: &Path) -> Config {
  Config {
    cryptorank_api_key: Some("cr-key".to_string()),
    cmc_api_key: Some("cmc-key".to_string()),
    store_path: store_path.to_path_buf(),
    top_coins_count: 4,
    market_data_base_url: server.uri(),
    launch_date_base_url: server.uri(),
    coin_page_base_url: format!("{}/price", server.uri()),
    page_timeout_secs: 5,
    retry: RetryConfig { max_attempts: 2, backoff_ms: 10 },
    show_progress: false,
    ..Config::default()
  }
}

async fn mount_market(server: &MockServer, expected_calls: u64) {
  Mock::given(method("GET"))
    .and(path("/v2/currencies"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "data": [
        {"key": "bitcoin", "symbol": "BTC", "name": "Bitcoin", "marketCap": "1000000000"},
        {"key": "ethereum", "symbol": "ETH", "name": "Ethereum", "marketCap": "100000000"},
        {"key": "bridged-usdc", "symbol": "USDC.e", "name": "Bridged USDC", "marketCap": "5000000"},
        {"key": "solana", "symbol": "SOL", "name": "Solana", "marketCap": "10000000"}
      ]
    })))
    .expect(expected_calls)
    .mount(server)
    .await;
}

async fn mount_launch_dates(server: &MockServer) {
  Mock::given(method("GET"))
    .and(path("/v2/cryptocurrency/info"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "status": {"error_code": 0, "error_message": null},
      "data": {
        "BTC": [{"symbol": "BTC", "date_launched": "2009-01-03T00:00:00.000Z",
                 "date_added": "2013-04-28T00:00:00.000Z"}],
        "ETH": [{"symbol": "ETH", "date_launched": null,
                 "date_added": "2015-08-07T00:00:00.000Z"}],
        "SOL": [{"symbol": "SOL", "date_launched": "2020-03-16T00:00:00.000Z",
                 "date_added": "2020-04-10T00:00:00.000Z"}]
      }
    })))
    .mount(server)
    .await;
}

async fn mount_page(server: &MockServer, key: &str, ath: &str, expected_calls: u64) {
  Mock::given(method("GET"))
    .and(path(format!("/price/{}", key)))
    .respond_with(page(ath))
    .expect(expected_calls)
    .mount(server)
    .await;
}

fn stored_document(path: &Path) -> Value {
  serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_full_run_ranks_by_ath_ratio() {
  let server = MockServer::start().await;
  let dir = TempDir::new().unwrap();
  let store_path = dir.path().join("coins.json");

  mount_market(&server, 1).await;
  mount_launch_dates(&server).await;
  mount_page(&server, "bitcoin", "$2B", 1).await;
  mount_page(&server, "ethereum", "$500M", 1).await;
  mount_page(&server, "solana", "$10M", 1).await;
  mount_page(&server, "bridged-usdc", "$1B", 0).await;

  let mut pipeline = Pipeline::from_config(config(&server, &store_path)).unwrap();
  let output = pipeline.run().await.unwrap();

  let lines: Vec<String> = output.ranking.iter().map(ToString::to_string).collect();
  assert_eq!(
    lines,
    vec![
      format!("1. Ratio: 5.00, {}/price/ethereum", server.uri()),
      format!("2. Ratio: 2.00, {}/price/bitcoin", server.uri()),
      format!("3. Ratio: 1.00, {}/price/solana", server.uri()),
    ]
  );

  let snapshot = output.snapshot.unwrap();
  assert_eq!(snapshot.seeded, 4);
  assert_eq!(output.ath.enriched, 3);
  assert_eq!(output.ath.deleted, 1);
  assert_eq!(output.launch_dates.matched_records, 3);

  let doc = stored_document(&store_path);
  let data = doc["data"].as_array().unwrap();
  assert_eq!(data.len(), 3);
  assert!(data.iter().all(|r| r["symbol"] != "USDC.e"));
  assert_eq!(data[0]["athMarketCap"], 2_000_000_000u64);
  assert_eq!(data[0]["name"], "Bitcoin");
  assert_eq!(data[0]["marketCap"], "1000000000");
  assert_eq!(data[1]["dateCmcAdded"], "2015-08-07T00:00:00.000Z");
}

#[tokio::test]
async fn test_launch_filter_applies_cutoff() {
  let server = MockServer::start().await;
  let dir = TempDir::new().unwrap();
  let store_path = dir.path().join("coins.json");

  mount_market(&server, 1).await;
  mount_launch_dates(&server).await;
  mount_page(&server, "bitcoin", "$2B", 1).await;
  mount_page(&server, "ethereum", "$500M", 1).await;
  mount_page(&server, "solana", "$10M", 1).await;

  let config = Config {
    filter_enabled: true,
    cutoff_date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
    ..config(&server, &store_path)
  };
  let output = Pipeline::from_config(config).unwrap().run().await.unwrap();

  let keys: Vec<&str> = output.ranking.iter().map(|c| c.key.as_str()).collect();
  assert_eq!(keys, vec!["ethereum", "solana"]);
  assert_eq!(output.ranking[1].rank, 2);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
  let server = MockServer::start().await;
  let dir = TempDir::new().unwrap();
  let store_path = dir.path().join("coins.json");

  // one snapshot and one visit per page across both runs
  mount_market(&server, 1).await;
  mount_launch_dates(&server).await;
  mount_page(&server, "bitcoin", "$2B", 1).await;
  mount_page(&server, "ethereum", "$500M", 1).await;
  mount_page(&server, "solana", "$10M", 1).await;

  let first = Pipeline::from_config(config(&server, &store_path)).unwrap().run().await.unwrap();
  let after_first = std::fs::read(&store_path).unwrap();

  let second = Pipeline::from_config(config(&server, &store_path)).unwrap().run().await.unwrap();
  let after_second = std::fs::read(&store_path).unwrap();

  assert!(second.snapshot.is_none());
  assert_eq!(second.ath.enriched, 0);
  assert_eq!(second.ath.already_enriched, 3);
  assert_eq!(first.ranking, second.ranking);
  assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn test_interrupted_run_resumes_pending_records() {
  let server = MockServer::start().await;
  let dir = TempDir::new().unwrap();
  let store_path = dir.path().join("coins.json");

  // state left behind by a run that stopped after its first record
  let mut bitcoin = CoinRecord::new("bitcoin", "BTC", 1_000_000_000.0);
  bitcoin.ath_market_cap = Some(3_000_000_000);
  let seeded = vec![
    bitcoin,
    CoinRecord::new("ethereum", "ETH", 100_000_000.0),
    CoinRecord::new("solana", "SOL", 10_000_000.0),
  ];
  JsonRecordStore::new(&store_path).save(seeded).await.unwrap();

  mount_market(&server, 0).await;
  mount_launch_dates(&server).await;
  mount_page(&server, "bitcoin", "$2B", 0).await;
  mount_page(&server, "ethereum", "$500M", 1).await;
  mount_page(&server, "solana", "$10M", 1).await;

  let mut pipeline = Pipeline::from_config(config(&server, &store_path)).unwrap();
  let output = pipeline.run().await.unwrap();

  assert!(output.snapshot.is_none());
  assert_eq!(output.ath.already_enriched, 1);
  assert_eq!(output.ath.enriched, 2);

  let stored = pipeline.store().load().await.unwrap();
  assert_eq!(stored[0].ath_market_cap, Some(3_000_000_000));
  assert!(stored.iter().all(CoinRecord::is_enriched));
  assert_eq!(output.ranking[0].key, "ethereum");
  assert_eq!(output.ranking[1].key, "bitcoin");
}

#[tokio::test]
async fn test_refresh_replaces_existing_store() {
  let server = MockServer::start().await;
  let dir = TempDir::new().unwrap();
  let store_path = dir.path().join("coins.json");

  JsonRecordStore::new(&store_path)
    .save(vec![CoinRecord::new("dogecoin", "DOGE", 1.0)])
    .await
    .unwrap();

  mount_market(&server, 1).await;
  mount_launch_dates(&server).await;
  mount_page(&server, "bitcoin", "$2B", 1).await;
  mount_page(&server, "ethereum", "$500M", 1).await;
  mount_page(&server, "solana", "$10M", 1).await;
  mount_page(&server, "dogecoin", "$1B", 0).await;

  let config = Config { refresh_snapshot: true, ..config(&server, &store_path) };
  let output = Pipeline::from_config(config).unwrap().run().await.unwrap();

  assert!(output.snapshot.is_some());
  assert!(output.ranking.iter().all(|c| c.key != "dogecoin"));
  assert_eq!(output.ranking.len(), 3);
}

#[tokio::test]
async fn test_broken_page_aborts_without_partial_write() {
  let server = MockServer::start().await;
  let dir = TempDir::new().unwrap();
  let store_path = dir.path().join("coins.json");

  mount_market(&server, 1).await;
  mount_launch_dates(&server).await;
  mount_page(&server, "bitcoin", "$2B", 1).await;
  // broken on the first visit only, fixed for the follow-up run
  Mock::given(method("GET"))
    .and(path("/price/ethereum"))
    .respond_with(page("soon"))
    .up_to_n_times(1)
    .expect(1)
    .mount(&server)
    .await;
  mount_page(&server, "ethereum", "$500M", 1).await;
  mount_page(&server, "bridged-usdc", "$1B", 0).await;
  mount_page(&server, "solana", "$10M", 1).await;

  let result = Pipeline::from_config(config(&server, &store_path)).unwrap().run().await;
  assert!(result.is_err());

  // the run stopped at ethereum, before reaching the records after it
  let stored = JsonRecordStore::new(&store_path).load().await.unwrap();
  let keys: Vec<&str> = stored.iter().map(|r| r.key.as_str()).collect();
  assert_eq!(keys, vec!["bitcoin", "ethereum", "bridged-usdc", "solana"]);
  assert_eq!(stored[0].ath_market_cap, Some(2_000_000_000));
  assert_eq!(stored[1].ath_market_cap, None);

  let output = Pipeline::from_config(config(&server, &store_path)).unwrap().run().await.unwrap();
  assert_eq!(output.ath.deleted, 1);
  assert_eq!(output.ath.enriched, 2);

  let stored = JsonRecordStore::new(&store_path).load().await.unwrap();
  let keys: Vec<&str> = stored.iter().map(|r| r.key.as_str()).collect();
  assert_eq!(keys, vec!["bitcoin", "ethereum", "solana"]);
  assert!(stored.iter().all(CoinRecord::is_enriched));
}

#[tokio::test]
async fn test_skip_policy_leaves_failed_page_out_of_ranking() {
  let server = MockServer::start().await;
  let dir = TempDir::new().unwrap();
  let store_path = dir.path().join("coins.json");

  mount_market(&server, 1).await;
  mount_launch_dates(&server).await;
  mount_page(&server, "bitcoin", "$2B", 1).await;
  mount_page(&server, "ethereum", "soon", 1).await;
  mount_page(&server, "solana", "$10M", 1).await;

  let config = Config { skip_failed_pages: true, ..config(&server, &store_path) };
  let output = Pipeline::from_config(config).unwrap().run().await.unwrap();

  assert_eq!(output.ath.failed, vec!["ethereum".to_string()]);
  let keys: Vec<&str> = output.ranking.iter().map(|c| c.key.as_str()).collect();
  assert_eq!(keys, vec!["bitcoin", "solana"]);
}
