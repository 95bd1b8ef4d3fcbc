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

//! # athrank-loaders
//!
//! Builds a ranking of coins by how far they trade below their all-time-high
//! market cap.
//!
//! Three sources feed one record per coin:
//! - a bulk market-data API for the current top-N snapshot
//! - each coin's web page, scraped for the ATH market cap
//! - a launch-date API for launch and listing dates
//!
//! Stages hand data to each other through a [`RecordStore`]. The scraping stage
//! commits every record as it goes, so an interrupted run resumes where it
//! stopped.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use athrank_core::Config;
//! use athrank_loaders::Pipeline;
//!
//! let config = Config::from_env()?;
//! let mut pipeline = Pipeline::from_config(config)?;
//! for coin in pipeline.run().await?.ranking {
//!     println!("{}", coin);
//! }
//! ```

pub mod browser;
pub mod error;
pub mod loaders;
pub mod number_parser;
pub mod pipeline;
pub mod providers;
pub mod ranking;
pub mod store;
pub mod traits;
pub mod types;

// Re-export main types for convenience
pub use browser::{Browser, HttpBrowser, PageRegion};
pub use error::{LoaderError, LoaderResult};
pub use loaders::{
  AthEnricher, AthEnricherConfig, AthEnrichmentReport, LaunchDateEnricher, LaunchDateReport,
  MarketSnapshotFetcher, SnapshotReport, ATH_MARKET_CAP_LABEL,
};
pub use number_parser::NumberParser;
pub use pipeline::{Pipeline, PipelineOutput};
pub use providers::{CoinMarketCapProvider, CryptoRankProvider};
pub use ranking::{RankedCoin, RankingEngine};
pub use store::{JsonRecordStore, MemoryRecordStore, RecordMutator, RecordStore};
pub use traits::{LaunchDateProvider, MarketDataProvider};
pub use types::{CoinRecord, LaunchInfo, MarketCap, RecordDocument};

pub mod prelude {
  pub use crate::{
    Browser, CoinRecord, LaunchDateProvider, LoaderError, LoaderResult, MarketDataProvider,
    Pipeline, RankedCoin, RankingEngine, RecordStore,
  };
}
