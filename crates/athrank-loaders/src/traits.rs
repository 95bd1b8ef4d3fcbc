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

//! Traits for the external data providers.

use async_trait::async_trait;

use crate::error::LoaderError;
use crate::types::{CoinRecord, LaunchInfo};

/// Source of the initial top-N snapshot.
///
/// Implement this trait to seed the pipeline from a different market-data API.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
  /// Fetch the `limit` largest coins with their current market cap.
  async fn fetch_top(&self, limit: u32) -> Result<Vec<CoinRecord>, LoaderError>;

  /// Get the name of this data source.
  fn source_name(&self) -> &'static str;
}

/// Source of launch and listing dates, queried by symbol in bulk.
#[async_trait]
pub trait LaunchDateProvider: Send + Sync {
  /// Fetch launch info for every symbol the provider knows. Unknown symbols are
  /// simply absent from the result.
  async fn fetch_launch_info(&self, symbols: &[String]) -> Result<Vec<LaunchInfo>, LoaderError>;

  /// Get the name of this data source.
  fn source_name(&self) -> &'static str;

  /// Hard cap on symbols per request imposed by the provider, if any.
  fn max_batch_size(&self) -> Option<usize> {
    None
  }
}
