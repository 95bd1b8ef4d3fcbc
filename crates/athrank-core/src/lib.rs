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

//! # athrank-core
//!
//! Configuration and error types shared by the ATH market-cap ranking crates.
//!
//! The pipeline is configured once, up front, through an immutable [`Config`]
//! that is handed to every stage; nothing is read from process-wide state after
//! start-up.

pub mod config;
pub mod error;

pub use config::{Config, RetryConfig, ThousandsFactor};
pub use error::{Error, Result};

/// Bulk market-data API (snapshot of the top N coins)
pub const CRYPTORANK_API_BASE_URL: &str = "https://api.cryptorank.io";

/// Launch-date API
pub const CMC_API_BASE_URL: &str = "https://pro-api.coinmarketcap.com";

/// Canonical per-coin page prefix; the coin key is appended as the last path segment
pub const COIN_PAGE_BASE_URL: &str = "https://cryptorank.io/price";

/// Default number of coins pulled into the snapshot
pub const DEFAULT_TOP_COINS_COUNT: u32 = 100;

/// Default path of the staged record document
pub const DEFAULT_STORE_PATH: &str = "coins.json";
