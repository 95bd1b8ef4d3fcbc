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

//! HTTP implementations of the provider traits.

pub mod coinmarketcap;
pub mod cryptorank;

pub use coinmarketcap::CoinMarketCapProvider;
pub use cryptorank::CryptoRankProvider;

use reqwest::{Response, StatusCode};

use crate::error::{LoaderError, LoaderResult};

/// Map a non-success response to a provider error, keeping the start of the
/// body for diagnosis.
pub(crate) async fn check_status(api_source: &str, response: Response) -> LoaderResult<Response> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let message = match status {
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
      format!("HTTP {}: API key missing or rejected", status)
    }
    StatusCode::TOO_MANY_REQUESTS => format!("HTTP {}: rate limit exceeded", status),
    _ => {
      let body = response.text().await.unwrap_or_else(|_| "Unable to read error".to_string());
      format!("HTTP {}: {}", status, body.chars().take(200).collect::<String>())
    }
  };

  Err(LoaderError::provider(api_source, message))
}
