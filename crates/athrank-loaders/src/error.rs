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

//! Error types for the enrichment pipeline.

use thiserror::Error;

/// Errors that can occur while loading, enriching, or ranking coin records.
#[derive(Error, Debug)]
pub enum LoaderError {
  /// Magnitude text such as `"1.2B"` could not be turned into a number.
  #[error("Cannot parse magnitude {input:?}: {reason}")]
  Format { input: String, reason: String },

  /// The page loaded but the expected content was absent or unusable.
  #[error("Enrichment failed for {key}: {reason}")]
  Enrichment { key: String, reason: String },

  /// HTTP or payload failure from one of the data providers.
  #[error("Provider error from {api_source}: {message}")]
  Provider { api_source: String, message: String },

  /// A page did not settle within the configured bound.
  #[error("Timed out loading page for {key} after {attempts} attempt(s)")]
  Timeout { key: String, attempts: u32 },

  /// A record reached ranking without the fields ranking needs.
  #[error("Incomplete record: {0}")]
  IncompleteRecord(String),

  #[error("Record not found: {0}")]
  RecordNotFound(String),

  #[error("Duplicate record key: {0}")]
  DuplicateKey(String),

  #[error("Store error: {0}")]
  Store(String),

  #[error("Configuration error: {0}")]
  Config(String),
}

impl LoaderError {
  pub fn provider(api_source: &str, message: impl Into<String>) -> Self {
    LoaderError::Provider { api_source: api_source.to_string(), message: message.into() }
  }

  pub fn enrichment(key: &str, reason: impl Into<String>) -> Self {
    LoaderError::Enrichment { key: key.to_string(), reason: reason.into() }
  }

  pub fn is_timeout(&self) -> bool {
    matches!(self, LoaderError::Timeout { .. })
  }
}

impl From<reqwest::Error> for LoaderError {
  fn from(err: reqwest::Error) -> Self {
    LoaderError::Provider { api_source: "http".to_string(), message: err.to_string() }
  }
}

impl From<std::io::Error> for LoaderError {
  fn from(err: std::io::Error) -> Self {
    LoaderError::Store(err.to_string())
  }
}

impl From<serde_json::Error> for LoaderError {
  fn from(err: serde_json::Error) -> Self {
    LoaderError::Store(format!("JSON error: {}", err))
  }
}

impl From<athrank_core::Error> for LoaderError {
  fn from(err: athrank_core::Error) -> Self {
    LoaderError::Config(err.to_string())
  }
}

/// Result type for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;
