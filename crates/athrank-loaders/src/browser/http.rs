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

//! [`Browser`] over plain HTTP for server-rendered coin pages.

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, warn};

use super::{Browser, PageRegion};
use crate::error::{LoaderError, LoaderResult};

static PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?is)<p(?:\s[^>]*)?>(.*?)</p\s*>").expect("paragraph pattern compiles")
});
static TAG: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern compiles"));
static WHITESPACE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

/// Paragraphs taken into a labelled region, the label's own included.
const REGION_SPAN: usize = 3;

/// Fetches pages with reqwest and reads the delivered HTML.
///
/// The response body is the whole page, so once `navigate` returns there is no
/// further network activity to wait for. A labelled region is the `<p>` holding
/// the label text followed by the next paragraphs in the document.
pub struct HttpBrowser {
  client: Client,
  timeout: Duration,
  current: Option<LoadedPage>,
}

struct LoadedPage {
  url: String,
  paragraphs: Vec<String>,
}

impl HttpBrowser {
  pub fn new(timeout: Duration) -> LoaderResult<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .user_agent("Mozilla/5.0 (compatible; athrank/0.1)")
      .build()
      .map_err(|e| LoaderError::Config(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self::with_client(client, timeout))
  }

  /// Create a browser with a custom HTTP client.
  pub fn with_client(client: Client, timeout: Duration) -> Self {
    Self { client, timeout, current: None }
  }

  fn loaded(&self) -> LoaderResult<&LoadedPage> {
    self.current.as_ref().ok_or_else(|| LoaderError::enrichment("-", "no page loaded"))
  }
}

/// Rate limiting and server-side failures clear up on their own; they go through
/// the same backoff as a page that never finished loading.
fn is_transient(status: StatusCode) -> bool {
  status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn load_error(url: &str, err: reqwest::Error) -> LoaderError {
  if err.is_timeout() {
    LoaderError::Timeout { key: url.to_string(), attempts: 1 }
  } else {
    LoaderError::enrichment(url, format!("page request failed: {}", err))
  }
}

#[async_trait]
impl Browser for HttpBrowser {
  async fn navigate(&mut self, url: &str) -> LoaderResult<()> {
    self.current = None;
    debug!("Loading {}", url);

    let response =
      self.client.get(url).timeout(self.timeout).send().await.map_err(|e| load_error(url, e))?;

    let status = response.status();
    if is_transient(status) {
      warn!("{} answered HTTP {}, treating as a timed-out load", url, status);
      return Err(LoaderError::Timeout { key: url.to_string(), attempts: 1 });
    }
    if !status.is_success() {
      return Err(LoaderError::enrichment(url, format!("HTTP {}", status)));
    }

    let html = response.text().await.map_err(|e| load_error(url, e))?;
    self.current = Some(LoadedPage { url: url.to_string(), paragraphs: paragraphs(&html) });
    Ok(())
  }

  async fn wait_for_network_idle(&mut self) -> LoaderResult<()> {
    let page = self.loaded()?;
    debug!("{} settled with {} paragraphs", page.url, page.paragraphs.len());
    Ok(())
  }

  async fn query_by_label(&self, label: &str) -> LoaderResult<Option<PageRegion>> {
    Ok(labelled_region(&self.loaded()?.paragraphs, label))
  }
}

/// Visible text of every paragraph, in document order.
pub(crate) fn paragraphs(html: &str) -> Vec<String> {
  PARAGRAPH.captures_iter(html).map(|c| visible_text(&c[1])).collect()
}

fn visible_text(fragment: &str) -> String {
  let stripped = TAG.replace_all(fragment, " ");
  let decoded = stripped
    .replace("&nbsp;", " ")
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&amp;", "&");
  WHITESPACE.replace_all(decoded.trim(), " ").into_owned()
}

pub(crate) fn labelled_region(paragraphs: &[String], label: &str) -> Option<PageRegion> {
  let start = paragraphs
    .iter()
    .position(|p| p == label)
    .or_else(|| paragraphs.iter().position(|p| p.contains(label)))?;

  let end = (start + REGION_SPAN).min(paragraphs.len());
  Some(PageRegion::new(paragraphs[start..end].to_vec()))
}
