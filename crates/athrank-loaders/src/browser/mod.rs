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

//! Page rendering collaborator used by the ATH stage.
//!
//! The enrichment code only needs four capabilities: go to a URL, wait until the
//! page has settled, find the region carrying a given label, and read text out of
//! it. Anything that can do that (a headless browser, a plain HTTP fetch of
//! server-rendered HTML, a scripted fake) can drive the stage.

use async_trait::async_trait;

use crate::error::LoaderResult;

mod http;

pub use http::HttpBrowser;

/// The text elements of a labelled page region, in document order. Element 0 is
/// the label itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRegion {
  texts: Vec<String>,
}

impl PageRegion {
  pub fn new(texts: Vec<String>) -> Self {
    Self { texts }
  }

  pub fn text(&self, nth: usize) -> Option<&str> {
    self.texts.get(nth).map(String::as_str)
  }

  pub fn texts(&self) -> &[String] {
    &self.texts
  }
}

#[async_trait]
pub trait Browser: Send + Sync {
  /// Load `url`. A load that does not finish in time fails with
  /// [`LoaderError::Timeout`](crate::LoaderError::Timeout).
  async fn navigate(&mut self, url: &str) -> LoaderResult<()>;

  /// Block until the current page has no outstanding network activity.
  async fn wait_for_network_idle(&mut self) -> LoaderResult<()>;

  /// Locate the region whose label text matches `label` on the current page.
  async fn query_by_label(&self, label: &str) -> LoaderResult<Option<PageRegion>>;
}
