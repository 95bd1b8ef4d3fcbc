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

//! Abbreviated magnitude parsing (`"1.2B"`, `"$450.3M"`).

use athrank_core::ThousandsFactor;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{LoaderError, LoaderResult};

static NUMBER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("number pattern compiles"));

/// Converts human-readable magnitudes into whole units.
///
/// The first decimal number in the text is taken, and the first non-blank
/// character after it must be one of `K`, `M`, `B`, `T`. The product is truncated
/// toward zero. Arithmetic is done in decimal so `"2.3M"` is exactly 2,300,000.
#[derive(Debug, Clone, Copy)]
pub struct NumberParser {
  thousands: ThousandsFactor,
}

impl Default for NumberParser {
  fn default() -> Self {
    Self::new(ThousandsFactor::default())
  }
}

impl NumberParser {
  pub fn new(thousands: ThousandsFactor) -> Self {
    Self { thousands }
  }

  pub fn parse(&self, text: &str) -> LoaderResult<u64> {
    let found = NUMBER.find(text).ok_or_else(|| format_error(text, "no number found"))?;

    let suffix = text[found.end()..].trim_start().chars().next();
    let multiplier = match suffix {
      Some('K') => self.thousands.multiplier(),
      Some('M') => 1_000_000,
      Some('B') => 1_000_000_000,
      Some('T') => 1_000_000_000_000,
      _ => return Err(format_error(text, "missing K/M/B/T suffix")),
    };

    let value = Decimal::from_str(&found.as_str().replace(',', ""))
      .map_err(|e| format_error(text, &e.to_string()))?;

    value
      .checked_mul(Decimal::from(multiplier))
      .and_then(|scaled| scaled.trunc().to_u64())
      .ok_or_else(|| format_error(text, "value out of range"))
  }
}

fn format_error(input: &str, reason: &str) -> LoaderError {
  LoaderError::Format { input: input.to_string(), reason: reason.to_string() }
}
