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

//! Command-line overrides layered on top of the environment configuration.

use anyhow::{Context, Result};
use athrank_core::{Config, ThousandsFactor};
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct Overrides {
  /// Record store file
  #[arg(long, value_name = "PATH")]
  pub store: Option<PathBuf>,

  /// Number of coins in the market snapshot
  #[arg(long, value_name = "N")]
  pub top: Option<u32>,

  /// Keep only coins launched on or after this date (YYYY-MM-DD)
  #[arg(long, value_name = "DATE")]
  pub cutoff: Option<NaiveDate>,

  /// Apply the launch-date filter
  #[arg(long)]
  pub filter: bool,

  /// Replace the stored records with a fresh snapshot
  #[arg(long)]
  pub refresh: bool,

  /// Log and skip coin pages that fail instead of aborting
  #[arg(long)]
  pub skip_failed_pages: bool,

  /// Read the K suffix as thousands
  #[arg(long)]
  pub standard_thousands: bool,

  /// Disable the progress bar
  #[arg(long)]
  pub no_progress: bool,
}

impl Overrides {
  /// Flags only ever switch a setting on; unset options keep the environment's value.
  pub fn apply(&self, config: &mut Config) {
    if let Some(store) = &self.store {
      config.store_path = store.clone();
    }
    if let Some(top) = self.top {
      config.top_coins_count = top;
    }
    if let Some(cutoff) = self.cutoff {
      config.cutoff_date = cutoff;
    }
    config.filter_enabled |= self.filter;
    config.refresh_snapshot |= self.refresh;
    config.skip_failed_pages |= self.skip_failed_pages;
    if self.standard_thousands {
      config.thousands_factor = ThousandsFactor::Standard;
    }
    if self.no_progress {
      config.show_progress = false;
    }
  }
}

pub fn load(overrides: &Overrides) -> Result<Config> {
  let mut config = Config::from_env().context("Failed to load configuration")?;
  overrides.apply(&mut config);
  config.validate().context("Invalid configuration")?;
  Ok(config)
}
