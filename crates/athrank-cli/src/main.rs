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

use anyhow::{Context, Result};
use athrank_loaders::Pipeline;
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

/// Rank coins by how far they trade below their all-time-high market cap.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "athrank")]
struct Cli {
  #[command(flatten)]
  overrides: config::Overrides,

  /// Verbose output
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  // Load .env first so RUST_LOG set there is honoured
  dotenv().ok();

  let cli = Cli::parse();

  // RUST_LOG wins over --verbose; logs go to stderr so stdout carries only the ranking
  let log_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

  let config = config::load(&cli.overrides)?;
  info!("Using store {}", config.store_path.display());

  let mut pipeline = Pipeline::from_config(config).context("Failed to set up pipeline")?;
  let output = pipeline.run().await.context("Pipeline run failed")?;

  if let Some(snapshot) = &output.snapshot {
    info!("Snapshot seeded {} of {} fetched records", snapshot.seeded, snapshot.fetched);
  }
  info!(
    "ATH stage: {} enriched, {} deleted, {} failed in {} pass(es)",
    output.ath.enriched,
    output.ath.deleted,
    output.ath.failed.len(),
    output.ath.passes
  );

  for coin in &output.ranking {
    println!("{}", coin);
  }

  Ok(())
}
