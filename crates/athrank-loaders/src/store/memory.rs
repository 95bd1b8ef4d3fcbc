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

//! In-memory record store.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use super::{apply_mutation, ensure_unique_keys, RecordMutator, RecordStore};
use crate::error::LoaderResult;
use crate::types::CoinRecord;

/// Vec-backed store. Counts committed writes, which makes "nothing was
/// rewritten" observable.
#[derive(Default)]
pub struct MemoryRecordStore {
  records: Mutex<Vec<CoinRecord>>,
  writes: AtomicUsize,
}

impl MemoryRecordStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_records(records: Vec<CoinRecord>) -> LoaderResult<Self> {
    ensure_unique_keys(&records)?;
    Ok(Self { records: Mutex::new(records), writes: AtomicUsize::new(0) })
  }

  /// Number of mutating calls that changed the store.
  pub fn write_count(&self) -> usize {
    self.writes.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
  async fn load(&self) -> LoaderResult<Vec<CoinRecord>> {
    Ok(self.records.lock().await.clone())
  }

  async fn save(&self, records: Vec<CoinRecord>) -> LoaderResult<()> {
    ensure_unique_keys(&records)?;
    *self.records.lock().await = records;
    self.writes.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }

  async fn upsert(&self, key: &str, mutate: RecordMutator) -> LoaderResult<CoinRecord> {
    let mut records = self.records.lock().await;
    let updated = apply_mutation(&mut records, key, mutate)?;
    self.writes.fetch_add(1, Ordering::SeqCst);
    Ok(updated)
  }

  async fn delete(&self, key: &str) -> LoaderResult<bool> {
    let mut records = self.records.lock().await;
    let before = records.len();
    records.retain(|r| r.key != key);
    let removed = records.len() != before;
    if removed {
      self.writes.fetch_add(1, Ordering::SeqCst);
    }
    Ok(removed)
  }
}
