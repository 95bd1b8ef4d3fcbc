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

//! Keyed record storage.
//!
//! Stages communicate only through a [`RecordStore`]. Each mutating call is
//! durable when it returns, so a long-running stage interrupted between calls
//! loses at most the record it was working on.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::error::{LoaderError, LoaderResult};
use crate::types::CoinRecord;

mod json;
mod memory;

pub use json::JsonRecordStore;
pub use memory::MemoryRecordStore;

/// Read-modify-write callback handed to [`RecordStore::upsert`].
pub type RecordMutator = Box<dyn FnOnce(&mut CoinRecord) + Send>;

/// Storage interface for coin records.
///
/// Implementations must keep keys unique and must not expose a half-applied
/// write: either a call's change is fully visible to the next `load`, or not at all.
#[async_trait]
pub trait RecordStore: Send + Sync {
  /// All records in stored order.
  async fn load(&self) -> LoaderResult<Vec<CoinRecord>>;

  /// Replace the full record set.
  async fn save(&self, records: Vec<CoinRecord>) -> LoaderResult<()>;

  /// Apply `mutate` to the record stored under `key` and persist it.
  ///
  /// Fails with [`LoaderError::RecordNotFound`] if the key is unknown; records
  /// are only created through [`RecordStore::save`].
  async fn upsert(&self, key: &str, mutate: RecordMutator) -> LoaderResult<CoinRecord>;

  /// Remove the record under `key`. Returns whether anything was removed.
  async fn delete(&self, key: &str) -> LoaderResult<bool>;

  async fn is_empty(&self) -> LoaderResult<bool> {
    Ok(self.load().await?.is_empty())
  }
}

pub(crate) fn ensure_unique_keys(records: &[CoinRecord]) -> LoaderResult<()> {
  let mut seen = HashSet::with_capacity(records.len());
  for record in records {
    if !seen.insert(record.key.as_str()) {
      return Err(LoaderError::DuplicateKey(record.key.clone()));
    }
  }
  Ok(())
}

/// Applies `mutate` in place; the key itself may not change.
pub(crate) fn apply_mutation(
  records: &mut [CoinRecord],
  key: &str,
  mutate: RecordMutator,
) -> LoaderResult<CoinRecord> {
  let record = records
    .iter_mut()
    .find(|r| r.key == key)
    .ok_or_else(|| LoaderError::RecordNotFound(key.to_string()))?;

  let mut updated = record.clone();
  mutate(&mut updated);
  if updated.key != key {
    return Err(LoaderError::Store(format!(
      "mutation changed immutable key {} to {}",
      key, updated.key
    )));
  }

  *record = updated.clone();
  Ok(updated)
}
