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

//! File-backed record store holding a `{"data": [...]}` JSON document.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use super::{apply_mutation, ensure_unique_keys, RecordMutator, RecordStore};
use crate::error::LoaderResult;
use crate::types::{CoinRecord, RecordDocument};

/// JSON document store.
///
/// Every write goes to a sibling `*.tmp` file which is synced and then renamed
/// over the document, so readers only ever see a complete old or new version.
pub struct JsonRecordStore {
  path: PathBuf,
  lock: Mutex<()>,
}

impl JsonRecordStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), lock: Mutex::new(()) }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Read the whole document. A missing or empty file is an empty store.
  pub async fn load_document(&self) -> LoaderResult<RecordDocument> {
    match fs::read(&self.path).await {
      Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(RecordDocument::default()),
      Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(RecordDocument::default()),
      Err(e) => Err(e.into()),
    }
  }

  fn temp_path(&self) -> PathBuf {
    let mut name: OsString =
      self.path.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "records".into());
    name.push(".tmp");
    self.path.with_file_name(name)
  }

  async fn write_document(&self, document: &RecordDocument) -> LoaderResult<()> {
    let mut buf = Vec::new();
    let mut serializer =
      serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut serializer)?;
    buf.push(b'\n');

    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).await?;
    }

    let temp = self.temp_path();
    let mut file = fs::File::create(&temp).await?;
    file.write_all(&buf).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(&temp, &self.path).await?;
    sync_parent_dir(&self.path).await?;

    debug!("Wrote {} records to {}", document.data.len(), self.path.display());
    Ok(())
  }
}

/// Persist the directory entry written by a rename.
#[cfg(unix)]
async fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
  let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
  fs::File::open(dir).await?.sync_all().await
}

// no directory handles to sync on this platform
#[cfg(not(unix))]
async fn sync_parent_dir(_path: &Path) -> std::io::Result<()> {
  Ok(())
}

#[async_trait]
impl RecordStore for JsonRecordStore {
  async fn load(&self) -> LoaderResult<Vec<CoinRecord>> {
    let _guard = self.lock.lock().await;
    Ok(self.load_document().await?.data)
  }

  async fn save(&self, records: Vec<CoinRecord>) -> LoaderResult<()> {
    ensure_unique_keys(&records)?;

    let _guard = self.lock.lock().await;
    let mut document = self.load_document().await?;
    document.data = records;
    self.write_document(&document).await
  }

  async fn upsert(&self, key: &str, mutate: RecordMutator) -> LoaderResult<CoinRecord> {
    let _guard = self.lock.lock().await;
    let mut document = self.load_document().await?;
    let updated = apply_mutation(&mut document.data, key, mutate)?;
    self.write_document(&document).await?;
    Ok(updated)
  }

  async fn delete(&self, key: &str) -> LoaderResult<bool> {
    let _guard = self.lock.lock().await;
    let mut document = self.load_document().await?;
    let before = document.data.len();
    document.data.retain(|r| r.key != key);
    if document.data.len() == before {
      return Ok(false);
    }
    self.write_document(&document).await?;
    Ok(true)
  }
}
