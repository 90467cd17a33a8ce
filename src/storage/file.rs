//! JSON File Store
//!
//! ディスク上の単一JSONファイル（キー → 文字列のオブジェクト）をストアとして扱う実装。
//! 書き込みは一時ファイル経由で行い、途中状態のファイルが見えないようにします。

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::Result;

/// JSONファイルベースのキー・バリューストア
///
/// 読み込みのたびにファイルを開き直すため、同じパスを指す複数のインスタンスを
/// 同時に使用しても内容は食い違いません。
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// 指定されたパスのストアを生成する（ファイルは最初の書き込みで作成される）
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// ストアファイルのパス
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ファイル全体を読み込む
    ///
    /// ファイルが存在しない場合は空のマップを返します。
    /// JSONとして不正な場合は`BankGlError::Json`を返します。
    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// 書き込み用にファイル全体を読み込む
    ///
    /// 壊れたファイルは上書きの対象とし、空のマップから再構築します。
    fn read_entries_for_update(&self) -> Result<BTreeMap<String, String>> {
        match self.read_entries() {
            Ok(entries) => Ok(entries),
            Err(crate::error::BankGlError::Json(e)) => {
                warn!(
                    "store file {} is malformed ({}); rebuilding it",
                    self.path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }

    /// ファイル全体をアトミックに書き込む
    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(
            "wrote {} key(s) to {}",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }
}
