//! History Store Module
//!
//! アップロード履歴を新しい順に保持し、キー・バリューストアへ永続化するモジュール。
//! 変更のたびに履歴全体をJSON配列としてシリアライズし、固定キーの下に保存します。

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::storage::KeyValueStore;
use crate::types::HistoryRecord;

/// 履歴を保存するストアのキー
pub const HISTORY_KEY: &str = "bank-gl-history";

/// 同一プロセス内でのID衝突を避けるためのカウンタ
static ID_COUNTER: AtomicU32 = AtomicU32::new(0);

/// アップロード履歴ストア
///
/// 履歴は常に新しい順（インデックス0が最新）に並び、IDは一意です。
/// メモリ上の履歴と永続化された履歴は常に一致します。書き込みに失敗した
/// 変更はメモリ上にも反映されません。
///
/// # 使用例
///
/// ```rust
/// use bankgl::{HistoryStore, MemoryStore};
///
/// # fn main() -> Result<(), bankgl::BankGlError> {
/// let mut history = HistoryStore::open(MemoryStore::new());
/// let record = history.add("statement1.pdf", Some("42 KB".to_string()))?;
/// assert_eq!(history.selected_id(), Some(record.id.as_str()));
///
/// history.remove(&record.id)?;
/// assert!(history.is_empty());
/// assert_eq!(history.selected_id(), None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HistoryStore<S: KeyValueStore> {
    store: S,
    records: Vec<HistoryRecord>,
    selected: Option<String>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// ストアから履歴を読み込んで履歴ストアを生成する
    ///
    /// 選択状態は永続化されないため、常に未選択から始まります。
    pub fn open(store: S) -> Self {
        let records = Self::load(&store);
        Self {
            store,
            records,
            selected: None,
        }
    }

    /// 永続化された履歴を読み込む
    ///
    /// キーが存在しない場合や内容が壊れている場合は、エラーを伝播せずに
    /// 空の履歴を返します（壊れていた場合はログに記録します）。
    pub fn load(store: &S) -> Vec<HistoryRecord> {
        let raw = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("failed to read upload history: {}; starting empty", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<HistoryRecord>>(&raw) {
            Ok(records) => {
                debug!("loaded {} history record(s)", records.len());
                records
            }
            Err(e) => {
                warn!("failed to parse upload history: {}; starting empty", e);
                Vec::new()
            }
        }
    }

    /// 永続化された内容から履歴を読み直す
    ///
    /// 選択中のレコードが読み直した履歴に存在しない場合は選択を解除します。
    pub fn reload(&mut self) {
        self.records = Self::load(&self.store);
        let still_present = self
            .selected
            .as_deref()
            .map_or(true, |id| self.records.iter().any(|r| r.id == id));
        if !still_present {
            self.selected = None;
        }
    }

    /// 新しいレコードを先頭に追加し、選択状態にして永続化する
    ///
    /// # 戻り値
    ///
    /// * `Ok(HistoryRecord)` - 追加されたレコード
    /// * `Err(BankGlError)` - 永続化に失敗した場合（履歴は変更されない）
    pub fn add(
        &mut self,
        file_name: impl Into<String>,
        file_size: Option<String>,
    ) -> Result<HistoryRecord> {
        let record = HistoryRecord {
            id: self.unique_id(),
            file_name: file_name.into(),
            upload_date: Utc::now(),
            file_size,
        };

        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.push(record.clone());
        records.extend(self.records.iter().cloned());
        self.persist(&records)?;

        self.records = records;
        self.selected = Some(record.id.clone());
        info!("added history record {} ({})", record.id, record.file_name);
        Ok(record)
    }

    /// 指定されたIDのレコードを削除して永続化する
    ///
    /// 存在しないIDの場合は何もしません。削除したレコードが選択中だった場合は
    /// 選択を解除します（他のレコードを自動で選択することはありません）。
    pub fn remove(&mut self, id: &str) -> Result<()> {
        if !self.records.iter().any(|r| r.id == id) {
            debug!("history record {} not found; nothing to remove", id);
            return Ok(());
        }

        let records: Vec<HistoryRecord> = self
            .records
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();
        self.persist(&records)?;

        self.records = records;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        info!("removed history record {}", id);
        Ok(())
    }

    /// 選択中のレコードを変更する
    ///
    /// 履歴の並びや永続化された内容は変更しません。
    pub fn select(&mut self, id: &str) {
        self.selected = Some(id.to_string());
    }

    /// 選択中のレコードID
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// 選択中のレコード
    pub fn selected(&self) -> Option<&HistoryRecord> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// IDでレコードを検索する
    pub fn get(&self, id: &str) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// 新しい順のレコード一覧
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// レコード数
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 履歴が空かどうか
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 履歴全体をストアに書き込む
    fn persist(&self, records: &[HistoryRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.store.set(HISTORY_KEY, &json)
    }

    /// 既存のIDと衝突しないIDを生成する
    fn unique_id(&self) -> String {
        loop {
            let id = generate_id();
            if !self.records.iter().any(|r| r.id == id) {
                return id;
            }
        }
    }
}

/// 時刻ベースのIDを生成する（ミリ秒の16進 + ランダムサフィックス）
fn generate_id() -> String {
    let now = Utc::now();
    format!("{:x}-{}", now.timestamp_millis(), rand_suffix())
}

fn rand_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let count = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:08x}", nanos ^ count.wrapping_mul(0x9E37_79B9))
}
