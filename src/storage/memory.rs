//! In-Memory Store
//!
//! テストやデモ用のインメモリストア。

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::KeyValueStore;
use crate::error::Result;

/// インメモリのキー・バリューストア
///
/// クローンは同じ内容を共有します。履歴ストアに渡した後でも、
/// 手元のクローンから永続化された値を確認できます。
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    /// 空のストアを生成する
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期値を持つストアを生成する
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// 保存されているキーの数
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// ストアが空かどうか
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
