//! Storage Module
//!
//! 履歴やテーマ設定を保存するキー・バリューストアを提供します。
//! ブラウザのlocalStorageに相当する永続層を`KeyValueStore`トレイトで抽象化し、
//! ディスク上のJSONファイル実装とテスト用のインメモリ実装を切り替えられるようにします。

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// 文字列キーと文字列値を保存する永続ストア
///
/// 単一スレッドからのみ使用される前提のため、`&self`で読み書きします。
/// 実装は書き込みのたびに内容を永続化しなければなりません。
pub trait KeyValueStore {
    /// キーに対応する値を取得する（存在しない場合は`None`）
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// キーに値を保存する
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
