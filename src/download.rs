//! Download Target Module
//!
//! 生成したスプレッドシートのバイト列を保存する先を抽象化するモジュール。
//! ブラウザの「名前を付けて保存」に相当する処理を`DownloadTarget`トレイトとして表現します。

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{BankGlError, Result};
use crate::security::validate_file_name;

/// スプレッドシートの保存先
pub trait DownloadTarget {
    /// バイト列をファイル名で保存し、保存先のパスを返す
    ///
    /// 保存は全か無かでなければなりません。失敗した場合に途中までのファイルを
    /// 残してはいけません。
    fn save(&self, file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// ディレクトリへ保存する保存先
///
/// 一時ファイルに書き込んでから名前を変更するため、書き込み途中のファイルが
/// 最終的なファイル名で見えることはありません。同名のファイルは置き換えられます。
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    /// 保存先ディレクトリを指定して生成する（存在しない場合は保存時に作成）
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 保存先ディレクトリ
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadTarget for DirectoryTarget {
    fn save(&self, file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<PathBuf> {
        validate_file_name(file_name).map_err(BankGlError::Config)?;

        fs::create_dir_all(&self.dir)?;
        let destination = self.dir.join(file_name);

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.persist(&destination).map_err(|e| e.error)?;

        debug!(
            "saved {} bytes ({}) to {}",
            bytes.len(),
            mime_type,
            destination.display()
        );
        Ok(destination)
    }
}
