//! Security Module
//!
//! ダウンロードファイル名の検証を行うモジュール。
//! 出力ディレクトリの外へ書き込むパストラバーサルを防ぎます。

/// ファイル名の最大長（バイト）
///
/// 多くのファイルシステムの上限（255バイト）に合わせています。
pub(crate) const MAX_FILE_NAME_LEN: usize = 255;

/// ダウンロードファイル名の検証
///
/// ファイル名は出力ディレクトリ直下に保存されるため、ディレクトリ要素を含んではいけません。
///
/// # 引数
///
/// * `name` - 検証するファイル名（正規化済み）
///
/// # 戻り値
///
/// * `Ok(())` - ファイル名が安全な場合
/// * `Err(String)` - ファイル名が危険な場合（区切り文字や`..`を含むなど）
pub(crate) fn validate_file_name(name: &str) -> Result<(), String> {
    // 空のファイル名は拒否
    if name.is_empty() {
        return Err("Empty file name is not allowed".to_string());
    }

    if name.len() > MAX_FILE_NAME_LEN {
        return Err(format!(
            "File name is too long: {} bytes (max: {} bytes)",
            name.len(),
            MAX_FILE_NAME_LEN
        ));
    }

    // パス区切り文字を拒否（Unix形式の`/`とWindows形式の`\`）
    if name.contains('/') || name.contains('\\') {
        return Err(format!("Path separator in file name is not allowed: {}", name));
    }

    // `..`を拒否（ディレクトリトラバーサル攻撃）
    if name == "." || name == ".." || name.starts_with("..") {
        return Err(format!("Path traversal detected: {}", name));
    }

    // ドライブ指定（`C:`）やNUL文字を拒否
    if name.contains(':') || name.contains('\0') {
        return Err(format!("Invalid character in file name: {}", name));
    }

    Ok(())
}
