//! # オブジェクトキー生成
//!
//! 現在時刻（UNIXミリ秒）とファイル名からバケット内のオブジェクトキーを組み立てる。
//! 一意性はミリ秒精度のベストエフォートで、衝突チェックは行わない。

/// アプリ指定がない場合、またはフォルダ未指定の場合の既定プレフィックス
pub const DEFAULT_PREFIX: &str = "uploads";

/// `[A-Za-z0-9.-]` 以外の文字を1文字ずつ `_` に置換する。
/// 置換は文字単位のため、置換前後で文字数は変わらない。
pub fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// シングルバケット構成のキー: `uploads/<millis>-<fileName>`（ファイル名は無加工）
pub fn single_bucket_key(unix_millis: u128, file_name: &str) -> String {
    format!("{DEFAULT_PREFIX}/{unix_millis}-{file_name}")
}

/// マルチアプリ構成のキー: `<appName>/<folder or "uploads">/<millis>-<sanitized>`
pub fn app_scoped_key(
    unix_millis: u128,
    app_name: &str,
    folder: Option<&str>,
    file_name: &str,
) -> String {
    let sanitized = sanitize_file_name(file_name);
    let base_path = match folder.filter(|f| !f.is_empty()) {
        Some(folder) => format!("{folder}/{unix_millis}-{sanitized}"),
        None => format!("{DEFAULT_PREFIX}/{unix_millis}-{sanitized}"),
    };
    format!("{app_name}/{base_path}")
}
