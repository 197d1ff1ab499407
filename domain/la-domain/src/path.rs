//! パス分解・相対パス計算ユーティリティ（stdのみ）
//!
//! Windowsの `\` 区切りパスを前提とする。先頭セグメントがドライブ
//! （例: `C:`）になるよう分解し、相対パスの組み立てもこの分解結果上で行う。

/// パスを `\` で分解する。segment[0] がドライブ/ルートになる。
pub fn split_path(path: &str) -> Vec<String> {
    path.split('\\').map(|s| s.to_string()).collect()
}

/// 前後の空白と囲みの `"` を除去する。
pub fn sanitize_path(path: &str) -> String {
    path.trim().trim_matches('"').to_string()
}

/// 末尾のパス区切りを除去する（ルートのみの `C:\` も `C:` に縮退させる）。
pub fn strip_trailing_separator(path: &str) -> &str {
    path.trim_end_matches('\\')
}

/// `target` を `base` から見た相対パスとして組み立てる。
///
/// 共通する先頭セグメントを取り除き、`base` の残りセグメント1つにつき
/// `..` を1つ、続けて `target` の残りセグメントを `\` で連結する。
/// 両者が同一パスの場合は空文字列を返す。呼び出し側は空文字列を
/// 「使える相対パスなし」として絶対パスへフォールバックすること。
/// ドライブが異なる場合の呼び出しは想定しない（呼び出し側で除外する）。
pub fn relative_path(target: &[String], base: &[String]) -> String {
    let mut target = target.to_vec();
    let mut base = base.to_vec();

    while !target.is_empty() && !base.is_empty() && target[0] == base[0] {
        target.remove(0);
        base.remove(0);
    }

    let mut relative = String::new();
    for _ in &base {
        relative.push_str("..\\");
    }
    for segment in &target {
        relative.push_str(segment);
        relative.push('\\');
    }

    if relative.ends_with('\\') {
        relative.pop();
    }
    relative
}
