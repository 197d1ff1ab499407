//! ドメインエラー型
//!
//! 標準ライブラリのみ使用（外部エラーハンドリングクレートなし）

use std::fmt;

/// ドメイン層のエラー型
/// 各バリアントは特定の失敗シナリオを表現
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// リンク先ディレクトリが存在しない
    DestinationNotFound(String),

    /// 入力のバリデーションエラー
    ValidationError(String),

    /// スクリプトファイルの書き出し失敗
    ScriptWriteFailed(String),

    /// 昇格起動の失敗（UACの拒否を含む）
    ElevationFailed(String),

    /// スクリプトが非ゼロ終了コードで終了
    ScriptFailed { exit_code: i32, stderr: String },

    /// desktop.ini の書き込み・属性設定の失敗
    DecorationFailed { folder: String, cause: String },

    /// クイックアクセスへの固定の失敗
    PinFailed { folder: String, cause: String },

    /// 設定ファイルの読み込み失敗
    ConfigLoadFailed(String),

    /// ファイルI/Oエラー
    IoError(String),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DestinationNotFound(path) => {
                write!(f, "Destination path does not exist: {}", path)
            }
            Self::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
            Self::ScriptWriteFailed(msg) => {
                write!(f, "Failed to write link script: {}", msg)
            }
            Self::ElevationFailed(msg) => {
                write!(f, "Elevated launch failed: {}", msg)
            }
            Self::ScriptFailed { exit_code, stderr } => {
                write!(
                    f,
                    "Link script exited with code {}: {}",
                    exit_code,
                    stderr.trim()
                )
            }
            Self::DecorationFailed { folder, cause } => {
                write!(f, "Failed to apply decoration to '{}': {}", folder, cause)
            }
            Self::PinFailed { folder, cause } => {
                write!(f, "Failed to pin '{}' to quick access: {}", folder, cause)
            }
            Self::ConfigLoadFailed(msg) => {
                write!(f, "Configuration load failed: {}", msg)
            }
            Self::IoError(msg) => {
                write!(f, "IO error: {}", msg)
            }
        }
    }
}

impl std::error::Error for LinkError {}
