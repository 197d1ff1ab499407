//! ドメインモデル
//!
//! 標準ライブラリのみ使用（外部依存なし）

mod config;    // 永続化するフラグ既定値
mod execution; // スクリプト実行結果
mod request;   // リンク作成要求
mod script;    // 生成するリンクスクリプト

pub use config::*;
pub use execution::*;
pub use request::*;
pub use script::*;
