//! ポート定義
//!
//! - driving: アプリケーション層から呼び出されるユースケース
//! - driven: インフラ層が実装するインターフェース

pub mod driven;
pub mod driving;
