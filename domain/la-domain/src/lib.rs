//! LinkAnchor ドメイン層
//!
//! リンク一括作成オーケストレーションの中核。外部依存ゼロでRust標準ライブラリのみ使用。
//! ヘキサゴナルアーキテクチャの最内層。

pub mod error;   // ドメインエラー定義
pub mod model;   // ドメインモデル（値オブジェクト）
pub mod path;    // パス分解・相対パス計算
pub mod port;    // ポート（driving/driven）
pub mod service; // ドメインサービス

pub use error::LinkError; // エラー型を再エクスポート
