//! ドライビングポート（アプリケーション層から呼び出される）

mod create_links;

pub use create_links::CreateLinksUseCase;
