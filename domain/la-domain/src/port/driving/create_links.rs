use crate::model::LinkRequest;
use crate::LinkError;

/// リンク一括作成ユースケース
pub trait CreateLinksUseCase {
    /// 検証、スクリプト生成、昇格実行、後処理（装飾・固定）を順に行う。
    /// 成功時は作成したリンクの数を返す。
    fn create_links(&self, request: &LinkRequest) -> Result<usize, LinkError>;
}
