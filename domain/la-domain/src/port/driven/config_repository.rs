use crate::model::AppConfig;
use crate::LinkError;

/// フラグ既定値の永続化ポート
pub trait ConfigRepository {
    /// 設定を読み込む。ファイルが無い場合は `Default` を返す。
    fn load(&self) -> Result<AppConfig, LinkError>;

    fn save(&self, config: &AppConfig) -> Result<(), LinkError>;
}
