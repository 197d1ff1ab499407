use crate::LinkError;

/// エクスプローラ連携のポート。
///
/// フォルダ装飾（desktop.ini）とクイックアクセスへの固定を担当する。
pub trait ShellIntegration {
    /// ソースフォルダに desktop.ini を書き込み、属性を設定する。
    /// `localized_name` は表示名、`icon_path` はアイコンファイルのパス。
    /// 両方 `None` のときは呼び出さないこと。
    fn write_folder_decoration(
        &self,
        folder: &str,
        localized_name: Option<&str>,
        icon_path: Option<&str>,
    ) -> Result<(), LinkError>;

    /// シェルへ関連付け変更を通知し、アイコンキャッシュを更新させる。
    fn notify_shell_changed(&self);

    /// フォルダをクイックアクセスに固定する。
    fn pin_to_quick_access(&self, folder: &str) -> Result<(), LinkError>;
}
