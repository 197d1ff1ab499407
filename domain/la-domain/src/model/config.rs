/// 永続化するフラグの既定値。
/// GUI版のチェックボックス状態に相当し、CLIでは起動時の既定として読み込む。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub use_relative_path: bool,
    pub retain_script_file: bool,
    pub pin_to_quick_access: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            use_relative_path: true,
            retain_script_file: false,
            pin_to_quick_access: false,
        }
    }
}
