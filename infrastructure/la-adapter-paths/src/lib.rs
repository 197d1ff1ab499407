//! LinkAnchorの既定パス解決

use std::path::PathBuf;

#[cfg(windows)]
fn known_folder_path(id: &windows::core::GUID) -> Option<PathBuf> {
    use windows::core::PWSTR;
    use windows::Win32::System::Com::CoTaskMemFree;
    use windows::Win32::UI::Shell::{SHGetKnownFolderPath, KF_FLAG_DEFAULT};

    unsafe {
        let raw: PWSTR = SHGetKnownFolderPath(id, KF_FLAG_DEFAULT, None).ok()?;
        let s = pwstr_to_string(raw);
        CoTaskMemFree(Some(raw.0 as _));
        if s.is_empty() {
            None
        } else {
            Some(PathBuf::from(s))
        }
    }
}

#[cfg(windows)]
fn pwstr_to_string(pwstr: windows::core::PWSTR) -> String {
    unsafe {
        if pwstr.is_null() {
            return String::new();
        }
        let mut len = 0usize;
        while *pwstr.0.add(len) != 0 {
            len += 1;
        }
        let slice = std::slice::from_raw_parts(pwstr.0, len);
        String::from_utf16_lossy(slice)
    }
}

/// 既定の製品ルートディレクトリ
///
/// - Windows: `%LOCALAPPDATA%\LinkAnchor`（既知フォルダ）
/// - その他: `./var`（開発/テスト用）
pub fn default_product_root_dir() -> PathBuf {
    #[cfg(windows)]
    {
        use windows::Win32::UI::Shell::FOLDERID_LocalAppData;

        known_folder_path(&FOLDERID_LocalAppData)
            .or_else(|| std::env::var("LOCALAPPDATA").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(r"C:\Users\Default\AppData\Local"))
            .join("LinkAnchor")
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("./var")
    }
}

/// 設定ファイル用ディレクトリ
pub fn default_config_dir() -> PathBuf {
    default_product_root_dir().join("config")
}

/// 設定ファイルの既定パス
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_lives_under_product_root() {
        let path = default_config_path();
        assert!(path.starts_with(default_product_root_dir()));
        assert!(path.ends_with(PathBuf::from("config").join("config.json")));
    }
}
