//! ファイルシステムアダプター（設定永続化とパス照会）
//! 設定はJSONファイルで保存する。

use la_domain::model::AppConfig;
use la_domain::port::driven::{ConfigRepository, PathProbe};
use la_domain::LinkError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug)]
pub struct FsAdapter {
    config_path: PathBuf,
}

impl FsAdapter {
    /// 設定ファイルのパスを指定してアダプターを作成。ファイルは遅延作成。
    pub fn new(config_path: impl AsRef<Path>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn ensure_parent_dir(&self, path: &Path) -> Result<(), LinkError> {
        let Some(dir) = path.parent() else {
            return Ok(());
        };
        fs::create_dir_all(dir).map_err(|e| LinkError::IoError(format!("create_dir_all: {e}")))
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), LinkError> {
        self.ensure_parent_dir(path)?;
        let suffix = unique_suffix();
        let tmp_path = path.with_extension(format!("tmp.{suffix}"));
        {
            let mut f = fs::File::create(&tmp_path)
                .map_err(|e| LinkError::IoError(format!("create temp file: {e}")))?;
            f.write_all(data)
                .map_err(|e| LinkError::IoError(format!("write temp file: {e}")))?;
            let _ = f.sync_all();
        }
        if path.exists() {
            #[cfg(windows)]
            {
                if let Err(e) = replace_file(&tmp_path, path) {
                    let _ = fs::remove_file(&tmp_path);
                    return Err(e);
                }
                return Ok(());
            }
        }
        fs::rename(&tmp_path, path)
            .map_err(|e| LinkError::IoError(format!("rename temp file: {e}")))?;
        Ok(())
    }
}

impl ConfigRepository for FsAdapter {
    fn load(&self) -> Result<AppConfig, LinkError> {
        if !self.config_path.exists() {
            return Ok(AppConfig::default());
        }
        let buf = fs::read_to_string(&self.config_path)
            .map_err(|e| LinkError::ConfigLoadFailed(format!("read config: {e}")))?;
        let dto: ConfigDto = serde_json::from_str(&buf)
            .map_err(|e| LinkError::ConfigLoadFailed(e.to_string()))?;
        Ok(dto.into())
    }

    fn save(&self, config: &AppConfig) -> Result<(), LinkError> {
        let dto = ConfigDto::from(config);
        let data = serde_json::to_string_pretty(&dto)
            .map_err(|e| LinkError::IoError(format!("serialize config: {e}")))?;
        self.write_atomic(&self.config_path, data.as_bytes())
    }
}

impl PathProbe for FsAdapter {
    fn exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn is_dir(&self, path: &str) -> bool {
        Path::new(path).is_dir()
    }
}

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{}.{}", std::process::id(), nanos)
}

#[cfg(windows)]
fn replace_file(src: &Path, dst: &Path) -> Result<(), LinkError> {
    use std::os::windows::ffi::OsStrExt;
    use windows::core::PCWSTR;
    use windows::Win32::Storage::FileSystem::{ReplaceFileW, REPLACE_FILE_FLAGS};

    fn to_wide(path: &Path) -> Vec<u16> {
        let mut wide: Vec<u16> = path.as_os_str().encode_wide().collect();
        wide.push(0);
        wide
    }

    let src_w = to_wide(src);
    let dst_w = to_wide(dst);
    unsafe {
        ReplaceFileW(
            PCWSTR(dst_w.as_ptr()),
            PCWSTR(src_w.as_ptr()),
            PCWSTR::null(),
            REPLACE_FILE_FLAGS(0),
            None,
            None,
        )
        .map_err(|e| LinkError::IoError(format!("ReplaceFileW failed: {}", e.message())))?;
    }
    Ok(())
}

// ---------- DTO 定義 ----------

#[derive(Serialize, Deserialize)]
struct ConfigDto {
    #[serde(default = "default_true")]
    use_relative_path: bool,
    #[serde(default)]
    retain_script_file: bool,
    #[serde(default)]
    pin_to_quick_access: bool,
}

fn default_true() -> bool {
    true
}

impl From<&AppConfig> for ConfigDto {
    fn from(config: &AppConfig) -> Self {
        Self {
            use_relative_path: config.use_relative_path,
            retain_script_file: config.retain_script_file,
            pin_to_quick_access: config.pin_to_quick_access,
        }
    }
}

impl From<ConfigDto> for AppConfig {
    fn from(dto: ConfigDto) -> Self {
        Self {
            use_relative_path: dto.use_relative_path,
            retain_script_file: dto.retain_script_file,
            pin_to_quick_access: dto.pin_to_quick_access,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = FsAdapter::new(dir.path().join("config.json"));

        assert!(!adapter.config_path().exists());
        assert_eq!(adapter.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = FsAdapter::new(dir.path().join("config.json"));

        let config = AppConfig {
            use_relative_path: false,
            retain_script_file: true,
            pin_to_quick_access: true,
        };
        adapter.save(&config).unwrap();

        assert!(adapter.config_path().exists());
        assert_eq!(adapter.load().unwrap(), config);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = FsAdapter::new(dir.path().join("nested").join("config.json"));

        adapter.save(&AppConfig::default()).unwrap();
        assert!(adapter.config_path().exists());
    }

    #[test]
    fn partial_config_falls_back_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"retain_script_file": true}"#).unwrap();
        let adapter = FsAdapter::new(&path);

        let config = adapter.load().unwrap();
        assert!(config.use_relative_path);
        assert!(config.retain_script_file);
        assert!(!config.pin_to_quick_access);
    }

    #[test]
    fn corrupt_config_reports_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        let adapter = FsAdapter::new(&path);

        assert!(matches!(
            adapter.load(),
            Err(LinkError::ConfigLoadFailed(_))
        ));
    }

    #[test]
    fn probe_distinguishes_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "x").unwrap();
        let adapter = FsAdapter::new(dir.path().join("config.json"));

        let dir_str = dir.path().to_string_lossy().to_string();
        let file_str = file.to_string_lossy().to_string();
        assert!(PathProbe::exists(&adapter, &dir_str));
        assert!(adapter.is_dir(&dir_str));
        assert!(PathProbe::exists(&adapter, &file_str));
        assert!(!adapter.is_dir(&file_str));
        let missing = dir.path().join("gone").to_string_lossy().to_string();
        assert!(!PathProbe::exists(&adapter, &missing));
    }
}
