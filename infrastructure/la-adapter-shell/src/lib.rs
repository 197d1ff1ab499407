//! la-adapter-shell: エクスプローラ連携アダプタ。
//! desktop.ini によるフォルダ装飾、シェルへの変更通知、
//! クイックアクセスへの固定を実装する。

use la_domain::port::driven::ShellIntegration;
use la_domain::LinkError;
use std::fs;
use std::path::Path;
#[cfg(windows)]
use std::process::{Command, Stdio};
#[cfg(any(windows, test))]
use std::time::{Duration, Instant};

/// 固定操作の待ち時間上限。powershell が応答しない場合に備える。
#[cfg(any(windows, test))]
const PIN_TIMEOUT: Duration = Duration::from_secs(5);

/// シェル連携アダプター
#[derive(Default)]
pub struct ShellAdapter;

impl ShellAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ShellIntegration for ShellAdapter {
    fn write_folder_decoration(
        &self,
        folder: &str,
        localized_name: Option<&str>,
        icon_path: Option<&str>,
    ) -> Result<(), LinkError> {
        let decorate = || -> Result<(), String> {
            let ini_path = Path::new(folder).join("desktop.ini");

            // 既存の desktop.ini は隠し属性のままだと上書きできない
            if ini_path.exists() {
                clear_attributes(&ini_path)?;
            }

            let descriptor = compose_descriptor(localized_name, icon_path);
            fs::write(&ini_path, utf16_bytes(&descriptor))
                .map_err(|e| format!("write desktop.ini: {e}"))?;

            // desktop.ini は Hidden+System でないと反映されない
            set_hidden_system(&ini_path)?;
            // フォルダ自体にも System 属性が必要
            ensure_system_attribute(Path::new(folder))?;
            Ok(())
        };

        decorate().map_err(|cause| LinkError::DecorationFailed {
            folder: folder.to_string(),
            cause,
        })
    }

    fn notify_shell_changed(&self) {
        shell_change_notify();
    }

    fn pin_to_quick_access(&self, folder: &str) -> Result<(), LinkError> {
        invoke_pin_to_home(folder).map_err(|cause| LinkError::PinFailed {
            folder: folder.to_string(),
            cause,
        })
    }
}

/// desktop.ini の内容を組み立てる（CRLF区切り）
fn compose_descriptor(localized_name: Option<&str>, icon_path: Option<&str>) -> String {
    let mut text = String::from("[.ShellClassInfo]\r\n");
    if let Some(name) = localized_name {
        text.push_str(&format!("LocalizedResourceName={}\r\n", name));
    }
    if let Some(icon) = icon_path {
        text.push_str(&format!("IconResource={},0\r\n", icon));
        text.push_str("IconIndex=0\r\n");
    }
    text
}

/// UTF-16 LE（BOM付き）にエンコードする。エクスプローラは
/// desktop.ini の非ASCII文字をこのエンコーディングでのみ解釈する。
fn utf16_bytes(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

/// PowerShellのシングルクォート文字列用エスケープ
fn escape_for_powershell(path: &str) -> String {
    path.replace('\'', "''")
}

/// Shell.Application COM オブジェクトの pintohome 動詞を呼ぶコマンド
fn pin_command(folder: &str) -> String {
    let escaped = escape_for_powershell(folder);
    format!(
        "$shell = New-Object -ComObject Shell.Application; \
         $folder = $shell.Namespace('{escaped}'); \
         $folder.Self.InvokeVerb('pintohome')"
    )
}

#[cfg(windows)]
fn invoke_pin_to_home(folder: &str) -> Result<(), String> {
    let child = Command::new("powershell.exe")
        .args(["-NoProfile", "-NonInteractive", "-Command", &pin_command(folder)])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("spawn powershell: {e}"))?;

    // 固定はベストエフォート。終了コードや時間切れでは失敗にしない。
    let _ = wait_up_to(child, PIN_TIMEOUT);
    Ok(())
}

/// 子プロセスの終了を上限まで待つ。時間切れなら kill して `None` を返す。
#[cfg(any(windows, test))]
fn wait_up_to(
    mut child: std::process::Child,
    limit: Duration,
) -> Option<std::process::ExitStatus> {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Some(status),
            Ok(None) => {
                if started.elapsed() >= limit {
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(_) => return None,
        }
    }
}

#[cfg(not(windows))]
fn invoke_pin_to_home(folder: &str) -> Result<(), String> {
    // 非Windowsではコマンド文字列の組み立てのみ行う（テスト用）
    let _ = pin_command(folder);
    Ok(())
}

/// アイコンキャッシュ更新のためシェルへ関連付け変更を通知する
#[cfg(windows)]
fn shell_change_notify() {
    use windows::Win32::UI::Shell::{SHChangeNotify, SHCNE_ASSOCCHANGED, SHCNF_IDLIST};

    unsafe {
        SHChangeNotify(SHCNE_ASSOCCHANGED, SHCNF_IDLIST, None, None);
    }
}

#[cfg(not(windows))]
fn shell_change_notify() {}

#[cfg(windows)]
fn to_wide(path: &Path) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;
    let mut wide: Vec<u16> = path.as_os_str().encode_wide().collect();
    wide.push(0);
    wide
}

#[cfg(windows)]
fn clear_attributes(path: &Path) -> Result<(), String> {
    use windows::core::PCWSTR;
    use windows::Win32::Storage::FileSystem::{SetFileAttributesW, FILE_ATTRIBUTE_NORMAL};

    let wide = to_wide(path);
    unsafe {
        SetFileAttributesW(PCWSTR(wide.as_ptr()), FILE_ATTRIBUTE_NORMAL)
            .map_err(|e| format!("SetFileAttributesW failed: {}", e.message()))
    }
}

#[cfg(not(windows))]
fn clear_attributes(_path: &Path) -> Result<(), String> {
    Ok(())
}

#[cfg(windows)]
fn set_hidden_system(path: &Path) -> Result<(), String> {
    use windows::core::PCWSTR;
    use windows::Win32::Storage::FileSystem::{
        SetFileAttributesW, FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_SYSTEM,
    };

    let wide = to_wide(path);
    unsafe {
        SetFileAttributesW(
            PCWSTR(wide.as_ptr()),
            FILE_ATTRIBUTE_HIDDEN | FILE_ATTRIBUTE_SYSTEM,
        )
        .map_err(|e| format!("SetFileAttributesW failed: {}", e.message()))
    }
}

#[cfg(not(windows))]
fn set_hidden_system(_path: &Path) -> Result<(), String> {
    Ok(())
}

#[cfg(windows)]
fn ensure_system_attribute(path: &Path) -> Result<(), String> {
    use windows::core::PCWSTR;
    use windows::Win32::Storage::FileSystem::{
        GetFileAttributesW, SetFileAttributesW, FILE_ATTRIBUTE_SYSTEM,
        FILE_FLAGS_AND_ATTRIBUTES, INVALID_FILE_ATTRIBUTES,
    };

    let wide = to_wide(path);
    unsafe {
        let current = GetFileAttributesW(PCWSTR(wide.as_ptr()));
        if current == INVALID_FILE_ATTRIBUTES {
            return Err("GetFileAttributesW failed".into());
        }
        if current & FILE_ATTRIBUTE_SYSTEM.0 != 0 {
            return Ok(());
        }
        SetFileAttributesW(
            PCWSTR(wide.as_ptr()),
            FILE_FLAGS_AND_ATTRIBUTES(current | FILE_ATTRIBUTE_SYSTEM.0),
        )
        .map_err(|e| format!("SetFileAttributesW failed: {}", e.message()))
    }
}

#[cfg(not(windows))]
fn ensure_system_attribute(_path: &Path) -> Result<(), String> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_with_icon_only() {
        let text = compose_descriptor(None, Some(r"C:\icons\star.ico"));
        assert_eq!(
            text,
            "[.ShellClassInfo]\r\nIconResource=C:\\icons\\star.ico,0\r\nIconIndex=0\r\n"
        );
    }

    #[test]
    fn descriptor_with_localized_name() {
        let text = compose_descriptor(Some("作業フォルダ"), None);
        assert_eq!(
            text,
            "[.ShellClassInfo]\r\nLocalizedResourceName=作業フォルダ\r\n"
        );
    }

    #[test]
    fn utf16_bytes_start_with_le_bom() {
        let bytes = utf16_bytes("A");
        assert_eq!(bytes, vec![0xFF, 0xFE, 0x41, 0x00]);
    }

    #[test]
    fn utf16_bytes_round_trip() {
        let text = compose_descriptor(None, Some(r"C:\アイコン\星.ico"));
        let bytes = utf16_bytes(&text);

        assert_eq!(&bytes[..2], &[0xFF, 0xFE]);
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(String::from_utf16(&units).unwrap(), text);
    }

    #[test]
    fn decoration_writes_utf16_desktop_ini() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().to_string_lossy().to_string();
        let adapter = ShellAdapter::new();

        adapter
            .write_folder_decoration(&folder, None, Some(r"C:\icons\star.ico"))
            .unwrap();

        let bytes = fs::read(dir.path().join("desktop.ini")).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xFE]);
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        let text = String::from_utf16(&units).unwrap();
        assert!(text.starts_with("[.ShellClassInfo]\r\n"));
        assert!(text.contains("IconResource=C:\\icons\\star.ico,0"));
    }

    #[test]
    fn existing_desktop_ini_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().to_string_lossy().to_string();
        fs::write(dir.path().join("desktop.ini"), b"old").unwrap();
        let adapter = ShellAdapter::new();

        adapter
            .write_folder_decoration(&folder, None, Some(r"C:\icons\star.ico"))
            .unwrap();

        let bytes = fs::read(dir.path().join("desktop.ini")).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xFE]);
    }

    #[cfg(not(windows))]
    #[test]
    fn nonzero_exit_is_collected_without_error() {
        let child = std::process::Command::new("sh")
            .args(["-c", "exit 3"])
            .spawn()
            .unwrap();
        let status = wait_up_to(child, PIN_TIMEOUT).unwrap();
        assert!(!status.success());
        assert_eq!(status.code(), Some(3));
    }

    #[cfg(not(windows))]
    #[test]
    fn unresponsive_child_is_killed_at_the_limit() {
        let child = std::process::Command::new("sh")
            .args(["-c", "sleep 30"])
            .spawn()
            .unwrap();
        let started = Instant::now();
        assert!(wait_up_to(child, Duration::from_millis(200)).is_none());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn single_quotes_are_doubled_for_powershell() {
        assert_eq!(
            escape_for_powershell(r"C:\it's here"),
            r"C:\it''s here"
        );
        let command = pin_command(r"C:\it's here");
        assert!(command.contains(r"Namespace('C:\it''s here')"));
        assert!(command.contains("InvokeVerb('pintohome')"));
    }
}
