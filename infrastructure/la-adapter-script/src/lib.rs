//! la-adapter-script: リンクスクリプトをUAC昇格付きで実行するアダプタ。
//! スクリプトの書き出し、cmd.exe経由の実行、標準エラー出力の回収、
//! 後始末までのライフサイクルを担当する。

use la_domain::model::{script_file_name, ExecutionResult, LinkScript};
use la_domain::port::driven::ElevatedScriptRunner;
use la_domain::LinkError;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// スクリプト実行アダプター
///
/// `mklink` はコマンドプロンプト内部コマンドのため、スクリプトを
/// `.cmd` ファイルに書き出して cmd.exe で実行する。シンボリックリンク
/// 作成には管理者権限が必要なので、実行は昇格プロンプト経由で行う。
pub struct ScriptRunnerAdapter {
    script_dir: PathBuf,
}

impl Default for ScriptRunnerAdapter {
    fn default() -> Self {
        // スクリプトは起動ディレクトリに置く。--retain-script はここに残す。
        Self {
            script_dir: std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir()),
        }
    }
}

impl ScriptRunnerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// スクリプトファイルの置き場所を指定する（テスト用）
    pub fn with_script_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.script_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn script_dir(&self) -> &Path {
        &self.script_dir
    }
}

impl ElevatedScriptRunner for ScriptRunnerAdapter {
    fn run_elevated(
        &self,
        script: &LinkScript,
        retain_script_file: bool,
    ) -> Result<ExecutionResult, LinkError> {
        fs::create_dir_all(&self.script_dir)
            .map_err(|e| LinkError::ScriptWriteFailed(format!("create script dir: {e}")))?;

        let script_path = self.script_dir.join(script_file_name(unique_ticks()));
        fs::write(&script_path, script.render())
            .map_err(|e| LinkError::ScriptWriteFailed(format!("write script: {e}")))?;

        let err_path = PathBuf::from(format!("{}.err", script_path.display()));
        let exit_code = execute_elevated(&script_path, &err_path);

        // 終了コードの確認より先に後始末する。スクリプトを残すのは
        // 明示的に指定されたときだけ。
        if !retain_script_file {
            let _ = fs::remove_file(&script_path);
        }
        let stderr = fs::read(&err_path)
            .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
            .unwrap_or_default();
        let _ = fs::remove_file(&err_path);

        Ok(ExecutionResult::new(exit_code?, stderr))
    }
}

fn unique_ticks() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}

/// スクリプトを管理者として実行し、終了コードを返す。
///
/// `ShellExecuteExW` は標準エラー出力をリダイレクトできないため、
/// cmd.exe のパラメータ側で `2>` によりファイルへ書かせる。
#[cfg(windows)]
fn execute_elevated(script_path: &Path, err_path: &Path) -> Result<i32, LinkError> {
    use windows::core::{HRESULT, PCWSTR};
    use windows::Win32::Foundation::{CloseHandle, ERROR_CANCELLED};
    use windows::Win32::System::Threading::{
        GetExitCodeProcess, WaitForSingleObject, INFINITE,
    };
    use windows::Win32::UI::Shell::{ShellExecuteExW, SEE_MASK_NOCLOSEPROCESS, SHELLEXECUTEINFOW};
    use windows::Win32::UI::WindowsAndMessaging::SW_HIDE;

    fn to_wide(s: &str) -> Vec<u16> {
        let mut wide: Vec<u16> = s.encode_utf16().collect();
        wide.push(0);
        wide
    }

    // cmd.exe に渡すパスは絶対パスにする。canonicalize は `\\?\` 接頭辞を
    // 付けてしまい cmd が解釈できないため使わない。
    let script_abs = std::path::absolute(script_path)
        .map_err(|e| LinkError::ElevationFailed(format!("resolve script path: {e}")))?;
    let err_abs = std::path::absolute(err_path)
        .map_err(|e| LinkError::ElevationFailed(format!("resolve stderr path: {e}")))?;

    let verb = to_wide("runas");
    let file = to_wide("cmd.exe");
    let parameters = to_wide(&format!(
        "/c \"\"{}\" 2>\"{}\"\"",
        script_abs.display(),
        err_abs.display()
    ));

    unsafe {
        let mut info = SHELLEXECUTEINFOW {
            cbSize: std::mem::size_of::<SHELLEXECUTEINFOW>() as u32,
            fMask: SEE_MASK_NOCLOSEPROCESS,
            lpVerb: PCWSTR(verb.as_ptr()),
            lpFile: PCWSTR(file.as_ptr()),
            lpParameters: PCWSTR(parameters.as_ptr()),
            nShow: SW_HIDE.0,
            ..Default::default()
        };

        ShellExecuteExW(&mut info).map_err(|e| {
            if e.code() == HRESULT::from_win32(ERROR_CANCELLED.0) {
                LinkError::ElevationFailed("elevation prompt was canceled".into())
            } else {
                LinkError::ElevationFailed(format!("ShellExecuteExW failed: {}", e.message()))
            }
        })?;

        let process = info.hProcess;
        if process.is_invalid() {
            return Err(LinkError::ElevationFailed(
                "no process handle returned".into(),
            ));
        }

        let _ = WaitForSingleObject(process, INFINITE);
        let mut code: u32 = 0;
        let result = GetExitCodeProcess(process, &mut code);
        let _ = CloseHandle(process);
        result
            .map_err(|e| LinkError::ElevationFailed(format!("GetExitCodeProcess failed: {}", e.message())))?;
        Ok(code as i32)
    }
}

#[cfg(not(windows))]
fn execute_elevated(_script_path: &Path, _err_path: &Path) -> Result<i32, LinkError> {
    // 非Windowsでは何もしない（テスト用）
    Ok(0)
}

/// 現在のプロセスが昇格済みトークンで動いているかを調べる。
/// 既に管理者として起動されていると、作成したリンクの所有者が
/// 管理者になってしまうため、起動時の警告に使う。
#[cfg(windows)]
pub fn is_admin() -> bool {
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::Security::{
        GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY,
    };
    use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

    unsafe {
        let mut token = HANDLE::default();
        if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token).is_err() {
            return false;
        }
        let mut elevation = TOKEN_ELEVATION::default();
        let mut returned: u32 = 0;
        let ok = GetTokenInformation(
            token,
            TokenElevation,
            Some(&mut elevation as *mut _ as *mut _),
            std::mem::size_of::<TOKEN_ELEVATION>() as u32,
            &mut returned,
        )
        .is_ok();
        let _ = CloseHandle(token);
        ok && elevation.TokenIsElevated != 0
    }
}

#[cfg(not(windows))]
pub fn is_admin() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use la_domain::model::{LinkCommand, LinkKind};

    fn sample_script() -> LinkScript {
        let mut script = LinkScript::new("C:", r"C:\links");
        script.push(LinkCommand::new("proj", r"..\data\proj", LinkKind::Directory));
        script
    }

    #[test]
    fn scripts_land_in_the_current_directory_by_default() {
        let adapter = ScriptRunnerAdapter::new();
        assert_eq!(adapter.script_dir(), std::env::current_dir().unwrap());
    }

    #[test]
    fn script_file_is_removed_after_execution() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = ScriptRunnerAdapter::new().with_script_dir(dir.path());

        let result = adapter.run_elevated(&sample_script(), false).unwrap();

        assert_eq!(result.exit_code(), 0);
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn retained_script_file_contains_rendered_commands() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = ScriptRunnerAdapter::new().with_script_dir(dir.path());

        adapter.run_elevated(&sample_script(), true).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);
        let name = entries[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("linkanchor_"));
        assert!(name.ends_with(".cmd"));

        let content = fs::read_to_string(&entries[0]).unwrap();
        assert!(content.starts_with("C:\r\n"));
        assert!(content.contains("mklink /d \"proj\" \"..\\data\\proj\""));
    }

    #[test]
    fn stderr_file_is_consumed_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = ScriptRunnerAdapter::new().with_script_dir(dir.path());

        let result = adapter.run_elevated(&sample_script(), false).unwrap();

        assert_eq!(result.stderr(), "");
        assert!(!dir
            .path()
            .read_dir()
            .unwrap()
            .any(|e| e.unwrap().path().extension().is_some_and(|x| x == "err")));
    }
}
