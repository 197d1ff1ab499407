use crate::model::LinkRequest;
use crate::port::driven::{ElevatedScriptRunner, PathProbe, ShellIntegration};
use crate::port::driving::CreateLinksUseCase;
use crate::service::build_link_script;
use crate::LinkError;

/// リンク作成に必要なドリブンポート一式
pub struct LinkDeps<'a> {
    pub probe: &'a dyn PathProbe,
    pub runner: &'a dyn ElevatedScriptRunner,
    pub shell: &'a dyn ShellIntegration,
}

/// リンク一括作成のオーケストレータ。
///
/// 検証 → スクリプト生成 → 昇格実行 → 後処理（装飾・固定）の順に進め、
/// 各段階の失敗で即座に中断する。作成済みリンクのロールバックはしない。
pub struct LinkService<'a> {
    deps: LinkDeps<'a>,
}

impl<'a> LinkService<'a> {
    pub fn new(deps: LinkDeps<'a>) -> Self {
        Self { deps }
    }

    fn validate(&self, request: &LinkRequest) -> Result<(), LinkError> {
        if !self.deps.probe.is_dir(request.destination()) {
            return Err(LinkError::DestinationNotFound(
                request.destination().to_string(),
            ));
        }
        for source in request.sources() {
            if !self.deps.probe.exists(source) {
                return Err(LinkError::ValidationError(format!(
                    "source path does not exist: {}",
                    source
                )));
            }
        }
        Ok(())
    }

    /// フォルダリンクの後処理。アイコン装飾とクイックアクセス固定を行う。
    /// 最初の失敗で残りをスキップして中断する。
    fn post_process(&self, request: &LinkRequest, link_names: &[String]) -> Result<(), LinkError> {
        let icon_path = request
            .custom_icon_path()
            .filter(|icon| self.deps.probe.exists(icon));

        for (source, link_name) in request.sources().iter().zip(link_names) {
            if !self.deps.probe.is_dir(source) {
                continue;
            }
            let link_path = format!("{}\\{}", request.destination(), link_name);
            if let Some(icon) = icon_path {
                // 装飾が成功するたびに通知する
                self.deps
                    .shell
                    .write_folder_decoration(source, None, Some(icon))?;
                self.deps.shell.notify_shell_changed();
                // リンク自体がディレクトリとして見えている場合はそちらにも反映する
                if self.deps.probe.is_dir(&link_path) {
                    self.deps
                        .shell
                        .write_folder_decoration(&link_path, None, Some(icon))?;
                    self.deps.shell.notify_shell_changed();
                }
            }
            if request.pin_to_quick_access() && self.deps.probe.is_dir(&link_path) {
                self.deps.shell.pin_to_quick_access(&link_path)?;
            }
        }

        Ok(())
    }
}

impl CreateLinksUseCase for LinkService<'_> {
    fn create_links(&self, request: &LinkRequest) -> Result<usize, LinkError> {
        self.validate(request)?;

        let script = build_link_script(request, self.deps.probe);
        let link_names: Vec<String> = script
            .commands()
            .iter()
            .map(|c| c.link_name().to_string())
            .collect();

        let result = self
            .deps
            .runner
            .run_elevated(&script, request.retain_script_file())?;
        if !result.success() {
            return Err(LinkError::ScriptFailed {
                exit_code: result.exit_code(),
                stderr: result.stderr().to_string(),
            });
        }

        self.post_process(request, &link_names)?;
        Ok(link_names.len())
    }
}
