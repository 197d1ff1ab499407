use crate::model::{ExecutionResult, LinkScript};
use crate::LinkError;

/// リンクスクリプトを管理者権限で実行するポート。
///
/// 実装はスクリプトをファイルに書き出し、昇格プロンプトを経由して実行し、
/// 終了コードと標準エラー出力を回収する。`retain_script_file` が偽なら
/// 終了コードの確認前にスクリプトファイルを削除すること。
pub trait ElevatedScriptRunner {
    fn run_elevated(
        &self,
        script: &LinkScript,
        retain_script_file: bool,
    ) -> Result<ExecutionResult, LinkError>;
}
