use std::fmt;

/// スクリプトファイル名に使うアプリケーション名
pub const APP_FILE_NAME: &str = "linkanchor";

/// タイムスタンプ由来のティック値からスクリプトファイル名を組み立てる。
/// 並行実行時の衝突を避けるため、ティックは実行ごとに一意であること。
pub fn script_file_name(ticks: u128) -> String {
    format!("{}_{}.cmd", APP_FILE_NAME, ticks)
}

/// 作成するリンクの種別。`mklink` のフラグに対応する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// ファイルへのシンボリックリンク（フラグなし）
    File,
    /// ディレクトリへのシンボリックリンク（`/d`）
    Directory,
    /// ジャンクション（`/j`）。クイックアクセス固定時に使用する。
    Junction,
}

impl LinkKind {
    /// `mklink` に渡すフラグ。ファイルリンクはフラグを持たない。
    pub fn mklink_flag(&self) -> Option<&'static str> {
        match self {
            Self::File => None,
            Self::Directory => Some("/d"),
            Self::Junction => Some("/j"),
        }
    }
}

/// 1つのリンクを作成するコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCommand {
    link_name: String,
    target_path: String,
    kind: LinkKind,
}

impl LinkCommand {
    pub fn new(
        link_name: impl Into<String>,
        target_path: impl Into<String>,
        kind: LinkKind,
    ) -> Self {
        Self {
            link_name: link_name.into(),
            target_path: target_path.into(),
            kind,
        }
    }

    pub fn link_name(&self) -> &str {
        &self.link_name
    }

    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }
}

impl fmt::Display for LinkCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mklink ")?;
        if let Some(flag) = self.kind.mklink_flag() {
            write!(f, "{} ", flag)?;
        }
        write!(f, "\"{}\" \"{}\"", self.link_name, self.target_path)
    }
}

/// `LinkRequest` から導出されるコマンド列。
/// 先頭のドライブ選択と `cd` により、相対ターゲットが
/// プロセスの開始ディレクトリに依存せず解決される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkScript {
    drive: String,
    destination: String,
    commands: Vec<LinkCommand>,
}

impl LinkScript {
    pub fn new(drive: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            drive: drive.into(),
            destination: destination.into(),
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: LinkCommand) {
        self.commands.push(command);
    }

    pub fn drive(&self) -> &str {
        &self.drive
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn commands(&self) -> &[LinkCommand] {
        &self.commands
    }

    /// cmd用のスクリプトテキストを生成する（CRLF区切り、1行1コマンド）。
    pub fn render(&self) -> String {
        let mut text = String::new();
        text.push_str(&self.drive);
        text.push_str("\r\n");
        text.push_str(&format!("cd \"{}\"\r\n", self.destination));
        for command in &self.commands {
            text.push_str(&command.to_string());
            text.push_str("\r\n");
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_file_name_uses_app_name_and_ticks() {
        assert_eq!(script_file_name(42), "linkanchor_42.cmd");
    }

    #[test]
    fn mklink_flags_match_link_kinds() {
        assert_eq!(LinkKind::File.mklink_flag(), None);
        assert_eq!(LinkKind::Directory.mklink_flag(), Some("/d"));
        assert_eq!(LinkKind::Junction.mklink_flag(), Some("/j"));
    }

    #[test]
    fn render_emits_drive_cd_and_commands() {
        let mut script = LinkScript::new("C:", r"C:\links");
        script.push(LinkCommand::new("proj", r"..\data\proj", LinkKind::Directory));
        script.push(LinkCommand::new("notes.txt", r"C:\data\notes.txt", LinkKind::File));

        let text = script.render();
        assert_eq!(
            text,
            "C:\r\ncd \"C:\\links\"\r\nmklink /d \"proj\" \"..\\data\\proj\"\r\nmklink \"notes.txt\" \"C:\\data\\notes.txt\"\r\n"
        );
    }
}
