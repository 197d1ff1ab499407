use crate::path::{sanitize_path, strip_trailing_separator};
use crate::LinkError;

/// リンク一括作成の要求。構築後は不変。
///
/// ソースの実在確認はオーケストレータが `PathProbe` 経由で行うため、
/// ここでは形式的な検証（空でないこと）のみを行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    sources: Vec<String>,
    destination: String,
    use_relative_path: bool,
    retain_script_file: bool,
    pin_to_quick_access: bool,
    custom_link_name: Option<String>,
    custom_icon_path: Option<String>,
}

impl LinkRequest {
    /// 作成時に正規化とバリデーションを実施する。
    /// 各パスは前後の空白と囲み引用符を除去し、末尾の `\` を落とす。
    pub fn new(
        sources: impl IntoIterator<Item = String>,
        destination: impl Into<String>,
    ) -> Result<Self, LinkError> {
        let sources: Vec<String> = sources
            .into_iter()
            .map(|s| strip_trailing_separator(&sanitize_path(&s)).to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if sources.is_empty() {
            return Err(LinkError::ValidationError(
                "at least one source path is required".into(),
            ));
        }

        let destination = strip_trailing_separator(&sanitize_path(&destination.into())).to_string();
        if destination.is_empty() {
            return Err(LinkError::ValidationError(
                "destination path must not be empty".into(),
            ));
        }

        Ok(Self {
            sources,
            destination,
            use_relative_path: true,
            retain_script_file: false,
            pin_to_quick_access: false,
            custom_link_name: None,
            custom_icon_path: None,
        })
    }

    /// 同一ドライブ内で相対パスを使うかどうかを指定（ビルダーパターン）
    pub fn with_use_relative_path(mut self, value: bool) -> Self {
        self.use_relative_path = value;
        self
    }

    /// 実行後にスクリプトファイルを残すかどうかを指定
    pub fn with_retain_script_file(mut self, value: bool) -> Self {
        self.retain_script_file = value;
        self
    }

    /// 作成したフォルダリンクをクイックアクセスに固定するかどうかを指定
    pub fn with_pin_to_quick_access(mut self, value: bool) -> Self {
        self.pin_to_quick_access = value;
        self
    }

    /// リンク名の上書き。ソースが1つのときのみ適用される。
    pub fn with_custom_link_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.custom_link_name = if name.trim().is_empty() {
            None
        } else {
            Some(name)
        };
        self
    }

    /// フォルダアイコンに使うアイコンファイルのパス。
    /// 実在しないファイルはオーケストレータ側で無視される。
    pub fn with_custom_icon_path(mut self, path: impl Into<String>) -> Self {
        let path = sanitize_path(&path.into());
        self.custom_icon_path = if path.is_empty() { None } else { Some(path) };
        self
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn use_relative_path(&self) -> bool {
        self.use_relative_path
    }

    pub fn retain_script_file(&self) -> bool {
        self.retain_script_file
    }

    pub fn pin_to_quick_access(&self) -> bool {
        self.pin_to_quick_access
    }

    pub fn custom_link_name(&self) -> Option<&str> {
        self.custom_link_name.as_deref()
    }

    pub fn custom_icon_path(&self) -> Option<&str> {
        self.custom_icon_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_separator_and_quotes() {
        let request = LinkRequest::new(
            vec![r"  C:\data\proj\  ".to_string()],
            "\"C:\\links\\\"",
        )
        .unwrap();
        assert_eq!(request.sources(), [r"C:\data\proj"]);
        assert_eq!(request.destination(), r"C:\links");
    }

    #[test]
    fn new_rejects_empty_sources() {
        let result = LinkRequest::new(Vec::new(), r"C:\links");
        assert!(matches!(result, Err(LinkError::ValidationError(_))));

        let result = LinkRequest::new(vec!["   ".to_string()], r"C:\links");
        assert!(matches!(result, Err(LinkError::ValidationError(_))));
    }

    #[test]
    fn new_rejects_blank_destination() {
        let result = LinkRequest::new(vec![r"C:\data".to_string()], "  ");
        assert!(matches!(result, Err(LinkError::ValidationError(_))));
    }

    #[test]
    fn blank_custom_name_is_ignored() {
        let request = LinkRequest::new(vec![r"C:\data".to_string()], r"C:\links")
            .unwrap()
            .with_custom_link_name("  ");
        assert_eq!(request.custom_link_name(), None);
    }
}
