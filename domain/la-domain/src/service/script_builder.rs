use crate::model::{LinkCommand, LinkKind, LinkRequest, LinkScript};
use crate::path::{relative_path, split_path};
use crate::port::driven::PathProbe;

/// 要求からリンクスクリプトを組み立てる。
///
/// - リンク名はソースの末尾セグメント。ソースが1つのときのみ
///   `custom_link_name` で上書きできる。
/// - ディレクトリは `/d`、クイックアクセス固定時はジャンクション `/j`。
///   固定操作がシンボリックリンクを解決してしまうため、固定対象には
///   ジャンクションを使う。
/// - 相対パスはソースと作成先のルートセグメントが一致するときのみ使い、
///   計算結果が空（同一パス）のときは絶対パスに戻す。
pub fn build_link_script(request: &LinkRequest, probe: &dyn PathProbe) -> LinkScript {
    let dest_segments = split_path(request.destination());
    let drive = dest_segments.first().cloned().unwrap_or_default();
    let mut script = LinkScript::new(drive, request.destination());

    let custom_name = if request.sources().len() == 1 {
        request.custom_link_name()
    } else {
        None
    };

    for source in request.sources() {
        let source_segments = split_path(source);
        let link_name = custom_name
            .map(str::to_string)
            .or_else(|| source_segments.last().cloned())
            .unwrap_or_else(|| source.clone());

        let kind = if probe.is_dir(source) {
            if request.pin_to_quick_access() {
                LinkKind::Junction
            } else {
                LinkKind::Directory
            }
        } else {
            LinkKind::File
        };

        let target = if request.use_relative_path()
            && source_segments.first() == dest_segments.first()
        {
            let relative = relative_path(&source_segments, &dest_segments);
            if relative.is_empty() {
                source.clone()
            } else {
                relative
            }
        } else {
            source.clone()
        };

        script.push(LinkCommand::new(link_name, target, kind));
    }

    script
}
