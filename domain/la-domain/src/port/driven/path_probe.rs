/// ファイルシステム照会のポート。
///
/// オーケストレータが実在確認とファイル/ディレクトリ判定に使う。
/// 照会のみで副作用は持たない。
pub trait PathProbe {
    fn exists(&self, path: &str) -> bool;

    fn is_dir(&self, path: &str) -> bool;
}
