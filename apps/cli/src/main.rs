//! linkanchor: シンボリックリンク/ジャンクションを一括作成するCLI。
//! ソースと作成先を受け取り、mklinkスクリプトを生成して昇格実行する。

use clap::Parser;
use la_adapter_fs::FsAdapter;
use la_adapter_script::{is_admin, ScriptRunnerAdapter};
use la_adapter_shell::ShellAdapter;
use la_domain::model::AppConfig;
use la_domain::model::LinkRequest;
use la_domain::port::driven::ConfigRepository;
use la_domain::port::driving::CreateLinksUseCase;
use la_domain::service::{LinkDeps, LinkService};
use std::error::Error;

type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Debug)]
struct SimpleError(String);

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for SimpleError {}

fn err(msg: impl Into<String>) -> Box<dyn Error + Send + Sync> {
    Box::new(SimpleError(msg.into()))
}

macro_rules! bail {
    ($($t:tt)*) => {
        return Err(err(format!($($t)*)));
    };
}

#[derive(Parser, Debug)]
#[command(name = "linkanchor", about = "Create symbolic links and junctions in batch")]
struct Cli {
    /// リンク元のファイル/フォルダ（複数可）
    #[arg(num_args = 0..)]
    sources: Vec<String>,

    /// リンクを作成するフォルダ
    #[arg(short = 'd', long = "dest")]
    destination: Option<String>,

    /// 同一ドライブ内では相対パスでリンクする（既定）
    #[arg(long, overrides_with = "absolute")]
    relative: bool,

    /// 常に絶対パスでリンクする
    #[arg(long, overrides_with = "relative")]
    absolute: bool,

    /// 実行後にスクリプトファイルを残す
    #[arg(long = "retain-script", overrides_with = "no_retain_script")]
    retain_script: bool,

    /// スクリプトファイルを残さない
    #[arg(long = "no-retain-script", overrides_with = "retain_script")]
    no_retain_script: bool,

    /// 作成したフォルダリンクをクイックアクセスに固定する
    #[arg(long, overrides_with = "no_pin")]
    pin: bool,

    /// クイックアクセスに固定しない
    #[arg(long = "no-pin", overrides_with = "pin")]
    no_pin: bool,

    /// リンク名の上書き（ソースが1つのときのみ有効）
    #[arg(long)]
    name: Option<String>,

    /// リンク元フォルダに適用するアイコンファイル
    #[arg(long)]
    icon: Option<String>,

    /// 今回のフラグを既定値として保存する
    #[arg(long = "save-defaults")]
    save_defaults: bool,
}

fn main() {
    if let Err(err) = run() {
        la_log_utils::write_lifecycle_line("linkanchor", &format!("failed: {err}"));
        eprintln!("linkanchor failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let repository = FsAdapter::new(la_adapter_paths::default_config_path());
    let defaults = load_defaults(&repository);
    let config = merge_flags(&cli, &defaults);

    if cli.save_defaults {
        repository
            .save(&config)
            .map_err(|e| err(format!("Failed to save defaults: {e}")))?;
        println!("Defaults saved to {}", repository.config_path().display());
        if cli.sources.is_empty() {
            return Ok(());
        }
    }

    if cli.sources.is_empty() {
        bail!("At least one source path is required. See --help.");
    }
    let Some(destination) = cli.destination.as_deref() else {
        bail!("Destination folder is required (-d / --dest).");
    };

    // 昇格済みで起動すると作成したリンクの所有者が管理者になる
    if is_admin() {
        eprintln!(
            "WARNING: running elevated; links will be owned by the administrator account."
        );
    }

    let sources = dedup_preserving_order(cli.sources.clone());
    let mut request = LinkRequest::new(sources, destination)?
        .with_use_relative_path(config.use_relative_path)
        .with_retain_script_file(config.retain_script_file)
        .with_pin_to_quick_access(config.pin_to_quick_access);
    if let Some(name) = &cli.name {
        if request.sources().len() > 1 {
            eprintln!("WARNING: --name is ignored when multiple sources are given.");
        }
        request = request.with_custom_link_name(name.clone());
    }
    if let Some(icon) = &cli.icon {
        request = request.with_custom_icon_path(icon.clone());
    }

    la_log_utils::write_lifecycle_line(
        "linkanchor",
        &format!(
            "creating {} link(s) in {}",
            request.sources().len(),
            request.destination()
        ),
    );

    let runner = ScriptRunnerAdapter::new();
    let shell = ShellAdapter::new();
    let service = LinkService::new(LinkDeps {
        probe: &repository,
        runner: &runner,
        shell: &shell,
    });

    let count = service.create_links(&request)?;
    la_log_utils::write_lifecycle_line("linkanchor", &format!("created {count} link(s)"));
    println!("Created {} link(s) in {}", count, request.destination());
    Ok(())
}

/// 設定ファイルから既定値を読み込む。壊れていても起動は継続する。
fn load_defaults(repository: &FsAdapter) -> AppConfig {
    match repository.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("WARNING: {e}; using built-in defaults.");
            AppConfig::default()
        }
    }
}

/// コマンドラインフラグを保存済み既定値に重ねる
fn merge_flags(cli: &Cli, defaults: &AppConfig) -> AppConfig {
    AppConfig {
        use_relative_path: if cli.absolute {
            false
        } else if cli.relative {
            true
        } else {
            defaults.use_relative_path
        },
        retain_script_file: if cli.no_retain_script {
            false
        } else if cli.retain_script {
            true
        } else {
            defaults.retain_script_file
        },
        pin_to_quick_access: if cli.no_pin {
            false
        } else if cli.pin {
            true
        } else {
            defaults.pin_to_quick_access
        },
    }
}

fn dedup_preserving_order(sources: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for source in sources {
        if !seen.contains(&source) {
            seen.push(source);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("linkanchor").chain(args.iter().copied()))
    }

    #[test]
    fn absolute_overrides_saved_relative_default() {
        let cli = parse(&[r"C:\data\proj", "-d", r"C:\links", "--absolute"]);
        let merged = merge_flags(&cli, &AppConfig::default());
        assert!(!merged.use_relative_path);
    }

    #[test]
    fn saved_defaults_apply_when_flags_are_absent() {
        let cli = parse(&[r"C:\data\proj", "-d", r"C:\links"]);
        let defaults = AppConfig {
            use_relative_path: false,
            retain_script_file: true,
            pin_to_quick_access: true,
        };
        let merged = merge_flags(&cli, &defaults);
        assert_eq!(merged, defaults);
    }

    #[test]
    fn negative_flags_override_saved_defaults() {
        let cli = parse(&[
            r"C:\data\proj",
            "-d",
            r"C:\links",
            "--no-retain-script",
            "--no-pin",
        ]);
        let defaults = AppConfig {
            use_relative_path: true,
            retain_script_file: true,
            pin_to_quick_access: true,
        };
        let merged = merge_flags(&cli, &defaults);
        assert!(!merged.retain_script_file);
        assert!(!merged.pin_to_quick_access);
    }

    #[test]
    fn later_flag_wins_within_override_pair() {
        let cli = parse(&[r"C:\a", "-d", r"C:\links", "--pin", "--no-pin"]);
        let merged = merge_flags(&cli, &AppConfig::default());
        assert!(!merged.pin_to_quick_access);

        let cli = parse(&[r"C:\a", "-d", r"C:\links", "--no-pin", "--pin"]);
        let merged = merge_flags(&cli, &AppConfig::default());
        assert!(merged.pin_to_quick_access);
    }

    #[test]
    fn duplicate_sources_are_collapsed() {
        let sources = vec![
            r"C:\data\a".to_string(),
            r"C:\data\b".to_string(),
            r"C:\data\a".to_string(),
        ];
        assert_eq!(
            dedup_preserving_order(sources),
            vec![r"C:\data\a".to_string(), r"C:\data\b".to_string()]
        );
    }
}
