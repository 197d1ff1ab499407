//! ドリブンポート（インフラ層が実装する）

mod config_repository;
mod path_probe;
mod script_runner;
mod shell_integration;

pub use config_repository::ConfigRepository;
pub use path_probe::PathProbe;
pub use script_runner::ElevatedScriptRunner;
pub use shell_integration::ShellIntegration;
