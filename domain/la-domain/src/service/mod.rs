//! ドメインサービス

mod link_service;
mod script_builder;

pub use link_service::{LinkDeps, LinkService};
pub use script_builder::build_link_script;
