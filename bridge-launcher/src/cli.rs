use backend::gemini::DEFAULT_API_BASE;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
pub struct Cli {
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
    /// JSON document holding settings, cached token and history
    #[arg(long, default_value = "bridge.json")]
    pub store_path: PathBuf,
    /// Use a SQLite database instead of the JSON document
    #[arg(long)]
    pub sqlite_url: Option<String>,
    /// Keep all state in memory; nothing survives a restart
    #[arg(long, conflicts_with = "sqlite_url")]
    pub in_memory: bool,
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,
    /// Static front-end pages (popup, options) served at the root
    #[arg(long)]
    pub ui_dir: Option<PathBuf>,
}
