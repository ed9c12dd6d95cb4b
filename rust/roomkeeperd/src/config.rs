use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// roomkeeperd - classroom seat and workstation daemon (JSON lines on stdin/stdout)
#[derive(Parser, Debug, Clone)]
#[command(name = "roomkeeperd")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Workspace directory to open at startup
    #[arg(long, env = "ROOMKEEPER_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Log filter (trace, debug, info, warn, error or an EnvFilter directive)
    #[arg(long, env = "ROOMKEEPER_LOG", default_value = "warn")]
    pub log_level: String,

    /// Number of history snapshots kept per workspace
    #[arg(long, env = "ROOMKEEPER_HISTORY_LIMIT", default_value_t = DEFAULT_HISTORY_LIMIT)]
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workspace: None,
            log_level: "warn".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}
