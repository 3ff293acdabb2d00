use crate::core::board::{DEFAULT_COLUMNS, DEFAULT_ROWS};
use crate::session::role::{PageContext, JOIN_PARAM, WATCH_PARAM};
use crate::session::runner::DEFAULT_NOTICE_DELAY;
use crate::telemetry::{LogConfig, LogLevel};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "connect4_client.json";
pub const DEFAULT_SERVER_URL: &str = "ws://localhost:8001";
pub const DEFAULT_LOG_FILE: &str = "connect4_client.log";

#[derive(Debug, Parser)]
#[command(name = "connect4-client", version, about = "Terminal client for a remote Connect Four server")]
pub struct Cli {
    /// Page location carrying the role, e.g. `?join=CODE` or `?watch=CODE`
    pub location: Option<String>,

    /// Join an existing game
    #[arg(long)]
    pub join: Option<String>,

    /// Watch an existing game
    #[arg(long)]
    pub watch: Option<String>,

    /// WebSocket endpoint of the game server
    #[arg(long, env = "CONNECT4_SERVER")]
    pub server: Option<String>,

    /// JSON config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Delay before win/error notices are shown
    #[arg(long)]
    pub notice_delay_ms: Option<u64>,

    /// Prefix for the shareable join/watch links
    #[arg(long)]
    pub share_base: Option<String>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

impl Cli {
    /// 位置文字列と --join/--watch をまとめたページコンテキスト
    pub fn page_context(&self) -> PageContext {
        let mut page = self
            .location
            .as_deref()
            .map(PageContext::from_location)
            .unwrap_or_default();
        if let Some(join) = &self.join {
            page.push(JOIN_PARAM, join);
        }
        if let Some(watch) = &self.watch {
            page.push(WATCH_PARAM, watch);
        }
        page
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level,
            file: self.log_file.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub notice_delay_ms: u64,
    pub share_base: String,
    pub columns: usize,
    pub rows: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server_url: DEFAULT_SERVER_URL.to_string(),
            notice_delay_ms: DEFAULT_NOTICE_DELAY.as_millis() as u64,
            share_base: String::new(),
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
        }
    }
}

impl ClientConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "using default config");
                Self::default()
            }
        }
    }

    /// 設定ファイルを読み、コマンドライン引数で上書きする
    pub fn resolve(cli: &Cli) -> Self {
        let mut config = Self::load_or_default(&cli.config);
        if let Some(server) = &cli.server {
            config.server_url = server.clone();
        }
        if let Some(delay) = cli.notice_delay_ms {
            config.notice_delay_ms = delay;
        }
        if let Some(base) = &cli.share_base {
            config.share_base = base.clone();
        }
        config
    }

    pub fn notice_delay(&self) -> Duration {
        Duration::from_millis(self.notice_delay_ms)
    }
}
