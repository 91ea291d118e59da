//! Command-line interface for the `vidgrab` binary.
//!
//! Every flag can also be set through a `VIDGRAB_*` environment variable
//! (or a `.env` file, loaded before parsing).

use std::path::PathBuf;

use clap::Parser;
use vidgrab_core::{
    DEFAULT_JOB_TIMEOUT_SECS, DEFAULT_LINK_MARKER, DEFAULT_MAX_LINKS, DEFAULT_OUTPUT_DIR,
    DEFAULT_PUBLIC_PREFIX, DEFAULT_TOOL_PATH, Settings,
};

use crate::bootstrap::{CorsConfig, DEFAULT_HOST, DEFAULT_PORT, ServerConfig};

/// Batch video downloader over HTTP.
#[derive(Debug, Parser)]
#[command(name = "vidgrab")]
#[command(about = "Download batches of video links through an external tool")]
#[command(version)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "VIDGRAB_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "VIDGRAB_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory the tool writes into (created if missing)
    #[arg(long, env = "VIDGRAB_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Path or name of the retrieval tool
    #[arg(long, env = "VIDGRAB_TOOL", default_value = DEFAULT_TOOL_PATH)]
    pub tool: PathBuf,

    /// Extra argument passed to the tool before the output template (repeatable)
    #[arg(long = "tool-arg", env = "VIDGRAB_TOOL_ARGS", value_delimiter = ',', allow_hyphen_values = true)]
    pub tool_args: Vec<String>,

    /// Public path the output directory is served under
    #[arg(long, env = "VIDGRAB_PUBLIC_PREFIX", default_value = DEFAULT_PUBLIC_PREFIX)]
    pub public_prefix: String,

    /// Substring every accepted link must contain
    #[arg(long, env = "VIDGRAB_LINK_MARKER", default_value = DEFAULT_LINK_MARKER)]
    pub link_marker: String,

    /// Maximum links per request
    #[arg(long, env = "VIDGRAB_MAX_LINKS", default_value_t = DEFAULT_MAX_LINKS)]
    pub max_links: usize,

    /// Jobs run at once within one request
    #[arg(long, env = "VIDGRAB_CONCURRENCY", default_value_t = 1)]
    pub concurrency: usize,

    /// Seconds before a running job is terminated
    #[arg(long, env = "VIDGRAB_JOB_TIMEOUT", default_value_t = DEFAULT_JOB_TIMEOUT_SECS)]
    pub job_timeout: u64,

    /// Directory with built frontend assets to serve
    #[arg(long, env = "VIDGRAB_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Allowed CORS origin (repeatable); all origins when omitted
    #[arg(long = "cors-origin", env = "VIDGRAB_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            output_dir: self.output_dir.clone(),
            tool_path: self.tool.clone(),
            tool_args: self.tool_args.clone(),
            public_prefix: self.public_prefix.clone(),
            link_marker: self.link_marker.clone(),
            max_links: self.max_links,
            concurrency: self.concurrency,
            job_timeout_secs: self.job_timeout,
        }
    }

    pub fn into_server_config(self) -> ServerConfig {
        let settings = self.settings();
        let cors = if self.cors_origins.is_empty() {
            CorsConfig::AllowAll
        } else {
            CorsConfig::AllowOrigins(self.cors_origins)
        };
        ServerConfig {
            host: self.host,
            port: self.port,
            static_dir: self.static_dir,
            cors,
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_match_settings() {
        let cli = Cli::parse_from(["vidgrab"]);
        let config = cli.into_server_config();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.cors, CorsConfig::AllowAll);
        assert_eq!(config.settings, Settings::default());
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::parse_from([
            "vidgrab",
            "--port",
            "8080",
            "--output-dir",
            "/srv/media",
            "--tool-arg",
            "-f",
            "--tool-arg",
            "bestaudio",
            "--concurrency",
            "2",
            "--cors-origin",
            "http://localhost:5173",
        ]);
        let config = cli.into_server_config();
        assert_eq!(config.port, 8080);
        assert_eq!(config.settings.output_dir, PathBuf::from("/srv/media"));
        assert_eq!(config.settings.tool_args, ["-f", "bestaudio"]);
        assert_eq!(config.settings.concurrency, 2);
        assert_eq!(
            config.cors,
            CorsConfig::AllowOrigins(vec!["http://localhost:5173".to_string()])
        );
    }
}
