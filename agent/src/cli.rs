//! Command-line configuration.

use clap::Parser;
use procserve_core::config::{Limits, DEFAULT_MAX_DIR_ENTRIES, DEFAULT_MAX_FILE_BYTES};
use procserve_core::errors::ConfigError;

/// Serve a read-only JSON view of /proc over HTTP.
#[derive(Debug, Clone, Parser)]
#[command(name = "procserve-agent", version)]
pub struct Cli {
    /// What to listen on. Prefer binding to a local interface, like
    /// 10.0.1.3:9234; `:PORT` listens on every interface.
    #[arg(long, default_value = ":9234")]
    pub listen: String,

    /// Maximum number of bytes to read from a single file.
    #[arg(long = "file-limit", default_value_t = DEFAULT_MAX_FILE_BYTES, value_parser = parse_limit)]
    pub file_limit: usize,

    /// Maximum number of directory entries to read.
    #[arg(long = "dir-limit", default_value_t = DEFAULT_MAX_DIR_ENTRIES, value_parser = parse_limit)]
    pub dir_limit: usize,
}

impl Cli {
    pub fn limits(&self) -> Result<Limits, ConfigError> {
        Limits::new(self.file_limit, self.dir_limit)
    }

    /// The listen address in a form `TcpListener::bind` accepts.
    pub fn bind_addr(&self) -> String {
        normalize_listen_addr(&self.listen)
    }
}

/// Expand the `:PORT` shorthand to the IPv4 wildcard address.
pub fn normalize_listen_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    }
}

fn parse_limit(value: &str) -> Result<usize, String> {
    let limit: usize = value
        .parse()
        .map_err(|e| format!("invalid number {value:?}: {e}"))?;
    if limit == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(limit)
}
