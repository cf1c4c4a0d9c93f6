//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

use xserv_common::DEFAULT_CHAT_PORT;

/// xserv file-serving bot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Chat server to connect to, as host or host:port
    #[arg(short, long)]
    pub server: String,

    /// Channel to serve files in
    #[arg(short, long)]
    pub channel: String,

    /// Nickname to register with
    #[arg(short, long, default_value = "xservbot")]
    pub nick: String,

    /// Directory to serve files from (default: ~/.xserv)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Enable debug logging (shows raw server traffic and command activity)
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

impl Args {
    /// Split `--server` into host and port, defaulting the port
    pub fn server_endpoint(&self) -> Result<(String, u16), String> {
        match self.server.split_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| format!("invalid port in --server: {port}"))?;
                Ok((host.to_string(), port))
            }
            None => Ok((self.server.clone(), DEFAULT_CHAT_PORT)),
        }
    }
}
