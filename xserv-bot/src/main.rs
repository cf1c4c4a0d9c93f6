//! xserv file-serving bot

mod args;

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use args::Args;
use xserv_bot::bot::ServeBot;
use xserv_bot::constants::MSG_BANNER;
use xserv_bot::session;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Print banner first
    println!("{}{}", MSG_BANNER, env!("CARGO_PKG_VERSION"));

    // Resolve the endpoint before setup_root takes args.root
    let (host, port) = match args.server_endpoint() {
        Ok(endpoint) => endpoint,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let root = setup_root(args.root);

    let stream = match TcpStream::connect((host.as_str(), port)).await {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("cannot connect to {host}:{port}: {e}");
            std::process::exit(1);
        }
    };
    println!("connected to {host}:{port}");

    let advertise = advertised_addr(&stream);

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let bot = ServeBot::new(root, args.nick.clone(), advertise, args.debug, outbound_tx);

    let (reader, writer) = stream.into_split();
    if let Err(e) = session::run(
        reader,
        writer,
        args.channel,
        args.nick,
        args.debug,
        bot,
        outbound_rx,
    )
    .await
    {
        eprintln!("session ended: {e}");
        std::process::exit(1);
    }
}

/// Resolve and create the served directory
fn setup_root(root: Option<PathBuf>) -> PathBuf {
    let root = root.or_else(|| dirs::home_dir().map(|home| home.join(".xserv")));
    let Some(root) = root else {
        eprintln!("cannot determine home directory, pass --root");
        std::process::exit(1);
    };

    if let Err(e) = std::fs::create_dir_all(&root) {
        eprintln!("cannot create {}: {}", root.display(), e);
        std::process::exit(1);
    }

    println!("serving files from {}", root.display());
    root
}

/// The IPv4 address quoted in transfer offers. Taken from the chat
/// socket's local address so it matches the interface peers can reach;
/// falls back to loopback with a warning on an IPv6 connection.
fn advertised_addr(stream: &TcpStream) -> Ipv4Addr {
    match stream.local_addr() {
        Ok(addr) => match addr.ip() {
            IpAddr::V4(v4) => v4,
            IpAddr::V6(_) => {
                eprintln!("connected over IPv6, advertising loopback in offers");
                Ipv4Addr::LOCALHOST
            }
        },
        Err(e) => {
            eprintln!("cannot read local address ({e}), advertising loopback in offers");
            Ipv4Addr::LOCALHOST
        }
    }
}
