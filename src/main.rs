//! bm-dhcp-tap - DHCP ACK sniffer
//!
//! Binds a promiscuous capture on one interface and runs the configured
//! hook for every DHCPACK it sees.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use bm_dhcp_tap::dispatch::reap_children_automatically;
use bm_dhcp_tap::{logging, Config, HookDispatcher, LeaseListener, PnetCapture};

#[derive(Parser)]
#[command(name = "bm-dhcp-tap")]
#[command(about = "DHCP ACK sniffer - runs a hook for every lease seen on the wire")]
struct Args {
    /// Network interface to sniff (overrides IFACE)
    interface: Option<String>,

    /// KEY=VALUE config file [default: $BM_CONFIG or /opt/bm-dhcp-tap/etc/bm-dhcp-tap.cfg]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List network interfaces and exit
    #[arg(short, long)]
    list_interfaces: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.list_interfaces {
        for iface in PnetCapture::list_interfaces() {
            println!("{}", iface);
        }
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(args.config.as_deref(), args.interface.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Held until exit so buffered file output is flushed
    let _log_guard = match logging::init(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}, exiting", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    tracing::info!(
        "BM DHCP tap starting  iface={}  hook={}  log={}",
        config.interface,
        config.hook_path.display(),
        config.log_file.display()
    );
    if let Some(server) = &config.syslog_server {
        tracing::info!("Syslog enabled  server={}  port={}", server, config.syslog_port);
    }

    // Checked before binding so a bad hook never costs a capture
    let dispatcher = HookDispatcher::new(&config.hook_path)?;
    reap_children_automatically();

    let capture = PnetCapture::open(&config.interface)?;

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("Failed to install signal handler")?;

    let mut listener = LeaseListener::new(capture, dispatcher, running);
    listener.run();

    Ok(())
}
