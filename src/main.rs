use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

mod config;
mod mac;
mod wake;

use config::Config;
use wake::WakeError;

const EXIT_TRANSMISSION: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    about = "Send a Wake-on-LAN magic packet to power on a remote device",
    long_about = "
Send a Wake-on-LAN magic packet to power on a remote device.

The target is either a MAC address or an alias from the host config file.
Wake-on-LAN is fire-and-forget: a successful exit means one broadcast
datagram was handed to the network, not that the device actually woke up.

Examples:
    wakeonlan 00:CA:FE:BA:BE:00
    wakeonlan 00CAFEBABE00 -b 192.168.1.255 -p 9
    wakeonlan office-pc
"
)]
struct Cli {
    /// MAC address of the target device (e.g. "00:CA:FE:BA:BE:00"), or a host
    /// alias from the config file
    target: String,

    /// Network broadcast address to send the magic packet to [default: 255.255.255.255]
    #[arg(short, long)]
    broadcast: Option<String>,

    /// Destination UDP port [default: 7]
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to the host alias config file
    #[arg(short, long, default_value = "~/.config/wakeonlan/hosts.yml")]
    config: String,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Turns the CLI target into (mac, broadcast, port). A target that does not
/// parse as a MAC address is looked up as an alias in the config file;
/// explicit flags always win over alias entries and defaults.
fn resolve_params(cli: &Cli) -> Result<(String, String, u16), WakeError> {
    let addr_err = match mac::normalize(&cli.target) {
        Ok(_) => {
            return Ok((
                cli.target.clone(),
                cli.broadcast
                    .clone()
                    .unwrap_or_else(|| wake::DEFAULT_BROADCAST.to_string()),
                cli.port.unwrap_or(wake::DEFAULT_PORT),
            ))
        }
        Err(e) => e,
    };

    match Config::load(&cli.config) {
        Ok(cfg) => match cfg.host(&cli.target) {
            Some(entry) => Ok((
                entry.mac.clone(),
                cli.broadcast.clone().unwrap_or_else(|| entry.broadcast.clone()),
                cli.port.unwrap_or(entry.port),
            )),
            None => {
                log::debug!("'{}' is not a known host alias", cli.target);
                Err(addr_err)
            }
        },
        Err(e) => {
            log::debug!("no usable host config: {}", e);
            Err(addr_err)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init().ok();

    let (mac_str, broadcast, port) = match resolve_params(&cli) {
        Ok(params) => params,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    match wake::wake(&mac_str, &broadcast, port) {
        Ok(()) => {
            log::info!("magic packet for {} sent to {}:{}", mac_str, broadcast, port);
            ExitCode::SUCCESS
        }
        Err(e @ WakeError::InvalidAddressFormat(_)) => {
            log::error!("{}", e);
            ExitCode::from(EXIT_INVALID_ARGS)
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(EXIT_TRANSMISSION)
        }
    }
}
