use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use usbrelay_ctl::{discovery, BoardVariant, Config, ConfigLoader, RelayController};

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Control USB serial relay boards (2/4/8 channel).",
    long_about = "Discovers, identifies and switches USB-attached relay boards over their \
single-byte serial protocol. The board is re-identified on every invocation; relay state \
is not persisted between runs."
)]
struct Args {
    /// Serial port of the relay board; falls back to the configured default.
    #[arg(short, long)]
    port: Option<String>,

    /// Explicit config file path.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe candidate port names and list the ones that open.
    Scan,
    /// List serial ports the OS reports, with metadata.
    Ports,
    /// Identify the attached board and report its relay count.
    Probe,
    /// Switch relays from a bitmask (accepts 0b…, 0x… or decimal).
    Set { mask: String },
    /// Switch every relay on.
    AllOn,
    /// Switch every relay off.
    AllOff,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from(path)?.into_config(),
        None => ConfigLoader::load()?.into_config(),
    };

    init_tracing(&config);

    match args.command {
        Command::Scan => {
            let found = discovery::scan_with(
                discovery::candidate_name,
                config.discovery.range(),
                config.discovery.probe_baud,
            );
            if found.is_empty() {
                println!("no candidate ports opened");
            } else {
                for name in found {
                    println!("{name}");
                }
            }
        }
        Command::Ports => {
            let ports = discovery::enumerate()?;
            if ports.is_empty() {
                println!("no serial ports reported by the OS");
            }
            for port in ports {
                match port.port_type {
                    serialport::SerialPortType::UsbPort(usb) => {
                        println!(
                            "{}  usb {:04x}:{:04x} {}",
                            port.port_name,
                            usb.vid,
                            usb.pid,
                            usb.product.as_deref().unwrap_or("")
                        );
                    }
                    other => println!("{}  {:?}", port.port_name, other),
                }
            }
        }
        Command::Probe => {
            let mut board = connect(&args.port, &config)?;
            let variant = board.init_board()?;
            match variant {
                BoardVariant::Unknown => {
                    println!(
                        "board answered but was not recognized; still assuming {} relays",
                        board.relay_count()
                    );
                }
                v => println!("{v} board ({} relays) on {}", v.relay_count(), board.port()),
            }
            board.close()?;
        }
        Command::Set { mask } => {
            let mask = parse_mask(&mask)?;
            let mut board = connect(&args.port, &config)?;
            identify(&mut board)?;
            board.set_state(mask)?;
            info!(mask = format_args!("{mask:#010b}"), "state set");
            board.close()?;
        }
        Command::AllOn => {
            let mut board = connect(&args.port, &config)?;
            identify(&mut board)?;
            let mask = u8::MAX >> (8 - board.relay_count());
            board.set_state(mask)?;
            board.close()?;
        }
        Command::AllOff => {
            let mut board = connect(&args.port, &config)?;
            identify(&mut board)?;
            board.set_state(0)?;
            board.close()?;
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build and open a controller for the selected port.
fn connect(
    port_override: &Option<String>,
    config: &Config,
) -> Result<RelayController, Box<dyn std::error::Error>> {
    let port = port_override
        .clone()
        .or_else(|| config.serial.port.clone())
        .ok_or("no port given; pass --port or set serial.port in the config")?;

    let guess = BoardVariant::from_relay_count(config.serial.relay_count)
        .unwrap_or(BoardVariant::TwoRelay);

    let mut board = RelayController::new(port, guess);
    board.open()?;
    Ok(board)
}

/// Run the handshake and refuse to continue without a trusted relay count.
fn identify(board: &mut RelayController) -> Result<(), Box<dyn std::error::Error>> {
    if board.init_board()? == BoardVariant::Unknown {
        return Err("board did not identify itself; refusing to switch relays blind".into());
    }
    Ok(())
}

/// Parse a relay bitmask in binary, hex or decimal notation.
fn parse_mask(input: &str) -> Result<u8, String> {
    let parsed = if let Some(bits) = input.strip_prefix("0b") {
        u8::from_str_radix(bits, 2)
    } else if let Some(hex) = input.strip_prefix("0x") {
        u8::from_str_radix(hex, 16)
    } else {
        input.parse()
    };

    parsed.map_err(|_| format!("invalid relay mask: {input}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mask_notations() {
        assert_eq!(parse_mask("0b101").unwrap(), 0b101);
        assert_eq!(parse_mask("0x0f").unwrap(), 0x0F);
        assert_eq!(parse_mask("255").unwrap(), 255);
    }

    #[test]
    fn test_parse_mask_rejects_junk() {
        assert!(parse_mask("relay1").is_err());
        assert!(parse_mask("0b2").is_err());
        assert!(parse_mask("256").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let args = Args::try_parse_from(["usbrelay-ctl", "-p", "/dev/ttyACM0", "set", "0b11"])
            .unwrap();
        assert_eq!(args.port.as_deref(), Some("/dev/ttyACM0"));
        assert!(matches!(args.command, Command::Set { .. }));
    }
}
