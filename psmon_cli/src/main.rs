//! Command-line front end for the PS1 serial debug monitor.
//!
//! Opens the link, waits for the monitor to answer, then runs one command:
//!
//! ```text
//! psmon /dev/ttyUSB0 exec game.exe
//! psmon /dev/ttyUSB0 read 0xbfc00000 0x100 -o bios_head.bin
//! psmon tcp:127.0.0.1:3333 write 0x80010000 patch.bin
//! psmon /dev/ttyUSB0 call 0x80010000
//! ```
//!
//! Set `RUST_LOG=psmon=trace` to see every frame on the wire.

#[macro_use]
extern crate log;

use std::fs;
use std::io::{self, Write};
use std::net::TcpStream;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use psmon::conn::Connection;
use psmon::exe::PsxExe;
use psmon::{validate, Monitor};

#[cfg(unix)]
mod serial;

type DynConnection = Box<dyn Connection<Error = io::Error>>;

#[derive(Parser, Debug)]
#[command(
    name = "psmon",
    version,
    about = "PlayStation 1 monitor load tool",
    long_about = "Talks to the debug monitor running on a PlayStation 1.\n\nPORT is a serial device path, `tcp:HOST:PORT`, or `unix:PATH`."
)]
struct Cli {
    /// Serial device, `tcp:HOST:PORT`, or `unix:PATH`.
    port: String,

    /// Serial baud rate (ignored for sockets).
    #[arg(long, default_value_t = 115200)]
    baud: u32,

    /// Maximum bytes per read/write command (1-255).
    #[arg(long, default_value_t = 128)]
    chunk_len: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a PS-X EXE and jump to its entry point.
    Exec {
        /// Executable to load.
        exe: PathBuf,
    },

    /// Dump console memory as hex, or to a file.
    Read {
        #[arg(value_parser = parse_addr)]
        addr: u32,

        #[arg(value_parser = parse_len)]
        len: usize,

        /// Write the raw bytes here instead of printing a hex dump.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Copy a file into console memory.
    Write {
        #[arg(value_parser = parse_addr)]
        addr: u32,

        input: PathBuf,
    },

    /// Jump to a word-aligned address.
    Call {
        #[arg(value_parser = parse_addr)]
        addr: u32,
    },

    /// Only wait for the monitor to answer.
    Ping,
}

fn parse_int(s: &str) -> Result<u64, String> {
    let res = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    res.map_err(|e| format!("`{}` is not a number: {}", s, e))
}

fn parse_addr(s: &str) -> Result<u32, String> {
    validate::address(parse_int(s)?).map_err(|e| e.to_string())
}

fn parse_len(s: &str) -> Result<usize, String> {
    let len = parse_int(s)?;
    // anything past the address space would fail validation anyway
    if len > validate::ADDRESS_SPACE_END {
        return Err(format!("length {:#x} is out of bounds", len));
    }
    Ok(len as usize)
}

fn open_port(name: &str, baud: u32) -> io::Result<DynConnection> {
    if let Some(addr) = name.strip_prefix("tcp:") {
        return Ok(Box::new(TcpStream::connect(addr)?));
    }

    #[cfg(unix)]
    {
        if let Some(path) = name.strip_prefix("unix:") {
            return Ok(Box::new(std::os::unix::net::UnixStream::connect(path)?));
        }
        Ok(Box::new(serial::SerialPort::open(name, baud)?))
    }

    #[cfg(not(unix))]
    {
        let _ = baud;
        Err(io::Error::new(
            io::ErrorKind::Other,
            "serial ports are only supported on unix hosts",
        ))
    }
}

fn hexdump(out: &mut impl Write, base: u32, data: &[u8]) -> io::Result<()> {
    for (i, line) in data.chunks(16).enumerate() {
        write!(out, "{:08x} ", base.wrapping_add(i as u32 * 16))?;
        for b in line {
            write!(out, " {:02x}", b)?;
        }
        for _ in line.len()..16 {
            write!(out, "   ")?;
        }
        let ascii: String = line
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();
        writeln!(out, "  |{}|", ascii)?;
    }
    Ok(())
}

fn run(mon: &mut Monitor<DynConnection>, command: Commands) -> Result<()> {
    match command {
        Commands::Exec { exe } => {
            let data = fs::read(&exe).with_context(|| format!("could not read {}", exe.display()))?;
            let header = PsxExe::parse(&data)
                .with_context(|| format!("could not load {}", exe.display()))?
                .header;
            info!(
                "{}: entry {:#010x}, gp {:#010x}, {} bytes at {:#010x}",
                exe.display(),
                header.entry,
                header.gp,
                header.load_len,
                header.load_addr
            );
            mon.execute(&data)?;
        }
        Commands::Read { addr, len, output } => {
            let data = mon.read(addr, len)?;
            match output {
                Some(path) => fs::write(&path, &data)
                    .with_context(|| format!("could not write {}", path.display()))?,
                None => hexdump(&mut io::stdout().lock(), addr, &data)?,
            }
        }
        Commands::Write { addr, input } => {
            let data =
                fs::read(&input).with_context(|| format!("could not read {}", input.display()))?;
            mon.write(addr, &data)?;
        }
        Commands::Call { addr } => mon.call(addr)?,
        Commands::Ping => {}
    }
    Ok(())
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    let conn = open_port(&cli.port, cli.baud).with_context(|| format!("could not open {}", cli.port))?;
    let mut mon = Monitor::builder(conn)
        .max_chunk_length(cli.chunk_len)
        .build()?;

    eprintln!("Waiting for the monitor on {}...", cli.port);
    mon.wait_for_ready()?;

    run(&mut mon, cli.command)?;
    mon.close()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses() {
        assert_eq!(parse_addr("0x80010000"), Ok(0x8001_0000));
        assert_eq!(parse_addr("0XBFC0_0000"), Ok(0xbfc0_0000));
        assert_eq!(parse_addr("4096"), Ok(4096));
        assert_eq!(parse_addr("0xffffffff"), Ok(0xffff_ffff));
        assert!(parse_addr("0x100000000").is_err());
        assert!(parse_addr("-4").is_err());
        assert!(parse_addr("0xzz").is_err());
    }

    #[test]
    fn lengths() {
        assert_eq!(parse_len("0x800"), Ok(0x800));
        assert_eq!(parse_len("0"), Ok(0));
        assert!(parse_len("0x100000001").is_err());
    }

    #[test]
    fn cli_shape() {
        let cli = Cli::try_parse_from(["psmon", "/dev/ttyUSB0", "--chunk-len", "64", "read", "0x1f800000", "16"])
            .unwrap();
        assert_eq!(cli.chunk_len, 64);
        assert!(matches!(
            cli.command,
            Commands::Read {
                addr: 0x1f80_0000,
                len: 16,
                output: None
            }
        ));
    }

    #[test]
    fn hexdump_layout() {
        let mut out = Vec::new();
        hexdump(&mut out, 0x8001_0000, b"PS-X EXE\x00\x01\x02\x03\x04\x05\x06\x07AB").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "80010000  50 53 2d 58 20 45 58 45 00 01 02 03 04 05 06 07  |PS-X EXE........|"
        );
        assert_eq!(
            lines[1],
            "80010010  41 42                                            |AB|"
        );
    }
}
