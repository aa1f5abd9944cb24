//! Build script for i8080-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time
//! - Generates `board_config.rs` with the validated values

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use i8080_hal::PinId;

/// FSMC NE1, the only chip select the fixed bus addresses decode
const REQUIRED_CS: &str = "PD7";

/// FSMC A23, the line separating the register and data halfwords
const REQUIRED_RS: &str = "PE2";

fn main() {
    setup_linker();
    let board = validate_config();
    generate_board_config(&board);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

struct Timing {
    address_setup: u8,
    address_hold: u8,
    data: u8,
}

struct Board {
    backlight: PinId,
    cs: PinId,
    rs: PinId,
    read: Timing,
    write: Timing,
    baudrate: u32,
}

fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validate board.toml and return the parsed board
fn validate_config() -> Board {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        fail(
            "board.toml not found",
            &["Create board.toml in the i8080-firmware directory".to_string()],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read board.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in board.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();

    let backlight = validate_pin(&config, "backlight", &mut errors);
    let cs = validate_pin(&config, "cs", &mut errors);
    let rs = validate_pin(&config, "rs", &mut errors);

    if let Some(cs) = cs {
        if Some(cs) != PinId::parse(REQUIRED_CS).map(|(p, _)| p) {
            errors.push(format!("[pins] cs must be {} (FSMC NE1)", REQUIRED_CS));
        }
    }
    if let Some(rs) = rs {
        if Some(rs) != PinId::parse(REQUIRED_RS).map(|(p, _)| p) {
            errors.push(format!("[pins] rs must be {} (FSMC A23)", REQUIRED_RS));
        }
    }
    if backlight.is_some() && (backlight == cs || backlight == rs) {
        errors.push("[pins] backlight must not share a bus pin".to_string());
    }

    let read = validate_timing(&config, "read", &mut errors);
    let write = validate_timing(&config, "write", &mut errors);
    let baudrate = validate_baudrate(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid board configuration", &errors);
    }

    match (backlight, cs, rs, read, write, baudrate) {
        (Some(backlight), Some(cs), Some(rs), Some(read), Some(write), Some(baudrate)) => Board {
            backlight,
            cs,
            rs,
            read,
            write,
            baudrate,
        },
        _ => fail("Invalid board configuration", &["incomplete".to_string()]),
    }
}

fn validate_pin(config: &toml::Value, key: &str, errors: &mut Vec<String>) -> Option<PinId> {
    let value = match config.get("pins").and_then(|p| p.get(key)) {
        Some(toml::Value::String(s)) => s,
        Some(_) => {
            errors.push(format!("[pins] {} must be a string like \"PD7\"", key));
            return None;
        }
        None => {
            errors.push(format!("[pins] missing '{}'", key));
            return None;
        }
    };

    match PinId::parse(value) {
        Some((_, true)) => {
            errors.push(format!("[pins] {} cannot be inverted", key));
            None
        }
        Some((pin, false)) => Some(pin),
        None => {
            errors.push(format!("[pins] {} = \"{}\" is not a valid pin", key, value));
            None
        }
    }
}

fn timing_field(
    table: &toml::Value,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> Option<u8> {
    match table.get(key) {
        Some(toml::Value::Integer(v)) if range.contains(v) => Some(*v as u8),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!(
                "[fsmc.{}] {} must be {}-{}",
                section,
                key,
                range.start(),
                range.end()
            ));
            None
        }
        Some(_) => {
            errors.push(format!("[fsmc.{}] {} must be an integer", section, key));
            None
        }
        None => {
            errors.push(format!("[fsmc.{}] missing '{}'", section, key));
            None
        }
    }
}

fn validate_timing(config: &toml::Value, section: &str, errors: &mut Vec<String>) -> Option<Timing> {
    let Some(table) = config.get("fsmc").and_then(|f| f.get(section)) else {
        errors.push(format!("Missing [fsmc.{}] section", section));
        return None;
    };

    let address_setup = timing_field(table, section, "address_setup", 0..=15, errors);
    let address_hold = timing_field(table, section, "address_hold", 0..=15, errors);
    let data = timing_field(table, section, "data", 1..=255, errors);

    Some(Timing {
        address_setup: address_setup?,
        address_hold: address_hold?,
        data: data?,
    })
}

fn validate_baudrate(config: &toml::Value, errors: &mut Vec<String>) -> Option<u32> {
    match config.get("uart").and_then(|u| u.get("baudrate")) {
        Some(toml::Value::Integer(b)) if (1_200..=4_000_000).contains(b) => Some(*b as u32),
        Some(_) => {
            errors.push("[uart] baudrate must be an integer in 1200-4000000".to_string());
            None
        }
        None => {
            errors.push("[uart] missing 'baudrate'".to_string());
            None
        }
    }
}

/// Write the validated board as Rust constants
fn generate_board_config(board: &Board) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("board_config.rs")).unwrap();

    writeln!(f, "// Generated from board.toml by build.rs").unwrap();
    writeln!(f, "pub const BACKLIGHT_PIN: u8 = {};", board.backlight.raw()).unwrap();
    writeln!(f, "pub const CS_PIN: u8 = {};", board.cs.raw()).unwrap();
    writeln!(f, "pub const RS_PIN: u8 = {};", board.rs.raw()).unwrap();
    for (name, t) in [("READ", &board.read), ("WRITE", &board.write)] {
        writeln!(
            f,
            "pub const {}_TIMING: (u8, u8, u8) = ({}, {}, {});",
            name, t.data, t.address_hold, t.address_setup
        )
        .unwrap();
    }
    writeln!(f, "pub const UART_BAUDRATE: u32 = {};", board.baudrate).unwrap();
}
