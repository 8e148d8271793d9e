//! Build script for meridian-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates face.toml at compile time
//! - Emits the face constants and the build epoch used as the wall-clock base

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    setup_linker();
    let config = validate_config();
    emit_constants(&config);
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

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Values read from face.toml
struct FaceToml {
    weather_path: String,
    connect_timeout_ms: i64,
    asset_read_timeout_ms: i64,
    interval_ms: i64,
    twelve_hour: bool,
    utc_offset_s: i64,
    low_bit_ambient: bool,
    idle_timeout_s: i64,
}

/// Validate face.toml configuration at compile time
fn validate_config() -> FaceToml {
    // Re-run if face.toml changes
    println!("cargo:rerun-if-changed=face.toml");

    let config_path = Path::new("face.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: face.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a face.toml configuration file.           ║\n\
            ║  Please create one in the meridian-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read face.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in face.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let face = FaceToml {
        weather_path: string_field(&config, "sync", "weather_path", "/weather", &mut errors),
        connect_timeout_ms: int_field(&config, "sync", "connect_timeout_ms", 5000, 1..=60_000, &mut errors),
        asset_read_timeout_ms: int_field(&config, "sync", "asset_read_timeout_ms", 10_000, 1..=120_000, &mut errors),
        interval_ms: int_field(&config, "timer", "interval_ms", 1000, 1..=60_000, &mut errors),
        twelve_hour: match string_field(&config, "clock", "format", "24h", &mut errors).as_str() {
            "24h" => false,
            "12h" => true,
            _ => {
                errors.push("[clock] format must be '24h' or '12h'".to_string());
                false
            }
        },
        utc_offset_s: int_field(&config, "clock", "utc_offset_s", 0, -43_200..=50_400, &mut errors),
        low_bit_ambient: bool_field(&config, "display", "low_bit_ambient", false, &mut errors),
        idle_timeout_s: int_field(&config, "display", "idle_timeout_s", 10, 1..=3_600, &mut errors),
    };

    if !face.weather_path.starts_with('/') || face.weather_path.len() > 32 {
        errors.push("[sync] weather_path must start with '/' and be at most 32 bytes".to_string());
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid face configuration                               ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=face.toml validated successfully");
    face
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn lookup<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section).and_then(|s| s.get(key))
}

fn string_field(
    config: &toml::Value,
    section: &str,
    key: &str,
    default: &str,
    errors: &mut Vec<String>,
) -> String {
    match lookup(config, section, key) {
        None => default.to_string(),
        Some(toml::Value::String(s)) => s.clone(),
        Some(_) => {
            errors.push(format!("[{}] {} must be a string", section, key));
            default.to_string()
        }
    }
}

fn int_field(
    config: &toml::Value,
    section: &str,
    key: &str,
    default: i64,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> i64 {
    match lookup(config, section, key) {
        None => default,
        Some(toml::Value::Integer(v)) if range.contains(v) => *v,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!(
                "[{}] {} must be {}..={}",
                section,
                key,
                range.start(),
                range.end()
            ));
            default
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            default
        }
    }
}

fn bool_field(
    config: &toml::Value,
    section: &str,
    key: &str,
    default: bool,
    errors: &mut Vec<String>,
) -> bool {
    match lookup(config, section, key) {
        None => default,
        Some(toml::Value::Boolean(b)) => *b,
        Some(_) => {
            errors.push(format!("[{}] {} must be true or false", section, key));
            default
        }
    }
}

/// Write face constants to $OUT_DIR/face_config.rs
fn emit_constants(face: &FaceToml) {
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    // Reproducible builds pin the epoch; otherwise use the build time
    let build_epoch_ms: i64 = match env::var("SOURCE_DATE_EPOCH") {
        Ok(secs) => secs.trim().parse::<i64>().unwrap() * 1000,
        Err(_) => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as i64,
    };

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("face_config.rs")).unwrap();
    writeln!(f, "pub const WEATHER_PATH: &str = {:?};", face.weather_path).unwrap();
    writeln!(f, "pub const CONNECT_TIMEOUT_MS: u32 = {};", face.connect_timeout_ms).unwrap();
    writeln!(f, "pub const ASSET_READ_TIMEOUT_MS: u32 = {};", face.asset_read_timeout_ms).unwrap();
    writeln!(f, "pub const FRAME_INTERVAL_MS: u32 = {};", face.interval_ms).unwrap();
    writeln!(f, "pub const TWELVE_HOUR: bool = {};", face.twelve_hour).unwrap();
    writeln!(f, "pub const UTC_OFFSET_S: i32 = {};", face.utc_offset_s).unwrap();
    writeln!(f, "pub const LOW_BIT_AMBIENT: bool = {};", face.low_bit_ambient).unwrap();
    writeln!(f, "pub const IDLE_TIMEOUT_S: u64 = {};", face.idle_timeout_s).unwrap();
    writeln!(f, "pub const BUILD_EPOCH_MS: i64 = {};", build_epoch_ms).unwrap();
}
