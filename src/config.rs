/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub timing: TimingConfig,
    pub gamepad: GamepadConfig,
    /// Level plan to play; `None` = built-in plan.
    pub level_file: Option<PathBuf>,
}

/// Simulation constants, in tiles and seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    pub walk_speed: f64,
    pub gravity: f64,
    pub jump_speed: f64,   // magnitude of the upward impulse on landing
    pub hazard_speed: f64,
    pub max_frame_step: f64, // dt clamp
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub frame_ms: u64,
    pub restart_delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_walk_speed")]
    walk_speed: f64,
    #[serde(default = "default_gravity")]
    gravity: f64,
    #[serde(default = "default_jump_speed")]
    jump_speed: f64,
    #[serde(default = "default_hazard_speed")]
    hazard_speed: f64,
    #[serde(default = "default_max_frame_step")]
    max_frame_step: f64,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default = "default_restart_delay")]
    restart_delay_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    level_file: Option<String>,
}

// ── Defaults ──

fn default_walk_speed() -> f64 { 4.0 }
fn default_gravity() -> f64 { 20.0 }
fn default_jump_speed() -> f64 { 10.0 }
fn default_hazard_speed() -> f64 { 2.0 }
fn default_max_frame_step() -> f64 { 0.1 } // 100ms: no huge steps after a stall

fn default_frame_ms() -> u64 { 16 }
fn default_restart_delay() -> u64 { 1000 }

fn default_restart() -> Vec<String> { vec!["Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            walk_speed: default_walk_speed(),
            gravity: default_gravity(),
            jump_speed: default_jump_speed(),
            hazard_speed: default_hazard_speed(),
            max_frame_step: default_max_frame_step(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            frame_ms: default_frame_ms(),
            restart_delay_ms: default_restart_delay(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            restart: default_restart(),
            quit: default_quit(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig::from(TomlPhysics::default())
    }
}

impl From<TomlPhysics> for PhysicsConfig {
    fn from(t: TomlPhysics) -> Self {
        let max_frame_step = if t.max_frame_step > 0.0 {
            t.max_frame_step
        } else {
            log::warn!(
                "physics.max_frame_step must be positive (got {}), using {}",
                t.max_frame_step,
                default_max_frame_step()
            );
            default_max_frame_step()
        };
        PhysicsConfig {
            walk_speed: t.walk_speed,
            gravity: t.gravity,
            jump_speed: t.jump_speed,
            hazard_speed: t.hazard_speed,
            max_frame_step,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[])
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        GameConfig::from_toml(toml_cfg, &search_dirs)
    }

    /// Parse config text directly. Parse errors fall back to defaults.
    pub fn from_toml_str(text: &str) -> Self {
        let toml_cfg = match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("config parse error: {e}; using default settings");
                TomlConfig::default()
            }
        };
        GameConfig::from_toml(toml_cfg, &[])
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        // Relative level paths are resolved against the search dirs.
        let level_file = toml_cfg.general.level_file.map(|name| {
            let path = PathBuf::from(&name);
            if path.is_absolute() {
                return path;
            }
            search_dirs
                .iter()
                .map(|d| d.join(&name))
                .find(|p| p.is_file())
                .unwrap_or(path)
        });

        GameConfig {
            physics: PhysicsConfig::from(toml_cfg.physics),
            timing: TimingConfig {
                frame_ms: toml_cfg.timing.frame_ms,
                restart_delay_ms: toml_cfg.timing.restart_delay_ms,
            },
            gamepad: GamepadConfig {
                restart: toml_cfg.gamepad.restart,
                quit: toml_cfg.gamepad.quit,
            },
            level_file,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/lavarunner)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/lavarunner");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => {
                    log::info!("loaded {}", path.display());
                    return cfg;
                }
                Err(e) => {
                    log::warn!("{} parse error: {e}; using default settings", path.display());
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
            }
        }
    }
    TomlConfig::default()
}
