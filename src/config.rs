/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

use crate::domain::maze;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub sound: SoundConfig,
    pub gamepad: GamepadConfig,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    pub frame_ms: u64,
    pub intro_delay_ms: u64,  // the intro cue fits inside it
    pub reset_delay_ms: u64,  // how long "Game Over" stays up
    pub scare_ms: u64,
    pub ghost_periods_ms: [u64; 4],
}

#[derive(Clone, Debug)]
pub struct SoundConfig {
    pub enabled: bool,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub start: Vec<String>,
    pub mute: Vec<String>,
    pub quit: Vec<String>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            frame_ms: default_frame(),
            intro_delay_ms: default_intro_delay(),
            reset_delay_ms: default_reset_delay(),
            scare_ms: default_scare(),
            ghost_periods_ms: default_ghost_periods(),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    sound: TomlSound,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_frame")]
    frame_ms: u64,
    #[serde(default = "default_intro_delay")]
    intro_delay_ms: u64,
    #[serde(default = "default_reset_delay")]
    reset_delay_ms: u64,
    #[serde(default = "default_scare")]
    scare_ms: u64,
    #[serde(default = "default_ghost_periods_vec")]
    ghost_periods_ms: Vec<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_sound_enabled")]
    enabled: bool,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_start")]
    start: Vec<String>,
    #[serde(default = "default_mute")]
    mute: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
}

// ── Defaults ──

fn default_frame() -> u64 { 16 }
fn default_intro_delay() -> u64 { 4_200 }
fn default_reset_delay() -> u64 { 2_500 }
fn default_scare() -> u64 { 10_000 }
fn default_ghost_periods() -> [u64; 4] {
    maze::GHOSTS.map(|g| g.period_ms)
}
fn default_ghost_periods_vec() -> Vec<u64> { default_ghost_periods().to_vec() }
fn default_sound_enabled() -> bool { true }

fn default_start() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_mute() -> Vec<String> { vec!["Y".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            frame_ms: default_frame(),
            intro_delay_ms: default_intro_delay(),
            reset_delay_ms: default_reset_delay(),
            scare_ms: default_scare(),
            ghost_periods_ms: default_ghost_periods_vec(),
        }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { enabled: default_sound_enabled() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            start: default_start(),
            mute: default_mute(),
            quit: default_quit(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig::from_toml(toml_cfg)
    }

    /// Parse config text. A parse error yields the defaults.
    pub fn from_toml_str(text: &str) -> Self {
        let toml_cfg = match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("config.toml parse error: {e}; using default settings");
                TomlConfig::default()
            }
        };
        GameConfig::from_toml(toml_cfg)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let t = cfg.timing;
        GameConfig {
            timing: TimingConfig {
                frame_ms: nonzero_or("frame_ms", t.frame_ms, default_frame()),
                intro_delay_ms: t.intro_delay_ms,
                reset_delay_ms: t.reset_delay_ms,
                scare_ms: nonzero_or("scare_ms", t.scare_ms, default_scare()),
                ghost_periods_ms: ghost_periods(&t.ghost_periods_ms),
            },
            sound: SoundConfig { enabled: cfg.sound.enabled },
            gamepad: GamepadConfig {
                start: cfg.gamepad.start,
                mute: cfg.gamepad.mute,
                quit: cfg.gamepad.quit,
            },
            seed: cfg.general.seed,
        }
    }
}

fn nonzero_or(key: &str, value: u64, fallback: u64) -> u64 {
    if value == 0 {
        warn!("config: {key} must be positive, using {fallback}");
        fallback
    } else {
        value
    }
}

/// Exactly four positive periods, one per ghost, or the defaults.
fn ghost_periods(values: &[u64]) -> [u64; 4] {
    match <[u64; 4]>::try_from(values) {
        Ok(p) if p.iter().all(|&v| v > 0) => p,
        _ => {
            warn!("config: ghost_periods_ms needs four positive values, got {values:?}");
            default_ghost_periods()
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
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
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        tracing::info!("loaded {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        warn!("config.toml parse error: {e}; using default settings");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("");
        assert_eq!(cfg.timing, TimingConfig::default());
        assert_eq!(cfg.timing.ghost_periods_ms, [500, 600, 700, 800]);
        assert_eq!(cfg.timing.scare_ms, 10_000);
        assert!(cfg.sound.enabled);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[timing]\nscare_ms = 3000\n\n[sound]\nenabled = false\n\n[general]\nseed = 9\n",
        );
        assert_eq!(cfg.timing.scare_ms, 3_000);
        assert_eq!(cfg.timing.reset_delay_ms, 2_500);
        assert!(!cfg.sound.enabled);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.gamepad.quit, vec!["Select".to_string()]);
    }

    #[test]
    fn bad_ghost_periods_fall_back() {
        let cfg = GameConfig::from_toml_str("[timing]\nghost_periods_ms = [100, 0, 300, 400]\n");
        assert_eq!(cfg.timing.ghost_periods_ms, [500, 600, 700, 800]);
        let cfg = GameConfig::from_toml_str("[timing]\nghost_periods_ms = [100, 200]\n");
        assert_eq!(cfg.timing.ghost_periods_ms, [500, 600, 700, 800]);
        let cfg = GameConfig::from_toml_str("[timing]\nghost_periods_ms = [1, 2, 3, 4]\n");
        assert_eq!(cfg.timing.ghost_periods_ms, [1, 2, 3, 4]);
    }

    #[test]
    fn malformed_toml_gives_defaults() {
        let cfg = GameConfig::from_toml_str("[timing\nscare_ms = ");
        assert_eq!(cfg.timing, TimingConfig::default());
    }

    #[test]
    fn zero_scare_rejected() {
        let cfg = GameConfig::from_toml_str("[timing]\nscare_ms = 0\n");
        assert_eq!(cfg.timing.scare_ms, 10_000);
    }
}
