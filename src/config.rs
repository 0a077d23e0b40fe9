/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// A missing file or missing keys fall back to defaults; values that
/// are *present but invalid* (bad colors, non-positive sizes, a canvas
/// that doesn't divide into cells, an unordered speed table) abort
/// startup with a descriptive message instead of limping along.

use std::path::PathBuf;
use std::time::Duration;

use crossterm::style::Color;
use serde::Deserialize;

use crate::domain::grid::Grid;
use crate::sim::world::SpeedLevel;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Board dimensions in cells, derived from canvas size / cell size.
    pub grid: Grid,
    pub speeds: SpeedTable,
    pub colors: ColorConfig,
}

/// Inter-tick delay per speed level, in milliseconds.
/// Invariant (checked at load): slow > medium > fast, all positive.
#[derive(Clone, Copy, Debug)]
pub struct SpeedTable {
    pub slow_ms: u64,
    pub medium_ms: u64,
    pub fast_ms: u64,
}

impl SpeedTable {
    pub fn delay_for(&self, level: SpeedLevel) -> Duration {
        let ms = match level {
            SpeedLevel::Slow => self.slow_ms,
            SpeedLevel::Medium => self.medium_ms,
            SpeedLevel::Fast => self.fast_ms,
        };
        Duration::from_millis(ms)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ColorConfig {
    pub background: Color,
    pub snake: Color,
    pub food: Color,
    pub border: Color,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    board: TomlBoard,
    #[serde(default)]
    speeds: TomlSpeeds,
    #[serde(default)]
    colors: TomlColors,
}

#[derive(Deserialize, Debug)]
struct TomlBoard {
    #[serde(default = "default_canvas_width")]
    canvas_width: i64,
    #[serde(default = "default_canvas_height")]
    canvas_height: i64,
    #[serde(default = "default_cell_size")]
    cell_size: i64,
}

#[derive(Deserialize, Debug)]
struct TomlSpeeds {
    #[serde(default = "default_slow")]
    slow: i64,
    #[serde(default = "default_medium")]
    medium: i64,
    #[serde(default = "default_fast")]
    fast: i64,
}

#[derive(Deserialize, Debug)]
struct TomlColors {
    #[serde(default = "default_background")]
    background: String,
    #[serde(default = "default_snake")]
    snake: String,
    #[serde(default = "default_food")]
    food: String,
    #[serde(default = "default_border")]
    border: String,
}

// ── Defaults ──

fn default_canvas_width() -> i64 { 600 }
fn default_canvas_height() -> i64 { 400 }
fn default_cell_size() -> i64 { 20 }     // 600×400 px / 20 px → 30×20 cells

fn default_slow() -> i64 { 200 }
fn default_medium() -> i64 { 120 }
fn default_fast() -> i64 { 70 }

fn default_background() -> String { "161623".into() }
fn default_snake() -> String { "22c55e".into() }
fn default_food() -> String { "ef4444".into() }
fn default_border() -> String { "e5e7eb".into() }

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            cell_size: default_cell_size(),
        }
    }
}

impl Default for TomlSpeeds {
    fn default() -> Self {
        TomlSpeeds {
            slow: default_slow(),
            medium: default_medium(),
            fast: default_fast(),
        }
    }
}

impl Default for TomlColors {
    fn default() -> Self {
        TomlColors {
            background: default_background(),
            snake: default_snake(),
            food: default_food(),
            border: default_border(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load and validate config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    pub fn load() -> Result<Self, String> {
        let toml_cfg = load_toml(&candidate_dirs())?;
        Self::from_toml(toml_cfg)
    }

    fn from_toml(cfg: TomlConfig) -> Result<Self, String> {
        let grid = derive_grid(&cfg.board)?;
        let speeds = validate_speeds(&cfg.speeds)?;
        let colors = ColorConfig {
            background: parse_color("colors.background", &cfg.colors.background)?,
            snake: parse_color("colors.snake", &cfg.colors.snake)?,
            food: parse_color("colors.food", &cfg.colors.food)?,
            border: parse_color("colors.border", &cfg.colors.border)?,
        };
        Ok(GameConfig { grid, speeds, colors })
    }
}

/// Largest board side in cells. No terminal is anywhere near this wide.
const MAX_GRID_SIDE: i64 = 500;

fn derive_grid(board: &TomlBoard) -> Result<Grid, String> {
    let (w, h, cell) = (board.canvas_width, board.canvas_height, board.cell_size);
    if w <= 0 || h <= 0 || cell <= 0 {
        return Err(format!(
            "board sizes must be positive (canvas_width={w}, canvas_height={h}, cell_size={cell})"
        ));
    }
    if w % cell != 0 || h % cell != 0 {
        return Err(format!(
            "cell_size {cell} must evenly divide canvas_width {w} and canvas_height {h}"
        ));
    }
    let (cols, rows) = (w / cell, h / cell);
    // The snake always starts at (5,5)..(3,5); the board has to hold it.
    if cols < 6 || rows < 6 {
        return Err(format!("board is {cols}×{rows} cells; at least 6×6 is required"));
    }
    // Bounded before the i32 cast; also keeps the renderer's u16
    // terminal coordinates (two columns per cell) safe.
    if cols > MAX_GRID_SIDE || rows > MAX_GRID_SIDE {
        return Err(format!(
            "board is {cols}×{rows} cells; at most {MAX_GRID_SIDE}×{MAX_GRID_SIDE} is supported"
        ));
    }
    Ok(Grid::new(cols as i32, rows as i32))
}

fn validate_speeds(speeds: &TomlSpeeds) -> Result<SpeedTable, String> {
    let (slow, medium, fast) = (speeds.slow, speeds.medium, speeds.fast);
    if fast <= 0 {
        return Err(format!("speed delays must be positive (fast={fast})"));
    }
    if !(slow > medium && medium > fast) {
        return Err(format!(
            "speed delays must be strictly ordered slow > medium > fast \
             (got slow={slow}, medium={medium}, fast={fast})"
        ));
    }
    Ok(SpeedTable {
        slow_ms: slow as u64,
        medium_ms: medium as u64,
        fast_ms: fast as u64,
    })
}

/// Parse a 6-digit hex RGB string ("22c55e") into a terminal color.
fn parse_color(key: &str, hex: &str) -> Result<Color, String> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("{key}: expected 6 hex digits, got {hex:?}"));
    }
    let chan = |i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("{key}: {e}"));
    Ok(Color::Rgb { r: chan(0)?, g: chan(2)?, b: chan(4)? })
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
/// Absent file → defaults; unreadable or unparsable file → error.
fn load_toml(search_dirs: &[PathBuf]) -> Result<TomlConfig, String> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| format!("could not read {}: {e}", path.display()))?;
            return toml::from_str::<TomlConfig>(&text)
                .map_err(|e| format!("{}: {e}", path.display()));
        }
    }
    Ok(TomlConfig::default())
}
