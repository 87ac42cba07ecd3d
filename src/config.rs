//! Configuration system with embedded defaults and XDG-compliant paths.
//!
//! Boot sequence:
//! 1. Parse the embedded `default_config.toml` (compile-time guarantee it exists).
//! 2. Resolve `~/.config/reelgrid/config.toml` via the `directories` crate.
//! 3. If the user file doesn't exist, create the directory tree and write the default.
//! 4. Parse the user file (falling back to embedded defaults on any error).
//! 5. Store the resolved `Config` in a `OnceLock` for zero-cost global access.
//!
//! Every other module calls `config::get()` to obtain a `&'static Config`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use crossterm::event::KeyCode;
use ratatui::style::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{info, warn};

/// Embedded default configuration, baked into the binary at compile time.
const DEFAULT_CONFIG_STR: &str = include_str!("../default_config.toml");

/// Application-wide config singleton.
static CONFIG: OnceLock<Config> = OnceLock::new();

// ─── Public API ─────────────────────────────────────────────────────────────

/// Initialise the configuration system. Must be called exactly once at
/// startup, **after** tracing and before any other module calls `get()`.
pub fn init() -> Result<()> {
    let config = load()?;
    CONFIG
        .set(config)
        .map_err(|_| eyre!("Config already initialised"))?;
    Ok(())
}

/// Return a static reference to the loaded configuration. Callers that run
/// before `init()` (unit tests) get the compiled-in defaults.
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

// ─── Loading logic ──────────────────────────────────────────────────────────

fn load() -> Result<Config> {
    // 1. Parse compiled-in defaults, the infallible baseline.
    let defaults: RawConfig = toml::from_str(DEFAULT_CONFIG_STR)
        .wrap_err("BUG: failed to parse embedded default_config.toml")?;

    // 2. Resolve user config path.
    let user_path = config_path();
    info!("Config path: {}", user_path.display());

    // 3. Bootstrap on first run.
    ensure_config_file(&user_path)?;

    // 4. Parse user file; fall back to embedded defaults on *any* error.
    let raw = match fs::read_to_string(&user_path) {
        Ok(contents) => parse_or(&contents, defaults, &user_path),
        Err(e) => {
            warn!(
                "Cannot read {}: {e}, falling back to defaults",
                user_path.display()
            );
            defaults
        }
    };

    Ok(Config::from(raw))
}

fn parse_or(contents: &str, defaults: RawConfig, path: &Path) -> RawConfig {
    match toml::from_str::<RawConfig>(contents) {
        Ok(parsed) => {
            info!("Loaded user config from {}", path.display());
            parsed
        }
        Err(e) => {
            warn!(
                "Parse error in {}: {e}, falling back to defaults",
                path.display()
            );
            defaults
        }
    }
}

/// Resolve the XDG-compliant config file path.
fn config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "reelgrid")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".config/reelgrid/config.toml"))
}

/// Create the config directory tree and write the default file if absent.
fn ensure_config_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create config dir: {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_STR)
        .wrap_err_with(|| format!("Failed to write default config to {}", path.display()))?;
    info!("Created default config at {}", path.display());
    Ok(())
}

// ─── Hex colour helper ─────────────────────────────────────────────────────

/// Parse a `#RRGGBB` hex string into an RGB `Color`.
fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Newtype that serialises as `"#RRGGBB"` and deserialises from the same.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexColor(pub Color);

impl Default for HexColor {
    fn default() -> Self {
        HexColor(Color::Reset)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Color::Rgb(r, g, b) => s.serialize_str(&format!("#{r:02X}{g:02X}{b:02X}")),
            _ => s.serialize_str("#FFFFFF"),
        }
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(HexColor(parse_hex_color(&s).unwrap_or(Color::Reset)))
    }
}

// ─── Raw TOML structures (serde targets) ────────────────────────────────────
//
// Each struct carries `#[serde(default)]` so that missing keys or entire
// sections fill in from the compiled defaults.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawConfig {
    general: RawGeneral,
    api: RawApi,
    images: RawImages,
    layout: RawLayout,
    theme: RawTheme,
    keybindings: RawKeybindings,
}

// ── General ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawGeneral {
    tick_rate_ms: u64,
    slide_speed: f32,
}

impl Default for RawGeneral {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            slide_speed: 0.12,
        }
    }
}

// ── API ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawApi {
    endpoint: String,
    timeout_secs: u64,
    user_agent: String,
}

impl Default for RawApi {
    fn default() -> Self {
        Self {
            endpoint: "https://jsonfakery.com/movies/paginated".into(),
            timeout_secs: 15,
            user_agent: concat!("reelgrid/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

// ── Images ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawImages {
    probe: bool,
    probe_concurrency: usize,
}

impl Default for RawImages {
    fn default() -> Self {
        Self {
            probe: true,
            probe_concurrency: 8,
        }
    }
}

// ── Layout ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawLayout {
    card_width: u16,
    card_height: u16,
}

impl Default for RawLayout {
    fn default() -> Self {
        Self {
            card_width: 28,
            card_height: 8,
        }
    }
}

// ── Theme ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawTheme {
    palette: RawPalette,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawPalette {
    accent_primary: HexColor,
    accent_secondary: HexColor,
    accent_error: HexColor,
    text_primary: HexColor,
    text_dim: HexColor,
    border_inactive: HexColor,
}

impl Default for RawPalette {
    fn default() -> Self {
        Self {
            accent_primary: HexColor(Color::Rgb(229, 9, 20)),
            accent_secondary: HexColor(Color::Rgb(245, 197, 24)),
            accent_error: HexColor(Color::Rgb(255, 107, 107)),
            text_primary: HexColor(Color::Rgb(225, 223, 240)),
            text_dim: HexColor(Color::Rgb(120, 124, 150)),
            border_inactive: HexColor(Color::Rgb(140, 143, 165)),
        }
    }
}

// ── Keybindings ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawKeybindings {
    quit: String,
    nav_down: String,
    nav_up: String,
    nav_left: String,
    nav_right: String,
    jump_top: String,
    jump_bottom: String,
    open: String,
    close: String,
    help: String,
}

impl Default for RawKeybindings {
    fn default() -> Self {
        Self {
            quit: "q".into(),
            nav_down: "j".into(),
            nav_up: "k".into(),
            nav_left: "h".into(),
            nav_right: "l".into(),
            jump_top: "g".into(),
            jump_bottom: "G".into(),
            open: "Enter".into(),
            close: "x".into(),
            help: "?".into(),
        }
    }
}

// ─── Resolved runtime config ────────────────────────────────────────────────
//
// These are the structs the rest of the app interacts with. All values are
// validated, clamped, and ready to use.

/// Fully resolved, runtime-ready configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub general: GeneralConfig,
    pub api: ApiConfig,
    pub images: ImagesConfig,
    pub layout: LayoutConfig,
    pub theme: ThemeConfig,
    pub keys: KeybindingsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config::from(RawConfig::default())
    }
}

#[derive(Debug, Clone)]
pub struct GeneralConfig {
    pub tick_rate_ms: u64,
    pub slide_speed: f32,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct ImagesConfig {
    pub probe: bool,
    pub probe_concurrency: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    pub card_width: u16,
    pub card_height: u16,
}

#[derive(Debug, Clone)]
pub struct ThemeConfig {
    pub palette: Palette,
}

/// Resolved colour palette.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub accent_primary: Color,
    pub accent_secondary: Color,
    pub accent_error: Color,
    pub text_primary: Color,
    pub text_dim: Color,
    pub border_inactive: Color,
}

/// Pre-parsed keybindings, each a `KeyCode` ready for matching.
#[derive(Debug, Clone)]
pub struct KeybindingsConfig {
    pub quit: KeyCode,
    pub nav_down: KeyCode,
    pub nav_up: KeyCode,
    pub nav_left: KeyCode,
    pub nav_right: KeyCode,
    pub jump_top: KeyCode,
    pub jump_bottom: KeyCode,
    pub open: KeyCode,
    pub close: KeyCode,
    pub help: KeyCode,
}

// ─── Raw → Resolved conversion ─────────────────────────────────────────────

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        let endpoint = if raw.api.endpoint.trim().is_empty() {
            warn!("Empty api.endpoint in config, using the default");
            RawApi::default().endpoint
        } else {
            raw.api.endpoint
        };
        Self {
            general: GeneralConfig {
                tick_rate_ms: raw.general.tick_rate_ms.clamp(4, 200),
                slide_speed: raw.general.slide_speed.clamp(0.01, 1.0),
            },
            api: ApiConfig {
                endpoint,
                timeout_secs: raw.api.timeout_secs.clamp(1, 120),
                user_agent: raw.api.user_agent,
            },
            images: ImagesConfig {
                probe: raw.images.probe,
                probe_concurrency: raw.images.probe_concurrency.clamp(1, 32),
            },
            layout: LayoutConfig {
                card_width: raw.layout.card_width.clamp(12, 80),
                card_height: raw.layout.card_height.clamp(5, 30),
            },
            theme: ThemeConfig {
                palette: Palette {
                    accent_primary: raw.theme.palette.accent_primary.0,
                    accent_secondary: raw.theme.palette.accent_secondary.0,
                    accent_error: raw.theme.palette.accent_error.0,
                    text_primary: raw.theme.palette.text_primary.0,
                    text_dim: raw.theme.palette.text_dim.0,
                    border_inactive: raw.theme.palette.border_inactive.0,
                },
            },
            keys: KeybindingsConfig {
                quit: parse_key(&raw.keybindings.quit),
                nav_down: parse_key(&raw.keybindings.nav_down),
                nav_up: parse_key(&raw.keybindings.nav_up),
                nav_left: parse_key(&raw.keybindings.nav_left),
                nav_right: parse_key(&raw.keybindings.nav_right),
                jump_top: parse_key(&raw.keybindings.jump_top),
                jump_bottom: parse_key(&raw.keybindings.jump_bottom),
                open: parse_key(&raw.keybindings.open),
                close: parse_key(&raw.keybindings.close),
                help: parse_key(&raw.keybindings.help),
            },
        }
    }
}

/// Parse a human-readable key name into a crossterm `KeyCode`.
fn parse_key(s: &str) -> KeyCode {
    let mut chars = s.chars();
    match (s, chars.next(), chars.next()) {
        ("Enter", ..) => KeyCode::Enter,
        ("Esc", ..) => KeyCode::Esc,
        ("Tab", ..) => KeyCode::Tab,
        ("Backspace", ..) => KeyCode::Backspace,
        ("Space", ..) => KeyCode::Char(' '),
        ("Up", ..) => KeyCode::Up,
        ("Down", ..) => KeyCode::Down,
        ("Left", ..) => KeyCode::Left,
        ("Right", ..) => KeyCode::Right,
        ("Home", ..) => KeyCode::Home,
        ("End", ..) => KeyCode::End,
        ("PageUp", ..) => KeyCode::PageUp,
        ("PageDown", ..) => KeyCode::PageDown,
        (_, Some(c), None) => KeyCode::Char(c),
        (other, ..) => {
            warn!("Unknown keybinding \"{other}\" in config, ignoring");
            KeyCode::Null
        }
    }
}

/// Short display name for a bound key, as shown in key hints.
pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Enter => "⏎".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Backspace => "⌫".into(),
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "↑".into(),
        KeyCode::Down => "↓".into(),
        KeyCode::Left => "←".into(),
        KeyCode::Right => "→".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PgUp".into(),
        KeyCode::PageDown => "PgDn".into(),
        KeyCode::Null => "unbound".into(),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn embedded_defaults_parse() {
        let raw: RawConfig = toml::from_str(DEFAULT_CONFIG_STR).unwrap();
        let cfg = Config::from(raw);
        assert_eq!(cfg.api.endpoint, "https://jsonfakery.com/movies/paginated");
        assert_eq!(cfg.keys.open, KeyCode::Enter);
        assert_eq!(cfg.theme.palette.accent_primary, Color::Rgb(229, 9, 20));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let raw = parse_or(
            "[layout]\ncard_width = 200\n",
            RawConfig::default(),
            Path::new("test.toml"),
        );
        let cfg = Config::from(raw);
        assert_eq!(cfg.layout.card_width, 80);
        assert_eq!(cfg.layout.card_height, 8);
        assert!(cfg.images.probe);
    }

    #[test]
    fn broken_file_falls_back() {
        let mut defaults = RawConfig::default();
        defaults.general.tick_rate_ms = 33;
        let raw = parse_or("this is = = not toml", defaults, Path::new("bad.toml"));
        assert_eq!(raw.general.tick_rate_ms, 33);
    }

    #[test]
    fn empty_endpoint_is_replaced() {
        let mut raw = RawConfig::default();
        raw.api.endpoint = "  ".into();
        assert_eq!(
            Config::from(raw).api.endpoint,
            RawApi::default().endpoint
        );
    }

    #[test]
    fn key_names() {
        assert_eq!(parse_key("G"), KeyCode::Char('G'));
        assert_eq!(parse_key("Esc"), KeyCode::Esc);
        assert_eq!(parse_key("é"), KeyCode::Char('é'));
        assert_eq!(parse_key("Hyper"), KeyCode::Null);
    }

    #[test]
    fn key_labels() {
        assert_eq!(key_label(KeyCode::Char('x')), "x");
        assert_eq!(key_label(KeyCode::Char(' ')), "Space");
        assert_eq!(key_label(KeyCode::Enter), "⏎");
        assert_eq!(key_label(parse_key("Hyper")), "unbound");
    }

    #[test]
    fn hex_colours() {
        assert_eq!(parse_hex_color("#00D4FF"), Some(Color::Rgb(0, 212, 255)));
        assert_eq!(parse_hex_color("123"), None);
    }
}
