use crate::width::AmbiWidth;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_COLUMN: usize = 20;

/// Settings resolved from the environment. Command-line flags are applied
/// on top by the individual commands.
#[derive(Debug, Clone)]
pub struct Config {
    pub column: usize,
    pub ambiwidth: AmbiWidth,
    pub normalize_filenames: bool,
    pub memo_dir: Option<PathBuf>,
    pub memo_bin: Option<PathBuf>,
    pub editor: String,
    pub use_color: bool,
    pub use_fzf: bool,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            column: DEFAULT_COLUMN,
            ambiwidth: AmbiWidth::Single,
            normalize_filenames: cfg!(target_os = "macos"),
            memo_dir: None,
            memo_bin: None,
            editor: "vi".to_string(),
            use_color: true,
            use_fzf: true,
            debug: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any variable lookup; `from_env` passes the
    /// process environment.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let mut cfg = Config::default();
        if let Some(v) = lookup("MEMO_PICKER_COLUMN") {
            cfg.column = parse_column(&v)?;
        }
        if let Some(v) = lookup("MEMO_PICKER_AMBIWIDTH") {
            cfg.ambiwidth = AmbiWidth::parse(&v);
        }
        if let Some(v) = lookup("MEMO_PICKER_NORMALIZE") {
            cfg.normalize_filenames = parse_bool("MEMO_PICKER_NORMALIZE", &v)?;
        }
        cfg.memo_dir = lookup("MEMO_PICKER_MEMO_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        cfg.memo_bin = lookup("MEMO_PICKER_MEMO_BIN")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        if let Some(editor) = lookup("EDITOR").filter(|v| !v.trim().is_empty())
        {
            cfg.editor = editor;
        }
        cfg.use_color = lookup("NO_COLOR").is_none();
        cfg.use_fzf = lookup("MEMO_PICKER_NO_FZF").is_none();
        cfg.debug = lookup("MEMO_PICKER_DEBUG").is_some();
        Ok(cfg)
    }
}

pub fn parse_column(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("Column width must be a positive integer: {value}")),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(format!("{key} must be a boolean, got {other}")),
    }
}
