//! Wrapper around the external `memo` command.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use thiserror::Error;

pub const LIST_FORMAT: &str = "{{.Fullpath}}\t{{.File}}\t{{.Title}}";

#[derive(Debug, Error)]
pub enum MemoError {
    #[error("memo command not found in PATH; install it or set MEMO_PICKER_MEMO_BIN")]
    CommandNotFound,
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("memo {args} exited with {status}: {stderr}")]
    Failed { args: String, status: String, stderr: String },
    #[error("memo returned non UTF-8 output")]
    InvalidOutput(#[from] std::string::FromUtf8Error),
}

/// One row of `memo list` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoEntry {
    pub fullpath: String,
    pub filename: String,
    pub title: String,
}

impl MemoEntry {
    /// Parse a tab separated `fullpath`, `filename`, `title` row. The title
    /// keeps any further tabs. Missing fields stay empty.
    pub fn parse(row: &str) -> Option<Self> {
        let row = row.trim_end_matches(['\r', '\n']);
        if row.is_empty() {
            return None;
        }
        let mut fields = row.splitn(3, '\t');
        let fullpath = fields.next().unwrap_or_default().to_string();
        let filename = fields.next().unwrap_or_default().to_string();
        let title = fields.next().unwrap_or_default().to_string();
        Some(Self { fullpath, filename, title })
    }

    pub fn is_complete(&self) -> bool {
        !self.fullpath.is_empty() && !self.filename.is_empty()
    }
}

pub struct Memo {
    command: PathBuf,
    debug: bool,
}

impl Memo {
    pub fn new(command: PathBuf) -> Self {
        Self { command, debug: false }
    }

    /// Find the binary, preferring an explicit path over a `PATH` search.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, MemoError> {
        if let Some(path) = explicit {
            return which::which(path)
                .map(Self::new)
                .map_err(|_| MemoError::CommandNotFound);
        }
        which::which("memo")
            .map(Self::new)
            .map_err(|_| MemoError::CommandNotFound)
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn run(&self, args: &[&str]) -> Result<String, MemoError> {
        if self.debug {
            eprintln!("debug: {} {}", self.command.display(), args.join(" "));
        }
        let output = Command::new(&self.command)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| MemoError::Spawn {
                command: self.command.display().to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(MemoError::Failed {
                args: args.join(" "),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr)
                    .trim()
                    .to_string(),
            });
        }
        Ok(String::from_utf8(output.stdout)?)
    }

    pub fn list(&self) -> Result<Vec<MemoEntry>, MemoError> {
        let out = self.run(&["list", "--format", LIST_FORMAT])?;
        let mut entries = Vec::new();
        for row in out.lines() {
            let Some(entry) = MemoEntry::parse(row) else { continue };
            if !entry.is_complete() {
                eprintln!("warning: incomplete memo list row: {row}");
            }
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Directory configured as `memodir` in memo's config, if any.
    pub fn memo_dir(&self) -> Result<Option<PathBuf>, MemoError> {
        let txt = self.run(&["config", "--cat"])?;
        Ok(parse_memo_dir(&txt).map(PathBuf::from))
    }
}

/// Extract the `memodir = "..."` value from memo's TOML config.
pub fn parse_memo_dir(config: &str) -> Option<&str> {
    static MEMO_DIR: OnceLock<Regex> = OnceLock::new();
    let re = MEMO_DIR.get_or_init(|| {
        Regex::new(r#"(?m)^memodir = "(.*?)"$"#).expect("valid memodir regex")
    });
    re.captures(config)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
}
