//! Content search over the memo directory.

use regex::RegexBuilder;
use std::error::Error;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const NOTE_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepHit {
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
    pub text: String,
    /// Byte range of the match within `text`.
    pub span: Range<usize>,
}

/// Lowercase patterns match case-insensitively, any uppercase letter makes
/// the search case-sensitive.
pub fn is_smart_case_insensitive(pattern: &str) -> bool {
    !pattern.chars().any(char::is_uppercase)
}

pub fn grep(
    memo_dir: &Path,
    pattern: &str,
) -> Result<Vec<GrepHit>, Box<dyn Error>> {
    if !memo_dir.is_dir() {
        return Err(
            format!("Memo directory not found: {}", memo_dir.display()).into()
        );
    }
    let re = RegexBuilder::new(pattern)
        .case_insensitive(is_smart_case_insensitive(pattern))
        .build()
        .map_err(|e| format!("Invalid pattern {pattern:?}: {e}"))?;

    let mut hits = Vec::new();
    let walker = WalkDir::new(memo_dir).sort_by_file_name().into_iter();
    for entry in
        walker.filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
    {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_note_file(entry.path()) {
            continue;
        }
        let content = match fs::read(entry.path()) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                eprintln!(
                    "warning: skipping {}: {err}",
                    entry.path().display()
                );
                continue;
            }
        };
        for (idx, line) in content.lines().enumerate() {
            if let Some(m) = re.find(line) {
                hits.push(GrepHit {
                    path: entry.path().to_path_buf(),
                    line: idx + 1,
                    column: line[..m.start()].chars().count() + 1,
                    text: line.to_string(),
                    span: m.range(),
                });
            }
        }
    }
    Ok(hits)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.len() > 1 && s.starts_with('.'))
}

fn is_note_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            NOTE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("2024-01-01-a.md"),
            "# Alpha\nbuy milk\nMilk again\n",
        )
        .unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/b.txt"), "no match\n  milk tea\n")
            .unwrap();
        fs::write(temp.path().join("image.png"), "milk").unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join(".git/c.md"), "milk").unwrap();
        temp
    }

    #[test]
    fn test_smart_case() {
        let temp = fixture();
        let hits = grep(temp.path(), "milk").unwrap();
        let lines: Vec<(usize, usize)> =
            hits.iter().map(|h| (h.line, h.column)).collect();
        assert_eq!(lines, vec![(2, 5), (3, 1), (2, 3)]);
        assert!(hits[2].path.ends_with("sub/b.txt"));

        let hits = grep(temp.path(), "Milk").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "Milk again");
        assert_eq!(hits[0].span, 0..4);
    }

    #[test]
    fn test_errors() {
        let temp = fixture();
        assert!(grep(temp.path(), "(unclosed").is_err());
        assert!(grep(&temp.path().join("missing"), "x").is_err());
    }
}
