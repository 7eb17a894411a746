//! Candidates offered to the fuzzy finder.

use crate::formatting::FormatContext;
use crate::grep::GrepHit;
use crate::memo::MemoEntry;
use crate::width::{AmbiWidth, Truncator};
use std::path::{Path, PathBuf};

/// Separates the fixed-width file column from the title.
pub const SEPARATOR: &str = "\u{a0}:\u{a0}";
pub const NEW_TITLE_PREFIX: &str = "[new title] ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Open { path: PathBuf, line: Option<usize> },
    New { memo_dir: PathBuf, title: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Text shown and matched by the finder; may carry ANSI colors.
    pub abbr: String,
    pub action: Action,
}

/// Layout settings for the `list` column.
#[derive(Debug, Clone, Copy)]
pub struct ListLayout {
    pub column: usize,
    pub ambiwidth: AmbiWidth,
    /// Width available for the title, when known.
    pub title_width: Option<usize>,
}

impl Candidate {
    pub fn from_entry(
        entry: &MemoEntry,
        truncator: &Truncator,
        layout: ListLayout,
        fmt: &FormatContext,
    ) -> Self {
        let cut = truncator.stdwidthpart(
            &entry.filename,
            layout.column,
            layout.ambiwidth,
        );
        let title = match layout.title_width {
            Some(width)
                if truncator.cache().str_width(&entry.title, layout.ambiwidth)
                    > width =>
            {
                truncator
                    .stdwidthpart(&entry.title, width, layout.ambiwidth)
                    .trim_end()
                    .to_string()
            }
            _ => entry.title.clone(),
        };
        Self {
            abbr: format!(
                "{}{}{}",
                fmt.format_file(&cut),
                SEPARATOR,
                fmt.format_title(&title)
            ),
            action: Action::Open {
                path: PathBuf::from(&entry.fullpath),
                line: None,
            },
        }
    }

    /// Candidate that creates a note titled `title`. Empty input yields none.
    pub fn new_note(
        title: &str,
        memo_dir: &Path,
        fmt: &FormatContext,
    ) -> Option<Self> {
        if title.trim().is_empty() {
            return None;
        }
        Some(Self {
            abbr: format!("{}{}", fmt.format_prefix(NEW_TITLE_PREFIX), title),
            action: Action::New {
                memo_dir: memo_dir.to_path_buf(),
                title: title.to_string(),
            },
        })
    }

    pub fn from_hit(hit: &GrepHit, fmt: &FormatContext) -> Self {
        let location =
            format!("{}:{}:{}:", hit.path.display(), hit.line, hit.column);
        let text =
            fmt.highlight_range(&hit.text, hit.span.start, hit.span.end);
        Self {
            abbr: format!("{}{}", fmt.format_location(&location), text),
            action: Action::Open {
                path: hit.path.clone(),
                line: Some(hit.line),
            },
        }
    }

    /// One line of finder input: a hidden key, a tab, then the display text.
    pub fn fzf_line(&self, key: usize) -> String {
        format!("{key}\t{}", self.abbr)
    }
}

/// Recover the key from a line the finder echoed back.
pub fn parse_fzf_key(line: &str) -> Option<usize> {
    line.split('\t').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::width::WidthCache;

    fn entry(filename: &str, title: &str) -> MemoEntry {
        MemoEntry {
            fullpath: format!("/memo/{filename}"),
            filename: filename.to_string(),
            title: title.to_string(),
        }
    }

    fn layout(column: usize) -> ListLayout {
        ListLayout { column, ambiwidth: AmbiWidth::Single, title_width: None }
    }

    #[test]
    fn test_list_candidate() {
        let t = Truncator::new(WidthCache::new(), false);
        let fmt = FormatContext::new(false);
        let c = Candidate::from_entry(&entry("a.md", "Alpha"), &t, layout(8), &fmt);
        assert_eq!(c.abbr, "a.md    \u{a0}:\u{a0}Alpha");
        assert_eq!(
            c.action,
            Action::Open { path: PathBuf::from("/memo/a.md"), line: None }
        );

        let c = Candidate::from_entry(
            &entry("2024-01-01-long-name.md", "Long"),
            &t,
            layout(10),
            &fmt,
        );
        assert!(c.abbr.starts_with("2024-01...\u{a0}:"));
    }

    #[test]
    fn test_title_clipped_to_width() {
        let t = Truncator::new(WidthCache::new(), false);
        let fmt = FormatContext::new(false);
        let mut l = layout(6);
        l.title_width = Some(8);
        let c = Candidate::from_entry(&entry("a.md", "A rather long title"), &t, l, &fmt);
        assert_eq!(c.abbr, "a.md  \u{a0}:\u{a0}A rat...");

        let c = Candidate::from_entry(&entry("a.md", "short"), &t, l, &fmt);
        assert_eq!(c.abbr, "a.md  \u{a0}:\u{a0}short");
    }

    #[test]
    fn test_new_note_candidate() {
        let fmt = FormatContext::new(false);
        assert!(Candidate::new_note("", Path::new("/memo"), &fmt).is_none());
        assert!(Candidate::new_note("   ", Path::new("/memo"), &fmt).is_none());
        let c = Candidate::new_note("my idea", Path::new("/memo"), &fmt).unwrap();
        assert_eq!(c.abbr, "[new title] my idea");
        assert_eq!(
            c.action,
            Action::New { memo_dir: PathBuf::from("/memo"), title: "my idea".into() }
        );
    }

    #[test]
    fn test_grep_candidate() {
        let fmt = FormatContext::new(false);
        let hit = GrepHit {
            path: PathBuf::from("/memo/a.md"),
            line: 3,
            column: 5,
            text: "buy milk".to_string(),
            span: 4..8,
        };
        let c = Candidate::from_hit(&hit, &fmt);
        assert_eq!(c.abbr, "/memo/a.md:3:5:buy milk");
        assert_eq!(
            c.action,
            Action::Open { path: PathBuf::from("/memo/a.md"), line: Some(3) }
        );
    }

    #[test]
    fn test_fzf_key_round_trip() {
        let fmt = FormatContext::new(false);
        let c = Candidate::new_note("x", Path::new("/m"), &fmt).unwrap();
        assert_eq!(c.fzf_line(7), "7\t[new title] x");
        assert_eq!(parse_fzf_key(&c.fzf_line(7)), Some(7));
        assert_eq!(parse_fzf_key("nope"), None);
    }
}
