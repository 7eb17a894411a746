use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

fn invalid_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"[ <>:"/\\|?*%#]"#).expect("valid title regex")
    })
}

fn repeated_dashes() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"--+").expect("valid dash regex"))
}

/// Turn a free-form title into something safe for a file name.
pub fn escape_title(title: &str) -> String {
    let replaced = invalid_chars().replace_all(title, "-");
    let collapsed = repeated_dashes().replace_all(&replaced, "-");
    collapsed.trim_matches(|c| c == '-' || c == ' ').to_string()
}

pub fn note_file_name(date: NaiveDate, title: &str) -> String {
    format!("{}-{}.md", date.format("%Y-%m-%d"), escape_title(title))
}

pub fn new_note_path(memo_dir: &Path, date: NaiveDate, title: &str) -> PathBuf {
    memo_dir.join(note_file_name(date, title))
}

/// Express `path` relative to `cwd` when it lives below it.
pub fn display_path(path: &Path, cwd: &Path) -> PathBuf {
    path.strip_prefix(cwd)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

/// Put a `# title` heading on the first line of a note whose first line is
/// empty (or which does not exist yet). Returns whether the file was written.
pub fn ensure_heading(path: &Path, title: &str) -> io::Result<bool> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err),
    };
    if !existing.lines().next().unwrap_or("").is_empty() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, format!("# {title}\n{existing}"))?;
    Ok(true)
}

/// Open `path` in the editor, optionally jumping to a line.
pub fn open_in_editor(
    editor: &str,
    path: &Path,
    line: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut parts = editor.split_whitespace();
    let program = parts.next().ok_or("EDITOR is empty")?;
    let mut cmd = Command::new(program);
    cmd.args(parts);
    if let Some(line) = line {
        cmd.arg(format!("+{line}"));
    }
    let status = cmd
        .arg(path)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;
    if !status.success() {
        return Err("Editor exited with non-zero status".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_escape_title() {
        assert_eq!(escape_title("hello world"), "hello-world");
        assert_eq!(escape_title("a/b\\c:d"), "a-b-c-d");
        assert_eq!(escape_title("  #tag  note?? "), "tag-note");
        assert_eq!(escape_title("what <is> 100%"), "what-is-100");
        assert_eq!(escape_title("日本語 メモ"), "日本語-メモ");
        assert_eq!(escape_title("---"), "");
    }

    #[test]
    fn test_note_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            note_file_name(date, "Weekly sync: notes"),
            "2024-03-09-Weekly-sync-notes.md"
        );
        assert_eq!(
            new_note_path(Path::new("/memo"), date, "x"),
            PathBuf::from("/memo/2024-03-09-x.md")
        );
    }

    #[test]
    fn test_display_path() {
        let cwd = Path::new("/home/me/memo");
        assert_eq!(
            display_path(Path::new("/home/me/memo/a.md"), cwd),
            PathBuf::from("a.md")
        );
        assert_eq!(
            display_path(Path::new("/elsewhere/a.md"), cwd),
            PathBuf::from("/elsewhere/a.md")
        );
        assert_eq!(display_path(cwd, cwd), PathBuf::from("/home/me/memo"));
    }

    #[test]
    fn test_ensure_heading() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("2024-01-01-new.md");
        assert!(ensure_heading(&path, "new note").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# new note\n");
        assert!(!ensure_heading(&path, "other").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# new note\n");

        let blank_first = temp.path().join("blank.md");
        fs::write(&blank_first, "\nbody\n").unwrap();
        assert!(ensure_heading(&blank_first, "t").unwrap());
        assert_eq!(fs::read_to_string(&blank_first).unwrap(), "# t\n\nbody\n");
    }
}
