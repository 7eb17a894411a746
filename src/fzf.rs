use crate::candidate::{Candidate, parse_fzf_key};
use std::error::Error;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

/// What the user picked, plus the query they typed when asked for it.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub query: Option<String>,
    pub indices: Vec<usize>,
}

pub struct FzfSelector {
    multi_select: bool,
    print_query: bool,
    height: Option<String>,
    layout: Option<String>,
    prompt: Option<String>,
}

impl FzfSelector {
    pub fn new() -> Self {
        Self {
            multi_select: false,
            print_query: false,
            height: None,
            layout: None,
            prompt: None,
        }
    }

    /// Selector used for note lists: reversed layout, partial height.
    pub fn for_notes() -> Self {
        Self::new().height("60%").layout("reverse").prompt("memo> ")
    }

    pub fn multi_select(mut self, enabled: bool) -> Self {
        self.multi_select = enabled;
        self
    }

    pub fn print_query(mut self, enabled: bool) -> Self {
        self.print_query = enabled;
        self
    }

    pub fn height(mut self, height: &str) -> Self {
        self.height = Some(height.to_string());
        self
    }

    pub fn layout(mut self, layout: &str) -> Self {
        self.layout = Some(layout.to_string());
        self
    }

    pub fn prompt(mut self, prompt: &str) -> Self {
        self.prompt = Some(prompt.to_string());
        self
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "--ansi".to_string(),
            "--delimiter".to_string(),
            "\t".to_string(),
            "--with-nth".to_string(),
            "2..".to_string(),
        ];
        if self.multi_select {
            args.push("--multi".to_string());
        }
        if self.print_query {
            args.push("--print-query".to_string());
        }
        if let Some(ref height) = self.height {
            args.push("--height".to_string());
            args.push(height.clone());
        }
        if let Some(ref layout) = self.layout {
            args.push("--layout".to_string());
            args.push(layout.clone());
        }
        if let Some(ref prompt) = self.prompt {
            args.push("--prompt".to_string());
            args.push(prompt.clone());
        }
        args
    }

    /// Run fzf over the candidates and return the picked indices.
    pub fn select(
        &self,
        candidates: &[Candidate],
    ) -> Result<Selection, Box<dyn Error>> {
        if !is_fzf_available() {
            return Err("fzf is not installed".into());
        }

        let input = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| c.fzf_line(i))
            .collect::<Vec<_>>()
            .join("\n");

        let mut child = Command::new("fzf")
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        // fzf exits 1 when nothing matched, which still carries the query
        let no_match = output.status.code() == Some(1);
        if !output.status.success() && !(self.print_query && no_match) {
            return Ok(Selection::default()); // User cancelled
        }
        Ok(self.parse_output(&stdout))
    }

    fn parse_output(&self, stdout: &str) -> Selection {
        let mut lines = stdout.lines();
        let query = if self.print_query {
            lines.next().map(|q| q.to_string())
        } else {
            None
        };
        Selection { query, indices: lines.filter_map(parse_fzf_key).collect() }
    }
}

impl Default for FzfSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if fzf is available
pub fn is_fzf_available() -> bool {
    static FZF_AVAILABLE: OnceLock<bool> = OnceLock::new();
    *FZF_AVAILABLE.get_or_init(|| {
        Command::new("fzf")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fzf_selector_builder() {
        let selector = FzfSelector::new()
            .multi_select(true)
            .height("50%")
            .layout("reverse");

        assert!(selector.multi_select);
        assert_eq!(selector.height.as_deref(), Some("50%"));
        assert_eq!(selector.layout.as_deref(), Some("reverse"));
    }

    #[test]
    fn test_args_hide_key_column() {
        let args = FzfSelector::for_notes().print_query(true).args();
        assert_eq!(&args[..5], &["--ansi", "--delimiter", "\t", "--with-nth", "2.."]);
        assert!(args.contains(&"--print-query".to_string()));
        assert!(args.contains(&"memo> ".to_string()));
        assert!(!args.contains(&"--multi".to_string()));
    }

    #[test]
    fn test_parse_output() {
        let selector = FzfSelector::new().print_query(true);
        let sel = selector.parse_output("new idea\n3\tfoo\n5\tbar\n");
        assert_eq!(sel.query.as_deref(), Some("new idea"));
        assert_eq!(sel.indices, vec![3, 5]);

        let sel = selector.parse_output("only query\n");
        assert_eq!(sel.query.as_deref(), Some("only query"));
        assert!(sel.indices.is_empty());

        let sel = FzfSelector::new().parse_output("2\tx\n");
        assert_eq!(sel, Selection { query: None, indices: vec![2] });
    }
}
