use crate::config::parse_column;
use crate::width::AmbiWidth;
use std::error::Error;

pub struct ArgParser {
    iter: std::vec::IntoIter<String>,
    command_name: String,
}

impl ArgParser {
    pub fn new(args: Vec<String>, command_name: &str) -> Self {
        Self { iter: args.into_iter(), command_name: command_name.to_string() }
    }

    /// Extract a string value for a flag
    pub fn extract_value(
        &mut self,
        flag: &str,
    ) -> Result<String, Box<dyn Error>> {
        self.iter.next().ok_or_else(|| {
            format!("Provide a value after {} for {}", flag, self.command_name)
                .into()
        })
    }

    /// Get next positional argument
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<String> {
        self.iter.next()
    }

    /// Collect remaining args
    pub fn collect_remaining(self) -> Vec<String> {
        self.iter.collect()
    }
}

/// Flags shared by the commands that render candidates
#[derive(Default, Debug)]
pub struct CommonFlags {
    pub column: Option<usize>,
    pub ambiwidth: Option<AmbiWidth>,
    pub plain: bool,
    pub fzf_lines: bool,
    pub new_note: bool,
    pub positional: Vec<String>,
}

impl CommonFlags {
    pub fn parse(
        args: Vec<String>,
        command_name: &str,
    ) -> Result<Self, Box<dyn Error>> {
        let mut flags = CommonFlags::default();
        let mut parser = ArgParser::new(args, command_name);
        while let Some(arg) = parser.next() {
            match arg.as_str() {
                "-c" | "--column" => {
                    let v = parser.extract_value(&arg)?;
                    flags.column = Some(parse_column(&v)?);
                }
                "-a" | "--ambiwidth" => {
                    let v = parser.extract_value(&arg)?;
                    flags.ambiwidth = Some(AmbiWidth::parse(&v));
                }
                "--plain" => flags.plain = true,
                "--fzf-lines" => flags.fzf_lines = true,
                "-n" | "--new" => flags.new_note = true,
                "--" => {
                    flags.positional.extend(parser.collect_remaining());
                    break;
                }
                other if other.starts_with('-') && other.len() > 1 => {
                    return Err(format!(
                        "Unknown flag for {command_name}: {other}"
                    )
                    .into());
                }
                _ => flags.positional.push(arg),
            }
        }
        Ok(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_arg_parser_extract_value() {
        let args = strings(&["--column", "30"]);
        let mut parser = ArgParser::new(args, "test");
        let flag = parser.next().unwrap();
        assert_eq!(flag, "--column");
        let value = parser.extract_value("--column").unwrap();
        assert_eq!(value, "30");
        assert!(parser.extract_value("--column").is_err());
    }

    #[test]
    fn test_arg_parser_collect_remaining() {
        let parser = ArgParser::new(strings(&["a", "b", "c"]), "test");
        assert_eq!(parser.collect_remaining(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_common_flags() {
        let flags = CommonFlags::parse(
            strings(&["-c", "12", "--ambiwidth", "double", "--plain", "x"]),
            "list",
        )
        .unwrap();
        assert_eq!(flags.column, Some(12));
        assert_eq!(flags.ambiwidth, Some(AmbiWidth::Other));
        assert!(flags.plain);
        assert!(!flags.fzf_lines);
        assert_eq!(flags.positional, vec!["x"]);
    }

    #[test]
    fn test_common_flags_errors_and_passthrough() {
        assert!(CommonFlags::parse(strings(&["--bogus"]), "list").is_err());
        assert!(CommonFlags::parse(strings(&["-c", "0"]), "list").is_err());
        assert!(CommonFlags::parse(strings(&["-c"]), "list").is_err());

        let flags =
            CommonFlags::parse(strings(&["--", "-x", "--plain"]), "grep")
                .unwrap();
        assert!(!flags.plain);
        assert_eq!(flags.positional, vec!["-x", "--plain"]);

        let flags = CommonFlags::parse(strings(&["-"]), "new").unwrap();
        assert_eq!(flags.positional, vec!["-"]);
    }
}
