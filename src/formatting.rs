use yansi::Paint;

/// Color palette for candidate lines
pub struct ColorPalette {
    pub file: (u8, u8, u8),      // Filename column
    pub title: (u8, u8, u8),     // Note titles
    pub prefix: (u8, u8, u8),    // `[new title]` marker
    pub location: (u8, u8, u8),  // Grep line:col
    pub highlight: (u8, u8, u8), // Grep matches
}

impl ColorPalette {
    pub const CATPPUCCIN: Self = Self {
        file: (166, 227, 161),     // Green
        title: (137, 180, 250),    // Blue
        prefix: (249, 226, 175),   // Yellow
        location: (108, 112, 134), // Gray
        highlight: (243, 139, 168), // Pink
    };
}

/// Formatting context passed through candidate rendering
pub struct FormatContext {
    pub use_color: bool,
    pub palette: ColorPalette,
}

impl FormatContext {
    pub fn new(use_color: bool) -> Self {
        Self { use_color, palette: ColorPalette::CATPPUCCIN }
    }

    fn paint(&self, text: &str, rgb: (u8, u8, u8)) -> String {
        if self.use_color {
            let (r, g, b) = rgb;
            Paint::rgb(text, r, g, b).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn format_file(&self, file: &str) -> String {
        self.paint(file, self.palette.file)
    }

    pub fn format_title(&self, title: &str) -> String {
        self.paint(title, self.palette.title)
    }

    pub fn format_prefix(&self, prefix: &str) -> String {
        if self.use_color {
            let (r, g, b) = self.palette.prefix;
            Paint::rgb(prefix, r, g, b).bold().to_string()
        } else {
            prefix.to_string()
        }
    }

    pub fn format_location(&self, location: &str) -> String {
        self.paint(location, self.palette.location)
    }

    /// Color the byte range `start..end` of `text`.
    pub fn highlight_range(&self, text: &str, start: usize, end: usize) -> String {
        if !self.use_color
            || start >= end
            || end > text.len()
            || !text.is_char_boundary(start)
            || !text.is_char_boundary(end)
        {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len() + 16);
        out.push_str(&text[..start]);
        out.push_str(&self.paint(&text[start..end], self.palette.highlight));
        out.push_str(&text[end..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_context_no_color() {
        let ctx = FormatContext::new(false);
        assert_eq!(ctx.format_file("a.md"), "a.md");
        assert_eq!(ctx.format_title("Title"), "Title");
        assert_eq!(ctx.format_prefix("[new title] "), "[new title] ");
        assert_eq!(ctx.highlight_range("buy milk", 4, 8), "buy milk");
    }

    #[test]
    fn test_format_context_with_color() {
        let ctx = FormatContext::new(true);
        let file = ctx.format_file("a.md");
        assert!(file.contains("a.md"));
        assert!(file.len() > "a.md".len()); // Has ANSI codes

        let hl = ctx.highlight_range("buy milk", 4, 8);
        assert!(hl.starts_with("buy "));
        assert!(hl.contains("milk"));
        assert!(hl.len() > "buy milk".len());
    }

    #[test]
    fn test_highlight_range_out_of_bounds() {
        let ctx = FormatContext::new(true);
        assert_eq!(ctx.highlight_range("abc", 2, 10), "abc");
        assert_eq!(ctx.highlight_range("日本", 1, 3), "日本");
    }
}
