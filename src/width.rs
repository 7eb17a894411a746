//! Display-width aware truncation for fixed-width candidate columns.
//!
//! Widths are measured per code point from the East Asian Width property
//! (UAX #11): `Fullwidth` and `Wide` take two terminal columns, `Ambiguous`
//! takes one or two depending on the [`AmbiWidth`] policy, everything else
//! takes one. Combining marks and grapheme clusters are not merged.

use std::collections::HashMap;
use std::sync::RwLock;
use unicode_normalization::UnicodeNormalization;
use unicode_width::UnicodeWidthChar;

const ELLIPSIS: &str = "...";
const WIDE_ELLIPSIS: &str = "....";

/// East Asian Width category of a code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EastAsianWidth {
    Neutral,
    Narrow,
    Wide,
    Fullwidth,
    Ambiguous,
    Halfwidth,
}

impl EastAsianWidth {
    pub fn of(ch: char) -> Self {
        let cp = ch as u32;
        if is_fullwidth_form(cp) {
            return Self::Fullwidth;
        }
        if is_halfwidth_form(cp) {
            return Self::Halfwidth;
        }
        // unicode-width reports these as zero columns, which hides the
        // category
        if is_wide_zero_width(cp) {
            return Self::Wide;
        }
        if is_ambiguous_zero_width(cp) {
            return Self::Ambiguous;
        }
        match (ch.width(), ch.width_cjk()) {
            (Some(2), _) => Self::Wide,
            (Some(n), Some(2)) if n < 2 => Self::Ambiguous,
            _ if is_narrow(cp) => Self::Narrow,
            _ => Self::Neutral,
        }
    }
}

fn is_fullwidth_form(cp: u32) -> bool {
    matches!(cp, 0x3000 | 0xFF01..=0xFF60 | 0xFFE0..=0xFFE6)
}

fn is_halfwidth_form(cp: u32) -> bool {
    matches!(cp, 0x20A9 | 0xFF61..=0xFFBE | 0xFFC2..=0xFFDC | 0xFFE8..=0xFFEE)
}

fn is_wide_zero_width(cp: u32) -> bool {
    matches!(cp, 0x302A..=0x302D | 0x3099..=0x309A)
}

fn is_ambiguous_zero_width(cp: u32) -> bool {
    matches!(
        cp,
        0x00AD | 0x0300..=0x036F | 0xFE00..=0xFE0F | 0xE0100..=0xE01EF
    )
}

fn is_narrow(cp: u32) -> bool {
    matches!(
        cp,
        0x20..=0x7E
            | 0xA2..=0xA3
            | 0xA5..=0xA6
            | 0xAC
            | 0xAF
            | 0x27E6..=0x27ED
            | 0x2985..=0x2986
    )
}

/// How characters of the `Ambiguous` category are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmbiWidth {
    /// One column, the usual setting outside CJK locales.
    #[default]
    Single,
    /// Two columns.
    Other,
}

impl AmbiWidth {
    /// Parse an editor-style `ambiwidth` value. Only `single` selects the
    /// one-column policy; any other value (usually `double`) counts two.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("single") {
            AmbiWidth::Single
        } else {
            AmbiWidth::Other
        }
    }

    fn counts_double(self, category: EastAsianWidth) -> bool {
        match category {
            EastAsianWidth::Fullwidth | EastAsianWidth::Wide => true,
            EastAsianWidth::Ambiguous => self == AmbiWidth::Other,
            _ => false,
        }
    }
}

/// Memo of East Asian Width lookups, keyed by code point.
///
/// Entries are never invalidated: the property is fixed for a given Unicode
/// version. Concurrent population only repeats work.
#[derive(Debug, Default)]
pub struct WidthCache {
    categories: RwLock<HashMap<char, EastAsianWidth>>,
}

impl WidthCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self, ch: char) -> EastAsianWidth {
        if let Ok(map) = self.categories.read() {
            if let Some(cat) = map.get(&ch) {
                return *cat;
            }
        }
        let cat = EastAsianWidth::of(ch);
        if let Ok(mut map) = self.categories.write() {
            map.insert(ch, cat);
        }
        cat
    }

    pub fn char_width(&self, ch: char, ambiwidth: AmbiWidth) -> usize {
        if ambiwidth.counts_double(self.category(ch)) { 2 } else { 1 }
    }

    pub fn str_width(&self, text: &str, ambiwidth: AmbiWidth) -> usize {
        text.chars().map(|c| self.char_width(c, ambiwidth)).sum()
    }

    pub fn len(&self) -> usize {
        self.categories.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Renders strings into a fixed number of terminal columns.
#[derive(Debug, Default)]
pub struct Truncator {
    cache: WidthCache,
    normalize_filenames: bool,
}

impl Truncator {
    pub fn new(cache: WidthCache, normalize_filenames: bool) -> Self {
        Self { cache, normalize_filenames }
    }

    pub fn cache(&self) -> &WidthCache {
        &self.cache
    }

    /// Pad `text` with spaces up to `col` columns, or cut it and append an
    /// ellipsis so that it fits.
    ///
    /// When the cut lands in the middle of a two-column character, a four
    /// dot ellipsis fills the gap. `col` must be at least 1; for `col < 3`
    /// the result is a bare `"..."` and is wider than requested.
    pub fn stdwidthpart(
        &self,
        text: &str,
        col: usize,
        ambiwidth: AmbiWidth,
    ) -> String {
        debug_assert!(col >= 1, "column width must be positive");
        let target: String = if self.normalize_filenames {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        let widths: Vec<(char, usize)> = target
            .chars()
            .map(|c| (c, self.cache.char_width(c, ambiwidth)))
            .collect();
        let total: usize = widths.iter().map(|(_, w)| w).sum();
        if total < col {
            let mut out = target;
            out.push_str(&" ".repeat(col - total));
            return out;
        }

        let limit = col as isize - 3;
        let mut result = String::new();
        let mut result_len: isize = 0;
        for (ch, w) in widths {
            let next_len = result_len + w as isize;
            if next_len > limit {
                let dots =
                    if result_len < limit { WIDE_ELLIPSIS } else { ELLIPSIS };
                result.push_str(dots);
                return result;
            }
            result.push(ch);
            if next_len == limit {
                result.push_str(ELLIPSIS);
                return result;
            }
            result_len = next_len;
        }
        result
    }
}
