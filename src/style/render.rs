//! Directive-driven value rendering.
//!
//! A formatted value carries an optional directive string deciding how it
//! is rendered:
//!
//! - no directive: the value passes through unchanged
//! - `style-<tag>`: the value is wrapped in a style marker whose attribute
//!   sequence comes from the theme (`@{bold,fg:cyan value}`)
//! - `truncate-width:N[-prefix:N]`: the value is cut to fit and given a
//!   two-character `..` ellipsis
//! - anything else: a printf-style template applied with the locale

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::{StyleError, Theme};

/// Directive prefix selecting themed style wrapping.
pub const STYLE_PREFIX: &str = "style-";

/// Directive prefix selecting truncation.
pub const TRUNCATE_PREFIX: &str = "truncate-";

const ELLIPSIS: &str = "..";

// =============================================================================
// Locale
// =============================================================================

/// Number formatting conventions for format templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    /// Digit group separator for `%d`, if any.
    pub group_sep: Option<char>,
    /// Decimal separator (kept for parity with group_sep; `%d` never
    /// emits one).
    pub decimal_sep: char,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            group_sep: Some(','),
            decimal_sep: '.',
        }
    }
}

impl Locale {
    /// Locale that never groups digits.
    pub const fn plain() -> Self {
        Self {
            group_sep: None,
            decimal_sep: '.',
        }
    }
}

// =============================================================================
// Entry point
// =============================================================================

/// Render `value` according to an optional format directive.
///
/// Unknown style tags propagate as [`StyleError::UnknownTag`]; everything
/// else is infallible by construction.
pub fn render_value(
    theme: &Theme,
    value: &str,
    directive: Option<&str>,
    locale: &Locale,
) -> Result<String, StyleError> {
    let Some(directive) = directive.filter(|d| !d.trim().is_empty()) else {
        return Ok(value.to_string());
    };

    if let Some(tag) = directive.strip_prefix(STYLE_PREFIX) {
        let spec = theme.style(tag)?;
        return Ok(format!("@{{{} {}}}", spec, value));
    }

    if let Some(config) = directive.strip_prefix(TRUNCATE_PREFIX) {
        let (width, prefix) = parse_truncate_config(config);
        return Ok(truncate_value(value, width, prefix));
    }

    Ok(format_template(directive, value, locale))
}

// =============================================================================
// Truncation
// =============================================================================

fn parse_truncate_config(config: &str) -> (Option<usize>, usize) {
    let mut width = None;
    let mut prefix = 0;
    for segment in config.split('-') {
        if let Some((key, raw)) = segment.trim().split_once(':') {
            match key {
                "width" => width = raw.parse().ok(),
                "prefix" => prefix = raw.parse().unwrap_or(0),
                _ => {}
            }
        }
    }
    (width, prefix)
}

/// Truncate `value` to fit a column of `width` cells shared with a prefix
/// of `prefix` cells.
///
/// When the value plus prefix exceeds the width, the value is cut to
/// `width - prefix - 2` grapheme clusters and `..` is appended, so the
/// result occupies exactly `width - prefix` characters. A missing width
/// means "never truncate".
pub fn truncate_value(value: &str, width: Option<usize>, prefix: usize) -> String {
    let Some(width) = width else {
        return value.to_string();
    };
    let len = value.graphemes(true).count();
    if len + prefix <= width {
        return value.to_string();
    }
    let keep = width.saturating_sub(prefix).saturating_sub(ELLIPSIS.len());
    let mut result: String = value.graphemes(true).take(keep).collect();
    result.push_str(ELLIPSIS);
    result
}

/// Truncate text to fit within `max_width` terminal cells, breaking only
/// at grapheme boundaries and accounting for wide glyphs.
///
/// Returns the text unchanged when it already fits. Used by cells that
/// render a single line and must never wrap.
pub fn truncate_text(text: &str, max_width: usize, suffix: &str) -> String {
    if max_width == 0 {
        return String::new();
    }
    if text.width() <= max_width {
        return text.to_string();
    }

    let suffix_width = suffix.width();
    let target = max_width.saturating_sub(suffix_width);
    let mut result = String::with_capacity(text.len());
    let mut used = 0usize;
    for grapheme in text.graphemes(true) {
        let gw = grapheme.width();
        if used + gw > target {
            break;
        }
        result.push_str(grapheme);
        used += gw;
    }
    result.push_str(suffix);
    result
}

// =============================================================================
// Format templates
// =============================================================================

/// Apply a printf-style template to a single value.
///
/// Supported conversions: `%s` (string, with `-` left-align, width and
/// `.precision`), `%d` (integer with locale digit grouping) and `%%`.
/// A conversion the template parser does not understand is kept verbatim.
fn format_template(template: &str, value: &str, locale: &Locale) -> String {
    let mut out = String::with_capacity(template.len() + value.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let mut left_align = false;
        if chars.peek() == Some(&'-') {
            chars.next();
            left_align = true;
        }
        let mut width = 0usize;
        while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
            width = width * 10 + d as usize;
            chars.next();
        }
        let mut precision = None;
        if chars.peek() == Some(&'.') {
            chars.next();
            let mut p = 0usize;
            while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                p = p * 10 + d as usize;
                chars.next();
            }
            precision = Some(p);
        }

        match chars.next() {
            Some('s') => {
                let mut s: String = match precision {
                    Some(p) => value.graphemes(true).take(p).collect(),
                    None => value.to_string(),
                };
                s = pad(s, width, left_align);
                out.push_str(&s);
            }
            Some('d') => {
                let s = match value.trim().parse::<i128>() {
                    Ok(n) => group_digits(n, locale),
                    Err(_) => value.to_string(),
                };
                out.push_str(&pad(s, width, left_align));
            }
            Some(other) => {
                // unsupported conversion: keep it verbatim
                out.push('%');
                if left_align {
                    out.push('-');
                }
                if width > 0 {
                    out.push_str(&width.to_string());
                }
                if let Some(p) = precision {
                    out.push('.');
                    out.push_str(&p.to_string());
                }
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}

fn pad(s: String, width: usize, left_align: bool) -> String {
    let len = s.graphemes(true).count();
    if len >= width {
        return s;
    }
    let padding = " ".repeat(width - len);
    if left_align {
        format!("{s}{padding}")
    } else {
        format!("{padding}{s}")
    }
}

fn group_digits(n: i128, locale: &Locale) -> String {
    let raw = n.unsigned_abs().to_string();
    let grouped = match locale.group_sep {
        Some(sep) => {
            let digits: Vec<char> = raw.chars().collect();
            let mut out = String::with_capacity(raw.len() + raw.len() / 3);
            for (i, d) in digits.iter().enumerate() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    out.push(sep);
                }
                out.push(*d);
            }
            out
        }
        None => raw,
    };
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

// =============================================================================
// Tests
// =============================================================================
