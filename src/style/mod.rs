//! Style resolution.
//!
//! A [`Theme`] maps semantic style tags ("title", "highlight", ...) to
//! concrete render attributes. Themes are plain data constructed once at
//! startup and passed by reference into draw and resolve calls; there is
//! no global theme state.
//!
//! Unknown tags are an error, never a silent fallback - a missing tag
//! means the theme is misconfigured and hiding that helps nobody.

mod render;

pub use render::{render_value, truncate_text, truncate_value, Locale, STYLE_PREFIX, TRUNCATE_PREFIX};

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::types::{Attr, Rgba};

// =============================================================================
// Style tags
// =============================================================================

/// Well-known style tags used by the stock views.
pub mod tags {
    pub const TITLE: &str = "title";
    pub const TEXT: &str = "text";
    pub const BACKGROUND: &str = "background";
    pub const BORDER: &str = "border";
    pub const HIGHLIGHT: &str = "highlight";
    pub const ITEM_ENABLED: &str = "item-enabled";
    pub const ITEM_DISABLED: &str = "item-disabled";
}

// =============================================================================
// Errors
// =============================================================================

/// Errors surfaced by theme loading and style resolution.
#[derive(Debug, Error)]
pub enum StyleError {
    /// A tag was requested that the theme does not define.
    #[error("style tag not found: {0}")]
    UnknownTag(String),

    /// An attribute sequence could not be parsed.
    #[error("invalid style sequence '{sequence}': {reason}")]
    InvalidSequence { sequence: String, reason: String },

    /// A theme file could not be parsed.
    #[error("invalid theme file: {0}")]
    ThemeFile(String),
}

// =============================================================================
// StyleSpec - concrete render attributes
// =============================================================================

/// Concrete render attributes a style tag resolves to.
///
/// `None` colors mean "inherit whatever the surrounding cell uses".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleSpec {
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
    pub attrs: Attr,
}

impl StyleSpec {
    pub const fn new(fg: Option<Rgba>, bg: Option<Rgba>, attrs: Attr) -> Self {
        Self { fg, bg, attrs }
    }

    /// Parse an attribute sequence such as `bold,fg:cyan` or
    /// `underline,fg:#50fa7b,bg:default`.
    pub fn parse(sequence: &str) -> Result<Self, StyleError> {
        let mut spec = StyleSpec::default();
        for part in sequence.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some(color) = part.strip_prefix("fg:") {
                spec.fg = Some(Rgba::parse(color).ok_or_else(|| StyleError::InvalidSequence {
                    sequence: sequence.to_string(),
                    reason: format!("bad foreground color '{color}'"),
                })?);
            } else if let Some(color) = part.strip_prefix("bg:") {
                spec.bg = Some(Rgba::parse(color).ok_or_else(|| StyleError::InvalidSequence {
                    sequence: sequence.to_string(),
                    reason: format!("bad background color '{color}'"),
                })?);
            } else {
                spec.attrs |= match part {
                    "bold" => Attr::BOLD,
                    "dim" | "faint" => Attr::DIM,
                    "italic" => Attr::ITALIC,
                    "underline" => Attr::UNDERLINE,
                    "blink" => Attr::BLINK,
                    "inverse" => Attr::INVERSE,
                    "hidden" => Attr::HIDDEN,
                    "crossed-out" => Attr::STRIKETHROUGH,
                    _ => {
                        return Err(StyleError::InvalidSequence {
                            sequence: sequence.to_string(),
                            reason: format!("unknown attribute '{part}'"),
                        })
                    }
                };
            }
        }
        Ok(spec)
    }
}

fn color_token(color: &Rgba) -> String {
    if color.is_terminal_default() {
        "default".to_string()
    } else if color.is_ansi() {
        format!("ansi:{}", color.ansi_index())
    } else {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    }
}

impl fmt::Display for StyleSpec {
    /// Render the canonical attribute sequence, e.g. `bold,fg:ansi:6`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        for (flag, name) in [
            (Attr::BOLD, "bold"),
            (Attr::DIM, "dim"),
            (Attr::ITALIC, "italic"),
            (Attr::UNDERLINE, "underline"),
            (Attr::BLINK, "blink"),
            (Attr::INVERSE, "inverse"),
            (Attr::HIDDEN, "hidden"),
            (Attr::STRIKETHROUGH, "crossed-out"),
        ] {
            if self.attrs.contains(flag) {
                parts.push(name.to_string());
            }
        }
        if let Some(fg) = &self.fg {
            parts.push(format!("fg:{}", color_token(fg)));
        }
        if let Some(bg) = &self.bg {
            parts.push(format!("bg:{}", color_token(bg)));
        }
        write!(f, "{}", parts.join(","))
    }
}

// =============================================================================
// Theme
// =============================================================================

/// Mapping from style tag strings to render attributes.
///
/// Loaded once before the event loop starts and treated as immutable for
/// the loop's lifetime.
#[derive(Debug, Clone)]
pub struct Theme {
    name: String,
    styles: HashMap<String, StyleSpec>,
}

impl Theme {
    /// Create an empty theme.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            styles: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builder-style tag registration.
    pub fn with_style(mut self, tag: impl Into<String>, spec: StyleSpec) -> Self {
        self.styles.insert(tag.into(), spec);
        self
    }

    /// Register or replace a tag.
    pub fn insert(&mut self, tag: impl Into<String>, spec: StyleSpec) {
        self.styles.insert(tag.into(), spec);
    }

    /// Resolve a tag to its attributes.
    ///
    /// Unknown tags fail with [`StyleError::UnknownTag`].
    pub fn style(&self, tag: &str) -> Result<&StyleSpec, StyleError> {
        self.styles
            .get(tag)
            .ok_or_else(|| StyleError::UnknownTag(tag.to_string()))
    }

    /// Resolve a tag, falling back to an empty spec for the optional
    /// lookups used while drawing chrome the theme may not cover.
    pub fn style_or_default(&self, tag: &str) -> StyleSpec {
        self.styles.get(tag).copied().unwrap_or_default()
    }

    /// Load a theme from a TOML document with a `[styles]` table of
    /// attribute sequences:
    ///
    /// ```toml
    /// name = "dusk"
    ///
    /// [styles]
    /// title = "bold,fg:bright-white"
    /// highlight = "inverse"
    /// ```
    pub fn from_toml(input: &str) -> Result<Self, StyleError> {
        #[derive(Deserialize)]
        struct ThemeFile {
            name: String,
            #[serde(default)]
            styles: HashMap<String, String>,
        }

        let file: ThemeFile =
            toml::from_str(input).map_err(|e| StyleError::ThemeFile(e.to_string()))?;
        let mut theme = Theme::new(file.name);
        for (tag, sequence) in file.styles {
            theme.insert(tag, StyleSpec::parse(&sequence)?);
        }
        Ok(theme)
    }
}

/// Theme built on the terminal's own palette; works everywhere.
pub fn default_theme() -> Theme {
    Theme::new("default")
        .with_style(tags::TITLE, StyleSpec::new(None, None, Attr::BOLD))
        .with_style(tags::TEXT, StyleSpec::default())
        .with_style(tags::BACKGROUND, StyleSpec::default())
        .with_style(tags::BORDER, StyleSpec::default())
        .with_style(tags::HIGHLIGHT, StyleSpec::new(None, None, Attr::INVERSE))
        .with_style(tags::ITEM_ENABLED, StyleSpec::default())
        .with_style(
            tags::ITEM_DISABLED,
            StyleSpec::new(None, None, Attr::DIM),
        )
}

/// Dark preset with explicit RGB colors.
pub fn dark() -> Theme {
    Theme::new("dark")
        .with_style(
            tags::TITLE,
            StyleSpec::new(Some(Rgba::from_rgb_int(0xf8f8f2)), None, Attr::BOLD),
        )
        .with_style(
            tags::TEXT,
            StyleSpec::new(Some(Rgba::from_rgb_int(0xd8d8d2)), None, Attr::NONE),
        )
        .with_style(
            tags::BACKGROUND,
            StyleSpec::new(None, Some(Rgba::from_rgb_int(0x282a36)), Attr::NONE),
        )
        .with_style(
            tags::BORDER,
            StyleSpec::new(Some(Rgba::from_rgb_int(0x6272a4)), None, Attr::NONE),
        )
        .with_style(
            tags::HIGHLIGHT,
            StyleSpec::new(None, Some(Rgba::from_rgb_int(0x44475a)), Attr::BOLD),
        )
        .with_style(
            tags::ITEM_ENABLED,
            StyleSpec::new(Some(Rgba::from_rgb_int(0xd8d8d2)), None, Attr::NONE),
        )
        .with_style(
            tags::ITEM_DISABLED,
            StyleSpec::new(Some(Rgba::from_rgb_int(0x6272a4)), None, Attr::DIM),
        )
}

// =============================================================================
// Tests
// =============================================================================
