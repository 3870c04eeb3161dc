//! Embed Code Matching
//!
//! Recognises 500px embed markup pasted by editors and extracts the photo
//! identifier from it.
//!
//! ## Overview
//!
//! An [`EmbedMatcher`] holds an ordered list of labelled [`EmbedPattern`]s.
//! Line breaks are stripped from the input, then patterns are tried in order
//! and the first one that matches wins. The 500px matcher currently knows a
//! single pattern, labelled `shortcode`.
//!
//! ## Usage
//!
//! ```
//! use core_media::embed::EmbedMatcher;
//!
//! let embed = "<div class='pixels-photo'><p><img src='https://drscdn.500px.org/photo/12345/m%3D2000/v2?sig=abc' alt='x'></p><a href='https://500px.com/photo/12345/foo' alt='y'></a></div><script type='text/javascript' src='https://500px.com/embed.js'></script>";
//!
//! let matched = EmbedMatcher::default().match_embed(embed).unwrap();
//! assert_eq!(matched.id.as_deref(), Some("12345"));
//! assert_eq!(matched.pattern, "shortcode");
//! ```

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Label of the 500px embed pattern
pub const SHORTCODE_LABEL: &str = "shortcode";

const D500PX_EMBED_PATTERN: &str = concat!(
    r"(?i)(?P<shortcode><div class='pixels-photo'>(?-u:\s)*<p>(?-u:\s)*",
    r"<img src='https://drscdn\.500px\.org/photo/(?P<id>[0-9]+)/.*/(?-u:\w)+(\?[^']*)?' alt='(.*)'>",
    r"(?-u:\s)*</p>(?-u:\s)*",
    r"<a href='https://500px\.com/photo/[0-9]+/(?-u:[\w-])+' alt='(.*)'></a>",
    r"(?-u:\s)*</div>",
    r"<script type='text/javascript' src='https://500px\.com/embed\.js'></script>)",
);

static D500PX_PATTERNS: LazyLock<Vec<EmbedPattern>> = LazyLock::new(|| {
    vec![EmbedPattern {
        label: SHORTCODE_LABEL,
        regex: Regex::new(D500PX_EMBED_PATTERN).expect("500px embed pattern is valid"),
    }]
});

/// A labelled embed pattern
///
/// The regex may define `shortcode` and `id` named groups. Without a
/// `shortcode` group the whole match is used as the shortcode.
#[derive(Debug, Clone)]
pub struct EmbedPattern {
    pub label: &'static str,
    pub regex: Regex,
}

impl EmbedPattern {
    pub fn new(label: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            label,
            regex: Regex::new(pattern)?,
        })
    }
}

/// Outcome of a successful match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// The matched embed block as a whole
    pub shortcode: String,
    /// Photo identifier, when the pattern captured one
    pub id: Option<String>,
    /// Label of the pattern that matched
    pub pattern: &'static str,
}

/// Ordered, first-match-wins embed recognizer
#[derive(Debug, Clone)]
pub struct EmbedMatcher {
    patterns: Vec<EmbedPattern>,
}

impl Default for EmbedMatcher {
    fn default() -> Self {
        Self {
            patterns: D500PX_PATTERNS.clone(),
        }
    }
}

impl EmbedMatcher {
    /// Matcher over a custom pattern list, evaluated in the given order
    pub fn with_patterns(patterns: Vec<EmbedPattern>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[EmbedPattern] {
        &self.patterns
    }

    /// Matches `text` against the pattern list
    ///
    /// Carriage returns and newlines are removed before matching, so a block
    /// pasted across several lines is still recognised.
    pub fn match_embed(&self, text: &str) -> Option<MatchResult> {
        let text = strip_line_breaks(text);

        self.patterns.iter().find_map(|pattern| {
            let captures = pattern.regex.captures(&text)?;
            let shortcode = captures
                .name("shortcode")
                .or_else(|| captures.get(0))?
                .as_str()
                .to_string();
            let id = captures.name("id").map(|id| id.as_str().to_string());

            Some(MatchResult {
                shortcode,
                id,
                pattern: pattern.label,
            })
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.match_embed(text).is_some()
    }
}

/// Removes every `\r` and `\n`
pub fn strip_line_breaks(text: &str) -> Cow<'_, str> {
    if text.contains(['\r', '\n']) {
        Cow::Owned(text.chars().filter(|c| *c != '\r' && *c != '\n').collect())
    } else {
        Cow::Borrowed(text)
    }
}
