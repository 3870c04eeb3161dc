//! Embed markup rendering
//!
//! Stored embed codes are rendered as markup filtered through a short tag
//! allow-list. Tags outside the list are dropped while their text content is
//! kept. Allowed tags keep their attributes except event handlers (`on*`)
//! and values that open a script-capable URL scheme.
//!
//! Filtering repeats until the markup stops changing, so removing one tag
//! can never splice the pieces around it into a new one.

use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

/// Tags a rendered 500px embed may contain
pub const ALLOWED_TAGS: &[&str] = &["img", "p", "a", "div", "script"];

/// URL schemes that execute or inline content when followed
const BLOCKED_SCHEMES: &[&str] = &["javascript", "vbscript", "data"];

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)\s*([A-Za-z][A-Za-z0-9-]*)\b([^>]*)>").expect("tag pattern is valid")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\s/]+([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*("[^"]*"|'[^']*'|[^\s"'>]+))?"#)
        .expect("attribute pattern is valid")
});

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

/// One rendered field item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEmbed {
    /// Position of the item in the host field
    pub delta: usize,
    pub markup: String,
}

/// Renders stored embed codes with the allow-list applied
#[derive(Debug, Clone, Default)]
pub struct EmbedFormatter;

impl EmbedFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Renders one element per stored value, in order
    pub fn render(&self, items: &[String]) -> Vec<RenderedEmbed> {
        items
            .iter()
            .enumerate()
            .map(|(delta, item)| RenderedEmbed {
                delta,
                markup: filter_markup(item),
            })
            .collect()
    }

    pub fn allowed_tags(&self) -> &'static [&'static str] {
        ALLOWED_TAGS
    }
}

/// Removes comments and every tag not in [`ALLOWED_TAGS`]
pub fn filter_markup(markup: &str) -> String {
    let mut current = filter_pass(markup);
    // Each pass only shortens the markup, so this reaches a fixed point.
    loop {
        let next = filter_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn filter_pass(markup: &str) -> String {
    let without_comments = COMMENT.replace_all(markup, "");

    TAG.replace_all(&without_comments, |caps: &Captures<'_>| {
        let name = caps[2].to_ascii_lowercase();
        if ALLOWED_TAGS.contains(&name.as_str()) {
            format!("<{}{}{}>", &caps[1], &caps[2], safe_attributes(&caps[3]))
        } else {
            debug!(tag = %name, "Dropped disallowed tag");
            String::new()
        }
    })
    .into_owned()
}

/// Keeps the attribute text that is safe to render, verbatim
fn safe_attributes(attributes: &str) -> String {
    ATTRIBUTE
        .captures_iter(attributes)
        .filter(|caps| {
            let name = &caps[1];
            if name.len() >= 2 && name[..2].eq_ignore_ascii_case("on") {
                debug!(attribute = %name, "Dropped event handler attribute");
                return false;
            }
            match caps.get(2) {
                Some(value) if opens_blocked_scheme(value.as_str()) => {
                    debug!(attribute = %name, "Dropped attribute with blocked URL scheme");
                    false
                }
                _ => true,
            }
        })
        .map(|caps| caps[0].to_string())
        .collect()
}

/// Whether a raw attribute value starts with a blocked URL scheme
///
/// Browsers ignore whitespace and control characters inside a scheme, and a
/// character reference before the first `:` can spell one out, so both are
/// treated as blocked.
fn opens_blocked_scheme(raw_value: &str) -> bool {
    let normalized: String = raw_value
        .trim_matches(|c| c == '"' || c == '\'')
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    match normalized.split_once(':') {
        Some((scheme, _)) => scheme.contains('&') || BLOCKED_SCHEMES.contains(&scheme),
        None => false,
    }
}
