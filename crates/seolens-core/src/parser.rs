//! Page source parsing: content metrics and head metadata

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{Result, SeoError};
use crate::types::{ContentMetrics, PageHead};

static RE_TAG_BLOCKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?is)<script[^>]*?>[\s\S]*?</script>",
        r"(?is)<style[^>]*?>[\s\S]*?</style>",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("invalid block regex"))
    .collect()
});
static RE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("invalid comment regex"));
static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("invalid tag regex"));
static RE_H1: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h1[^>]*>.*?</h1>").expect("invalid h1 regex"));

static RE_METADATA_EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"export\s+(?:const|let|var)\s+metadata\b[^=]*=\s*")
        .expect("invalid metadata regex")
});

static SEL_TITLE: Lazy<Selector> = Lazy::new(|| parse_selector("title"));
static SEL_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| parse_selector(r#"meta[name="description"]"#));

fn parse_selector(selector: &str) -> Selector {
    Selector::parse(selector).expect("invalid head selector")
}

/// Remove script blocks, style blocks and comments from markup
pub fn sanitize_html(html: &str) -> String {
    let mut clean = html.to_string();
    for re in RE_TAG_BLOCKS.iter() {
        clean = re.replace_all(&clean, "").into_owned();
    }

    RE_COMMENT.replace_all(&clean, "").into_owned()
}

/// Plain-text projection of markup: sanitized, every tag replaced by a space
pub fn plain_text(html: &str) -> String {
    let sanitized = sanitize_html(html);
    RE_TAG.replace_all(&sanitized, " ").into_owned()
}

/// Compute structural content metrics from a page's raw source text
pub fn extract_metrics(raw: &str) -> ContentMetrics {
    let text = plain_text(raw);
    let word_count = text.split_whitespace().count();

    let raw_len = raw.chars().count();
    let text_to_markup_ratio = if raw_len > 0 {
        text.chars().count() as f64 / raw_len as f64
    } else {
        0.0
    };

    // Counted on the raw source, like a crawler scanning for the tag
    let h1_count = RE_H1.find_iter(raw).count();

    ContentMetrics {
        h1_count,
        word_count,
        text_to_markup_ratio,
        has_valid_heading_hierarchy: h1_count == 1,
        keywords: Vec::new(),
    }
}

/// Read a page source file and compute its content metrics
pub fn extract_metrics_from_file(path: &Path) -> Result<ContentMetrics> {
    let raw = fs::read_to_string(path).map_err(|source| SeoError::io(path, source))?;
    Ok(extract_metrics(&raw))
}

/// Extract head metadata declared by a page source.
///
/// Markup elements win; JSX expression values (`{...}`) are not literal
/// metadata and are ignored. Title and description fall back to top-level
/// string literals of an exported `metadata` object.
pub fn extract_head(raw: &str) -> PageHead {
    let document = Html::parse_document(raw);

    let title = document
        .select(&SEL_TITLE)
        .map(|element| element.text().collect::<String>())
        .find_map(|text| literal(&text));
    let description = document
        .select(&SEL_DESCRIPTION)
        .filter_map(|element| element.value().attr("content"))
        .find_map(literal);

    let metadata = metadata_object(raw);
    PageHead {
        title: title.or_else(|| metadata.and_then(|body| metadata_field(body, "title"))),
        description: description
            .or_else(|| metadata.and_then(|body| metadata_field(body, "description"))),
    }
}

fn literal(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.starts_with('{') {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Body of the object literal assigned to the exported `metadata`
fn metadata_object(raw: &str) -> Option<&str> {
    let export = RE_METADATA_EXPORT.find(raw)?;
    object_body(&raw[export.end()..])
}

/// Characters outside string literals and line comments, with byte offsets
fn code_chars(source: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut quote = None;
    let mut escaped = false;
    let mut comment = false;
    let mut prev = None;
    source.char_indices().filter(move |&(_, ch)| {
        let after_slash = prev == Some('/');
        prev = Some(ch);
        if comment {
            comment = ch != '\n';
            return false;
        }
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == open {
                quote = None;
            }
            return false;
        }
        match ch {
            '"' | '\'' | '`' => {
                quote = Some(ch);
                false
            }
            '/' if after_slash => {
                comment = true;
                prev = None;
                false
            }
            _ => true,
        }
    })
}

/// Contents between a leading `{` and its matching `}`
fn object_body(source: &str) -> Option<&str> {
    if !source.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    for (i, ch) in code_chars(source) {
        match ch {
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&source[1..i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split an object body at its top-level commas
fn top_level_entries(body: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in code_chars(body) {
        match ch {
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                entries.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&body[start..]);
    entries
}

/// Literal value of a top-level `key:` entry.
///
/// A nested `{ default: ... }` object, as used for title templates, yields
/// its `default` literal.
fn metadata_field(body: &str, key: &str) -> Option<String> {
    top_level_entries(body).into_iter().find_map(|entry| {
        let entry = entry
            .lines()
            .filter(|line| !line.trim_start().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        let (name, value) = entry.split_once(':')?;
        if name.trim().trim_matches(['"', '\'']) != key {
            return None;
        }

        let value = value.trim();
        match object_body(value) {
            Some(nested) => metadata_field(nested, "default"),
            None => string_literal(value),
        }
    })
}

/// Text of a leading quoted string; template literals with `${}` don't count
fn string_literal(value: &str) -> Option<String> {
    let open = value.chars().next().filter(|c| matches!(c, '"' | '\'' | '`'))?;
    let mut escaped = false;
    let (end, _) = value.char_indices().skip(1).find(|&(_, ch)| {
        let closes = !escaped && ch == open;
        escaped = !escaped && ch == '\\';
        closes
    })?;

    let text = &value[1..end];
    if open == '`' && text.contains("${") {
        return None;
    }
    literal(text)
}
