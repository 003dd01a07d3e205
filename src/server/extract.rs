use serde::Deserialize;
use serde_json::{Map, Value};

// ── Embedded JSON extraction ──────────────────────────────────────────────────

/// Returns the first balanced JSON object following `marker`, or `None` when
/// the marker is absent, no `{` follows it, or the braces never close.
///
/// Single forward pass tracking brace depth; quoted strings are honoured so
/// braces inside string values do not affect the depth.
pub fn extract_json_object<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let marker_at = text.find(marker)?;
    let start = marker_at + text[marker_at..].find('{')?;

    let mut depth = 0u32;
    let mut in_string = false;
    let mut escape = false;

    for (i, &b) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            if escape {
                escape = false;
            } else if b == b'\\' {
                escape = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + i]);
                }
            }
            _ => {}
        }
    }

    None
}

// ── Deep structure search ─────────────────────────────────────────────────────

/// Depth-first search for the first non-null value stored under `key`.
/// A key on the current object wins over any deeper occurrence; siblings are
/// visited in the map's iteration order, so results are stable for a fixed
/// input.
pub fn find_by_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => {
            if let Some(v) = map.get(key) {
                if !v.is_null() {
                    return Some(v);
                }
            }
            map.values().find_map(|v| find_by_key(v, key))
        }
        Value::Array(items) => items.iter().find_map(|v| find_by_key(v, key)),
        _ => None,
    }
}

/// Locates the about-tab metadata block: the first object carrying
/// `viewCountText` alongside one of its companion keys. The companions keep
/// a stray `viewCountText` elsewhere in the tree from matching.
pub fn find_about_meta(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(map) => {
            if map.contains_key("viewCountText")
                && (map.contains_key("joinedDateText")
                    || map.contains_key("country")
                    || map.contains_key("canonicalChannelUrl"))
            {
                return Some(map);
            }
            map.values().find_map(find_about_meta)
        }
        Value::Array(items) => items.iter().find_map(find_about_meta),
        _ => None,
    }
}

// ── Display nodes ─────────────────────────────────────────────────────────────

/// The three shapes a textual display value takes inside `ytInitialData`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DisplayNode {
    Plain(String),
    Simple {
        #[serde(rename = "simpleText")]
        simple_text: String,
    },
    Runs { runs: Vec<Run> },
}

#[derive(Debug, Deserialize)]
pub struct Run {
    #[serde(default)]
    pub text: String,
}

impl DisplayNode {
    pub fn text(&self) -> String {
        match self {
            DisplayNode::Plain(s) => s.clone(),
            DisplayNode::Simple { simple_text } => simple_text.clone(),
            DisplayNode::Runs { runs } => runs.iter().map(|r| r.text.as_str()).collect(),
        }
    }
}

/// Converts a display node into plain text; `None` when the value matches
/// none of the three shapes.
pub fn display_text(value: &Value) -> Option<String> {
    serde_json::from_value::<DisplayNode>(value.clone())
        .ok()
        .map(|node| node.text())
}

// ── Locale count parsing ──────────────────────────────────────────────────────

/// Parses a display count ("1,234", "12.3万", "1.5億", "2.1M") into an
/// integer. Magnitude markers win over the plain-digit fallback; fractional
/// prefixes round to the nearest integer.
pub fn parse_count(text: &str) -> Option<u64> {
    let cleaned = text.replace(',', "");
    let cleaned = cleaned.trim();

    if let Some(idx) = cleaned.find('億') {
        return scaled(&cleaned[..idx], 100_000_000.0);
    }
    if let Some(idx) = cleaned.find('万') {
        return scaled(&cleaned[..idx], 10_000.0);
    }

    for (markers, factor) in [
        (['K', 'k'], 1_000.0),
        (['M', 'm'], 1_000_000.0),
        (['B', 'b'], 1_000_000_000.0),
    ] {
        if let Some(idx) = suffix_position(cleaned, markers) {
            return scaled(&cleaned[..idx], factor);
        }
    }

    let digits: String = cleaned.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn scaled(prefix: &str, factor: f64) -> Option<u64> {
    last_number(prefix).map(|n| (n * factor).round() as u64)
}

/// First marker position that directly follows a number. Requiring the digit
/// keeps words like "subscribers" from reading as a B suffix.
fn suffix_position(s: &str, markers: [char; 2]) -> Option<usize> {
    let mut prev: Option<char> = None;
    for (i, c) in s.char_indices() {
        if markers.contains(&c) && matches!(prev, Some(p) if p.is_ascii_digit() || p == '.') {
            return Some(i);
        }
        prev = Some(c);
    }
    None
}

/// Last decimal number in `s`, so localized labels ahead of the figure do
/// not defeat parsing ("チャンネル登録者数 36.9" -> 36.9).
fn last_number(s: &str) -> Option<f64> {
    let mut best = None;
    let mut start = None;
    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() || c == '.' {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(from) = start.take() {
            best = Some(&s[from..i]);
        }
    }
    if let Some(from) = start {
        best = Some(&s[from..]);
    }
    best.and_then(|run| run.parse().ok())
}
