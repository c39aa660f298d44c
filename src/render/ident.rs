//! GraphQL names → Rust identifiers.
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"));
static NON_IDENT_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("static regex"));

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

// can't be raw identifiers
const PATH_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

// names the generated module relies on: prelude types and the serde derives
const RESERVED_TYPES: &[&str] = &[
    "Box", "Deserialize", "Err", "None", "Ok", "Option", "Result", "Serialize", "Some", "String", "Vec",
];

/// Type names stay as the schema spells them unless they aren't valid Rust.
pub fn type_ident(name: &str) -> String {
    let base = if IDENT.is_match(name) {
        name.to_string()
    } else {
        NON_IDENT_CHAR.replace_all(name, "_").into_owned()
    };
    let ident = escape(lead_digit(base, "_"));
    if RESERVED_TYPES.contains(&ident.as_str()) { format!("{ident}_") } else { ident }
}

/// `nextNode` → `next_node`, `HTTPStatus` → `http_status`, `type` → `r#type`.
pub fn field_ident(name: &str) -> String {
    let snake = words(name).iter().map(|w| w.to_ascii_lowercase()).collect::<Vec<_>>().join("_");
    if snake.is_empty() {
        return "field".to_string();
    }
    escape(lead_digit(snake, "_"))
}

/// `IN_PROGRESS` → `InProgress`.
pub fn variant_ident(name: &str) -> String {
    let pascal = words(name).iter().map(|w| capitalize(w)).collect::<String>();
    if pascal.is_empty() {
        return "Value".to_string();
    }
    escape(lead_digit(pascal, "V"))
}

/// Identifier as written in source minus any `r#` prefix; what serde sees.
pub fn bare(ident: &str) -> &str {
    ident.strip_prefix("r#").unwrap_or(ident)
}

/// Split on `_`, `-`, other punctuation and camelCase humps.
pub fn words(s: &str) -> Vec<String> {
    let chars = s.chars().collect::<Vec<_>>();
    let mut out = Vec::new();
    let mut cur = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !cur.is_empty() {
                out.push(std::mem::take(&mut cur));
            }
            continue;
        }
        if !cur.is_empty() && c.is_ascii_uppercase() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let hump = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower);
            if hump {
                out.push(std::mem::take(&mut cur));
            }
        }
        cur.push(c);
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

/// Identifiers already handed out within one definition; clashes get a numeric suffix.
#[derive(Debug, Default)]
pub struct Scope {
    taken: HashSet<String>,
}

impl Scope {
    pub fn new() -> Self { Self::default() }

    pub fn claim(&mut self, ident: String) -> String {
        if self.taken.insert(bare(&ident).to_string()) {
            return ident;
        }
        let base = bare(&ident).to_string();
        let sep = if base.starts_with(|c: char| c.is_ascii_uppercase()) { "" } else { "_" };
        let mut n = 2;
        loop {
            let candidate = format!("{base}{sep}{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

fn lead_digit(ident: String, prefix: &str) -> String {
    if ident.starts_with(|c: char| c.is_ascii_digit()) { format!("{prefix}{ident}") } else { ident }
}

fn escape(ident: String) -> String {
    if PATH_KEYWORDS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else if KEYWORDS.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}
