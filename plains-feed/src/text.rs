//! Plain-text helpers for CMS markup: tag stripping and entity decoding.
use regex::{Captures, Regex};
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern compiles"));
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("ws pattern compiles"));
static REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[xX]([0-9A-Fa-f]+)|#([0-9]+)|([A-Za-z][A-Za-z0-9]*))(;?)")
        .expect("reference pattern compiles")
});

const NBSP_ENTITY: &str = "&nbsp;";

/// Remove every `<...>` tag, turn `&nbsp;` into a plain space, collapse
/// whitespace runs to one space, and trim.
///
/// Each tag becomes a space so adjacent block elements do not glue words
/// together. Applying it twice gives the same result as applying it once.
///
/// ```
/// use plains_feed::text::strip_tags;
///
/// assert_eq!(strip_tags("<p>Soil&nbsp;<b>pH</b></p>\n<p>basics</p>"), "Soil pH basics");
/// ```
pub fn strip_tags(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let without_tags = TAG_RE.replace_all(html, " ");
    let without_nbsp = without_tags.replace(NBSP_ENTITY, " ");
    WS_RE.replace_all(&without_nbsp, " ").trim().to_string()
}

/// [`strip_tags`] over a field that may be absent.
pub fn strip_tags_opt(html: Option<&str>) -> String {
    html.map(strip_tags).unwrap_or_default()
}

/// Decode named (`&amp;`, `&eacute;`, ...) and numeric (`&#39;`, `&#x27;`)
/// character references to their literal characters, the way an HTML5
/// parser does in text content.
///
/// Named references use the full HTML5 table. The legacy names (`&amp`,
/// `&copy`, ...) also decode without a trailing `;`, and numeric references
/// never need one. Numeric code points follow the HTML5 fixups: 0x80-0x9F
/// map through windows-1252, and zero, surrogates and anything past U+10FFFF
/// become U+FFFD. Text without `&` comes back unchanged; unknown references
/// are left as written.
///
/// ```
/// use plains_feed::text::decode_entities;
///
/// assert_eq!(decode_entities("Farmers&#39; guide &amp; tips"), "Farmers' guide & tips");
/// assert_eq!(decode_entities("&#128;5 &amp more"), "€5 & more");
/// ```
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    REF_RE.replace_all(s, decode_reference).into_owned()
}

fn decode_reference(caps: &Captures<'_>) -> String {
    let whole = &caps[0];
    if let Some(hex) = caps.get(1) {
        return numeric_char(parse_code_point(hex.as_str(), 16)).to_string();
    }
    if let Some(dec) = caps.get(2) {
        return numeric_char(parse_code_point(dec.as_str(), 10)).to_string();
    }
    let name = caps.get(3).map_or("", |m| m.as_str());
    let terminated = !caps[4].is_empty();

    if terminated {
        if let Some(decoded) = named(name) {
            return decoded;
        }
    }
    // Legacy names match as a prefix, the rest of the word stays literal.
    let legacy = LEGACY_NAMES
        .iter()
        .filter(|legacy| name.starts_with(**legacy))
        .max_by_key(|legacy| legacy.len());
    match legacy.and_then(|legacy| Some((*legacy, named(legacy)?))) {
        Some((legacy, decoded)) => format!("{decoded}{}", &whole[1 + legacy.len()..]),
        None => whole.to_string(),
    }
}

fn named(name: &str) -> Option<String> {
    let reference = format!("&{name};");
    let decoded = html_escape::decode_html_entities(&reference);
    (decoded != reference).then(|| decoded.into_owned())
}

/// Digits to a code point, saturating just past the Unicode range.
fn parse_code_point(digits: &str, radix: u32) -> u32 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0u32, |acc, d| {
            acc.saturating_mul(radix).saturating_add(d).min(0x11_0000)
        })
}

fn numeric_char(code: u32) -> char {
    if (0x80..=0x9F).contains(&code) {
        if let Some(mapped) = WINDOWS_1252[(code - 0x80) as usize] {
            return mapped;
        }
    }
    match code {
        0 => char::REPLACEMENT_CHARACTER,
        _ => char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER),
    }
}

/// Replacements for 0x80-0x9F; `None` keeps the C1 control as is.
#[rustfmt::skip]
const WINDOWS_1252: [Option<char>; 32] = [
    Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017D}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
];

/// Named references HTML5 still accepts without the trailing `;`.
const LEGACY_NAMES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];
