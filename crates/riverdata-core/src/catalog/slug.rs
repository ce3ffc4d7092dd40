use regex::Regex;
use std::sync::LazyLock;

/// `Mary's` and `don't` keep the letter after the apostrophe on the word.
static CONTRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z\d]+)'([ts])(\s|$)").expect("valid contraction regex"));

/// Letters transliterated the German way before the generic fallback.
const GERMAN: [(char, &str); 7] = [
    ('ä', "ae"),
    ('ö', "oe"),
    ('ü', "ue"),
    ('Ä', "Ae"),
    ('Ö', "Oe"),
    ('Ü', "Ue"),
    ('ß', "ss"),
];

/// Turn a catchment or river name into a lower-case, dash-separated key.
///
/// Steps:
/// 1. Replace `&` with ` and `
/// 2. Transliterate to ASCII (German umlauts become `ae`, `oe`, `ue`)
/// 3. Join `'s` and `'t` contractions onto their word
/// 4. Lowercase and treat every non-alphanumeric run as a single `-`
/// 5. Trim leading and trailing dashes
///
/// Camel case is not split: `McKenzie Brook` becomes `mckenzie-brook`.
pub fn slugify_name(raw: &str) -> String {
    let mut replaced = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => replaced.push_str(" and "),
            c => match GERMAN.iter().find(|(from, _)| *from == c) {
                Some((_, to)) => replaced.push_str(to),
                None => replaced.push(c),
            },
        }
    }

    let ascii = deunicode::deunicode(&replaced);
    let joined = CONTRACTION_RE.replace_all(&ascii, "${1}${2}${3}");

    let mut slug = String::with_capacity(joined.len());
    let mut prev_dash = true; // skip leading separators
    for c in joined.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}
