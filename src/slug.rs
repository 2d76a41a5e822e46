//! Slugs
//!
//! URL-safe identifiers derived from display names. Generation is
//! deterministic; uniqueness is the calling store's concern (see
//! [`disambiguate`]).

/// Derive a URL-safe slug from a display name.
///
/// Lowercases, transliterates Latin diacritics and Cyrillic to ASCII,
/// collapses runs of whitespace/punctuation into single hyphens, and trims
/// leading/trailing hyphens. The result may be empty if the name contains
/// no representable characters.
pub fn generate(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        for lower in ch.to_lowercase() {
            match transliterate(lower) {
                Some(mapped) => {
                    for c in mapped.chars() {
                        push_segment_char(&mut slug, c, &mut pending_separator);
                    }
                }
                None if lower.is_ascii_alphanumeric() => {
                    push_segment_char(&mut slug, lower, &mut pending_separator);
                }
                None => pending_separator = true,
            }
        }
    }

    slug
}

/// Check that a slug consists of non-empty `[a-z0-9]` segments joined by
/// single hyphens.
pub fn is_valid(slug: &str) -> bool {
    !slug.is_empty()
        && slug.split('-').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

/// Find a free slug by appending numeric suffixes (`base`, `base-1`,
/// `base-2`, …) until `is_taken` reports a miss.
pub fn disambiguate(base: &str, mut is_taken: impl FnMut(&str) -> bool) -> String {
    if !is_taken(base) {
        return base.to_owned();
    }

    let mut counter = 1u64;
    loop {
        let candidate = format!("{base}-{counter}");
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn push_segment_char(slug: &mut String, c: char, pending_separator: &mut bool) {
    if *pending_separator && !slug.is_empty() {
        slug.push('-');
    }
    *pending_separator = false;
    slug.push(c);
}

/// ASCII folding for the alphabets the storefront content uses. Returns
/// `None` for characters that need no mapping.
fn transliterate(ch: char) -> Option<&'static str> {
    let mapped = match ch {
        'à' | 'á' | 'â' | 'ä' | 'ã' | 'å' | 'ā' | 'ą' => "a",
        'ç' | 'ć' | 'č' => "c",
        'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'ö' | 'õ' | 'ø' => "o",
        'ř' => "r",
        'ś' | 'š' => "s",
        'ť' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ů' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' | 'й' => "i",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };

    Some(mapped)
}
