use any_ascii::any_ascii;
use unicode_normalization::UnicodeNormalization;

/// Combining diacritical mark ranges, dropped after NFKD decomposition.
fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF | 0xFE20..=0xFE2F)
}

/// Turns a display name into the token used for every derived filename.
///
/// The result only ever contains `[a-z0-9_]`, and `slug(slug(x)) == slug(x)`.
/// Precomposed and decomposed spellings of the same name yield the same token.
pub(crate) fn slug(text: &str) -> String {
    let decomposed: String = text.trim().nfkd().filter(|c| !is_combining_mark(*c)).collect();
    let ascii = any_ascii(&decomposed).to_lowercase();

    let mut res = String::with_capacity(ascii.len());
    let mut in_whitespace = false;
    for c in ascii.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                res.push('_');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;

        if c.is_ascii_alphanumeric() || c == '_' {
            res.push(c);
        }
    }
    res
}

pub(crate) fn mp3_filename(name: &str) -> String {
    format!("{}.mp3", slug(name))
}

pub(crate) fn jpeg_filename(name: &str) -> String {
    format!("{}.jpeg", slug(name))
}

pub(crate) fn csv_filename(name: &str) -> String {
    format!("{}.csv", slug(name))
}
