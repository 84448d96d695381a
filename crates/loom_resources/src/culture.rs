//! Culture qualifiers in resource file names.
//!
//! `Strings.fr-CA.resx` is the `fr-CA` variant of `Strings.resx`: the culture
//! is the extension of the file stem.

use std::path::Path;

/// ISO 639-1 language codes.
const LANGUAGES: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg",
    "bh", "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv",
    "cy", "da", "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi",
    "fj", "fo", "fr", "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr",
    "ht", "hu", "hy", "hz", "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja",
    "jv", "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw",
    "ky", "la", "lb", "lg", "li", "ln", "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml",
    "mn", "mr", "ms", "mt", "my", "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv",
    "ny", "oc", "oj", "om", "or", "os", "pa", "pi", "pl", "ps", "pt", "qu", "rm", "rn", "ro",
    "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk", "sl", "sm", "sn", "so", "sq", "sr",
    "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti", "tk", "tl", "tn", "to", "tr",
    "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo", "wa", "wo", "xh", "yi",
    "yo", "za", "zh", "zu",
];

/// Returns the culture qualifier of `path`, if it has one.
///
/// The qualifier is a known two-letter language code, optionally followed by
/// `-`-separated subtags: a four-letter script, then a two-letter or
/// three-digit region (`de`, `fr-CA`, `zh-Hant-TW`, `es-419`).
pub fn culture_of(path: &Path) -> Option<&str> {
    let stem = path.file_stem()?.to_str()?;
    let (_, candidate) = stem.rsplit_once('.')?;
    is_culture_name(candidate).then_some(candidate)
}

fn is_culture_name(name: &str) -> bool {
    let mut subtags = name.split('-');
    let Some(language) = subtags.next() else {
        return false;
    };
    if !LANGUAGES.contains(&language.to_ascii_lowercase().as_str()) {
        return false;
    }
    let rest: Vec<&str> = subtags.collect();
    match rest.as_slice() {
        [] => true,
        [one] => is_script(one) || is_region(one),
        [script, region] => is_script(script) && is_region(region),
        _ => false,
    }
}

fn is_script(tag: &str) -> bool {
    tag.len() == 4 && tag.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_region(tag: &str) -> bool {
    (tag.len() == 2 && tag.bytes().all(|b| b.is_ascii_alphabetic()))
        || (tag.len() == 3 && tag.bytes().all(|b| b.is_ascii_digit()))
}
