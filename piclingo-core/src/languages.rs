//! Static language code table used to label the two translation hops
//!
//! Codes follow the translation service: two or three lowercase letters,
//! plus `zh-cn` and `zh-tw` for the Chinese scripts.

use crate::error::{PipelineError, Result};

/// Language code to lowercase display name.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("af", "afrikaans"),
    ("sq", "albanian"),
    ("am", "amharic"),
    ("ar", "arabic"),
    ("hy", "armenian"),
    ("az", "azerbaijani"),
    ("eu", "basque"),
    ("be", "belarusian"),
    ("bn", "bengali"),
    ("bs", "bosnian"),
    ("bg", "bulgarian"),
    ("ca", "catalan"),
    ("ceb", "cebuano"),
    ("ny", "chichewa"),
    ("zh-cn", "chinese (simplified)"),
    ("zh-tw", "chinese (traditional)"),
    ("co", "corsican"),
    ("hr", "croatian"),
    ("cs", "czech"),
    ("da", "danish"),
    ("nl", "dutch"),
    ("en", "english"),
    ("eo", "esperanto"),
    ("et", "estonian"),
    ("tl", "filipino"),
    ("fi", "finnish"),
    ("fr", "french"),
    ("fy", "frisian"),
    ("gl", "galician"),
    ("ka", "georgian"),
    ("de", "german"),
    ("el", "greek"),
    ("gu", "gujarati"),
    ("ht", "haitian creole"),
    ("ha", "hausa"),
    ("haw", "hawaiian"),
    ("iw", "hebrew"),
    ("he", "hebrew"),
    ("hi", "hindi"),
    ("hmn", "hmong"),
    ("hu", "hungarian"),
    ("is", "icelandic"),
    ("ig", "igbo"),
    ("id", "indonesian"),
    ("ga", "irish"),
    ("it", "italian"),
    ("ja", "japanese"),
    ("jw", "javanese"),
    ("kn", "kannada"),
    ("kk", "kazakh"),
    ("km", "khmer"),
    ("ko", "korean"),
    ("ku", "kurdish (kurmanji)"),
    ("ky", "kyrgyz"),
    ("lo", "lao"),
    ("la", "latin"),
    ("lv", "latvian"),
    ("lt", "lithuanian"),
    ("lb", "luxembourgish"),
    ("mk", "macedonian"),
    ("mg", "malagasy"),
    ("ms", "malay"),
    ("ml", "malayalam"),
    ("mt", "maltese"),
    ("mi", "maori"),
    ("mr", "marathi"),
    ("mn", "mongolian"),
    ("my", "myanmar (burmese)"),
    ("ne", "nepali"),
    ("no", "norwegian"),
    ("or", "odia"),
    ("ps", "pashto"),
    ("fa", "persian"),
    ("pl", "polish"),
    ("pt", "portuguese"),
    ("pa", "punjabi"),
    ("ro", "romanian"),
    ("ru", "russian"),
    ("sm", "samoan"),
    ("gd", "scots gaelic"),
    ("sr", "serbian"),
    ("st", "sesotho"),
    ("sn", "shona"),
    ("sd", "sindhi"),
    ("si", "sinhala"),
    ("sk", "slovak"),
    ("sl", "slovenian"),
    ("so", "somali"),
    ("es", "spanish"),
    ("su", "sundanese"),
    ("sw", "swahili"),
    ("sv", "swedish"),
    ("tg", "tajik"),
    ("ta", "tamil"),
    ("te", "telugu"),
    ("th", "thai"),
    ("tr", "turkish"),
    ("uk", "ukrainian"),
    ("ur", "urdu"),
    ("ug", "uyghur"),
    ("uz", "uzbek"),
    ("vi", "vietnamese"),
    ("cy", "welsh"),
    ("xh", "xhosa"),
    ("yi", "yiddish"),
    ("yo", "yoruba"),
    ("zu", "zulu"),
];

/// Codes the service accepts that are not table keys.
const SPECIAL_CASES: &[(&str, &str)] = &[("ee", "et")];

/// Display name for an exact code.
///
/// A code outside the table is an error, never a placeholder.
pub fn language_name(code: &str) -> Result<&'static str> {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .ok_or_else(|| PipelineError::UnknownLanguage(code.to_string()))
}

/// Normalize user or service supplied input to a table code.
///
/// Accepts any case, an underscore region suffix (`zh_CN` keeps only `zh`),
/// the `ee` alias and full language names.
pub fn resolve_code(input: &str) -> Result<&'static str> {
    let lowered = input.trim().to_lowercase();
    let code = lowered.split('_').next().unwrap_or_default();

    if let Some((c, _)) = LANGUAGES.iter().find(|(c, _)| *c == code) {
        return Ok(c);
    }
    if let Some((_, target)) = SPECIAL_CASES.iter().find(|(alias, _)| *alias == code) {
        return Ok(target);
    }
    // Later entries win on duplicate names ("hebrew" maps to "he")
    LANGUAGES
        .iter()
        .rev()
        .find(|(_, name)| *name == code)
        .map(|(c, _)| *c)
        .ok_or_else(|| PipelineError::UnknownLanguage(input.to_string()))
}

/// Table rendered as aligned `code  name` lines, sorted by code.
pub fn table_listing() -> String {
    let mut entries: Vec<_> = LANGUAGES.to_vec();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
        .iter()
        .map(|(code, name)| format!("{:<6} {}", code, name))
        .collect::<Vec<_>>()
        .join("\n")
}
