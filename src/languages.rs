//! Supported language codes and tag canonicalization
//!
//! The translation model only understands a closed set of codes such as
//! `en_XX` or `zh_CN`. Callers and the language classifier use looser tags
//! (`en`, `en-US`, `fr_FR`, ...), so every tag is mapped onto the supported
//! code that shares its first two characters.
//!
//! # Example
//!
//! ```ignore
//! use babel_mt::LanguageCodeResolver;
//!
//! let resolver = LanguageCodeResolver::mbart50();
//! assert_eq!(resolver.resolve("en_US")?, "en_XX");
//! assert_eq!(resolver.resolve("zh-Hans")?, "zh_CN");
//! assert!(resolver.resolve("xx_ZZ").is_err());
//! ```

use crate::error::{MtError, MtResult};
use std::collections::HashMap;

/// The English fallback used when no target language is requested
pub const DEFAULT_TARGET_LANGUAGE: &str = "en_XX";

/// Language codes of the mBART-50 many-to-many model, with English names.
///
/// Order matters: resolution returns the first entry with a matching prefix.
pub const MBART50_LANGUAGES: &[(&str, &str)] = &[
    ("ar_AR", "Arabic"),
    ("cs_CZ", "Czech"),
    ("de_DE", "German"),
    ("en_XX", "English"),
    ("es_XX", "Spanish"),
    ("et_EE", "Estonian"),
    ("fi_FI", "Finnish"),
    ("fr_XX", "French"),
    ("gu_IN", "Gujarati"),
    ("hi_IN", "Hindi"),
    ("it_IT", "Italian"),
    ("ja_XX", "Japanese"),
    ("kk_KZ", "Kazakh"),
    ("ko_KR", "Korean"),
    ("lt_LT", "Lithuanian"),
    ("lv_LV", "Latvian"),
    ("my_MM", "Burmese"),
    ("ne_NP", "Nepali"),
    ("nl_XX", "Dutch"),
    ("ro_RO", "Romanian"),
    ("ru_RU", "Russian"),
    ("si_LK", "Sinhala"),
    ("tr_TR", "Turkish"),
    ("vi_VN", "Vietnamese"),
    ("zh_CN", "Chinese"),
    ("af_ZA", "Afrikaans"),
    ("az_AZ", "Azerbaijani"),
    ("bn_IN", "Bengali"),
    ("fa_IR", "Persian"),
    ("he_IL", "Hebrew"),
    ("hr_HR", "Croatian"),
    ("id_ID", "Indonesian"),
    ("ka_GE", "Georgian"),
    ("km_KH", "Khmer"),
    ("mk_MK", "Macedonian"),
    ("ml_IN", "Malayalam"),
    ("mn_MN", "Mongolian"),
    ("mr_IN", "Marathi"),
    ("pl_PL", "Polish"),
    ("ps_AF", "Pashto"),
    ("pt_XX", "Portuguese"),
    ("sv_SE", "Swedish"),
    ("sw_KE", "Swahili"),
    ("ta_IN", "Tamil"),
    ("te_IN", "Telugu"),
    ("th_TH", "Thai"),
    ("tl_XX", "Tagalog"),
    ("uk_UA", "Ukrainian"),
    ("ur_PK", "Urdu"),
    ("xh_ZA", "Xhosa"),
    ("gl_ES", "Galician"),
    ("sl_SI", "Slovenian"),
];

/// Return the part of a tag that takes part in matching: its first two characters
///
/// Tags shorter than two characters are returned whole, so they can never
/// match a supported code.
pub fn language_prefix(tag: &str) -> &str {
    match tag.char_indices().nth(2) {
        Some((idx, _)) => &tag[..idx],
        None => tag,
    }
}

/// Maps arbitrary language tags onto a fixed, ordered table of supported codes
#[derive(Debug, Clone)]
pub struct LanguageCodeResolver {
    languages: &'static [(&'static str, &'static str)],
}

impl LanguageCodeResolver {
    /// Build a resolver over an ordered `(code, name)` table
    ///
    /// Fails if a code is shorter than two characters or if two codes share a
    /// prefix, since resolution would then depend on table order.
    pub fn new(languages: &'static [(&'static str, &'static str)]) -> MtResult<Self> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for &(code, _) in languages {
            let prefix = language_prefix(code);
            if prefix.chars().count() < 2 {
                return Err(MtError::Config(format!(
                    "language code {:?} is shorter than two characters",
                    code
                )));
            }
            if let Some(first) = seen.insert(prefix, code) {
                return Err(MtError::AmbiguousLanguagePrefix {
                    prefix: prefix.to_string(),
                    first: first.to_string(),
                    second: code.to_string(),
                });
            }
        }
        Ok(Self { languages })
    }

    /// Resolver over the mBART-50 code table
    pub fn mbart50() -> Self {
        // Checked by test_builtin_table_is_unambiguous.
        Self {
            languages: MBART50_LANGUAGES,
        }
    }

    /// Canonicalize `tag` to the first supported code sharing its two-character prefix
    pub fn resolve(&self, tag: &str) -> MtResult<&'static str> {
        let prefix = language_prefix(tag);
        self.languages
            .iter()
            .find(|(code, _)| language_prefix(code) == prefix)
            .map(|(code, _)| *code)
            .ok_or_else(|| MtError::UnsupportedLanguage(tag.to_string()))
    }

    /// English name of a supported code
    pub fn display_name(&self, code: &str) -> Option<&'static str> {
        self.languages
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| *name)
    }

    /// Supported codes in resolution order
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.languages.iter().map(|(code, _)| *code)
    }

    /// `(code, name)` pairs in resolution order
    pub fn languages(&self) -> &'static [(&'static str, &'static str)] {
        self.languages
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl Default for LanguageCodeResolver {
    fn default() -> Self {
        Self::mbart50()
    }
}
