//! Per-language render hints
//!
//! The menu page needs two things it cannot read from the menu document:
//! the writing direction and the salt health warning printed at the bottom.

use serde::{Deserialize, Serialize};

/// Language used when a code has no warning text
pub const FALLBACK_LANGUAGE: &str = "es";

/// Languages written right-to-left
pub const RTL_LANGUAGES: &[&str] = &["he", "ar"];

const HEALTH_WARNINGS: &[(&str, &str)] = &[
    ("es", "El consumo excesivo de sal es perjudicial para la salud"),
    ("en", "Excessive salt consumption is harmful to health"),
    ("pt", "O consumo excessivo de sal é prejudicial à saúde"),
    ("it", "Il consumo eccessivo di sale è dannoso per la salute"),
    ("fr", "La consommation excessive de sel est nocive pour la santé"),
    ("de", "Übermäßiger Salzkonsum ist gesundheitsschädlich"),
    ("cn", "过量摄入盐分有害健康"),
    ("ru", "Чрезмерное потребление соли вредно для здоровья"),
    ("ja", "塩分の過剰摂取は健康に害を及ぼす可能性があります"),
    ("ko", "과도한 소금 섭취는 건강에 해롭습니다"),
    ("he", "צריכה מופרזת של מלח מזיקה לבריאות"),
    ("ar", "الاستهلاك المفرط للملح ضار بالصحة"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn for_language(lang: &str) -> Self {
        if RTL_LANGUAGES.contains(&lang) {
            Self::Rtl
        } else {
            Self::Ltr
        }
    }
}

/// Health warning for `lang`, falling back to Spanish
pub fn health_warning(lang: &str) -> &'static str {
    HEALTH_WARNINGS
        .iter()
        .find(|(code, _)| *code == lang)
        .or_else(|| HEALTH_WARNINGS.iter().find(|(code, _)| *code == FALLBACK_LANGUAGE))
        .map(|(_, text)| *text)
        .unwrap_or_default()
}

/// Languages that have their own warning text
pub fn supported_languages() -> impl Iterator<Item = &'static str> {
    HEALTH_WARNINGS.iter().map(|(code, _)| *code)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleInfo {
    pub lang: String,
    pub direction: TextDirection,
    pub health_warning: String,
}

impl LocaleInfo {
    pub fn for_language(lang: &str) -> Self {
        Self {
            lang: lang.to_string(),
            direction: TextDirection::for_language(lang),
            health_warning: health_warning(lang).to_string(),
        }
    }
}
