use super::{ensure_text, FieldExtractor};
use crate::{errors::SiteError, types::ExtractedFields};
use async_trait::async_trait;
use regex::Regex;

/// Regex-only extraction, no external model call.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicExtractor;

#[async_trait]
impl FieldExtractor for HeuristicExtractor {
    async fn extract(&self, raw_text: &str) -> Result<ExtractedFields, SiteError> {
        ensure_text(raw_text)?;
        Ok(extract_fields(raw_text))
    }
}

/// Runs every heuristic over `text`.
pub fn extract_fields(text: &str) -> ExtractedFields {
    ExtractedFields {
        address: extract_address(text).unwrap_or_default(),
        company_name: extract_company(text).unwrap_or_default(),
        contact_name: String::new(),
        email: extract_email(text).unwrap_or_default(),
        website: extract_website(text).unwrap_or_default(),
        phone: extract_phone(text).unwrap_or_default(),
        raw_text: text.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Field extractors
// ---------------------------------------------------------------------------

/// Tries the phone patterns in order; the first one that matches wins.
pub fn extract_phone(text: &str) -> Option<String> {
    const PATTERNS: [&str; 3] = [
        r"(?:\+?1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})",
        r"([0-9]{3})[-.\s]([0-9]{3})[-.\s]([0-9]{4})",
        r"\(([0-9]{3})\)\s*([0-9]{3})[-.\s]([0-9]{4})",
    ];
    PATTERNS.iter().find_map(|pattern| {
        let re = Regex::new(pattern).ok()?;
        re.find(text).map(|m| m.as_str().trim().to_string())
    })
}

/// Finds the first URL-looking token and makes sure it carries a scheme.
///
/// Bare domains that are the host part of an email address are skipped.
pub fn extract_website(text: &str) -> Option<String> {
    let re = Regex::new(
        r"(?i)(https?://\S+|www\.\S+|[a-z0-9-]+\.(?:com|net|org|edu|gov|io|co)\S*)",
    )
    .ok()?;
    let found = re.find_iter(text).find(|m| {
        !text[..m.start()]
            .rsplit(char::is_whitespace)
            .next()
            .is_some_and(|token| token.contains('@'))
    })?;
    let website = found.as_str().trim();
    if website.to_ascii_lowercase().starts_with("http") {
        Some(website.to_string())
    } else {
        Some(format!("https://{website}"))
    }
}

/// A house number followed by words ending in a street-type keyword, plus any
/// trailing words on the same line.
pub fn extract_address(text: &str) -> Option<String> {
    let re = Regex::new(
        r"(?i)\d+[ \t]+(?:[a-z]+[ \t]+)+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Way|Circle|Cir|Place|Pl)\b(?:[ \t]+[a-z \t,]+)?",
    )
    .ok()?;
    re.find(text).map(|m| m.as_str().trim().to_string())
}

/// A line carrying a legal-entity suffix, else the first line that is neither
/// a phone number nor a URL and is longer than three characters.
pub fn extract_company(text: &str) -> Option<String> {
    let suffix = Regex::new(
        r"(?i)[^\n]*?\b(?:LLC|L\.L\.C\.|Inc\b\.?|Incorporated|Corp\b\.?|Corporation|Company|Co\.|Limited|Ltd\b\.?)[^\n]*",
    )
    .ok()?;
    if let Some(m) = suffix.find(text) {
        return Some(m.as_str().trim().to_string());
    }

    let phone_like = Regex::new(r"\d{3}[-.\s]?\d{3}[-.\s]?\d{4}").ok()?;
    let url_like = Regex::new(r"www\.|\.com|\.net|\.org").ok()?;
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find(|line| {
            !phone_like.is_match(line) && !url_like.is_match(line) && line.chars().count() > 3
        })
        .map(str::to_string)
}

pub fn extract_email(text: &str) -> Option<String> {
    let re = Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").ok()?;
    re.find(text).map(|m| m.as_str().to_string())
}
