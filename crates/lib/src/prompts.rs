//! # Prompt Templates
//!
//! The instruction sent to the text-analysis model for site-photo extraction.

/// The extraction prompt. `{text}` is replaced with the raw OCR transcript.
pub const SITE_EXTRACTION_PROMPT: &str = r#"Analyze the following text extracted from a construction site photo and identify the following information:
- Company Name: The name of the developer/construction company
- Contact Name: The name of a person to contact (if mentioned)
- Email Address: Any email address found
- Website: Any website URL found
- Phone Number: Any phone number found
- Address: The site address or location (street address, city, state, zip code if available)

Return the information in JSON format with these exact keys: companyName, contactName, email, website, phone, address.
If any information is not found or cannot be determined with confidence, use an empty string "" for that field.
Do not make up or guess information that is not present in the text.

Text to analyze:
{text}

Return only valid JSON, no other text."#;

/// Fills the extraction prompt with the OCR transcript.
pub fn site_extraction_prompt(text: &str) -> String {
    SITE_EXTRACTION_PROMPT.replace("{text}", text)
}
