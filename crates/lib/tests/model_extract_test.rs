//! # Model-Assisted Extraction Tests
//!
//! Uses `MockAiProvider` to feed canned replies through `ModelExtractor`.

use sitelog::extract::model::parse_model_reply;
use sitelog::{ErrorKind, FieldExtractor, ModelExtractor, SiteError};
use sitelog_test_utils::MockAiProvider;

const SIGN_TEXT: &str = "Sunrise Homes\n42 Oak Avenue\nJane Doe 555-987-6543";

const REPLY: &str = r#"{"companyName": "Sunrise Homes", "contactName": "Jane Doe", "email": "", "website": "", "phone": "555-987-6543", "address": "42 Oak Avenue"}"#;

#[tokio::test]
async fn test_prompt_embeds_ocr_text_and_reply_is_mapped() {
    // --- 1. Arrange ---
    let ai = MockAiProvider::new();
    ai.add_response("42 Oak Avenue", REPLY);
    let extractor = ModelExtractor::new(Box::new(ai.clone()));

    // --- 2. Act ---
    let fields = extractor.extract(SIGN_TEXT).await.unwrap();

    // --- 3. Assert ---
    let calls = ai.get_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("companyName, contactName, email, website, phone, address"));
    assert!(calls[0].contains(SIGN_TEXT));

    assert_eq!(fields.company_name, "Sunrise Homes");
    assert_eq!(fields.contact_name, "Jane Doe");
    assert_eq!(fields.phone, "555-987-6543");
    assert_eq!(fields.address, "42 Oak Avenue");
    assert_eq!(fields.email, "");
    assert_eq!(fields.raw_text, SIGN_TEXT);
}

#[test]
fn test_fenced_reply_equals_unfenced() {
    let fenced = format!("```json\n{REPLY}\n```");
    assert_eq!(
        parse_model_reply(&fenced).unwrap(),
        parse_model_reply(REPLY).unwrap()
    );
    let bare_fence = format!("```\n{REPLY}\n```");
    assert_eq!(
        parse_model_reply(&bare_fence).unwrap(),
        parse_model_reply(REPLY).unwrap()
    );
}

#[test]
fn test_extra_keys_ignored_and_missing_keys_empty() {
    let fields =
        parse_model_reply(r#"{"companyName": " Acme ", "confidence": 0.9, "phone": null}"#).unwrap();
    assert_eq!(fields.company_name, "Acme");
    assert_eq!(fields.phone, "");
    assert_eq!(fields.address, "");
    assert_eq!(fields.website, "");
}

#[test]
fn test_numeric_values_are_stringified() {
    let fields = parse_model_reply(r#"{"phone": 5551234567}"#).unwrap();
    assert_eq!(fields.phone, "5551234567");
}

#[tokio::test]
async fn test_prose_reply_is_unparseable_and_keeps_raw_text() {
    let ai = MockAiProvider::new();
    ai.add_response("Text to analyze", "Sorry, I could not find anything.");
    let extractor = ModelExtractor::new(Box::new(ai));

    let err = extractor.extract(SIGN_TEXT).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
    match err {
        SiteError::UnparseableModelOutput { raw, .. } => {
            assert_eq!(raw, "Sorry, I could not find anything.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_json_array_is_rejected() {
    assert!(parse_model_reply(r#"["Acme"]"#).is_err());
}

#[tokio::test]
async fn test_blank_text_skips_the_model() {
    let ai = MockAiProvider::new();
    let extractor = ModelExtractor::new(Box::new(ai.clone()));

    let err = extractor.extract("   ").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(ai.get_calls().is_empty());
}
