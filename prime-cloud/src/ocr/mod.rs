//! Invoice scanning through a hosted multimodal model API
//!
//! The image goes out base64-encoded with an extraction prompt; the model's
//! JSON reply becomes an [`InvoiceDraft`] for the user to review.

use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use shared::error::AppError;
use shared::models::InvoiceDraft;
use shared::util::round2;

use crate::config::ModelConfig;
use crate::outbound::OutboundError;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const SERVICE: &str = "Invoice scan";

/// Decoded images above this size are rejected before the call
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const SUPPORTED_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

const EXTRACTION_PROMPT: &str = "Extract this vendor invoice as JSON with exactly these keys: \
vendor (string), invoice_date (YYYY-MM-DD), invoice_number (string or null), \
line_items (array of {product, qty, unit_price, extended_price}), total (number). \
Reply with the JSON object only.";

/// Check the upload before spending a model call on it
pub fn validate_image(image_base64: &str, media_type: &str) -> Result<(), AppError> {
    if !SUPPORTED_MEDIA_TYPES.contains(&media_type) {
        return Err(AppError::validation(format!(
            "Unsupported media_type: {media_type}"
        )));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(image_base64.trim())
        .map_err(|_| AppError::validation("image_base64 is not valid base64"))?;
    if bytes.is_empty() {
        return Err(AppError::required("image_base64"));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::validation("Image is larger than 5 MB"));
    }
    Ok(())
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

pub async fn scan_invoice(
    client: &reqwest::Client,
    config: &ModelConfig,
    api_key: &str,
    image_base64: &str,
    media_type: &str,
) -> Result<InvoiceDraft, OutboundError> {
    let body = json!({
        "model": config.model,
        "max_tokens": 2048,
        "messages": [{
            "role": "user",
            "content": [
                {
                    "type": "image",
                    "source": {
                        "type": "base64",
                        "media_type": media_type,
                        "data": image_base64.trim(),
                    }
                },
                { "type": "text", "text": EXTRACTION_PROMPT }
            ]
        }]
    });

    let resp: serde_json::Value = client
        .post(API_URL)
        .header("x-api-key", api_key)
        .header("anthropic-version", API_VERSION)
        .json(&body)
        .send()
        .await
        .map_err(OutboundError::http(SERVICE))?
        .json()
        .await
        .map_err(OutboundError::http(SERVICE))?;

    if let Some(err) = resp.get("error") {
        let message = err["message"].as_str().unwrap_or("model API error");
        return Err(OutboundError::provider(SERVICE, message));
    }

    let parsed: MessagesResponse = serde_json::from_value(resp)
        .map_err(|e| OutboundError::unexpected(SERVICE, e.to_string()))?;
    let text: String = parsed
        .content
        .into_iter()
        .filter(|b| b.kind == "text")
        .map(|b| b.text)
        .collect();

    parse_draft(&text)
}

/// Pull the JSON object out of the model reply (which may be fenced or
/// surrounded by prose) and normalise line math.
pub fn parse_draft(reply: &str) -> Result<InvoiceDraft, OutboundError> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if e > s => &reply[s..=e],
        _ => return Err(OutboundError::unexpected(SERVICE, "no JSON object in reply")),
    };

    let mut draft: InvoiceDraft = serde_json::from_str(json)
        .map_err(|e| OutboundError::unexpected(SERVICE, e.to_string()))?;

    for line in &mut draft.line_items {
        line.extended_price = round2(line.qty * line.unit_price);
    }
    if !draft.line_items.is_empty() {
        draft.total = Some(round2(draft.line_items.iter().map(|l| l.extended_price).sum()));
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_fenced_reply() {
        let reply = "Here is the invoice:\n```json\n{\"vendor\":\"Sysco\",\"invoice_date\":\"2026-03-02\",\
\"invoice_number\":\"INV-88\",\"line_items\":[{\"product\":\"Mozzarella\",\"qty\":4,\"unit_price\":12.5},\
{\"product\":\"Flour\",\"qty\":2,\"unit_price\":18.25,\"extended_price\":99}],\"total\":999}\n```";
        let draft = parse_draft(reply).unwrap();
        assert_eq!(draft.vendor.as_deref(), Some("Sysco"));
        assert_eq!(draft.invoice_date, NaiveDate::from_ymd_opt(2026, 3, 2));
        assert_eq!(draft.line_items[0].extended_price, 50.0);
        assert_eq!(draft.line_items[1].extended_price, 36.5);
        assert_eq!(draft.total, Some(86.5));
    }

    #[test]
    fn test_total_kept_without_lines() {
        let draft = parse_draft("{\"vendor\":\"Coca-Cola\",\"total\":212.4}").unwrap();
        assert!(draft.line_items.is_empty());
        assert_eq!(draft.total, Some(212.4));
    }

    #[test]
    fn test_reply_without_json_fails() {
        assert!(parse_draft("I could not read this image.").is_err());
    }

    #[test]
    fn test_validate_image() {
        let png = base64::engine::general_purpose::STANDARD.encode(b"\x89PNG fake");
        assert!(validate_image(&png, "image/png").is_ok());
        assert!(validate_image(&png, "application/zip").is_err());
        assert!(validate_image("%%%not-base64", "image/png").is_err());
        assert!(validate_image("", "image/png").is_err());
    }
}
