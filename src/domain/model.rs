use serde::{Deserialize, Serialize};
use url::Url;

/// A tin in the pantry. Catalog records are `'static` and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub image_seed: &'static str,
    pub price: &'static str,
    /// 1-5
    pub intensity: u8,
}

impl Product {
    /// Stock photo shown while the generated image is pending or missing.
    pub fn placeholder_image_url(&self) -> String {
        let raw = format!(
            "https://loremflickr.com/800/1200/open sardine tin,canned fish,seafood can/all?lock={}",
            self.id
        );
        // 將空白等字元轉為百分比編碼
        match Url::parse(&raw) {
            Ok(url) => url.to_string(),
            Err(_) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: &'static str,
    pub title: &'static str,
    pub short_desc: &'static str,
    pub image_seed: &'static str,
    pub linked_product_id: &'static str,
}

/// The sommelier's take on a product, as returned by the text provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    pub tasting_notes: String,
    pub pairing_suggestion: String,
    pub region_history: String,
}

impl Enrichment {
    pub const FALLBACK_TASTING_NOTES: &'static str =
        "Rich, savory, and deeply evocative of the Atlantic breeze.";
    pub const FALLBACK_PAIRING_SUGGESTION: &'static str = "A crisp Vinho Verde or a light Lager.";
    pub const FALLBACK_REGION_HISTORY: &'static str =
        "Harvested from the historic waters off the coast of Portugal, keeping traditions alive.";

    pub fn fallback() -> Self {
        Self {
            tasting_notes: Self::FALLBACK_TASTING_NOTES.to_string(),
            pairing_suggestion: Self::FALLBACK_PAIRING_SUGGESTION.to_string(),
            region_history: Self::FALLBACK_REGION_HISTORY.to_string(),
        }
    }
}

/// Where the text currently on display came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSource {
    Generated,
    Fallback,
}

/// Base64 image bytes as handed back by the image provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub base64_data: String,
}

impl GeneratedImage {
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_uses_fixed_copy() {
        let fallback = Enrichment::fallback();
        assert_eq!(
            fallback.tasting_notes,
            "Rich, savory, and deeply evocative of the Atlantic breeze."
        );
        assert_eq!(fallback.pairing_suggestion, "A crisp Vinho Verde or a light Lager.");
        assert!(fallback.region_history.starts_with("Harvested from the historic waters"));
    }

    #[test]
    fn enrichment_uses_camel_case_keys() {
        let value = serde_json::to_value(Enrichment::fallback()).unwrap();
        assert!(value.get("tastingNotes").is_some());
        assert!(value.get("pairingSuggestion").is_some());
        assert!(value.get("regionHistory").is_some());
    }

    #[test]
    fn data_uri_carries_mime_type() {
        let image = GeneratedImage {
            mime_type: "image/jpeg".to_string(),
            base64_data: "AAAA".to_string(),
        };
        assert_eq!(image.to_data_uri(), "data:image/jpeg;base64,AAAA");
    }
}
