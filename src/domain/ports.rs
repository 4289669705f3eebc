use crate::domain::model::{Enrichment, GeneratedImage};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn text_model(&self) -> &str;
    fn image_model(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn output_path(&self) -> Option<&str>;
}

/// Generates the structured tasting notes for a product name.
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn generate_insights(&self, product_name: &str) -> Result<Enrichment>;
}

/// Generates a product photo. `Ok(None)` means the provider answered without image bytes.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate_image(&self, product_name: &str) -> Result<Option<GeneratedImage>>;
}
