pub mod engine;
pub mod orchestrator;
pub mod prompts;

pub use crate::domain::model::{Enrichment, GeneratedImage, Product, Recipe, TextSource};
pub use crate::domain::ports::{ConfigProvider, ImageProvider, Storage, TextProvider};
pub use crate::utils::error::Result;
