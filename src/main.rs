use clap::Parser;
use miss_can::domain::ports::ConfigProvider;
use miss_can::utils::error::ErrorSeverity;
use miss_can::utils::{logger, validation::Validate};
use miss_can::{
    Catalog, CliConfig, Command, EnrichError, EnrichmentEngine, EnrichmentOrchestrator,
    GeminiClient, LocalStorage,
};
use std::sync::Arc;

/// Any error that reaches the binary edge is a failed run.
fn exit_code(e: &EnrichError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 1,
        ErrorSeverity::High => 2,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &EnrichError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

fn print_catalog(catalog: &Catalog) {
    println!("The Pantry");
    for product in catalog.products() {
        println!(
            "  [{}] {:<32} {:<14} {:>7}  intensity {}/5",
            product.id, product.name, product.category, product.price, product.intensity
        );
    }
    println!();
    println!("Curated Pairings");
    for recipe in catalog.recipes() {
        let linked = catalog
            .linked_product(recipe)
            .map(|p| p.name)
            .unwrap_or("?");
        println!(
            "  [{}] {:<32} {} (uses {})",
            recipe.id, recipe.title, recipe.short_desc, linked
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("Command: {:?}", cli.command);

    let catalog = Catalog::pantry();
    if let Err(e) = catalog.validate() {
        fail(&e);
    }

    // 解析要開啟的商品
    let selected = match &cli.command {
        Command::List => {
            print_catalog(&catalog);
            return Ok(());
        }
        Command::Product { id } => catalog.require_product(id),
        Command::Recipe { id } => catalog.require_recipe(id).and_then(|recipe| {
            tracing::info!("🍽️ Recipe '{}' uses product {}", recipe.title, recipe.linked_product_id);
            catalog
                .linked_product(recipe)
                .ok_or_else(|| EnrichError::UnknownCatalogId {
                    kind: "product",
                    id: recipe.linked_product_id.to_string(),
                })
        }),
    };
    let product = selected.unwrap_or_else(|e| fail(&e));

    // 驗證配置
    let settings = cli.resolve().unwrap_or_else(|e| fail(&e));
    if let Err(e) = settings.validate() {
        fail(&e);
    }
    if settings.api_key().is_empty() {
        tracing::warn!("⚠️ No API key configured; fallback notes and the stock photo will be shown");
    }

    let client = Arc::new(GeminiClient::new(&settings)?);
    let orchestrator = EnrichmentOrchestrator::new(client.clone(), client);
    let storage = settings
        .output_path()
        .map(|path| LocalStorage::new(path.to_string()));
    let engine = EnrichmentEngine::new(orchestrator, storage);

    match engine.run(product).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Err(e) => {
            tracing::error!("❌ Enrichment failed: {}", e);
            fail(&e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_failure_exits_non_zero() {
        // 提供者錯誤嚴重度低，但走到這裡代表執行失敗
        let report_write = EnrichError::SerializationError(
            serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        );
        assert_eq!(report_write.severity(), ErrorSeverity::Low);
        assert_eq!(exit_code(&report_write), 1);
        assert_eq!(exit_code(&EnrichError::MissingApiKey), 1);

        let unknown = EnrichError::UnknownCatalogId {
            kind: "product",
            id: "99".to_string(),
        };
        assert_eq!(exit_code(&unknown), 1);

        let config = EnrichError::ConfigError {
            message: "bad".to_string(),
        };
        assert_eq!(exit_code(&config), 2);

        let io = EnrichError::IoError(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert_eq!(exit_code(&io), 3);
    }
}
