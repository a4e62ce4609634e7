use mealie_sdk::client::RecipeQuery;
use mealie_sdk::config::{ClientConfig, ENV_BASE_URL};
use mealie_sdk::MealieClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Checks that the `MEALIE_*` configuration can reach and authenticate
/// against a Mealie server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            tracing::error!("Set {} and either MEALIE_API_TOKEN or MEALIE_USERNAME/MEALIE_PASSWORD", ENV_BASE_URL);
            std::process::exit(2);
        }
    };

    let base_url = config.base_url().to_string();
    let client = MealieClient::new(config)?;

    tracing::info!("Validating Mealie credentials against {}...", base_url);
    if let Err(e) = client.authenticate().await {
        tracing::error!("Authentication failed: {}", e);
        tracing::error!("Please verify:");
        tracing::error!("  - {} is correct: {}", ENV_BASE_URL, base_url);
        tracing::error!("  - the API token or username/password is valid");
        tracing::error!("  - the Mealie server is running and accessible");
        std::process::exit(1);
    }

    tracing::info!("Testing API access with token...");
    let user = client.users().current().await?;
    tracing::info!("Signed in as {} ({:?})", user.display_name(), user.role());

    let page = client
        .recipes()
        .get_page(&RecipeQuery::new().per_page(5))
        .await?;
    tracing::info!("Server holds {} recipes", page.total);
    for recipe in &page.items {
        tracing::info!("  - {} ({})", recipe.name, recipe.slug);
    }

    tracing::info!("Mealie server at {} is reachable and credentials are valid", base_url);
    Ok(())
}
