use tracing::{error, info, Instrument};

use storefront_actors::app_system::{setup_tracing, ShopConfig, ShopError, ShopSystem};
use storefront_actors::domain::SearchFilter;
use storefront_actors::product_actor::ProductCreate;
use storefront_actors::user_actor::UserError;

const DEMO_USER: &str = "demo-shopper";
const DEMO_PASSWORD: &str = "demo-password";

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = ShopConfig::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting storefront");

    let system = ShopSystem::start(&config).await.map_err(|e| e.to_string())?;

    if let Err(e) = run_demo(&system).await {
        error!(error = %e, status = e.status_code(), "Demo failed");
    }

    // Shutdown system gracefully
    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Application completed successfully");
    Ok(())
}

/// Walks one visitor through browsing, signing up and checking out.
async fn run_demo(system: &ShopSystem) -> Result<(), ShopError> {
    if system.product_client.list_products().await?.is_empty() {
        let span = tracing::info_span!("catalog_seeding");
        async {
            info!("Catalog is empty, adding demo products");
            system
                .product_client
                .create_product(ProductCreate::new("Desk Lamp", 2500).with_category("Office").featured())
                .await?;
            system
                .product_client
                .create_product(ProductCreate::new("Coffee Mug", 800).with_category("Kitchen"))
                .await?;
            Ok::<_, ShopError>(())
        }
        .instrument(span)
        .await?;
    }

    let storefront = system.storefront();
    let session = storefront.open_session().await?.id;

    let span = tracing::info_span!("browsing", session_id = %session);
    let picked = async {
        let featured = storefront.search(&SearchFilter::default().featured()).await?;
        let categories = storefront.categories().await?;
        info!(featured = featured.len(), ?categories, "Home page");
        let all = storefront.search(&SearchFilter::default()).await?;
        for view in &all {
            storefront.add_to_cart(session, view.product.id, 1).await?;
        }
        let cart = storefront.cart(session).await?;
        info!(lines = cart.lines.len(), total = cart.total, "Cart filled");
        Ok::<_, ShopError>(all.first().map(|view| view.product.id))
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("checkout", session_id = %session);
    async {
        match storefront.signup(session, DEMO_USER, DEMO_PASSWORD).await {
            Ok(_) => {}
            Err(ShopError::User(UserError::AlreadyExists(_))) => {
                storefront.login(session, DEMO_USER, DEMO_PASSWORD).await?;
            }
            Err(e) => return Err(e),
        }
        if let Some(product_id) = picked {
            storefront.add_to_wishlist(session, product_id).await?;
            let average = storefront.rate(product_id, "5").await?;
            info!(%product_id, average, "Rated");
        }

        let order = storefront.checkout(session).await?;
        info!(order_id = %order.id, total = order.total, "Order placed");
        let history = storefront.orders(session).await?;
        info!(orders = history.len(), "Order history");
        Ok(())
    }
    .instrument(span)
    .await?;

    storefront.close_session(session).await
}
