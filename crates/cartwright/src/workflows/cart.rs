//! Catalog and shopping cart workflows.

use super::{ensure, postcondition_failed};
use crate::pages::products::ADDED_TO_CART_TEXT;
use crate::pages::{Category, PageObject, ProductCategoryPage, ShoppingCartPage};
use crate::result::SuiteResult;
use crate::session::Session;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Which product tile of a category to add
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductPick {
    /// Uniformly random tile
    Random,
    /// Tile at this position
    Index(usize),
}

/// Open `category`, add one product to the cart and return its title
pub async fn add_product_to_cart<R: Rng + ?Sized + Send>(
    session: &Session,
    category: Category,
    pick: ProductPick,
    rng: &mut R,
) -> SuiteResult<String> {
    info!(%category, "add product to cart");
    let page = ProductCategoryPage::new(session, category);
    page.open().await?;
    let url = session.current_url().await?;
    ensure(
        session,
        "add_product_to_cart",
        url == page.url(),
        page.url(),
        url.clone(),
    )
    .await?;

    let tiles = page.product_tiles().await?;
    let index = match pick {
        ProductPick::Random => rng.gen_range(0..tiles.len()),
        ProductPick::Index(index) if index < tiles.len() => index,
        ProductPick::Index(index) => {
            return Err(postcondition_failed(
                session,
                "add_product_to_cart",
                format!("product tile {index}"),
                format!("{} tiles", tiles.len()),
            )
            .await);
        }
    };

    page.open_product(index).await?;
    let name = page.product_name().await?;
    let notification = page.click_add_to_cart().await?;
    ensure(
        session,
        "add_product_to_cart",
        notification.contains(ADDED_TO_CART_TEXT),
        ADDED_TO_CART_TEXT,
        notification.clone(),
    )
    .await?;
    page.close_notification().await?;
    info!(%category, product = %name, "product added to cart");
    Ok(name)
}

/// Show the cart, navigating only when the browser is elsewhere
pub async fn open_cart(session: &Session) -> SuiteResult<ShoppingCartPage<'_>> {
    let page = ShoppingCartPage::new(session);
    let cart_url = page.url();
    if session.current_url().await? != cart_url {
        info!(url = %cart_url, "open cart");
        page.open().await?;
    }
    let url = session.current_url().await?;
    ensure(session, "open_cart", url == cart_url, cart_url, url.clone()).await?;
    Ok(page)
}

/// Product names in the cart, in row order
pub async fn list_products_in_cart(session: &Session) -> SuiteResult<Vec<String>> {
    open_cart(session).await?.list_products().await
}

/// Displayed quantity of `product_name`
///
/// A product that is not in the cart is a postcondition failure.
pub async fn get_product_quantity(session: &Session, product_name: &str) -> SuiteResult<String> {
    let page = open_cart(session).await?;
    match page.product_quantity(product_name).await? {
        Some(quantity) => Ok(quantity),
        None => Err(postcondition_failed(
            session,
            "get_product_quantity",
            format!("'{product_name}' in cart"),
            "absent",
        )
        .await),
    }
}

/// Set the quantity of `product_name` and require the cart to show it
pub async fn update_product_quantity(
    session: &Session,
    product_name: &str,
    quantity: u32,
) -> SuiteResult<()> {
    info!(product = %product_name, quantity, "update product quantity");
    let page = open_cart(session).await?;
    if !page.modify_quantity(product_name, quantity).await? {
        return Err(postcondition_failed(
            session,
            "update_product_quantity",
            format!("'{product_name}' in cart"),
            "absent",
        )
        .await);
    }
    let shown = page.product_quantity(product_name).await?.unwrap_or_default();
    ensure(
        session,
        "update_product_quantity",
        shown == quantity.to_string(),
        quantity.to_string(),
        shown.clone(),
    )
    .await?;
    info!(product = %product_name, quantity, "product quantity updated");
    Ok(())
}

/// Remove `product_name` and require it to be gone from the listing
///
/// Asking to remove a product that is not in the cart leaves the cart as it
/// was and fails with a postcondition error.
pub async fn remove_product_from_cart(session: &Session, product_name: &str) -> SuiteResult<()> {
    info!(product = %product_name, "remove product from cart");
    let page = open_cart(session).await?;
    if !page.remove_product(product_name).await? {
        return Err(postcondition_failed(
            session,
            "remove_product_from_cart",
            format!("'{product_name}' in cart"),
            "absent",
        )
        .await);
    }
    let remaining = page.list_products().await?;
    ensure(
        session,
        "remove_product_from_cart",
        !remaining.iter().any(|name| name == product_name),
        format!("'{product_name}' removed"),
        format!("cart still lists {remaining:?}"),
    )
    .await?;
    info!(product = %product_name, "product removed");
    Ok(())
}
