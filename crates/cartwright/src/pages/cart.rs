//! Shopping cart page.
//!
//! Rows are addressed by product display name. The storefront renders no
//! stable product id, so the name column, quantity inputs and remove buttons
//! are matched by position within the cart table. Two rows with the same
//! name cannot be told apart and fail with [`SuiteError::AmbiguousProduct`].

use super::PageObject;
use crate::locator::LocatorRegistry;
use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;
use crate::wait::{Condition, WaitOutcome};

/// Cart page locators
pub mod locators {
    use crate::locator::Locator;

    pub const CART_LINK: Locator = Locator::css(".ico-cart");
    pub const CHECKOUT_BUTTON: Locator = Locator::css(".checkout-button");
    pub const TERMS_OF_SERVICE: Locator = Locator::id("termsofservice");
    pub const PRODUCT_NAME: Locator = Locator::css(".cart tbody tr .product-name");
    pub const QUANTITY_INPUT: Locator = Locator::css(".cart tbody tr .qty-input");
    pub const REMOVE_BUTTON: Locator = Locator::css(".cart tbody tr .remove-btn");
    pub const UPDATE_CART: Locator = Locator::css(".update-cart-button");
    pub const LOADING_IMAGE: Locator = Locator::css(".loading-image");
    pub const EMPTY_CART: Locator = Locator::css(".order-summary-content .no-data");
}

/// Registry of every cart page locator
pub static LOCATORS: LocatorRegistry = LocatorRegistry::new(
    "cart",
    &[
        ("cart_link", locators::CART_LINK),
        ("checkout_button", locators::CHECKOUT_BUTTON),
        ("terms_of_service", locators::TERMS_OF_SERVICE),
        ("product_name", locators::PRODUCT_NAME),
        ("quantity_input", locators::QUANTITY_INPUT),
        ("remove_button", locators::REMOVE_BUTTON),
        ("update_cart", locators::UPDATE_CART),
        ("loading_image", locators::LOADING_IMAGE),
        ("empty_cart", locators::EMPTY_CART),
    ],
);

/// Shopping cart
#[derive(Debug, Clone, Copy)]
pub struct ShoppingCartPage<'s> {
    session: &'s Session,
}

impl PageObject for ShoppingCartPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn path(&self) -> String {
        "cart".to_string()
    }

    fn locators(&self) -> &'static LocatorRegistry {
        &LOCATORS
    }
}

impl<'s> ShoppingCartPage<'s> {
    /// Bind the page to a session
    #[must_use]
    pub const fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Follow the header cart link
    pub async fn click_cart_link(&self) -> SuiteResult<()> {
        self.session.actions().click(&locators::CART_LINK).await
    }

    /// Product names in row order; empty when the cart shows its empty marker
    pub async fn list_products(&self) -> SuiteResult<Vec<String>> {
        let actions = self.session.actions();
        let outcome = actions
            .await_first_of(&[
                (locators::PRODUCT_NAME, Condition::Present),
                (locators::EMPTY_CART, Condition::Present),
            ])
            .await?;
        match outcome {
            WaitOutcome::Ready((0, _)) => Ok(actions
                .snapshot(&locators::PRODUCT_NAME)
                .await?
                .into_iter()
                .map(|row| row.text)
                .collect()),
            WaitOutcome::Ready(_) => Ok(Vec::new()),
            WaitOutcome::TimedOut { .. } => Err(SuiteError::ElementNotReady {
                locator: locators::PRODUCT_NAME,
                condition: Condition::Present.to_string(),
                timeout_ms: actions.policy().timeout_ms(),
            }),
        }
    }

    /// Row index of `product_name`, if listed
    pub async fn find_row(&self, product_name: &str) -> SuiteResult<Option<usize>> {
        let names = self.list_products().await?;
        let mut rows = names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.as_str() == product_name)
            .map(|(row, _)| row);
        match (rows.next(), rows.count()) {
            (None, _) => Ok(None),
            (Some(row), 0) => Ok(Some(row)),
            (Some(_), more) => Err(SuiteError::AmbiguousProduct {
                name: product_name.to_string(),
                count: more + 1,
            }),
        }
    }

    /// Displayed quantity of `product_name`, if listed
    pub async fn product_quantity(&self, product_name: &str) -> SuiteResult<Option<String>> {
        match self.find_row(product_name).await? {
            Some(row) => Ok(Some(
                self.session
                    .actions()
                    .read_value_nth(&locators::QUANTITY_INPUT, row)
                    .await?,
            )),
            None => Ok(None),
        }
    }

    /// Set the quantity of `product_name` and submit the cart
    ///
    /// Returns `false` without touching the page when the product is not listed.
    pub async fn modify_quantity(&self, product_name: &str, quantity: u32) -> SuiteResult<bool> {
        let Some(row) = self.find_row(product_name).await? else {
            return Ok(false);
        };
        let actions = self.session.actions();
        let quantity = quantity.to_string();
        actions
            .type_nth(&locators::QUANTITY_INPUT, row, &quantity)
            .await?;
        self.click_update_cart().await?;
        Ok(true)
    }

    /// Remove the row of `product_name` and submit the cart
    ///
    /// Returns `false` without touching the page when the product is not listed.
    pub async fn remove_product(&self, product_name: &str) -> SuiteResult<bool> {
        let Some(row) = self.find_row(product_name).await? else {
            return Ok(false);
        };
        let actions = self.session.actions();
        actions.click_nth(&locators::REMOVE_BUTTON, row).await?;
        // removing the last row replaces the form with the empty marker
        let outcome = actions
            .await_first_of(&[
                (locators::UPDATE_CART, Condition::Clickable),
                (locators::EMPTY_CART, Condition::Present),
            ])
            .await?;
        match outcome {
            WaitOutcome::Ready((0, _)) => self.click_update_cart().await?,
            WaitOutcome::Ready(_) => {}
            WaitOutcome::TimedOut { .. } => {
                return Err(SuiteError::ElementNotReady {
                    locator: locators::UPDATE_CART,
                    condition: Condition::Clickable.to_string(),
                    timeout_ms: actions.policy().timeout_ms(),
                })
            }
        }
        Ok(true)
    }

    /// Submit the cart form and wait for the refresh to finish
    ///
    /// Returns once the storefront has re-rendered the quantity inputs, so a
    /// later read sees the server's value rather than the typed one.
    pub async fn click_update_cart(&self) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions
            .click_and_await_rerender(&locators::UPDATE_CART, &locators::QUANTITY_INPUT)
            .await?;
        actions.await_invisible(&locators::LOADING_IMAGE).await
    }

    /// Tick or untick the terms of service checkbox
    pub async fn set_terms_of_service(&self, accepted: bool) -> SuiteResult<()> {
        self.session
            .actions()
            .set_checked(&locators::TERMS_OF_SERVICE, accepted)
            .await
    }

    /// Start checkout and wait until the cart's checkout button is gone
    pub async fn click_checkout(&self) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions.scroll_to_middle().await?;
        actions.click(&locators::CHECKOUT_BUTTON).await?;
        actions.await_unclickable(&locators::CHECKOUT_BUTTON).await
    }
}
