//! Product category listing and product detail.

use super::PageObject;
use crate::driver::ElementState;
use crate::locator::LocatorRegistry;
use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;
use crate::wait::Condition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product listing and detail locators
pub mod locators {
    use crate::locator::Locator;

    pub const PRODUCT_ITEM: Locator = Locator::css(".product-item");
    pub const PRODUCT_LINK: Locator = Locator::css(".product-item .product-title a");
    pub const ADD_TO_CART: Locator = Locator::css(".add-to-cart-button");
    pub const NOTIFICATION: Locator = Locator::css(".bar-notification.success p");
    pub const NOTIFICATION_CLOSE: Locator = Locator::css(".bar-notification.success .close");
    pub const PRODUCT_NAME: Locator = Locator::css(".product-name h1");
}

/// Registry of every product page locator
pub static LOCATORS: LocatorRegistry = LocatorRegistry::new(
    "products",
    &[
        ("product_item", locators::PRODUCT_ITEM),
        ("product_link", locators::PRODUCT_LINK),
        ("add_to_cart", locators::ADD_TO_CART),
        ("notification", locators::NOTIFICATION),
        ("notification_close", locators::NOTIFICATION_CLOSE),
        ("product_name", locators::PRODUCT_NAME),
    ],
);

/// Notification text shown after a successful add-to-cart
pub const ADDED_TO_CART_TEXT: &str = "The product has been added to your shopping cart";

/// Storefront product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// `/books`
    Books,
    /// `/cell-phones`
    CellPhones,
    /// `/digital-downloads`
    DigitalDownloads,
}

impl Category {
    /// Every category
    pub const ALL: [Self; 3] = [Self::Books, Self::CellPhones, Self::DigitalDownloads];

    /// Storefront path of the listing
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::CellPhones => "cell-phones",
            Self::DigitalDownloads => "digital-downloads",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Category {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|c| c.path() == wanted)
            .ok_or_else(|| SuiteError::configuration(format!("unknown product category '{s}'")))
    }
}

/// Listing of one category plus the detail page reached from it
#[derive(Debug, Clone, Copy)]
pub struct ProductCategoryPage<'s> {
    session: &'s Session,
    category: Category,
}

impl PageObject for ProductCategoryPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn path(&self) -> String {
        self.category.path().to_string()
    }

    fn locators(&self) -> &'static LocatorRegistry {
        &LOCATORS
    }
}

impl<'s> ProductCategoryPage<'s> {
    /// Bind the page to a session
    #[must_use]
    pub const fn new(session: &'s Session, category: Category) -> Self {
        Self { session, category }
    }

    /// Category shown by this page
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Wait until every product tile is rendered
    pub async fn product_tiles(&self) -> SuiteResult<Vec<ElementState>> {
        let actions = self.session.actions();
        actions.scroll_to_middle().await?;
        actions.await_all_visible(&locators::PRODUCT_ITEM).await
    }

    /// Open the detail page of the `index`-th tile
    pub async fn open_product(&self, index: usize) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions.click_nth(&locators::PRODUCT_LINK, index).await?;
        actions
            .await_condition(&locators::ADD_TO_CART, Condition::Visible)
            .await
            .map(drop)
    }

    /// Click add-to-cart and return the notification text once shown
    pub async fn click_add_to_cart(&self) -> SuiteResult<String> {
        let actions = self.session.actions();
        actions.click(&locators::ADD_TO_CART).await?;
        actions.read_text(&locators::NOTIFICATION).await
    }

    /// Dismiss the notification bar
    pub async fn close_notification(&self) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions.click(&locators::NOTIFICATION_CLOSE).await?;
        actions.await_invisible(&locators::NOTIFICATION).await
    }

    /// Title of the open product
    pub async fn product_name(&self) -> SuiteResult<String> {
        self.session
            .actions()
            .read_text(&locators::PRODUCT_NAME)
            .await
    }
}
