//! Page objects for the storefront.
//!
//! A page object owns no browser state: it borrows the [`Session`] and
//! exposes one method per user-visible interaction, each built on the
//! synchronized action layer. Triggers that start a page transition return
//! only once the transition is observable.

pub mod cart;
pub mod checkout;
pub mod login;
pub mod products;
pub mod register;

pub use cart::ShoppingCartPage;
pub use checkout::{
    AddressForm, BillingAddressPage, ConfirmOrderPage, PaymentMethodPage, ShippingAddressPage,
    ShippingMethod, ShippingMethodPage,
};
pub use login::LoginPage;
pub use products::{Category, ProductCategoryPage};
pub use register::{Gender, RegisterPage, RegistrationOutcome};

use crate::locator::LocatorRegistry;
use crate::result::SuiteResult;
use crate::session::Session;
use async_trait::async_trait;

/// Common surface of every page object
#[async_trait]
pub trait PageObject: Sync {
    /// Session the page drives
    fn session(&self) -> &Session;

    /// Storefront path of the page, relative to the base URL
    fn path(&self) -> String;

    /// Locators the page uses
    fn locators(&self) -> &'static LocatorRegistry;

    /// Absolute URL of the page
    fn url(&self) -> String {
        self.session().url_for(&self.path())
    }

    /// Navigate straight to the page
    async fn open(&self) -> SuiteResult<()> {
        self.session().navigate(&self.url()).await
    }

    /// Whether the browser currently shows this page
    async fn is_current(&self) -> SuiteResult<bool> {
        let current = self.session().current_url().await?;
        Ok(current.starts_with(&self.url()))
    }
}

/// Every locator registry, one per page or checkout step
#[must_use]
pub fn registries() -> [&'static LocatorRegistry; 9] {
    [
        &register::LOCATORS,
        &login::LOCATORS,
        &products::LOCATORS,
        &cart::LOCATORS,
        &checkout::BILLING_LOCATORS,
        &checkout::SHIPPING_ADDRESS_LOCATORS,
        &checkout::SHIPPING_METHOD_LOCATORS,
        &checkout::PAYMENT_LOCATORS,
        &checkout::CONFIRM_LOCATORS,
    ]
}
