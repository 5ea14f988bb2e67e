//! Cartwright: page-object end-to-end suite for the nopCommerce storefront
//!
//! Drives a browser through registration, login, catalog, cart and checkout
//! journeys, synchronizing every step on observable page state instead of
//! fixed sleeps.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    CARTWRIGHT Architecture                       │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenarios  │───►│ Workflows  │───►│ Page       │            │
//! │   │ + Runner   │    │ (postcond.)│    │ Objects    │            │
//! │   └────────────┘    └────────────┘    └─────┬──────┘            │
//! │                                             ▼                   │
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Driver     │◄───│ Actions    │◄───│ Locator    │            │
//! │   │ (CDP/mock) │    │ (waits)    │    │ Registry   │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> cartwright::SuiteResult<()> {
//! use cartwright::{MockDriver, Scenario, ScenarioRunner, Session, SuiteConfig};
//!
//! let config = SuiteConfig::default().with_seed(7);
//! let session = Session::new(Box::new(MockDriver::new()), &config);
//! let report = ScenarioRunner::new()
//!     .with_seed(config.seed)
//!     .run(&session, &Scenario::matching("invalid_signup"))
//!     .await;
//! println!("{} passed", report.passed_count());
//! session.close().await
//! # }
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod actions;
#[cfg(feature = "browser")]
#[allow(clippy::missing_errors_doc, clippy::doc_markdown)]
mod browser;
mod config;
mod driver;
mod harness;
mod identity;
mod locator;
mod result;
mod session;
mod wait;

/// Tracing subscriber setup
pub mod logging;

/// Page objects, one per storefront page or checkout step
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    missing_docs
)]
pub mod pages;

/// End-to-end scenario catalog
#[allow(clippy::missing_errors_doc, missing_docs)]
pub mod scenarios;

/// Business workflows with postcondition checks
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    missing_docs
)]
pub mod workflows;

pub use actions::{Actions, SCROLL_TO_MIDDLE};
#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use config::{BrowserConfig, SuiteConfig, DEFAULT_BASE_URL, DEFAULT_SCREENSHOT_DIR};
pub use driver::{
    Driver, ElementState, MockChange, MockDriver, OptionState, SelectOption,
};
pub use harness::{ScenarioResult, ScenarioRunner, SuiteReport};
pub use identity::Identity;
pub use locator::{Locator, LocatorRegistry, Strategy};
pub use pages::{registries, PageObject};
pub use result::{SuiteError, SuiteResult};
pub use scenarios::{InvalidSignupCase, Scenario, INVALID_SIGNUP_CASES};
pub use session::Session;
pub use wait::{
    poll_until, Condition, WaitOutcome, WaitPolicy, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::actions::*;
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::harness::*;
    pub use super::identity::*;
    pub use super::locator::*;
    pub use super::pages::{
        registries, AddressForm, BillingAddressPage, Category, ConfirmOrderPage, Gender,
        LoginPage, PageObject, PaymentMethodPage, ProductCategoryPage, RegisterPage,
        RegistrationOutcome, ShippingAddressPage, ShippingMethod, ShippingMethodPage,
        ShoppingCartPage,
    };
    pub use super::result::*;
    pub use super::scenarios::*;
    pub use super::session::*;
    pub use super::wait::*;
    pub use super::workflows::*;
}
