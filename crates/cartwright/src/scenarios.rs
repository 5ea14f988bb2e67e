//! Scenario catalog: end-to-end user journeys over the workflows.
//!
//! Every scenario signs out first and provisions its own freshly generated
//! identity, so scenarios can run in any order on one session.

use crate::identity::Identity;
use crate::pages::{Category, RegistrationOutcome, ShippingMethod};
use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;
use crate::workflows::{
    self, add_product_to_cart, checkout_from_cart, confirm_order, enter_billing_address,
    enter_shipping_address, get_product_quantity, list_products_in_cart, login_user, logout_user,
    register_user, remove_product_from_cart, select_payment_method, select_shipping_method,
    submit_registration, update_product_quantity, BillingInput, PaymentMethod, ProductPick,
    RegistrationInput, ShippingAddressChoice,
};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Billing country used by the checkout scenarios
pub const BILLING_COUNTRY: &str = "Angola";

/// Shipping country used when a separate shipping address is entered
pub const SHIPPING_COUNTRY: &str = "Armenia";

/// One row of the invalid registration table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvalidSignupCase {
    /// Slug used in the scenario name
    pub slug: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub confirm_password: &'static str,
    /// Substring the validation message must contain
    pub expected_error: &'static str,
}

impl InvalidSignupCase {
    /// Registration input of this row
    #[must_use]
    pub fn input(&self) -> RegistrationInput {
        RegistrationInput::new(self.first_name, self.last_name, self.email, self.password)
            .with_confirm_password(self.confirm_password)
    }
}

/// Rejected registrations and the message each must produce
pub const INVALID_SIGNUP_CASES: &[InvalidSignupCase] = &[
    InvalidSignupCase {
        slug: "first_name_empty",
        first_name: "",
        last_name: "Larson",
        email: "brian@example.net",
        password: "password",
        confirm_password: "password",
        expected_error: "First name is required.",
    },
    InvalidSignupCase {
        slug: "last_name_empty",
        first_name: "Brian",
        last_name: "",
        email: "larson@example.net",
        password: "password",
        confirm_password: "password",
        expected_error: "Last name is required.",
    },
    InvalidSignupCase {
        slug: "invalid_email",
        first_name: "Brian",
        last_name: "Larson",
        email: "brian_larson.net",
        password: "password",
        confirm_password: "password",
        expected_error: "Wrong email",
    },
    InvalidSignupCase {
        slug: "password_empty",
        first_name: "Brian",
        last_name: "Larson",
        email: "brianlarson1@example.net",
        password: "",
        confirm_password: "",
        expected_error: "Password is required.",
    },
    InvalidSignupCase {
        slug: "confirm_password_empty",
        first_name: "Brian",
        last_name: "Larson",
        email: "brianlarson2@example.net",
        password: "password",
        confirm_password: "",
        expected_error: "Password is required.",
    },
    InvalidSignupCase {
        slug: "short_password",
        first_name: "Brian",
        last_name: "Larson",
        email: "brianlarson3@example.net",
        password: "pass",
        confirm_password: "password",
        expected_error: "Password must meet the following rules",
    },
    InvalidSignupCase {
        slug: "password_mismatch",
        first_name: "Brian",
        last_name: "Larson",
        email: "brianlarson4@example.net",
        password: "password",
        confirm_password: "password1",
        expected_error: "The password and confirmation password do not match.",
    },
];

/// A runnable user journey
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Register, land on the home page, sign in
    SignupAndLogin,
    /// Register, sign in, buy a book shipped to a separate address by cheque
    SignupAndCheckout,
    /// Sign in as an already registered user and buy a book paid in cash
    ExistingUserCheckout,
    /// Fill, inspect, update and prune the cart
    CartFunctionality,
    /// Submit one rejected registration
    InvalidSignup(&'static InvalidSignupCase),
}

impl Scenario {
    /// Every scenario in run order
    #[must_use]
    pub fn catalog() -> Vec<Self> {
        let mut all = vec![
            Self::SignupAndLogin,
            Self::SignupAndCheckout,
            Self::ExistingUserCheckout,
            Self::CartFunctionality,
        ];
        all.extend(INVALID_SIGNUP_CASES.iter().map(Self::InvalidSignup));
        all
    }

    /// Scenarios whose name equals `filter`, or whose family does
    /// (`invalid_signup` selects every table row)
    #[must_use]
    pub fn matching(filter: &str) -> Vec<Self> {
        let filter = filter.trim();
        Self::catalog()
            .into_iter()
            .filter(|s| s.name() == filter || s.family() == filter)
            .collect()
    }

    /// Family name shared by parameterized scenarios
    #[must_use]
    pub const fn family(&self) -> &'static str {
        match self {
            Self::SignupAndLogin => "signup_and_login",
            Self::SignupAndCheckout => "signup_and_checkout",
            Self::ExistingUserCheckout => "existing_user_checkout",
            Self::CartFunctionality => "cart_functionality",
            Self::InvalidSignup(_) => "invalid_signup",
        }
    }

    /// Stable unique name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::InvalidSignup(case) => format!("{}[{}]", self.family(), case.slug),
            _ => self.family().to_string(),
        }
    }

    /// One-line description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::SignupAndLogin => "register a new user, then sign in with the same credentials",
            Self::SignupAndCheckout => {
                "register, sign in and order a book shipped to a new address, paid by cheque"
            }
            Self::ExistingUserCheckout => {
                "sign in as a registered user and order a book shipped to the billing address"
            }
            Self::CartFunctionality => {
                "add one product per category, update the book quantity, remove the download"
            }
            Self::InvalidSignup(_) => "submit a registration the storefront must reject",
        }
    }

    /// Run the journey on `session`
    pub async fn run(&self, session: &Session, rng: &mut StdRng) -> SuiteResult<()> {
        info!(scenario = %self, "scenario start");
        logout_user(session).await?;
        match self {
            Self::SignupAndLogin => signup_and_login(session, rng).await,
            Self::SignupAndCheckout => signup_and_checkout(session, rng).await,
            Self::ExistingUserCheckout => existing_user_checkout(session, rng).await,
            Self::CartFunctionality => cart_functionality(session, rng).await,
            Self::InvalidSignup(case) => invalid_signup(session, case).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Scenario {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::catalog()
            .into_iter()
            .find(|scenario| scenario.name() == wanted)
            .ok_or_else(|| SuiteError::configuration(format!("unknown scenario '{s}'")))
    }
}

// =============================================================================
// JOURNEYS
// =============================================================================

async fn expect_home_page(session: &Session, scenario: &'static str) -> SuiteResult<()> {
    let url = session.current_url().await?;
    workflows::ensure(
        session,
        scenario,
        url == session.home_url(),
        session.home_url(),
        url.clone(),
    )
    .await
}

/// Register a fresh identity and leave the session signed out
async fn provision_account(session: &Session, rng: &mut StdRng) -> SuiteResult<Identity> {
    let identity = Identity::generate(rng);
    register_user(session, &identity.registration()).await?;
    logout_user(session).await?;
    Ok(identity)
}

async fn signup_and_login(session: &Session, rng: &mut StdRng) -> SuiteResult<()> {
    let identity = Identity::generate(rng);
    register_user(session, &identity.registration()).await?;
    expect_home_page(session, "signup_and_login").await?;
    login_user(session, &identity.login()).await
}

async fn signup_and_checkout(session: &Session, rng: &mut StdRng) -> SuiteResult<()> {
    let identity = Identity::generate(rng);
    register_user(session, &identity.registration()).await?;
    expect_home_page(session, "signup_and_checkout").await?;
    login_user(session, &identity.login()).await?;

    add_product_to_cart(session, Category::Books, ProductPick::Random, rng).await?;
    checkout_from_cart(session).await?;

    let billing = BillingInput::new(identity.address(BILLING_COUNTRY), false);
    enter_billing_address(session, &billing).await?;
    let recipient = Identity::generate(rng);
    let shipping = recipient
        .address(SHIPPING_COUNTRY)
        .with_email(&identity.email);
    enter_shipping_address(session, &ShippingAddressChoice::New(shipping)).await?;
    select_shipping_method(session, ShippingMethod::NextDay).await?;
    select_payment_method(session, &PaymentMethod::Cheque).await?;
    confirm_order(session).await?;
    expect_home_page(session, "signup_and_checkout").await
}

async fn existing_user_checkout(session: &Session, rng: &mut StdRng) -> SuiteResult<()> {
    let identity = provision_account(session, rng).await?;
    login_user(session, &identity.login()).await?;

    add_product_to_cart(session, Category::Books, ProductPick::Random, rng).await?;
    checkout_from_cart(session).await?;

    let billing = BillingInput::new(identity.address(BILLING_COUNTRY), true);
    enter_billing_address(session, &billing).await?;
    select_shipping_method(session, ShippingMethod::NextDay).await?;
    select_payment_method(session, &PaymentMethod::Cash).await?;
    confirm_order(session).await
}

async fn cart_functionality(session: &Session, rng: &mut StdRng) -> SuiteResult<()> {
    let identity = provision_account(session, rng).await?;
    login_user(session, &identity.login()).await?;

    let download =
        add_product_to_cart(session, Category::DigitalDownloads, ProductPick::Random, rng).await?;
    let phone = add_product_to_cart(session, Category::CellPhones, ProductPick::Random, rng).await?;
    let book = add_product_to_cart(session, Category::Books, ProductPick::Random, rng).await?;

    let expected: BTreeSet<String> = [download.clone(), phone, book.clone()].into();
    let listed: BTreeSet<String> = list_products_in_cart(session).await?.into_iter().collect();
    workflows::ensure(
        session,
        "cart_functionality",
        listed == expected,
        format!("{expected:?}"),
        format!("{listed:?}"),
    )
    .await?;

    let quantity: u32 = rng.gen_range(2..=10);
    update_product_quantity(session, &book, quantity).await?;
    let shown = get_product_quantity(session, &book).await?;
    workflows::ensure(
        session,
        "cart_functionality",
        shown == quantity.to_string(),
        quantity.to_string(),
        shown.clone(),
    )
    .await?;

    remove_product_from_cart(session, &download).await?;
    let remaining = list_products_in_cart(session).await?;
    workflows::ensure(
        session,
        "cart_functionality",
        !remaining.contains(&download),
        format!("'{download}' absent"),
        format!("{remaining:?}"),
    )
    .await
}

async fn invalid_signup(session: &Session, case: &InvalidSignupCase) -> SuiteResult<()> {
    let message = match submit_registration(session, &case.input()).await? {
        RegistrationOutcome::Rejected(message) => message,
        RegistrationOutcome::Completed => "registration completed".to_string(),
    };
    workflows::ensure(
        session,
        "invalid_signup",
        message.contains(case.expected_error),
        format!("validation error containing '{}'", case.expected_error),
        message.clone(),
    )
    .await
}
