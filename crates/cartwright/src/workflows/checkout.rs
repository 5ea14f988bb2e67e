//! Checkout workflows, from the cart's checkout button to the placed order.

use super::{ensure, non_blank};
use crate::pages::checkout::ORDER_COMPLETED_TEXT;
use crate::pages::{
    AddressForm, BillingAddressPage, ConfirmOrderPage, PaymentMethodPage, ShippingAddressPage,
    ShippingMethod, ShippingMethodPage, ShoppingCartPage,
};
use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::cart::open_cart;

/// Digits the card number field is padded or truncated to
pub const CARD_NUMBER_LEN: usize = 18;

/// Digits the card code field is padded or truncated to
pub const CARD_CODE_LEN: usize = 3;

// =============================================================================
// INPUT RECORDS
// =============================================================================

/// Address form input shared by billing and new shipping addresses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: Option<String>,
    /// Visible country name
    pub country: String,
    /// Visible state name; skipped when absent
    pub state: Option<String>,
    pub city: String,
    pub address1: String,
    pub address2: Option<String>,
    pub zip_code: String,
    pub phone_number: String,
    pub fax_number: Option<String>,
}

impl AddressInput {
    /// Contact part of an address; location fields start empty
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    #[must_use]
    pub fn with_address1(mut self, address1: impl Into<String>) -> Self {
        self.address1 = address1.into();
        self
    }

    #[must_use]
    pub fn with_address2(mut self, address2: impl Into<String>) -> Self {
        self.address2 = Some(address2.into());
        self
    }

    #[must_use]
    pub fn with_zip_code(mut self, zip_code: impl Into<String>) -> Self {
        self.zip_code = zip_code.into();
        self
    }

    #[must_use]
    pub fn with_phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = phone.into();
        self
    }

    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    #[must_use]
    pub fn with_fax_number(mut self, fax: impl Into<String>) -> Self {
        self.fax_number = Some(fax.into());
        self
    }
}

/// Billing step input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingInput {
    pub address: AddressInput,
    /// State of the ship-to-same-address checkbox
    #[serde(default)]
    pub ship_to_same_address: bool,
}

impl BillingInput {
    #[must_use]
    pub const fn new(address: AddressInput, ship_to_same_address: bool) -> Self {
        Self {
            address,
            ship_to_same_address,
        }
    }
}

/// Which address the shipping step uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingAddressChoice {
    /// Fill the new-address form
    New(AddressInput),
    /// Reuse the first saved address
    Existing,
}

/// Card payment details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    /// Option value of the card type select (`Visa`, `MasterCard`, ...)
    pub card_type: String,
    pub holder_name: String,
    pub number: String,
    /// `1`..=`12`
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub code: String,
}

impl CardDetails {
    /// Card number as typed: clamped to [`CARD_NUMBER_LEN`] digits
    #[must_use]
    pub fn typed_number(&self) -> String {
        clamp_digits(&self.number, CARD_NUMBER_LEN)
    }

    /// Card code as typed: clamped to [`CARD_CODE_LEN`] digits
    #[must_use]
    pub fn typed_code(&self) -> String {
        clamp_digits(&self.code, CARD_CODE_LEN)
    }
}

/// Payment method choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Credit card; fills the payment info form
    Card(CardDetails),
    /// Check / money order
    Cheque,
    /// Cash; shares the check / money order radio
    Cash,
}

impl PaymentMethod {
    /// Parse a method name; `card` needs details, the others ignore them
    ///
    /// # Errors
    ///
    /// Unknown names and `card` without details are configuration errors.
    pub fn from_name(name: &str, card: Option<CardDetails>) -> SuiteResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "card" => card.map(Self::Card).ok_or_else(|| {
                SuiteError::configuration("payment method 'card' requires card details")
            }),
            "cheque" => Ok(Self::Cheque),
            "cash" => Ok(Self::Cash),
            _ => Err(SuiteError::configuration(format!(
                "unknown payment method '{name}' (expected card, cheque or cash)"
            ))),
        }
    }

    /// Canonical name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Card(_) => "card",
            Self::Cheque => "cheque",
            Self::Cash => "cash",
        }
    }
}

/// Pad `value` with trailing zeros or truncate it to exactly `len` characters
#[must_use]
pub fn clamp_digits(value: &str, len: usize) -> String {
    value.chars().chain(std::iter::repeat('0')).take(len).collect()
}

// =============================================================================
// WORKFLOWS
// =============================================================================

async fn fill_address(form: AddressForm<'_>, address: &AddressInput) -> SuiteResult<()> {
    form.enter_first_name(&address.first_name).await?;
    form.enter_last_name(&address.last_name).await?;
    form.enter_email(&address.email).await?;
    if let Some(company) = non_blank(address.company.as_deref()) {
        form.enter_company(company).await?;
    }
    form.select_country(&address.country).await?;
    if let Some(state) = non_blank(address.state.as_deref()) {
        form.select_state(state).await?;
    }
    form.enter_city(&address.city).await?;
    form.enter_address1(&address.address1).await?;
    if let Some(address2) = non_blank(address.address2.as_deref()) {
        form.enter_address2(address2).await?;
    }
    form.enter_zip_code(&address.zip_code).await?;
    form.enter_phone_number(&address.phone_number).await?;
    if let Some(fax) = non_blank(address.fax_number.as_deref()) {
        form.enter_fax_number(fax).await?;
    }
    Ok(())
}

/// Accept the terms of service and start checkout
pub async fn checkout_from_cart(session: &Session) -> SuiteResult<()> {
    info!("checkout from cart");
    open_cart(session).await?;
    let cart = ShoppingCartPage::new(session);
    cart.set_terms_of_service(true).await?;
    cart.click_checkout().await?;
    info!("checkout started");
    Ok(())
}

/// Fill the billing step and continue
pub async fn enter_billing_address(session: &Session, input: &BillingInput) -> SuiteResult<()> {
    info!(
        country = %input.address.country,
        ship_to_same_address = input.ship_to_same_address,
        "enter billing address"
    );
    let page = BillingAddressPage::new(session);
    page.set_ship_to_same_address(input.ship_to_same_address)
        .await?;
    fill_address(page.form(), &input.address).await?;
    page.click_continue().await?;
    info!("billing address entered");
    Ok(())
}

/// Fill or pick the shipping address and continue
pub async fn enter_shipping_address(
    session: &Session,
    choice: &ShippingAddressChoice,
) -> SuiteResult<()> {
    let page = ShippingAddressPage::new(session);
    match choice {
        ShippingAddressChoice::New(address) => {
            info!(country = %address.country, "enter new shipping address");
            page.select_new_address().await?;
            fill_address(page.form(), address).await?;
        }
        ShippingAddressChoice::Existing => {
            info!("reuse billing address for shipping");
            page.select_billing_address().await?;
        }
    }
    page.click_continue().await?;
    info!("shipping address entered");
    Ok(())
}

/// Tick a shipping method and continue
pub async fn select_shipping_method(session: &Session, method: ShippingMethod) -> SuiteResult<()> {
    info!(%method, "select shipping method");
    let page = ShippingMethodPage::new(session);
    page.select(method).await?;
    page.click_continue().await?;
    info!("shipping method selected");
    Ok(())
}

/// Parse a shipping method name, then select it
///
/// An unknown name fails before the browser is touched.
pub async fn select_shipping_method_named(session: &Session, name: &str) -> SuiteResult<()> {
    let method = name.parse::<ShippingMethod>()?;
    select_shipping_method(session, method).await
}

/// Pick a payment method, fill card details when paying by card, and
/// continue past the payment info step
pub async fn select_payment_method(session: &Session, method: &PaymentMethod) -> SuiteResult<()> {
    info!(method = method.name(), "select payment method");
    let page = PaymentMethodPage::new(session);
    match method {
        PaymentMethod::Card(card) => {
            page.select_credit_card().await?;
            page.click_continue_method().await?;
            page.select_card_type(&card.card_type).await?;
            page.enter_cardholder_name(&card.holder_name).await?;
            page.enter_card_number(&card.typed_number()).await?;
            page.select_expire_month(card.expiry_month).await?;
            page.select_expire_year(card.expiry_year).await?;
            page.enter_card_code(&card.typed_code()).await?;
        }
        PaymentMethod::Cheque | PaymentMethod::Cash => {
            page.select_check_money_order().await?;
            page.click_continue_method().await?;
        }
    }
    page.click_continue_info().await?;
    info!("payment method selected");
    Ok(())
}

/// Place the order, require the exact completion title, and leave the
/// completion page
pub async fn confirm_order(session: &Session) -> SuiteResult<()> {
    info!("confirm order");
    let page = ConfirmOrderPage::new(session);
    page.click_confirm().await?;
    let message = page.success_message().await?;
    ensure(
        session,
        "confirm_order",
        message == ORDER_COMPLETED_TEXT,
        ORDER_COMPLETED_TEXT,
        message.clone(),
    )
    .await?;
    page.click_continue().await?;
    info!("order confirmed");
    Ok(())
}
