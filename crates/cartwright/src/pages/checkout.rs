//! One-page checkout steps.
//!
//! Each step is its own page object over the same `onepagecheckout` URL.
//! Every continue trigger returns only after the step's button has stopped
//! being clickable, i.e. the next step has taken over.

use super::PageObject;
use crate::driver::SelectOption;
use crate::locator::{Locator, LocatorRegistry};
use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;
use crate::wait::Condition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const CHECKOUT_PATH: &str = "onepagecheckout";

// =============================================================================
// ADDRESS FORM
// =============================================================================

/// Field locators of one address form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressLocators {
    pub first_name: Locator,
    pub last_name: Locator,
    pub email: Locator,
    pub company: Locator,
    pub country: Locator,
    pub state: Locator,
    pub city: Locator,
    pub address1: Locator,
    pub address2: Locator,
    pub zip_code: Locator,
    pub phone_number: Locator,
    pub fax_number: Locator,
}

/// Billing address form fields
pub const BILLING_FIELDS: AddressLocators = AddressLocators {
    first_name: Locator::id("BillingNewAddress_FirstName"),
    last_name: Locator::id("BillingNewAddress_LastName"),
    email: Locator::id("BillingNewAddress_Email"),
    company: Locator::id("BillingNewAddress_Company"),
    country: Locator::id("BillingNewAddress_CountryId"),
    state: Locator::id("BillingNewAddress_StateProvinceId"),
    city: Locator::id("BillingNewAddress_City"),
    address1: Locator::id("BillingNewAddress_Address1"),
    address2: Locator::id("BillingNewAddress_Address2"),
    zip_code: Locator::id("BillingNewAddress_ZipPostalCode"),
    phone_number: Locator::id("BillingNewAddress_PhoneNumber"),
    fax_number: Locator::id("BillingNewAddress_FaxNumber"),
};

/// Shipping address form fields
pub const SHIPPING_FIELDS: AddressLocators = AddressLocators {
    first_name: Locator::id("ShippingNewAddress_FirstName"),
    last_name: Locator::id("ShippingNewAddress_LastName"),
    email: Locator::id("ShippingNewAddress_Email"),
    company: Locator::id("ShippingNewAddress_Company"),
    country: Locator::id("ShippingNewAddress_CountryId"),
    state: Locator::id("ShippingNewAddress_StateProvinceId"),
    city: Locator::id("ShippingNewAddress_City"),
    address1: Locator::id("ShippingNewAddress_Address1"),
    address2: Locator::id("ShippingNewAddress_Address2"),
    zip_code: Locator::id("ShippingNewAddress_ZipPostalCode"),
    phone_number: Locator::id("ShippingNewAddress_PhoneNumber"),
    fax_number: Locator::id("ShippingNewAddress_FaxNumber"),
};

/// Setters for one address form
#[derive(Debug, Clone, Copy)]
pub struct AddressForm<'s> {
    session: &'s Session,
    fields: &'static AddressLocators,
}

impl<'s> AddressForm<'s> {
    /// Bind a form to a session
    #[must_use]
    pub const fn new(session: &'s Session, fields: &'static AddressLocators) -> Self {
        Self { session, fields }
    }

    async fn type_into(&self, locator: &Locator, value: &str) -> SuiteResult<()> {
        self.session.actions().type_text(locator, value).await
    }

    pub async fn enter_first_name(&self, value: &str) -> SuiteResult<()> {
        self.type_into(&self.fields.first_name, value).await
    }

    pub async fn enter_last_name(&self, value: &str) -> SuiteResult<()> {
        self.type_into(&self.fields.last_name, value).await
    }

    pub async fn enter_email(&self, value: &str) -> SuiteResult<()> {
        self.type_into(&self.fields.email, value).await
    }

    pub async fn enter_company(&self, value: &str) -> SuiteResult<()> {
        self.type_into(&self.fields.company, value).await
    }

    /// Pick the country by its visible name
    pub async fn select_country(&self, country: &str) -> SuiteResult<()> {
        self.session
            .actions()
            .select(&self.fields.country, SelectOption::text(country))
            .await
    }

    /// Pick the state by its visible name; waits for the country's states to load
    pub async fn select_state(&self, state: &str) -> SuiteResult<()> {
        self.session
            .actions()
            .select(&self.fields.state, SelectOption::text(state))
            .await
    }

    pub async fn enter_city(&self, value: &str) -> SuiteResult<()> {
        self.type_into(&self.fields.city, value).await
    }

    pub async fn enter_address1(&self, value: &str) -> SuiteResult<()> {
        self.type_into(&self.fields.address1, value).await
    }

    pub async fn enter_address2(&self, value: &str) -> SuiteResult<()> {
        self.type_into(&self.fields.address2, value).await
    }

    pub async fn enter_zip_code(&self, value: &str) -> SuiteResult<()> {
        self.type_into(&self.fields.zip_code, value).await
    }

    pub async fn enter_phone_number(&self, value: &str) -> SuiteResult<()> {
        self.type_into(&self.fields.phone_number, value).await
    }

    pub async fn enter_fax_number(&self, value: &str) -> SuiteResult<()> {
        self.type_into(&self.fields.fax_number, value).await
    }
}

// =============================================================================
// BILLING
// =============================================================================

/// Billing step locators
pub mod billing {
    use super::{Locator, BILLING_FIELDS};

    pub const SHIP_TO_SAME_ADDRESS: Locator = Locator::id("ShipToSameAddress");
    pub const CONTINUE: Locator =
        Locator::css("#billing-buttons-container .new-address-next-step-button");
    pub const FIRST_NAME: Locator = BILLING_FIELDS.first_name;
}

/// Billing step
#[derive(Debug, Clone, Copy)]
pub struct BillingAddressPage<'s> {
    session: &'s Session,
}

impl PageObject for BillingAddressPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn path(&self) -> String {
        CHECKOUT_PATH.to_string()
    }

    fn locators(&self) -> &'static LocatorRegistry {
        &BILLING_LOCATORS
    }
}

impl<'s> BillingAddressPage<'s> {
    /// Bind the page to a session
    #[must_use]
    pub const fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Address field setters
    #[must_use]
    pub const fn form(&self) -> AddressForm<'s> {
        AddressForm::new(self.session, &BILLING_FIELDS)
    }

    /// Bring the ship-to-same-address checkbox into the requested state
    pub async fn set_ship_to_same_address(&self, same: bool) -> SuiteResult<()> {
        self.session
            .actions()
            .set_checked(&billing::SHIP_TO_SAME_ADDRESS, same)
            .await
    }

    /// Continue and wait for the billing step to close
    pub async fn click_continue(&self) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions.click(&billing::CONTINUE).await?;
        actions.await_unclickable(&billing::CONTINUE).await
    }
}

// =============================================================================
// SHIPPING ADDRESS
// =============================================================================

/// Shipping address step locators
pub mod shipping_address {
    use super::Locator;

    pub const ADDRESS_SELECT: Locator = Locator::id("shipping-address-select");
    pub const CONTINUE: Locator = Locator::xpath(
        "//span[@id='shipping-please-wait']/preceding-sibling::button[@class='button-1 new-address-next-step-button']",
    );
}

/// Option of the address select that reveals the new-address form
pub const NEW_ADDRESS_OPTION: &str = "New Address";

/// Shipping address step
#[derive(Debug, Clone, Copy)]
pub struct ShippingAddressPage<'s> {
    session: &'s Session,
}

impl PageObject for ShippingAddressPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn path(&self) -> String {
        CHECKOUT_PATH.to_string()
    }

    fn locators(&self) -> &'static LocatorRegistry {
        &SHIPPING_ADDRESS_LOCATORS
    }
}

impl<'s> ShippingAddressPage<'s> {
    /// Bind the page to a session
    #[must_use]
    pub const fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Address field setters
    #[must_use]
    pub const fn form(&self) -> AddressForm<'s> {
        AddressForm::new(self.session, &SHIPPING_FIELDS)
    }

    /// Choose "New Address" and wait for the form
    pub async fn select_new_address(&self) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions
            .select(
                &shipping_address::ADDRESS_SELECT,
                SelectOption::text(NEW_ADDRESS_OPTION),
            )
            .await?;
        actions
            .await_condition(&SHIPPING_FIELDS.first_name, Condition::Visible)
            .await
            .map(drop)
    }

    /// Choose the first saved address, which is the billing address
    pub async fn select_billing_address(&self) -> SuiteResult<()> {
        self.session
            .actions()
            .select(&shipping_address::ADDRESS_SELECT, SelectOption::Index(0))
            .await
    }

    /// Continue and wait for the shipping address step to close
    pub async fn click_continue(&self) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions.click(&shipping_address::CONTINUE).await?;
        actions.await_unclickable(&shipping_address::CONTINUE).await
    }
}

// =============================================================================
// SHIPPING METHOD
// =============================================================================

/// Shipping method step locators
pub mod shipping_method {
    use super::Locator;

    pub const GROUND: Locator = Locator::id("shippingoption_1");
    pub const NEXT_DAY_AIR: Locator = Locator::id("shippingoption_2");
    pub const SECOND_DAY_AIR: Locator = Locator::id("shippingoption_3");
    pub const CONTINUE: Locator = Locator::css(".shipping-method-next-step-button");
}

/// Shipping method radio choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    /// "next day"
    NextDay,
    /// "2nd day"
    SecondDay,
    /// "ground"
    Ground,
}

impl ShippingMethod {
    /// Radio button for this method
    #[must_use]
    pub const fn radio(self) -> Locator {
        match self {
            Self::Ground => shipping_method::GROUND,
            Self::NextDay => shipping_method::NEXT_DAY_AIR,
            Self::SecondDay => shipping_method::SECOND_DAY_AIR,
        }
    }

    /// Canonical name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NextDay => "next day",
            Self::SecondDay => "2nd day",
            Self::Ground => "ground",
        }
    }
}

impl FromStr for ShippingMethod {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next day" => Ok(Self::NextDay),
            "2nd day" => Ok(Self::SecondDay),
            "ground" => Ok(Self::Ground),
            _ => Err(SuiteError::configuration(format!(
                "unknown shipping method '{s}' (expected next day, 2nd day or ground)"
            ))),
        }
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shipping method step
#[derive(Debug, Clone, Copy)]
pub struct ShippingMethodPage<'s> {
    session: &'s Session,
}

impl PageObject for ShippingMethodPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn path(&self) -> String {
        CHECKOUT_PATH.to_string()
    }

    fn locators(&self) -> &'static LocatorRegistry {
        &SHIPPING_METHOD_LOCATORS
    }
}

impl<'s> ShippingMethodPage<'s> {
    /// Bind the page to a session
    #[must_use]
    pub const fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Tick the radio of `method`
    pub async fn select(&self, method: ShippingMethod) -> SuiteResult<()> {
        self.session
            .actions()
            .set_checked(&method.radio(), true)
            .await
    }

    /// Continue and wait for the shipping method step to close
    pub async fn click_continue(&self) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions.click(&shipping_method::CONTINUE).await?;
        actions.await_unclickable(&shipping_method::CONTINUE).await
    }
}

// =============================================================================
// PAYMENT
// =============================================================================

/// Payment method and payment info locators
pub mod payment {
    use super::Locator;

    pub const CHECK_MONEY_ORDER: Locator = Locator::id("paymentmethod_0");
    pub const CREDIT_CARD: Locator = Locator::id("paymentmethod_1");
    pub const METHOD_CONTINUE: Locator = Locator::css(".payment-method-next-step-button");
    pub const INFO_CONTINUE: Locator = Locator::css(".payment-info-next-step-button");
    pub const CARD_TYPE: Locator = Locator::id("CreditCardType");
    pub const CARDHOLDER_NAME: Locator = Locator::id("CardholderName");
    pub const CARD_NUMBER: Locator = Locator::id("CardNumber");
    pub const EXPIRE_MONTH: Locator = Locator::id("ExpireMonth");
    pub const EXPIRE_YEAR: Locator = Locator::id("ExpireYear");
    pub const CARD_CODE: Locator = Locator::id("CardCode");
}

/// Payment step: method radios plus the card form of the info step
#[derive(Debug, Clone, Copy)]
pub struct PaymentMethodPage<'s> {
    session: &'s Session,
}

impl PageObject for PaymentMethodPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn path(&self) -> String {
        CHECKOUT_PATH.to_string()
    }

    fn locators(&self) -> &'static LocatorRegistry {
        &PAYMENT_LOCATORS
    }
}

impl<'s> PaymentMethodPage<'s> {
    /// Bind the page to a session
    #[must_use]
    pub const fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Tick "Check / Money Order"
    pub async fn select_check_money_order(&self) -> SuiteResult<()> {
        self.session
            .actions()
            .set_checked(&payment::CHECK_MONEY_ORDER, true)
            .await
    }

    /// Tick "Credit Card"
    pub async fn select_credit_card(&self) -> SuiteResult<()> {
        self.session
            .actions()
            .set_checked(&payment::CREDIT_CARD, true)
            .await
    }

    /// Continue past the method radios
    pub async fn click_continue_method(&self) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions.click(&payment::METHOD_CONTINUE).await?;
        actions.await_unclickable(&payment::METHOD_CONTINUE).await
    }

    /// Pick the card brand by option value
    pub async fn select_card_type(&self, card_type: &str) -> SuiteResult<()> {
        self.session
            .actions()
            .select(&payment::CARD_TYPE, SelectOption::value(card_type))
            .await
    }

    pub async fn enter_cardholder_name(&self, value: &str) -> SuiteResult<()> {
        self.session
            .actions()
            .type_text(&payment::CARDHOLDER_NAME, value)
            .await
    }

    pub async fn enter_card_number(&self, value: &str) -> SuiteResult<()> {
        self.session
            .actions()
            .type_text(&payment::CARD_NUMBER, value)
            .await
    }

    /// Pick the expiry month by option value (`1`..`12`)
    pub async fn select_expire_month(&self, month: u32) -> SuiteResult<()> {
        self.session
            .actions()
            .select(&payment::EXPIRE_MONTH, SelectOption::value(month.to_string()))
            .await
    }

    /// Pick the expiry year by option value
    pub async fn select_expire_year(&self, year: i32) -> SuiteResult<()> {
        self.session
            .actions()
            .select(&payment::EXPIRE_YEAR, SelectOption::value(year.to_string()))
            .await
    }

    pub async fn enter_card_code(&self, value: &str) -> SuiteResult<()> {
        self.session
            .actions()
            .type_text(&payment::CARD_CODE, value)
            .await
    }

    /// Continue past the payment info step
    pub async fn click_continue_info(&self) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions.click(&payment::INFO_CONTINUE).await?;
        actions.await_unclickable(&payment::INFO_CONTINUE).await
    }
}

// =============================================================================
// CONFIRM ORDER
// =============================================================================

/// Confirm step locators
pub mod confirm {
    use super::Locator;

    pub const CONFIRM: Locator = Locator::css(".confirm-order-next-step-button");
    pub const SUCCESS_MESSAGE: Locator = Locator::css(".section.order-completed .title strong");
    pub const COMPLETED_CONTINUE: Locator = Locator::css(".order-completed-continue-button");
}

/// Title shown once the order is placed
pub const ORDER_COMPLETED_TEXT: &str = "Your order has been successfully processed!";

/// Confirm step and the completion page after it
#[derive(Debug, Clone, Copy)]
pub struct ConfirmOrderPage<'s> {
    session: &'s Session,
}

impl PageObject for ConfirmOrderPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn path(&self) -> String {
        CHECKOUT_PATH.to_string()
    }

    fn locators(&self) -> &'static LocatorRegistry {
        &CONFIRM_LOCATORS
    }
}

impl<'s> ConfirmOrderPage<'s> {
    /// Bind the page to a session
    #[must_use]
    pub const fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Place the order and wait for the completion title
    pub async fn click_confirm(&self) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions.click(&confirm::CONFIRM).await?;
        actions
            .await_condition(&confirm::SUCCESS_MESSAGE, Condition::Visible)
            .await
            .map(drop)
    }

    /// Completion title text
    pub async fn success_message(&self) -> SuiteResult<String> {
        self.session
            .actions()
            .read_text(&confirm::SUCCESS_MESSAGE)
            .await
    }

    /// Leave the completion page
    pub async fn click_continue(&self) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions.click(&confirm::COMPLETED_CONTINUE).await?;
        actions
            .await_unclickable(&confirm::COMPLETED_CONTINUE)
            .await
    }
}

// =============================================================================
// REGISTRIES
// =============================================================================

macro_rules! address_registry {
    ($page:literal, $fields:expr, [$(($name:literal, $extra:expr)),* $(,)?]) => {
        LocatorRegistry::new(
            $page,
            &[
                $(($name, $extra),)*
                ("first_name", $fields.first_name),
                ("last_name", $fields.last_name),
                ("email", $fields.email),
                ("company", $fields.company),
                ("country", $fields.country),
                ("state", $fields.state),
                ("city", $fields.city),
                ("address1", $fields.address1),
                ("address2", $fields.address2),
                ("zip_code", $fields.zip_code),
                ("phone_number", $fields.phone_number),
                ("fax_number", $fields.fax_number),
            ],
        )
    };
}

/// Registry of the billing step
pub static BILLING_LOCATORS: LocatorRegistry = address_registry!(
    "billing_address",
    BILLING_FIELDS,
    [
        ("ship_to_same_address", billing::SHIP_TO_SAME_ADDRESS),
        ("continue", billing::CONTINUE),
    ]
);

/// Registry of the shipping address step
pub static SHIPPING_ADDRESS_LOCATORS: LocatorRegistry = address_registry!(
    "shipping_address",
    SHIPPING_FIELDS,
    [
        ("address_select", shipping_address::ADDRESS_SELECT),
        ("continue", shipping_address::CONTINUE),
    ]
);

/// Registry of the shipping method step
pub static SHIPPING_METHOD_LOCATORS: LocatorRegistry = LocatorRegistry::new(
    "shipping_method",
    &[
        ("ground", shipping_method::GROUND),
        ("next_day_air", shipping_method::NEXT_DAY_AIR),
        ("second_day_air", shipping_method::SECOND_DAY_AIR),
        ("continue", shipping_method::CONTINUE),
    ],
);

/// Registry of the payment steps
pub static PAYMENT_LOCATORS: LocatorRegistry = LocatorRegistry::new(
    "payment_method",
    &[
        ("check_money_order", payment::CHECK_MONEY_ORDER),
        ("credit_card", payment::CREDIT_CARD),
        ("method_continue", payment::METHOD_CONTINUE),
        ("info_continue", payment::INFO_CONTINUE),
        ("card_type", payment::CARD_TYPE),
        ("cardholder_name", payment::CARDHOLDER_NAME),
        ("card_number", payment::CARD_NUMBER),
        ("expire_month", payment::EXPIRE_MONTH),
        ("expire_year", payment::EXPIRE_YEAR),
        ("card_code", payment::CARD_CODE),
    ],
);

/// Registry of the confirm step
pub static CONFIRM_LOCATORS: LocatorRegistry = LocatorRegistry::new(
    "confirm_order",
    &[
        ("confirm", confirm::CONFIRM),
        ("success_message", confirm::SUCCESS_MESSAGE),
        ("completed_continue", confirm::COMPLETED_CONTINUE),
    ],
);
