//! Workflows: named business procedures over page objects.
//!
//! Each workflow takes a plain input record, drives its pages in a fixed
//! order and checks a postcondition before returning. An unmet postcondition
//! is a [`SuiteError::PostconditionFailed`] carrying the browser URL.

pub mod account;
pub mod cart;
pub mod checkout;

pub use account::{
    login_user, logout_user, register_user, submit_registration, LoginInput, RegistrationInput,
};
pub use cart::{
    add_product_to_cart, get_product_quantity, list_products_in_cart, open_cart,
    remove_product_from_cart, update_product_quantity, ProductPick,
};
pub use checkout::{
    checkout_from_cart, clamp_digits, confirm_order, enter_billing_address,
    enter_shipping_address, select_payment_method, select_shipping_method,
    select_shipping_method_named, AddressInput, BillingInput, CardDetails, PaymentMethod,
    ShippingAddressChoice, CARD_CODE_LEN, CARD_NUMBER_LEN,
};

use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;

/// Postcondition failure stamped with the browser's current URL
pub async fn postcondition_failed(
    session: &Session,
    workflow: &'static str,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> SuiteError {
    let url = match session.current_url().await {
        Ok(url) => url,
        Err(err) => format!("<unknown: {err}>"),
    };
    SuiteError::PostconditionFailed {
        workflow,
        expected: expected.into(),
        actual: actual.into(),
        url,
    }
}

/// Fail with [`SuiteError::PostconditionFailed`] unless `holds`
pub async fn ensure(
    session: &Session,
    workflow: &'static str,
    holds: bool,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> SuiteResult<()> {
    if holds {
        Ok(())
    } else {
        Err(postcondition_failed(session, workflow, expected, actual).await)
    }
}

/// Treat blank optional text as absent
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
