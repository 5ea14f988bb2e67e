//! In-memory storefront behind the `Driver` seam.
//!
//! `FakeShop` renders each storefront page as an element table keyed by the
//! same locator constants the page objects use, and reacts to clicks the way
//! the live site does: registration validation, login, catalog, cart and the
//! one-page checkout steps. Handles are cheap clones sharing one state, so a
//! test keeps one handle while the session owns another.

#![allow(dead_code)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use async_trait::async_trait;
use cartwright::pages::cart::locators as cart;
use cartwright::pages::checkout::{
    billing, confirm, payment, shipping_address, shipping_method, AddressLocators,
    BILLING_FIELDS, SHIPPING_FIELDS,
};
use cartwright::pages::login::locators as login;
use cartwright::pages::products::locators as products;
use cartwright::pages::register::locators as register;
use cartwright::{
    Driver, ElementState, Locator, OptionState, SelectOption, Session, SuiteConfig, SuiteError,
    SuiteResult, WaitPolicy,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const BASE_URL: &str = "https://shop.test/";

pub const BOOKS: &[&str] = &[
    "Fahrenheit 451 by Ray Bradbury",
    "First Prize Pies",
    "Pride and Prejudice",
];

pub const CELL_PHONES: &[&str] = &[
    "HTC One M8 Android L 5.0 Lollipop",
    "HTC One Mini Blue",
    "Nokia Lumia 1020",
];

pub const DOWNLOADS: &[&str] = &["If You Wait (donation)", "Night Visions", "Science & Faith"];

const CATEGORIES: [(&str, &[&str]); 3] = [
    ("books", BOOKS),
    ("cell-phones", CELL_PHONES),
    ("digital-downloads", DOWNLOADS),
];

const COUNTRIES: &[(&str, &str)] = &[
    ("Select country", "0"),
    ("United States", "1"),
    ("Angola", "5"),
    ("Armenia", "7"),
];

const CARD_TYPES: &[&str] = &["Visa", "MasterCard", "Discover", "Amex"];

const GENDERS: &[Locator] = &[register::GENDER_MALE, register::GENDER_FEMALE];

const SHIPPING_OPTIONS: &[(Locator, &str)] = &[
    (shipping_method::GROUND, "Ground"),
    (shipping_method::NEXT_DAY_AIR, "Next Day Air"),
    (shipping_method::SECOND_DAY_AIR, "2nd Day Air"),
];

const PAYMENT_OPTIONS: &[(Locator, &str)] = &[
    (payment::CHECK_MONEY_ORDER, "Check / Money Order"),
    (payment::CREDIT_CARD, "Credit Card"),
];

/// Registered customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub newsletter: bool,
    pub date_of_birth: Option<(String, String, String)>,
}

/// Address as submitted in a checkout step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacedAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country: String,
    pub city: String,
    pub address1: String,
    pub zip_code: String,
    pub phone_number: String,
}

/// Card fields as submitted in the payment info step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedCard {
    pub card_type: String,
    pub holder_name: String,
    pub number: String,
    pub expire_month: String,
    pub expire_year: String,
    pub code: String,
}

/// Order placed through the confirm step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub customer: String,
    pub items: Vec<(String, u32)>,
    pub billing: PlacedAddress,
    pub shipping: PlacedAddress,
    pub shipping_method: String,
    pub payment_method: String,
    pub card: Option<PlacedCard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Billing,
    ShippingAddress,
    ShippingMethod,
    PaymentMethod,
    PaymentInfo,
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum View {
    #[default]
    Blank,
    Home,
    Register,
    RegisterResult,
    Login,
    Category(usize),
    Product(usize, usize),
    Cart,
    Checkout(Step),
    Completed,
    Unknown,
}

#[derive(Debug, Default)]
struct Draft {
    billing: PlacedAddress,
    shipping: Option<PlacedAddress>,
    shipping_method: String,
    payment_method: String,
    card: Option<PlacedCard>,
}

#[derive(Debug, Default)]
struct ShopState {
    url: String,
    view: View,
    dom: HashMap<Locator, Vec<ElementState>>,
    accounts: Vec<Account>,
    signed_in: Option<String>,
    carts: HashMap<String, Vec<(String, u32)>>,
    draft: Draft,
    orders: Vec<Order>,
    probes: usize,
    latency: usize,
    reveal_at: usize,
    completion_title: Option<String>,
    max_quantity: Option<u32>,
    renders: usize,
    marks: HashMap<Locator, usize>,
    history: Vec<String>,
}

/// Simulated nopCommerce storefront
#[derive(Debug, Clone, Default)]
pub struct FakeShop {
    state: Arc<Mutex<ShopState>>,
}

impl FakeShop {
    pub fn new() -> Self {
        let shop = Self::default();
        shop.lock().url = "about:blank".to_string();
        shop
    }

    fn lock(&self) -> MutexGuard<'_, ShopState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Newly rendered pages stay empty for this many probes
    pub fn with_latency(self, probes: usize) -> Self {
        self.lock().latency = probes;
        self
    }

    /// Cap every cart line at `max` when the cart is updated
    pub fn with_max_quantity(self, max: u32) -> Self {
        self.lock().max_quantity = Some(max);
        self
    }

    /// Replace the order completion title
    pub fn with_completion_title(self, title: &str) -> Self {
        self.lock().completion_title = Some(title.to_string());
        self
    }

    /// Register an account directly, as if created in an earlier run
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.lock().accounts.push(Account {
            email: email.to_string(),
            password: password.to_string(),
            first_name: "Existing".to_string(),
            last_name: "Customer".to_string(),
            company: String::new(),
            newsletter: false,
            date_of_birth: None,
        });
        self
    }

    /// Session over a handle to this shop with a short wait policy
    pub fn session(&self, screenshots: &Path) -> Session {
        let config = SuiteConfig::default()
            .with_base_url(BASE_URL)
            .with_wait(WaitPolicy::new(250, 2).unwrap())
            .with_screenshot_dir(screenshots);
        Session::new(Box::new(self.clone()), &config)
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.lock().accounts.clone()
    }

    pub fn signed_in(&self) -> Option<String> {
        self.lock().signed_in.clone()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.lock().orders.clone()
    }

    /// Cart lines of the signed in customer
    pub fn cart(&self) -> Vec<(String, u32)> {
        let state = self.lock();
        state.carts.get(&state.cart_key()).cloned().unwrap_or_default()
    }

    /// Seed the signed in customer's cart
    pub fn put_in_cart(&self, name: &str, quantity: u32) {
        let mut state = self.lock();
        let key = state.cart_key();
        state
            .carts
            .entry(key)
            .or_default()
            .push((name.to_string(), quantity));
        state.render();
    }

    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// Calls that changed the page: clicks, typing, selects and navigation
    pub fn mutation_count(&self) -> usize {
        self.lock()
            .history
            .iter()
            .filter(|call| !call.starts_with("script:"))
            .count()
    }

    pub fn url(&self) -> String {
        self.lock().url.clone()
    }

    pub fn value(&self, locator: &Locator) -> Option<String> {
        self.lock().element(locator).and_then(|e| e.value.clone())
    }

    pub fn is_checked(&self, locator: &Locator) -> bool {
        self.lock().element(locator).is_some_and(|e| e.selected)
    }

    /// Put the session on the shop's home page, signed in as a fresh account
    pub fn sign_in_as(&self, email: &str) {
        let mut state = self.lock();
        if !state.accounts.iter().any(|a| a.email == email) {
            state.accounts.push(Account {
                email: email.to_string(),
                password: "secret123".to_string(),
                first_name: "Signed".to_string(),
                last_name: "In".to_string(),
                company: String::new(),
                newsletter: false,
                date_of_birth: None,
            });
        }
        state.signed_in = Some(email.to_string());
        state.go("");
    }

    /// Jump straight to a page without recording a navigation
    pub fn show(&self, path: &str) {
        self.lock().go(path);
    }
}

// =============================================================================
// RENDERING
// =============================================================================

fn text_input() -> ElementState {
    ElementState::text_input()
}

fn password_input() -> ElementState {
    ElementState::new("input").with_type("password").with_value("")
}

fn button(text: &str) -> ElementState {
    ElementState::new("button").with_text(text)
}

fn link(text: &str) -> ElementState {
    ElementState::new("a").with_text(text)
}

fn numbered_select(placeholder: &str, range: std::ops::RangeInclusive<i32>) -> ElementState {
    let mut options = vec![OptionState::new(placeholder, "0")];
    options.extend(range.map(|n| OptionState::new(n.to_string(), n.to_string())));
    ElementState::select(options)
}

fn country_select() -> ElementState {
    ElementState::select(
        COUNTRIES
            .iter()
            .map(|(text, value)| OptionState::new(*text, *value))
            .collect(),
    )
}

fn country_name(value: &str) -> String {
    COUNTRIES
        .iter()
        .find(|(_, v)| *v == value)
        .map(|(text, _)| (*text).to_string())
        .unwrap_or_default()
}

fn valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

impl ShopState {
    fn cart_key(&self) -> String {
        self.signed_in.clone().unwrap_or_default()
    }

    fn cart_mut(&mut self) -> &mut Vec<(String, u32)> {
        let key = self.cart_key();
        self.carts.entry(key).or_default()
    }

    fn element(&self, locator: &Locator) -> Option<&ElementState> {
        self.dom.get(locator).and_then(|elements| elements.first())
    }

    fn element_mut(&mut self, locator: &Locator, index: usize) -> SuiteResult<&mut ElementState> {
        self.dom
            .get_mut(locator)
            .and_then(|elements| elements.get_mut(index))
            .ok_or(SuiteError::StaleElement {
                locator: *locator,
                index,
            })
    }

    fn value(&self, locator: &Locator) -> String {
        self.element(locator)
            .and_then(|e| e.value.clone())
            .unwrap_or_default()
    }

    fn checked(&self, locator: &Locator) -> bool {
        self.element(locator).is_some_and(|e| e.selected)
    }

    fn put(&mut self, locator: Locator, element: ElementState) {
        self.dom.entry(locator).or_default().push(element);
    }

    fn go(&mut self, path: &str) {
        self.url = format!("{BASE_URL}{path}");
        self.view = self.route(path);
        if self.view == View::Checkout(Step::Billing) {
            self.draft = Draft::default();
        }
        self.render();
    }

    fn show(&mut self, path: &str, view: View) {
        self.url = format!("{BASE_URL}{path}");
        self.view = view;
        self.render();
    }

    fn route(&self, path: &str) -> View {
        match path {
            "" => View::Home,
            "register" => View::Register,
            "login" => View::Login,
            "cart" => View::Cart,
            "onepagecheckout"
                if self.signed_in.is_some()
                    && self.carts.get(&self.cart_key()).is_some_and(|c| !c.is_empty()) =>
            {
                View::Checkout(Step::Billing)
            }
            other => CATEGORIES
                .iter()
                .position(|(slug, _)| *slug == other)
                .map_or(View::Unknown, View::Category),
        }
    }

    fn render(&mut self) {
        self.renders += 1;
        self.dom.clear();
        self.reveal_at = self.probes + self.latency;
        if matches!(self.view, View::Blank | View::Unknown) {
            return;
        }
        if self.signed_in.is_some() {
            self.put(login::LOGOUT_LINK, link("Log out"));
        } else {
            self.put(register::REGISTER_LINK, link("Register"));
        }
        self.put(cart::CART_LINK, link("Shopping cart"));

        let view = self.view;
        match view {
            View::Blank | View::Unknown | View::Home => {}
            View::Register => self.render_register(),
            View::RegisterResult => {
                self.put(
                    register::RESULT,
                    ElementState::new("div").with_text("Your registration completed"),
                );
                self.put(register::CONTINUE, link("Continue"));
            }
            View::Login => {
                self.put(login::EMAIL, text_input());
                self.put(login::PASSWORD, password_input());
                self.put(login::REMEMBER_ME, ElementState::checkbox());
                self.put(login::LOGIN_BUTTON, button("Log in"));
            }
            View::Category(category) => {
                for name in CATEGORIES[category].1 {
                    self.put(products::PRODUCT_ITEM, ElementState::new("div").with_text(*name));
                    self.put(products::PRODUCT_LINK, link(name));
                }
            }
            View::Product(category, product) => {
                let name = CATEGORIES[category].1[product];
                self.put(products::PRODUCT_NAME, ElementState::new("h1").with_text(name));
                self.put(products::ADD_TO_CART, button("Add to cart"));
            }
            View::Cart => self.render_cart(),
            View::Checkout(step) => self.render_step(step),
            View::Completed => {
                let title = self
                    .completion_title
                    .clone()
                    .unwrap_or_else(|| "Your order has been successfully processed!".to_string());
                self.put(confirm::SUCCESS_MESSAGE, ElementState::new("strong").with_text(title));
                self.put(confirm::COMPLETED_CONTINUE, button("Continue"));
            }
        }
    }

    fn render_register(&mut self) {
        self.put(register::GENDER_MALE, ElementState::radio());
        self.put(register::GENDER_FEMALE, ElementState::radio());
        self.put(register::FIRST_NAME, text_input());
        self.put(register::LAST_NAME, text_input());
        self.put(register::DOB_DAY, numbered_select("Day", 1..=31));
        self.put(register::DOB_MONTH, numbered_select("Month", 1..=12));
        self.put(register::DOB_YEAR, numbered_select("Year", 1913..=2024));
        self.put(register::EMAIL, text_input());
        self.put(register::COMPANY, text_input());
        self.put(register::NEWSLETTER, ElementState::checkbox().with_selected(true));
        self.put(register::PASSWORD, password_input());
        self.put(register::CONFIRM_PASSWORD, password_input());
        self.put(register::REGISTER_BUTTON, button("Register"));
    }

    fn render_cart(&mut self) {
        let lines = self.carts.get(&self.cart_key()).cloned().unwrap_or_default();
        if lines.is_empty() {
            self.put(
                cart::EMPTY_CART,
                ElementState::new("div").with_text("Your Shopping Cart is empty!"),
            );
            return;
        }
        for (name, quantity) in &lines {
            self.put(cart::PRODUCT_NAME, link(name));
            self.put(cart::QUANTITY_INPUT, text_input().with_value(quantity.to_string()));
            self.put(cart::REMOVE_BUTTON, button(""));
        }
        self.put(cart::UPDATE_CART, button("Update shopping cart"));
        self.put(cart::TERMS_OF_SERVICE, ElementState::checkbox());
        self.put(cart::CHECKOUT_BUTTON, button("Checkout"));
    }

    fn render_address(&mut self, fields: &AddressLocators, visible: bool) {
        for locator in [
            fields.first_name,
            fields.last_name,
            fields.email,
            fields.company,
            fields.city,
            fields.address1,
            fields.address2,
            fields.zip_code,
            fields.phone_number,
            fields.fax_number,
        ] {
            self.put(locator, text_input().with_visible(visible));
        }
        self.put(fields.country, country_select().with_visible(visible));
        self.put(
            fields.state,
            ElementState::select(vec![OptionState::new("Other", "0")]).with_visible(visible),
        );
    }

    fn render_step(&mut self, step: Step) {
        match step {
            Step::Billing => {
                self.put(
                    billing::SHIP_TO_SAME_ADDRESS,
                    ElementState::checkbox().with_selected(true),
                );
                self.render_address(&BILLING_FIELDS, true);
                self.put(billing::CONTINUE, button("Continue"));
            }
            Step::ShippingAddress => {
                let label = format!(
                    "{} {}, {}, {}",
                    self.draft.billing.first_name,
                    self.draft.billing.last_name,
                    self.draft.billing.address1,
                    self.draft.billing.country
                );
                self.put(
                    shipping_address::ADDRESS_SELECT,
                    ElementState::select(vec![
                        OptionState::new(label, "1"),
                        OptionState::new("New Address", ""),
                    ]),
                );
                self.render_address(&SHIPPING_FIELDS, false);
                self.put(shipping_address::CONTINUE, button("Continue"));
            }
            Step::ShippingMethod => {
                for (i, (radio, _)) in SHIPPING_OPTIONS.iter().enumerate() {
                    self.put(*radio, ElementState::radio().with_selected(i == 0));
                }
                self.put(shipping_method::CONTINUE, button("Continue"));
            }
            Step::PaymentMethod => {
                for (i, (radio, _)) in PAYMENT_OPTIONS.iter().enumerate() {
                    self.put(*radio, ElementState::radio().with_selected(i == 0));
                }
                self.put(payment::METHOD_CONTINUE, button("Continue"));
            }
            Step::PaymentInfo => {
                if self.draft.payment_method == "Credit Card" {
                    self.put(
                        payment::CARD_TYPE,
                        ElementState::select(
                            CARD_TYPES.iter().map(|t| OptionState::new(*t, *t)).collect(),
                        ),
                    );
                    self.put(payment::CARDHOLDER_NAME, text_input());
                    self.put(payment::CARD_NUMBER, text_input());
                    self.put(payment::EXPIRE_MONTH, numbered_select("Month", 1..=12));
                    self.put(payment::EXPIRE_YEAR, numbered_select("Year", 2025..=2040));
                    self.put(payment::CARD_CODE, text_input());
                }
                self.put(payment::INFO_CONTINUE, button("Continue"));
            }
            Step::Confirm => self.put(confirm::CONFIRM, button("Confirm")),
        }
    }

    // =========================================================================
    // REACTIONS
    // =========================================================================

    fn react(&mut self, locator: Locator, index: usize) {
        if locator == register::REGISTER_LINK {
            self.go("register");
        } else if locator == login::LOGOUT_LINK {
            self.signed_in = None;
            self.go("");
        } else if locator == cart::CART_LINK {
            self.go("cart");
        } else if locator == register::REGISTER_BUTTON {
            self.submit_registration();
        } else if locator == register::CONTINUE || locator == confirm::COMPLETED_CONTINUE {
            self.go("");
        } else if locator == login::LOGIN_BUTTON {
            self.submit_login();
        } else if locator == products::PRODUCT_LINK {
            let view = self.view;
            if let View::Category(category) = view {
                self.show(&format!("p/{category}/{index}"), View::Product(category, index));
            }
        } else if locator == products::ADD_TO_CART {
            self.add_to_cart();
        } else if locator == products::NOTIFICATION_CLOSE {
            self.dom.remove(&products::NOTIFICATION);
            self.dom.remove(&products::NOTIFICATION_CLOSE);
        } else if locator == cart::REMOVE_BUTTON {
            let cart = self.cart_mut();
            if index < cart.len() {
                cart.remove(index);
            }
            self.render();
        } else if locator == cart::UPDATE_CART {
            self.update_cart();
        } else if locator == cart::CHECKOUT_BUTTON {
            if self.checked(&cart::TERMS_OF_SERVICE) {
                self.go("onepagecheckout");
            }
        } else if locator == billing::CONTINUE {
            self.billing_continue();
        } else if locator == shipping_address::CONTINUE {
            self.shipping_address_continue();
        } else if locator == shipping_method::CONTINUE {
            self.draft.shipping_method = self.selected_of(SHIPPING_OPTIONS);
            self.advance(Step::PaymentMethod);
        } else if locator == payment::METHOD_CONTINUE {
            self.draft.payment_method = self.selected_of(PAYMENT_OPTIONS);
            self.advance(Step::PaymentInfo);
        } else if locator == payment::INFO_CONTINUE {
            self.payment_info_continue();
        } else if locator == confirm::CONFIRM {
            self.place_order();
        }
    }

    fn check_radio(&mut self, locator: Locator) {
        let groups: [Vec<Locator>; 3] = [
            GENDERS.to_vec(),
            SHIPPING_OPTIONS.iter().map(|(l, _)| *l).collect(),
            PAYMENT_OPTIONS.iter().map(|(l, _)| *l).collect(),
        ];
        let group = groups
            .into_iter()
            .find(|g| g.contains(&locator))
            .unwrap_or_else(|| vec![locator]);
        for member in group {
            if let Some(elements) = self.dom.get_mut(&member) {
                for element in elements {
                    element.selected = member == locator;
                }
            }
        }
    }

    fn selected_of(&self, options: &[(Locator, &str)]) -> String {
        options
            .iter()
            .find(|(radio, _)| self.checked(radio))
            .map(|(_, name)| (*name).to_string())
            .unwrap_or_default()
    }

    fn advance(&mut self, step: Step) {
        self.view = View::Checkout(step);
        self.render();
    }

    fn submit_registration(&mut self) {
        let first_name = self.value(&register::FIRST_NAME);
        let last_name = self.value(&register::LAST_NAME);
        let email = self.value(&register::EMAIL);
        let password = self.value(&register::PASSWORD);
        let confirm_password = self.value(&register::CONFIRM_PASSWORD);

        let mut errors = Vec::new();
        if first_name.trim().is_empty() {
            errors.push("First name is required.");
        }
        if last_name.trim().is_empty() {
            errors.push("Last name is required.");
        }
        if email.trim().is_empty() {
            errors.push("Email is required.");
        } else if !valid_email(&email) {
            errors.push("Wrong email");
        }
        if password.is_empty() {
            errors.push("Password is required.");
        } else if password.len() < 6 {
            errors.push("Password must meet the following rules: must have at least 6 characters");
        }
        if confirm_password.is_empty() {
            errors.push("Password is required.");
        } else if confirm_password != password {
            errors.push("The password and confirmation password do not match.");
        }

        self.dom.remove(&register::FIELD_ERROR);
        self.dom.remove(&register::SUMMARY_ERROR);
        if !errors.is_empty() {
            for error in errors {
                self.put(register::FIELD_ERROR, ElementState::new("span").with_text(error));
            }
            return;
        }
        if self.accounts.iter().any(|a| a.email == email) {
            self.put(
                register::SUMMARY_ERROR,
                ElementState::new("li").with_text("The specified email already exists"),
            );
            return;
        }

        let day = self.value(&register::DOB_DAY);
        let date_of_birth = (day != "0").then(|| {
            (
                day,
                self.value(&register::DOB_MONTH),
                self.value(&register::DOB_YEAR),
            )
        });
        self.accounts.push(Account {
            email: email.clone(),
            password,
            first_name,
            last_name,
            company: self.value(&register::COMPANY),
            newsletter: self.checked(&register::NEWSLETTER),
            date_of_birth,
        });
        self.signed_in = Some(email);
        self.show("registerresult/1?returnUrl=/", View::RegisterResult);
    }

    fn submit_login(&mut self) {
        let email = self.value(&login::EMAIL);
        let password = self.value(&login::PASSWORD);
        if self
            .accounts
            .iter()
            .any(|a| a.email == email && a.password == password)
        {
            self.signed_in = Some(email);
            self.go("");
        } else {
            self.render();
            self.put(
                login::LOGIN_ERROR,
                ElementState::new("div").with_text(
                    "Login was unsuccessful. Please correct the errors and try again. \
                     No customer account found",
                ),
            );
        }
    }

    fn add_to_cart(&mut self) {
        let View::Product(category, product) = self.view else {
            return;
        };
        let name = CATEGORIES[category].1[product].to_string();
        let cart = self.cart_mut();
        match cart.iter_mut().find(|(line, _)| *line == name) {
            Some((_, quantity)) => *quantity += 1,
            None => cart.push((name, 1)),
        }
        self.put(
            products::NOTIFICATION,
            ElementState::new("p").with_text("The product has been added to your shopping cart"),
        );
        self.put(products::NOTIFICATION_CLOSE, ElementState::new("span"));
    }

    fn update_cart(&mut self) {
        let typed: Vec<String> = self
            .dom
            .get(&cart::QUANTITY_INPUT)
            .map(|inputs| {
                inputs
                    .iter()
                    .map(|e| e.value.clone().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();
        let max_quantity = self.max_quantity;
        let cart = self.cart_mut();
        for (line, value) in cart.iter_mut().zip(typed) {
            if let Ok(quantity) = value.trim().parse::<u32>() {
                line.1 = max_quantity.map_or(quantity, |max| quantity.min(max));
            }
        }
        cart.retain(|(_, quantity)| *quantity > 0);
        self.render();
    }

    fn read_address(&self, fields: &AddressLocators) -> Option<PlacedAddress> {
        let address = PlacedAddress {
            first_name: self.value(&fields.first_name),
            last_name: self.value(&fields.last_name),
            email: self.value(&fields.email),
            country: country_name(&self.value(&fields.country)),
            city: self.value(&fields.city),
            address1: self.value(&fields.address1),
            zip_code: self.value(&fields.zip_code),
            phone_number: self.value(&fields.phone_number),
        };
        let complete = [
            &address.first_name,
            &address.last_name,
            &address.email,
            &address.city,
            &address.address1,
            &address.zip_code,
            &address.phone_number,
        ]
        .iter()
        .all(|v| !v.trim().is_empty())
            && address.country != "Select country"
            && !address.country.is_empty();
        complete.then_some(address)
    }

    fn billing_continue(&mut self) {
        let Some(address) = self.read_address(&BILLING_FIELDS) else {
            return;
        };
        let same = self.checked(&billing::SHIP_TO_SAME_ADDRESS);
        self.draft.billing = address;
        if same {
            self.draft.shipping = Some(self.draft.billing.clone());
            self.advance(Step::ShippingMethod);
        } else {
            self.advance(Step::ShippingAddress);
        }
    }

    fn shipping_address_continue(&mut self) {
        let shipping = if self.value(&shipping_address::ADDRESS_SELECT).is_empty() {
            match self.read_address(&SHIPPING_FIELDS) {
                Some(address) => address,
                None => return,
            }
        } else {
            self.draft.billing.clone()
        };
        self.draft.shipping = Some(shipping);
        self.advance(Step::ShippingMethod);
    }

    fn payment_info_continue(&mut self) {
        if self.draft.payment_method == "Credit Card" {
            let card = PlacedCard {
                card_type: self.value(&payment::CARD_TYPE),
                holder_name: self.value(&payment::CARDHOLDER_NAME),
                number: self.value(&payment::CARD_NUMBER),
                expire_month: self.value(&payment::EXPIRE_MONTH),
                expire_year: self.value(&payment::EXPIRE_YEAR),
                code: self.value(&payment::CARD_CODE),
            };
            if card.number.is_empty() || card.code.is_empty() {
                return;
            }
            self.draft.card = Some(card);
        }
        self.advance(Step::Confirm);
    }

    fn place_order(&mut self) {
        let customer = self.cart_key();
        let items = std::mem::take(self.cart_mut());
        let draft = std::mem::take(&mut self.draft);
        self.orders.push(Order {
            customer,
            items,
            shipping: draft.shipping.unwrap_or_else(|| draft.billing.clone()),
            billing: draft.billing,
            shipping_method: draft.shipping_method,
            payment_method: draft.payment_method,
            card: draft.card,
        });
        let number = self.orders.len();
        self.show(&format!("checkout/completed/{number}"), View::Completed);
    }
}

// =============================================================================
// DRIVER
// =============================================================================

#[async_trait]
impl Driver for FakeShop {
    async fn navigate(&self, url: &str) -> SuiteResult<()> {
        let mut state = self.lock();
        state.history.push(format!("navigate:{url}"));
        match url.strip_prefix(BASE_URL) {
            Some(path) => state.go(path),
            None => {
                state.url = url.to_string();
                state.view = View::Unknown;
                state.render();
            }
        }
        Ok(())
    }

    async fn current_url(&self) -> SuiteResult<String> {
        Ok(self.lock().url.clone())
    }

    async fn find_elements(&self, locator: &Locator) -> SuiteResult<Vec<ElementState>> {
        let mut state = self.lock();
        state.probes += 1;
        if state.probes <= state.reveal_at {
            return Ok(Vec::new());
        }
        let mut found = state.dom.get(locator).cloned().unwrap_or_default();
        for (i, element) in found.iter_mut().enumerate() {
            element.index = i;
        }
        Ok(found)
    }

    async fn click(&self, locator: &Locator, index: usize) -> SuiteResult<()> {
        let mut state = self.lock();
        state.history.push(format!("click:{locator}#{index}"));
        let element = state.element_mut(locator, index)?;
        let input_type = element.input_type.clone();
        match input_type.as_deref() {
            Some("checkbox") => element.selected = !element.selected,
            Some("radio") => state.check_radio(*locator),
            _ => {}
        }
        state.react(*locator, index);
        Ok(())
    }

    async fn clear(&self, locator: &Locator, index: usize) -> SuiteResult<()> {
        let mut state = self.lock();
        state.history.push(format!("clear:{locator}#{index}"));
        state.element_mut(locator, index)?.value = Some(String::new());
        Ok(())
    }

    async fn send_keys(&self, locator: &Locator, index: usize, text: &str) -> SuiteResult<()> {
        let mut state = self.lock();
        state.history.push(format!("send_keys:{locator}#{index}:{text}"));
        let element = state.element_mut(locator, index)?;
        element.value.get_or_insert_with(String::new).push_str(text);
        Ok(())
    }

    async fn select_option(
        &self,
        locator: &Locator,
        index: usize,
        option: &SelectOption,
    ) -> SuiteResult<()> {
        let mut state = self.lock();
        state.history.push(format!("select:{locator}#{index}:{option}"));
        let element = state.element_mut(locator, index)?;
        let position = element
            .find_option(option)
            .ok_or_else(|| SuiteError::OptionNotFound {
                locator: *locator,
                option: option.to_string(),
            })?;
        let value = element.options[position].value.clone();
        element.value = Some(value.clone());
        if *locator == shipping_address::ADDRESS_SELECT {
            let fields = SHIPPING_FIELDS;
            for field in [
                fields.first_name,
                fields.last_name,
                fields.email,
                fields.company,
                fields.country,
                fields.state,
                fields.city,
                fields.address1,
                fields.address2,
                fields.zip_code,
                fields.phone_number,
                fields.fax_number,
            ] {
                if let Some(elements) = state.dom.get_mut(&field) {
                    for element in elements {
                        element.visible = value.is_empty();
                    }
                }
            }
        }
        Ok(())
    }

    async fn attribute(
        &self,
        locator: &Locator,
        index: usize,
        name: &str,
    ) -> SuiteResult<Option<String>> {
        let mut state = self.lock();
        let element = state.element_mut(locator, index)?;
        Ok(match name {
            "value" => element.value.clone(),
            "type" => element.input_type.clone(),
            _ => None,
        })
    }

    async fn execute_script(&self, script: &str) -> SuiteResult<serde_json::Value> {
        self.lock().history.push(format!("script:{script}"));
        Ok(serde_json::Value::Null)
    }

    async fn mark_rendered(&self, locator: &Locator) -> SuiteResult<usize> {
        let mut state = self.lock();
        let count = state.dom.get(locator).map_or(0, Vec::len);
        let renders = state.renders;
        state.marks.insert(*locator, renders);
        Ok(count)
    }

    async fn count_marked(&self, locator: &Locator) -> SuiteResult<usize> {
        let state = self.lock();
        let current = state.marks.get(locator) == Some(&state.renders);
        Ok(if current {
            state.dom.get(locator).map_or(0, Vec::len)
        } else {
            0
        })
    }

    async fn screenshot(&self) -> SuiteResult<Vec<u8>> {
        Ok(b"\x89PNG\r\n\x1a\nfake".to_vec())
    }

    async fn quit(&self) -> SuiteResult<()> {
        self.lock().history.push("quit".to_string());
        Ok(())
    }
}
