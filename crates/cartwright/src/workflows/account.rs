//! Registration, login and logout workflows.

use super::{ensure, non_blank, postcondition_failed};
use crate::pages::{Gender, LoginPage, PageObject, RegisterPage, RegistrationOutcome};
use crate::result::SuiteResult;
use crate::session::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Registration form input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub company_name: Option<String>,
    /// `None` leaves the checkbox as rendered
    #[serde(default)]
    pub subscribe_newsletter: Option<bool>,
}

impl RegistrationInput {
    /// Required fields; the confirmation repeats the password
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            confirm_password: password.clone(),
            password,
            gender: None,
            date_of_birth: None,
            company_name: None,
            subscribe_newsletter: None,
        }
    }

    #[must_use]
    pub fn with_confirm_password(mut self, confirm_password: impl Into<String>) -> Self {
        self.confirm_password = confirm_password.into();
        self
    }

    #[must_use]
    pub const fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    #[must_use]
    pub const fn with_date_of_birth(mut self, date: NaiveDate) -> Self {
        self.date_of_birth = Some(date);
        self
    }

    #[must_use]
    pub fn with_company_name(mut self, company: impl Into<String>) -> Self {
        self.company_name = Some(company.into());
        self
    }

    #[must_use]
    pub const fn with_newsletter(mut self, subscribe: bool) -> Self {
        self.subscribe_newsletter = Some(subscribe);
        self
    }
}

/// Login form input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: Option<bool>,
}

impl LoginInput {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            remember_me: None,
        }
    }

    #[must_use]
    pub const fn with_remember_me(mut self, remember: bool) -> Self {
        self.remember_me = Some(remember);
        self
    }
}

/// Fill and submit the registration form, returning what the storefront did
///
/// Starts from the home page header link. Optional fields that are absent
/// (or blank, for the company name) are left untouched.
pub async fn submit_registration(
    session: &Session,
    input: &RegistrationInput,
) -> SuiteResult<RegistrationOutcome> {
    info!(email = %input.email, "submit registration");
    let page = RegisterPage::new(session);
    session.navigate(session.home_url()).await?;
    page.click_register_link().await?;

    if let Some(gender) = input.gender {
        page.select_gender(gender).await?;
    }
    page.enter_first_name(&input.first_name).await?;
    page.enter_last_name(&input.last_name).await?;
    if let Some(date) = input.date_of_birth {
        page.enter_date_of_birth(date).await?;
    }
    page.enter_email(&input.email).await?;
    if let Some(company) = non_blank(input.company_name.as_deref()) {
        page.enter_company(company).await?;
    }
    if let Some(subscribe) = input.subscribe_newsletter {
        page.set_newsletter(subscribe).await?;
    }
    page.enter_password(&input.password).await?;
    page.enter_confirm_password(&input.confirm_password).await?;

    page.submit().await
}

/// Register a new account and return to the home page
///
/// Fails with a postcondition error when the form is rejected or the result
/// page is not under the registration URL.
pub async fn register_user(session: &Session, input: &RegistrationInput) -> SuiteResult<()> {
    let page = RegisterPage::new(session);
    match submit_registration(session, input).await? {
        RegistrationOutcome::Completed => {}
        RegistrationOutcome::Rejected(message) => {
            return Err(postcondition_failed(
                session,
                "register_user",
                "registration to complete",
                format!("rejected with '{message}'"),
            )
            .await);
        }
    }

    let url = session.current_url().await?;
    ensure(
        session,
        "register_user",
        url.starts_with(&page.url()),
        format!("URL under {}", page.url()),
        url.clone(),
    )
    .await?;

    page.click_continue().await?;
    info!(email = %input.email, "user registered");
    Ok(())
}

/// Sign in and require the logout link to show
///
/// Any account still signed in is signed out first, so the logout link can
/// only come from this login.
pub async fn login_user(session: &Session, input: &LoginInput) -> SuiteResult<()> {
    info!(email = %input.email, "login user");
    logout_user(session).await?;
    let page = LoginPage::new(session);
    page.open().await?;
    page.enter_email(&input.email).await?;
    page.enter_password(&input.password).await?;
    if let Some(remember) = input.remember_me {
        page.set_remember_me(remember).await?;
    }

    if let Some(error) = page.click_login().await? {
        return Err(postcondition_failed(session, "login_user", "logout link visible", error).await);
    }
    info!(email = %input.email, "user logged in");
    Ok(())
}

/// Sign out when signed in; returns whether a logout happened
pub async fn logout_user(session: &Session) -> SuiteResult<bool> {
    let page = LoginPage::new(session);
    if !page.is_logged_in().await? {
        return Ok(false);
    }
    info!("logout user");
    page.click_logout().await?;
    Ok(true)
}
