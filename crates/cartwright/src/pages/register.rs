//! Registration page.

use super::PageObject;
use crate::driver::SelectOption;
use crate::locator::LocatorRegistry;
use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;
use crate::wait::{Condition, WaitOutcome};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Registration page locators
pub mod locators {
    use crate::locator::Locator;

    pub const REGISTER_LINK: Locator = Locator::css(".ico-register");
    pub const GENDER_MALE: Locator = Locator::id("gender-male");
    pub const GENDER_FEMALE: Locator = Locator::id("gender-female");
    pub const FIRST_NAME: Locator = Locator::id("FirstName");
    pub const LAST_NAME: Locator = Locator::id("LastName");
    pub const EMAIL: Locator = Locator::id("Email");
    pub const DOB_DAY: Locator = Locator::name("DateOfBirthDay");
    pub const DOB_MONTH: Locator = Locator::name("DateOfBirthMonth");
    pub const DOB_YEAR: Locator = Locator::name("DateOfBirthYear");
    pub const COMPANY: Locator = Locator::id("Company");
    pub const NEWSLETTER: Locator = Locator::id("Newsletter");
    pub const PASSWORD: Locator = Locator::id("Password");
    pub const CONFIRM_PASSWORD: Locator = Locator::id("ConfirmPassword");
    pub const REGISTER_BUTTON: Locator = Locator::id("register-button");
    pub const RESULT: Locator = Locator::xpath("//div[@class='result']");
    pub const CONTINUE: Locator = Locator::xpath("//a[text()='Continue']");
    pub const FIELD_ERROR: Locator = Locator::css(".field-validation-error span");
    pub const SUMMARY_ERROR: Locator = Locator::css(".message-error li");
}

/// Registry of every registration page locator
pub static LOCATORS: LocatorRegistry = LocatorRegistry::new(
    "register",
    &[
        ("register_link", locators::REGISTER_LINK),
        ("gender_male", locators::GENDER_MALE),
        ("gender_female", locators::GENDER_FEMALE),
        ("first_name", locators::FIRST_NAME),
        ("last_name", locators::LAST_NAME),
        ("email", locators::EMAIL),
        ("dob_day", locators::DOB_DAY),
        ("dob_month", locators::DOB_MONTH),
        ("dob_year", locators::DOB_YEAR),
        ("company", locators::COMPANY),
        ("newsletter", locators::NEWSLETTER),
        ("password", locators::PASSWORD),
        ("confirm_password", locators::CONFIRM_PASSWORD),
        ("register_button", locators::REGISTER_BUTTON),
        ("result", locators::RESULT),
        ("continue", locators::CONTINUE),
        ("field_error", locators::FIELD_ERROR),
        ("summary_error", locators::SUMMARY_ERROR),
    ],
);

/// Text the result panel shows after a successful registration
pub const SUCCESS_TEXT: &str = "Your registration completed";

/// Gender radio choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male radio
    Male,
    /// Female radio
    Female,
}

impl FromStr for Gender {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(SuiteError::configuration(format!(
                "unknown gender '{s}' (expected male or female)"
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Male => "male",
            Self::Female => "female",
        })
    }
}

/// What the storefront did with a submitted registration form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The result panel reported success
    Completed,
    /// A validation message was shown instead
    Rejected(String),
}

/// Registration form
#[derive(Debug, Clone, Copy)]
pub struct RegisterPage<'s> {
    session: &'s Session,
}

impl PageObject for RegisterPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn path(&self) -> String {
        "register".to_string()
    }

    fn locators(&self) -> &'static LocatorRegistry {
        &LOCATORS
    }
}

impl<'s> RegisterPage<'s> {
    /// Bind the page to a session
    #[must_use]
    pub const fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Follow the header link and wait for the form
    pub async fn click_register_link(&self) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions.click(&locators::REGISTER_LINK).await?;
        actions
            .await_condition(&locators::FIRST_NAME, Condition::Visible)
            .await
            .map(drop)
    }

    /// Tick the gender radio
    pub async fn select_gender(&self, gender: Gender) -> SuiteResult<()> {
        let radio = match gender {
            Gender::Male => locators::GENDER_MALE,
            Gender::Female => locators::GENDER_FEMALE,
        };
        self.session.actions().set_checked(&radio, true).await
    }

    /// Set first name
    pub async fn enter_first_name(&self, value: &str) -> SuiteResult<()> {
        self.session
            .actions()
            .type_text(&locators::FIRST_NAME, value)
            .await
    }

    /// Set last name
    pub async fn enter_last_name(&self, value: &str) -> SuiteResult<()> {
        self.session
            .actions()
            .type_text(&locators::LAST_NAME, value)
            .await
    }

    /// Set email
    pub async fn enter_email(&self, value: &str) -> SuiteResult<()> {
        self.session.actions().type_text(&locators::EMAIL, value).await
    }

    /// Pick day, month and year of birth
    pub async fn enter_date_of_birth(&self, date: NaiveDate) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions
            .select(&locators::DOB_DAY, SelectOption::value(date.day().to_string()))
            .await?;
        actions
            .select(
                &locators::DOB_MONTH,
                SelectOption::value(date.month().to_string()),
            )
            .await?;
        actions
            .select(&locators::DOB_YEAR, SelectOption::value(date.year().to_string()))
            .await
    }

    /// Set company name
    pub async fn enter_company(&self, value: &str) -> SuiteResult<()> {
        self.session.actions().type_text(&locators::COMPANY, value).await
    }

    /// Bring the newsletter checkbox into the requested state
    pub async fn set_newsletter(&self, subscribe: bool) -> SuiteResult<()> {
        self.session
            .actions()
            .set_checked(&locators::NEWSLETTER, subscribe)
            .await
    }

    /// Set password
    pub async fn enter_password(&self, value: &str) -> SuiteResult<()> {
        self.session
            .actions()
            .type_text(&locators::PASSWORD, value)
            .await
    }

    /// Set password confirmation
    pub async fn enter_confirm_password(&self, value: &str) -> SuiteResult<()> {
        self.session
            .actions()
            .type_text(&locators::CONFIRM_PASSWORD, value)
            .await
    }

    /// Click register and wait for either the success panel or a
    /// validation message
    pub async fn submit(&self) -> SuiteResult<RegistrationOutcome> {
        let actions = self.session.actions();
        actions.click(&locators::REGISTER_BUTTON).await?;
        let success = Condition::TextContains(SUCCESS_TEXT.to_string());
        let outcome = actions
            .await_first_of(&[
                (locators::RESULT, success.clone()),
                (locators::FIELD_ERROR, Condition::Visible),
                (locators::SUMMARY_ERROR, Condition::Visible),
            ])
            .await?;
        match outcome {
            WaitOutcome::Ready((0, _)) => Ok(RegistrationOutcome::Completed),
            WaitOutcome::Ready((_, element)) => Ok(RegistrationOutcome::Rejected(element.text)),
            WaitOutcome::TimedOut { .. } => Err(SuiteError::ElementNotReady {
                locator: locators::RESULT,
                condition: success.to_string(),
                timeout_ms: actions.policy().timeout_ms(),
            }),
        }
    }

    /// Text of the first field validation message
    pub async fn field_validation_error(&self) -> SuiteResult<String> {
        self.session
            .actions()
            .read_text(&locators::FIELD_ERROR)
            .await
    }

    /// Leave the result page through its Continue link
    pub async fn click_continue(&self) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions.click(&locators::CONTINUE).await?;
        actions.await_invisible(&locators::RESULT).await
    }
}
