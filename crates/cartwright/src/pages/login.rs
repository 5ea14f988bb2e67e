//! Login page.

use super::PageObject;
use crate::locator::LocatorRegistry;
use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;
use crate::wait::{poll_until, Condition, WaitOutcome};

/// Login page locators
pub mod locators {
    use crate::locator::Locator;

    pub const EMAIL: Locator = Locator::id("Email");
    pub const PASSWORD: Locator = Locator::id("Password");
    pub const REMEMBER_ME: Locator = Locator::id("RememberMe");
    pub const LOGIN_BUTTON: Locator = Locator::css(".login-button");
    pub const LOGOUT_LINK: Locator = Locator::css(".ico-logout");
    pub const LOGIN_ERROR: Locator = Locator::css(".message-error");
}

/// Registry of every login page locator
pub static LOCATORS: LocatorRegistry = LocatorRegistry::new(
    "login",
    &[
        ("email", locators::EMAIL),
        ("password", locators::PASSWORD),
        ("remember_me", locators::REMEMBER_ME),
        ("login_button", locators::LOGIN_BUTTON),
        ("logout_link", locators::LOGOUT_LINK),
        ("login_error", locators::LOGIN_ERROR),
    ],
);

/// Login form plus the header logout link
#[derive(Debug, Clone, Copy)]
pub struct LoginPage<'s> {
    session: &'s Session,
}

impl PageObject for LoginPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn path(&self) -> String {
        "login".to_string()
    }

    fn locators(&self) -> &'static LocatorRegistry {
        &LOCATORS
    }
}

impl<'s> LoginPage<'s> {
    /// Bind the page to a session
    #[must_use]
    pub const fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Set email
    pub async fn enter_email(&self, value: &str) -> SuiteResult<()> {
        self.session.actions().type_text(&locators::EMAIL, value).await
    }

    /// Set password
    pub async fn enter_password(&self, value: &str) -> SuiteResult<()> {
        self.session
            .actions()
            .type_text(&locators::PASSWORD, value)
            .await
    }

    /// Bring the remember-me checkbox into the requested state
    pub async fn set_remember_me(&self, remember: bool) -> SuiteResult<()> {
        self.session
            .actions()
            .set_checked(&locators::REMEMBER_ME, remember)
            .await
    }

    /// Submit and wait for either a completed sign-in or a login error
    ///
    /// Sign-in counts as completed once the login form has gone and the logout
    /// link shows, so a header left over from an earlier sign-in cannot answer
    /// for this submit. Returns the error summary text when the storefront
    /// rejected the credentials.
    pub async fn click_login(&self) -> SuiteResult<Option<String>> {
        let actions = self.session.actions();
        actions
            .click_and_await_rerender(&locators::LOGIN_BUTTON, &locators::LOGIN_BUTTON)
            .await?;
        let outcome = poll_until(actions.policy(), || async move {
            let error = actions.snapshot(&locators::LOGIN_ERROR).await?;
            if let Some(error) = error.into_iter().find(|e| e.visible) {
                return Ok(Some(Some(error.text)));
            }
            let signed_in = actions.is_visible(&locators::LOGOUT_LINK).await?;
            let form_gone = !actions.is_visible(&locators::LOGIN_BUTTON).await?;
            Ok((signed_in && form_gone).then_some(None))
        })
        .await?;
        match outcome {
            WaitOutcome::Ready(result) => Ok(result),
            WaitOutcome::TimedOut { .. } => Err(SuiteError::ElementNotReady {
                locator: locators::LOGOUT_LINK,
                condition: Condition::Visible.to_string(),
                timeout_ms: actions.policy().timeout_ms(),
            }),
        }
    }

    /// Single probe of the header logout link
    pub async fn is_logged_in(&self) -> SuiteResult<bool> {
        self.session
            .actions()
            .is_visible(&locators::LOGOUT_LINK)
            .await
    }

    /// Click logout and wait for the link to disappear
    pub async fn click_logout(&self) -> SuiteResult<()> {
        let actions = self.session.actions();
        actions.click(&locators::LOGOUT_LINK).await?;
        actions.await_invisible(&locators::LOGOUT_LINK).await
    }
}
