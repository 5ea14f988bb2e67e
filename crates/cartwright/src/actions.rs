//! Synchronized action layer.
//!
//! Every interaction resolves its element through a bounded wait right before
//! acting on it. Nothing here holds on to an element between calls, and a
//! timeout surfaces as [`SuiteError::ElementNotReady`] without retrying the
//! interaction.

use crate::driver::{Driver, ElementState, SelectOption};
use crate::locator::Locator;
use crate::result::{SuiteError, SuiteResult};
use crate::wait::{poll_until, Condition, WaitOutcome, WaitPolicy};
use std::fmt;
use tracing::debug;

/// Script that scrolls the page halfway down, bringing lazy content into view
pub const SCROLL_TO_MIDDLE: &str = "window.scrollTo(0, document.body.scrollHeight / 2);";

/// Wait-then-act helpers over a driver
#[derive(Clone, Copy)]
pub struct Actions<'s> {
    driver: &'s dyn Driver,
    policy: WaitPolicy,
}

impl fmt::Debug for Actions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actions")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<'s> Actions<'s> {
    /// Bind a driver to a wait policy
    #[must_use]
    pub const fn new(driver: &'s dyn Driver, policy: WaitPolicy) -> Self {
        Self { driver, policy }
    }

    /// Same driver, different policy for the calls made through the copy
    #[must_use]
    pub const fn with_policy(self, policy: WaitPolicy) -> Self {
        Self {
            driver: self.driver,
            policy,
        }
    }

    /// Active wait policy
    #[must_use]
    pub const fn policy(&self) -> WaitPolicy {
        self.policy
    }

    // =========================================================================
    // Probing and waiting
    // =========================================================================

    async fn probe(&self, locator: &Locator, index: usize) -> SuiteResult<Option<ElementState>> {
        Ok(self.driver.find_elements(locator).await?.into_iter().nth(index))
    }

    async fn settle(
        &self,
        locator: &Locator,
        index: usize,
        condition: &Condition,
        require_present: bool,
    ) -> SuiteResult<WaitOutcome<Option<ElementState>>> {
        let outcome = poll_until(self.policy, || async move {
            let element = self.probe(locator, index).await?;
            let holds = condition.holds(element.as_ref()) && (element.is_some() || !require_present);
            Ok(holds.then_some(element))
        })
        .await?;
        if let WaitOutcome::TimedOut { elapsed } = &outcome {
            debug!(%locator, index, %condition, ?elapsed, "wait timed out");
        }
        Ok(outcome)
    }

    fn not_ready(&self, locator: &Locator, condition: &Condition) -> SuiteError {
        SuiteError::ElementNotReady {
            locator: *locator,
            condition: condition.to_string(),
            timeout_ms: self.policy.timeout_ms(),
        }
    }

    /// Poll the first match without failing on timeout
    ///
    /// `Ready(None)` is only possible for conditions that hold on absence.
    pub async fn poll(
        &self,
        locator: &Locator,
        condition: &Condition,
    ) -> SuiteResult<WaitOutcome<Option<ElementState>>> {
        self.settle(locator, 0, condition, false).await
    }

    /// Wait until the first match exists and satisfies `condition`
    pub async fn await_condition(
        &self,
        locator: &Locator,
        condition: Condition,
    ) -> SuiteResult<ElementState> {
        self.await_nth(locator, 0, condition).await
    }

    /// Wait until the `index`-th match exists and satisfies `condition`
    pub async fn await_nth(
        &self,
        locator: &Locator,
        index: usize,
        condition: Condition,
    ) -> SuiteResult<ElementState> {
        match self.settle(locator, index, &condition, true).await? {
            WaitOutcome::Ready(Some(element)) => Ok(element),
            _ => Err(self.not_ready(locator, &condition)),
        }
    }

    /// Wait until nothing matches or the first match is hidden
    pub async fn await_invisible(&self, locator: &Locator) -> SuiteResult<()> {
        let condition = Condition::Invisible;
        self.settle(locator, 0, &condition, false)
            .await?
            .or_else_err(|| self.not_ready(locator, &condition))
            .map(drop)
    }

    /// Click `trigger`, then wait until the page has replaced every node of
    /// `region` that existed before the click
    ///
    /// Use this when the triggered change leaves the old page looking the same
    /// as the new one, such as a form post that echoes back typed values.
    pub async fn click_and_await_rerender(
        &self,
        trigger: &Locator,
        region: &Locator,
    ) -> SuiteResult<()> {
        let marked = self.driver.mark_rendered(region).await?;
        self.click(trigger).await?;
        if marked == 0 {
            return Ok(());
        }
        let outcome = poll_until(self.policy, || async move {
            Ok((self.driver.count_marked(region).await? == 0).then_some(()))
        })
        .await?;
        if let WaitOutcome::TimedOut { elapsed } = &outcome {
            debug!(%region, ?elapsed, "re-render timed out");
        }
        outcome.or_else_err(|| SuiteError::ElementNotReady {
            locator: *region,
            condition: "re-rendered".to_string(),
            timeout_ms: self.policy.timeout_ms(),
        })
    }

    /// Wait until nothing matches or the first match can no longer be clicked
    pub async fn await_unclickable(&self, locator: &Locator) -> SuiteResult<()> {
        let condition = Condition::NotClickable;
        self.settle(locator, 0, &condition, false)
            .await?
            .or_else_err(|| self.not_ready(locator, &condition))
            .map(drop)
    }

    /// Wait until at least one element matches and all matches are visible
    pub async fn await_all_visible(&self, locator: &Locator) -> SuiteResult<Vec<ElementState>> {
        let outcome = poll_until(self.policy, || async move {
            let elements = self.driver.find_elements(locator).await?;
            let ready = !elements.is_empty() && elements.iter().all(|e| e.visible);
            Ok(ready.then_some(elements))
        })
        .await?;
        outcome.or_else_err(|| self.not_ready(locator, &Condition::Visible))
    }

    /// Race several candidates; the first whose condition holds wins
    ///
    /// Returns the winning candidate's position and its element. Only
    /// candidates with a present element can win.
    pub async fn await_first_of(
        &self,
        candidates: &[(Locator, Condition)],
    ) -> SuiteResult<WaitOutcome<(usize, ElementState)>> {
        poll_until(self.policy, || async move {
            for (position, (locator, condition)) in candidates.iter().enumerate() {
                if let Some(element) = self.probe(locator, 0).await? {
                    if condition.holds(Some(&element)) {
                        return Ok(Some((position, element)));
                    }
                }
            }
            Ok(None)
        })
        .await
    }

    /// Single probe: whether the first match is visible right now
    pub async fn is_visible(&self, locator: &Locator) -> SuiteResult<bool> {
        Ok(self.probe(locator, 0).await?.is_some_and(|e| e.visible))
    }

    /// Single probe: every current match
    pub async fn snapshot(&self, locator: &Locator) -> SuiteResult<Vec<ElementState>> {
        self.driver.find_elements(locator).await
    }

    // =========================================================================
    // Interactions
    // =========================================================================

    /// Click the first match once it is clickable
    pub async fn click(&self, locator: &Locator) -> SuiteResult<()> {
        self.click_nth(locator, 0).await
    }

    /// Click the `index`-th match once it is clickable
    pub async fn click_nth(&self, locator: &Locator, index: usize) -> SuiteResult<()> {
        self.await_nth(locator, index, Condition::Clickable).await?;
        debug!(%locator, index, "click");
        self.driver.click(locator, index).await
    }

    /// Replace the first match's content with `text`
    pub async fn type_text(&self, locator: &Locator, text: &str) -> SuiteResult<()> {
        self.type_nth(locator, 0, text).await
    }

    /// Replace the `index`-th match's content with `text`
    ///
    /// The field is always cleared first, so repeated calls never append.
    pub async fn type_nth(&self, locator: &Locator, index: usize, text: &str) -> SuiteResult<()> {
        self.await_nth(locator, index, Condition::Clickable).await?;
        debug!(%locator, index, len = text.len(), "type");
        self.driver.clear(locator, index).await?;
        if !text.is_empty() {
            self.driver.send_keys(locator, index, text).await?;
        }
        Ok(())
    }

    /// Pick an option of a select element, waiting for the option to load
    pub async fn select(&self, locator: &Locator, option: SelectOption) -> SuiteResult<()> {
        self.await_condition(locator, Condition::Clickable).await?;
        self.await_condition(locator, Condition::HasOption(option.clone()))
            .await?;
        debug!(%locator, %option, "select");
        self.driver.select_option(locator, 0, &option).await
    }

    /// Rendered text of the first match once visible
    pub async fn read_text(&self, locator: &Locator) -> SuiteResult<String> {
        Ok(self.await_condition(locator, Condition::Visible).await?.text)
    }

    /// Form value of the `index`-th match once present
    pub async fn read_value_nth(&self, locator: &Locator, index: usize) -> SuiteResult<String> {
        let element = self.await_nth(locator, index, Condition::Present).await?;
        Ok(element.value.unwrap_or_default())
    }

    /// Bring a checkbox or radio into the requested state
    ///
    /// Reads the current state first and clicks only on mismatch, then waits
    /// for the new state to show. Calling it twice equals calling it once.
    pub async fn set_checked(&self, locator: &Locator, checked: bool) -> SuiteResult<()> {
        let element = self.await_condition(locator, Condition::Clickable).await?;
        if element.selected == checked {
            debug!(%locator, checked, "already in requested state");
            return Ok(());
        }
        debug!(%locator, checked, "toggle");
        self.driver.click(locator, 0).await?;
        self.await_condition(locator, Condition::Checked(checked))
            .await
            .map(drop)
    }

    /// Scroll halfway down the page
    pub async fn scroll_to_middle(&self) -> SuiteResult<()> {
        self.driver.execute_script(SCROLL_TO_MIDDLE).await.map(drop)
    }
}
