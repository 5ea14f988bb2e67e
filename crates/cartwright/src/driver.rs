//! Driver - abstract browser automation seam
//!
//! Every operation is addressed by `(Locator, index)` and resolved again on
//! each call. No element handle outlives a single driver call, so a page
//! re-render can never leave the suite holding a stale reference.
//!
//! # Implementations
//!
//! - `ChromiumDriver` - real Chromium over CDP (feature `browser`)
//! - `MockDriver` - scriptable in-memory DOM for unit tests

use crate::locator::Locator;
use crate::result::{SuiteError, SuiteResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One option of a `<select>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionState {
    /// Visible option text
    pub text: String,
    /// Submitted option value
    pub value: String,
}

impl OptionState {
    /// Create an option
    #[must_use]
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

/// Snapshot of one matched element at the moment it was probed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    /// Position among the locator's matches
    #[serde(default)]
    pub index: usize,
    /// Lower-case tag name
    pub tag: String,
    /// `type` attribute for inputs
    #[serde(default)]
    pub input_type: Option<String>,
    /// Trimmed rendered text
    #[serde(default)]
    pub text: String,
    /// Current form value, when the element has one
    #[serde(default)]
    pub value: Option<String>,
    /// Rendered with a non-empty box
    pub visible: bool,
    /// Not disabled
    pub enabled: bool,
    /// Checked checkbox/radio or selected option
    #[serde(default)]
    pub selected: bool,
    /// Options of a select element
    #[serde(default)]
    pub options: Vec<OptionState>,
}

impl ElementState {
    /// Visible, enabled element with the given tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            index: 0,
            tag: tag.into(),
            input_type: None,
            text: String::new(),
            value: None,
            visible: true,
            enabled: true,
            selected: false,
            options: Vec::new(),
        }
    }

    /// Text input with an empty value
    #[must_use]
    pub fn text_input() -> Self {
        Self::new("input").with_type("text").with_value("")
    }

    /// Unchecked checkbox
    #[must_use]
    pub fn checkbox() -> Self {
        Self::new("input").with_type("checkbox")
    }

    /// Unchecked radio button
    #[must_use]
    pub fn radio() -> Self {
        Self::new("input").with_type("radio")
    }

    /// Select element with the given options; the first is selected
    #[must_use]
    pub fn select(options: Vec<OptionState>) -> Self {
        let value = options.first().map(|o| o.value.clone()).unwrap_or_default();
        Self {
            options,
            ..Self::new("select").with_value(value)
        }
    }

    /// Set the input type
    #[must_use]
    pub fn with_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    /// Set rendered text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set form value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set visibility
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set enabled state
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set checked/selected state
    #[must_use]
    pub const fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Visible and enabled
    #[must_use]
    pub const fn is_clickable(&self) -> bool {
        self.visible && self.enabled
    }

    /// Whether a select element offers the given option
    #[must_use]
    pub fn has_option(&self, option: &SelectOption) -> bool {
        self.find_option(option).is_some()
    }

    /// Position of the given option among the select's options
    #[must_use]
    pub fn find_option(&self, option: &SelectOption) -> Option<usize> {
        match option {
            SelectOption::Text(text) => self.options.iter().position(|o| o.text.trim() == text),
            SelectOption::Value(value) => self.options.iter().position(|o| &o.value == value),
            SelectOption::Index(i) => (*i < self.options.len()).then_some(*i),
        }
    }

    fn is_checkable(&self) -> bool {
        matches!(self.input_type.as_deref(), Some("checkbox" | "radio"))
    }
}

/// How to pick an option of a select element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectOption {
    /// Match by trimmed visible text
    Text(String),
    /// Match by value attribute
    Value(String),
    /// Match by position
    Index(usize),
}

impl SelectOption {
    /// Select by visible text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Select by value attribute
    #[must_use]
    pub fn value(value: impl Into<String>) -> Self {
        Self::Value(value.into())
    }
}

impl fmt::Display for SelectOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => write!(f, "text '{t}'"),
            Self::Value(v) => write!(f, "value '{v}'"),
            Self::Index(i) => write!(f, "index {i}"),
        }
    }
}

/// Abstract driver trait for browser automation
///
/// Implementations resolve the locator on every call. Interaction methods
/// fail with [`SuiteError::StaleElement`] when the `index`-th match no longer
/// exists and never retry on their own.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate to URL and wait for the load event
    async fn navigate(&self, url: &str) -> SuiteResult<()>;

    /// Get current URL
    async fn current_url(&self) -> SuiteResult<String>;

    /// Snapshot every element matching the locator
    async fn find_elements(&self, locator: &Locator) -> SuiteResult<Vec<ElementState>>;

    /// Click the `index`-th match
    async fn click(&self, locator: &Locator, index: usize) -> SuiteResult<()>;

    /// Clear the value of the `index`-th match
    async fn clear(&self, locator: &Locator, index: usize) -> SuiteResult<()>;

    /// Append keystrokes to the `index`-th match
    async fn send_keys(&self, locator: &Locator, index: usize, text: &str) -> SuiteResult<()>;

    /// Select an option of the `index`-th match
    async fn select_option(
        &self,
        locator: &Locator,
        index: usize,
        option: &SelectOption,
    ) -> SuiteResult<()>;

    /// Read an attribute of the `index`-th match
    async fn attribute(
        &self,
        locator: &Locator,
        index: usize,
        name: &str,
    ) -> SuiteResult<Option<String>>;

    /// Execute JavaScript in page context
    async fn execute_script(&self, script: &str) -> SuiteResult<serde_json::Value>;

    /// Tag every current match of `locator`; returns how many were tagged
    ///
    /// The tag lives on the node itself, so a re-render that replaces the
    /// node drops it.
    async fn mark_rendered(&self, locator: &Locator) -> SuiteResult<usize>;

    /// Number of current matches of `locator` that still carry the tag
    async fn count_marked(&self, locator: &Locator) -> SuiteResult<usize>;

    /// Capture the viewport as PNG bytes
    async fn screenshot(&self) -> SuiteResult<Vec<u8>>;

    /// Close the browser
    async fn quit(&self) -> SuiteResult<()>;
}

/// A change applied to the mock DOM
#[derive(Debug, Clone)]
pub enum MockChange {
    /// Make every match visible
    Show(Locator),
    /// Hide every match
    Hide(Locator),
    /// Enable or disable every match
    SetEnabled(Locator, bool),
    /// Replace the text of every match
    SetText(Locator, String),
    /// Append an element
    Insert(Locator, ElementState),
    /// Remove every match
    Remove(Locator),
    /// Replace every match with freshly rendered elements
    Replace(Locator, Vec<ElementState>),
    /// Change the current URL
    Navigate(String),
    /// Apply the inner change once this many more lookups have happened
    Later(usize, Box<MockChange>),
}

#[derive(Debug, Default)]
struct MockState {
    current_url: String,
    elements: HashMap<Locator, Vec<ElementState>>,
    on_click: HashMap<Locator, Vec<MockChange>>,
    deferred: Vec<(usize, MockChange)>,
    marked: HashSet<Locator>,
    probes: usize,
    script_results: Vec<serde_json::Value>,
    screenshot: Option<Vec<u8>>,
    call_history: Vec<String>,
}

impl MockState {
    fn apply(&mut self, change: MockChange) {
        match change {
            MockChange::Show(locator) => self.each(&locator, |e| e.visible = true),
            MockChange::Hide(locator) => self.each(&locator, |e| e.visible = false),
            MockChange::SetEnabled(locator, on) => self.each(&locator, |e| e.enabled = on),
            MockChange::SetText(locator, text) => self.each(&locator, |e| e.text.clone_from(&text)),
            MockChange::Insert(locator, element) => {
                self.marked.remove(&locator);
                self.elements.entry(locator).or_default().push(element);
            }
            MockChange::Remove(locator) => {
                self.marked.remove(&locator);
                self.elements.remove(&locator);
            }
            MockChange::Replace(locator, elements) => {
                self.marked.remove(&locator);
                self.elements.insert(locator, elements);
            }
            MockChange::Navigate(url) => {
                self.marked.clear();
                self.current_url = url;
            }
            MockChange::Later(probes, change) => {
                let due = self.probes + probes;
                self.deferred.push((due, *change));
            }
        }
    }

    /// Count one lookup and fire the deferred changes that are due
    fn tick(&mut self) {
        self.probes += 1;
        let now = self.probes;
        let (due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.deferred).into_iter().partition(|(at, _)| *at <= now);
        self.deferred = pending;
        for (_, change) in due {
            self.apply(change);
        }
    }

    fn match_count(&self, locator: &Locator) -> usize {
        self.elements.get(locator).map_or(0, Vec::len)
    }

    fn each(&mut self, locator: &Locator, mut f: impl FnMut(&mut ElementState)) {
        if let Some(elements) = self.elements.get_mut(locator) {
            elements.iter_mut().for_each(&mut f);
        }
    }

    fn element_mut(&mut self, locator: &Locator, index: usize) -> SuiteResult<&mut ElementState> {
        self.elements
            .get_mut(locator)
            .and_then(|elements| elements.get_mut(index))
            .ok_or(SuiteError::StaleElement {
                locator: *locator,
                index,
            })
    }
}

/// Mock driver for unit testing
///
/// Holds an in-memory element table. Clicking toggles checkboxes, checks
/// radios and then applies any changes registered with [`MockDriver::on_click`].
/// Changes registered with [`MockDriver::after_probes`] fire once the given
/// number of `find_elements` calls has happened, which simulates asynchronous
/// page updates. Render marks survive in-place changes and are dropped when
/// a locator's elements are inserted, removed or replaced, or on navigation.
#[derive(Debug, Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the starting URL
    #[must_use]
    pub fn with_url(self, url: impl Into<String>) -> Self {
        self.lock().current_url = url.into();
        self
    }

    /// Add a mock element matched by `locator`
    #[must_use]
    pub fn with_element(self, locator: Locator, element: ElementState) -> Self {
        self.lock().elements.entry(locator).or_default().push(element);
        self
    }

    /// Apply `changes` every time any match of `locator` is clicked
    #[must_use]
    pub fn on_click(self, locator: Locator, changes: Vec<MockChange>) -> Self {
        self.lock()
            .on_click
            .entry(locator)
            .or_default()
            .extend(changes);
        self
    }

    /// Apply `change` once `probes` more element lookups have happened
    #[must_use]
    pub fn after_probes(self, probes: usize, change: MockChange) -> Self {
        {
            let mut state = self.lock();
            let due = state.probes + probes;
            state.deferred.push((due, change));
        }
        self
    }

    /// Queue a JS execution result
    #[must_use]
    pub fn with_script_result(self, value: serde_json::Value) -> Self {
        self.lock().script_results.push(value);
        self
    }

    /// Set mock screenshot bytes
    #[must_use]
    pub fn with_screenshot(self, png: Vec<u8>) -> Self {
        self.lock().screenshot = Some(png);
        self
    }

    /// Current snapshot of one element, if it exists
    #[must_use]
    pub fn element(&self, locator: &Locator, index: usize) -> Option<ElementState> {
        self.lock()
            .elements
            .get(locator)
            .and_then(|elements| elements.get(index))
            .cloned()
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().call_history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.lock().call_history.iter().any(|c| c.starts_with(method))
    }

    /// Count calls starting with the given prefix
    #[must_use]
    pub fn call_count(&self, prefix: &str) -> usize {
        self.lock()
            .call_history
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Number of `find_elements` calls so far
    #[must_use]
    pub fn probe_count(&self) -> usize {
        self.lock().probes
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn navigate(&self, url: &str) -> SuiteResult<()> {
        let mut state = self.lock();
        state.call_history.push(format!("navigate:{url}"));
        state.marked.clear();
        state.current_url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> SuiteResult<String> {
        Ok(self.lock().current_url.clone())
    }

    async fn find_elements(&self, locator: &Locator) -> SuiteResult<Vec<ElementState>> {
        let mut state = self.lock();
        state.tick();
        let mut found = state.elements.get(locator).cloned().unwrap_or_default();
        for (i, element) in found.iter_mut().enumerate() {
            element.index = i;
        }
        Ok(found)
    }

    async fn click(&self, locator: &Locator, index: usize) -> SuiteResult<()> {
        let mut state = self.lock();
        state.call_history.push(format!("click:{locator}#{index}"));
        let element = state.element_mut(locator, index)?;
        if element.is_checkable() {
            let is_radio = element.input_type.as_deref() == Some("radio");
            element.selected = is_radio || !element.selected;
        }
        let changes = state.on_click.get(locator).cloned().unwrap_or_default();
        for change in changes {
            state.apply(change);
        }
        Ok(())
    }

    async fn clear(&self, locator: &Locator, index: usize) -> SuiteResult<()> {
        let mut state = self.lock();
        state.call_history.push(format!("clear:{locator}#{index}"));
        state.element_mut(locator, index)?.value = Some(String::new());
        Ok(())
    }

    async fn send_keys(&self, locator: &Locator, index: usize, text: &str) -> SuiteResult<()> {
        let mut state = self.lock();
        state
            .call_history
            .push(format!("send_keys:{locator}#{index}:{text}"));
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
        state
            .call_history
            .push(format!("select:{locator}#{index}:{option}"));
        let element = state.element_mut(locator, index)?;
        let position = element
            .find_option(option)
            .ok_or_else(|| SuiteError::OptionNotFound {
                locator: *locator,
                option: option.to_string(),
            })?;
        element.value = Some(element.options[position].value.clone());
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
        let mut state = self.lock();
        state.call_history.push(format!("script:{script}"));
        if state.script_results.is_empty() {
            Ok(serde_json::Value::Null)
        } else {
            Ok(state.script_results.remove(0))
        }
    }

    async fn mark_rendered(&self, locator: &Locator) -> SuiteResult<usize> {
        let mut state = self.lock();
        state.call_history.push(format!("mark:{locator}"));
        let count = state.match_count(locator);
        if count > 0 {
            state.marked.insert(*locator);
        }
        Ok(count)
    }

    async fn count_marked(&self, locator: &Locator) -> SuiteResult<usize> {
        let mut state = self.lock();
        state.tick();
        Ok(if state.marked.contains(locator) {
            state.match_count(locator)
        } else {
            0
        })
    }

    async fn screenshot(&self) -> SuiteResult<Vec<u8>> {
        self.lock()
            .screenshot
            .clone()
            .ok_or_else(|| SuiteError::Screenshot {
                message: "No mock screenshot set".to_string(),
            })
    }

    async fn quit(&self) -> SuiteResult<()> {
        self.lock().call_history.push("quit".to_string());
        Ok(())
    }
}
