//! Page-agnostic interaction layer: bounded poll-waits over live DOM reads.
//!
//! Every operation takes a locator and an explicit wait budget. Waits are
//! poll loops, not fixed sleeps: the external page renders asynchronously,
//! so each call retries its condition until it holds or the budget runs out,
//! capping worst-case latency per call at the timeout.
//!
//! Timeout semantics follow the operation: lookups return `Ok(None)` (or an
//! empty vec) so callers must handle the not-found case explicitly; clicks
//! and typing log a warning and no-op, so callers relying on their effect
//! must verify the effect separately. Only transport and script failures
//! are `Err`.

use std::time::{Duration, Instant};

use tracing::warn;

use crate::browser::{ElementProbe, Page};
use crate::locator::Locator;
use crate::result::ClaveResult;

/// Default polling interval for bounded waits (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// A live page plus the polling cadence used by its waits
#[derive(Debug)]
pub struct Session {
    page: Page,
    poll_interval: Duration,
}

impl Session {
    /// Wrap a page with the default polling interval
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self {
            page,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Override the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Access the underlying page
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate the session's page
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails
    pub async fn goto(&mut self, url: &str) -> ClaveResult<()> {
        self.page.goto(url).await
    }

    /// Find an element, waiting until it is visible.
    ///
    /// Returns `Ok(None)` when the wait budget elapses without a visible
    /// match; callers must handle the absent case.
    pub async fn find_element(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> ClaveResult<Option<ElementProbe>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(probe) = self.page.probe(locator).await? {
                if probe.visible {
                    return Ok(Some(probe));
                }
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Find all visible elements; empty when the wait budget elapses
    pub async fn find_elements(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> ClaveResult<Vec<ElementProbe>> {
        let deadline = Instant::now() + timeout;
        loop {
            let visible: Vec<ElementProbe> = self
                .page
                .probe_all(locator)
                .await?
                .into_iter()
                .filter(|probe| probe.visible)
                .collect();
            if !visible.is_empty() {
                return Ok(visible);
            }
            if Instant::now() >= deadline {
                return Ok(vec![]);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Click an element once it is present and interactable.
    ///
    /// Logs and no-ops when the element never becomes clickable within the
    /// budget; callers relying on the click's effect must verify the effect.
    pub async fn click_element(&self, locator: &Locator, timeout: Duration) -> ClaveResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(probe) = self.page.probe(locator).await? {
                if probe.visible && probe.enabled && self.page.click(locator).await? {
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                let timeout_ms = timeout.as_millis() as u64;
                warn!(element = %locator, timeout_ms, "element not clickable within wait budget; skipping click");
                return Ok(());
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Clear an element's value and type new text into it.
    ///
    /// Logs and no-ops when the element cannot be located within the budget.
    pub async fn input_text(
        &self,
        locator: &Locator,
        text: &str,
        timeout: Duration,
    ) -> ClaveResult<()> {
        if self.find_element(locator, timeout).await?.is_none() {
            let timeout_ms = timeout.as_millis() as u64;
            warn!(element = %locator, timeout_ms, "element not found within wait budget; skipping text input");
            return Ok(());
        }
        let _ = self.page.set_value(locator, "").await?;
        let _ = self.page.type_text(locator, text).await?;
        Ok(())
    }

    /// Whether the element is attached to the DOM (visible or not)
    pub async fn is_element_present(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> ClaveResult<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.probe(locator).await?.is_some() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Whether the element is rendered and visible
    pub async fn is_element_visible(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> ClaveResult<bool> {
        Ok(self.find_element(locator, timeout).await?.is_some())
    }

    /// Read the element's user-facing text: the value attribute for
    /// input-type controls, the rendered text otherwise. Empty if absent.
    pub async fn get_element_text(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> ClaveResult<String> {
        Ok(self
            .find_element(locator, timeout)
            .await?
            .map(|probe| probe.read_text().to_string())
            .unwrap_or_default())
    }

    /// Bring an element into the viewport via direct DOM manipulation
    pub async fn scroll_to_element(&self, locator: &Locator) -> ClaveResult<()> {
        if !self.page.scroll_into_view(locator).await? {
            warn!(element = %locator, "element not found; skipping scroll");
        }
        Ok(())
    }

    /// Assign a value directly on the DOM node, firing input/change events.
    ///
    /// Used to clear fields and to mirror values onto range controls where
    /// keystrokes and drags are not simulated.
    pub async fn set_element_value(&self, locator: &Locator, value: &str) -> ClaveResult<bool> {
        self.page.set_value(locator, value).await
    }

    /// Read the system clipboard through the page
    pub async fn read_clipboard(&self) -> ClaveResult<String> {
        self.page.read_clipboard().await
    }

    /// Take a screenshot of the current page state
    pub async fn screenshot(&self) -> ClaveResult<Vec<u8>> {
        self.page.screenshot().await
    }
}

#[cfg(all(test, not(feature = "browser")))]
mod tests {
    use super::*;
    use crate::browser::{Browser, BrowserConfig, MockElement};
    use crate::locator::Selector;

    fn locator(name: &'static str, id: &str) -> Locator {
        Locator::new(name, Selector::id(id))
    }

    async fn session() -> (Session, Page) {
        let browser = Browser::launch(BrowserConfig::default()).await.unwrap();
        let page = browser.new_page().await.unwrap();
        let dom = page.clone();
        let session = Session::new(page).with_poll_interval(Duration::from_millis(5));
        (session, dom)
    }

    const SHORT: Duration = Duration::from_millis(40);

    mod find_tests {
        use super::*;

        #[tokio::test]
        async fn test_absent_element_returns_none() {
            let (session, _dom) = session().await;
            let found = session
                .find_element(&locator("missing", "missing"), SHORT)
                .await
                .unwrap();
            assert!(found.is_none());
        }

        #[tokio::test]
        async fn test_waits_for_late_reveal() {
            let (session, dom) = session().await;
            let target = locator("late button", "late");
            dom.install(&target, MockElement::button().reveal_after(3));

            let found = session.find_element(&target, SHORT).await.unwrap();
            assert!(found.is_some());
        }

        #[tokio::test]
        async fn test_hidden_element_stays_absent() {
            let (session, dom) = session().await;
            let target = locator("hidden", "hidden");
            dom.install(&target, MockElement::button().hidden());

            let found = session.find_element(&target, SHORT).await.unwrap();
            assert!(found.is_none());
        }

        #[tokio::test]
        async fn test_find_elements_empty_on_timeout() {
            let (session, _dom) = session().await;
            let all = session
                .find_elements(&locator("missing", "missing"), SHORT)
                .await
                .unwrap();
            assert!(all.is_empty());
        }

        #[tokio::test]
        async fn test_find_elements_returns_visible_match() {
            let (session, dom) = session().await;
            let target = locator("option", "option");
            dom.install(&target, MockElement::checkbox(true));

            let all = session.find_elements(&target, SHORT).await.unwrap();
            assert_eq!(all.len(), 1);
            assert!(all[0].checked);
        }
    }

    mod click_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_dispatches_once_clickable() {
            let (session, dom) = session().await;
            let target = locator("generate", "generate");
            dom.install(&target, MockElement::button().reveal_after(2));

            session.click_element(&target, SHORT).await.unwrap();
            assert_eq!(dom.clicks(&target), 1);
        }

        #[tokio::test]
        async fn test_click_missing_is_noop() {
            let (session, _dom) = session().await;
            // absent element: the call logs and returns without error
            session
                .click_element(&locator("missing", "missing"), SHORT)
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_click_disabled_is_noop() {
            let (session, dom) = session().await;
            let target = locator("disabled", "disabled");
            dom.install(&target, MockElement::button().disabled());

            session.click_element(&target, SHORT).await.unwrap();
            assert_eq!(dom.clicks(&target), 0);
        }
    }

    mod input_tests {
        use super::*;

        #[tokio::test]
        async fn test_input_clears_then_types() {
            let (session, dom) = session().await;
            let field = locator("length field", "passwordLength");
            dom.install(&field, MockElement::input("12"));

            session.input_text(&field, "20", SHORT).await.unwrap();
            assert_eq!(dom.element(&field).unwrap().value, "20");
        }

        #[tokio::test]
        async fn test_input_missing_is_noop() {
            let (session, _dom) = session().await;
            session
                .input_text(&locator("missing", "missing"), "20", SHORT)
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_set_element_value_bypasses_typing() {
            let (session, dom) = session().await;
            let slider = locator("length slider", "passwordLengthRange");
            dom.install(&slider, MockElement::input("12"));

            assert!(session.set_element_value(&slider, "20").await.unwrap());
            assert_eq!(dom.element(&slider).unwrap().value, "20");
        }
    }

    mod probe_tests {
        use super::*;

        #[tokio::test]
        async fn test_present_but_not_visible() {
            let (session, dom) = session().await;
            let target = locator("hidden", "hidden");
            dom.install(&target, MockElement::button().hidden());

            assert!(session.is_element_present(&target, SHORT).await.unwrap());
            assert!(!session.is_element_visible(&target, SHORT).await.unwrap());
        }

        #[tokio::test]
        async fn test_text_reads_value_for_inputs() {
            let (session, dom) = session().await;
            let output = locator("password output", "password");
            dom.install(&output, MockElement::input("aB3$xy"));

            let text = session.get_element_text(&output, SHORT).await.unwrap();
            assert_eq!(text, "aB3$xy");
        }

        #[tokio::test]
        async fn test_text_reads_rendered_text_otherwise() {
            let (session, dom) = session().await;
            let banner = locator("banner", "banner");
            dom.install(&banner, MockElement::new("div").with_text("Strong"));

            let text = session.get_element_text(&banner, SHORT).await.unwrap();
            assert_eq!(text, "Strong");
        }

        #[tokio::test]
        async fn test_text_empty_when_absent() {
            let (session, _dom) = session().await;
            let text = session
                .get_element_text(&locator("missing", "missing"), SHORT)
                .await
                .unwrap();
            assert!(text.is_empty());
        }
    }

    mod scroll_tests {
        use super::*;

        #[tokio::test]
        async fn test_scroll_absent_is_noop() {
            let (session, _dom) = session().await;
            session
                .scroll_to_element(&locator("missing", "missing"))
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_scroll_present_succeeds() {
            let (session, dom) = session().await;
            let target = locator("footer", "footer");
            dom.install(&target, MockElement::new("div"));
            session.scroll_to_element(&target).await.unwrap();
        }
    }
}
