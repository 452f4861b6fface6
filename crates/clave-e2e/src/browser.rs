//! Browser provisioning and the page handle.
//!
//! With the `browser` feature enabled, pages are driven over the Chrome
//! `DevTools` Protocol via chromiumoxide. Without the feature, a scripted
//! mock page backs the same API so unit tests run without a browser.
//!
//! Every DOM read goes through [`Page::probe`], which returns a
//! point-in-time [`ElementProbe`] snapshot. Probes are never cached: the
//! external page may re-render at any moment, so each interaction re-reads
//! the live DOM.

use serde::{Deserialize, Serialize};

use crate::locator::Locator;

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Sandbox mode (disable for containers/CI)
    pub sandbox: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            viewport_width: 1920,
            viewport_height: 1080,
            chromium_path: None,
        }
    }
}

impl BrowserConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Disable the sandbox (required in containerized CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }
}

/// Point-in-time snapshot of one DOM element.
///
/// Valid only for the instant it was read; callers re-probe rather than
/// holding on to one across interactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementProbe {
    /// Lowercased tag name
    pub tag_name: String,
    /// Rendered and not `display:none`/`visibility:hidden`
    pub visible: bool,
    /// Not disabled
    pub enabled: bool,
    /// Text content
    pub text: String,
    /// Value attribute (empty for non-input elements)
    pub value: String,
    /// Checked state (false for non-checkable elements)
    pub checked: bool,
}

impl ElementProbe {
    /// Whether the element is an input-type control
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(self.tag_name.as_str(), "input" | "textarea" | "select")
    }

    /// The text a user would read off this element: the value attribute for
    /// input-type controls, the rendered text otherwise
    #[must_use]
    pub fn read_text(&self) -> &str {
        if self.is_input() {
            &self.value
        } else {
            &self.text
        }
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{BrowserConfig, ElementProbe, Locator};
    use crate::locator::Selector;
    use crate::result::{ClaveError, ClaveResult};
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::browser::{GrantPermissionsParams, PermissionType};
    use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
    use chromiumoxide::page::{Page as CdpPage, ScreenshotParams};
    use futures::StreamExt;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    // Checked state comes from the associated control so that locators
    // pointing at a `<label for=...>` still read the real checkbox.
    fn probe_expr(selector: &Selector) -> String {
        format!(
            "(() => {{ const el = {query}; if (!el) {{ return null; }} \
             const style = window.getComputedStyle(el); \
             const rect = el.getBoundingClientRect(); \
             const ctrl = el.control || el; \
             return {{ \
               tag_name: el.tagName.toLowerCase(), \
               visible: style.display !== 'none' && style.visibility !== 'hidden' && rect.width > 0 && rect.height > 0, \
               enabled: !el.disabled, \
               text: el.textContent || '', \
               value: el.value === undefined ? '' : String(el.value), \
               checked: !!ctrl.checked \
             }}; }})()",
            query = selector.to_query()
        )
    }

    fn probe_all_expr(selector: &Selector) -> String {
        format!(
            "{query}.map((el) => {{ \
             const style = window.getComputedStyle(el); \
             const rect = el.getBoundingClientRect(); \
             const ctrl = el.control || el; \
             return {{ \
               tag_name: el.tagName.toLowerCase(), \
               visible: style.display !== 'none' && style.visibility !== 'hidden' && rect.width > 0 && rect.height > 0, \
               enabled: !el.disabled, \
               text: el.textContent || '', \
               value: el.value === undefined ? '' : String(el.value), \
               checked: !!ctrl.checked \
             }}; }})",
            query = selector.to_query_all()
        )
    }

    fn click_expr(selector: &Selector) -> String {
        format!(
            "(() => {{ const el = {query}; if (!el) {{ return false; }} el.click(); return true; }})()",
            query = selector.to_query()
        )
    }

    fn set_value_expr(selector: &Selector, value: &str) -> String {
        let escaped = serde_json::Value::String(value.to_string()).to_string();
        format!(
            "(() => {{ const el = {query}; if (!el) {{ return false; }} \
             el.value = {escaped}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true; }})()",
            query = selector.to_query()
        )
    }

    fn type_expr(selector: &Selector, text: &str) -> String {
        let escaped = serde_json::Value::String(text.to_string()).to_string();
        format!(
            "(() => {{ const el = {query}; if (!el) {{ return false; }} \
             el.focus(); \
             el.value = (el.value === undefined ? '' : String(el.value)) + {escaped}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true; }})()",
            query = selector.to_query()
        )
    }

    fn scroll_expr(selector: &Selector) -> String {
        format!(
            "(() => {{ const el = {query}; if (!el) {{ return false; }} el.scrollIntoView(true); return true; }})()",
            query = selector.to_query()
        )
    }

    const READ_CLIPBOARD: &str = "(async () => { try { return await navigator.clipboard.readText(); } catch (err) { return null; } })()";

    /// Browser instance with a live CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a browser process.
        ///
        /// # Errors
        ///
        /// Returns [`ClaveError::Provisioning`] if the browser cannot be
        /// resolved or launched. Fatal: there is no retry.
        pub async fn launch(config: BrowserConfig) -> ClaveResult<Self> {
            let mut builder = CdpConfig::builder();

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .window_size(config.viewport_width, config.viewport_height)
                .arg("--disable-dev-shm-usage")
                .build()
                .map_err(|e| ClaveError::Provisioning {
                    message: e.to_string(),
                })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| ClaveError::Provisioning {
                        message: e.to_string(),
                    })?;

            // Drive the CDP message stream until the browser goes away
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Create a new page
        ///
        /// # Errors
        ///
        /// Returns error if page cannot be created
        pub async fn new_page(&self) -> ClaveResult<Page> {
            let browser = self.inner.lock().await;
            let cdp_page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| ClaveError::Page {
                    message: e.to_string(),
                })?;

            Ok(Page {
                url: String::from("about:blank"),
                inner: Arc::new(Mutex::new(cdp_page)),
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(self) -> ClaveResult<()> {
            let mut browser = self.inner.lock().await;
            browser.close().await.map_err(|e| ClaveError::Provisioning {
                message: e.to_string(),
            })?;
            Ok(())
        }
    }

    /// A browser page driven over CDP
    #[derive(Debug, Clone)]
    pub struct Page {
        url: String,
        inner: Arc<Mutex<CdpPage>>,
    }

    impl Page {
        async fn evaluate_value(&self, expr: &str) -> ClaveResult<serde_json::Value> {
            let page = self.inner.lock().await;
            let result = page.evaluate(expr).await.map_err(|e| ClaveError::Script {
                message: e.to_string(),
            })?;
            Ok(result
                .into_value::<serde_json::Value>()
                .unwrap_or(serde_json::Value::Null))
        }

        /// Navigate to a URL and wait for the load to settle
        ///
        /// # Errors
        ///
        /// Returns error if navigation fails
        pub async fn goto(&mut self, url: &str) -> ClaveResult<()> {
            {
                let page = self.inner.lock().await;
                page.goto(url).await.map_err(|e| ClaveError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
                page.wait_for_navigation()
                    .await
                    .map_err(|e| ClaveError::Navigation {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;
            }
            self.url = url.to_string();
            Ok(())
        }

        /// Snapshot the first element the locator matches, or `None`
        ///
        /// # Errors
        ///
        /// Returns error if script evaluation fails
        pub async fn probe(&self, locator: &Locator) -> ClaveResult<Option<ElementProbe>> {
            let value = self.evaluate_value(&probe_expr(locator.selector())).await?;
            Ok(serde_json::from_value(value)?)
        }

        /// Snapshot every element the locator matches
        ///
        /// # Errors
        ///
        /// Returns error if script evaluation fails
        pub async fn probe_all(&self, locator: &Locator) -> ClaveResult<Vec<ElementProbe>> {
            let value = self
                .evaluate_value(&probe_all_expr(locator.selector()))
                .await?;
            Ok(serde_json::from_value(value).unwrap_or_default())
        }

        /// Dispatch a click; `false` if the element is absent
        ///
        /// # Errors
        ///
        /// Returns error if script evaluation fails
        pub async fn click(&self, locator: &Locator) -> ClaveResult<bool> {
            let value = self.evaluate_value(&click_expr(locator.selector())).await?;
            Ok(value.as_bool().unwrap_or(false))
        }

        /// Assign a value directly on the DOM node and fire input/change
        ///
        /// # Errors
        ///
        /// Returns error if script evaluation fails
        pub async fn set_value(&self, locator: &Locator, value: &str) -> ClaveResult<bool> {
            let value = self
                .evaluate_value(&set_value_expr(locator.selector(), value))
                .await?;
            Ok(value.as_bool().unwrap_or(false))
        }

        /// Append text to the element's value, firing input/change
        ///
        /// # Errors
        ///
        /// Returns error if script evaluation fails
        pub async fn type_text(&self, locator: &Locator, text: &str) -> ClaveResult<bool> {
            let value = self
                .evaluate_value(&type_expr(locator.selector(), text))
                .await?;
            Ok(value.as_bool().unwrap_or(false))
        }

        /// Bring the element into the viewport
        ///
        /// # Errors
        ///
        /// Returns error if script evaluation fails
        pub async fn scroll_into_view(&self, locator: &Locator) -> ClaveResult<bool> {
            let value = self.evaluate_value(&scroll_expr(locator.selector())).await?;
            Ok(value.as_bool().unwrap_or(false))
        }

        /// Read the system clipboard through the page
        ///
        /// # Errors
        ///
        /// Returns [`ClaveError::Clipboard`] if the read is denied
        pub async fn read_clipboard(&self) -> ClaveResult<String> {
            let value = self.evaluate_value(READ_CLIPBOARD).await?;
            match value {
                serde_json::Value::String(text) => Ok(text),
                _ => Err(ClaveError::Clipboard {
                    message: "clipboard read denied by the page".to_string(),
                }),
            }
        }

        /// Grant the page clipboard read access (copy scenarios need it)
        ///
        /// # Errors
        ///
        /// Returns error if the permission grant is rejected
        pub async fn grant_clipboard_access(&self) -> ClaveResult<()> {
            let params = GrantPermissionsParams::builder()
                .permissions(vec![
                    PermissionType::ClipboardReadWrite,
                    PermissionType::ClipboardSanitizedWrite,
                ])
                .build()
                .map_err(|e| ClaveError::Page {
                    message: e.to_string(),
                })?;
            let page = self.inner.lock().await;
            page.execute(params).await.map_err(|e| ClaveError::Page {
                message: e.to_string(),
            })?;
            Ok(())
        }

        /// Take a PNG screenshot
        ///
        /// # Errors
        ///
        /// Returns error if screenshot fails
        pub async fn screenshot(&self) -> ClaveResult<Vec<u8>> {
            let page = self.inner.lock().await;
            page.screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(false)
                    .build(),
            )
            .await
            .map_err(|e| ClaveError::Screenshot {
                message: e.to_string(),
            })
        }

        /// Get the last navigated URL
        #[must_use]
        pub fn current_url(&self) -> String {
            self.url.clone()
        }
    }
}

// ============================================================================
// Mock Implementation (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use super::{BrowserConfig, ElementProbe, Locator};
    use crate::result::ClaveResult;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Scripted element state backing the mock page
    #[derive(Debug, Clone)]
    pub struct MockElement {
        /// Lowercased tag name
        pub tag_name: String,
        /// Rendered on the page
        pub visible: bool,
        /// Interactable
        pub enabled: bool,
        /// Text content
        pub text: String,
        /// Value attribute
        pub value: String,
        /// Checked state
        pub checked: bool,
        /// Flip `checked` when clicked (checkbox behavior)
        pub toggles_on_click: bool,
        /// Stay invisible for this many probes before appearing
        pub reveal_after_polls: u32,
        /// Selector key whose value is copied to the clipboard on click
        pub copy_source: Option<String>,
        /// Number of clicks dispatched so far
        pub clicks: u32,
    }

    impl MockElement {
        /// Create a visible, enabled element with the given tag
        #[must_use]
        pub fn new(tag_name: impl Into<String>) -> Self {
            Self {
                tag_name: tag_name.into(),
                visible: true,
                enabled: true,
                text: String::new(),
                value: String::new(),
                checked: false,
                toggles_on_click: false,
                reveal_after_polls: 0,
                copy_source: None,
                clicks: 0,
            }
        }

        /// An input element with an initial value
        #[must_use]
        pub fn input(value: impl Into<String>) -> Self {
            let mut el = Self::new("input");
            el.value = value.into();
            el
        }

        /// A button element
        #[must_use]
        pub fn button() -> Self {
            Self::new("button")
        }

        /// A checkbox: clicking flips the checked state
        #[must_use]
        pub fn checkbox(checked: bool) -> Self {
            let mut el = Self::new("input");
            el.checked = checked;
            el.toggles_on_click = true;
            el
        }

        /// Set the text content
        #[must_use]
        pub fn with_text(mut self, text: impl Into<String>) -> Self {
            self.text = text.into();
            self
        }

        /// Make the element invisible
        #[must_use]
        pub const fn hidden(mut self) -> Self {
            self.visible = false;
            self
        }

        /// Make the element non-interactable
        #[must_use]
        pub const fn disabled(mut self) -> Self {
            self.enabled = false;
            self
        }

        /// Keep the element invisible for the first `polls` probes
        #[must_use]
        pub const fn reveal_after(mut self, polls: u32) -> Self {
            self.reveal_after_polls = polls;
            self
        }

        /// Clicking this element copies another element's value to the
        /// clipboard
        #[must_use]
        pub fn copies_from(mut self, source: &Locator) -> Self {
            self.copy_source = Some(source.selector().key());
            self
        }

        fn probe(&self, visible: bool) -> ElementProbe {
            ElementProbe {
                tag_name: self.tag_name.clone(),
                visible,
                enabled: self.enabled,
                text: self.text.clone(),
                value: self.value.clone(),
                checked: self.checked,
            }
        }
    }

    #[derive(Debug, Default)]
    struct MockState {
        elements: HashMap<String, MockElement>,
        clipboard: String,
        url: String,
    }

    /// Browser instance backed by the scripted mock
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
    }

    impl Browser {
        /// Launch the mock browser (always succeeds)
        ///
        /// # Errors
        ///
        /// Kept for signature parity with the CDP implementation
        pub async fn launch(config: BrowserConfig) -> ClaveResult<Self> {
            Ok(Self { config })
        }

        /// Create a new mock page
        ///
        /// # Errors
        ///
        /// Kept for signature parity with the CDP implementation
        pub async fn new_page(&self) -> ClaveResult<Page> {
            Ok(Page {
                state: Arc::new(Mutex::new(MockState::default())),
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the mock browser
        pub async fn close(self) -> ClaveResult<()> {
            Ok(())
        }
    }

    /// A mock page: a selector-keyed element table plus a fake clipboard
    #[derive(Debug, Clone)]
    pub struct Page {
        state: Arc<Mutex<MockState>>,
    }

    impl Page {
        fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
            self.state.lock().expect("mock page lock")
        }

        /// Install an element under the locator's selector key
        pub fn install(&self, locator: &Locator, element: MockElement) {
            let _ = self
                .lock()
                .elements
                .insert(locator.selector().key(), element);
        }

        /// Seed the fake clipboard
        pub fn set_clipboard(&self, text: impl Into<String>) {
            self.lock().clipboard = text.into();
        }

        /// Number of clicks an element has received
        #[must_use]
        pub fn clicks(&self, locator: &Locator) -> u32 {
            self.lock()
                .elements
                .get(&locator.selector().key())
                .map_or(0, |el| el.clicks)
        }

        /// Snapshot an installed element's scripted state
        #[must_use]
        pub fn element(&self, locator: &Locator) -> Option<MockElement> {
            self.lock().elements.get(&locator.selector().key()).cloned()
        }

        /// Record a navigation
        ///
        /// # Errors
        ///
        /// Kept for signature parity with the CDP implementation
        pub async fn goto(&mut self, url: &str) -> ClaveResult<()> {
            self.lock().url = url.to_string();
            Ok(())
        }

        /// Snapshot the element under the locator, or `None`
        ///
        /// # Errors
        ///
        /// Kept for signature parity with the CDP implementation
        pub async fn probe(&self, locator: &Locator) -> ClaveResult<Option<ElementProbe>> {
            let mut state = self.lock();
            let Some(el) = state.elements.get_mut(&locator.selector().key()) else {
                return Ok(None);
            };
            if el.reveal_after_polls > 0 {
                el.reveal_after_polls -= 1;
                return Ok(Some(el.probe(false)));
            }
            let visible = el.visible;
            Ok(Some(el.probe(visible)))
        }

        /// Snapshot all elements under the locator (zero or one in the mock)
        ///
        /// # Errors
        ///
        /// Kept for signature parity with the CDP implementation
        pub async fn probe_all(&self, locator: &Locator) -> ClaveResult<Vec<ElementProbe>> {
            Ok(self.probe(locator).await?.into_iter().collect())
        }

        /// Click the element if present, visible, and enabled
        ///
        /// # Errors
        ///
        /// Kept for signature parity with the CDP implementation
        pub async fn click(&self, locator: &Locator) -> ClaveResult<bool> {
            let mut state = self.lock();
            let key = locator.selector().key();
            let copy_source = {
                let Some(el) = state.elements.get_mut(&key) else {
                    return Ok(false);
                };
                if !el.visible || !el.enabled {
                    return Ok(false);
                }
                el.clicks += 1;
                if el.toggles_on_click {
                    el.checked = !el.checked;
                }
                el.copy_source.clone()
            };
            if let Some(source) = copy_source {
                let copied = state.elements.get(&source).map(|src| {
                    if src.tag_name == "input" {
                        src.value.clone()
                    } else {
                        src.text.clone()
                    }
                });
                if let Some(copied) = copied {
                    state.clipboard = copied;
                }
            }
            Ok(true)
        }

        /// Assign a value on the element
        ///
        /// # Errors
        ///
        /// Kept for signature parity with the CDP implementation
        pub async fn set_value(&self, locator: &Locator, value: &str) -> ClaveResult<bool> {
            let mut state = self.lock();
            match state.elements.get_mut(&locator.selector().key()) {
                Some(el) => {
                    el.value = value.to_string();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        /// Append text to the element's value
        ///
        /// # Errors
        ///
        /// Kept for signature parity with the CDP implementation
        pub async fn type_text(&self, locator: &Locator, text: &str) -> ClaveResult<bool> {
            let mut state = self.lock();
            match state.elements.get_mut(&locator.selector().key()) {
                Some(el) => {
                    el.value.push_str(text);
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        /// Record a scroll; `false` if the element is absent
        ///
        /// # Errors
        ///
        /// Kept for signature parity with the CDP implementation
        pub async fn scroll_into_view(&self, locator: &Locator) -> ClaveResult<bool> {
            Ok(self.lock().elements.contains_key(&locator.selector().key()))
        }

        /// Read the fake clipboard
        ///
        /// # Errors
        ///
        /// Kept for signature parity with the CDP implementation
        pub async fn read_clipboard(&self) -> ClaveResult<String> {
            Ok(self.lock().clipboard.clone())
        }

        /// No-op in the mock
        ///
        /// # Errors
        ///
        /// Kept for signature parity with the CDP implementation
        pub async fn grant_clipboard_access(&self) -> ClaveResult<()> {
            Ok(())
        }

        /// Mock screenshot: empty bytes
        ///
        /// # Errors
        ///
        /// Kept for signature parity with the CDP implementation
        pub async fn screenshot(&self) -> ClaveResult<Vec<u8>> {
            Ok(vec![])
        }

        /// Get the last navigated URL
        #[must_use]
        pub fn current_url(&self) -> String {
            self.lock().url.clone()
        }
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};

#[cfg(not(feature = "browser"))]
pub use mock::{Browser, MockElement, Page};
