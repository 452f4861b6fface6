//! Page object for the security.org password generator.
//!
//! The page itself is the state machine: no option or length state is held
//! here, every query re-reads the live DOM. The locator constants below are
//! the compatibility contract with the page's markup.
//!
//! Two checkbox contracts coexist on purpose:
//! [`PasswordPage::toggle_option`] clicks only when the current state
//! differs from the desired one (idempotent), while
//! [`PasswordPage::click_checkboxes`] clicks unconditionally for every
//! `Some(true)` intent (order-dependent, NOT idempotent: two calls flip a
//! control twice). They are distinct operations; merging them would change
//! test semantics.

use std::time::Duration;

use crate::config::SuiteConfig;
use crate::locator::{Locator, Selector};
use crate::result::{ClaveError, ClaveResult};
use crate::session::Session;

/// Adapter over the password-generator page
#[derive(Debug)]
pub struct PasswordPage {
    session: Session,
    base_url: String,
    probe_wait: Duration,
    default_wait: Duration,
    ready_wait: Duration,
    password_input: Locator,
    generate_button: Locator,
    length_slider: Locator,
    length_input: Locator,
    lowercase_checkbox: Locator,
    uppercase_checkbox: Locator,
    numbers_checkbox: Locator,
    symbols_checkbox: Locator,
    copy_password_icon: Locator,
    copy_password_button: Locator,
}

impl PasswordPage {
    /// Navigate the session to the generator page and build the adapter
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails
    pub async fn open(mut session: Session, config: &SuiteConfig) -> ClaveResult<Self> {
        session.goto(&config.base_url).await?;
        Ok(Self::attach(session, config))
    }

    /// Build the adapter over an already-positioned session
    #[must_use]
    pub fn attach(session: Session, config: &SuiteConfig) -> Self {
        Self {
            session,
            base_url: config.base_url.clone(),
            probe_wait: config.short_wait,
            default_wait: config.medium_wait,
            ready_wait: config.long_wait,
            password_input: Locator::new("password output", Selector::id("password")),
            generate_button: Locator::new(
                "generate button",
                Selector::xpath("//button[@title='Generate password']"),
            ),
            length_slider: Locator::new("length slider", Selector::id("passwordLengthRange")),
            length_input: Locator::new("length input", Selector::id("passwordLength")),
            lowercase_checkbox: Locator::new(
                "lowercase option",
                Selector::css("[for='option-lowercase']"),
            ),
            uppercase_checkbox: Locator::new(
                "uppercase option",
                Selector::css("[for='option-uppercase']"),
            ),
            numbers_checkbox: Locator::new(
                "numbers option",
                Selector::css("[for='option-numbers']"),
            ),
            symbols_checkbox: Locator::new(
                "symbols option",
                Selector::css("[for='option-symbols']"),
            ),
            copy_password_icon: Locator::new(
                "copy icon",
                Selector::css("button[title='Copy password']"),
            ),
            copy_password_button: Locator::new(
                "copy button",
                Selector::css("button[title='Copy Password']"),
            ),
        }
    }

    /// Access the underlying session
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Re-navigate to the generator page and wait until it is interactable.
    ///
    /// Scenarios share one browser session; resetting before each one makes
    /// inter-scenario independence explicit instead of relying on leftover
    /// page state.
    pub async fn reset(&mut self) -> ClaveResult<()> {
        let url = self.base_url.clone();
        self.session.goto(&url).await?;
        self.wait_ready().await
    }

    /// Wait until the page has rendered its interactive controls
    ///
    /// # Errors
    ///
    /// Returns [`ClaveError::ElementTimeout`] if the copy control never
    /// appears within the long wait budget
    pub async fn wait_ready(&self) -> ClaveResult<()> {
        if self
            .session
            .find_element(&self.copy_password_button, self.ready_wait)
            .await?
            .is_none()
        {
            return Err(ClaveError::ElementTimeout {
                ms: self.ready_wait.as_millis() as u64,
            });
        }
        Ok(())
    }

    /// Clear the numeric length field via direct DOM assignment
    pub async fn clear_length_input(&self) -> ClaveResult<()> {
        let _ = self
            .session
            .set_element_value(&self.length_input, "")
            .await?;
        Ok(())
    }

    /// Set the password length.
    ///
    /// Writes into the numeric field and mirrors the value onto the range
    /// slider via direct value injection; slider drags are not simulated.
    /// Out-of-range values are passed through for the page to clamp.
    pub async fn set_password_length(&self, length: i64) -> ClaveResult<()> {
        self.wait_ready().await?;
        self.session
            .input_text(&self.length_input, &length.to_string(), self.default_wait)
            .await?;
        let _ = self
            .session
            .set_element_value(&self.length_slider, &length.to_string())
            .await?;
        Ok(())
    }

    /// Bring a checkbox to the desired state, clicking only on difference.
    ///
    /// Idempotent: a second call with the same desired state issues no
    /// further click.
    pub async fn toggle_option(&self, locator: &Locator, desired: bool) -> ClaveResult<()> {
        if let Some(probe) = self.session.find_element(locator, self.default_wait).await? {
            if probe.checked != desired {
                self.session.click_element(locator, self.default_wait).await?;
            }
        }
        Ok(())
    }

    /// Declaratively apply desired states to all four option checkboxes
    pub async fn select_password_options(
        &self,
        lowercase: bool,
        uppercase: bool,
        numbers: bool,
        symbols: bool,
    ) -> ClaveResult<()> {
        self.toggle_option(&self.lowercase_checkbox, lowercase).await?;
        self.toggle_option(&self.uppercase_checkbox, uppercase).await?;
        self.toggle_option(&self.numbers_checkbox, numbers).await?;
        self.toggle_option(&self.symbols_checkbox, symbols).await?;
        Ok(())
    }

    /// Click checkboxes unconditionally per intent.
    ///
    /// `Some(true)` clicks the control regardless of its current state;
    /// `Some(false)` and `None` leave it untouched. NOT idempotent: calling
    /// twice with the same `Some(true)` flips the control twice.
    pub async fn click_checkboxes(
        &self,
        lowercase: Option<bool>,
        uppercase: Option<bool>,
        numbers: Option<bool>,
        symbols: Option<bool>,
    ) -> ClaveResult<()> {
        let intents = [
            (&self.lowercase_checkbox, lowercase),
            (&self.uppercase_checkbox, uppercase),
            (&self.numbers_checkbox, numbers),
            (&self.symbols_checkbox, symbols),
        ];
        for (locator, intent) in intents {
            if intent == Some(true) {
                self.session.click_element(locator, self.default_wait).await?;
            }
        }
        Ok(())
    }

    /// Wait for and click the generate control
    pub async fn generate_password(&self) -> ClaveResult<()> {
        let _ = self
            .session
            .find_element(&self.generate_button, self.default_wait)
            .await?;
        self.session
            .click_element(&self.generate_button, self.default_wait)
            .await
    }

    /// Read the current password from the output field
    pub async fn get_generated_password(&self) -> ClaveResult<String> {
        self.session
            .get_element_text(&self.password_input, self.default_wait)
            .await
    }

    /// Whether a given option checkbox is currently checked
    pub async fn is_option_selected(&self, locator: &Locator) -> ClaveResult<bool> {
        Ok(self
            .session
            .find_element(locator, self.probe_wait)
            .await?
            .is_some_and(|probe| probe.checked))
    }

    /// Whether at least one option checkbox is checked
    pub async fn is_any_option_enabled(&self) -> ClaveResult<bool> {
        for locator in [
            &self.lowercase_checkbox,
            &self.uppercase_checkbox,
            &self.numbers_checkbox,
            &self.symbols_checkbox,
        ] {
            if self.is_option_selected(locator).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Click the copy button and return the clipboard contents.
    ///
    /// The clipboard is a shared host resource; the read happens immediately
    /// after the click.
    pub async fn copy_password_button(&self) -> ClaveResult<String> {
        self.session
            .click_element(&self.copy_password_button, self.default_wait)
            .await?;
        self.session.read_clipboard().await
    }

    /// Click the copy icon and return the clipboard contents
    pub async fn copy_password_icon(&self) -> ClaveResult<String> {
        self.session
            .click_element(&self.copy_password_icon, self.default_wait)
            .await?;
        self.session.read_clipboard().await
    }

    /// Locator for the password output field
    #[must_use]
    pub const fn password_input(&self) -> &Locator {
        &self.password_input
    }

    /// Locator for the numeric length field
    #[must_use]
    pub const fn length_input(&self) -> &Locator {
        &self.length_input
    }

    /// Locator for the length range slider
    #[must_use]
    pub const fn length_slider(&self) -> &Locator {
        &self.length_slider
    }

    /// Locator for the generate button
    #[must_use]
    pub const fn generate_button(&self) -> &Locator {
        &self.generate_button
    }

    /// Locator for the lowercase option label
    #[must_use]
    pub const fn lowercase_checkbox(&self) -> &Locator {
        &self.lowercase_checkbox
    }

    /// Locator for the uppercase option label
    #[must_use]
    pub const fn uppercase_checkbox(&self) -> &Locator {
        &self.uppercase_checkbox
    }

    /// Locator for the numbers option label
    #[must_use]
    pub const fn numbers_checkbox(&self) -> &Locator {
        &self.numbers_checkbox
    }

    /// Locator for the symbols option label
    #[must_use]
    pub const fn symbols_checkbox(&self) -> &Locator {
        &self.symbols_checkbox
    }

    /// Locator for the copy button
    #[must_use]
    pub const fn copy_button(&self) -> &Locator {
        &self.copy_password_button
    }

    /// Locator for the copy icon
    #[must_use]
    pub const fn copy_icon(&self) -> &Locator {
        &self.copy_password_icon
    }
}
