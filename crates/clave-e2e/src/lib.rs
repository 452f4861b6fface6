//! Clave: browser-driven end-to-end suite for the security.org password
//! generator.
//!
//! The suite is a pure client of an external, uncontrolled page: it clicks,
//! types, and reads rendered DOM state, then asserts on observable password
//! properties (composition, length bounds, clipboard echo). There is no
//! in-memory model of the page; every assertion re-reads the live DOM.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     CLAVE Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ Password   │    │ Session    │            │
//! │   │ Suite      │───►│ Page       │───►│ (bounded   │──► CDP ──► external page
//! │   │            │    │ Adapter    │    │  waits)    │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Real browser control requires the `browser` feature (CDP via
//! chromiumoxide). Without it, a scripted mock page backs the same API so
//! unit tests run hermetically; the `scenarios` test binary becomes a
//! no-op.

#![warn(missing_docs)]

pub mod browser;
pub mod composition;
pub mod config;
pub mod locator;
pub mod password_page;
pub mod result;
pub mod session;
pub mod suite;

pub use browser::{Browser, BrowserConfig, ElementProbe, Page};
pub use composition::CharClass;
pub use config::SuiteConfig;
pub use locator::{Locator, Selector};
pub use password_page::PasswordPage;
pub use result::{ClaveError, ClaveResult};
pub use session::Session;
pub use suite::{check, Scenario, ScenarioFuture, ScenarioResult, SuiteReport, SuiteRunner};
