//! Scenario suite for the security.org password generator.
//!
//! This binary drives a real Chromium session against the live page, so it
//! only does anything when the crate is built with the `browser` feature:
//!
//! ```text
//! cargo test -p clave-e2e --features browser --test scenarios
//! ```
//!
//! Without the feature, plain `cargo test` compiles this to a no-op so the
//! default test run stays hermetic. Scenarios share one browser session and
//! run strictly in sequence; the runner reloads the page before each one.
//! Exit status: 0 all passed, 1 some scenario failed, 2 fatal provisioning
//! error.

#[cfg(feature = "browser")]
mod live {
    use std::path::PathBuf;
    use std::time::Duration;

    use clap::Parser;
    use tracing_subscriber::EnvFilter;

    use clave_e2e::composition::{contains_class, contains_each, drawn_only_from};
    use clave_e2e::config::{
        DEFAULT_BASE_URL, DEFAULT_MAX_PASSWORD_LENGTH, DEFAULT_MIN_PASSWORD_LENGTH,
    };
    use clave_e2e::suite::{check, Scenario, ScenarioFuture, SuiteReport, SuiteRunner};
    use clave_e2e::{
        Browser, BrowserConfig, CharClass, ClaveResult, PasswordPage, Session, SuiteConfig,
    };

    #[derive(Parser, Debug)]
    #[command(name = "clave-scenarios")]
    #[command(about = "Password generator scenario suite")]
    struct Args {
        /// Run the browser with a visible window
        #[arg(long)]
        headed: bool,

        /// Keep the Chromium sandbox enabled (off by default for containers)
        #[arg(long)]
        sandbox: bool,

        /// Target page
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Chromium executable override
        #[arg(long, env = "CHROMIUM_PATH")]
        chromium: Option<String>,

        /// Short wait tier in seconds
        #[arg(long, default_value = "5")]
        short_wait: u64,

        /// Medium wait tier in seconds (default element-lookup budget)
        #[arg(long, default_value = "10")]
        medium_wait: u64,

        /// Long wait tier in seconds
        #[arg(long, default_value = "15")]
        long_wait: u64,

        /// Disable failure screenshots
        #[arg(long)]
        no_screenshots: bool,

        /// Screenshot output directory
        #[arg(long, default_value = "screenshots")]
        screenshot_dir: PathBuf,

        /// Append JSON logs to this file instead of logging to stderr
        #[arg(long)]
        log_file: Option<PathBuf>,
    }

    fn init_logging(log_file: Option<&std::path::Path>) {
        let filter = EnvFilter::from_default_env().add_directive("info".parse().expect("directive"));
        match log_file {
            Some(path) => {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .expect("open log file");
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .json()
                    .with_writer(move || file.try_clone().expect("clone log file handle"))
                    .init();
            }
            None => {
                tracing_subscriber::fmt().with_env_filter(filter).init();
            }
        }
    }

    pub fn main() {
        let args = Args::parse();
        init_logging(args.log_file.as_deref());

        let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
        match rt.block_on(run(args)) {
            Ok(report) => {
                report.log_summary();
                if report.all_passed() {
                    std::process::exit(0);
                }
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("fatal: {e}");
                std::process::exit(2);
            }
        }
    }

    async fn run(args: Args) -> ClaveResult<SuiteReport> {
        let config = SuiteConfig::new()
            .with_base_url(args.base_url.clone())
            .with_wait_tiers(
                Duration::from_secs(args.short_wait),
                Duration::from_secs(args.medium_wait),
                Duration::from_secs(args.long_wait),
            )
            .with_screenshots(!args.no_screenshots, args.screenshot_dir.clone());

        let mut browser_config = BrowserConfig::default().with_headless(!args.headed);
        if !args.sandbox {
            browser_config = browser_config.with_no_sandbox();
        }
        if let Some(chromium) = args.chromium.clone() {
            browser_config = browser_config.with_chromium_path(chromium);
        }

        let browser = Browser::launch(browser_config).await?;
        let page = browser.new_page().await?;
        page.grant_clipboard_access().await?;
        let session = Session::new(page);
        let adapter = PasswordPage::open(session, &config).await?;

        let mut runner = SuiteRunner::new(adapter, config);
        for (name, scenario) in SCENARIOS {
            runner.run(name, *scenario).await;
        }
        let report = runner.finish();
        browser.close().await?;
        Ok(report)
    }

    const MEDIUM: Duration = Duration::from_secs(10);

    const SCENARIOS: &[(&str, Scenario)] = &[
        ("default password generated", default_password_generated),
        ("initial state has both letter cases", initial_state_has_both_letter_cases),
        ("only lowercase option", only_lowercase_option),
        ("only uppercase option", only_uppercase_option),
        ("only digits via unconditional clicks", only_digits_via_unconditional_clicks),
        ("only symbols via unconditional clicks", only_symbols_via_unconditional_clicks),
        ("all options give one of each class", all_options_give_one_of_each_class),
        ("letter options still generate", letter_options_still_generate),
        ("length twenty", length_twenty),
        ("minimum length six", minimum_length_six),
        ("maximum length thirty two", maximum_length_thirty_two),
        ("below minimum clamps up", below_minimum_clamps_up),
        ("negative length clamps up", negative_length_clamps_up),
        ("above maximum clamps down", above_maximum_clamps_down),
        ("raw excessive input clamps down", raw_excessive_input_clamps_down),
        ("copy button echoes password", copy_button_echoes_password),
        ("copy icon echoes password", copy_icon_echoes_password),
        ("toggle option is idempotent", toggle_option_is_idempotent),
        ("length twenty with all classes", length_twenty_with_all_classes),
    ];

    fn default_password_generated(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            let password = page.get_generated_password().await?;
            check(
                !password.is_empty(),
                "password should be generated on page load",
            )
        })
    }

    fn initial_state_has_both_letter_cases(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            let password = page.get_generated_password().await?;
            check(
                contains_class(&password, CharClass::Lowercase),
                "default password should contain lowercase letters",
            )?;
            check(
                contains_class(&password, CharClass::Uppercase),
                "default password should contain uppercase letters",
            )
        })
    }

    fn only_lowercase_option(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            page.select_password_options(true, false, false, false).await?;
            page.generate_password().await?;
            let password = page.get_generated_password().await?;
            check(!password.is_empty(), "password should be generated")?;
            check(
                drawn_only_from(&password, &[CharClass::Lowercase]),
                format!("password should contain only lowercase letters, got {password:?}"),
            )
        })
    }

    fn only_uppercase_option(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            page.select_password_options(false, true, false, false).await?;
            page.generate_password().await?;
            let password = page.get_generated_password().await?;
            check(!password.is_empty(), "password should be generated")?;
            check(
                drawn_only_from(&password, &[CharClass::Uppercase]),
                format!("password should contain only uppercase letters, got {password:?}"),
            )
        })
    }

    fn only_digits_via_unconditional_clicks(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            // lowercase and uppercase start enabled; unconditional clicks
            // turn numbers on, then both letter options off
            page.click_checkboxes(None, None, Some(true), None).await?;
            page.click_checkboxes(None, Some(true), None, None).await?;
            page.click_checkboxes(Some(true), None, None, None).await?;
            page.generate_password().await?;
            let password = page.get_generated_password().await?;
            check(!password.is_empty(), "password should be generated")?;
            check(
                drawn_only_from(&password, &[CharClass::Digit]),
                format!("password should contain only digits, got {password:?}"),
            )
        })
    }

    fn only_symbols_via_unconditional_clicks(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            page.click_checkboxes(None, None, None, Some(true)).await?;
            page.click_checkboxes(Some(true), None, None, None).await?;
            page.click_checkboxes(None, Some(true), None, None).await?;
            page.generate_password().await?;
            let password = page.get_generated_password().await?;
            check(!password.is_empty(), "password should be generated")?;
            check(
                drawn_only_from(&password, &[CharClass::Symbol]),
                format!("password should contain only symbols, got {password:?}"),
            )
        })
    }

    fn all_options_give_one_of_each_class(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            page.select_password_options(true, true, true, true).await?;
            page.generate_password().await?;
            let password = page.get_generated_password().await?;
            check(
                contains_each(&password, &CharClass::ALL),
                format!("password should contain one of each character class, got {password:?}"),
            )
        })
    }

    fn letter_options_still_generate(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            page.select_password_options(true, true, false, false).await?;
            page.generate_password().await?;
            let password = page.get_generated_password().await?;
            check(!password.is_empty(), "password should be generated")
        })
    }

    async fn expect_generated_length(page: &PasswordPage, requested: i64, expected: u32) -> ClaveResult<()> {
        page.clear_length_input().await?;
        page.set_password_length(requested).await?;
        page.generate_password().await?;
        let password = page.get_generated_password().await?;
        check(
            password.chars().count() == expected as usize,
            format!(
                "generated length should be {expected} for a request of {requested}, got {}",
                password.chars().count()
            ),
        )
    }

    fn length_twenty(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move { expect_generated_length(page, 20, 20).await })
    }

    fn minimum_length_six(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            expect_generated_length(
                page,
                i64::from(DEFAULT_MIN_PASSWORD_LENGTH),
                DEFAULT_MIN_PASSWORD_LENGTH,
            )
            .await
        })
    }

    fn maximum_length_thirty_two(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            expect_generated_length(
                page,
                i64::from(DEFAULT_MAX_PASSWORD_LENGTH),
                DEFAULT_MAX_PASSWORD_LENGTH,
            )
            .await
        })
    }

    fn below_minimum_clamps_up(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move { expect_generated_length(page, 5, DEFAULT_MIN_PASSWORD_LENGTH).await })
    }

    fn negative_length_clamps_up(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move { expect_generated_length(page, -1, DEFAULT_MIN_PASSWORD_LENGTH).await })
    }

    fn above_maximum_clamps_down(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move { expect_generated_length(page, 33, DEFAULT_MAX_PASSWORD_LENGTH).await })
    }

    fn raw_excessive_input_clamps_down(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            // type straight into the numeric field, skipping the slider mirror
            page.clear_length_input().await?;
            page.session()
                .input_text(page.length_input(), "100", MEDIUM)
                .await?;
            page.generate_password().await?;
            let password = page.get_generated_password().await?;
            check(
                password.chars().count() == DEFAULT_MAX_PASSWORD_LENGTH as usize,
                format!(
                    "generated length should clamp to {DEFAULT_MAX_PASSWORD_LENGTH}, got {}",
                    password.chars().count()
                ),
            )
        })
    }

    fn copy_button_echoes_password(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            page.generate_password().await?;
            let generated = page.get_generated_password().await?;
            check(!generated.is_empty(), "password should be generated")?;
            let copied = page.copy_password_button().await?;
            check(
                copied == generated,
                format!("copied password {copied:?} should match the generated password {generated:?}"),
            )
        })
    }

    fn copy_icon_echoes_password(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            page.generate_password().await?;
            let generated = page.get_generated_password().await?;
            check(!generated.is_empty(), "password should be generated")?;
            let copied = page.copy_password_icon().await?;
            check(
                copied == generated,
                format!("copied password {copied:?} should match the generated password {generated:?}"),
            )
        })
    }

    fn toggle_option_is_idempotent(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            page.toggle_option(page.numbers_checkbox(), true).await?;
            page.toggle_option(page.numbers_checkbox(), true).await?;
            check(
                page.is_option_selected(page.numbers_checkbox()).await?,
                "numbers option should remain selected after a repeated toggle",
            )
        })
    }

    fn length_twenty_with_all_classes(page: &mut PasswordPage) -> ScenarioFuture<'_> {
        Box::pin(async move {
            page.clear_length_input().await?;
            page.set_password_length(20).await?;
            page.select_password_options(true, true, true, true).await?;
            page.generate_password().await?;
            let password = page.get_generated_password().await?;
            check(
                password.chars().count() == 20,
                format!("generated length should be 20, got {}", password.chars().count()),
            )?;
            check(
                contains_each(&password, &CharClass::ALL),
                format!("password should contain one of each character class, got {password:?}"),
            )
        })
    }
}

#[cfg(feature = "browser")]
fn main() {
    live::main();
}

#[cfg(not(feature = "browser"))]
fn main() {
    eprintln!("scenarios: the `browser` feature is disabled; nothing to run");
}
