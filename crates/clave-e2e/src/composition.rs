//! Character-class composition checks for generated passwords.
//!
//! A symbol is anything outside ASCII alphanumerics; the generator draws
//! from the four classes below and nothing else.

/// Character classes the generator can draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// ASCII lowercase letters
    Lowercase,
    /// ASCII uppercase letters
    Uppercase,
    /// ASCII digits
    Digit,
    /// Everything outside ASCII alphanumerics
    Symbol,
}

impl CharClass {
    /// All four classes
    pub const ALL: [Self; 4] = [Self::Lowercase, Self::Uppercase, Self::Digit, Self::Symbol];

    /// Whether a character belongs to this class
    #[must_use]
    pub fn matches(self, c: char) -> bool {
        match self {
            Self::Lowercase => c.is_ascii_lowercase(),
            Self::Uppercase => c.is_ascii_uppercase(),
            Self::Digit => c.is_ascii_digit(),
            Self::Symbol => !c.is_ascii_alphanumeric(),
        }
    }
}

/// Whether the password contains at least one character of the class
#[must_use]
pub fn contains_class(password: &str, class: CharClass) -> bool {
    password.chars().any(|c| class.matches(c))
}

/// Whether the password contains at least one character of every class
#[must_use]
pub fn contains_each(password: &str, classes: &[CharClass]) -> bool {
    classes.iter().all(|&class| contains_class(password, class))
}

/// Whether every character of the password belongs to one of the classes
#[must_use]
pub fn drawn_only_from(password: &str, classes: &[CharClass]) -> bool {
    password
        .chars()
        .all(|c| classes.iter().any(|&class| class.matches(c)))
}
