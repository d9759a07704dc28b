//! Session configuration.

use crate::error::{Error, Result};
use crate::format::{DEFAULT_MAX_VALUE_SIZE, FormatOptions};
use crate::resolve::{BestGuess, NameStyle};

use super::retry::ElisionStrategy;

/// Default GETBULK non-repeaters.
pub const DEFAULT_NON_REPEATERS: u32 = 0;

/// Default GETBULK max-repetitions.
pub const DEFAULT_MAX_REPETITIONS: u32 = 10;

/// Session configuration.
///
/// Created once and shared by every call made through the session. Most
/// users should use [`SessionBuilder`](super::SessionBuilder) rather than
/// constructing this directly.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Tag resolution aggressiveness (default: `Exact`)
    pub best_guess: BestGuess,
    /// Elide objects the agent reports as noSuchName and resubmit (default: false)
    pub retry_no_such: bool,
    /// How reported error indexes map back to batch entries (default: `LastIndex`)
    pub elision: ElisionStrategy,
    /// Label returned names with every label from the root (default: false)
    pub use_long_names: bool,
    /// Label returned names numerically; implies long names (default: false)
    pub use_numeric: bool,
    /// Enumeration labels in results and SET values (default: false)
    pub use_enums: bool,
    /// Library-style value rendering (default: false)
    pub use_sprint_value: bool,
    /// GETBULK non-repeaters for calls that don't pass one (default: 0)
    pub non_repeaters: u32,
    /// GETBULK max-repetitions for calls that don't pass one (default: 10)
    pub max_repetitions: u32,
    /// Longest string value kept in a result (default: 65536)
    pub max_value_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            best_guess: BestGuess::Exact,
            retry_no_such: false,
            elision: ElisionStrategy::LastIndex,
            use_long_names: false,
            use_numeric: false,
            use_enums: false,
            use_sprint_value: false,
            non_repeaters: DEFAULT_NON_REPEATERS,
            max_repetitions: DEFAULT_MAX_REPETITIONS,
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
        }
    }
}

impl SessionConfig {
    /// Reject settings no call could work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_value_size == 0 {
            return Err(Error::Config("max_value_size must be greater than zero".into()).boxed());
        }
        if self.max_repetitions == 0 {
            return Err(Error::Config("max_repetitions must be greater than zero".into()).boxed());
        }
        Ok(())
    }

    /// Naming style for returned OIDs.
    pub fn name_style(&self) -> NameStyle {
        if self.use_numeric {
            NameStyle::Numeric
        } else if self.use_long_names {
            NameStyle::Full
        } else {
            NameStyle::Suffix
        }
    }

    /// Formatter switches derived from this configuration.
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            use_enums: self.use_enums,
            use_sprint_value: self.use_sprint_value,
            max_value_size: self.max_value_size,
        }
    }
}
