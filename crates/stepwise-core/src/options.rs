//! Processing options.

use std::time::Duration;

use crate::constants::DEFAULT_DELAY;

/// Options for a sequential run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Pause between two consecutive elements. Never applied after the last one.
    pub delay: Duration,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
        }
    }
}

impl ProcessOptions {
    /// Options with the given inter-element delay in milliseconds.
    ///
    /// A zero delay is kept as zero.
    #[must_use]
    pub fn with_delay_ms(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Options with no pause between elements.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_DELAY_MS;

    #[test]
    fn default_options() {
        let opts = ProcessOptions::default();
        assert_eq!(opts.delay, Duration::from_millis(DEFAULT_DELAY_MS));
    }

    #[test]
    fn zero_delay_is_preserved() {
        assert_eq!(ProcessOptions::with_delay_ms(0).delay, Duration::ZERO);
        assert_eq!(ProcessOptions::immediate(), ProcessOptions::with_delay_ms(0));
    }

    #[test]
    fn custom_delay() {
        assert_eq!(
            ProcessOptions::with_delay_ms(250).delay,
            Duration::from_millis(250)
        );
    }
}
