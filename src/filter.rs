use crate::window::TimeWindow;

/// Placeholder tokens the call platform emits when routing never
/// resolved to a real target.
const NO_VALUE_VARIATIONS: [&str; 8] = [
    "no value",
    "-no value-",
    "no_value",
    "no-value",
    "none",
    "null",
    "empty",
    "blank",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Admitted,
    OutsideWindow,
    InvalidTarget,
}

impl FilterDecision {
    pub fn is_admitted(self) -> bool {
        matches!(self, FilterDecision::Admitted)
    }
}

/// True only if the target label is a genuine resolved value: non-empty
/// after trimming and not one of the platform's placeholder tokens.
pub fn has_valid_target(target_name: &str) -> bool {
    let target = target_name.trim();
    if target.is_empty() {
        return false;
    }
    let lowered = target.to_lowercase();
    !NO_VALUE_VARIATIONS.contains(&lowered.as_str())
}

/// Admit/reject decision for inbound call events.
pub struct CallFilter {
    window: TimeWindow,
}

impl CallFilter {
    pub fn new(window: TimeWindow) -> Self {
        Self { window }
    }

    /// A call is admitted only when it is inside the monitoring window
    /// and its routing target resolved. The window check runs first so
    /// the rejection reason reflects it.
    pub fn evaluate(&self, target_name: &str, timestamp: Option<&str>) -> FilterDecision {
        if !self.window.contains(timestamp) {
            tracing::info!(
                "Call outside monitoring hours - timestamp: {:?}",
                timestamp
            );
            return FilterDecision::OutsideWindow;
        }

        if !has_valid_target(target_name) {
            tracing::info!(
                "Call filtered out - invalid target name: '{}'",
                target_name
            );
            return FilterDecision::InvalidTarget;
        }

        FilterDecision::Admitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_filter() -> CallFilter {
        CallFilter::new(TimeWindow::new(18, 9, chrono_tz::America::New_York))
    }

    #[test]
    fn test_placeholder_targets_invalid() {
        for target in NO_VALUE_VARIATIONS {
            assert!(!has_valid_target(target), "expected '{}' invalid", target);
        }
    }

    #[test]
    fn test_placeholder_targets_invalid_any_casing() {
        assert!(!has_valid_target("No value"));
        assert!(!has_valid_target("NO VALUE"));
        assert!(!has_valid_target("None"));
        assert!(!has_valid_target("NULL"));
        assert!(!has_valid_target("-No Value-"));
    }

    #[test]
    fn test_placeholder_targets_invalid_with_whitespace() {
        assert!(!has_valid_target("  no value  "));
        assert!(!has_valid_target("\tblank\n"));
    }

    #[test]
    fn test_empty_and_blank_targets_invalid() {
        assert!(!has_valid_target(""));
        assert!(!has_valid_target("   "));
    }

    #[test]
    fn test_real_targets_valid() {
        assert!(has_valid_target("TA7a8e20272b90487c8d420370c8477992"));
        assert!(has_valid_target("valid-target"));
        assert!(has_valid_target("123"));
        assert!(has_valid_target("  padded target  "));
        // Tokens that merely contain a placeholder are still real.
        assert!(has_valid_target("none-shall-pass"));
    }

    #[test]
    fn test_admits_valid_target_inside_window() {
        let filter = default_filter();
        let decision = filter.evaluate("valid-target", Some("2024-01-01T20:00:00"));
        assert_eq!(decision, FilterDecision::Admitted);
        assert!(decision.is_admitted());
    }

    #[test]
    fn test_rejects_outside_window_regardless_of_target() {
        let filter = default_filter();
        assert_eq!(
            filter.evaluate("valid-target", Some("2024-01-01T12:00:00")),
            FilterDecision::OutsideWindow
        );
        // Time check comes first, so a bad target outside hours still
        // reports the window reason.
        assert_eq!(
            filter.evaluate("No value", Some("2024-01-01T12:00:00")),
            FilterDecision::OutsideWindow
        );
    }

    #[test]
    fn test_rejects_invalid_target_inside_window() {
        let filter = default_filter();
        assert_eq!(
            filter.evaluate("No value", Some("2024-01-01T20:00:00")),
            FilterDecision::InvalidTarget
        );
        assert_eq!(
            filter.evaluate("", Some("2024-01-01T03:00:00")),
            FilterDecision::InvalidTarget
        );
    }
}
