//! Warnings for unsupported input, printed once per distinct message.
//!
//! Loading, cascading and box generation never fail on input they merely
//! do not understand (an unknown CSS property, an at-rule, an undeclared
//! entity). They report it here and carry on.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Keys of every warning printed so far.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

fn key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Report unsupported input on stderr, once per unique `(component, message)`.
///
/// # Example
/// ```
/// use boxwalk_common::warning::{has_warned, warn_once};
///
/// warn_once("CSS", "unsupported property 'float'");
/// assert!(has_warned("CSS", "unsupported property 'float'"));
/// ```
pub fn warn_once(component: &str, message: &str) {
    let fresh = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if fresh {
        eprintln!("{}", format!("[boxwalk {component}] {message}").yellow());
    }
}

/// Whether `warn_once` has already reported this message.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|seen| seen.contains(&key(component, message)))
}

/// Forget every recorded warning (call before processing a new document).
pub fn clear_warnings() {
    if let Some(seen) = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_mut()
    {
        seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_is_recorded_per_component() {
        warn_once("DOM", "unknown entity 'nbsp'");
        assert!(has_warned("DOM", "unknown entity 'nbsp'"));
        assert!(!has_warned("CSS", "unknown entity 'nbsp'"));
    }
}
