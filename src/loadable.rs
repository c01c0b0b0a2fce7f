//! Load state shared by every data-driven widget

use crate::error::GatewayError;

/// `Idle -> Loading -> Ready | Failed`, re-entering `Loading` whenever the
/// widget's inputs change.
///
/// A failed load still carries data: the widget's documented fallback. Views
/// can show it while telling the user it is not live. A reload keeps the
/// last settled data on screen until the new response arrives.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Loadable<T> {
    #[default]
    Idle,
    Loading { previous: Option<T> },
    Ready(T),
    Failed { fallback: T, error: String },
}

impl<T> Loadable<T> {
    /// Settles a load with the fetch result, substituting `fallback` on error
    pub fn settle(result: Result<T, GatewayError>, fallback: impl FnOnce() -> T) -> Self {
        match result {
            Ok(data) => Loadable::Ready(data),
            Err(e) => Loadable::Failed {
                fallback: fallback(),
                error: e.to_string(),
            },
        }
    }

    /// Enters `Loading`, keeping whatever is currently displayed
    pub fn reload(&mut self) {
        let previous = match std::mem::replace(self, Loadable::Idle) {
            Loadable::Ready(data) | Loadable::Failed { fallback: data, .. } => Some(data),
            Loadable::Loading { previous } => previous,
            Loadable::Idle => None,
        };
        *self = Loadable::Loading { previous };
    }

    /// Data to display: the loaded value, the fallback after a failure, or
    /// the previous data while reloading
    pub fn data(&self) -> Option<&T> {
        match self {
            Loadable::Ready(data) | Loadable::Failed { fallback: data, .. } => Some(data),
            Loadable::Loading { previous } => previous.as_ref(),
            Loadable::Idle => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Loadable::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Loadable::Failed { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl Fn(T) -> U) -> Loadable<U> {
        match self {
            Loadable::Idle => Loadable::Idle,
            Loadable::Loading { previous } => Loadable::Loading {
                previous: previous.map(&f),
            },
            Loadable::Ready(data) => Loadable::Ready(f(data)),
            Loadable::Failed { fallback, error } => Loadable::Failed {
                fallback: f(fallback),
                error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_keeps_fallback_and_reason() {
        let state: Loadable<Vec<u32>> =
            Loadable::settle(Err(GatewayError::RateLimitExceeded), Vec::new);
        assert!(state.is_failed());
        assert_eq!(state.data(), Some(&Vec::new()));
        assert_eq!(state.error(), Some("Rate limit exceeded"));
    }

    #[test]
    fn first_load_has_no_data() {
        let mut state: Loadable<u32> = Loadable::default();
        assert_eq!(state, Loadable::Idle);
        state.reload();
        assert!(state.is_loading());
        assert_eq!(state.data(), None);
    }

    #[test]
    fn reload_keeps_displayed_data() {
        let mut state = Loadable::settle(Ok(vec![1, 2]), Vec::new);
        state.reload();
        assert!(state.is_loading());
        assert_eq!(state.data(), Some(&vec![1, 2]));

        // reloading again while in flight keeps the same data
        state.reload();
        assert_eq!(state.data(), Some(&vec![1, 2]));

        let mut failed: Loadable<Vec<u32>> =
            Loadable::settle(Err(GatewayError::Timeout), Vec::new);
        failed.reload();
        assert_eq!(failed.data(), Some(&Vec::new()));
        assert_eq!(failed.error(), None);
    }

    #[test]
    fn map_preserves_state() {
        let ready = Loadable::settle(Ok(2), || 0).map(|n| n * 10);
        assert_eq!(ready, Loadable::Ready(20));
    }
}
