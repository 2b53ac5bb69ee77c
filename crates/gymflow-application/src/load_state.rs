//! Rendering state of a data-backed screen.

use gymflow_core::error::{GymError, Result};

/// A value together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub from_cache: bool,
}

impl<T> Fetched<T> {
    pub fn fresh(value: T) -> Self {
        Self {
            value,
            from_cache: false,
        }
    }

    pub fn cached(value: T) -> Self {
        Self {
            value,
            from_cache: true,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// What a list or detail screen should render.
///
/// A failure keeps the last good data in `stale` so the screen can show it
/// next to the error, but [`data`](Self::data) never returns it: stale data is
/// only shown when the caller asks for it explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Failed {
        message: String,
        retryable: bool,
        stale: Option<T>,
    },
    Loaded {
        data: T,
        from_cache: bool,
    },
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> LoadState<T> {
    /// Moves to the state implied by `result`, carrying the previous data as
    /// stale on failure.
    pub fn settle(self, result: Result<Fetched<T>>) -> Self {
        match result {
            Ok(fetched) => Self::Loaded {
                data: fetched.value,
                from_cache: fetched.from_cache,
            },
            Err(err) => Self::failed(&err, self.into_data()),
        }
    }

    pub fn failed(err: &GymError, stale: Option<T>) -> Self {
        Self::Failed {
            message: err.user_message(),
            retryable: err.is_retryable(),
            stale,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Fresh or cached data; `None` while loading or after a failure.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn stale_data(&self) -> Option<&T> {
        match self {
            Self::Failed { stale, .. } => stale.as_ref(),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    fn into_data(self) -> Option<T> {
        match self {
            Self::Loaded { data, .. } => Some(data),
            Self::Failed { stale, .. } => stale,
            Self::Loading => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_keeps_previous_data_as_stale() {
        let state = LoadState::Loading.settle(Ok(Fetched::fresh(vec![1, 2])));
        assert_eq!(state.data(), Some(&vec![1, 2]));

        let state = state.settle(Err(GymError::timeout(15_000)));
        assert!(state.data().is_none());
        assert_eq!(state.stale_data(), Some(&vec![1, 2]));
        assert!(matches!(state, LoadState::Failed { retryable: true, .. }));

        // a second failure still remembers the last good data
        let state = state.settle(Err(GymError::network("offline")));
        assert_eq!(state.stale_data(), Some(&vec![1, 2]));
    }

    #[test]
    fn test_cached_flag_is_reported() {
        let state = LoadState::default().settle(Ok(Fetched::cached("x")));
        assert_eq!(
            state,
            LoadState::Loaded {
                data: "x",
                from_cache: true
            }
        );
    }

    #[test]
    fn test_precondition_is_not_retryable() {
        let state: LoadState<()> =
            LoadState::Loading.settle(Err(GymError::precondition("No students found")));
        assert_eq!(state.error_message(), Some("No students found"));
        assert!(matches!(state, LoadState::Failed { retryable: false, stale: None, .. }));
    }
}
