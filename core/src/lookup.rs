//! Tri-state outcome for read-by-id calls.

/// Result of a read that may legitimately find nothing.
///
/// Read paths return `Result<Lookup<T>, ApiError>`: `Ok(Found)`,
/// `Ok(NotFound)` and `Err(_)` are the three outcomes a caller must handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Lookup::NotFound)
    }

    /// Convert into an `Option`, dropping the distinction's name.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }

    pub fn as_ref(&self) -> Lookup<&T> {
        match self {
            Lookup::Found(value) => Lookup::Found(value),
            Lookup::NotFound => Lookup::NotFound,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound => Lookup::NotFound,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Lookup::Found(value),
            None => Lookup::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn found_converts_to_some() {
        let lookup = Lookup::Found(7);
        assert!(lookup.is_found());
        assert_eq!(lookup.map(|n| n * 2).found(), Some(14));
    }

    #[test]
    fn not_found_converts_to_none() {
        let lookup: Lookup<u8> = None.into();
        assert!(lookup.is_not_found());
        assert_eq!(lookup.as_ref().found(), None);
    }
}
