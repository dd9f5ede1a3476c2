//! Ordered fallback over candidate providers.
//!
//! ```
//! use utils::chain::ProviderChain;
//!
//! let id = ProviderChain::new()
//!     .then(|| None)
//!     .then(|| Some("board"))
//!     .then(|| unreachable!())
//!     .or_else(|| "default");
//! assert_eq!(id, "board");
//! ```

/// Evaluate providers in order until one yields a value; later providers are never called.
#[derive(Debug)]
#[must_use]
pub struct ProviderChain<T> {
    found: Option<T>,
}

impl<T> ProviderChain<T> {
    pub const fn new() -> ProviderChain<T> {
        ProviderChain { found: None }
    }

    pub fn then(self, provider: impl FnOnce() -> Option<T>) -> ProviderChain<T> {
        match self.found {
            Some(_) => self,
            None => ProviderChain { found: provider() },
        }
    }

    /// Finish with a fallback that cannot fail.
    pub fn or_else(self, fallback: impl FnOnce() -> T) -> T {
        self.found.unwrap_or_else(fallback)
    }

    pub fn finish(self) -> Option<T> {
        self.found
    }
}

impl<T> Default for ProviderChain<T> {
    fn default() -> Self {
        Self::new()
    }
}
