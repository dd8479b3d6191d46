//! Provider API key configuration.

/// API keys for the stock-media providers, read once at process start.
///
/// A `None` key disables that provider: it is not registered and its
/// search path yields empty results instead of erroring.
#[derive(Debug, Clone, Default)]
pub struct ProviderKeys {
    pub pixabay: Option<String>,
    pub pexels: Option<String>,
    pub unsplash: Option<String>,
    pub jamendo: Option<String>,
}

impl ProviderKeys {
    /// Read keys from the environment.
    ///
    /// `UNSPLASH_ACCESS_KEY` is accepted as an alias for
    /// `UNSPLASH_API_KEY`; deployments have used both names.
    pub fn from_env() -> Self {
        Self {
            pixabay: non_empty_var("PIXABAY_API_KEY"),
            pexels: non_empty_var("PEXELS_API_KEY"),
            unsplash: non_empty_var("UNSPLASH_API_KEY")
                .or_else(|| non_empty_var("UNSPLASH_ACCESS_KEY")),
            jamendo: non_empty_var("JAMENDO_CLIENT_ID"),
        }
    }

    /// Whether at least one provider is usable.
    pub fn any_present(&self) -> bool {
        self.pixabay.is_some()
            || self.pexels.is_some()
            || self.unsplash.is_some()
            || self.jamendo.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
