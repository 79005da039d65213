//! Error types.

use std::path::PathBuf;

/// Errors raised by the theme store and its configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    /// The theme interface was requested from a scope with no provider.
    ///
    /// This is a composition mistake: nest the consumer inside a
    /// [`ThemeProvider`](crate::ThemeProvider) scope.
    #[error("use_theme must be used within a ThemeProvider scope")]
    MissingProvider,

    /// A handle outlived the provider that issued it.
    #[error("ThemeProvider was unmounted; this theme handle is no longer valid")]
    ProviderUnmounted,

    /// A string that is not `auto`, `dark` or `light`.
    #[error("unknown theme '{0}' (expected auto, dark or light)")]
    InvalidTheme(String),

    /// A configuration file could not be read or parsed.
    #[error("failed to load theme config from {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}
