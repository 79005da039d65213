//! # Expo Theme - light, dark and automatic color themes
//!
//! `expo-theme` keeps track of which color theme a UI should render and
//! why. A user either picks a theme explicitly, which is persisted, or
//! leaves it on automatic and the operating system's dark-mode signal
//! decides.
//!
//! ## Concepts
//!
//! - [`Theme`]: the logical mode, `Auto`, `Dark` or `Light`
//! - [`ColorMode`]: what is actually rendered, never `Auto`
//! - [`ThemeProvider`]: the mounted store, owning the OS subscription
//! - [`use_theme`] / [`ThemeHandle`]: how consumers read the theme and
//!   switch modes, through an explicit [`Scope`]
//!
//! The provider talks to the outside world only through injected
//! capabilities:
//!
//! | Capability | Trait | Implementations |
//! |---|---|---|
//! | persisted preference | [`PreferenceStorage`] | [`MemoryStorage`], [`NoopStorage`], [`FileStorage`], `web::LocalStorage` |
//! | rendered attribute | [`DocumentRoot`] | [`MemoryDocument`], `web::DocumentElement` |
//! | OS dark preference | [`ColorSchemeQuery`] | [`SimulatedColorScheme`], [`SystemColorScheme`], `web::BrowserColorScheme` |
//!
//! The `web::*` types are available with the `web` feature on `wasm32`.
//!
//! ## Quick start
//!
//! ```rust
//! use std::rc::Rc;
//! use expo_theme::{use_theme, MemoryStorage, SimulatedColorScheme, Theme, ThemeProvider};
//!
//! let provider = ThemeProvider::builder()
//!     .storage(Rc::new(MemoryStorage::new()))
//!     .color_scheme(Rc::new(SimulatedColorScheme::new(true)))
//!     .mount();
//!
//! let theme = use_theme(&provider.scope()).unwrap();
//! assert_eq!(theme.theme_name().unwrap(), Theme::Auto);
//!
//! theme.set_light_mode().unwrap();
//! assert_eq!(theme.theme_name().unwrap(), Theme::Light);
//! ```
//!
//! ## Automatic mode
//!
//! While no explicit preference is stored, OS color-scheme changes are
//! written to the document attribute. The logical theme stays `Auto`.
//! Once the user picks a mode, OS changes are ignored until
//! [`ThemeHandle::set_auto_mode`] clears the preference again.

mod bootstrap;
mod config;
mod document;
mod error;
mod media;
mod provider;
mod storage;
#[cfg(not(target_arch = "wasm32"))]
mod system;
mod theme;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use bootstrap::{initial_color_mode, InitialColorMode};
pub use config::{ThemeConfig, DEFAULT_MEDIA_QUERY, DEFAULT_THEME_KEY};
pub use document::{DocumentRoot, MemoryDocument};
pub use error::ThemeError;
pub use media::{
    ChangeListener, ColorSchemeChange, ColorSchemeQuery, SimulatedColorScheme, Subscription,
};
pub use provider::{use_theme, Scope, ThemeHandle, ThemeProvider, ThemeProviderBuilder};
pub use storage::{FileStorage, MemoryStorage, NoopStorage, PreferenceStorage};
#[cfg(not(target_arch = "wasm32"))]
pub use system::{reset_color_mode_detector, set_color_mode_detector, SystemColorScheme};
pub use theme::{resolve_for_match, ColorMode, Theme};
