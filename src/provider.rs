//! The theme store and the scope it is provided through.
//!
//! A [`ThemeProvider`] is mounted once at the root of whatever tree
//! needs theming. Mounting subscribes to the OS color-scheme query and
//! adopts the persisted preference. Dropping the provider unmounts it
//! and releases the subscription.
//!
//! Consumers never reach the provider through globals. They receive a
//! [`Scope`] from their parent and call [`use_theme`], which fails fast
//! if no provider was mounted above them.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use expo_theme::{
//!     use_theme, DocumentRoot, MemoryDocument, MemoryStorage, PreferenceStorage,
//!     SimulatedColorScheme, Theme, ThemeProvider,
//! };
//!
//! let storage = Rc::new(MemoryStorage::new());
//! let document = Rc::new(MemoryDocument::new());
//! let provider = ThemeProvider::builder()
//!     .storage(storage.clone())
//!     .document(document.clone())
//!     .color_scheme(Rc::new(SimulatedColorScheme::new(false)))
//!     .mount();
//!
//! let theme = use_theme(&provider.scope()).unwrap();
//! theme.set_dark_mode().unwrap();
//!
//! assert_eq!(theme.theme_name().unwrap(), Theme::Dark);
//! assert_eq!(storage.get("data-expo-theme").as_deref(), Some("dark"));
//! assert_eq!(document.attribute("data-expo-theme").as_deref(), Some("dark"));
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::bootstrap::{initial_color_mode, InitialColorMode};
use crate::config::ThemeConfig;
use crate::document::{DocumentRoot, MemoryDocument};
use crate::error::ThemeError;
use crate::media::{ColorSchemeChange, ColorSchemeQuery, ListenerSet, Subscription};
use crate::storage::{NoopStorage, PreferenceStorage};
use crate::theme::{resolve_for_match, ColorMode, Theme};

struct Inner {
    config: ThemeConfig,
    storage: Rc<dyn PreferenceStorage>,
    document: Rc<dyn DocumentRoot>,
    query: Rc<dyn ColorSchemeQuery>,
    initial: InitialColorMode,
    theme_name: Cell<Theme>,
    watchers: ListenerSet<Theme>,
}

impl Inner {
    /// The explicit preference, if one is stored. An empty value counts
    /// as no preference.
    fn persisted(&self) -> Option<String> {
        self.storage
            .get(&self.config.storage_key)
            .filter(|value| !value.is_empty())
    }

    fn set_theme_name(&self, theme: Theme) {
        if self.theme_name.replace(theme) != theme {
            self.watchers.notify(theme);
        }
    }

    fn set_document_theme(&self, theme: Theme) {
        match theme.concrete() {
            Some(mode) => self
                .document
                .set_attribute(&self.config.attribute, mode.as_str()),
            None => log::trace!("Not writing '{}' to the document attribute", theme),
        }
    }

    // Only the document attribute follows the OS; theme_name is left alone.
    fn on_system_change(&self, matches: bool) {
        if let Some(preference) = self.persisted() {
            log::trace!(
                "Ignoring OS color scheme change, explicit preference '{}' is stored",
                preference
            );
            return;
        }
        self.set_document_theme(resolve_for_match(matches).into());
    }

    fn set_explicit(&self, mode: ColorMode) {
        log::debug!("Switching to {} mode", mode);
        self.storage.set(&self.config.storage_key, mode.as_str());
        self.set_document_theme(mode.into());
        self.set_theme_name(mode.into());
    }

    fn set_auto_mode(&self) {
        self.storage.remove(&self.config.storage_key);
        let resolved = (self.initial)();
        log::debug!("Switching to auto mode, rendering {}", resolved);
        self.set_document_theme(resolved);
        self.set_theme_name(Theme::Auto);
    }
}

/// Builder for [`ThemeProvider`].
///
/// Unset capabilities fall back to [`NoopStorage`], a fresh
/// [`MemoryDocument`], and on native targets the OS signal through
/// [`SystemColorScheme`](crate::SystemColorScheme).
pub struct ThemeProviderBuilder {
    config: ThemeConfig,
    storage: Option<Rc<dyn PreferenceStorage>>,
    document: Option<Rc<dyn DocumentRoot>>,
    query: Option<Rc<dyn ColorSchemeQuery>>,
    initial: Option<InitialColorMode>,
}

impl ThemeProviderBuilder {
    pub fn new() -> Self {
        Self {
            config: ThemeConfig::default(),
            storage: None,
            document: None,
            query: None,
            initial: None,
        }
    }

    pub fn config(mut self, config: ThemeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn storage(mut self, storage: Rc<dyn PreferenceStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn document(mut self, document: Rc<dyn DocumentRoot>) -> Self {
        self.document = Some(document);
        self
    }

    pub fn color_scheme(mut self, query: Rc<dyn ColorSchemeQuery>) -> Self {
        self.query = Some(query);
        self
    }

    /// Replaces the collaborator consulted by
    /// [`set_auto_mode`](ThemeProvider::set_auto_mode).
    ///
    /// Defaults to [`initial_color_mode`] over the provider's own storage
    /// and color-scheme query.
    pub fn initial_color_mode(mut self, initial: impl Fn() -> Theme + 'static) -> Self {
        self.initial = Some(Rc::new(initial));
        self
    }

    /// Mounts the provider: subscribes to OS changes, then adopts the
    /// persisted preference.
    pub fn mount(self) -> ThemeProvider {
        let storage = self
            .storage
            .unwrap_or_else(|| Rc::new(NoopStorage) as Rc<dyn PreferenceStorage>);
        let document = self
            .document
            .unwrap_or_else(|| Rc::new(MemoryDocument::new()) as Rc<dyn DocumentRoot>);
        let query = self.query.unwrap_or_else(default_color_scheme);
        let initial: InitialColorMode = match self.initial {
            Some(initial) => initial,
            None => {
                let storage = Rc::clone(&storage);
                let query = Rc::clone(&query);
                let key = self.config.storage_key.clone();
                Rc::new(move || initial_color_mode(storage.as_ref(), query.as_ref(), &key))
            }
        };

        let inner = Rc::new(Inner {
            config: self.config,
            storage,
            document,
            query,
            initial,
            theme_name: Cell::new(Theme::Auto),
            watchers: ListenerSet::new(),
        });

        let weak = Rc::downgrade(&inner);
        let subscription = inner
            .query
            .subscribe(Rc::new(move |change: ColorSchemeChange| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_system_change(change.matches);
                }
            }));

        let stored = inner.storage.get(&inner.config.storage_key);
        inner.set_theme_name(Theme::from_preference(stored.as_deref()));
        log::debug!("ThemeProvider mounted in {} mode", inner.theme_name.get());

        ThemeProvider {
            inner,
            subscription: Some(subscription),
        }
    }
}

impl Default for ThemeProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_color_scheme() -> Rc<dyn ColorSchemeQuery> {
    Rc::new(crate::system::SystemColorScheme::new())
}

#[cfg(target_arch = "wasm32")]
fn default_color_scheme() -> Rc<dyn ColorSchemeQuery> {
    Rc::new(crate::media::SimulatedColorScheme::default())
}

/// A mounted theme store.
///
/// Owns the OS subscription. Dropping the provider (or calling
/// [`unmount`](Self::unmount)) releases it, after which OS changes have
/// no effect and outstanding [`ThemeHandle`]s report
/// [`ThemeError::ProviderUnmounted`].
pub struct ThemeProvider {
    inner: Rc<Inner>,
    subscription: Option<Subscription>,
}

impl ThemeProvider {
    pub fn builder() -> ThemeProviderBuilder {
        ThemeProviderBuilder::new()
    }

    /// A scope that makes this provider visible to [`use_theme`].
    pub fn scope(&self) -> Scope {
        Scope {
            theme: Some(self.handle()),
        }
    }

    pub fn handle(&self) -> ThemeHandle {
        ThemeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.inner.config
    }

    pub fn theme_name(&self) -> Theme {
        self.inner.theme_name.get()
    }

    /// Persists `dark`, writes it to the document and adopts it.
    pub fn set_dark_mode(&self) {
        self.inner.set_explicit(ColorMode::Dark);
    }

    /// Persists `light`, writes it to the document and adopts it.
    pub fn set_light_mode(&self) {
        self.inner.set_explicit(ColorMode::Light);
    }

    /// Forgets the persisted choice and renders whatever the bootstrap
    /// collaborator resolves. The logical theme becomes [`Theme::Auto`]
    /// regardless of that value.
    pub fn set_auto_mode(&self) {
        self.inner.set_auto_mode();
    }

    /// Handles an OS "prefers dark" change. Live notifications from the
    /// subscription arrive here.
    ///
    /// Does nothing while an explicit preference is stored. Otherwise
    /// updates the document attribute only, never
    /// [`theme_name`](Self::theme_name).
    pub fn on_system_change(&self, matches: bool) {
        self.inner.on_system_change(matches);
    }

    /// Applies the current snapshot of the OS query, with the same rules
    /// as [`on_system_change`](Self::on_system_change).
    pub fn sync_with_system(&self) {
        let matches = self.inner.query.matches();
        self.inner.on_system_change(matches);
    }

    /// Writes the theme that should render now to the document: the
    /// adopted explicit mode, or in auto mode the OS snapshot (under the
    /// same rules as [`sync_with_system`](Self::sync_with_system)).
    ///
    /// For hosts whose document starts out blank.
    pub fn apply_to_document(&self) {
        match self.inner.theme_name.get() {
            Theme::Auto => self.sync_with_system(),
            explicit => self.inner.set_document_theme(explicit),
        }
    }

    /// Unmounts now. Equivalent to dropping the provider.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for ThemeProvider {
    fn drop(&mut self) {
        drop(self.subscription.take());
        log::debug!("ThemeProvider unmounted");
    }
}

impl fmt::Debug for ThemeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeProvider")
            .field("config", &self.inner.config)
            .field("theme_name", &self.inner.theme_name.get())
            .finish_non_exhaustive()
    }
}

/// Consumer view of a mounted [`ThemeProvider`].
///
/// Handles are cheap to clone and do not keep the provider alive.
#[derive(Clone)]
pub struct ThemeHandle {
    inner: Weak<Inner>,
}

impl ThemeHandle {
    fn inner(&self) -> Result<Rc<Inner>, ThemeError> {
        self.inner.upgrade().ok_or(ThemeError::ProviderUnmounted)
    }

    pub fn theme_name(&self) -> Result<Theme, ThemeError> {
        Ok(self.inner()?.theme_name.get())
    }

    pub fn set_dark_mode(&self) -> Result<(), ThemeError> {
        self.inner()?.set_explicit(ColorMode::Dark);
        Ok(())
    }

    pub fn set_light_mode(&self) -> Result<(), ThemeError> {
        self.inner()?.set_explicit(ColorMode::Light);
        Ok(())
    }

    pub fn set_auto_mode(&self) -> Result<(), ThemeError> {
        self.inner()?.set_auto_mode();
        Ok(())
    }

    /// Calls `watcher` with the new value every time the logical theme
    /// changes, until the returned guard is dropped.
    pub fn subscribe(
        &self,
        watcher: impl Fn(Theme) + 'static,
    ) -> Result<Subscription, ThemeError> {
        Ok(self.inner()?.watchers.add(Rc::new(watcher)))
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl fmt::Debug for ThemeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeHandle")
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

/// Context handed down a tree of consumers.
///
/// [`Scope::root`] carries no provider. [`ThemeProvider::scope`] returns
/// one that does, and children inherit it through [`Scope::child`].
#[derive(Debug, Clone, Default)]
pub struct Scope {
    theme: Option<ThemeHandle>,
}

impl Scope {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self) -> Self {
        self.clone()
    }
}

/// Fetches the theme interface from the enclosing provider.
///
/// # Errors
///
/// [`ThemeError::MissingProvider`] if `scope` has no provider above it,
/// [`ThemeError::ProviderUnmounted`] if that provider is gone.
pub fn use_theme(scope: &Scope) -> Result<ThemeHandle, ThemeError> {
    let handle = scope.theme.clone().ok_or(ThemeError::MissingProvider)?;
    if !handle.is_mounted() {
        return Err(ThemeError::ProviderUnmounted);
    }
    Ok(handle)
}
