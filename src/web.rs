//! Browser capabilities: `localStorage`, the `<html>` element and
//! `matchMedia`.
//!
//! Every type here degrades to a harmless no-op when the corresponding
//! browser object is unavailable, so a provider can always be mounted.

use std::fmt;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, MediaQueryList, MediaQueryListEvent, Storage};

use crate::config::ThemeConfig;
use crate::document::DocumentRoot;
use crate::media::{ChangeListener, ColorSchemeChange, ColorSchemeQuery, Subscription};
use crate::provider::{ThemeProvider, ThemeProviderBuilder};
use crate::storage::PreferenceStorage;

/// `window.localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| match window.local_storage() {
            Ok(storage) => storage,
            Err(e) => {
                log::warn!("localStorage access error: {:?}", e);
                None
            }
        });
        if storage.is_none() {
            log::debug!("localStorage not available, preferences will not persist");
        }
        Self { storage }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.set_item(key, value) {
                log::warn!("Failed to save '{}' to localStorage: {:?}", key, e);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.remove_item(key) {
                log::warn!("Failed to remove '{}' from localStorage: {:?}", key, e);
            }
        }
    }
}

/// `document.documentElement`.
#[derive(Debug, Clone)]
pub struct DocumentElement {
    root: Option<Element>,
}

impl DocumentElement {
    pub fn new() -> Self {
        let root = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element());
        Self { root }
    }
}

impl Default for DocumentElement {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRoot for DocumentElement {
    fn set_attribute(&self, name: &str, value: &str) {
        if let Some(root) = &self.root {
            if let Err(e) = root.set_attribute(name, value) {
                log::warn!("Failed to set {}={} on the document: {:?}", name, value, e);
            }
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.root.as_ref()?.get_attribute(name)
    }
}

/// `window.matchMedia(query)` with `change` event delivery.
pub struct BrowserColorScheme {
    query: Option<MediaQueryList>,
}

impl BrowserColorScheme {
    pub fn new(media_query: &str) -> Self {
        let query = web_sys::window().and_then(|window| match window.match_media(media_query) {
            Ok(query) => query,
            Err(e) => {
                log::warn!("matchMedia('{}') failed: {:?}", media_query, e);
                None
            }
        });
        Self { query }
    }
}

impl fmt::Debug for BrowserColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserColorScheme")
            .field("available", &self.query.is_some())
            .finish()
    }
}

impl ColorSchemeQuery for BrowserColorScheme {
    fn matches(&self) -> bool {
        self.query.as_ref().map(|query| query.matches()).unwrap_or(false)
    }

    fn subscribe(&self, listener: ChangeListener) -> Subscription {
        let Some(query) = self.query.clone() else {
            return Subscription::detached();
        };

        let callback = Closure::<dyn FnMut(MediaQueryListEvent)>::new(
            move |event: MediaQueryListEvent| {
                listener(ColorSchemeChange {
                    matches: event.matches(),
                })
            },
        );
        if let Err(e) =
            query.add_event_listener_with_callback("change", callback.as_ref().unchecked_ref())
        {
            log::warn!("Failed to listen for color scheme changes: {:?}", e);
            return Subscription::detached();
        }

        Subscription::new(move || {
            if let Err(e) = query
                .remove_event_listener_with_callback("change", callback.as_ref().unchecked_ref())
            {
                log::warn!("Failed to stop listening for color scheme changes: {:?}", e);
            }
        })
    }
}

/// A builder wired to the page's storage, root element and media query.
pub fn browser_builder(config: ThemeConfig) -> ThemeProviderBuilder {
    let query = BrowserColorScheme::new(&config.media_query);
    ThemeProvider::builder()
        .storage(Rc::new(LocalStorage::new()))
        .document(Rc::new(DocumentElement::new()))
        .color_scheme(Rc::new(query))
        .config(config)
}
