//! OS color-scheme detection for native hosts.

use std::cell::Cell;
use std::fmt;
use std::sync::Mutex;

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use once_cell::sync::Lazy;

use crate::media::{ChangeListener, ColorSchemeChange, ColorSchemeQuery, ListenerSet, Subscription};
use crate::theme::ColorMode;

type ColorModeDetector = fn() -> ColorMode;

static COLOR_MODE_DETECTOR: Lazy<Mutex<ColorModeDetector>> =
    Lazy::new(|| Mutex::new(os_color_mode_detector));

/// Overrides the detector used to ask the OS for its preferred color mode.
///
/// This is useful for testing or when you want to force a specific color mode.
pub fn set_color_mode_detector(detector: ColorModeDetector) {
    let mut guard = COLOR_MODE_DETECTOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = detector;
}

/// Restores the detector that queries the OS.
pub fn reset_color_mode_detector() {
    set_color_mode_detector(os_color_mode_detector);
}

pub(crate) fn detect_color_mode() -> ColorMode {
    let detector = COLOR_MODE_DETECTOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    (*detector)()
}

fn os_color_mode_detector() -> ColorMode {
    if matches!(detect_os_theme(), OsThemeMode::Dark) {
        ColorMode::Dark
    } else {
        ColorMode::Light
    }
}

/// The OS dark-preference signal, read through `dark-light`.
///
/// Native platforms have no push notification for theme changes that
/// works everywhere, so the host drives [`poll`](Self::poll) from its
/// event loop. A change event goes out only when the value flips.
pub struct SystemColorScheme {
    last: Cell<bool>,
    listeners: ListenerSet<ColorSchemeChange>,
}

impl SystemColorScheme {
    pub fn new() -> Self {
        Self {
            last: Cell::new(detect_color_mode() == ColorMode::Dark),
            listeners: ListenerSet::new(),
        }
    }

    /// Re-detects the OS mode. Returns `true` if it changed, after
    /// notifying subscribers.
    pub fn poll(&self) -> bool {
        let prefers_dark = detect_color_mode() == ColorMode::Dark;
        if prefers_dark == self.last.replace(prefers_dark) {
            return false;
        }
        log::debug!(
            "OS color scheme changed to {}",
            if prefers_dark { "dark" } else { "light" }
        );
        self.listeners.notify(ColorSchemeChange {
            matches: prefers_dark,
        });
        true
    }
}

impl Default for SystemColorScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SystemColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemColorScheme")
            .field("prefers_dark", &self.last.get())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ColorSchemeQuery for SystemColorScheme {
    fn matches(&self) -> bool {
        self.last.get()
    }

    fn subscribe(&self, listener: ChangeListener) -> Subscription {
        self.listeners.add(listener)
    }
}
