//! Resolving the theme a page should paint with before the provider mounts.

use std::rc::Rc;

use crate::media::ColorSchemeQuery;
use crate::storage::PreferenceStorage;
use crate::theme::{resolve_for_match, Theme};

/// Nullary collaborator returning the theme to render right now.
///
/// The provider calls it when reverting to automatic mode, after the
/// persisted preference has been removed.
pub type InitialColorMode = Rc<dyn Fn() -> Theme>;

/// The persisted explicit choice if there is one, otherwise whatever the
/// OS currently prefers. Never returns [`Theme::Auto`].
pub fn initial_color_mode(
    storage: &dyn PreferenceStorage,
    query: &dyn ColorSchemeQuery,
    key: &str,
) -> Theme {
    match Theme::from_preference(storage.get(key).as_deref()) {
        Theme::Auto => resolve_for_match(query.matches()).into(),
        explicit => explicit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::SimulatedColorScheme;
    use crate::storage::MemoryStorage;

    const KEY: &str = "data-expo-theme";

    #[test]
    fn test_persisted_choice_wins() {
        let storage = MemoryStorage::with_entry(KEY, "light");
        let query = SimulatedColorScheme::new(true);
        assert_eq!(initial_color_mode(&storage, &query, KEY), Theme::Light);
    }

    #[test]
    fn test_falls_back_to_os() {
        let storage = MemoryStorage::new();
        assert_eq!(
            initial_color_mode(&storage, &SimulatedColorScheme::new(true), KEY),
            Theme::Dark
        );
        assert_eq!(
            initial_color_mode(&storage, &SimulatedColorScheme::new(false), KEY),
            Theme::Light
        );
    }

    #[test]
    fn test_unrecognised_value_falls_back_to_os() {
        let storage = MemoryStorage::with_entry(KEY, "auto");
        let query = SimulatedColorScheme::new(true);
        assert_eq!(initial_color_mode(&storage, &query, KEY), Theme::Dark);
    }
}
