//! Integration tests for the mounted theme store.
//!
//! Each test wires a provider to in-memory storage, an in-memory document
//! and a simulated OS query, then drives it only through the public API.

use std::rc::Rc;

use expo_theme::{
    use_theme, DocumentRoot, FileStorage, MemoryDocument, MemoryStorage, PreferenceStorage,
    Scope, SimulatedColorScheme, Theme, ThemeError, ThemeHandle, ThemeProvider,
};
use proptest::prelude::*;

const KEY: &str = "data-expo-theme";

struct Harness {
    storage: Rc<MemoryStorage>,
    document: Rc<MemoryDocument>,
    query: Rc<SimulatedColorScheme>,
    provider: ThemeProvider,
}

impl Harness {
    fn mount(stored: Option<&str>, prefers_dark: bool) -> Self {
        Self::mount_with(stored, prefers_dark, None)
    }

    fn mount_with(stored: Option<&str>, prefers_dark: bool, initial: Option<Theme>) -> Self {
        let storage = Rc::new(match stored {
            Some(value) => MemoryStorage::with_entry(KEY, value),
            None => MemoryStorage::new(),
        });
        let document = Rc::new(MemoryDocument::new());
        let query = Rc::new(SimulatedColorScheme::new(prefers_dark));

        let mut builder = ThemeProvider::builder()
            .storage(storage.clone())
            .document(document.clone())
            .color_scheme(query.clone());
        if let Some(initial) = initial {
            builder = builder.initial_color_mode(move || initial);
        }

        Self {
            storage,
            document,
            query,
            provider: builder.mount(),
        }
    }

    fn theme(&self) -> ThemeHandle {
        use_theme(&self.provider.scope()).unwrap()
    }

    fn attribute(&self) -> Option<String> {
        self.document.attribute(KEY)
    }

    fn stored(&self) -> Option<String> {
        self.storage.get(KEY)
    }
}

#[test]
fn dark_mode_sets_observable_attribute_and_storage() {
    let h = Harness::mount(None, false);
    h.theme().set_dark_mode().unwrap();

    assert_eq!(h.theme().theme_name().unwrap(), Theme::Dark);
    assert_eq!(h.attribute().as_deref(), Some("dark"));
    assert_eq!(h.stored().as_deref(), Some("dark"));
}

#[test]
fn light_mode_sets_observable_attribute_and_storage() {
    let h = Harness::mount(Some("dark"), true);
    h.theme().set_light_mode().unwrap();

    assert_eq!(h.theme().theme_name().unwrap(), Theme::Light);
    assert_eq!(h.attribute().as_deref(), Some("light"));
    assert_eq!(h.stored().as_deref(), Some("light"));
}

#[test]
fn auto_mode_is_auto_whatever_the_collaborator_says() {
    for resolved in [Theme::Dark, Theme::Light] {
        let h = Harness::mount_with(Some("light"), false, Some(resolved));
        h.theme().set_auto_mode().unwrap();

        assert_eq!(h.theme().theme_name().unwrap(), Theme::Auto);
        assert_eq!(h.attribute().as_deref(), Some(resolved.as_str()));
        assert_eq!(h.stored(), None);
    }
}

#[test]
fn auto_mode_removes_preference_even_when_none_stored() {
    let h = Harness::mount(None, true);
    h.theme().set_auto_mode().unwrap();
    assert_eq!(h.stored(), None);
    assert_eq!(h.attribute().as_deref(), Some("dark"));
}

#[test]
fn mount_prefers_dark_os_resolves_to_auto_without_touching_document() {
    let h = Harness::mount(None, true);

    assert_eq!(h.theme().theme_name().unwrap(), Theme::Auto);
    assert_eq!(h.attribute(), None);
    assert_eq!(h.document.write_count(), 0);
}

#[test]
fn mount_adopts_stored_light() {
    let h = Harness::mount(Some("light"), true);
    assert_eq!(h.theme().theme_name().unwrap(), Theme::Light);
}

#[test]
fn explicit_preference_overrides_os_change() {
    let h = Harness::mount(Some("dark"), true);
    h.theme().set_dark_mode().unwrap();
    let writes = h.document.write_count();

    h.query.emit(false);

    assert_eq!(h.theme().theme_name().unwrap(), Theme::Dark);
    assert_eq!(h.attribute().as_deref(), Some("dark"));
    assert_eq!(h.document.write_count(), writes);
}

#[test]
fn os_change_in_auto_mode_moves_attribute_not_observable() {
    let h = Harness::mount(None, false);

    h.query.emit(true);
    assert_eq!(h.attribute().as_deref(), Some("dark"));

    h.query.emit(false);
    assert_eq!(h.attribute().as_deref(), Some("light"));

    assert_eq!(h.theme().theme_name().unwrap(), Theme::Auto);
}

#[test]
fn os_changes_resume_after_returning_to_auto() {
    let h = Harness::mount(None, false);
    let theme = h.theme();

    theme.set_light_mode().unwrap();
    h.query.emit(true);
    assert_eq!(h.attribute().as_deref(), Some("light"));

    theme.set_auto_mode().unwrap();
    h.query.emit(true);
    assert_eq!(h.attribute().as_deref(), Some("dark"));
}

#[test]
fn no_mutation_after_unmount() {
    let Harness {
        storage,
        document,
        query,
        provider,
    } = Harness::mount(None, false);
    let handle = provider.handle();

    assert_eq!(query.listener_count(), 1);
    provider.unmount();
    assert_eq!(query.listener_count(), 0);

    query.emit(true);
    query.emit(false);

    assert_eq!(document.write_count(), 0);
    assert_eq!(storage.get(KEY), None);
    assert_eq!(handle.theme_name(), Err(ThemeError::ProviderUnmounted));
}

#[test]
fn use_theme_without_provider_fails_fast() {
    let scope = Scope::root().child();
    let err = use_theme(&scope).unwrap_err();

    assert_eq!(err, ThemeError::MissingProvider);
    assert!(err.to_string().contains("ThemeProvider"));
}

#[test]
fn two_providers_are_independent() {
    let a = Harness::mount(None, false);
    let b = Harness::mount(None, false);

    a.theme().set_dark_mode().unwrap();

    assert_eq!(a.theme().theme_name().unwrap(), Theme::Dark);
    assert_eq!(b.theme().theme_name().unwrap(), Theme::Auto);
    assert_eq!(b.attribute(), None);
}

#[test]
fn file_backed_preference_survives_remount() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    {
        let provider = ThemeProvider::builder()
            .storage(Rc::new(FileStorage::new(&path)))
            .color_scheme(Rc::new(SimulatedColorScheme::new(false)))
            .mount();
        provider.set_dark_mode();
    }

    let provider = ThemeProvider::builder()
        .storage(Rc::new(FileStorage::new(&path)))
        .color_scheme(Rc::new(SimulatedColorScheme::new(false)))
        .mount();
    assert_eq!(provider.theme_name(), Theme::Dark);
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Dark,
    Light,
    Auto,
    Os(bool),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Dark),
        Just(Step::Light),
        Just(Step::Auto),
        any::<bool>().prop_map(Step::Os),
    ]
}

fn apply(h: &Harness, step: Step) {
    let theme = h.theme();
    match step {
        Step::Dark => theme.set_dark_mode().unwrap(),
        Step::Light => theme.set_light_mode().unwrap(),
        Step::Auto => theme.set_auto_mode().unwrap(),
        Step::Os(matches) => h.query.emit(matches),
    }
}

fn snapshot(h: &Harness) -> (Theme, Option<String>, Option<String>) {
    (h.theme().theme_name().unwrap(), h.attribute(), h.stored())
}

proptest! {
    #[test]
    fn last_explicit_command_wins(
        steps in prop::collection::vec(step(), 0..12),
        finish_dark in any::<bool>(),
        trailing_os in prop::collection::vec(any::<bool>(), 0..4),
    ) {
        let h = Harness::mount(None, false);
        for s in steps {
            apply(&h, s);
        }
        apply(&h, if finish_dark { Step::Dark } else { Step::Light });
        for matches in trailing_os {
            apply(&h, Step::Os(matches));
        }

        let expected = if finish_dark { Theme::Dark } else { Theme::Light };
        prop_assert_eq!(h.theme().theme_name().unwrap(), expected);
        let attribute = h.attribute();
        let stored = h.stored();
        prop_assert_eq!(attribute.as_deref(), Some(expected.as_str()));
        prop_assert_eq!(stored.as_deref(), Some(expected.as_str()));
    }

    #[test]
    fn commands_are_idempotent(
        steps in prop::collection::vec(step(), 0..10),
        last in step(),
    ) {
        let once = Harness::mount(None, false);
        let twice = Harness::mount(None, false);

        for s in &steps {
            apply(&once, *s);
            apply(&twice, *s);
        }
        apply(&once, last);
        apply(&twice, last);
        apply(&twice, last);

        prop_assert_eq!(snapshot(&once), snapshot(&twice));
    }

    #[test]
    fn auto_always_clears_storage(
        steps in prop::collection::vec(step(), 0..10),
        prefers_dark in any::<bool>(),
    ) {
        let h = Harness::mount(None, prefers_dark);
        for s in steps {
            apply(&h, s);
        }
        apply(&h, Step::Auto);

        prop_assert_eq!(h.stored(), None);
        prop_assert_eq!(h.theme().theme_name().unwrap(), Theme::Auto);
    }

    #[test]
    fn attribute_is_never_auto(steps in prop::collection::vec(step(), 0..16)) {
        let h = Harness::mount(None, false);
        for s in steps {
            apply(&h, s);
            let attribute = h.attribute();
            prop_assert!(matches!(attribute.as_deref(), None | Some("dark") | Some("light")));
        }
    }
}
