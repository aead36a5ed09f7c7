//! The search box over an artifact loaded from disk.

use std::time::Duration;

use docsift::{
    load_index, ArtifactWriter, Effect, Event, KeyPress, LocaleKey, Phase, SearchController,
};

use super::common::{fixture_config, fixture_index};

fn controller_for(locale: &str) -> (tempfile::TempDir, SearchController) {
    let dir = tempfile::tempdir().unwrap();
    ArtifactWriter::new(dir.path()).write(&fixture_index()).unwrap();
    let handle = load_index(dir.path(), &LocaleKey::new(locale));
    let controller = SearchController::new(fixture_config().controller_config(), handle);
    (dir, controller)
}

#[test]
fn test_hotkey_type_and_navigate() {
    let (_dir, mut controller) = controller_for("/");

    let effects = controller.handle(Event::HotKey(KeyPress::key("k").with_ctrl()));
    assert_eq!(effects, vec![Effect::FocusInput, Effect::PreventDefault]);

    controller.handle(Event::Input("install".into()));
    let state = controller.state();
    assert_eq!(state.phase, Phase::Showing);
    assert_eq!(state.suggestions.len(), 4);
    assert_eq!(state.highlighted, Some(0));

    controller.handle(Event::ArrowDown);
    let effects = controller.handle(Event::Enter);
    assert_eq!(
        effects,
        vec![Effect::Navigate("/guide/config.html#install-options".into())]
    );
    assert_eq!(controller.state().phase, Phase::Closed);
}

#[test]
fn test_plain_k_is_not_a_hotkey() {
    let (_dir, mut controller) = controller_for("/");
    assert!(controller
        .handle(Event::HotKey(KeyPress::key("k")))
        .is_empty());
    assert!(!controller.state().is_open());
}

#[test]
fn test_locale_artifact_drives_localized_suggestions() {
    let (_dir, mut controller) = controller_for("/zh/");
    controller.handle(Event::HotKey(KeyPress::key("/")));
    controller.handle(Event::Input("安装".into()));

    let titles: Vec<_> = controller
        .state()
        .suggestions
        .iter()
        .map(|s| s.title.as_str())
        .collect();
    assert_eq!(titles, vec!["安装", "配置", "安装"]);
}

#[test]
fn test_debounced_refresh_over_loaded_artifact() {
    let (_dir, controller) = controller_for("/");
    let mut config = controller.config().clone();
    config.debounce = Duration::from_millis(150);
    let mut controller = SearchController::new(config, controller.index().clone());

    let first = controller.handle(Event::Input("conf".into()));
    let second = controller.handle(Event::Input("config".into()));
    let token = |effects: &[Effect]| match effects {
        [Effect::ScheduleRefresh { token, delay }] => {
            assert_eq!(*delay, Duration::from_millis(150));
            *token
        }
        other => panic!("expected one scheduled refresh, got {:?}", other),
    };
    let (stale, current) = (token(&first[..]), token(&second[..]));

    controller.handle(Event::Tick(stale));
    assert!(controller.state().suggestions.is_empty());

    controller.handle(Event::Tick(current));
    assert_eq!(controller.state().suggestions[0].title, "Config");
}

#[test]
fn test_missing_artifact_keeps_box_usable() {
    let dir = tempfile::tempdir().unwrap();
    let handle = load_index(dir.path(), &LocaleKey::root());
    let mut controller = SearchController::new(fixture_config().controller_config(), handle);

    controller.handle(Event::Focus);
    controller.handle(Event::Input("install".into()));
    assert!(controller.state().is_open());
    assert!(controller.state().suggestions.is_empty());
    assert!(controller.handle(Event::Enter).is_empty());
}
