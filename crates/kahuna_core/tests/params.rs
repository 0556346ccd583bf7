use kahuna_core::{
    update, AppState, Effect, Msg, NavigationState, NavigationUpdate, SearchForm, SearchParams,
    Timestamp,
};
use pretty_assertions::assert_eq;

#[test]
fn navigation_parses_and_ignores_unknown_keys() {
    let nav = NavigationState::from_query_string("?query=big+cat&since=2014-01-01&page=3");
    assert_eq!(nav.query(), "big cat");
    assert_eq!(nav.since(), "2014-01-01");
    assert_eq!(
        nav.params(),
        SearchParams::new("big cat", Some(Timestamp::new("2014-01-01")))
    );
}

#[test]
fn missing_or_empty_parameters_mean_no_filter() {
    let nav = NavigationState::from_query_string("");
    assert_eq!(nav.params(), SearchParams::default());

    let nav = NavigationState::from_query_string("query=&since=");
    assert_eq!(nav.params(), SearchParams::new("", None));
    assert_eq!(nav.to_query_string(), "");
}

#[test]
fn partial_updates_leave_the_other_field_alone() {
    let mut nav = NavigationState::from_query_string("query=cat&since=2014-01-01");

    nav.apply(&NavigationUpdate::Query("dog".to_string()));
    assert_eq!(nav.query(), "dog");
    assert_eq!(nav.since(), "2014-01-01");

    nav.apply(&NavigationUpdate::Since("2015-06-30".to_string()));
    assert_eq!(nav.query(), "dog");
    assert_eq!(nav.since(), "2015-06-30");
    assert_eq!(nav.to_query_string(), "query=dog&since=2015-06-30");
}

#[test]
fn form_seeding_is_silent_and_edits_name_one_field() {
    let nav = NavigationState::from_query_string("query=cat");
    let mut form = SearchForm::from_navigation(&nav);
    assert_eq!(form.query(), "cat");
    assert_eq!(form.since(), "");

    assert_eq!(form.edit_query("cat"), None);
    assert_eq!(
        form.edit_query("cats"),
        Some(NavigationUpdate::Query("cats".to_string()))
    );
    assert_eq!(
        form.edit_since("2014"),
        Some(NavigationUpdate::Since("2014".to_string()))
    );
    assert_eq!(form.query(), "cats");
}

#[test]
fn field_edits_become_navigate_effects() {
    let nav = NavigationState::from_query_string("query=cat&since=2014");
    let (state, effects) = update(AppState::new(), Msg::FormSynced(nav));
    assert!(effects.is_empty());
    assert_eq!(state.view().query, "cat");

    let (state, effects) = update(state, Msg::QueryEdited("cat".to_string()));
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::QueryEdited("dog".to_string()));
    assert_eq!(
        effects,
        vec![Effect::Navigate(NavigationUpdate::Query("dog".to_string()))]
    );

    let (state, effects) = update(state, Msg::SinceEdited(String::new()));
    assert_eq!(
        effects,
        vec![Effect::Navigate(NavigationUpdate::Since(String::new()))]
    );
    assert_eq!(state.view().since, "");
}
