mod support;

use pretty_assertions::assert_eq;
use rain_core::{update, AppState, FetchIntent, Msg};
use support::*;

fn reply(
    state: AppState,
    node_id: &str,
    parent_id: Option<&str>,
    result: Result<rain_core::NodeListing, String>,
) -> AppState {
    let generation = state.tree().generation();
    let (state, effects) = update(
        state,
        Msg::NodeFetched {
            generation,
            node_id: node_id.to_string(),
            parent_id: parent_id.map(str::to_owned),
            intent: FetchIntent::Click,
            result,
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn unloaded_directory_fetches_children_before_toggling() {
    init_logging();
    let state = select_with_root("b1", vec![dir("1", "logs"), file("2", "a.log", 5)]);

    let (state, effects) = update(state, Msg::NodeClicked("1".into()));
    assert_eq!(
        node_fetches(&effects),
        vec![("1".to_string(), Some("root".to_string()), FetchIntent::Click)]
    );
    assert!(!state.tree().is_expanded("1"));
    assert_eq!(state.tree().selected(), Some("root"));

    let state = reply(
        state,
        "1",
        Some("root"),
        Ok(listing(dir("1", "logs"), vec![file("3", "kernel.log", 9)])),
    );

    let node = state.tree().cache().get("1").unwrap();
    assert!(node.has_loaded_children);
    assert_eq!(node.children_ids, vec!["3"]);
    assert!(state.tree().is_expanded("1"));
    assert_eq!(state.tree().selected(), Some("1"));
    assert_eq!(
        state.tree().cache().get("3").unwrap().parent_id.as_deref(),
        Some("1")
    );
}

#[test]
fn loaded_directory_toggles_without_fetch() {
    let state = select_with_root("b1", vec![dir("1", "logs")]);
    let before = state.tree().expanded().clone();

    let (state, effects) = update(state, Msg::NodeClicked("root".into()));
    assert!(effects.is_empty());
    assert!(!state.tree().is_expanded("root"));

    let (state, effects) = update(state, Msg::NodeClicked("root".into()));
    assert!(effects.is_empty());
    assert_eq!(state.tree().expanded(), &before);
}

#[test]
fn leaf_click_only_selects() {
    let state = select_with_root("b1", vec![file("2", "a.log", 5)]);
    let expanded = state.tree().expanded().clone();

    let (state, effects) = update(state, Msg::NodeClicked("2".into()));

    assert!(effects.is_empty());
    assert_eq!(state.tree().selected(), Some("2"));
    assert_eq!(state.tree().expanded(), &expanded);
    let selected = state.view().tree.selected.unwrap();
    assert!(!selected.is_dir);
    assert_eq!(selected.size_bytes, Some(5));
}

#[test]
fn absent_node_is_fetched_first() {
    let state = select_with_root("b1", Vec::new());

    let (state, effects) = update(state, Msg::NodeClicked("42".into()));
    assert_eq!(
        node_fetches(&effects),
        vec![("42".to_string(), None, FetchIntent::Click)]
    );

    let state = reply(
        state,
        "42",
        None,
        Ok(listing(file("42", "orphan.log", 1), Vec::new())),
    );
    let node = state.tree().cache().get("42").unwrap();
    assert_eq!(node.parent_id, None);
    assert_eq!(state.tree().selected(), Some("42"));
    assert!(!state.tree().is_expanded("42"));
}

#[test]
fn failed_click_fetch_keeps_selection() {
    let state = select_with_root("b1", vec![dir("1", "logs")]);
    let (state, _) = update(state, Msg::NodeClicked("1".into()));

    let state = reply(state, "1", Some("root"), Err("file 1 not found".into()));

    assert_eq!(state.tree().selected(), Some("root"));
    assert!(!state.tree().is_expanded("1"));
    assert!(!state.tree().cache().get("1").unwrap().has_loaded_children);
    assert_eq!(state.view().tree.error.as_deref(), Some("file 1 not found"));
    assert_eq!(state.in_flight(), 0);
}

#[test]
fn click_reply_after_bundle_switch_is_ignored() {
    init_logging();
    let state = select_with_root("b1", vec![dir("1", "logs")]);
    let (state, effects) = update(state, Msg::NodeClicked("1".into()));
    let stale_generation = state.tree().generation();
    assert_eq!(node_fetches(&effects).len(), 1);

    let (state, _) = select(state, "b2");
    let (state, _) = update(
        state,
        Msg::NodeFetched {
            generation: stale_generation,
            node_id: "1".into(),
            parent_id: Some("root".into()),
            intent: FetchIntent::Click,
            result: Ok(listing(dir("1", "logs"), vec![file("3", "k.log", 1)])),
        },
    );

    assert!(state.tree().cache().is_empty());
    assert_eq!(state.tree().selected(), None);
    assert_eq!(state.in_flight(), 1);
}

#[test]
fn click_without_bundle_does_nothing() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NodeClicked("root".into()));
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn repeated_loads_converge() {
    let state = select_with_root("b1", vec![dir("1", "logs")]);
    let children = vec![file("3", "a.log", 1), file("4", "b.log", 2)];

    let state = reply(state, "1", Some("root"), Ok(listing(dir("1", "logs"), children.clone())));
    let first = state.tree().cache().clone();
    let state = reply(state, "1", Some("root"), Ok(listing(dir("1", "logs"), children)));

    assert_eq!(state.tree().cache(), &first);
}
