mod support;

use pretty_assertions::assert_eq;
use rain_core::{update, AppState, BundleInfo, Effect, Msg, RECENT_BUNDLE_LIMIT};
use support::*;

#[test]
fn selections_are_remembered_newest_first() {
    let mut state = AppState::new();
    for hash in ["a", "b", "c", "a"] {
        state = select(state, hash).0;
    }
    let hashes: Vec<_> = state
        .recent_bundles()
        .entries()
        .iter()
        .map(|bundle| bundle.hash.clone())
        .collect();
    assert_eq!(hashes, vec!["a", "c", "b"]);
    assert_eq!(state.view().recent_bundles[0], "CN013 · bundle-a (a)");
}

#[test]
fn recent_list_is_capped() {
    let mut state = AppState::new();
    for idx in 0..(RECENT_BUNDLE_LIMIT + 3) {
        state = select(state, &format!("hash{idx}")).0;
    }
    assert_eq!(state.recent_bundles().len(), RECENT_BUNDLE_LIMIT);
}

#[test]
fn selection_emits_persist_effect() {
    let (_, effects) = update(AppState::new(), Msg::BundleSelected(bundle("a")));
    assert_eq!(
        effects[0],
        Effect::PersistRecentBundles(vec![bundle("a")])
    );
}

#[test]
fn restored_bundles_can_be_picked() {
    init_logging();
    let restored = vec![
        BundleInfo::new("r1", "first", None),
        BundleInfo::new("r2", "second", Some("CN001".into())),
    ];
    let (state, effects) = update(AppState::new(), Msg::RestoreRecentBundles(restored));
    assert!(effects.is_empty());
    assert_eq!(state.recent_bundles().len(), 2);
    assert!(state.active_bundle().is_none());

    let (state, effects) = update(state, Msg::RecentBundlePicked(1));
    assert_eq!(state.active_bundle().map(|b| b.hash.as_str()), Some("r2"));
    assert_eq!(node_fetches(&effects).len(), 1);
    assert_eq!(state.recent_bundles().get(0).map(|b| b.hash.as_str()), Some("r2"));

    let (_, effects) = update(state, Msg::RecentBundlePicked(5));
    assert!(effects.is_empty());
}
