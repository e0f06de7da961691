use std::path::PathBuf;

use rain_core::{update, AppState, Msg};

#[test]
fn editing_inputs_issues_no_requests() {
    let mut state = AppState::new();
    for msg in [
        Msg::IssueInputChanged("CN013".into()),
        Msg::UploadIssueChanged("CN013".into()),
        Msg::UploadBundleNameChanged("nightly".into()),
        Msg::UploadFilesChosen(vec![PathBuf::from("boot.log")]),
        Msg::SearchBundleChanged("lp1yp7".into()),
        Msg::SearchQueryChanged("panic".into()),
        Msg::SearchTimelineChanged("boot".into()),
    ] {
        let (next, effects) = update(state, msg);
        assert!(effects.is_empty());
        state = next;
    }

    assert_eq!(state.in_flight(), 0);
    let view = state.view();
    assert_eq!(view.issue.input, "CN013");
    assert_eq!(view.upload.file_count, 1);
    assert_eq!(view.search.query, "panic");
    assert!(view.search.scope.is_none());
}
