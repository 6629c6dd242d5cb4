use visualizer_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn cancel_without_session_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::CancelClicked);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
