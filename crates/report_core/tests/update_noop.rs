use report_core::{update, AppState, Msg, SortColumn};

#[test]
fn table_messages_without_tables_are_noops() {
    let state = AppState::new();
    for msg in [
        Msg::RowToggled {
            group: 0,
            local_index: 1,
        },
        Msg::FilterChanged {
            group: 0,
            text: "refund".to_string(),
        },
        Msg::SortChanged {
            group: 0,
            column: SortColumn::Relevance,
        },
        Msg::NotificationDismissed,
    ] {
        let (mut next, effects) = update(state.clone(), msg);
        assert_eq!(state, next);
        assert!(effects.is_empty());
        assert!(!next.consume_dirty());
    }
}

#[test]
fn tick_without_pending_summary_is_noop() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::Tick);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
