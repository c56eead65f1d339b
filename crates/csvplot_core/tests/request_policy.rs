mod common;

use common::{click_generate, edit, init_logging, ready_session};
use csvplot_core::{
    build_request, update, AppState, FormFields, MaxRangePolicy, MessageKind, Msg, RequestPolicy,
    SkipPolicy, ValidationError, DEFAULT_SIZE, DEFAULT_TITLE,
};
use csvplot_core::FormField;
use pretty_assertions::assert_eq;

fn form(columns: &str) -> FormFields {
    FormFields {
        columns: columns.to_string(),
        ..FormFields::default()
    }
}

fn policy(max_range: MaxRangePolicy, skip: SkipPolicy) -> RequestPolicy {
    RequestPolicy {
        max_range,
        skip,
        ..RequestPolicy::default()
    }
}

#[test]
fn blank_fields_fall_back_to_defaults() {
    let request = build_request(&form("a"), &RequestPolicy::default()).unwrap();
    assert_eq!(request.columns(), ["a".to_string()]);
    assert_eq!(request.title(), DEFAULT_TITLE);
    assert_eq!(request.size(), DEFAULT_SIZE);
    assert_eq!(request.max_range(), None);
    assert_eq!(request.skip(), 1);
    assert!(!request.xdata());
    assert_eq!(request.xscale(), None);

    let custom = RequestPolicy {
        default_title: "Plot".to_string(),
        default_size: "640x480".to_string(),
        ..RequestPolicy::default()
    };
    let mut fields = form("a");
    fields.title = "   ".to_string();
    let request = build_request(&fields, &custom).unwrap();
    assert_eq!(request.title(), "Plot");
    assert_eq!(request.size(), "640x480");
}

#[test]
fn size_is_passed_through_unvalidated() {
    let mut fields = form("a");
    fields.size = "huge".to_string();
    let request = build_request(&fields, &RequestPolicy::default()).unwrap();
    assert_eq!(request.size(), "huge");
}

#[test]
fn empty_columns_are_rejected() {
    let err = build_request(&form(" , "), &RequestPolicy::default()).unwrap_err();
    assert_eq!(err, ValidationError::NoColumns);
}

#[test]
fn unparsable_range_follows_policy() {
    let mut fields = form("a");
    for raw in ["", "abc", "NaN"] {
        fields.max_range = raw.to_string();
        let absent = policy(MaxRangePolicy::AbsentWhenUnparsable, SkipPolicy::Clamp);
        let zero = policy(MaxRangePolicy::ZeroWhenUnparsable, SkipPolicy::Clamp);
        assert_eq!(build_request(&fields, &absent).unwrap().max_range(), None);
        assert_eq!(build_request(&fields, &zero).unwrap().max_range(), Some(0.0));
    }

    fields.max_range = "0".to_string();
    let absent = policy(MaxRangePolicy::AbsentWhenUnparsable, SkipPolicy::Clamp);
    assert_eq!(build_request(&fields, &absent).unwrap().max_range(), Some(0.0));
}

#[test]
fn numeric_fields_accept_a_leading_number() {
    let mut fields = form("a");
    fields.max_range = "100px".to_string();
    fields.skip = "2.5".to_string();
    let request = build_request(&fields, &RequestPolicy::default()).unwrap();
    assert_eq!(request.max_range(), Some(100.0));
    assert_eq!(request.skip(), 2);

    fields.max_range = " 3abc".to_string();
    fields.skip = "3abc".to_string();
    let request = build_request(&fields, &RequestPolicy::default()).unwrap();
    assert_eq!(request.max_range(), Some(3.0));
    assert_eq!(request.skip(), 3);
}

#[test]
fn leading_number_reaches_the_backend_options() {
    init_logging();
    let state = edit(ready_session(), FormField::Columns, "y");
    let state = edit(state, FormField::MaxRange, "100px");
    let state = edit(state, FormField::Skip, "2.5");
    let (_state, _id, options) = click_generate(state);
    assert_eq!(options["maxRange"], 100.0);
    assert_eq!(options["skip"], 2);
}

#[test]
fn skip_zero_is_clamped_under_clamp_policy() {
    let mut fields = form("a");
    let clamp = policy(MaxRangePolicy::AbsentWhenUnparsable, SkipPolicy::Clamp);
    for raw in ["0", "-4", "", "two"] {
        fields.skip = raw.to_string();
        assert_eq!(build_request(&fields, &clamp).unwrap().skip(), 1, "skip={raw:?}");
    }
    fields.skip = " 5 ".to_string();
    assert_eq!(build_request(&fields, &clamp).unwrap().skip(), 5);
}

#[test]
fn skip_zero_is_rejected_under_reject_policy() {
    let mut fields = form("a");
    let reject = policy(MaxRangePolicy::AbsentWhenUnparsable, SkipPolicy::DefaultThenReject);

    fields.skip = "0".to_string();
    assert_eq!(
        build_request(&fields, &reject).unwrap_err(),
        ValidationError::SkipBelowOne(0)
    );

    fields.skip = "not a number".to_string();
    assert_eq!(build_request(&fields, &reject).unwrap().skip(), 1);
}

#[test]
fn reject_policy_surfaces_validation_message_without_invoking() {
    init_logging();
    let reject = policy(MaxRangePolicy::AbsentWhenUnparsable, SkipPolicy::DefaultThenReject);
    let (state, _) = update(AppState::with_policy(reject), Msg::Startup);
    let (state, _) = update(state, Msg::BackendReady);
    let state = common::load_file(state, "data.csv", "a\n1\n");
    let state = edit(state, FormField::Columns, "a");
    let state = edit(state, FormField::Skip, "0");

    let (state, effects) = update(state, Msg::GenerateClicked);
    assert!(effects.is_empty());
    let message = state.view().message.expect("validation message");
    assert_eq!(message.kind, MessageKind::Validation);
    assert!(message.text.contains("at least 1"));
}

#[test]
fn clamp_policy_sends_skip_of_one_for_zero_input() {
    init_logging();
    let state = edit(ready_session(), FormField::Columns, "y");
    let state = edit(state, FormField::Skip, "0");
    let (_state, _id, options) = click_generate(state);
    assert_eq!(options["skip"], 1);
}

#[test]
fn policy_is_loadable_from_ron() {
    let parsed: RequestPolicy =
        ron::from_str("(max_range: ZeroWhenUnparsable, skip: DefaultThenReject)").unwrap();
    assert_eq!(parsed.max_range, MaxRangePolicy::ZeroWhenUnparsable);
    assert_eq!(parsed.skip, SkipPolicy::DefaultThenReject);
    assert_eq!(parsed.default_title, DEFAULT_TITLE);
}
