//! Comment directives: the ignore marker and the layout payload, both
//! activated only by line adjacency to the constructor callee.

use statelift::{ExtractOptions, ParseSession};

fn session(source: &str) -> ParseSession {
    crate::init_tracing();
    ParseSession::new(source, ExtractOptions::default()).expect("session builds")
}

#[test]
fn test_ignore_comment_on_previous_line() {
    let session = session(
        "// xstate-ignore-next-line\n\
         const m = createMachine({});\n",
    );
    let result = session.extract();
    assert!(result.machines[0].is_ignored());
}

#[test]
fn test_ignore_comment_two_lines_above_does_not_apply() {
    let session = session(
        "// xstate-ignore-next-line\n\
         \n\
         const m = createMachine({});\n",
    );
    let result = session.extract();
    assert!(!result.machines[0].is_ignored());
}

#[test]
fn test_ignore_applies_per_machine() {
    let session = session(
        "// xstate-ignore-next-line\n\
         const first = createMachine({});\n\
         const second = createMachine({});\n",
    );
    let result = session.extract();
    assert!(result.machines[0].is_ignored());
    assert!(!result.machines[1].is_ignored());
}

#[test]
fn test_block_comment_ignore_uses_its_last_line() {
    let session = session(
        "/*\n\
         * xstate-ignore-next-line\n\
         */\n\
         const m = createMachine({});\n",
    );
    let result = session.extract();
    assert!(result.machines[0].is_ignored());
}

#[test]
fn test_layout_comment_extracts_payload() {
    let session = session(
        "/** @xstate-layout N4IgpgJg5mDOIC5QBci0lA */\n\
         const m = createMachine({ id: \"laid-out\" });\n",
    );
    let result = session.extract();
    let layout = result.machines[0].layout_comment().unwrap();
    assert_eq!(layout.payload, "N4IgpgJg5mDOIC5QBci0lA");
}

#[test]
fn test_layout_comment_requires_adjacency() {
    let session = session(
        "/** @xstate-layout N4IgpgJg5mDOIC5QBci0lA */\n\
         \n\
         const m = createMachine({});\n",
    );
    let result = session.extract();
    assert!(result.machines[0].layout_comment().is_none());
}

#[test]
fn test_unmarked_comment_is_inert() {
    let session = session(
        "// plain note about this machine\n\
         const m = createMachine({});\n",
    );
    let result = session.extract();
    assert!(!result.machines[0].is_ignored());
    assert!(result.machines[0].layout_comment().is_none());
    assert_eq!(result.comments.len(), 1);
}
