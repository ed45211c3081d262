// Status vocabulary codec: UI-facing ("TO DO") vs store-facing ("todo").
//
// The presentation layer and the remote store disagree on how a task status
// is spelled. `to_ui` / `to_store` translate between the two, tolerating the
// legacy synonyms the store has emitted over time. Both directions are total:
// unrecognized input is case-folded and passed through rather than rejected,
// so a vocabulary drift on the server can never fail a sync.

/// Canonical UI status values.
pub const UI_TODO: &str = "TO DO";
pub const UI_IN_PROGRESS: &str = "IN PROGRESS";
pub const UI_DONE: &str = "DONE";

/// Canonical store status values.
pub const STORE_TODO: &str = "todo";
pub const STORE_IN_PROGRESS: &str = "in_progress";
pub const STORE_DONE: &str = "done";

/// Translate a store-side status (or legacy synonym) to the UI vocabulary.
///
/// Case-insensitive. Unrecognized input is upper-cased and returned verbatim.
pub fn to_ui(raw: &str) -> String {
    match raw.to_ascii_lowercase().as_str() {
        "todo" | "to do" => UI_TODO.to_string(),
        "in_progress" | "in progress" | "inprogress" => UI_IN_PROGRESS.to_string(),
        "done" | "complete" | "completed" => UI_DONE.to_string(),
        _ => raw.to_ascii_uppercase(),
    }
}

/// Translate a UI-side status to the store vocabulary.
///
/// Case-insensitive on the UI form. Unrecognized input defaults to its
/// lower-cased form.
pub fn to_store(ui: &str) -> String {
    match ui.to_ascii_lowercase().as_str() {
        "to do" | "todo" => STORE_TODO.to_string(),
        "in progress" | "in_progress" | "inprogress" => STORE_IN_PROGRESS.to_string(),
        "done" | "complete" | "completed" => STORE_DONE.to_string(),
        _ => ui.to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── Synonym table ───────────────────────────────────────────────

    #[test]
    fn to_ui_maps_canonical_store_values() {
        assert_eq!(to_ui("todo"), UI_TODO);
        assert_eq!(to_ui("in_progress"), UI_IN_PROGRESS);
        assert_eq!(to_ui("done"), UI_DONE);
    }

    #[test]
    fn to_ui_maps_legacy_synonyms() {
        assert_eq!(to_ui("to do"), UI_TODO);
        assert_eq!(to_ui("in progress"), UI_IN_PROGRESS);
        assert_eq!(to_ui("inprogress"), UI_IN_PROGRESS);
        assert_eq!(to_ui("complete"), UI_DONE);
        assert_eq!(to_ui("completed"), UI_DONE);
    }

    #[test]
    fn to_ui_is_case_insensitive() {
        assert_eq!(to_ui("TODO"), UI_TODO);
        assert_eq!(to_ui("In_Progress"), UI_IN_PROGRESS);
        assert_eq!(to_ui("Completed"), UI_DONE);
    }

    #[test]
    fn to_ui_passes_unknown_through_uppercased() {
        assert_eq!(to_ui("blocked"), "BLOCKED");
        assert_eq!(to_ui("On Hold"), "ON HOLD");
        assert_eq!(to_ui(""), "");
    }

    #[test]
    fn to_store_maps_canonical_ui_values() {
        assert_eq!(to_store(UI_TODO), STORE_TODO);
        assert_eq!(to_store(UI_IN_PROGRESS), STORE_IN_PROGRESS);
        assert_eq!(to_store(UI_DONE), STORE_DONE);
    }

    #[test]
    fn to_store_is_case_insensitive() {
        assert_eq!(to_store("to do"), STORE_TODO);
        assert_eq!(to_store("In Progress"), STORE_IN_PROGRESS);
        assert_eq!(to_store("done"), STORE_DONE);
    }

    #[test]
    fn to_store_defaults_unknown_to_lowercase() {
        assert_eq!(to_store("BLOCKED"), "blocked");
        assert_eq!(to_store("On Hold"), "on hold");
    }

    // ── Round-trip laws ─────────────────────────────────────────────

    #[test]
    fn ui_round_trips_through_store() {
        for ui in [UI_TODO, UI_IN_PROGRESS, UI_DONE] {
            assert_eq!(to_ui(&to_store(ui)), ui);
        }
    }

    #[test]
    fn synonyms_normalize_to_canonical_store_values() {
        for raw in ["todo", "to do", "in_progress", "in progress", "inprogress", "done", "complete", "completed"] {
            let store = to_store(&to_ui(raw));
            assert!(
                [STORE_TODO, STORE_IN_PROGRESS, STORE_DONE].contains(&store.as_str()),
                "{raw} normalized to non-canonical {store}"
            );
        }
    }

    proptest! {
        // Both directions are total: arbitrary input never panics, and a
        // pass-through value survives the case-folding round trip.
        #[test]
        fn codec_is_total(s in ".*") {
            let ui = to_ui(&s);
            let store = to_store(&ui);
            prop_assert_eq!(to_ui(&store), ui);
        }
    }
}
