use super::common::{as_of, engine, facts, AGE_10, AGE_16, AGE_17, AGE_20, AGE_30};
use crate::triage::domain::RunState;
use crate::triage::evaluation::CaseOutcome;

#[test]
fn approves_when_rooms_cover_applicants() {
    let mut state = RunState::new();
    let outcome = engine()
        .decide(&facts("Parkvej 1", 0, 2, &[AGE_30]), &mut state, as_of())
        .expect("decision");
    assert_eq!(outcome, CaseOutcome::Approve);
}

#[test]
fn any_existing_resident_blocks_approval() {
    let mut state = RunState::new();
    let outcome = engine()
        .decide(&facts("Parkvej 1", 1, 2, &[AGE_30]), &mut state, as_of())
        .expect("decision");
    assert_eq!(outcome, CaseOutcome::SkipOccupied);
}

#[test]
fn parent_and_young_child_fit_in_one_room() {
    let mut state = RunState::new();
    let outcome = engine()
        .decide(
            &facts("Parkvej 1", 0, 1, &[AGE_30, AGE_10]),
            &mut state,
            as_of(),
        )
        .expect("decision");
    assert_eq!(outcome, CaseOutcome::Approve);
}

#[test]
fn two_adults_do_not_fit_in_one_room() {
    let mut state = RunState::new();
    let outcome = engine()
        .decide(
            &facts("Parkvej 1", 0, 1, &[AGE_30, AGE_20]),
            &mut state,
            as_of(),
        )
        .expect("decision");
    assert_eq!(outcome, CaseOutcome::SkipTooManyApplicants);
}

#[test]
fn skips_when_no_applicant_is_an_adult() {
    let mut state = RunState::new();
    let outcome = engine()
        .decide(
            &facts("Parkvej 1", 0, 3, &[AGE_16, AGE_17]),
            &mut state,
            as_of(),
        )
        .expect("decision");
    assert_eq!(outcome, CaseOutcome::SkipAllMinors);
}

#[test]
fn occupancy_is_checked_before_applicant_ages() {
    let mut state = RunState::new();
    let outcome = engine()
        .decide(
            &facts("Parkvej 1", 2, 3, &[AGE_16, AGE_17]),
            &mut state,
            as_of(),
        )
        .expect("decision");
    assert_eq!(outcome, CaseOutcome::SkipOccupied);
}

#[test]
fn zero_applicants_trivially_approve() {
    let mut state = RunState::new();
    let outcome = engine()
        .decide(&facts("Parkvej 1", 0, 1, &[]), &mut state, as_of())
        .expect("decision");
    assert_eq!(outcome, CaseOutcome::Approve);
}

#[test]
fn repeated_address_is_skipped_even_when_otherwise_approvable() {
    let mut state = RunState::new();
    let first = engine()
        .decide(&facts("Parkvej 1", 0, 2, &[AGE_30]), &mut state, as_of())
        .expect("decision");
    assert_eq!(first, CaseOutcome::Approve);

    let second = engine()
        .decide(&facts("Parkvej 1", 0, 5, &[AGE_20]), &mut state, as_of())
        .expect("decision");
    assert_eq!(second, CaseOutcome::SkipDuplicateAddress);
}

#[test]
fn duplicate_address_wins_over_occupancy() {
    let mut state = RunState::new();
    engine()
        .decide(&facts("Parkvej 1", 0, 2, &[AGE_30]), &mut state, as_of())
        .expect("decision");

    let second = engine()
        .decide(&facts("Parkvej 1", 3, 2, &[AGE_30]), &mut state, as_of())
        .expect("decision");
    assert_eq!(second, CaseOutcome::SkipDuplicateAddress);
}

#[test]
fn address_matching_is_exact() {
    let mut state = RunState::new();
    engine()
        .decide(&facts("Parkvej 1", 0, 2, &[AGE_30]), &mut state, as_of())
        .expect("decision");

    let outcome = engine()
        .decide(&facts("parkvej 1", 0, 2, &[AGE_30]), &mut state, as_of())
        .expect("decision");
    assert_eq!(outcome, CaseOutcome::Approve);
}

#[test]
fn run_states_do_not_share_dedup_history() {
    let mut first_run = RunState::new();
    engine()
        .decide(&facts("Parkvej 1", 0, 2, &[AGE_30]), &mut first_run, as_of())
        .expect("decision");

    let mut second_run = RunState::new();
    let outcome = engine()
        .decide(
            &facts("Parkvej 1", 0, 2, &[AGE_30]),
            &mut second_run,
            as_of(),
        )
        .expect("decision");
    assert_eq!(outcome, CaseOutcome::Approve);
}

#[test]
fn malformed_identity_code_aborts_without_recording_the_address() {
    let mut state = RunState::new();
    let err = engine()
        .decide(
            &facts("Parkvej 1", 0, 2, &["not-a-code"]),
            &mut state,
            as_of(),
        )
        .expect_err("malformed code must fail");
    assert_eq!(err.code, "not-a-code");

    // The aborted case must not pollute the dedup set.
    let outcome = engine()
        .decide(&facts("Parkvej 1", 0, 2, &[AGE_30]), &mut state, as_of())
        .expect("decision");
    assert_eq!(outcome, CaseOutcome::Approve);
}
