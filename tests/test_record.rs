use mutreport::record::{MutationStatus, Score};

#[test]
fn empty_score_counts_zero() {
    let score = Score::default();
    assert_eq!(score.count(), 0.0);
}

#[test]
fn count_is_killed_percentage() {
    let mut score = Score::default();
    score.tally(MutationStatus::Killed);
    score.tally(MutationStatus::Killed);
    score.tally(MutationStatus::Killed);
    score.tally(MutationStatus::Survived);
    assert_eq!(score.count(), 75.0);
}

#[test]
fn tally_preserves_sum_invariant() {
    let mut score = Score::default();
    let statuses = [
        MutationStatus::Killed,
        MutationStatus::Survived,
        MutationStatus::Survived,
        MutationStatus::Timeout,
        MutationStatus::Incompetent,
        MutationStatus::Killed,
        MutationStatus::Timeout,
    ];
    for status in statuses {
        score.tally(status);
    }

    assert_eq!(score.all_mutants, statuses.len());
    assert_eq!(
        score.all_mutants,
        score.killed_mutants
            + score.survived_mutants
            + score.incompetent_mutants
            + score.timeout_mutants
    );
    assert_eq!(score.killed_mutants, 2);
    assert_eq!(score.survived_mutants, 2);
    assert_eq!(score.timeout_mutants, 2);
    assert_eq!(score.incompetent_mutants, 1);
}

#[test]
fn status_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&MutationStatus::Killed).unwrap(),
        "\"killed\""
    );
    assert_eq!(MutationStatus::Incompetent.as_str(), "incompetent");
}
