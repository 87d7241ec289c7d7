use super::common::*;
use crate::workflows::award::domain::{Phase, RatingUpdate};

#[test]
fn max_rated_finalist_scores_one_hundred_percent() {
    let (service, pool) = build_service(&["a", "b"], &[], &[]);
    let finalists = pool.candidates;
    service
        .submit_rating(&period_id(), &user("a"), &finalists[0], &RatingUpdate::uniform(5))
        .expect("max rubric saved");

    let scores = service.compute_scores(&period_id()).expect("scores compute");
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].total_score, 65);
    assert_eq!(scores[0].num_raters, 1);
    assert_eq!(scores[0].percent, 100.0);
    assert_eq!(scores[1].total_score, 0);
    assert_eq!(scores[1].num_raters, 0);
    assert_eq!(scores[1].percent, 0.0, "zero raters means zero percent");

    let winner = service
        .compute_winner(&period_id())
        .expect("winner computes")
        .expect("winner exists");
    assert_eq!(winner.candidate, finalists[0]);
}

#[test]
fn two_raters_aggregate_into_one_percentage() {
    let (service, pool) = build_service(&["a", "b", "c"], &[], &[]);
    let finalist = &pool.candidates[0];
    service
        .submit_rating(&period_id(), &user("b"), finalist, &update_totalling(40))
        .expect("first rater");
    service
        .submit_rating(&period_id(), &user("c"), finalist, &update_totalling(50))
        .expect("second rater");

    let scores = service.compute_scores(&period_id()).expect("scores compute");
    let row = &scores[0];
    assert_eq!(row.total_score, 90);
    assert_eq!(row.num_raters, 2);
    // 90 / (2 × 13 × 5) × 100
    assert!((row.percent - 9000.0 / 130.0).abs() < 1e-9);
    assert!(row.percent > 69.2 && row.percent < 69.3);
}

#[test]
fn percent_stays_within_bounds() {
    let (service, pool) = build_service(&["a", "b"], &[], &[]);
    let finalist = &pool.candidates[0];
    service
        .submit_rating(&period_id(), &user("a"), finalist, &RatingUpdate::default().set(1, 1))
        .expect("single low score");

    let scores = service.compute_scores(&period_id()).expect("scores compute");
    for row in &scores {
        assert!(row.percent >= 0.0 && row.percent <= 100.0);
    }
}

#[test]
fn no_complete_rating_means_no_winner() {
    let (service, pool) = build_service(&["a", "b"], &[], &[]);
    let finalist = &pool.candidates[0];

    // Nothing recorded at all.
    assert!(service
        .compute_winner(&period_id())
        .expect("winner computes")
        .is_none());

    // A draft alone is not enough either.
    service
        .submit_rating(&period_id(), &user("a"), finalist, &RatingUpdate::default().set(1, 5))
        .expect("draft saved");
    assert!(service
        .compute_winner(&period_id())
        .expect("winner computes")
        .is_none());
    assert!(service
        .record_winner(&period_id())
        .expect("record runs")
        .is_none());
    assert!(service
        .recorded_winner(&period_id())
        .expect("read back")
        .is_none());
}

#[test]
fn score_ties_go_to_the_earlier_finalist() {
    let (service, pool) = build_service(&["a", "b", "c"], &[], &[]);
    let finalists = pool.candidates;
    service
        .submit_rating(&period_id(), &user("c"), &finalists[0], &RatingUpdate::uniform(4))
        .expect("first finalist rated");
    service
        .submit_rating(&period_id(), &user("c"), &finalists[1], &RatingUpdate::uniform(4))
        .expect("second finalist rated");

    let winner = service
        .compute_winner(&period_id())
        .expect("winner computes")
        .expect("winner exists");
    assert_eq!(winner.candidate, finalists[0], "tie breaks by shortlist order");
}

#[test]
fn record_winner_persists_the_row() {
    let (service, pool) = build_service(&["a", "b"], &[], &[]);
    let finalist = pool.candidates[0].clone();
    service
        .submit_rating(&period_id(), &user("b"), &finalist, &RatingUpdate::uniform(3))
        .expect("rubric saved");

    let recorded = service
        .record_winner(&period_id())
        .expect("record runs")
        .expect("winner recorded");
    assert_eq!(recorded.candidate, finalist);
    assert_eq!(recorded.total_score, 39);

    let stored = service
        .recorded_winner(&period_id())
        .expect("read back")
        .expect("row present");
    assert_eq!(stored.candidate, finalist);
}

#[test]
fn rater_phase_reaches_done_after_rating_every_finalist() {
    let (service, pool) = build_service(&["a", "b"], &[], &[]);
    let rater = user("a");
    assert_eq!(
        service
            .resolve_phase(&period_id(), &rater, None)
            .expect("phase resolves"),
        Phase::Shortlist
    );

    service
        .submit_rating(&period_id(), &rater, &pool.candidates[0], &RatingUpdate::uniform(4))
        .expect("first finalist rated");
    assert_eq!(
        service
            .resolve_phase(&period_id(), &rater, Some(&pool.candidates[1]))
            .expect("phase resolves"),
        Phase::Rate,
        "actively rating an incomplete finalist"
    );

    service
        .submit_rating(&period_id(), &rater, &pool.candidates[1], &RatingUpdate::uniform(2))
        .expect("second finalist rated");
    assert_eq!(
        service
            .resolve_phase(&period_id(), &rater, None)
            .expect("phase resolves"),
        Phase::Done
    );
}
