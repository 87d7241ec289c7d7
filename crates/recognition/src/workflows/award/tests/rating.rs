use super::common::*;
use crate::workflows::award::domain::{CompletionState, RatingUpdate};
use crate::workflows::award::WorkflowError;

fn rated_pool() -> (std::sync::Arc<MemoryService>, Vec<crate::workflows::award::UserId>) {
    let (service, pool) = build_service(&["a", "b", "c"], &[], &[]);
    (service, pool.candidates)
}

#[test]
fn rating_a_non_finalist_is_rejected() {
    let (service, _) = rated_pool();
    let err = service
        .submit_rating(
            &period_id(),
            &user("a"),
            &user("outsider"),
            &RatingUpdate::default().set(1, 5),
        )
        .expect_err("outsider is not shortlisted");
    assert!(matches!(err, WorkflowError::NotInShortlist { .. }));
}

#[test]
fn out_of_range_score_rejects_the_whole_call() {
    let (service, finalists) = rated_pool();
    let update = RatingUpdate::default().set(1, 5).set(2, 6);
    let err = service
        .submit_rating(&period_id(), &user("a"), &finalists[0], &update)
        .expect_err("6 is outside the rubric range");
    assert!(matches!(
        err,
        WorkflowError::InvalidRatingValue {
            criterion: 2,
            value: Some(6)
        }
    ));

    // Validate-then-write: the valid criterion in the same call must
    // not have been stored either.
    let stored = service
        .user_rating(&period_id(), &user("a"), &finalists[0])
        .expect("rating read");
    assert!(stored.is_none());
}

#[test]
fn unknown_criterion_is_rejected() {
    let (service, finalists) = rated_pool();
    let err = service
        .submit_rating(
            &period_id(),
            &user("a"),
            &finalists[0],
            &RatingUpdate::default().set(14, 3),
        )
        .expect_err("criterion 14 does not exist");
    assert!(matches!(
        err,
        WorkflowError::InvalidRatingValue { criterion: 14, .. }
    ));
}

#[test]
fn partial_updates_merge_into_a_draft() {
    let (service, finalists) = rated_pool();
    let rater = user("a");

    let state = service
        .submit_rating(
            &period_id(),
            &rater,
            &finalists[0],
            &RatingUpdate::default().set(1, 5),
        )
        .expect("first criterion saved");
    assert_eq!(state, CompletionState::Draft);

    let state = service
        .submit_rating(
            &period_id(),
            &rater,
            &finalists[0],
            &RatingUpdate::default().set(2, 3),
        )
        .expect("second criterion saved");
    assert_eq!(state, CompletionState::Draft);

    let stored = service
        .user_rating(&period_id(), &rater, &finalists[0])
        .expect("rating read")
        .expect("row exists");
    assert_eq!(stored.value(1), Some(5), "earlier criterion preserved");
    assert_eq!(stored.value(2), Some(3));
    assert_eq!(stored.filled_count(), 2);
}

#[test]
fn thirteen_criteria_complete_and_one_null_reverts_to_draft() {
    let (service, finalists) = rated_pool();
    let rater = user("a");

    let state = service
        .submit_rating(&period_id(), &rater, &finalists[0], &RatingUpdate::uniform(4))
        .expect("full rubric saved");
    assert_eq!(state, CompletionState::Complete);

    let state = service
        .submit_rating(
            &period_id(),
            &rater,
            &finalists[0],
            &RatingUpdate::default().clear(7),
        )
        .expect("explicit null clears the slot");
    assert_eq!(state, CompletionState::Draft);
}

#[test]
fn ratings_map_prefills_the_whole_shortlist() {
    let (service, finalists) = rated_pool();
    let rater = user("a");
    service
        .submit_rating(&period_id(), &rater, &finalists[0], &RatingUpdate::uniform(5))
        .expect("first finalist rated");
    service
        .submit_rating(
            &period_id(),
            &rater,
            &finalists[1],
            &RatingUpdate::default().set(1, 2),
        )
        .expect("second finalist drafted");

    let map = service
        .user_ratings_map(&period_id(), &rater)
        .expect("map read");
    assert_eq!(map.len(), 2);
    assert_eq!(
        map.get(&finalists[0]).expect("row").completion_state(),
        CompletionState::Complete
    );
    assert_eq!(
        map.get(&finalists[1]).expect("row").completion_state(),
        CompletionState::Draft
    );
}
