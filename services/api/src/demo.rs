use crate::infra::current_quarter;
use clap::Args;
use recognition::error::AppError;
use recognition::workflows::award::{
    AwardService, InMemoryAwardRepository, RatingUpdate, StaticRoleDirectory, UserId,
    SHORTLIST_SIZE,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Number of eligible employees in the demo pool
    #[arg(long, default_value_t = 7)]
    pub(crate) pool_size: usize,
}

/// Walks one quarter end-to-end in memory: voting to quorum, the
/// shortlist cut, full rubric ratings from every rater, and the final
/// score table and winner.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let employees: Vec<UserId> = (1..=args.pool_size.max(2))
        .map(|n| UserId(format!("employee-{n:02}")))
        .collect();
    let directory = StaticRoleDirectory::new(
        employees.clone(),
        vec![UserId("hr-admin".to_string())],
        vec![UserId("team-lead".to_string())],
    );
    let service = AwardService::new(
        Arc::new(InMemoryAwardRepository::default()),
        Arc::new(directory),
    );

    let period = current_quarter();
    let period_id = period.id.clone();
    let pool = service.open_period(period)?;
    println!("== Quarter {period_id}: {} eligible employees ==", pool.candidates.len());

    if pool.voting_required() {
        println!("\n-- Selection phase --");
        for (index, voter) in pool.raters.iter().enumerate() {
            // Each voter backs a rotating window of the pool so the
            // tallies spread out.
            let picks: Vec<UserId> = (0..SHORTLIST_SIZE)
                .map(|offset| pool.candidates[(index + offset) % pool.candidates.len()].clone())
                .collect();
            service.submit_votes(&period_id, voter, &picks)?;
            service.mark_completed(&period_id, voter)?;
        }
        let status = service.voting_status(&period_id)?;
        println!(
            "quorum: {}/{} voters completed",
            status.completed_count, status.required_count
        );
    } else {
        println!("\n-- Selection phase skipped: pool fits the shortlist --");
    }

    let finalists = service.compute_shortlist(&period_id)?;
    println!("\n-- Finalists --");
    for (rank, finalist) in finalists.iter().enumerate() {
        println!("  {}. {finalist}", rank + 1);
    }

    println!("\n-- Rating phase --");
    for (rater_index, rater) in pool.raters.iter().enumerate() {
        for (finalist_index, finalist) in finalists.iter().enumerate() {
            let mut update = RatingUpdate::default();
            for criterion in 1..=13 {
                let score = ((rater_index + finalist_index + criterion) % 5 + 1) as u8;
                update = update.set(criterion, score);
            }
            service.submit_rating(&period_id, rater, finalist, &update)?;
        }
        let phase = service.resolve_phase(&period_id, rater, None)?;
        println!("  {rater}: phase {}", phase.label());
    }

    println!("\n-- Scores --");
    for score in service.compute_scores(&period_id)? {
        println!(
            "  {:<14} total {:>4}  raters {:>2}  {:>6.2}%",
            score.candidate.to_string(),
            score.total_score,
            score.num_raters,
            score.percent
        );
    }

    match service.record_winner(&period_id)? {
        Some(winner) => println!(
            "\n== Winner: {} with {} points ==",
            winner.candidate, winner.total_score
        ),
        None => println!("\n== No winner: no complete ratings recorded =="),
    }

    Ok(())
}
