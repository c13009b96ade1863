use super::app::CommandContext;
use super::*;

pub(super) fn handle_simulate(args: SimulateArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let table = ctx.table()?;
    let path = ctx.retained_path()?;
    match args.mode {
        SimulateMode::Sleep(args) => {
            // Each wake cycle reopens the record, as a device would after reset.
            for (cycle, outcome) in args.outcomes.outcomes.iter().enumerate() {
                let mut retained = RetainedFile::open(&path)?;
                let plan = {
                    let mut state = BackoffState::with_table(retained.record_mut(), table);
                    SleepPlan::after_connect(&mut state, (*outcome).into(), args.sleep_secs)
                };
                retained.flush()?;
                println!("{}", describe_sleep_plan(cycle + 1, &plan));
            }
        }
        SimulateMode::NoSleep(args) => {
            let mut retained = RetainedFile::open(&path)?;
            {
                let mut state = BackoffState::with_table(retained.record_mut(), table);
                for (attempt, outcome) in args.outcomes.iter().enumerate() {
                    let plan = RetryPlan::after_connect(&mut state, (*outcome).into());
                    println!("{}", describe_retry_plan(attempt + 1, &plan));
                }
            }
            retained.flush()?;
        }
    }
    Ok(())
}

pub(super) fn describe_sleep_plan(cycle: usize, plan: &SleepPlan) -> String {
    match plan {
        SleepPlan::Publish { sleep_secs } => {
            format!("cycle {cycle}: connected, published, sleeping {sleep_secs}s")
        }
        SleepPlan::Backoff { sleep_secs, tries } => {
            format!("cycle {cycle}: connect failed (tries={tries}), sleeping {sleep_secs}s")
        }
    }
}

pub(super) fn describe_retry_plan(attempt: usize, plan: &RetryPlan) -> String {
    match plan {
        RetryPlan::Run => format!("attempt {attempt}: connected, running"),
        RetryPlan::RetryAfter(delay) => {
            format!("attempt {attempt}: connect failed, retrying in {}s", delay.as_secs())
        }
    }
}
