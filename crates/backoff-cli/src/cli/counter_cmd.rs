use super::app::CommandContext;
use super::*;

/// Opens the counter's record, runs `op` against it and writes it back.
fn with_state<T>(
    ctx: &CommandContext,
    op: impl FnOnce(&mut BackoffState<'_>) -> T,
) -> anyhow::Result<T> {
    let table = ctx.table()?;
    let mut retained = ctx.open_record()?;
    let result = {
        let mut state = BackoffState::with_table(retained.record_mut(), table);
        op(&mut state)
    };
    retained
        .flush()
        .with_context(|| format!("save retained record {}", retained.path().display()))?;
    Ok(result)
}

pub(super) fn handle_fail(ctx: &CommandContext) -> anyhow::Result<()> {
    let (wait_secs, tries) = with_state(ctx, |state| {
        let wait_secs = state.record_failure_and_get_wait_secs();
        (wait_secs, state.tries_count())
    })?;
    info!(counter = %ctx.counter_name(), wait_secs, tries, "recorded failure");
    println!("{wait_secs}");
    Ok(())
}

pub(super) fn handle_success(ctx: &CommandContext) -> anyhow::Result<()> {
    with_state(ctx, |state| state.record_success())?;
    info!(counter = %ctx.counter_name(), "recorded success");
    Ok(())
}

pub(super) fn handle_tries(ctx: &CommandContext) -> anyhow::Result<()> {
    let tries = with_state(ctx, |state| state.tries_count())?;
    println!("{tries}");
    Ok(())
}

pub(super) fn handle_inspect(ctx: &CommandContext) -> anyhow::Result<()> {
    let table = ctx.table()?;
    let path = ctx.retained_path()?;
    if !path.exists() {
        println!("counter: {}", ctx.counter_name());
        println!("no record at {}", path.display());
        return Ok(());
    }
    let retained = RetainedFile::open(&path)?;
    let record = *retained.record();
    for line in inspect_lines(ctx.counter_name(), &record, table) {
        println!("{line}");
    }
    println!("path: {}", retained.path().display());
    Ok(())
}

pub(super) fn inspect_lines(
    counter: &str,
    record: &PersistentBackoffRecord,
    table: BackoffTable<'_>,
) -> Vec<String> {
    let mut lines = vec![
        format!("counter: {counter}"),
        format!("bytes: {}", hex::encode(record.to_bytes())),
    ];
    if record.is_valid() {
        lines.push("valid: yes".to_string());
    } else {
        lines.push("valid: no (resets on next use)".to_string());
    }
    lines.push(format!("magic: {:#010x}", record.magic));
    lines.push(format!("version: {}", record.version));
    lines.push(format!("tries: {}", record.tries));
    let mut copy = *record;
    let state = BackoffState::with_table(&mut copy, table);
    lines.push(format!("next wait: {}s", state.peek_wait_secs()));
    lines.push(format!("table: {}", format_minutes(table.minutes())));
    lines
}

pub(super) fn format_minutes(minutes: &[u8]) -> String {
    minutes
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
