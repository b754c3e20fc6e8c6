/*!
 * Arena Demo - Main Entry Point
 *
 * Walks the lifecycle of a handle arena:
 * - calloc-style allocation and resize
 * - transactional allocation of a matrix
 * - bounds-checked string buffer
 * - use-after-free detection
 * - shared counter across threads
 * - teardown
 */

use handle_arena::monitoring::span_operation;
use handle_arena::{
    init_tracing, AllocationError, AllocationGuardExt, ArenaConfig, Handle, SharedArena,
    TransactionExt,
};
use std::thread;
use tracing::{debug, info, warn};

const MATRIX_ROWS: usize = 3;
const MATRIX_COLS: usize = 4;
const COUNTER_THREADS: usize = 4;
const INCREMENTS_PER_THREAD: u64 = 1000;

fn main() -> miette::Result<()> {
    init_tracing();

    info!("Arena demo starting...");
    info!("================================================");

    let config = ArenaConfig::from_env()?;
    info!(
        initial = config.initial_capacity,
        max = config.max_capacity,
        growth = config.growth_factor,
        "Arena configuration loaded"
    );
    let arena = SharedArena::with_config(config)?;
    info!("Created {}", arena.id());

    let numbers = calloc_and_resize(&arena)?;
    let matrix = build_matrix(&arena)?;
    string_buffer(&arena)?;
    use_after_free(&arena, numbers)?;
    shared_counter(&arena)?;
    scratch_guard(&arena)?;

    let stats = arena.stats();
    info!(
        capacity = stats.capacity,
        live_bytes = stats.live_bytes,
        peak = stats.peak_live_bytes,
        live_slots = stats.live_slots,
        free_ranges = stats.free_ranges,
        "Arena statistics ({:.1}% used, pressure {})",
        stats.usage_percentage,
        stats.memory_pressure()
    );

    let reclaimed = arena.compact()?;
    info!("Compaction reclaimed {} bytes, capacity now {}", reclaimed, arena.capacity());

    arena.teardown()?;
    info!("Arena torn down");
    for row in &matrix {
        if let Err(e) = arena.read(*row) {
            info!("Matrix row {} after teardown: {}", row.index(), e);
        }
    }

    info!("================================================");
    info!("Arena demo finished");
    Ok(())
}

/// Zeroed allocation of five integers, filled, then grown to eight
fn calloc_and_resize(arena: &SharedArena) -> miette::Result<Handle> {
    let span = span_operation("calloc_and_resize");
    let _entered = span.enter();

    let numbers = arena.allocate_typed::<i32>(5)?;
    info!("Fresh allocation: {:?}", arena.read_elements::<i32>(numbers)?);

    arena.write_elements(numbers, &[10i32, 20, 30, 40, 50])?;
    info!("After fill: {:?}", arena.read_elements::<i32>(numbers)?);

    let numbers = arena.resize(numbers, 8)?;
    info!("After resize to 8: {:?}", arena.read_elements::<i32>(numbers)?);

    span.record_result(true);
    Ok(numbers)
}

/// Row table allocated all-or-nothing
fn build_matrix(arena: &SharedArena) -> miette::Result<Vec<Handle>> {
    let span = span_operation("build_matrix");
    let _entered = span.enter();

    let mut allocator = arena.clone();
    let rows = {
        let mut tx = allocator.begin();
        for i in 0..MATRIX_ROWS {
            let row = tx.allocate(MATRIX_COLS, std::mem::size_of::<i32>())?;
            debug!("Staged matrix row {} as {}", i, row);
        }
        tx.commit()?
    };

    for (i, row) in rows.iter().enumerate() {
        for j in 0..MATRIX_COLS {
            arena.write_element(*row, j, (i * MATRIX_COLS + j) as i32)?;
        }
    }
    for (i, row) in rows.iter().enumerate() {
        info!("Matrix row {}: {:?}", i, arena.read_elements::<i32>(*row)?);
    }

    span.record_result(true);
    Ok(rows)
}

/// Fixed buffer that rejects an oversized write, then grows to fit
fn string_buffer(arena: &SharedArena) -> miette::Result<()> {
    let span = span_operation("string_buffer");
    let _entered = span.enter();

    let greeting = b"Hello, Dynamic Memory!";
    let suffix = b" Appended text.";

    let buffer = arena.allocate(20, 1)?;
    match arena.write(buffer, greeting) {
        Err(e @ AllocationError::OutOfBounds { .. }) => {
            warn!("Write of {} bytes rejected: {}", greeting.len(), e)
        }
        other => other?,
    }

    let buffer = arena.resize(buffer, 50)?;
    arena.write(buffer, greeting)?;
    arena.write_at(buffer, greeting.len(), suffix)?;

    let text = arena.read_at(buffer, 0, greeting.len() + suffix.len())?;
    info!("Buffer contents: {}", String::from_utf8_lossy(&text));

    arena.free(buffer)?;
    span.record_result(true);
    Ok(())
}

/// A freed handle is refused by every operation
fn use_after_free(arena: &SharedArena, numbers: Handle) -> miette::Result<()> {
    arena.free(numbers)?;
    match arena.read(numbers) {
        Err(e) if e.is_invalid_handle() => info!("Stale read rejected: {}", e),
        Err(e) => return Err(e.into()),
        Ok(_) => warn!("Stale handle {} still readable", numbers),
    }
    if let Err(e) = arena.free(numbers) {
        info!("Double free rejected: {}", e);
    }
    Ok(())
}

/// Several threads incrementing one arena-resident counter
fn shared_counter(arena: &SharedArena) -> miette::Result<()> {
    let span = span_operation("shared_counter");
    let _entered = span.enter();

    let counter = arena.allocate_typed::<u64>(1)?;
    let results: Vec<Result<(), AllocationError>> = thread::scope(|s| {
        let workers: Vec<_> = (0..COUNTER_THREADS)
            .map(|_| {
                let arena = arena.clone();
                s.spawn(move || -> Result<(), AllocationError> {
                    for _ in 0..INCREMENTS_PER_THREAD {
                        arena.update_element::<u64, _>(counter, 0, |v| v + 1)?;
                    }
                    Ok(())
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|w| w.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });
    for result in results {
        result?;
    }

    let total = arena.read_element::<u64>(counter, 0)?;
    info!(
        "Counter after {} threads x {}: {}",
        COUNTER_THREADS, INCREMENTS_PER_THREAD, total
    );
    arena.free(counter)?;

    span.record_result(true);
    Ok(())
}

/// Scratch space released when the guard leaves scope
fn scratch_guard(arena: &SharedArena) -> miette::Result<()> {
    let before = arena.stats().live_slots;
    {
        let scratch = arena.allocate_guard(256, 1)?;
        arena.write(scratch.handle(), b"temporary")?;
        info!("Scratch {} live", scratch.handle());
    }
    info!(
        "Scratch released: live slots {} -> {}",
        before + 1,
        arena.stats().live_slots
    );
    Ok(())
}
