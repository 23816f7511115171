// Rate calculator: pure functions turning two counter snapshots into
// bounded percentages and throughputs.

/// Components of a CPU time vector: user, nice, system, idle, iowait,
/// irq, softirq, steal.
pub const CPU_TIME_COMPONENTS: usize = 8;

const IDLE: usize = 3;
const IOWAIT: usize = 4;

/// Seconds elapsed between two millisecond timestamps. Negative when the
/// clock went backwards; callers treat `<= 0` as "no usable interval".
pub fn elapsed_secs(prev_ms: i64, curr_ms: i64) -> f64 {
    (curr_ms - prev_ms) as f64 / 1000.0
}

/// Whole-machine or per-core usage percentage from two 8-component time
/// vectors.
///
/// Edge cases, in order: busy delta `<= 0` reads as idle (0); a
/// non-positive total delta means the counters reset or wrapped, which
/// reads as fully busy (100) rather than dividing by a non-positive
/// denominator; everything else is clamped to [0, 100].
pub fn cpu_usage_percent(prev: &[f64], curr: &[f64]) -> f64 {
    if prev.len() < CPU_TIME_COMPONENTS || curr.len() < CPU_TIME_COMPONENTS {
        return 0.0;
    }

    let prev_total: f64 = prev[..CPU_TIME_COMPONENTS].iter().sum();
    let curr_total: f64 = curr[..CPU_TIME_COMPONENTS].iter().sum();
    let prev_busy = prev_total - prev[IDLE] - prev[IOWAIT];
    let curr_busy = curr_total - curr[IDLE] - curr[IOWAIT];

    if curr_busy <= prev_busy {
        return 0.0;
    }
    if curr_total <= prev_total {
        return 100.0;
    }

    ((curr_busy - prev_busy) / (curr_total - prev_total) * 100.0).clamp(0.0, 100.0)
}

/// Bytes (or ops) per second from two cumulative counters. A counter
/// reset (negative delta) or a non-positive interval yields 0, never a
/// negative rate.
pub fn throughput(prev: u64, curr: u64, dt_secs: f64) -> f64 {
    if dt_secs <= 0.0 || curr < prev {
        return 0.0;
    }
    (curr - prev) as f64 / dt_secs
}

/// Per-process CPU percentage from cumulative CPU seconds against wall
/// time. Same zero/negative-delta rules as the vector form, clamped to
/// [0, 100].
pub fn process_cpu_percent(prev_ticks: f64, curr_ticks: f64, dt_secs: f64) -> f64 {
    if dt_secs <= 0.0 || curr_ticks <= prev_ticks {
        return 0.0;
    }
    ((curr_ticks - prev_ticks) / dt_secs * 100.0).clamp(0.0, 100.0)
}
