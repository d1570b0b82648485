use std::ops::RangeInclusive;

use chrono::{DateTime, Local, Timelike as _};
use egui_plot::{GridInput, GridMark};

const NANOS_PER_SEC: f64 = 1e9;
const NANOS_PER_MIN: f64 = 60.0 * NANOS_PER_SEC;
const NANOS_PER_HOUR: f64 = 60.0 * NANOS_PER_MIN;
const NANOS_PER_DAY: f64 = 24.0 * NANOS_PER_HOUR;
// Approximate, marks don't have to land on calendar boundaries
const NANOS_PER_MONTH: f64 = 30.0 * NANOS_PER_DAY;
const NANOS_PER_YEAR: f64 = 365.0 * NANOS_PER_DAY;

const MIN_GRID_MARKS: f64 = 4.0;
const MAX_GRID_MARKS: f64 = 50.0;

/// Unit length in nanoseconds and the step counts that read well for it, smallest unit first
const GRID_UNITS: &[(f64, &[u32])] = &[
    (1e6, &[1, 2, 5, 10, 20, 50, 100, 200, 500]),
    (NANOS_PER_SEC, &[1, 2, 5, 10, 15, 30]),
    (NANOS_PER_MIN, &[1, 2, 5, 10, 15, 30]),
    (NANOS_PER_HOUR, &[1, 2, 3, 6, 12]),
    (NANOS_PER_DAY, &[1, 2, 7, 14]),
    (NANOS_PER_MONTH, &[1, 2, 3, 6]),
    (NANOS_PER_YEAR, &[1, 2, 5, 10]),
];

/// Largest step that still gives at least [`MIN_GRID_MARKS`] marks over `range_ns`.
///
/// Ranges wider than the largest step can cover are stepped in multiples of it so there are
/// never much more than [`MAX_GRID_MARKS`] marks.
fn grid_step_ns(range_ns: f64) -> f64 {
    let step_ns = GRID_UNITS
        .iter()
        .rev()
        .flat_map(|(unit_ns, steps)| steps.iter().rev().map(move |s| f64::from(*s) * unit_ns))
        .find(|step_ns| range_ns / step_ns >= MIN_GRID_MARKS)
        .unwrap_or(1e6);
    let marks = range_ns / step_ns;
    if marks > MAX_GRID_MARKS {
        step_ns * (marks / MAX_GRID_MARKS).ceil()
    } else {
        step_ns
    }
}

/// Grid marks for the nanosecond time axis
#[allow(
    clippy::needless_pass_by_value,
    reason = "signature required by Plot::x_grid_spacer"
)]
pub fn x_grid(input: GridInput) -> Vec<GridMark> {
    let (min_ns, max_ns) = input.bounds;
    let step_ns = grid_step_ns(max_ns - min_ns);

    // Index based so float error doesn't accumulate
    let first = (min_ns / step_ns).ceil() as i64;
    (first..)
        .map(|i| i as f64 * step_ns)
        .take_while(|value| *value < max_ns)
        .map(|value| GridMark {
            value,
            step_size: step_ns,
        })
        .collect()
}

/// Label a mark in local time, with more precision the narrower the visible range is
pub fn format_time(mark: GridMark, range: &RangeInclusive<f64>) -> String {
    let range_ns = *range.end() - *range.start();
    let dt = DateTime::from_timestamp_nanos(mark.value as i64).with_timezone(&Local);
    format_local(&dt, range_ns)
}

fn format_local(dt: &DateTime<Local>, range_ns: f64) -> String {
    let midnight = dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0;
    let fmt = if range_ns > 2.0 * NANOS_PER_YEAR {
        "%Y"
    } else if range_ns > 2.0 * NANOS_PER_MONTH || (midnight && range_ns > 4.0 * NANOS_PER_SEC) {
        "%Y-%m-%d"
    } else if range_ns > 2.0 * NANOS_PER_DAY {
        "%m-%d %H:%M"
    } else if range_ns > 10.0 * NANOS_PER_MIN {
        "%H:%M"
    } else if range_ns > 4.0 * NANOS_PER_SEC {
        "%H:%M:%S"
    } else {
        "%H:%M:%S%.3f"
    };
    dt.format(fmt).to_string()
}
