//! Human-readable file sizes in decimal units.

const KB: i64 = 1_000;
const MB: i64 = 1_000_000;
const GB: i64 = 1_000_000_000;

/// Format a byte count as `Kb`, `Mb` or `Gb`, rounded to two decimals with
/// halves rounded away from zero. Trailing zeros are dropped (`500 Kb`,
/// `1.5 Mb`).
///
/// Negative input yields an empty string.
pub fn format_size(bytes: i64) -> String {
    let (divisor, unit) = match bytes {
        b if b < 0 => return String::new(),
        b if b < MB => (KB, "Kb"),
        b if b < GB => (MB, "Mb"),
        _ => (GB, "Gb"),
    };

    // Integer arithmetic keeps the half-way cases exact.
    let step = divisor / 100;
    let hundredths = (bytes as i128 + step as i128 / 2) / step as i128;
    let whole = hundredths / 100;
    let frac = hundredths % 100;

    match frac {
        0 => format!("{whole} {unit}"),
        f if f % 10 == 0 => format!("{whole}.{} {unit}", f / 10),
        f => format!("{whole}.{f:02} {unit}"),
    }
}
