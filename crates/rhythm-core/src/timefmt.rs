//! `MM:SS` display formatting for countdowns and overruns.

/// Format a non-negative duration as zero-padded `MM:SS`.
pub fn format_mm_ss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Format remaining time: a countdown while positive, `+ MM:SS` once
/// the estimate is overrun. Purely cosmetic, no logic rides on it.
pub fn format_remaining(remaining_secs: i64) -> String {
    if remaining_secs < 0 {
        format!("+ {}", format_mm_ss(remaining_secs.unsigned_abs().min(u32::MAX as u64) as u32))
    } else {
        format_mm_ss(remaining_secs as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_minutes_and_seconds() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(75), "01:15");
        assert_eq!(format_mm_ss(600), "10:00");
    }

    #[test]
    fn overrun_gets_a_plus_prefix() {
        assert_eq!(format_remaining(90), "01:30");
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(-5), "+ 00:05");
    }
}
