use std::time::Duration;

pub(crate) fn format_rate(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.0}")
    } else {
        "0".to_string()
    }
}

/// One rounded component in us, ms or s.
pub(crate) fn format_duration_single(d: Duration) -> String {
    let total_ns = d.as_nanos();

    const NS_PER_US: u128 = 1_000;
    const NS_PER_MS: u128 = 1_000_000;
    const NS_PER_S: u128 = 1_000_000_000;

    fn round_div(value: u128, unit: u128) -> u128 {
        // Round to nearest integer (ties round up).
        (value + (unit / 2)) / unit
    }

    if total_ns >= NS_PER_S {
        return format!("{}s", round_div(total_ns, NS_PER_S));
    }
    if total_ns >= NS_PER_MS {
        return format!("{}ms", round_div(total_ns, NS_PER_MS));
    }

    format!("{}us", round_div(total_ns, NS_PER_US))
}

pub(crate) fn format_millis(ms: f64) -> String {
    if !ms.is_finite() || ms < 0.0 {
        return "n/a".to_string();
    }
    format_duration_single(Duration::from_secs_f64(ms / 1000.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_use_a_single_rounded_unit() {
        assert_eq!(format_duration_single(Duration::from_micros(250)), "250us");
        assert_eq!(format_duration_single(Duration::from_micros(1_499)), "1ms");
        assert_eq!(format_duration_single(Duration::from_millis(1_500)), "2s");
        assert_eq!(format_millis(12.4), "12ms");
        assert_eq!(format_millis(f64::NAN), "n/a");
    }

    #[test]
    fn rates_are_whole_numbers() {
        assert_eq!(format_rate(215.6), "216");
        assert_eq!(format_rate(f64::INFINITY), "0");
    }
}
