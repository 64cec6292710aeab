const KILO: f64 = 1024.0;

/// Human readable size with one fractional digit.
///
/// There is no tier above megabytes: anything from 1024 Mb upwards yields
/// `None` and is shown as an empty string by the status lines.
pub fn format_bytes(n: u64) -> Option<String> {
    let mut value = n as f64;
    if value < KILO {
        return Some(format!("{:.1} bytes", value));
    }
    value /= KILO;
    if value < KILO {
        return Some(format!("{:.1} kb", value));
    }
    value /= KILO;
    if value < KILO {
        return Some(format!("{:.1} Mb", value));
    }
    None
}

/// Percentage complete, rounded half away from zero. `None` when the total is
/// unknown or zero, in which case no percentage is displayed.
pub fn percent(loaded: u64, total: Option<u64>) -> Option<String> {
    let total = total.filter(|t| *t > 0)?;
    let ratio = (100.0 * loaded as f64 / total as f64).round();
    Some(format!("{:.0} %", ratio))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_tiers() {
        assert_eq!(format_bytes(0).as_deref(), Some("0.0 bytes"));
        assert_eq!(format_bytes(1023).as_deref(), Some("1023.0 bytes"));
        assert_eq!(format_bytes(1024).as_deref(), Some("1.0 kb"));
        assert_eq!(format_bytes(1536).as_deref(), Some("1.5 kb"));
        assert_eq!(format_bytes(1024 * 1024).as_deref(), Some("1.0 Mb"));
        assert_eq!(format_bytes(7 * 1024 * 1024 + 512 * 1024).as_deref(), Some("7.5 Mb"));
    }

    #[test]
    fn test_format_bytes_has_no_gigabyte_tier() {
        assert_eq!(format_bytes(1024 * 1024 * 1024), None);
        assert!(format_bytes(1024 * 1024 * 1024 - 1).is_some());
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(50, Some(200)).as_deref(), Some("25 %"));
        assert_eq!(percent(0, Some(100)).as_deref(), Some("0 %"));
        assert_eq!(percent(100, Some(100)).as_deref(), Some("100 %"));
        assert_eq!(percent(1, Some(8)).as_deref(), Some("13 %"));
    }

    #[test]
    fn test_percent_not_applicable() {
        assert_eq!(percent(10, None), None);
        assert_eq!(percent(10, Some(0)), None);
    }
}
