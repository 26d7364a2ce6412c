const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Formats a byte count with two decimals in the largest binary unit it
/// strictly exceeds, e.g. `1.50 kB`. Counts up to 1024 are printed as is.
pub fn human_readable_size(bytes: u64) -> String {
    if bytes > GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes > MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes > KB {
        format!("{:.2} kB", bytes as f64 / KB as f64)
    } else {
        bytes.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_bytes() {
        assert_eq!(human_readable_size(0), "0");
        assert_eq!(human_readable_size(500), "500");
    }

    #[test]
    fn test_tier_boundaries_are_exclusive() {
        assert_eq!(human_readable_size(1024), "1024");
        assert_eq!(human_readable_size(1025), "1.00 kB");
        assert_eq!(human_readable_size(1024 * 1024), "1024.00 kB");
        assert_eq!(human_readable_size(1024 * 1024 * 1024), "1024.00 MB");
    }

    #[test]
    fn test_units() {
        assert_eq!(human_readable_size(1536), "1.50 kB");
        assert_eq!(human_readable_size(5 * 1024 * 1024 + 512 * 1024), "5.50 MB");
        assert_eq!(human_readable_size(2147483648), "2.00 GB");
        assert_eq!(human_readable_size(3 * 1024 * 1024 * 1024 * 1024), "3072.00 GB");
    }
}
