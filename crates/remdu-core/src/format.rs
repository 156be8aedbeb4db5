//! Size and count formatting helpers.

/// Format a byte count, human-readable or raw.
pub fn format_size(bytes: u64, human: bool) -> String {
    if human {
        humansize::format_size(bytes, humansize::BINARY)
    } else {
        bytes.to_string()
    }
}

/// Format an object count, abbreviated (`12k`, `3.4M`) or raw.
pub fn format_count(count: u64, human: bool) -> String {
    if !human {
        return count.to_string();
    }
    const UNITS: [(u64, &str); 3] = [(1_000_000_000, "G"), (1_000_000, "M"), (1_000, "k")];
    for (scale, suffix) in UNITS {
        if count >= scale {
            let value = count as f64 / scale as f64;
            return if value >= 100.0 {
                format!("{value:.0}{suffix}")
            } else {
                format!("{value:.1}{suffix}")
            };
        }
    }
    count.to_string()
}

/// Right-align a formatted size into a fixed-width column.
pub fn size_field(bytes: u64, human: bool, width: usize) -> String {
    format!("{:>width$}", format_size(bytes, human))
}

/// Right-align a formatted count into a fixed-width column.
pub fn count_field(count: u64, human: bool, width: usize) -> String {
    format!("{:>width$}", format_count(count, human))
}
