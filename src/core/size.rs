//! Size formatting for tables and description panels.

use super::device::Region;

/// Human-readable size string.
pub fn human_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];
    let mut size = bytes as f64;
    for &unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} PiB")
}

/// `2048 - 4196351 (2.00 GiB)`, blocks inclusive.
pub fn region_summary(region: &Region) -> String {
    format!(
        "{} - {} ({})",
        region.start,
        region.end(),
        human_size(region.length.saturating_mul(region.block_size))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_size_picks_binary_units() {
        assert_eq!(human_size(0), "0.00 B");
        assert_eq!(human_size(1536), "1.50 KiB");
        assert_eq!(human_size(500 << 30), "500.00 GiB");
        assert_eq!(human_size(3 << 50), "3.00 PiB");
    }

    #[test]
    fn region_summary_shows_inclusive_end() {
        let region = Region {
            start: 2048,
            length: 4_194_304,
            block_size: 512,
        };
        assert_eq!(region_summary(&region), "2048 - 4196351 (2.00 GiB)");
    }
}
