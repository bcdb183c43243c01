use std::fmt;
use std::time::Duration;

use crate::speedtest::round_mbps;

const DOWNLOAD_ENDPOINT: &str = "https://speed.cloudflare.com/__down";

/// Base simulated upload duration, before the per-size component.
const UPLOAD_BASE_MS: u64 = 1500;
/// Additional simulated upload time per nominal megabyte.
const UPLOAD_MS_PER_MB: u64 = 8;

/// Nominal payload sizes offered for the download test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeLabel {
    Mb10,
    Mb100,
    Mb500,
    Mb1000,
}

impl SizeLabel {
    pub const ALL: [SizeLabel; 4] = [
        SizeLabel::Mb10,
        SizeLabel::Mb100,
        SizeLabel::Mb500,
        SizeLabel::Mb1000,
    ];

    pub const DEFAULT: SizeLabel = SizeLabel::Mb100;

    pub fn nominal_mb(self) -> u64 {
        match self {
            SizeLabel::Mb10 => 10,
            SizeLabel::Mb100 => 100,
            SizeLabel::Mb500 => 500,
            SizeLabel::Mb1000 => 1000,
        }
    }

    pub fn next(self) -> Self {
        match self {
            SizeLabel::Mb10 => SizeLabel::Mb100,
            SizeLabel::Mb100 => SizeLabel::Mb500,
            SizeLabel::Mb500 => SizeLabel::Mb1000,
            SizeLabel::Mb1000 => SizeLabel::Mb10,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SizeLabel::Mb10 => SizeLabel::Mb1000,
            SizeLabel::Mb100 => SizeLabel::Mb10,
            SizeLabel::Mb500 => SizeLabel::Mb100,
            SizeLabel::Mb1000 => SizeLabel::Mb500,
        }
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeLabel::Mb10 => write!(f, "10MB"),
            SizeLabel::Mb100 => write!(f, "100MB"),
            SizeLabel::Mb500 => write!(f, "500MB"),
            SizeLabel::Mb1000 => write!(f, "1GB"),
        }
    }
}

/// A fixed-size download endpoint. `bytes` is the declared payload size
/// and the authoritative divisor for the final throughput figure.
#[derive(Debug, Clone)]
pub struct FileProfile {
    pub label: SizeLabel,
    pub url: String,
    pub bytes: u64,
}

impl FileProfile {
    pub fn for_label(label: SizeLabel) -> Self {
        let bytes = label.nominal_mb() * 1_000_000;
        Self {
            label,
            url: format!("{DOWNLOAD_ENDPOINT}?bytes={bytes}"),
            bytes,
        }
    }

    /// Final download rate over the measured wall-clock duration, from the
    /// declared byte count rather than the bytes observed on the stream.
    pub fn throughput_mbps(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        round_mbps(self.bytes as f64 * 8.0 / (secs * 1_000_000.0))
    }

    /// Simulated upload duration, scaled by the nominal size so bigger
    /// selections read as longer uploads. Decoupled from the real download
    /// duration since no upload transfer happens.
    pub fn upload_duration(&self) -> Duration {
        Duration::from_millis(UPLOAD_BASE_MS + self.label.nominal_mb() * UPLOAD_MS_PER_MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_bytes_are_decimal_megabytes() {
        assert_eq!(FileProfile::for_label(SizeLabel::Mb10).bytes, 10_000_000);
        assert_eq!(FileProfile::for_label(SizeLabel::Mb100).bytes, 100_000_000);
        assert_eq!(FileProfile::for_label(SizeLabel::Mb500).bytes, 500_000_000);
        assert_eq!(
            FileProfile::for_label(SizeLabel::Mb1000).bytes,
            1_000_000_000
        );
    }

    #[test]
    fn url_requests_the_declared_size() {
        let profile = FileProfile::for_label(SizeLabel::Mb100);
        assert!(profile.url.ends_with("?bytes=100000000"));
    }

    #[test]
    fn ten_megabytes_in_one_second_is_eighty_mbps() {
        let profile = FileProfile::for_label(SizeLabel::Mb10);
        assert_eq!(profile.throughput_mbps(Duration::from_secs(1)), 80.0);
    }

    #[test]
    fn zero_duration_reports_zero() {
        let profile = FileProfile::for_label(SizeLabel::Mb10);
        assert_eq!(profile.throughput_mbps(Duration::ZERO), 0.0);
    }

    #[test]
    fn upload_duration_scales_with_nominal_size() {
        let d10 = FileProfile::for_label(SizeLabel::Mb10).upload_duration();
        let d1000 = FileProfile::for_label(SizeLabel::Mb1000).upload_duration();
        assert_eq!(d10, Duration::from_millis(1580));
        assert_eq!(d1000, Duration::from_millis(9500));
        assert!(d1000 > d10);
    }

    #[test]
    fn labels_cycle_through_all_sizes() {
        let mut label = SizeLabel::Mb10;
        for _ in 0..SizeLabel::ALL.len() {
            label = label.next();
        }
        assert_eq!(label, SizeLabel::Mb10);
        assert_eq!(SizeLabel::Mb10.prev(), SizeLabel::Mb1000);
    }
}
