use crate::i18n::{text, Locale, TextKey};
use crate::speedtest::TestResult;

// Thresholds in ms / Mbps. Values at or below "fair" read as acceptable.
const PING_POOR_MS: f64 = 100.0;
const PING_FAIR_MS: f64 = 50.0;
const DOWNLOAD_POOR_MBPS: f64 = 10.0;
const DOWNLOAD_FAIR_MBPS: f64 = 25.0;
const UPLOAD_POOR_MBPS: f64 = 2.0;
const UPLOAD_FAIR_MBPS: f64 = 5.0;

/// Threshold-driven advice text for a finished run. Pure function of the
/// result and the locale; the caller re-runs it when the locale changes.
pub fn generate_advice(result: &TestResult, locale: Locale) -> String {
    let mut points = Vec::new();

    if result.ping_ms > PING_POOR_MS {
        points.push(text(locale, TextKey::AdvicePingPoor));
    } else if result.ping_ms > PING_FAIR_MS {
        points.push(text(locale, TextKey::AdvicePingFair));
    }

    if result.download_mbps < DOWNLOAD_POOR_MBPS {
        points.push(text(locale, TextKey::AdviceDownloadPoor));
    } else if result.download_mbps < DOWNLOAD_FAIR_MBPS {
        points.push(text(locale, TextKey::AdviceDownloadFair));
    }

    if result.upload_mbps < UPLOAD_POOR_MBPS {
        points.push(text(locale, TextKey::AdviceUploadPoor));
    } else if result.upload_mbps < UPLOAD_FAIR_MBPS {
        points.push(text(locale, TextKey::AdviceUploadFair));
    }

    if points.is_empty() {
        let all_good = result.ping_ms <= PING_FAIR_MS
            && result.download_mbps >= DOWNLOAD_FAIR_MBPS
            && result.upload_mbps >= UPLOAD_FAIR_MBPS;
        return if all_good {
            text(locale, TextKey::AdviceAllGood).to_owned()
        } else {
            text(locale, TextKey::AdviceGenerallyOkay).to_owned()
        };
    }

    points
        .iter()
        .map(|point| format!("- {point}"))
        .collect::<Vec<_>>()
        .join("\n")
}
