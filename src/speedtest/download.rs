use std::time::{Duration, Instant};

use anyhow::Context;
use futures::StreamExt;
use reqwest::header::CACHE_CONTROL;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::sampler::ThroughputSampler;
use super::{SpeedError, TestUpdate};
use crate::profiles::FileProfile;

pub(crate) enum DownloadStatus {
    Complete(f64),
    Cancelled,
}

/// Streams the profile's payload and measures throughput. Live rates go out
/// through `updates`; the returned figure is computed from the declared
/// byte count over the measured duration. Cancellation is checked between
/// chunk reads; dropping the response body is the best-effort reader
/// cancel.
pub(crate) async fn run(
    profile: &FileProfile,
    token: &CancellationToken,
    updates: &mpsc::Sender<TestUpdate>,
) -> Result<DownloadStatus, SpeedError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .context("building http client")?;

    let request = client.get(&profile.url).header(CACHE_CONTROL, "no-cache");
    let response = tokio::select! {
        biased;
        _ = token.cancelled() => return Ok(DownloadStatus::Cancelled),
        sent = request.send() => sent.context("sending download request")?,
    };

    let status = response.status();
    if !status.is_success() {
        return Err(SpeedError::Download {
            status: status.as_u16(),
            label: profile.label,
        });
    }

    let mut stream = response.bytes_stream();
    let started = Instant::now();
    let mut sampler = ThroughputSampler::new(started);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(label = %profile.label, "download cancelled mid-stream");
                return Ok(DownloadStatus::Cancelled);
            }
            chunk = stream.next() => match chunk {
                Some(Ok(bytes)) => {
                    if let Some(rate) = sampler.record(bytes.len(), Instant::now()) {
                        let _ = updates.send(TestUpdate::Speed(rate)).await;
                    }
                }
                Some(Err(err)) => {
                    return Err(SpeedError::Unexpected(
                        anyhow::Error::new(err).context("reading download stream"),
                    ));
                }
                None => break,
            }
        }
    }

    if sampler.total_bytes() == 0 {
        return Err(SpeedError::EmptyBody {
            label: profile.label,
        });
    }

    let elapsed = started.elapsed();
    // Final rate bypasses the throttle.
    let _ = updates
        .send(TestUpdate::Speed(sampler.rate_at(Instant::now())))
        .await;

    let mbps = profile.throughput_mbps(elapsed);
    debug!(
        label = %profile.label,
        received = sampler.total_bytes(),
        declared = profile.bytes,
        elapsed_ms = elapsed.as_millis() as u64,
        mbps,
        "download stage complete"
    );
    Ok(DownloadStatus::Complete(mbps))
}
