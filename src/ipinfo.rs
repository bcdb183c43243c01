use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

pub const NOT_AVAILABLE: &str = "N/A";

const LOOKUP_URL: &str =
    "http://ip-api.com/json/?fields=status,message,country,city,isp,org,query";

/// Best-effort network metadata for the connection being tested. Every
/// field degrades to "N/A" when the lookup fails; the speed test itself
/// never depends on this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub ip: String,
    pub isp: String,
    pub org: String,
    pub city: String,
    pub country: String,
}

impl ServerInfo {
    pub fn unavailable() -> Self {
        Self {
            ip: NOT_AVAILABLE.to_owned(),
            isp: NOT_AVAILABLE.to_owned(),
            org: NOT_AVAILABLE.to_owned(),
            city: NOT_AVAILABLE.to_owned(),
            country: NOT_AVAILABLE.to_owned(),
        }
    }

}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    isp: Option<String>,
    #[serde(default)]
    org: Option<String>,
    #[serde(default)]
    query: Option<String>,
}

/// Looks up the caller's apparent address. Never fails: transport errors
/// and rejected lookups (private ranges and the like) both come back as
/// "N/A" fields.
pub async fn fetch_server_info() -> ServerInfo {
    match try_fetch(LOOKUP_URL).await {
        Ok(info) => info,
        Err(err) => {
            warn!("ip lookup failed: {err:#}");
            ServerInfo::unavailable()
        }
    }
}

async fn try_fetch(url: &str) -> anyhow::Result<ServerInfo> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let geo: GeoResponse = client.get(url).send().await?.json().await?;
    Ok(resolve(geo))
}

fn resolve(geo: GeoResponse) -> ServerInfo {
    // ip-api returns 200 with status="fail" for private ranges; keep the
    // queried address when it gave us one.
    if geo.status != "success" {
        warn!(
            reason = geo.message.as_deref().unwrap_or("unknown"),
            "ip lookup rejected"
        );
        let mut info = ServerInfo::unavailable();
        if let Some(ip) = geo.query.filter(|ip| !ip.is_empty()) {
            info.ip = ip;
        }
        return info;
    }

    let field =
        |value: Option<String>| value.filter(|v| !v.is_empty()).unwrap_or_else(|| {
            NOT_AVAILABLE.to_owned()
        });
    ServerInfo {
        ip: field(geo.query),
        isp: field(geo.isp),
        org: field(geo.org),
        city: field(geo.city),
        country: field(geo.country),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> GeoResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn successful_lookup_maps_all_fields() {
        let info = resolve(parse(
            r#"{"status":"success","country":"Saudi Arabia","city":"Riyadh",
                "isp":"Example ISP","org":"Example Org","query":"203.0.113.9"}"#,
        ));
        assert_eq!(info.ip, "203.0.113.9");
        assert_eq!(info.isp, "Example ISP");
        assert_eq!(info.org, "Example Org");
        assert_eq!(info.city, "Riyadh");
        assert_eq!(info.country, "Saudi Arabia");
    }

    #[test]
    fn failed_lookup_keeps_the_queried_address() {
        let info = resolve(parse(
            r#"{"status":"fail","message":"private range","query":"192.168.1.4"}"#,
        ));
        assert_eq!(info.ip, "192.168.1.4");
        assert_eq!(info.isp, NOT_AVAILABLE);
        assert_eq!(info.country, NOT_AVAILABLE);
    }

    #[test]
    fn missing_fields_degrade_to_not_available() {
        let info = resolve(parse(r#"{"status":"success","query":"203.0.113.9"}"#));
        assert_eq!(info.ip, "203.0.113.9");
        assert_eq!(info.isp, NOT_AVAILABLE);
        assert_eq!(info.org, NOT_AVAILABLE);
        assert_eq!(info.city, NOT_AVAILABLE);
        assert_eq!(info.country, NOT_AVAILABLE);
    }
}
