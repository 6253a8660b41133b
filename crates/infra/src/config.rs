use chrono_tz::Tz;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Fixed civil time zone in which "today" and the digest week are
    /// computed. All date keys are calendar dates in this zone.
    pub reference_timezone: Tz,
    /// How far forward occurrence projections run, in days. This is also
    /// the cap on client-supplied expansion windows so that nobody asks
    /// for a schedule several years out, which is slow to compute and not
    /// useful information anyway.
    pub schedule_horizon_days: i64,
    /// Radius applied by saved location filters that do not carry their
    /// own, in miles.
    pub default_radius_miles: f64,
    /// Hour of day (0-23, reference time zone) at which the Sunday digest
    /// batch runs.
    pub digest_send_hour: u32,
    /// Webhook that receives the personalized digest batch for rendering
    /// and delivery. The weekly job only builds the batch when this is
    /// set.
    pub digest_delivery_webhook: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let default_timezone = "America/Denver";
        let reference_timezone = std::env::var("REFERENCE_TIMEZONE")
            .unwrap_or_else(|_| default_timezone.into());
        let reference_timezone = match reference_timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(
                    "The given REFERENCE_TIMEZONE: {} is not a valid IANA time zone, falling back to {}.",
                    reference_timezone, default_timezone
                );
                default_timezone.parse::<Tz>().unwrap()
            }
        };

        let default_send_hour = 8;
        let digest_send_hour = std::env::var("DIGEST_SEND_HOUR")
            .ok()
            .and_then(|hour| hour.parse::<u32>().ok())
            .filter(|hour| *hour < 24)
            .unwrap_or(default_send_hour);

        Self {
            port,
            reference_timezone,
            schedule_horizon_days: 90,
            default_radius_miles: 25.0,
            digest_send_hour,
            digest_delivery_webhook: std::env::var("DIGEST_DELIVERY_WEBHOOK").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
