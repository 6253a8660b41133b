use crate::digest::deliver_digests::run_digest_batch;
use actix_web::rt::time::sleep;
use chrono::{DateTime, Datelike, Duration as ChronoDuration, TimeZone, Timelike};
use chrono_tz::Tz;
use songcircle_infra::SongcircleContext;
use std::time::Duration;
use tracing::{error, info};

const WEEK_SECS: u64 = 7 * 24 * 60 * 60;

/// Seconds from `now` until the next Sunday at `send_hour` in the
/// reference zone. Later today counts when today is Sunday before the
/// hour.
pub fn secs_until_sunday_hour(now: &DateTime<Tz>, send_hour: u32) -> u64 {
    let today = now.date_naive();
    let days_ahead = (7 - today.weekday().num_days_from_sunday() as i64) % 7;
    let mut candidate = today + ChronoDuration::days(days_ahead);
    if days_ahead == 0 && now.hour() >= send_hour {
        candidate += ChronoDuration::days(7);
    }
    let target = now
        .timezone()
        .from_local_datetime(&candidate.and_hms_opt(send_hour, 0, 0).unwrap())
        .earliest()
        .unwrap_or(*now);
    (target.signed_duration_since(*now).num_seconds()).max(0) as u64
}

pub fn start_digest_delivery_job(ctx: SongcircleContext) {
    actix_web::rt::spawn(async move {
        let timezone = ctx.config.reference_timezone;
        let send_hour = ctx.config.digest_send_hour;
        let now = chrono::Utc::now().with_timezone(&timezone);
        let delay = secs_until_sunday_hour(&now, send_hour);
        info!("Next digest batch runs in {} seconds", delay);
        sleep(Duration::from_secs(delay)).await;

        loop {
            match run_digest_batch(&ctx).await {
                Ok(batch) => info!(
                    "Digest batch done: {} deliveries, {} skipped, posted: {}",
                    batch.deliveries.len(),
                    batch.skipped,
                    batch.posted_to_webhook
                ),
                Err(e) => error!("Digest batch failed: {:?}", e),
            }
            sleep(Duration::from_secs(WEEK_SECS)).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn denver(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        chrono_tz::America::Denver
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(y, m, d)
                    .unwrap()
                    .and_hms_opt(h, min, 0)
                    .unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn midweek_waits_until_sunday_morning() {
        // 2026-08-19 is a Wednesday.
        let now = denver(2026, 8, 19, 10, 0);
        assert_eq!(secs_until_sunday_hour(&now, 8), 338_400);
    }

    #[test]
    fn sunday_before_the_hour_runs_today() {
        let now = denver(2026, 8, 23, 6, 0);
        assert_eq!(secs_until_sunday_hour(&now, 8), 7_200);
    }

    #[test]
    fn sunday_after_the_hour_waits_a_week() {
        let now = denver(2026, 8, 23, 9, 0);
        assert_eq!(secs_until_sunday_hour(&now, 8), 7 * 86_400 - 3_600);
    }
}
