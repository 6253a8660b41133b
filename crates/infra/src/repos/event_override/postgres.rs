use super::IEventOverrideRepo;
use chrono::{NaiveDate, NaiveTime};
use songcircle_domain::{DateKey, DateWindow, OccurrenceOverride, OverrideStatus, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};

pub struct PostgresEventOverrideRepo {
    pool: PgPool,
}

impl PostgresEventOverrideRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OverrideRaw {
    override_uid: Uuid,
    event_uid: Uuid,
    date_key: NaiveDate,
    status: String,
    legacy_start_time: Option<NaiveTime>,
    patch: serde_json::Value,
    created: i64,
    updated: i64,
}

impl From<OverrideRaw> for OccurrenceOverride {
    fn from(raw: OverrideRaw) -> Self {
        Self {
            id: raw.override_uid.into(),
            event_id: raw.event_uid.into(),
            date_key: DateKey::new(raw.date_key),
            status: OverrideStatus::parse(&raw.status),
            legacy_start_time: raw.legacy_start_time,
            // A patch that no longer deserializes patches nothing.
            patch: serde_json::from_value(raw.patch).unwrap_or_default(),
            created: raw.created,
            updated: raw.updated,
        }
    }
}

#[async_trait::async_trait]
impl IEventOverrideRepo for PostgresEventOverrideRepo {
    async fn upsert(&self, o: &OccurrenceOverride) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO occurrence_overrides(
                override_uid,
                event_uid,
                date_key,
                status,
                legacy_start_time,
                patch,
                created,
                updated
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (event_uid, date_key) DO UPDATE SET
                status = EXCLUDED.status,
                legacy_start_time = EXCLUDED.legacy_start_time,
                patch = EXCLUDED.patch,
                updated = EXCLUDED.updated
            "#,
        )
        .bind(o.id.inner_ref())
        .bind(o.event_id.inner_ref())
        .bind(o.date_key.as_date())
        .bind(o.status.as_str())
        .bind(o.legacy_start_time)
        .bind(Json(&o.patch))
        .bind(o.created)
        .bind(o.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, event_id: &ID, date_key: DateKey) -> Option<OccurrenceOverride> {
        sqlx::query_as::<_, OverrideRaw>(
            "SELECT * FROM occurrence_overrides WHERE event_uid = $1 AND date_key = $2",
        )
        .bind(event_id.inner_ref())
        .bind(date_key.as_date())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(Into::into)
    }

    async fn find_by_events(
        &self,
        event_ids: &[ID],
        window: &DateWindow,
    ) -> anyhow::Result<Vec<OccurrenceOverride>> {
        let ids: Vec<Uuid> = event_ids.iter().map(|id| *id.inner_ref()).collect();
        let overrides = sqlx::query_as::<_, OverrideRaw>(
            r#"
            SELECT * FROM occurrence_overrides
            WHERE event_uid = ANY($1) AND date_key >= $2 AND date_key <= $3
            "#,
        )
        .bind(ids)
        .bind(window.start().as_date())
        .bind(window.end().as_date())
        .fetch_all(&self.pool)
        .await?;
        Ok(overrides.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, event_id: &ID, date_key: DateKey) -> Option<OccurrenceOverride> {
        sqlx::query_as::<_, OverrideRaw>(
            "DELETE FROM occurrence_overrides WHERE event_uid = $1 AND date_key = $2 RETURNING *",
        )
        .bind(event_id.inner_ref())
        .bind(date_key.as_date())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(Into::into)
    }
}
