use super::IEventRepo;
use chrono::{NaiveDate, NaiveTime};
use songcircle_domain::{DateKey, Event, EventStatus, EventType, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRaw {
    event_uid: Uuid,
    title: String,
    description: Option<String>,
    event_date: Option<NaiveDate>,
    day_of_week: Option<String>,
    recurrence_rule: Option<String>,
    custom_dates: Option<Vec<NaiveDate>>,
    max_occurrences: Option<i32>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    cover_image_url: Option<String>,
    venue_uid: Option<Uuid>,
    custom_location_name: Option<String>,
    custom_location_address: Option<String>,
    host_notes: Option<String>,
    is_free: Option<bool>,
    event_type: String,
    published: bool,
    status: String,
    created: i64,
    updated: i64,
}

impl From<EventRaw> for Event {
    fn from(raw: EventRaw) -> Self {
        Self {
            id: raw.event_uid.into(),
            title: raw.title,
            description: raw.description,
            event_date: raw.event_date.map(DateKey::new),
            day_of_week: raw.day_of_week,
            recurrence_rule: raw.recurrence_rule,
            custom_dates: raw
                .custom_dates
                .map(|dates| dates.into_iter().map(DateKey::new).collect()),
            max_occurrences: raw.max_occurrences.map(|cap| cap.max(0) as u32),
            start_time: raw.start_time,
            end_time: raw.end_time,
            cover_image_url: raw.cover_image_url,
            venue_id: raw.venue_uid.map(Into::into),
            custom_location_name: raw.custom_location_name,
            custom_location_address: raw.custom_location_address,
            host_notes: raw.host_notes,
            is_free: raw.is_free,
            event_type: EventType::parse(&raw.event_type),
            published: raw.published,
            status: EventStatus::parse(&raw.status),
            created: raw.created,
            updated: raw.updated,
        }
    }
}

const EVENT_COLUMNS: &str = r#"
    event_uid, title, description, event_date, day_of_week, recurrence_rule,
    custom_dates, max_occurrences, start_time, end_time, cover_image_url,
    venue_uid, custom_location_name, custom_location_address, host_notes,
    is_free, event_type, published, status, created, updated
"#;

fn custom_dates_column(event: &Event) -> Option<Vec<NaiveDate>> {
    event
        .custom_dates
        .as_ref()
        .map(|dates| dates.iter().map(|date| date.as_date()).collect())
}

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, event: &Event) -> anyhow::Result<()> {
        sqlx::query(&format!(
            r#"
            INSERT INTO events({})
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            "#,
            EVENT_COLUMNS
        ))
        .bind(event.id.inner_ref())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_date.map(|date| date.as_date()))
        .bind(&event.day_of_week)
        .bind(&event.recurrence_rule)
        .bind(custom_dates_column(event))
        .bind(event.max_occurrences.map(|cap| cap as i32))
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.cover_image_url)
        .bind(event.venue_id.as_ref().map(|id| *id.inner_ref()))
        .bind(&event.custom_location_name)
        .bind(&event.custom_location_address)
        .bind(&event.host_notes)
        .bind(event.is_free)
        .bind(event.event_type.as_str())
        .bind(event.published)
        .bind(event.status.as_str())
        .bind(event.created)
        .bind(event.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, event: &Event) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE events SET
                title = $2,
                description = $3,
                event_date = $4,
                day_of_week = $5,
                recurrence_rule = $6,
                custom_dates = $7,
                max_occurrences = $8,
                start_time = $9,
                end_time = $10,
                cover_image_url = $11,
                venue_uid = $12,
                custom_location_name = $13,
                custom_location_address = $14,
                host_notes = $15,
                is_free = $16,
                event_type = $17,
                published = $18,
                status = $19,
                updated = $20
            WHERE event_uid = $1
            "#,
        )
        .bind(event.id.inner_ref())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_date.map(|date| date.as_date()))
        .bind(&event.day_of_week)
        .bind(&event.recurrence_rule)
        .bind(custom_dates_column(event))
        .bind(event.max_occurrences.map(|cap| cap as i32))
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.cover_image_url)
        .bind(event.venue_id.as_ref().map(|id| *id.inner_ref()))
        .bind(&event.custom_location_name)
        .bind(&event.custom_location_address)
        .bind(&event.host_notes)
        .bind(event.is_free)
        .bind(event.event_type.as_str())
        .bind(event.published)
        .bind(event.status.as_str())
        .bind(event.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<Event> {
        sqlx::query_as::<_, EventRaw>("SELECT * FROM events WHERE event_uid = $1")
            .bind(event_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(Into::into)
    }

    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<Event>> {
        let ids: Vec<Uuid> = event_ids.iter().map(|id| *id.inner_ref()).collect();
        let events = sqlx::query_as::<_, EventRaw>("SELECT * FROM events WHERE event_uid = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    async fn list_published(&self) -> anyhow::Result<Vec<Event>> {
        let events = sqlx::query_as::<_, EventRaw>(
            "SELECT * FROM events WHERE published = true AND status = 'active' ORDER BY event_date",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, event_id: &ID) -> Option<Event> {
        sqlx::query_as::<_, EventRaw>("DELETE FROM events WHERE event_uid = $1 RETURNING *")
            .bind(event_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(Into::into)
    }
}
