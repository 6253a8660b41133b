use super::IDigestSubscriberRepo;
use songcircle_domain::{DigestSubscriber, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};

pub struct PostgresDigestSubscriberRepo {
    pool: PgPool,
}

impl PostgresDigestSubscriberRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SubscriberRaw {
    subscriber_uid: Uuid,
    email: String,
    confirmed: bool,
    saved_filter: Option<serde_json::Value>,
    created: i64,
    updated: i64,
}

impl From<SubscriberRaw> for DigestSubscriber {
    fn from(raw: SubscriberRaw) -> Self {
        Self {
            id: raw.subscriber_uid.into(),
            email: raw.email,
            confirmed: raw.confirmed,
            // A filter that no longer deserializes means an unfiltered digest.
            filter: raw.saved_filter.and_then(|v| serde_json::from_value(v).ok()),
            created: raw.created,
            updated: raw.updated,
        }
    }
}

#[async_trait::async_trait]
impl IDigestSubscriberRepo for PostgresDigestSubscriberRepo {
    async fn insert(&self, subscriber: &DigestSubscriber) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO digest_subscribers(
                subscriber_uid, email, confirmed, saved_filter, created, updated
            )
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(subscriber.id.inner_ref())
        .bind(&subscriber.email)
        .bind(subscriber.confirmed)
        .bind(subscriber.filter.as_ref().map(Json))
        .bind(subscriber.created)
        .bind(subscriber.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, subscriber: &DigestSubscriber) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE digest_subscribers SET
                email = $2,
                confirmed = $3,
                saved_filter = $4,
                updated = $5
            WHERE subscriber_uid = $1
            "#,
        )
        .bind(subscriber.id.inner_ref())
        .bind(&subscriber.email)
        .bind(subscriber.confirmed)
        .bind(subscriber.filter.as_ref().map(Json))
        .bind(subscriber.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, subscriber_id: &ID) -> Option<DigestSubscriber> {
        sqlx::query_as::<_, SubscriberRaw>(
            "SELECT * FROM digest_subscribers WHERE subscriber_uid = $1",
        )
        .bind(subscriber_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(Into::into)
    }

    async fn list_confirmed(&self) -> anyhow::Result<Vec<DigestSubscriber>> {
        let subscribers = sqlx::query_as::<_, SubscriberRaw>(
            "SELECT * FROM digest_subscribers WHERE confirmed = true",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(subscribers.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, subscriber_id: &ID) -> Option<DigestSubscriber> {
        sqlx::query_as::<_, SubscriberRaw>(
            "DELETE FROM digest_subscribers WHERE subscriber_uid = $1 RETURNING *",
        )
        .bind(subscriber_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(Into::into)
    }
}
