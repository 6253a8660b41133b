use super::IVenueRepo;
use songcircle_domain::{Venue, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresVenueRepo {
    pool: PgPool,
}

impl PostgresVenueRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct VenueRaw {
    venue_uid: Uuid,
    name: String,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    map_url: Option<String>,
}

impl From<VenueRaw> for Venue {
    fn from(raw: VenueRaw) -> Self {
        Self {
            id: raw.venue_uid.into(),
            name: raw.name,
            address: raw.address,
            city: raw.city,
            state: raw.state,
            zip: raw.zip,
            latitude: raw.latitude,
            longitude: raw.longitude,
            map_url: raw.map_url,
        }
    }
}

#[async_trait::async_trait]
impl IVenueRepo for PostgresVenueRepo {
    async fn insert(&self, venue: &Venue) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO venues(
                venue_uid, name, address, city, state, zip, latitude, longitude, map_url
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(venue.id.inner_ref())
        .bind(&venue.name)
        .bind(&venue.address)
        .bind(&venue.city)
        .bind(&venue.state)
        .bind(&venue.zip)
        .bind(venue.latitude)
        .bind(venue.longitude)
        .bind(&venue.map_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, venue_id: &ID) -> Option<Venue> {
        sqlx::query_as::<_, VenueRaw>("SELECT * FROM venues WHERE venue_uid = $1")
            .bind(venue_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(Into::into)
    }

    async fn find_many(&self, venue_ids: &[ID]) -> anyhow::Result<Vec<Venue>> {
        let ids: Vec<Uuid> = venue_ids.iter().map(|id| *id.inner_ref()).collect();
        let venues = sqlx::query_as::<_, VenueRaw>("SELECT * FROM venues WHERE venue_uid = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(venues.into_iter().map(Into::into).collect())
    }

    async fn list(&self) -> anyhow::Result<Vec<Venue>> {
        let venues = sqlx::query_as::<_, VenueRaw>("SELECT * FROM venues ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(venues.into_iter().map(Into::into).collect())
    }
}
