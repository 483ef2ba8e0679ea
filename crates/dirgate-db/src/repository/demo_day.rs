//! SurrealDB implementation of [`DemoDayRepository`].

use chrono::{DateTime, Utc};
use dirgate_core::error::{DirgateError, DirgateResult};
use dirgate_core::models::demo_day::{CreateDemoDay, DemoDay, DemoDayStatus};
use dirgate_core::models::scope::{WILDCARD_HOST, validate_host};
use dirgate_core::repository::DemoDayRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct DemoDayRow {
    slug_url: String,
    name: String,
    host: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct DemoDayRowWithId {
    record_id: String,
    slug_url: String,
    name: String,
    host: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<DemoDayStatus, DbError> {
    match s {
        "UPCOMING" => Ok(DemoDayStatus::Upcoming),
        "LIVE" => Ok(DemoDayStatus::Live),
        "COMPLETED" => Ok(DemoDayStatus::Completed),
        other => Err(DbError::InvalidRow(format!(
            "unknown demo day status: {other}"
        ))),
    }
}

impl DemoDayRow {
    fn into_demo_day(self, id: Uuid) -> Result<DemoDay, DbError> {
        Ok(DemoDay {
            id,
            slug_url: self.slug_url,
            name: self.name,
            host: self.host,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl DemoDayRowWithId {
    fn try_into_demo_day(self) -> Result<DemoDay, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::InvalidRow(format!("invalid UUID: {e}")))?;
        Ok(DemoDay {
            id,
            slug_url: self.slug_url,
            name: self.name,
            host: self.host,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// A demo day host names one concrete namespace, never the wildcard.
fn validate_demo_day_host(host: &str) -> DirgateResult<()> {
    if host == WILDCARD_HOST {
        return Err(DirgateError::InvalidHost {
            host: host.to_string(),
        });
    }
    validate_host(host)
}

/// SurrealDB implementation of the DemoDay repository.
#[derive(Clone)]
pub struct SurrealDemoDayRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDemoDayRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn update_field(
        &self,
        id: Uuid,
        field: &'static str,
        value: String,
    ) -> DirgateResult<DemoDay> {
        let id_str = id.to_string();
        let query = format!(
            "UPDATE type::record('demo_day', $id) SET \
             {field} = $value, updated_at = time::now()"
        );

        let result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("value", value))
            .await
            .map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::InvalidRow(e.to_string()))?;

        let rows: Vec<DemoDayRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "demo_day".into(),
            id: id_str,
        })?;

        Ok(row.into_demo_day(id)?)
    }
}

impl<C: Connection> DemoDayRepository for SurrealDemoDayRepository<C> {
    async fn create(&self, input: CreateDemoDay) -> DirgateResult<DemoDay> {
        validate_demo_day_host(&input.host)?;
        if input.slug_url.is_empty() {
            return Err(DirgateError::Validation {
                message: "demo day slug must not be empty".into(),
            });
        }
        match self.get_by_slug(&input.slug_url).await {
            Ok(_) => {
                return Err(DirgateError::AlreadyExists {
                    entity: "demo_day".into(),
                });
            }
            Err(DirgateError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('demo_day', $id) SET \
                 slug_url = $slug_url, name = $name, \
                 host = $host, status = $status",
            )
            .bind(("id", id_str.clone()))
            .bind(("slug_url", input.slug_url))
            .bind(("name", input.name))
            .bind(("host", input.host))
            .bind(("status", DemoDayStatus::Upcoming.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::InvalidRow(e.to_string()))?;

        let rows: Vec<DemoDayRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "demo_day".into(),
            id: id_str,
        })?;

        let demo_day = row.into_demo_day(id)?;
        info!(slug_url = %demo_day.slug_url, host = %demo_day.host, "Demo day created");
        Ok(demo_day)
    }

    async fn get_by_slug(&self, slug_url: &str) -> DirgateResult<DemoDay> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM demo_day \
                 WHERE slug_url = $slug_url",
            )
            .bind(("slug_url", slug_url.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DemoDayRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "demo_day".into(),
            id: slug_url.to_string(),
        })?;

        Ok(row.try_into_demo_day()?)
    }

    async fn update_status(&self, slug_url: &str, status: DemoDayStatus) -> DirgateResult<DemoDay> {
        let current = self.get_by_slug(slug_url).await?;
        if !current.status.can_transition_to(status) {
            return Err(DirgateError::Validation {
                message: format!(
                    "demo day {slug_url} cannot move from {} to {}",
                    current.status.as_str(),
                    status.as_str()
                ),
            });
        }

        self.update_field(current.id, "status", status.as_str().to_string())
            .await
    }

    async fn update_host(&self, slug_url: &str, host: String) -> DirgateResult<DemoDay> {
        validate_demo_day_host(&host)?;
        let current = self.get_by_slug(slug_url).await?;
        if current.status != DemoDayStatus::Upcoming {
            return Err(DirgateError::Validation {
                message: format!(
                    "demo day {slug_url} host is fixed once {}",
                    current.status.as_str()
                ),
            });
        }

        self.update_field(current.id, "host", host).await
    }

    async fn list_by_host(&self, host: &str) -> DirgateResult<Vec<DemoDay>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM demo_day \
                 WHERE host = $host \
                 ORDER BY created_at ASC",
            )
            .bind(("host", host.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DemoDayRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(|row| row.try_into_demo_day())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }
}
