//! Repository for the `sensors` table (joined with type and neighborhood).

use sqlx::PgPool;
use urbansense_core::types::DbId;

use crate::models::sensor::{SensorContext, SensorType};

/// Joined column list serving [`SensorContext`].
const CONTEXT_COLUMNS: &str = "s.id, s.name, s.sensor_type_id, t.name AS sensor_type, \
                               t.unit, s.neighborhood_id, n.name AS neighborhood, \
                               s.is_active, s.installed_at";

const CONTEXT_FROM: &str =
    "FROM sensors s \
     JOIN sensor_types t ON s.sensor_type_id = t.id \
     JOIN neighborhoods n ON s.neighborhood_id = n.id";

/// Provides read access to the sensor inventory.
pub struct SensorRepo;

impl SensorRepo {
    /// Fetch a single sensor with its type and neighborhood resolved.
    pub async fn find_context(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SensorContext>, sqlx::Error> {
        let query = format!("SELECT {CONTEXT_COLUMNS} {CONTEXT_FROM} WHERE s.id = $1");
        sqlx::query_as::<_, SensorContext>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List sensors, optionally restricted to one neighborhood.
    pub async fn list(
        pool: &PgPool,
        neighborhood_id: Option<DbId>,
    ) -> Result<Vec<SensorContext>, sqlx::Error> {
        let filter = if neighborhood_id.is_some() {
            "WHERE s.neighborhood_id = $1"
        } else {
            ""
        };
        let query = format!("SELECT {CONTEXT_COLUMNS} {CONTEXT_FROM} {filter} ORDER BY s.id");
        let mut q = sqlx::query_as::<_, SensorContext>(&query);
        if let Some(neighborhood_id) = neighborhood_id {
            q = q.bind(neighborhood_id);
        }
        q.fetch_all(pool).await
    }

    /// List all active sensors. The demo reading generator draws from this.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<SensorContext>, sqlx::Error> {
        let query =
            format!("SELECT {CONTEXT_COLUMNS} {CONTEXT_FROM} WHERE s.is_active ORDER BY s.id");
        sqlx::query_as::<_, SensorContext>(&query).fetch_all(pool).await
    }

    /// List the sensor type vocabulary.
    pub async fn list_types(pool: &PgPool) -> Result<Vec<SensorType>, sqlx::Error> {
        sqlx::query_as::<_, SensorType>("SELECT id, name, unit FROM sensor_types ORDER BY id")
            .fetch_all(pool)
            .await
    }
}
