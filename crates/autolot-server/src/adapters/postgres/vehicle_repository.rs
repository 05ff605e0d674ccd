//! PostgreSQL implementation of VehicleRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use autolot::{
    DomainError, ListQuery, NewVehicle, SortOrder, VehiclePatch, VehicleRecord, VehicleRepository,
    YearConstraint,
};

/// PostgreSQL implementation of VehicleRepository.
///
/// Stateless; every call runs on the pool handed out by the connection manager.
#[derive(Default)]
pub struct PgVehicleRepository;

impl PgVehicleRepository {
    pub fn new() -> Self {
        Self
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct VehicleRow {
    id: Uuid,
    title: String,
    make: String,
    model: String,
    year: i32,
    price: f64,
    images: Vec<String>,
    description: String,
    mileage: i32,
    color: String,
    fuel_type: String,
    transmission: String,
    seller_phone: String,
    sold: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<VehicleRow> for VehicleRecord {
    type Error = DomainError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            record_id: row.id,
            title: row.title,
            make: row.make,
            model: row.model,
            year: row.year,
            price: row.price,
            images: row.images,
            description: row.description,
            mileage: row.mileage,
            color: row.color,
            fuel_type: row.fuel_type.parse().map_err(DomainError::Repository)?,
            transmission: row.transmission.parse().map_err(DomainError::Repository)?,
            seller_phone: row.seller_phone,
            sold: row.sold,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Escape `LIKE` metacharacters so search text matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Render a listing query as SQL
fn list_query_sql(query: &ListQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT * FROM vehicles WHERE TRUE");

    if let Some(search) = &query.search {
        let pattern = format!("%{}%", escape_like(search));
        builder.push(" AND (");
        for (i, column) in ["title", "make", "model", "description"].iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            builder.push(*column);
            builder.push(" ILIKE ");
            builder.push_bind(pattern.clone());
        }
        builder.push(")");
    }

    if let Some(make) = &query.make {
        builder.push(" AND LOWER(make) = LOWER(");
        builder.push_bind(make.clone());
        builder.push(")");
    }

    match query.year {
        YearConstraint::Any => {}
        YearConstraint::Exact(year) => {
            builder.push(" AND year = ");
            builder.push_bind(year);
        }
        YearConstraint::Range { min, max } => {
            if let Some(min) = min {
                builder.push(" AND year >= ");
                builder.push_bind(min);
            }
            if let Some(max) = max {
                builder.push(" AND year <= ");
                builder.push_bind(max);
            }
        }
    }

    match query.order {
        SortOrder::CreatedAtDesc => builder.push(" ORDER BY created_at DESC"),
    };

    builder
}

fn repository_error(operation: &str) -> impl Fn(sqlx::Error) -> DomainError + '_ {
    move |e| DomainError::Repository(format!("{}: {}", operation, e))
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    type Handle = PgPool;

    async fn find(
        &self,
        pool: &PgPool,
        query: &ListQuery,
    ) -> Result<Vec<VehicleRecord>, DomainError> {
        let rows = list_query_sql(query)
            .build_query_as::<VehicleRow>()
            .fetch_all(pool)
            .await
            .map_err(repository_error("find vehicles"))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_by_id(
        &self,
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<VehicleRecord>, DomainError> {
        let row = sqlx::query_as::<_, VehicleRow>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(repository_error("find vehicle"))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn insert(
        &self,
        pool: &PgPool,
        vehicle: &NewVehicle,
    ) -> Result<VehicleRecord, DomainError> {
        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            INSERT INTO vehicles (title, make, model, year, price, images, description,
                                  mileage, color, fuel_type, transmission, seller_phone, sold)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&vehicle.title)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.price)
        .bind(&vehicle.images)
        .bind(&vehicle.description)
        .bind(vehicle.mileage)
        .bind(&vehicle.color)
        .bind(vehicle.fuel_type.to_string())
        .bind(vehicle.transmission.to_string())
        .bind(&vehicle.seller_phone)
        .bind(vehicle.sold)
        .fetch_one(pool)
        .await
        .map_err(repository_error("insert vehicle"))?;

        row.try_into()
    }

    async fn update(
        &self,
        pool: &PgPool,
        id: Uuid,
        patch: &VehiclePatch,
    ) -> Result<Option<VehicleRecord>, DomainError> {
        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            UPDATE vehicles
            SET title = COALESCE($2, title),
                make = COALESCE($3, make),
                model = COALESCE($4, model),
                year = COALESCE($5, year),
                price = COALESCE($6, price),
                images = COALESCE($7, images),
                description = COALESCE($8, description),
                mileage = COALESCE($9, mileage),
                color = COALESCE($10, color),
                fuel_type = COALESCE($11, fuel_type),
                transmission = COALESCE($12, transmission),
                seller_phone = COALESCE($13, seller_phone),
                sold = COALESCE($14, sold),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.make)
        .bind(&patch.model)
        .bind(patch.year)
        .bind(patch.price)
        .bind(&patch.images)
        .bind(&patch.description)
        .bind(patch.mileage)
        .bind(&patch.color)
        .bind(patch.fuel_type.map(|f| f.to_string()))
        .bind(patch.transmission.map(|t| t.to_string()))
        .bind(&patch.seller_phone)
        .bind(patch.sold)
        .fetch_optional(pool)
        .await
        .map_err(repository_error("update vehicle"))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn distinct_makes(&self, pool: &PgPool) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT make FROM vehicles")
            .fetch_all(pool)
            .await
            .map_err(repository_error("distinct makes"))
    }

    async fn distinct_years(&self, pool: &PgPool) -> Result<Vec<i32>, DomainError> {
        sqlx::query_scalar::<_, i32>("SELECT DISTINCT year FROM vehicles")
            .fetch_all(pool)
            .await
            .map_err(repository_error("distinct years"))
    }
}
