//! Persistence for portfolio content.
//!
//! Ordered tables implement [`Collection`]; the two single-row tables implement
//! [`Singleton`]. Shared queries (listing, counting, deleting, reordering) are
//! written once against the table name carried by the trait.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::content::tables::ContentTable;
use crate::content::validation::Validate;
use crate::models::content::{
    AboutInfo, AboutInfoInput, Achievement, AchievementInput, Certificate, CertificateInput,
    Education, EducationInput, Experience, ExperienceInput, PersonalInfo, PersonalInfoInput,
    Project, ProjectInput, SocialLink, SocialLinkInput,
};

/// A content table whose rows are shown as a list ordered by `order_index`.
#[async_trait]
pub trait Collection:
    for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static
{
    const TABLE: ContentTable;
    /// Extra predicate applied when listing rows for the public site.
    const PUBLIC_FILTER: Option<&'static str> = None;

    type Input: DeserializeOwned + Validate + Send + Sync + 'static;

    fn requested_order(input: &Self::Input) -> Option<i32>;

    async fn insert(pool: &PgPool, input: &Self::Input, order_index: i32)
        -> Result<Self, sqlx::Error>;

    /// Returns `None` when no row has the given id.
    async fn update(pool: &PgPool, id: Uuid, input: &Self::Input)
        -> Result<Option<Self>, sqlx::Error>;
}

/// A content table of which only the first row is displayed.
#[async_trait]
pub trait Singleton:
    for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static
{
    const TABLE: ContentTable;

    type Input: DeserializeOwned + Validate + Send + Sync + 'static;

    async fn insert(pool: &PgPool, input: &Self::Input) -> Result<Self, sqlx::Error>;

    async fn update(pool: &PgPool, id: Uuid, input: &Self::Input)
        -> Result<Option<Self>, sqlx::Error>;
}

// ────────────────────────────────────────────────────────────────────────────
// Generic queries
// ────────────────────────────────────────────────────────────────────────────

pub fn list_sql(table: ContentTable, filter: Option<&str>) -> String {
    let where_clause = filter.map(|f| format!(" WHERE {f}")).unwrap_or_default();
    format!("SELECT * FROM {table}{where_clause} ORDER BY order_index ASC, created_at ASC")
}

/// Lists rows ordered by `order_index`. `public` applies the table's public filter.
pub async fn list<T: Collection>(pool: &PgPool, public: bool) -> Result<Vec<T>, sqlx::Error> {
    let filter = if public { T::PUBLIC_FILTER } else { None };
    let sql = list_sql(T::TABLE, filter);
    sqlx::query_as::<_, T>(&sql).fetch_all(pool).await
}

pub async fn count<T: Collection>(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM {}", T::TABLE);
    sqlx::query_scalar::<_, i64>(&sql).fetch_one(pool).await
}

/// Inserts a row. Without an explicit `order_index` the row is appended after the
/// existing ones.
pub async fn create<T: Collection>(pool: &PgPool, input: &T::Input) -> Result<T, sqlx::Error> {
    let order_index = match T::requested_order(input) {
        Some(index) => index,
        None => i32::try_from(count::<T>(pool).await?).unwrap_or(i32::MAX),
    };
    T::insert(pool, input, order_index).await
}

/// Returns `false` when no row had the given id.
pub async fn delete(pool: &PgPool, table: ContentTable, id: Uuid) -> Result<bool, sqlx::Error> {
    let sql = format!("DELETE FROM {table} WHERE id = $1");
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Assigns `order_index = position` to each id inside one transaction.
///
/// Returns the first id that does not exist, in which case nothing is changed.
pub async fn reorder(
    pool: &PgPool,
    table: ContentTable,
    ids: &[Uuid],
) -> Result<Option<Uuid>, sqlx::Error> {
    let sql = format!("UPDATE {table} SET order_index = $1, updated_at = now() WHERE id = $2");
    let mut tx = pool.begin().await?;

    for (position, id) in ids.iter().enumerate() {
        let position = i32::try_from(position).unwrap_or(i32::MAX);
        let result = sqlx::query(&sql)
            .bind(position)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(Some(*id));
        }
    }

    tx.commit().await?;
    Ok(None)
}

/// Returns the displayed (oldest) row of a singleton table.
pub async fn first<T: Singleton>(pool: &PgPool) -> Result<Option<T>, sqlx::Error> {
    let sql = format!(
        "SELECT * FROM {} ORDER BY created_at ASC LIMIT 1",
        T::TABLE
    );
    sqlx::query_as::<_, T>(&sql).fetch_optional(pool).await
}

/// Updates the displayed row of a singleton table, inserting it if absent.
pub async fn upsert<T: Singleton>(pool: &PgPool, input: &T::Input) -> Result<T, sqlx::Error> {
    let sql = format!(
        "SELECT id FROM {} ORDER BY created_at ASC LIMIT 1",
        T::TABLE
    );
    let existing: Option<Uuid> = sqlx::query_scalar(&sql).fetch_optional(pool).await?;

    if let Some(id) = existing {
        if let Some(row) = T::update(pool, id, input).await? {
            return Ok(row);
        }
    }
    T::insert(pool, input).await
}

/// Flips a social link's visibility without touching its other fields.
pub async fn set_social_link_active(
    pool: &PgPool,
    id: Uuid,
    is_active: bool,
) -> Result<Option<SocialLink>, sqlx::Error> {
    sqlx::query_as::<_, SocialLink>(
        "UPDATE social_links SET is_active = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(is_active)
    .fetch_optional(pool)
    .await
}

fn blank_to_none(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Singletons
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl Singleton for PersonalInfo {
    const TABLE: ContentTable = ContentTable::PersonalInfo;
    type Input = PersonalInfoInput;

    async fn insert(pool: &PgPool, input: &PersonalInfoInput) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, PersonalInfo>(
            r#"
            INSERT INTO personal_info
                (name, title, subtitle, email, phone, location,
                 profile_picture_url, linkedin_url, github_url, instagram_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(input.name.trim())
        .bind(input.title.trim())
        .bind(blank_to_none(&input.subtitle))
        .bind(input.email.trim())
        .bind(blank_to_none(&input.phone))
        .bind(blank_to_none(&input.location))
        .bind(blank_to_none(&input.profile_picture_url))
        .bind(blank_to_none(&input.linkedin_url))
        .bind(blank_to_none(&input.github_url))
        .bind(blank_to_none(&input.instagram_url))
        .fetch_one(pool)
        .await
    }

    async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &PersonalInfoInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PersonalInfo>(
            r#"
            UPDATE personal_info SET
                name = $2, title = $3, subtitle = $4, email = $5, phone = $6, location = $7,
                profile_picture_url = $8, linkedin_url = $9, github_url = $10,
                instagram_url = $11, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(input.title.trim())
        .bind(blank_to_none(&input.subtitle))
        .bind(input.email.trim())
        .bind(blank_to_none(&input.phone))
        .bind(blank_to_none(&input.location))
        .bind(blank_to_none(&input.profile_picture_url))
        .bind(blank_to_none(&input.linkedin_url))
        .bind(blank_to_none(&input.github_url))
        .bind(blank_to_none(&input.instagram_url))
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl Singleton for AboutInfo {
    const TABLE: ContentTable = ContentTable::AboutInfo;
    type Input = AboutInfoInput;

    async fn insert(pool: &PgPool, input: &AboutInfoInput) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AboutInfo>(
            r#"
            INSERT INTO about_info
                (summary, years_experience, projects_completed,
                 technologies_count, client_satisfaction)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(input.summary.trim())
        .bind(input.years_experience.trim())
        .bind(input.projects_completed.trim())
        .bind(input.technologies_count.trim())
        .bind(input.client_satisfaction.trim())
        .fetch_one(pool)
        .await
    }

    async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &AboutInfoInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AboutInfo>(
            r#"
            UPDATE about_info SET
                summary = $2, years_experience = $3, projects_completed = $4,
                technologies_count = $5, client_satisfaction = $6, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.summary.trim())
        .bind(input.years_experience.trim())
        .bind(input.projects_completed.trim())
        .bind(input.technologies_count.trim())
        .bind(input.client_satisfaction.trim())
        .fetch_optional(pool)
        .await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Collections
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl Collection for Experience {
    const TABLE: ContentTable = ContentTable::Experiences;
    type Input = ExperienceInput;

    fn requested_order(input: &ExperienceInput) -> Option<i32> {
        input.order_index
    }

    async fn insert(
        pool: &PgPool,
        input: &ExperienceInput,
        order_index: i32,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Experience>(
            r#"
            INSERT INTO experiences (title, company, location, duration, description, order_index)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(input.title.trim())
        .bind(input.company.trim())
        .bind(input.location.trim())
        .bind(input.duration.trim())
        .bind(&input.description)
        .bind(order_index)
        .fetch_one(pool)
        .await
    }

    async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &ExperienceInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Experience>(
            r#"
            UPDATE experiences SET
                title = $2, company = $3, location = $4, duration = $5, description = $6,
                order_index = COALESCE($7, order_index), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.title.trim())
        .bind(input.company.trim())
        .bind(input.location.trim())
        .bind(input.duration.trim())
        .bind(&input.description)
        .bind(input.order_index)
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl Collection for Project {
    const TABLE: ContentTable = ContentTable::Projects;
    type Input = ProjectInput;

    fn requested_order(input: &ProjectInput) -> Option<i32> {
        input.order_index
    }

    async fn insert(
        pool: &PgPool,
        input: &ProjectInput,
        order_index: i32,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects
                (title, description, technologies, github_url, live_url, image_url, order_index)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(input.title.trim())
        .bind(input.description.trim())
        .bind(&input.technologies)
        .bind(blank_to_none(&input.github_url))
        .bind(blank_to_none(&input.live_url))
        .bind(blank_to_none(&input.image_url))
        .bind(order_index)
        .fetch_one(pool)
        .await
    }

    async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &ProjectInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                title = $2, description = $3, technologies = $4, github_url = $5,
                live_url = $6, image_url = $7, order_index = COALESCE($8, order_index),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.title.trim())
        .bind(input.description.trim())
        .bind(&input.technologies)
        .bind(blank_to_none(&input.github_url))
        .bind(blank_to_none(&input.live_url))
        .bind(blank_to_none(&input.image_url))
        .bind(input.order_index)
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl Collection for Education {
    const TABLE: ContentTable = ContentTable::Education;
    type Input = EducationInput;

    fn requested_order(input: &EducationInput) -> Option<i32> {
        input.order_index
    }

    async fn insert(
        pool: &PgPool,
        input: &EducationInput,
        order_index: i32,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Education>(
            r#"
            INSERT INTO education (degree, institution, location, duration, grade, order_index)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(input.degree.trim())
        .bind(input.institution.trim())
        .bind(input.location.trim())
        .bind(input.duration.trim())
        .bind(blank_to_none(&input.grade))
        .bind(order_index)
        .fetch_one(pool)
        .await
    }

    async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &EducationInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Education>(
            r#"
            UPDATE education SET
                degree = $2, institution = $3, location = $4, duration = $5, grade = $6,
                order_index = COALESCE($7, order_index), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.degree.trim())
        .bind(input.institution.trim())
        .bind(input.location.trim())
        .bind(input.duration.trim())
        .bind(blank_to_none(&input.grade))
        .bind(input.order_index)
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl Collection for Certificate {
    const TABLE: ContentTable = ContentTable::Certificates;
    type Input = CertificateInput;

    fn requested_order(input: &CertificateInput) -> Option<i32> {
        input.order_index
    }

    async fn insert(
        pool: &PgPool,
        input: &CertificateInput,
        order_index: i32,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Certificate>(
            r#"
            INSERT INTO certificates (title, issuer, date, credential_id, credential_url, order_index)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(input.title.trim())
        .bind(input.issuer.trim())
        .bind(input.date.trim())
        .bind(blank_to_none(&input.credential_id))
        .bind(blank_to_none(&input.credential_url))
        .bind(order_index)
        .fetch_one(pool)
        .await
    }

    async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &CertificateInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Certificate>(
            r#"
            UPDATE certificates SET
                title = $2, issuer = $3, date = $4, credential_id = $5, credential_url = $6,
                order_index = COALESCE($7, order_index), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.title.trim())
        .bind(input.issuer.trim())
        .bind(input.date.trim())
        .bind(blank_to_none(&input.credential_id))
        .bind(blank_to_none(&input.credential_url))
        .bind(input.order_index)
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl Collection for Achievement {
    const TABLE: ContentTable = ContentTable::Achievements;
    type Input = AchievementInput;

    fn requested_order(input: &AchievementInput) -> Option<i32> {
        input.order_index
    }

    async fn insert(
        pool: &PgPool,
        input: &AchievementInput,
        order_index: i32,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Achievement>(
            r#"
            INSERT INTO achievements (title, description, icon_type, date, category, order_index)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(input.title.trim())
        .bind(input.description.trim())
        .bind(&input.icon_type)
        .bind(input.date.trim())
        .bind(input.category.trim())
        .bind(order_index)
        .fetch_one(pool)
        .await
    }

    async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &AchievementInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Achievement>(
            r#"
            UPDATE achievements SET
                title = $2, description = $3, icon_type = $4, date = $5, category = $6,
                order_index = COALESCE($7, order_index), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.title.trim())
        .bind(input.description.trim())
        .bind(&input.icon_type)
        .bind(input.date.trim())
        .bind(input.category.trim())
        .bind(input.order_index)
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl Collection for SocialLink {
    const TABLE: ContentTable = ContentTable::SocialLinks;
    const PUBLIC_FILTER: Option<&'static str> = Some("is_active = TRUE");
    type Input = SocialLinkInput;

    fn requested_order(input: &SocialLinkInput) -> Option<i32> {
        input.order_index
    }

    async fn insert(
        pool: &PgPool,
        input: &SocialLinkInput,
        order_index: i32,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SocialLink>(
            r#"
            INSERT INTO social_links (platform, url, icon_type, is_active, order_index)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(input.platform.trim())
        .bind(input.url.trim())
        .bind(&input.icon_type)
        .bind(input.is_active)
        .bind(order_index)
        .fetch_one(pool)
        .await
    }

    async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &SocialLinkInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, SocialLink>(
            r#"
            UPDATE social_links SET
                platform = $2, url = $3, icon_type = $4, is_active = $5,
                order_index = COALESCE($6, order_index), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.platform.trim())
        .bind(input.url.trim())
        .bind(&input.icon_type)
        .bind(input.is_active)
        .bind(input.order_index)
        .fetch_optional(pool)
        .await
    }
}
