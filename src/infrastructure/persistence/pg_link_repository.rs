//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{PgConnection, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Link, LinkPatch, LinkQuery, NewLink, normalize_tags};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = r#"
    l.id, l.keyword, l.destination, l.description, l.is_parameterized,
    COALESCE(
        (SELECT array_agg(t.name ORDER BY t.name)
         FROM link_tags lt JOIN tags t ON t.id = lt.tag_id
         WHERE lt.link_id = l.id),
        '{}'::text[]
    ) AS tags,
    l.views, l.created_at, l.updated_at"#;

/// PostgreSQL repository for link storage and retrieval.
///
/// Queries are bound at runtime so the crate builds without a live database.
/// Tags live in `tags` and are joined through `link_tags`.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn select_by_id(
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links l WHERE l.id = $1");

        let link = sqlx::query_as::<_, Link>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(link)
    }

    /// Replaces the tag set of a link, creating missing tags.
    async fn replace_tags(
        conn: &mut PgConnection,
        link_id: i64,
        tags: &[String],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM link_tags WHERE link_id = $1")
            .bind(link_id)
            .execute(&mut *conn)
            .await?;

        if tags.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO tags (name) SELECT UNNEST($1::text[]) ON CONFLICT (name) DO NOTHING",
        )
        .bind(tags)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO link_tags (link_id, tag_id)
            SELECT $1, id FROM tags WHERE name = ANY($2::text[])
            "#,
        )
        .bind(link_id)
        .bind(tags)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO links (keyword, destination, description, is_parameterized)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&new_link.keyword)
        .bind(&new_link.destination)
        .bind(&new_link.description)
        .bind(new_link.is_parameterized)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_tags(&mut tx, id, &new_link.tags).await?;
        let link = Self::select_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::internal("Created link vanished", json!({ "id": id })))?;

        tx.commit().await?;
        Ok(link)
    }

    async fn find_by_keyword(&self, keyword: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links l WHERE l.keyword = $1");

        let link = sqlx::query_as::<_, Link>(&sql)
            .bind(keyword)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(link)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::select_by_id(&mut conn, id).await
    }

    async fn list(&self, query: &LinkQuery) -> Result<Vec<Link>, AppError> {
        // Column and direction come from closed enums, never from raw input.
        let sql = format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links l
            WHERE ($1::text IS NULL
                   OR l.keyword ILIKE '%' || $1 || '%'
                   OR l.destination ILIKE '%' || $1 || '%'
                   OR l.description ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR EXISTS (
                   SELECT 1 FROM link_tags lt JOIN tags t ON t.id = lt.tag_id
                   WHERE lt.link_id = l.id AND t.name = $2))
            ORDER BY l.{} {}, l.id ASC
            "#,
            query.sort.column(),
            query.order.keyword()
        );

        let links = sqlx::query_as::<_, Link>(&sql)
            .bind(query.search.as_deref())
            .bind(query.tag.as_deref())
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(links)
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE links
            SET destination      = COALESCE($2, destination),
                description      = COALESCE($3, description),
                is_parameterized = COALESCE($4, is_parameterized),
                updated_at       = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.destination)
        .bind(patch.description)
        .bind(patch.is_parameterized)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found("Link not found", json!({ "id": id })));
        }

        if let Some(tags) = patch.tags {
            Self::replace_tags(&mut tx, id, &normalize_tags(tags)).await?;
        }

        let link = Self::select_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        tx.commit().await?;
        Ok(link)
    }

    async fn delete(&self, id: i64) -> Result<Option<Link>, AppError> {
        let mut tx = self.pool.begin().await?;

        let Some(link) = Self::select_by_id(&mut tx, id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(link))
    }

    async fn increment_views(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE links SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
