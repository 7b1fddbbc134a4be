mod embedded;

use embedded::migrations;

use tokio_postgres::{Client, NoTls, Row};

use crate::models::{Category, Note};

pub struct Repository {
    client: Client,
}

impl Repository {
    pub async fn new(database_dsn: String) -> Result<Self, tokio_postgres::Error> {
        let (client, con) = tokio_postgres::connect(&database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn migrate(&mut self) -> Result<(), refinery::Error> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }

    pub async fn create_note(
        &self,
        title: &str,
        content: &str,
        category_id: Option<i64>,
    ) -> Result<Note, tokio_postgres::Error> {
        let row = self
            .client
            .query_one(
                "WITH n AS (
                    INSERT INTO notes (title, content, category_id)
                    VALUES ($1, $2, $3)
                    RETURNING id, title, content, category_id, created_at, updated_at
                )
                SELECT n.id, n.title, n.content, n.category_id, n.created_at, n.updated_at,
                       c.name AS category_name
                FROM n LEFT JOIN categories c ON c.id = n.category_id",
                &[&title, &content, &category_id],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    pub async fn update_note(
        &self,
        id: i64,
        title: Option<&str>,
        content: Option<&str>,
        category_id: Option<Option<i64>>,
    ) -> Result<Option<Note>, tokio_postgres::Error> {
        // $5 only takes effect when $4 is set; an inner NULL detaches the
        // category.
        let row = self
            .client
            .query_opt(
                "WITH n AS (
                    UPDATE notes SET
                        title = COALESCE($2, title),
                        content = COALESCE($3, content),
                        category_id = CASE WHEN $4 THEN $5 ELSE category_id END,
                        updated_at = NOW()
                    WHERE id = $1
                    RETURNING id, title, content, category_id, created_at, updated_at
                )
                SELECT n.id, n.title, n.content, n.category_id, n.created_at, n.updated_at,
                       c.name AS category_name
                FROM n LEFT JOIN categories c ON c.id = n.category_id",
                &[
                    &id,
                    &title,
                    &content,
                    &category_id.is_some(),
                    &category_id.flatten(),
                ],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    pub async fn delete_note(&self, id: i64) -> Result<bool, tokio_postgres::Error> {
        let rows = self
            .client
            .execute("DELETE FROM notes WHERE id = $1", &[&id])
            .await?;

        Ok(rows == 1)
    }

    pub async fn get_one_note(&self, id: i64) -> Result<Option<Note>, tokio_postgres::Error> {
        let row = self
            .client
            .query_opt(
                "SELECT n.id, n.title, n.content, n.category_id, n.created_at, n.updated_at,
                        c.name AS category_name
                FROM notes n LEFT JOIN categories c ON c.id = n.category_id
                WHERE n.id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    pub async fn get_all_notes(&self) -> Result<Vec<Note>, tokio_postgres::Error> {
        let rows = self
            .client
            .query(
                "SELECT n.id, n.title, n.content, n.category_id, n.created_at, n.updated_at,
                        c.name AS category_name
                FROM notes n LEFT JOIN categories c ON c.id = n.category_id
                ORDER BY n.updated_at DESC",
                &[],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    pub async fn create_category(&self, name: &str) -> Result<Category, tokio_postgres::Error> {
        let row = self
            .client
            .query_one(
                "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
                &[&name],
            )
            .await?;

        Ok(Category {
            id: row.get("id"),
            name: row.get("name"),
        })
    }

    pub async fn get_all_categories(&self) -> Result<Vec<Category>, tokio_postgres::Error> {
        let rows = self
            .client
            .query("SELECT id, name FROM categories ORDER BY name ASC", &[])
            .await?;

        Ok(rows
            .iter()
            .map(|row| Category {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }
}

fn note_from_row(row: &Row) -> Note {
    let category_id: Option<i64> = row.get("category_id");
    let category_name: Option<String> = row.get("category_name");

    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        category_id,
        category: category_id
            .zip(category_name)
            .map(|(id, name)| Category { id, name }),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
