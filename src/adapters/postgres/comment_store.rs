use crate::domain::{Comment, CommentId, ItemId, UserId};
use crate::ports::comment_store::{CommentStore as CommentStoreTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::collections::HashMap;
use uuid::Uuid;

fn map_row_to_comment(row: &PgRow) -> Comment {
    Comment {
        comment_id: CommentId::from_uuid(row.get("comment_id")),
        item_id: ItemId::from_uuid(row.get("item_id")),
        author_id: UserId::from_uuid(row.get("author_id")),
        text: row.get("text"),
        created_at: row.get("created_at"),
    }
}

/// CommentStoreのPostgreSQL実装
#[allow(dead_code)]
pub struct CommentStore {
    pool: PgPool,
}

#[allow(dead_code)]
impl CommentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStoreTrait for CommentStore {
    async fn save(&self, comment: &Comment) -> Result<Comment> {
        sqlx::query(
            r#"
            INSERT INTO comments (comment_id, item_id, author_id, text, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.comment_id.value())
        .bind(comment.item_id.value())
        .bind(comment.author_id.value())
        .bind(&comment.text)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(comment.clone())
    }

    async fn find_by_item(&self, item_id: ItemId) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            r#"
            SELECT comment_id, item_id, author_id, text, created_at
            FROM comments
            WHERE item_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(item_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_comment).collect())
    }

    async fn find_by_items(&self, item_ids: &[ItemId]) -> Result<HashMap<ItemId, Vec<Comment>>> {
        let ids: Vec<Uuid> = item_ids.iter().map(|id| id.value()).collect();

        let rows = sqlx::query(
            r#"
            SELECT comment_id, item_id, author_id, text, created_at
            FROM comments
            WHERE item_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<ItemId, Vec<Comment>> = HashMap::new();
        for row in &rows {
            let comment = map_row_to_comment(row);
            grouped.entry(comment.item_id).or_default().push(comment);
        }
        Ok(grouped)
    }
}
