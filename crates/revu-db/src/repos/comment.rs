//! Comment repository.

use revu_core::entities::Comment;
use revu_core::enums::{CommentableKind, CommenterKind};
use revu_core::validation::ValidationErrors;

use crate::error::DatabaseError;
use crate::helpers::{fmt_datetime, get_datetime, get_opt_datetime, now, parse_kind};
use crate::pagination::{PageRequest, Paged};
use crate::service::RevuService;
use crate::updates::SetClause;
use crate::updates::comment::CommentUpdate;

const COMMENT_COLUMNS: &str = "id, commenter_type, commenter_id, commentable_type, commentable_id, content, \
     created_at, updated_at, discarded_at";

fn row_to_comment(row: &libsql::Row) -> Result<Comment, DatabaseError> {
    Ok(Comment {
        id: row.get::<i64>(0)?,
        commenter_type: parse_kind(&row.get::<String>(1)?)?,
        commenter_id: row.get::<i64>(2)?,
        commentable_type: parse_kind(&row.get::<String>(3)?)?,
        commentable_id: row.get::<i64>(4)?,
        content: row.get::<String>(5)?,
        created_at: get_datetime(row, 6)?,
        updated_at: get_datetime(row, 7)?,
        discarded_at: get_opt_datetime(row, 8)?,
    })
}

impl RevuService {
    /// Post a comment from a kept commenter on a kept commentable.
    pub async fn create_comment(
        &self,
        commenter_type: CommenterKind,
        commenter_id: i64,
        commentable_type: CommentableKind,
        commentable_id: i64,
        content: Option<String>,
    ) -> Result<Comment, DatabaseError> {
        self.ensure_kept(commentable_type.kind(), commentable_id).await?;
        self.ensure_kept(commenter_type.kind(), commenter_id).await?;

        let mut errors = ValidationErrors::new();
        errors.require_present("content", content.as_deref(), true);
        errors.into_result()?;
        let content = content.unwrap_or_default();

        let now = now();
        self.db()
            .execute_with(
                "INSERT INTO comments (commenter_type, commenter_id, commentable_type, commentable_id,
                                       content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                || {
                    libsql::params![
                        commenter_type.as_str(),
                        commenter_id,
                        commentable_type.as_str(),
                        commentable_id,
                        content.as_str(),
                        fmt_datetime(now)
                    ]
                },
            )
            .await?;
        let id = self.db().last_insert_id();
        tracing::debug!(id, %commentable_type, commentable_id, "comment created");

        Ok(Comment {
            id,
            commenter_type,
            commenter_id,
            commentable_type,
            commentable_id,
            content,
            created_at: now,
            updated_at: now,
            discarded_at: None,
        })
    }

    /// Fetch a kept comment.
    pub async fn get_comment(&self, id: i64) -> Result<Comment, DatabaseError> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1 AND discarded_at IS NULL");
        let mut rows = self.db().query_with(&sql, || [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_comment(&row)
    }

    /// Kept comments on a kept commentable, oldest first.
    pub async fn list_comments(
        &self,
        commentable_type: CommentableKind,
        commentable_id: i64,
        page: PageRequest,
    ) -> Result<Paged<Comment>, DatabaseError> {
        self.ensure_kept(commentable_type.kind(), commentable_id).await?;

        let filter = "commentable_type = ?1 AND commentable_id = ?2 AND discarded_at IS NULL";
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE {filter} ORDER BY id{}",
            page.sql_window()
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params![commentable_type.as_str(), commentable_id])
            .await?;

        let mut comments = Vec::new();
        while let Some(row) = rows.next().await? {
            comments.push(row_to_comment(&row)?);
        }
        let total = self
            .db()
            .count_with(&format!("SELECT COUNT(*) FROM comments WHERE {filter}"), || {
                libsql::params![commentable_type.as_str(), commentable_id]
            })
            .await?;
        Ok(Paged {
            items: comments,
            total,
            request: page,
        })
    }

    pub async fn update_comment(&self, id: i64, update: CommentUpdate) -> Result<Comment, DatabaseError> {
        let comment = self.get_comment(id).await?;

        let mut errors = ValidationErrors::new();
        errors.require_present("content", update.content.as_deref(), false);
        errors.into_result()?;

        let mut set = SetClause::default();
        if let Some(content) = update.content {
            set.push("content", content);
        }
        if set.is_empty() {
            return Ok(comment);
        }

        let (sql, params) = set.into_update("comments", id, now());
        self.db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        self.get_comment(id).await
    }

    pub async fn discard_comment(&self, id: i64) -> Result<(), DatabaseError> {
        let stamp = fmt_datetime(now());
        let changed = self
            .db()
            .execute_with(
                "UPDATE comments SET discarded_at = ?1 WHERE id = ?2 AND discarded_at IS NULL",
                || libsql::params![stamp.as_str(), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        tracing::debug!(id, "comment discarded");
        Ok(())
    }
}
