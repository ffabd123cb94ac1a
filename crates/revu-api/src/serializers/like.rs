use chrono::{DateTime, Utc};
use revu_core::entities::{Comment, Like};
use revu_core::hashid::HashidCodec;
use schemars::JsonSchema;
use serde::Serialize;

use super::PolymorphicRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct LikeJson {
    pub id: String,
    pub liker: PolymorphicRef,
    pub likeable: PolymorphicRef,
    pub created_at: DateTime<Utc>,
}

impl LikeJson {
    #[must_use]
    pub fn new(like: &Like, hashids: &HashidCodec) -> Self {
        Self {
            id: hashids.encode(like.id),
            liker: PolymorphicRef::new(like.liker_type, like.liker_id, hashids),
            likeable: PolymorphicRef::new(like.likeable_type, like.likeable_id, hashids),
            created_at: like.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CommentJson {
    pub id: String,
    pub commenter: PolymorphicRef,
    pub commentable: PolymorphicRef,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentJson {
    #[must_use]
    pub fn new(comment: &Comment, hashids: &HashidCodec) -> Self {
        Self {
            id: hashids.encode(comment.id),
            commenter: PolymorphicRef::new(comment.commenter_type, comment.commenter_id, hashids),
            commentable: PolymorphicRef::new(comment.commentable_type, comment.commentable_id, hashids),
            content: comment.content.clone(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}
