//! # revu-core
//!
//! Core types shared by every Revu crate.
//!
//! This crate provides the foundational pieces of the review platform:
//! - Entity structs for companies, offerings, reviews, likes, comments,
//!   aspects, grants, and the company/offering join rows
//! - The closed [`enums::EntityKind`] table and its typed role sub-enums
//!   (liker, likeable, commenter, commentable, offering)
//! - The salted [`hashid::HashidCodec`] used for every external identifier
//! - Allow-listed sort and filter keys
//! - The pluggable [`scoring::ScoreAggregator`]
//! - Field-level validation errors and cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod filters;
pub mod hashid;
pub mod identity;
pub mod scoring;
pub mod validation;
