//! Repository modules implementing operations for all Revu entities.
//!
//! Each module adds methods to `RevuService` via `impl RevuService` blocks.
//! Lookups and listings only return kept rows; a discarded row reads as
//! `DatabaseError::NoResult`.

pub mod agency;
pub mod aspect;
pub mod comment;
pub mod company;
pub mod company_reviewable;
pub mod grant;
pub mod industry;
pub mod like;
pub mod offering;
pub mod polymorphic;
pub mod review;
pub mod scoring;
pub mod stats;
