//! Entity structs for all Revu domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `revu-db/migrations`). Primary keys are raw integers here; they are only
//! ever shown to clients through a `HashidCodec`.

mod agency;
mod aspect;
mod comment;
mod company;
mod company_reviewable;
mod grant;
mod industry;
mod like;
mod offering;
mod review;

pub use agency::Agency;
pub use aspect::Aspect;
pub use comment::Comment;
pub use company::Company;
pub use company_reviewable::CompanyReviewable;
pub use grant::Grant;
pub use industry::{Industry, IndustryCompany};
pub use like::Like;
pub use offering::Offering;
pub use review::Review;

use chrono::{DateTime, Utc};

/// Soft-deletion state shared by every entity.
///
/// A record is *kept* while `discarded_at` is unset. Discarded records stay in
/// the database but are invisible to every lookup and listing.
pub trait Discardable {
    fn discarded_at(&self) -> Option<DateTime<Utc>>;

    fn is_kept(&self) -> bool {
        self.discarded_at().is_none()
    }

    fn is_discarded(&self) -> bool {
        !self.is_kept()
    }
}

macro_rules! impl_discardable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Discardable for $ty {
                fn discarded_at(&self) -> Option<DateTime<Utc>> {
                    self.discarded_at
                }
            }
        )+
    };
}

impl_discardable!(
    Agency,
    Aspect,
    Comment,
    Company,
    CompanyReviewable,
    Grant,
    Industry,
    IndustryCompany,
    Like,
    Offering,
    Review,
);
