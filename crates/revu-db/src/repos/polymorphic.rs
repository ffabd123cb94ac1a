//! Polymorphic lookup by entity kind.
//!
//! Maps an [`EntityKind`] plus a raw id to the kept entity behind it. The
//! match below is the whole dispatch table; there is no fallback arm.

use revu_core::entities::{Agency, Aspect, Comment, Company, Grant, Industry, Like, Offering, Review};
use revu_core::enums::{EntityKind, OfferingKind};

use crate::error::DatabaseError;
use crate::service::RevuService;

/// A kept entity of any addressable kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Company(Company),
    Offering(Offering),
    Review(Review),
    Comment(Comment),
    Like(Like),
    Aspect(Aspect),
    Grant(Grant),
    Industry(Industry),
    Agency(Agency),
}

impl Resolved {
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Company(_) => EntityKind::Company,
            Self::Offering(offering) => offering.kind.kind(),
            Self::Review(_) => EntityKind::Review,
            Self::Comment(_) => EntityKind::Comment,
            Self::Like(_) => EntityKind::Like,
            Self::Aspect(_) => EntityKind::Aspect,
            Self::Grant(_) => EntityKind::Grant,
            Self::Industry(_) => EntityKind::Industry,
            Self::Agency(_) => EntityKind::Agency,
        }
    }

    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::Company(c) => c.id,
            Self::Offering(o) => o.id,
            Self::Review(r) => r.id,
            Self::Comment(c) => c.id,
            Self::Like(l) => l.id,
            Self::Aspect(a) => a.id,
            Self::Grant(g) => g.id,
            Self::Industry(i) => i.id,
            Self::Agency(a) => a.id,
        }
    }
}

impl RevuService {
    /// Load the kept entity of `kind` with `id`.
    ///
    /// Offerings must be reachable. Anything else is `NoResult`.
    pub async fn resolve(&self, kind: EntityKind, id: i64) -> Result<Resolved, DatabaseError> {
        let resolved = match kind {
            EntityKind::Company => Resolved::Company(self.get_company(id).await?),
            EntityKind::Product => Resolved::Offering(self.get_offering(OfferingKind::Product, id).await?),
            EntityKind::Service => Resolved::Offering(self.get_offering(OfferingKind::Service, id).await?),
            EntityKind::Project => Resolved::Offering(self.get_offering(OfferingKind::Project, id).await?),
            EntityKind::Review => Resolved::Review(self.get_review(id).await?),
            EntityKind::Comment => Resolved::Comment(self.get_comment(id).await?),
            EntityKind::Like => Resolved::Like(self.get_like(id).await?),
            EntityKind::Aspect => Resolved::Aspect(self.get_aspect(id).await?),
            EntityKind::Grant => Resolved::Grant(self.get_grant(id).await?),
            EntityKind::Industry => Resolved::Industry(self.get_industry(id).await?),
            EntityKind::Agency => Resolved::Agency(self.get_agency(id).await?),
        };
        Ok(resolved)
    }

    /// Fail with `NoResult` unless the entity exists and is kept.
    pub async fn ensure_kept(&self, kind: EntityKind, id: i64) -> Result<(), DatabaseError> {
        self.resolve(kind, id).await.map(|_| ())
    }
}
