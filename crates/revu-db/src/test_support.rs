//! Shared test utilities for revu-db unit tests.

pub(crate) mod helpers {
    use revu_core::entities::{Company, Grant, Industry, Offering, Review};
    use revu_core::enums::{OfferingKind, ReviewerKind, Score};

    use crate::RevuDb;
    use crate::repos::company::NewCompany;
    use crate::repos::grant::NewGrant;
    use crate::repos::industry::NewIndustry;
    use crate::repos::offering::NewOffering;
    use crate::repos::review::NewReview;
    use crate::service::RevuService;

    /// Create an in-memory RevuService.
    pub async fn test_service() -> RevuService {
        let db = RevuDb::open_local(":memory:").await.unwrap();
        RevuService::from_db(db)
    }

    pub async fn company(svc: &RevuService, name: &str) -> Company {
        svc.create_company(NewCompany {
            name: Some(name.to_string()),
            ..NewCompany::default()
        })
        .await
        .unwrap()
    }

    pub async fn offering(svc: &RevuService, owner: &Company, kind: OfferingKind, name: &str) -> Offering {
        svc.create_offering(
            owner.id,
            kind,
            NewOffering {
                name: Some(name.to_string()),
                description: Some(format!("{name} description")),
            },
        )
        .await
        .unwrap()
    }

    pub async fn grant(svc: &RevuService, name: &str) -> Grant {
        svc.create_grant(NewGrant {
            name: Some(name.to_string()),
            acronym: None,
            description: None,
        })
        .await
        .unwrap()
    }

    pub async fn industry(svc: &RevuService, name: &str) -> Industry {
        svc.create_industry(NewIndustry {
            name: Some(name.to_string()),
            description: None,
        })
        .await
        .unwrap()
    }

    /// Review `offering` (sold by `vendor`) on behalf of `reviewer`.
    pub async fn review(
        svc: &RevuService,
        vendor: &Company,
        reviewer: &Company,
        offering: &Offering,
        score: Score,
    ) -> Review {
        svc.create_review(NewReview {
            score: Some(score),
            content: Some("Delivered on time.".to_string()),
            vendor_id: vendor.id,
            reviewer: (ReviewerKind::Company, reviewer.id),
            reviewable: (offering.kind, offering.id),
            grant_id: None,
            aspects: Vec::new(),
        })
        .await
        .unwrap()
    }
}
