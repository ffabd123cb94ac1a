//! Service layer hosting every repository method.
//!
//! `RevuService` wraps `RevuDb` (raw database access) and the score
//! aggregator used when a vendor's reviews change. All repo methods are
//! implemented as `impl RevuService` blocks in [`crate::repos`].

use revu_core::scoring::{MeanScore, ScoreAggregator};

use crate::RevuDb;
use crate::error::DatabaseError;

pub struct RevuService {
    db: RevuDb,
    scorer: Box<dyn ScoreAggregator>,
}

impl RevuService {
    /// Open a local database and wrap it with the default mean aggregator.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = RevuDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `RevuDb`.
    #[must_use]
    pub fn from_db(db: RevuDb) -> Self {
        Self {
            db,
            scorer: Box::new(MeanScore),
        }
    }

    /// Swap the aggregate score formula.
    #[must_use]
    pub fn with_aggregator(mut self, scorer: impl ScoreAggregator + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &RevuDb {
        &self.db
    }

    pub(crate) fn scorer(&self) -> &dyn ScoreAggregator {
        self.scorer.as_ref()
    }
}
