//! Review update builder.
//!
//! Vendor, reviewer and reviewable are fixed at creation.

use revu_core::enums::Score;

#[derive(Debug, Clone, Default)]
pub struct ReviewUpdate {
    pub score: Option<Score>,
    pub content: Option<Option<String>>,
    pub grant_id: Option<Option<i64>>,
}

#[derive(Default)]
pub struct ReviewUpdateBuilder(ReviewUpdate);

impl ReviewUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn score(mut self, val: Score) -> Self {
        self.0.score = Some(val);
        self
    }

    #[must_use]
    pub fn content(mut self, val: Option<String>) -> Self {
        self.0.content = Some(val);
        self
    }

    #[must_use]
    pub fn grant_id(mut self, val: Option<i64>) -> Self {
        self.0.grant_id = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> ReviewUpdate {
        self.0
    }
}
