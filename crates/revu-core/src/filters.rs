//! Allow-listed sort and filter keys.
//!
//! Every caller-supplied key is matched exactly against a fixed table.
//! Unrecognized input means "no filter" or "no sort"; it is never an error,
//! so callers must tolerate the silent fallback.

use crate::enums::{OfferingKind, Score};

/// A closed set of accepted query keys.
pub trait AllowList: Sized + Copy + 'static {
    /// Accepted spellings and the value each maps to.
    const ALLOWED: &'static [(&'static str, Self)];

    /// Map caller input to an allowed value, or `None`.
    #[must_use]
    fn accept(input: Option<&str>) -> Option<Self> {
        let input = input?;
        Self::ALLOWED
            .iter()
            .find(|(key, _)| *key == input)
            .map(|(_, value)| *value)
    }

    /// The column or key name this value corresponds to.
    #[must_use]
    fn key(self) -> &'static str
    where
        Self: PartialEq,
    {
        Self::ALLOWED
            .iter()
            .find(|(_, value)| *value == self)
            .map_or("", |(key, _)| key)
    }
}

/// Restricts vendor reviews to one offering type.
impl AllowList for OfferingKind {
    const ALLOWED: &'static [(&'static str, Self)] = &[
        ("Product", Self::Product),
        ("Service", Self::Service),
        ("Project", Self::Project),
    ];
}

/// Restricts vendor reviews to one verdict.
impl AllowList for Score {
    const ALLOWED: &'static [(&'static str, Self)] = &[
        ("POSITIVE", Self::Positive),
        ("NEUTRAL", Self::Neutral),
        ("NEGATIVE", Self::Negative),
    ];
}

/// Sort key for lists derived from reviewables (clients).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewableSorter {
    ReviewsCount,
    CreatedAt,
}

impl AllowList for ReviewableSorter {
    const ALLOWED: &'static [(&'static str, Self)] = &[
        ("reviews_count", Self::ReviewsCount),
        ("created_at", Self::CreatedAt),
    ];
}

/// Sort key for a company's reviews-as-vendor. Newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSorter {
    CreatedAt,
}

impl AllowList for ReviewSorter {
    const ALLOWED: &'static [(&'static str, Self)] = &[("created_at", Self::CreatedAt)];
}

/// Groups aspects by name and orders by group size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectSorter {
    AspectsCount,
}

impl AllowList for AspectSorter {
    const ALLOWED: &'static [(&'static str, Self)] = &[("aspects_count", Self::AspectsCount)];
}

/// Orders grants by how many vendor reviews reference them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantSorter {
    ReviewsCount,
}

impl AllowList for GrantSorter {
    const ALLOWED: &'static [(&'static str, Self)] = &[("reviews_count", Self::ReviewsCount)];
}

/// Company index ordering. Always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanySorter {
    Name,
    AggregateScore,
    ReviewsCount,
    CreatedAt,
}

impl AllowList for CompanySorter {
    const ALLOWED: &'static [(&'static str, Self)] = &[
        ("name", Self::Name),
        ("aggregate_score", Self::AggregateScore),
        ("reviews_count", Self::ReviewsCount),
        ("created_at", Self::CreatedAt),
    ];
}

/// Ordering of a company's combined offerings. Always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferingSorter {
    Name,
    ReviewsCount,
    CreatedAt,
}

impl AllowList for OfferingSorter {
    const ALLOWED: &'static [(&'static str, Self)] = &[
        ("name", Self::Name),
        ("reviews_count", Self::ReviewsCount),
        ("created_at", Self::CreatedAt),
    ];
}

/// Interpret a string flag the way query parameters carry booleans.
#[must_use]
pub fn flag_is_set(input: Option<&str>) -> bool {
    input == Some("true")
}
