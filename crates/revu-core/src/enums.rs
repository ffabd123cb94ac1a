//! Entity kinds, polymorphic role kinds, review scores, and token scopes.
//!
//! Polymorphic columns (`liker_type`, `reviewable_type`, ...) store the
//! PascalCase label returned by `as_str()`. Resolving a label from the outside
//! world goes through [`EntityKind::classify`], a closed table: a label that
//! is not listed there is rejected, never mapped to a default.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Every model type the API can address by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum EntityKind {
    Company,
    Product,
    Service,
    Project,
    Review,
    Comment,
    Like,
    Aspect,
    Grant,
    Industry,
    Agency,
}

impl EntityKind {
    pub const ALL: [Self; 11] = [
        Self::Company,
        Self::Product,
        Self::Service,
        Self::Project,
        Self::Review,
        Self::Comment,
        Self::Like,
        Self::Aspect,
        Self::Grant,
        Self::Industry,
        Self::Agency,
    ];

    /// Label stored in polymorphic `*_type` columns and rendered in JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Product => "Product",
            Self::Service => "Service",
            Self::Project => "Project",
            Self::Review => "Review",
            Self::Comment => "Comment",
            Self::Like => "Like",
            Self::Aspect => "Aspect",
            Self::Grant => "Grant",
            Self::Industry => "Industry",
            Self::Agency => "Agency",
        }
    }

    /// Plural snake_case form used as the URL collection segment.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Company => "companies",
            Self::Product => "products",
            Self::Service => "services",
            Self::Project => "projects",
            Self::Review => "reviews",
            Self::Comment => "comments",
            Self::Like => "likes",
            Self::Aspect => "aspects",
            Self::Grant => "grants",
            Self::Industry => "industries",
            Self::Agency => "agencies",
        }
    }

    /// Singular snake_case form, used in i18n keys and route parameters.
    #[must_use]
    pub const fn singular(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Product => "product",
            Self::Service => "service",
            Self::Project => "project",
            Self::Review => "review",
            Self::Comment => "comment",
            Self::Like => "like",
            Self::Aspect => "aspect",
            Self::Grant => "grant",
            Self::Industry => "industry",
            Self::Agency => "agency",
        }
    }

    /// Classify a free-form label into a kind.
    ///
    /// Accepts the class name (`Review`), its snake_case singular (`review`)
    /// and either plural form (`reviews`, `Reviews`). Anything else is `None`.
    #[must_use]
    pub fn classify(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|kind| {
            label == kind.as_str()
                || label == kind.singular()
                || label == kind.collection()
                || capitalized(kind.collection()) == label
        })
    }

    /// Resolve a URL collection segment (`"services"`) to its kind.
    #[must_use]
    pub fn from_collection(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.collection() == segment)
    }

    #[must_use]
    pub const fn is_liker(self) -> bool {
        matches!(self, Self::Company)
    }

    #[must_use]
    pub const fn is_likeable(self) -> bool {
        matches!(self, Self::Review | Self::Comment)
    }

    #[must_use]
    pub const fn is_commenter(self) -> bool {
        matches!(self, Self::Company)
    }

    #[must_use]
    pub const fn is_commentable(self) -> bool {
        matches!(self, Self::Review)
    }

    #[must_use]
    pub const fn is_offering(self) -> bool {
        matches!(self, Self::Product | Self::Service | Self::Project)
    }
}

fn capitalized(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::classify(s).ok_or_else(|| CoreError::InvalidKind {
            label: s.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Role kinds
// ---------------------------------------------------------------------------

/// Declares a closed subset of `EntityKind` for one polymorphic role.
///
/// Each generated enum converts into `EntityKind` infallibly and back out of it
/// through `TryFrom`, which fails with `CoreError::InvalidRole`.
macro_rules! role_kind {
    ($(#[$meta:meta])* $name:ident, $role:literal, [$($variant:ident),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => EntityKind::$variant.as_str()),+
                }
            }

            #[must_use]
            pub const fn kind(self) -> EntityKind {
                match self {
                    $(Self::$variant => EntityKind::$variant),+
                }
            }
        }

        impl From<$name> for EntityKind {
            fn from(value: $name) -> Self {
                value.kind()
            }
        }

        impl TryFrom<EntityKind> for $name {
            type Error = CoreError;

            fn try_from(kind: EntityKind) -> Result<Self, Self::Error> {
                match kind {
                    $(EntityKind::$variant => Ok(Self::$variant),)+
                    #[allow(unreachable_patterns)]
                    other => Err(CoreError::InvalidRole {
                        kind: other.as_str().to_string(),
                        role: $role,
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

role_kind!(
    /// Types that can like something.
    LikerKind, "liker", [Company]
);
role_kind!(
    /// Types that can be liked.
    LikeableKind, "likeable", [Review, Comment]
);
role_kind!(
    /// Types that can write comments.
    CommenterKind, "commenter", [Company]
);
role_kind!(
    /// Types that can receive comments.
    CommentableKind, "commentable", [Review]
);
role_kind!(
    /// Types that can write reviews.
    ReviewerKind, "reviewer", [Company]
);
role_kind!(
    /// Reviewable offerings a company sells. Ordering follows the
    /// product → service → project concatenation used for vendor reviews.
    OfferingKind, "reviewable", [Product, Service, Project]
);

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// Review verdict. Stored as its integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Score {
    Positive,
    Neutral,
    Negative,
}

impl Score {
    #[must_use]
    pub const fn value(self) -> i64 {
        match self {
            Self::Positive => 1,
            Self::Neutral => 0,
            Self::Negative => -1,
        }
    }

    #[must_use]
    pub const fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Positive),
            0 => Some(Self::Neutral),
            -1 => Some(Self::Negative),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Neutral => "NEUTRAL",
            Self::Negative => "NEGATIVE",
        }
    }

    /// Parse a score from its label (any case) or its integer value.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        match input.to_ascii_uppercase().as_str() {
            "POSITIVE" => Some(Self::Positive),
            "NEUTRAL" => Some(Self::Neutral),
            "NEGATIVE" => Some(Self::Negative),
            _ => input.parse::<i64>().ok().and_then(Self::from_value),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// OAuth-style scope attached to an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    ReadOnly,
    ReadWrite,
    WriteOnly,
}

impl Scope {
    /// Scopes that satisfy a read action (index/show).
    pub const READ: &'static [Self] = &[Self::ReadOnly, Self::ReadWrite];
    /// Scopes that satisfy a write action (create/update/destroy).
    pub const WRITE: &'static [Self] = &[Self::ReadWrite, Self::WriteOnly];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadOnly => "read_only",
            Self::ReadWrite => "read_write",
            Self::WriteOnly => "write_only",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
