//! Hashid decoding and polymorphic label classification at the API edge.

use revu_core::enums::EntityKind;
use revu_core::errors::CoreError;
use revu_core::hashid::HashidCodec;

use crate::error::ApiError;

/// Decode a hashid from a URL segment or body field.
///
/// An undecodable hashid reads as a missing record, reported under `key`.
///
/// # Errors
///
/// `NotFound { key }` when `raw` is not a canonical hashid.
pub fn decode_id(hashids: &HashidCodec, raw: &str, key: &str) -> Result<i64, ApiError> {
    hashids.decode(raw.trim()).ok_or_else(|| ApiError::NotFound { key: key.to_string() })
}

/// Classify a `*_type` label into the role enum `R` (liker, commenter, ...).
///
/// Unknown labels and kinds that cannot play the role both fail the same
/// way, as an invalid parameter under `key`.
///
/// # Errors
///
/// `InvalidParameter { key }`.
pub fn classify_role<R>(label: &str, key: &str) -> Result<R, ApiError>
where
    R: TryFrom<EntityKind, Error = CoreError>,
{
    EntityKind::classify(label)
        .and_then(|kind| R::try_from(kind).ok())
        .ok_or_else(|| ApiError::invalid(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use revu_core::enums::{LikerKind, OfferingKind};
    use rstest::rstest;

    #[test]
    fn decodes_or_reports_not_found() {
        let codec = HashidCodec::new("resolver", 4);
        let hash = codec.encode(42);
        assert_eq!(decode_id(&codec, &hash, "review").unwrap(), 42);

        let err = decode_id(&codec, "0", "review").unwrap_err();
        assert!(matches!(err, ApiError::NotFound { key } if key == "review"));
    }

    #[rstest]
    #[case("Company", true)]
    #[case("companies", true)]
    #[case("Review", false)]
    #[case("Grant", false)]
    #[case("Spaceship", false)]
    fn liker_labels(#[case] label: &str, #[case] ok: bool) {
        let result = classify_role::<LikerKind>(label, "from_type");
        assert_eq!(result.is_ok(), ok);
        if let Err(err) = result {
            assert!(matches!(err, ApiError::InvalidParameter { key } if key == "from_type"));
        }
    }

    #[test]
    fn offering_labels() {
        assert_eq!(
            classify_role::<OfferingKind>("services", "type").unwrap(),
            OfferingKind::Service
        );
    }
}
