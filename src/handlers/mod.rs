pub mod projects;
pub mod tasks;

use uuid::Uuid;

use crate::error::ApiError;

/// Parse a client-supplied identifier. Empty after trim is a "missing"
/// client error, anything non-UUID is "invalid"; both are 400s.
pub(crate) fn parse_id(raw: &str, name: &str) -> Result<Uuid, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request(format!("Missing {}", name)));
    }
    Uuid::parse_str(trimmed).map_err(|_| ApiError::bad_request(format!("Invalid {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_is_missing() {
        let err = parse_id("  ", "projectId").unwrap_err();
        assert_eq!(err.message(), "Missing projectId");
    }

    #[test]
    fn malformed_id_is_invalid() {
        let err = parse_id("not-a-uuid", "id").unwrap_err();
        assert_eq!(err.message(), "Invalid id");
    }

    #[test]
    fn well_formed_id_parses() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "id").unwrap(), id);
    }
}
