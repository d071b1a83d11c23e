use super::ApiError;

pub fn validate_entity_id(kind: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            kind, id
        )));
    }
    Ok(id)
}

pub fn validate_required(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

pub fn validate_search_term(term: &str) -> Result<&str, ApiError> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Search term cannot be empty"));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_entity_id() {
        assert!(validate_entity_id("venue", 1).is_ok());
        assert!(validate_entity_id("venue", 12345).is_ok());
        assert!(validate_entity_id("artist", 0).is_err());
        assert!(validate_entity_id("artist", -1).is_err());
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("name", "The Musical Hop").is_ok());
        assert!(validate_required("name", "").is_err());
        assert!(validate_required("city", "   ").is_err());
    }

    #[test]
    fn test_validate_search_term() {
        assert!(validate_search_term("Hop").is_ok());
        assert_eq!(validate_search_term("  trimmed  ").unwrap(), "trimmed");
        assert!(validate_search_term("").is_err());
        assert!(validate_search_term("   ").is_err());
    }
}
