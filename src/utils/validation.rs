use validator::ValidationError;

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

/// Rejects the task shape that names both a project and a hackathon.
pub fn ensure_single_context(
    project_id: Option<&str>,
    hackathon_id: Option<&str>,
) -> crate::error::Result<()> {
    if project_id.is_some() && hackathon_id.is_some() {
        return Err(crate::error::Error::InvariantViolation(
            "A task can belong to a project or a hackathon, not both".to_string(),
        ));
    }
    Ok(())
}
