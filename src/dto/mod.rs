pub mod application_dto;
pub mod attendance_dto;
pub mod calendar_dto;
pub mod dashboard_dto;
pub mod hackathon_dto;
pub mod import_dto;
pub mod note_dto;
pub mod project_dto;
pub mod subject_dto;
pub mod task_dto;

use serde::Deserialize;

/// Trims a string and maps blank input to `None`, so form clients can send
/// `""` for an unset reference.
pub(crate) fn trim_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`), so PATCH bodies can clear optional dates.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
