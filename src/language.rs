//! Language Tag Mapping
//!
//! Editors report document languages with their own identifiers. The
//! documentation site searches by its own slugs, which mostly agree with the
//! editor identifiers. Only the ones that differ are listed here; every other
//! identifier passes through unchanged.

/// Editor language identifier to documentation-site tag.
///
/// Mapped tags must never appear as keys so that mapping stays idempotent.
pub const LANGUAGE_TAGS: &[(&str, &str)] = &[("shellscript", "bash"), ("dockerfile", "docker")];

/// Map an editor language identifier to the documentation-site tag.
///
/// Absent (or empty) identifiers stay absent.
pub fn map_language(language_id: Option<&str>) -> Option<&str> {
    let language_id = language_id.filter(|id| !id.is_empty())?;
    let tag = LANGUAGE_TAGS
        .iter()
        .find(|(editor_id, _)| *editor_id == language_id)
        .map_or(language_id, |&(_, tag)| tag);
    Some(tag)
}
