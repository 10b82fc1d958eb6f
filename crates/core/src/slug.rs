//! Slug rules for paths, modules and lessons.
//!
//! Path slugs are globally unique, module slugs are unique within their
//! path and lesson slugs within their module. Uniqueness is enforced by the
//! database; this module only checks the format.

/// Maximum length of a slug.
pub const MAX_SLUG_LENGTH: usize = 200;

/// Maximum length of a path, module or lesson title. Typed for
/// `#[validate(length(max = ..))]`, which takes `u64` bounds.
pub const MAX_TITLE_LENGTH: u64 = 200;

/// Validate slug format: `[a-z0-9-]`, 1..=200 chars, no leading/trailing `-`.
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("Slug must not be empty".to_string());
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(format!(
            "Slug must be at most {MAX_SLUG_LENGTH} characters, got {}",
            slug.len()
        ));
    }
    if let Some(bad) = slug
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(format!("Slug contains invalid character '{bad}'"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err("Slug must not start or end with '-'".to_string());
    }
    Ok(())
}

/// `validator` adapter for [`validate_slug`], used by `#[validate(custom)]`.
pub fn slug_rule(slug: &str) -> Result<(), validator::ValidationError> {
    validate_slug(slug).map_err(|msg| {
        let mut err = validator::ValidationError::new("slug_format");
        err.message = Some(msg.into());
        err
    })
}

/// Slug for a duplicated path: `{slug}-copy-{stamp}`, with `-{attempt}`
/// appended on retries. Truncates the base so the result stays in bounds.
pub fn copy_slug(base: &str, stamp: i64, attempt: u32) -> String {
    let suffix = if attempt == 0 {
        format!("-copy-{stamp}")
    } else {
        format!("-copy-{stamp}-{attempt}")
    };
    let keep = MAX_SLUG_LENGTH.saturating_sub(suffix.len()).min(base.len());
    let trimmed = base[..keep].trim_end_matches('-');
    format!("{trimmed}{suffix}")
}

/// Title for a duplicated path.
pub fn copy_title(title: &str) -> String {
    format!("{title} (Copy)")
}
