use tracing::warn;

use super::app_error::AppError;

pub const MAX_CONTENT_CHARS: usize = 280;

pub fn check_post_content(content: &str) -> Result<(), AppError> {
    check_content(content, "post")
}

pub fn check_comment_content(content: &str) -> Result<(), AppError> {
    check_content(content, "comment")
}

fn check_content(content: &str, what: &str) -> Result<(), AppError> {
    if content.is_empty() {
        warn!("Rejected {what} with empty content");
        return Err(AppError::validation(
            "Content must be between 1 and 280 characters.",
        ));
    }

    let chars = content.chars().count();
    if chars > MAX_CONTENT_CHARS {
        warn!("Rejected {what} with a content of {chars}/{MAX_CONTENT_CHARS} characters");
        return Err(AppError::validation(
            "Content must be between 1 and 280 characters.",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::utils::app_error::AppError;

    #[test]
    fn empty_content_is_rejected() {
        let error = check_post_content("").unwrap_err();
        assert_eq!(
            error,
            AppError::validation("Content must be between 1 and 280 characters.")
        );
    }

    #[test]
    fn content_at_the_bounds_is_accepted() {
        assert!(check_post_content("a").is_ok());
        assert!(check_post_content(&"x".repeat(MAX_CONTENT_CHARS)).is_ok());
        assert!(check_comment_content(&"x".repeat(MAX_CONTENT_CHARS)).is_ok());
    }

    #[test]
    fn content_over_the_limit_is_rejected() {
        assert!(check_post_content(&"x".repeat(MAX_CONTENT_CHARS + 1)).is_err());
        assert!(check_comment_content(&"x".repeat(MAX_CONTENT_CHARS + 1)).is_err());
    }

    #[test]
    fn length_is_counted_in_characters_not_bytes() {
        // 280 multi-byte characters, more than 280 bytes.
        assert!(check_post_content(&"é".repeat(MAX_CONTENT_CHARS)).is_ok());
    }
}
