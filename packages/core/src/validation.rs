use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Maximum length of a post title, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Maximum length of a free-text author display name, in characters.
pub const MAX_AUTHOR_LEN: usize = 100;

/// Errors returned when user input fails validation.
///
/// The `Display` text is sent to clients verbatim as the error message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    EmptyTitle,

    #[error("title must be at most {MAX_TITLE_LEN} characters")]
    TitleTooLong,

    #[error("content is required")]
    EmptyContent,

    #[error("author must be at most {MAX_AUTHOR_LEN} characters")]
    AuthorTooLong,

    #[error("username must be 3-32 characters of letters, digits, '_', '.' or '-'")]
    InvalidUsername,

    #[error("password is required")]
    EmptyPassword,
}

/// Validate the fields of a new post.
pub fn validate_post(
    title: &str,
    content: &str,
    author: Option<&str>,
) -> Result<(), ValidationError> {
    validate_title(title)?;
    validate_content(content)?;
    validate_author(author)
}

/// Validate the fields of a new comment.
pub fn validate_comment(content: &str, author: Option<&str>) -> Result<(), ValidationError> {
    validate_content(content)?;
    validate_author(author)
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    Ok(())
}

fn validate_author(author: Option<&str>) -> Result<(), ValidationError> {
    match author {
        Some(a) if a.chars().count() > MAX_AUTHOR_LEN => Err(ValidationError::AuthorTooLong),
        _ => Ok(()),
    }
}

/// Validate registration credentials.
///
/// Passwords are only required to be non-empty; strength policy is out of
/// scope.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), ValidationError> {
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::InvalidUsername);
    }
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    Ok(())
}

/// `^[A-Za-z0-9_.-]{3,32}$`
static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]{3,32}$").expect("invalid username regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_post_passes() {
        assert!(validate_post("Hi", "World", None).is_ok());
    }

    #[test]
    fn blank_title_rejected() {
        assert_eq!(
            validate_post("   ", "World", None),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn blank_content_rejected() {
        assert_eq!(
            validate_post("Hi", "\n\t", None),
            Err(ValidationError::EmptyContent)
        );
    }

    #[test]
    fn long_title_rejected() {
        let title = "x".repeat(MAX_TITLE_LEN + 1);
        assert_eq!(
            validate_post(&title, "c", None),
            Err(ValidationError::TitleTooLong)
        );
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        let title = "é".repeat(MAX_TITLE_LEN);
        assert!(validate_title(&title).is_ok());
    }

    #[test]
    fn long_author_rejected() {
        let author = "a".repeat(MAX_AUTHOR_LEN + 1);
        assert_eq!(
            validate_comment("c", Some(&author)),
            Err(ValidationError::AuthorTooLong)
        );
    }

    #[test]
    fn usernames() {
        assert!(validate_credentials("alice", "pw123").is_ok());
        assert!(validate_credentials("a.b-c_d", "pw").is_ok());
        assert_eq!(
            validate_credentials("al", "pw"),
            Err(ValidationError::InvalidUsername)
        );
        assert_eq!(
            validate_credentials("alice smith", "pw"),
            Err(ValidationError::InvalidUsername)
        );
        assert_eq!(
            validate_credentials("alice", ""),
            Err(ValidationError::EmptyPassword)
        );
    }
}
