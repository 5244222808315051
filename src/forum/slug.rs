use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::SqlitePool;

use crate::error::Result;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Derive a URL slug from a thread subject: lowercased, with runs of
/// non-alphanumeric characters collapsed to single dashes.
#[must_use]
pub fn slugify(subject: &str) -> String {
    let lowered = subject.to_lowercase();
    let slug = NON_ALNUM.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        "thread".to_string()
    } else {
        slug.to_string()
    }
}

/// Derive a slug from `subject` that no existing thread uses, probing the
/// unique `threads.slug` column and suffixing `-2`, `-3`, ... until free.
///
/// # Errors
///
/// Returns an error if the lookup fails.
pub async fn unique_slug(pool: &SqlitePool, subject: &str) -> Result<String> {
    let base = slugify(subject);
    let mut candidate = base.clone();
    let mut suffix = 2u32;

    loop {
        let taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM threads WHERE slug = ?")
            .bind(&candidate)
            .fetch_optional(pool)
            .await?;

        if taken.is_none() {
            return Ok(candidate);
        }

        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_dashes() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("How do I use sqlx?"), "how-do-i-use-sqlx");
    }

    #[test]
    fn collapses_punctuation_runs() {
        assert_eq!(slugify("a -- b ?? c"), "a-b-c");
    }

    #[test]
    fn trims_leading_and_trailing_dashes() {
        assert_eq!(slugify("!!important!!"), "important");
    }

    #[test]
    fn empty_subjects_fall_back() {
        assert_eq!(slugify(""), "thread");
        assert_eq!(slugify("???"), "thread");
    }
}
