//! Slug derivation from post titles.
//!
//! A slug is built from `[a-z0-9-]` only, never starts or ends with `-` and
//! never contains `--`. Collisions are resolved by appending `-1`, `-2`, ...

use std::future::Future;

/// Base token used when a title normalizes to nothing.
pub const FALLBACK_SLUG: &str = "post";

/// Normalize a title into a URL-safe base slug.
///
/// Non-ASCII characters are transliterated, everything is lowercased and every
/// run of other characters collapses into a single `-`.
pub fn slugify(title: &str) -> String {
    let base = ::slug::slugify(title);
    if base.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        base
    }
}

/// Derive a slug for `title` that `exists` reports as free.
///
/// Tries the base slug first, then `base-1`, `base-2`, ... with a strictly
/// increasing suffix, so the search ends for any finite set of taken slugs.
/// Errors from `exists` are returned unchanged.
pub async fn generate_slug<F, Fut, E>(title: &str, mut exists: F) -> Result<String, E>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let base = slugify(title);
    if !exists(base.clone()).await? {
        return Ok(base);
    }

    let mut suffix: u64 = 1;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::convert::Infallible;

    async fn generate_against(title: &str, taken: &HashSet<String>) -> String {
        generate_slug(title, |candidate| {
            let hit = taken.contains(&candidate);
            async move { Ok::<_, Infallible>(hit) }
        })
        .await
        .unwrap()
    }

    fn is_url_safe(slug: &str) -> bool {
        !slug.is_empty()
            && !slug.starts_with('-')
            && !slug.ends_with('-')
            && !slug.contains("--")
            && slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Rust -- & Friends!!  "), "rust-friends");
        assert_eq!(slugify("Déjà Vu"), "deja-vu");
    }

    #[test]
    fn test_slugify_degenerate_titles_fall_back() {
        assert_eq!(slugify(""), FALLBACK_SLUG);
        assert_eq!(slugify("   "), FALLBACK_SLUG);
        assert_eq!(slugify("!!!"), FALLBACK_SLUG);
    }

    #[tokio::test]
    async fn test_free_base_is_returned() {
        let taken = HashSet::new();
        assert_eq!(generate_against("Hello World", &taken).await, "hello-world");
    }

    #[tokio::test]
    async fn test_collisions_get_numeric_suffix() {
        let taken: HashSet<String> = ["hello-world", "hello-world-1", "hello-world-2"]
            .into_iter()
            .map(String::from)
            .collect();

        let slug = generate_against("Hello World", &taken).await;
        assert_eq!(slug, "hello-world-3");
        assert!(!taken.contains(&slug));
        assert!(is_url_safe(&slug));
    }

    #[tokio::test]
    async fn test_generation_is_deterministic() {
        let taken: HashSet<String> = ["post", "post-1"].into_iter().map(String::from).collect();

        let first = generate_against("", &taken).await;
        let second = generate_against("", &taken).await;
        assert_eq!(first, "post-2");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_exists_error_is_surfaced() {
        let result = generate_slug("Anything", |_| async { Err::<bool, _>("storage down") }).await;
        assert_eq!(result, Err("storage down"));
    }

    #[tokio::test]
    async fn test_all_outputs_are_url_safe() {
        let taken: HashSet<String> = ["c-c", "c-c-1"].into_iter().map(String::from).collect();
        for title in ["C++ / C#", "Ünïcödé títle", "tabs\tand\nnewlines", "😀", "__x__"] {
            let slug = generate_against(title, &taken).await;
            assert!(is_url_safe(&slug), "unsafe slug {slug:?} for {title:?}");
        }
    }
}
