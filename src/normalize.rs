//! Submission title to search query extraction.
//!
//! Post titles look like `Artist - Song [Official Video] (2019)`. The catalog
//! search works best on plain lowercase words, so bracketed spans and
//! punctuation are dropped and terms that confuse relevance (`feat`, `ft`) are
//! removed. Titles tagged with an ignored term (e.g. album posts) yield an
//! empty query, which means "do not search for this post".

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Bracketed or parenthesized spans, or any single non-word character.
static STRIP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*?\]|\(.*?\)|\W").expect("valid strip pattern"));

/// Turns submission titles into catalog search queries.
///
/// Both term lists are matched case-insensitively as plain substrings;
/// ambiguous terms usually carry surrounding spaces (`" ft "`) so they only
/// match whole words.
#[derive(Debug, Clone)]
pub struct TitleNormalizer {
    ignored_terms: Vec<String>,
    ambiguous_terms: Vec<String>,
}

impl TitleNormalizer {
    /// Creates a normalizer from the two term lists.
    ///
    /// # Arguments
    ///
    /// * `ignored_terms` - Titles containing any of these yield an empty query
    /// * `ambiguous_terms` - Terms cut out of the query before searching
    pub fn new<I, A>(ignored_terms: I, ambiguous_terms: A) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        Self {
            ignored_terms: lowercase_terms(ignored_terms),
            ambiguous_terms: lowercase_terms(ambiguous_terms),
        }
    }

    /// Returns the search query for a submission title, or an empty string if
    /// the post should be skipped.
    pub fn normalize(&self, title: &str) -> String {
        let stripped = STRIP_PATTERN.replace_all(&title.to_lowercase(), " ").into_owned();

        if self.is_ignored(&stripped) {
            debug!("ignoring submission \"{}\"", title);
            return String::new();
        }

        let mut extracted = stripped;
        // a removal can expose another match, e.g. " ft ft "
        while let Some(term) = self
            .ambiguous_terms
            .iter()
            .find(|term| extracted.contains(term.as_str()))
        {
            extracted = extracted.replace(term.as_str(), " ");
        }

        let extracted = extracted.split_whitespace().collect::<Vec<_>>().join(" ");
        if self.is_ignored(&extracted) {
            debug!("ignoring submission \"{}\"", title);
            return String::new();
        }

        debug!(
            "extracted song title \"{}\" from submission \"{}\"",
            extracted, title
        );
        extracted
    }

    fn is_ignored(&self, text: &str) -> bool {
        self.ignored_terms.iter().any(|term| text.contains(term.as_str()))
    }
}

fn lowercase_terms<T>(terms: T) -> Vec<String>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| t.as_ref().to_lowercase())
        .filter(|t| !t.trim().is_empty())
        .collect()
}
