use serde::Deserialize;

/// Include/exclude keyword lists, matched case-insensitively as substrings.
///
/// Keywords are trimmed and lowercased once on construction. Blank keywords
/// are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "KeywordLists")]
pub struct KeywordPolicy {
    include: Vec<String>,
    exclude: Vec<String>,
}

#[derive(Deserialize)]
struct KeywordLists {
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
}

impl From<KeywordLists> for KeywordPolicy {
    fn from(lists: KeywordLists) -> Self {
        Self::new(lists.include, lists.exclude)
    }
}

impl KeywordPolicy {
    pub fn new<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            include: fold_keywords(include),
            exclude: fold_keywords(exclude),
        }
    }

    /// Lowercased include keywords
    pub fn include(&self) -> &[String] {
        &self.include
    }

    /// Lowercased exclude keywords
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }
}

fn fold_keywords<T>(keywords: T) -> Vec<String>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Decide whether an item passes the keyword policy.
///
/// Any exclude hit rejects the item, even when include keywords also match.
/// Otherwise at least one include keyword must match: the include list is an
/// allow-list, so an empty include list rejects everything.
pub fn is_relevant(title: &str, summary: &str, policy: &KeywordPolicy) -> bool {
    let text = format!("{} {}", title, summary).to_lowercase();

    if policy.exclude.iter().any(|kw| text.contains(kw.as_str())) {
        return false;
    }

    policy.include.iter().any(|kw| text.contains(kw.as_str()))
}
