/// Case-insensitive substring test used by every name lookup.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Like `contains_ignore_case`, but a missing name never matches.
pub fn name_matches(name: Option<&str>, needle: &str) -> bool {
    name.is_some_and(|n| contains_ignore_case(n, needle))
}

/// Resolves a partial name against `(key, name)` candidates.
///
/// The first candidate whose name contains `query` wins. There is no
/// relevance ranking, so "Murray" resolves to whichever Murray the table
/// lists first; pass a fuller name to disambiguate.
pub struct NameResolver {
    needle: String,
}

impl NameResolver {
    pub fn new(query: &str) -> Self {
        NameResolver {
            needle: query.to_lowercase(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.needle)
    }

    pub fn resolve<'a, K, I>(&self, candidates: I) -> Option<(K, &'a str)>
    where
        I: IntoIterator<Item = (K, &'a str)>,
    {
        candidates.into_iter().find(|(_, name)| self.matches(name))
    }
}

pub fn resolve<'a, K, I>(candidates: I, query: &str) -> Option<(K, &'a str)>
where
    I: IntoIterator<Item = (K, &'a str)>,
{
    NameResolver::new(query).resolve(candidates)
}
