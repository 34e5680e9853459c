use std::collections::HashMap;

use nfo_core::NfoOptions;

/// Element name used for a provider's flat id tag: `Tvdb` → `tvdbid`.
pub fn provider_tag(provider: &str) -> String {
    format!("{}id", provider.to_ascii_lowercase())
}

/// Immutable `<provider>id` tag lookup, built once per parse or save.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    by_tag: HashMap<String, String>,
}

impl ProviderRegistry {
    pub fn new<I, S>(providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let by_tag = providers
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .map(|p| (provider_tag(&p), p))
            .collect();
        Self { by_tag }
    }

    pub fn from_options(options: &NfoOptions) -> Self {
        Self::new(&options.providers)
    }

    /// Provider name for an element such as `tmdbid`.
    pub fn provider_for_tag(&self, tag: &str) -> Option<&str> {
        self.by_tag
            .get(&tag.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Registered spelling of a provider name, e.g. `IMDB` → `Imdb`.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.provider_for_tag(&provider_tag(name))
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_map_to_provider_names() {
        let registry = ProviderRegistry::from_options(&NfoOptions::default());
        assert_eq!(registry.provider_for_tag("tvdbid"), Some("Tvdb"));
        assert_eq!(registry.provider_for_tag("TMDBID"), Some("Tmdb"));
        assert_eq!(registry.provider_for_tag("tmdbcollectionid"), Some("TmdbCollection"));
        assert_eq!(registry.provider_for_tag("id"), None);
        assert_eq!(registry.canonical_name("IMDB"), Some("Imdb"));
        assert_eq!(registry.canonical_name("Trakt"), None);
    }

    #[test]
    fn custom_provider_list() {
        let registry = ProviderRegistry::new(["Trakt", " ", "AniDb"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.provider_for_tag("anidbid"), Some("AniDb"));
        assert_eq!(registry.provider_for_tag("imdbid"), None);
    }
}
