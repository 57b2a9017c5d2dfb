use kissj_domain::Locale;
use std::str::FromStr;

/// Picks the UI locale for a request from its `Accept-Language` header.
///
/// Only the primary subtag is compared (`cs-CZ` matches `cs`). Ranges are tried by
/// descending quality; `q=0` ranges and `*` never match. Anything unresolvable yields
/// the default locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleResolver {
    default: Locale,
}

impl LocaleResolver {
    pub const fn new(default: Locale) -> Self {
        Self { default }
    }

    pub const fn default_locale(&self) -> Locale {
        self.default
    }

    pub fn resolve(&self, accept_language: Option<&str>) -> Locale {
        let Some(header) = accept_language else {
            return self.default;
        };

        let mut ranges: Vec<(f32, &str)> = header.split(',').filter_map(parse_range).collect();
        // stable: equal weights keep header order
        ranges.sort_by(|a, b| b.0.total_cmp(&a.0));

        ranges
            .into_iter()
            .find_map(|(_, tag)| {
                let primary = tag.split('-').next().unwrap_or(tag);
                Locale::from_str(&primary.to_ascii_lowercase()).ok()
            })
            .unwrap_or(self.default)
    }
}

fn parse_range(range: &str) -> Option<(f32, &str)> {
    let mut parts = range.split(';').map(str::trim);
    let tag = parts.next().filter(|t| !t.is_empty() && *t != "*")?;

    let mut quality = 1.0;
    for param in parts {
        if let Some(q) = param.strip_prefix("q=").or_else(|| param.strip_prefix("Q=")) {
            quality = q.trim().parse::<f32>().ok()?;
        }
    }

    (quality > 0.0).then_some((quality, tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highest_quality_supported_language_wins() {
        let resolver = LocaleResolver::new(Locale::En);
        assert_eq!(resolver.resolve(Some("de-DE,sk;q=0.7,cs-CZ;q=0.9")), Locale::Cs);
        assert_eq!(resolver.resolve(Some("SK")), Locale::Sk);
    }

    #[test]
    fn equal_weights_keep_header_order() {
        let resolver = LocaleResolver::new(Locale::En);
        assert_eq!(resolver.resolve(Some("sk, cs")), Locale::Sk);
    }

    #[test]
    fn rejected_or_unknown_ranges_fall_back_to_default() {
        let resolver = LocaleResolver::new(Locale::Cs);
        assert_eq!(resolver.resolve(None), Locale::Cs);
        assert_eq!(resolver.resolve(Some("")), Locale::Cs);
        assert_eq!(resolver.resolve(Some("*")), Locale::Cs);
        assert_eq!(resolver.resolve(Some("en;q=0, de")), Locale::Cs);
        assert_eq!(resolver.resolve(Some("en;q=abc")), Locale::Cs);
    }
}
