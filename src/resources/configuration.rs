//! Resource folder configurations (`values-de-rDE-land-v21`)

use serde::Serialize;
use std::fmt;

/// A language with an optional region, e.g. `de` / `de-rDE` / `b+sr+Latn`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Locale {
    pub language: String,
    pub region: Option<String>,
    pub script: Option<String>,
}

impl Locale {
    /// Tag as printed in messages: `de`, `de-rDE`, `b+sr+Latn`
    pub fn tag(&self) -> String {
        match (&self.script, &self.region) {
            (Some(script), region) => {
                let mut tag = format!("b+{}+{}", self.language, script);
                if let Some(region) = region {
                    tag.push('+');
                    tag.push_str(region);
                }
                tag
            }
            (None, Some(region)) => format!("{}-r{}", self.language, region),
            (None, None) => self.language.clone(),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One qualifier dimension; the variant order is the Android qualifier order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Dimension {
    Locale,
    LayoutDirection,
    SmallestWidth,
    Width,
    Height,
    ScreenSize,
    Orientation,
    UiMode,
    NightMode,
    Density,
    ApiLevel,
    Other,
}

/// Qualifiers of a resource folder; the default configuration has none
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FolderConfiguration {
    locale: Option<Locale>,
    /// Non-locale qualifiers as written, sorted by dimension
    qualifiers: Vec<(Dimension, String)>,
}

impl FolderConfiguration {
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Parse a folder name such as `values-de-rDE` or `layout-land`; the
    /// leading resource type segment is skipped.
    pub fn from_folder_name(folder: &str) -> Self {
        let mut segments = folder.split('-');
        segments.next();
        Self::from_qualifiers(segments)
    }

    pub fn from_qualifiers<'a>(segments: impl IntoIterator<Item = &'a str>) -> Self {
        let mut config = Self::default();
        let segments: Vec<&str> = segments.into_iter().filter(|s| !s.is_empty()).collect();
        let mut i = 0;
        while i < segments.len() {
            let segment = segments[i];
            if config.locale.is_none() {
                if let Some(locale) = parse_bcp47(segment) {
                    config.locale = Some(locale);
                    i += 1;
                    continue;
                }
                if is_language(segment) {
                    let region = segments
                        .get(i + 1)
                        .and_then(|next| parse_region(next));
                    if region.is_some() {
                        i += 1;
                    }
                    config.locale = Some(Locale {
                        language: segment.to_string(),
                        region,
                        script: None,
                    });
                    i += 1;
                    continue;
                }
            }
            config
                .qualifiers
                .push((classify(segment), segment.to_string()));
            i += 1;
        }
        config.qualifiers.sort();
        config
    }

    pub fn is_default(&self) -> bool {
        self.locale.is_none() && self.qualifiers.is_empty()
    }

    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    pub fn qualifier(&self, dimension: Dimension) -> Option<&str> {
        self.qualifiers
            .iter()
            .find(|(d, _)| *d == dimension)
            .map(|(_, q)| q.as_str())
    }

    /// Same configuration without its locale
    pub fn without_locale(&self) -> Self {
        Self {
            locale: None,
            qualifiers: self.qualifiers.clone(),
        }
    }

    /// Number of qualifiers, used to rank best matches
    pub fn specificity(&self) -> usize {
        usize::from(self.locale.is_some()) + self.qualifiers.len()
    }

    /// Every qualifier of `self` is also present in `query`
    pub fn matches(&self, query: &FolderConfiguration) -> bool {
        let locale_ok = match (&self.locale, &query.locale) {
            (None, _) => true,
            (Some(mine), Some(theirs)) => {
                mine.language == theirs.language
                    && (mine.region.is_none() || mine.region == theirs.region)
                    && (mine.script.is_none() || mine.script == theirs.script)
            }
            (Some(_), None) => false,
        };
        locale_ok && self.qualifiers.iter().all(|q| query.qualifiers.contains(q))
    }

    /// No dimension is set to different values in the two configurations
    pub fn is_compatible(&self, other: &FolderConfiguration) -> bool {
        let locale_ok = match (&self.locale, &other.locale) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        locale_ok
            && self.qualifiers.iter().all(|(dimension, value)| {
                *dimension == Dimension::Other
                    || other
                        .qualifier(*dimension)
                        .map_or(true, |theirs| theirs == value)
            })
    }

    /// Union of two compatible configurations
    pub fn merged(&self, other: &FolderConfiguration) -> Self {
        let mut merged = self.clone();
        if merged.locale.is_none() {
            merged.locale = other.locale.clone();
        }
        for qualifier in &other.qualifiers {
            if !merged.qualifiers.contains(qualifier)
                && (qualifier.0 == Dimension::Other || merged.qualifier(qualifier.0).is_none())
            {
                merged.qualifiers.push(qualifier.clone());
            }
        }
        merged.qualifiers.sort();
        merged
    }

    /// Qualifier suffix as written in folder names, empty for the default
    pub fn qualifier_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(locale) = &self.locale {
            parts.push(locale.tag());
        }
        parts.extend(self.qualifiers.iter().map(|(_, q)| q.clone()));
        parts.join("-")
    }
}

impl fmt::Display for FolderConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            write!(f, "default")
        } else {
            write!(f, "{}", self.qualifier_string())
        }
    }
}

fn is_language(segment: &str) -> bool {
    (2..=3).contains(&segment.len()) && segment.chars().all(|c| c.is_ascii_lowercase())
        && !matches!(segment, "ldrtl" | "ldltr" | "car" | "tv")
}

fn parse_region(segment: &str) -> Option<String> {
    let region = segment.strip_prefix('r')?;
    let valid = (region.len() == 2 && region.chars().all(|c| c.is_ascii_uppercase()))
        || (region.len() == 3 && region.chars().all(|c| c.is_ascii_digit()));
    valid.then(|| region.to_string())
}

fn parse_bcp47(segment: &str) -> Option<Locale> {
    let rest = segment.strip_prefix("b+")?;
    let mut parts = rest.split('+');
    let language = parts.next()?.to_ascii_lowercase();
    let mut script = None;
    let mut region = None;
    for part in parts {
        if part.len() == 4 {
            script = Some(part.to_string());
        } else {
            region = Some(part.to_ascii_uppercase());
        }
    }
    Some(Locale {
        language,
        region,
        script,
    })
}

fn classify(segment: &str) -> Dimension {
    let numeric_after = |prefix: &str, suffix: &str| {
        segment
            .strip_prefix(prefix)
            .and_then(|s| s.strip_suffix(suffix))
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    };
    match segment {
        "ldrtl" | "ldltr" => Dimension::LayoutDirection,
        "small" | "normal" | "large" | "xlarge" => Dimension::ScreenSize,
        "port" | "land" | "square" => Dimension::Orientation,
        "car" | "desk" | "television" | "appliance" | "watch" | "vrheadset" => Dimension::UiMode,
        "night" | "notnight" => Dimension::NightMode,
        "ldpi" | "mdpi" | "tvdpi" | "hdpi" | "xhdpi" | "xxhdpi" | "xxxhdpi" | "nodpi" | "anydpi" => {
            Dimension::Density
        }
        _ if numeric_after("sw", "dp") => Dimension::SmallestWidth,
        _ if numeric_after("w", "dp") => Dimension::Width,
        _ if numeric_after("h", "dp") => Dimension::Height,
        _ if numeric_after("", "dpi") => Dimension::Density,
        _ if numeric_after("v", "") => Dimension::ApiLevel,
        _ => Dimension::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale_and_region() {
        let config = FolderConfiguration::from_folder_name("values-de-rDE");
        let locale = config.locale().unwrap();
        assert_eq!(locale.language, "de");
        assert_eq!(locale.region.as_deref(), Some("DE"));
        assert_eq!(locale.tag(), "de-rDE");
    }

    #[test]
    fn test_parse_bcp47() {
        let config = FolderConfiguration::from_folder_name("values-b+sr+Latn");
        assert_eq!(config.locale().unwrap().tag(), "b+sr+Latn");
    }

    #[test]
    fn test_parse_qualifiers() {
        let config = FolderConfiguration::from_folder_name("values-land-v21");
        assert!(config.locale().is_none());
        assert_eq!(config.qualifier(Dimension::Orientation), Some("land"));
        assert_eq!(config.qualifier(Dimension::ApiLevel), Some("v21"));
        assert_eq!(config.specificity(), 2);
        assert!(FolderConfiguration::from_folder_name("values").is_default());
    }

    #[test]
    fn test_matches_and_compatibility() {
        let base = FolderConfiguration::default();
        let land = FolderConfiguration::from_folder_name("values-land");
        let port = FolderConfiguration::from_folder_name("layout-port");
        let de_land = FolderConfiguration::from_folder_name("values-de-land");

        assert!(base.matches(&land));
        assert!(land.matches(&de_land));
        assert!(!de_land.matches(&land));
        assert!(!land.is_compatible(&port));
        assert!(land.is_compatible(&de_land));
        assert_eq!(land.merged(&FolderConfiguration::from_folder_name("values-de")), de_land);
    }

    #[test]
    fn test_region_matches_language_only_folder() {
        let de = FolderConfiguration::from_folder_name("values-de");
        let de_at = FolderConfiguration::from_folder_name("values-de-rAT");
        assert!(de.matches(&de_at));
        assert!(!de_at.matches(&de));
    }
}
