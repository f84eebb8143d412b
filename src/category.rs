use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Labels understood by SponsorBlock instances, in display order.
pub const CATEGORIES: [&str; 6] = [
    "sponsor",
    "selfpromo",
    "intro",
    "outro",
    "interaction",
    "music_offtopic",
];

/// Why a segment is skippable.
///
/// Labels the crate doesn't know about are kept as [`Category::Other`] so they
/// survive a round trip through the fetcher, but they carry no display
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Sponsor,
    SelfPromo,
    Intro,
    Outro,
    Interaction,
    MusicOfftopic,
    Other(String),
}

impl Category {
    pub fn all() -> [Category; 6] {
        [
            Category::Sponsor,
            Category::SelfPromo,
            Category::Intro,
            Category::Outro,
            Category::Interaction,
            Category::MusicOfftopic,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Sponsor => "sponsor",
            Category::SelfPromo => "selfpromo",
            Category::Intro => "intro",
            Category::Outro => "outro",
            Category::Interaction => "interaction",
            Category::MusicOfftopic => "music_offtopic",
            Category::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }

    /// Short human-readable name.
    pub fn description(&self) -> Option<&'static str> {
        match self {
            Category::Sponsor => Some("Sponsor"),
            Category::SelfPromo => Some("Self-promotion"),
            Category::Intro => Some("Intro"),
            Category::Outro => Some("Outro"),
            Category::Interaction => Some("Interaction"),
            Category::MusicOfftopic => Some("Offtopic in Music Videos"),
            Category::Other(_) => None,
        }
    }

    /// Longer explanation of what the category covers.
    pub fn details(&self) -> Option<&'static str> {
        match self {
            Category::Sponsor => Some(
                "Part of a video promoting a product or service not directly related to the creator. \
                 The creator will receive payment or compensation in the form of money or free products.",
            ),
            Category::SelfPromo => Some(
                "Promoting a product or service that is directly related to the creator themselves. \
                 This usually includes merchandise or promotion of monetized platforms.",
            ),
            Category::Intro => Some(
                "Segments typically found at the start of a video that include an animation, \
                 still frame or clip which are also seen in other videos by the same creator.",
            ),
            Category::Outro => Some(
                "Typically near or at the end of the video when the credits pop up and/or endcards are shown.",
            ),
            Category::Interaction => Some(
                "Explicit reminders to like, subscribe or interact with them on any paid or free platform(s) \
                 (e.g. click on a video).",
            ),
            Category::MusicOfftopic => {
                Some("For videos which feature music as the primary content.")
            }
            Category::Other(_) => None,
        }
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        match name {
            "sponsor" => Category::Sponsor,
            "selfpromo" => Category::SelfPromo,
            "intro" => Category::Intro,
            "outro" => Category::Outro,
            "interaction" => Category::Interaction,
            "music_offtopic" => Category::MusicOfftopic,
            other => Category::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        match Category::from(name.as_str()) {
            Category::Other(_) => Category::Other(name),
            known => known,
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Category {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::from(s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn category_description(name: &str) -> Option<&'static str> {
    Category::from(name).description()
}

pub fn category_details(name: &str) -> Option<&'static str> {
    Category::from(name).details()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories_have_metadata() {
        for name in CATEGORIES {
            assert!(
                category_description(name).map_or(false, |d| !d.is_empty()),
                "{} has no description",
                name
            );
            assert!(category_details(name).is_some(), "{} has no details", name);
        }

        assert_eq!(category_description("sponsor"), Some("Sponsor"));
        assert_eq!(
            category_description("music_offtopic"),
            Some("Offtopic in Music Videos")
        );
    }

    #[test]
    fn unknown_category_has_no_metadata() {
        assert_eq!(category_description("not_a_category"), None);
        assert_eq!(category_details("not_a_category"), None);
        assert_eq!(category_description(""), None);
    }

    #[test]
    fn unknown_label_is_preserved() {
        let category: Category = serde_json::from_str(r#""filler""#).unwrap();
        assert_eq!(category, Category::Other("filler".into()));
        assert!(!category.is_known());
        assert_eq!(serde_json::to_string(&category).unwrap(), r#""filler""#);
    }

    #[test]
    fn all_matches_labels() {
        let labels: Vec<String> = Category::all().into_iter().map(String::from).collect();
        assert_eq!(labels, CATEGORIES);
        assert_eq!("selfpromo".parse::<Category>().unwrap(), Category::SelfPromo);
    }
}
