//! Top-level page selection.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The view rendered at the storefront root. There is no history stack:
/// going back is just selecting a page again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Home,
    Login,
    Signup,
    Cart,
    Payment,
    ThankYou,
    AllPacks,
}

impl Page {
    /// Every page, in navigation-bar order.
    pub const ALL: [Self; 7] = [
        Self::Home,
        Self::AllPacks,
        Self::Cart,
        Self::Login,
        Self::Signup,
        Self::Payment,
        Self::ThankYou,
    ];

    /// URL-safe slug used by navigation forms.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Cart => "cart",
            Self::Payment => "payment",
            Self::ThankYou => "thank-you",
            Self::AllPacks => "all-packs",
        }
    }

    /// Page for a slug. Anything unrecognized selects the home view.
    #[must_use]
    pub fn from_slug(slug: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|page| page.slug() == slug.trim())
            .unwrap_or_default()
    }

    /// Whether the site footer is shown on this page.
    #[must_use]
    pub const fn shows_footer(self) -> bool {
        matches!(self, Self::Home)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_mapping_is_bijective() {
        for page in Page::ALL {
            assert_eq!(Page::from_slug(page.slug()), page);
        }
    }

    #[test]
    fn test_unknown_slug_selects_home() {
        assert_eq!(Page::from_slug("checkout-v2"), Page::Home);
        assert_eq!(Page::from_slug(""), Page::Home);
    }

    #[test]
    fn test_only_home_shows_footer() {
        let with_footer: Vec<Page> = Page::ALL.into_iter().filter(|p| p.shows_footer()).collect();
        assert_eq!(with_footer, vec![Page::Home]);
    }
}
