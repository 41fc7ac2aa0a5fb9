//! Data every page template needs for the shared layout.

use pulsepack_core::{Page, StoreState};

/// Header and footer data for `base.html`.
#[derive(Clone)]
pub struct Layout {
    /// Slug of the active page, for nav highlighting.
    pub active: &'static str,
    /// Units in the cart, shown on the cart badge.
    pub cart_count: u64,
    /// Display name of the signed-in visitor.
    pub user_name: Option<String>,
    /// Only the home view carries the footer.
    pub show_footer: bool,
    /// Page titles in the nav, in order.
    pub nav: Vec<NavLink>,
}

/// One navigation target.
#[derive(Clone)]
pub struct NavLink {
    pub slug: &'static str,
    pub label: &'static str,
}

const NAV: [(Page, &str); 3] = [
    (Page::Home, "Home"),
    (Page::AllPacks, "All Packs"),
    (Page::Cart, "Cart"),
];

impl Layout {
    /// Layout for the visitor's current page.
    #[must_use]
    pub fn for_store(store: &StoreState) -> Self {
        Self::for_page(store, store.page)
    }

    /// Layout for a view outside the page switch, shown as if `page` were
    /// active.
    #[must_use]
    pub fn for_page(store: &StoreState, page: Page) -> Self {
        Self {
            active: page.slug(),
            cart_count: store.item_count(),
            user_name: store.session.profile().map(|p| p.name.clone()),
            show_footer: page.shows_footer(),
            nav: NAV
                .iter()
                .map(|&(page, label)| NavLink {
                    slug: page.slug(),
                    label,
                })
                .collect(),
        }
    }
}
