//! Shopping cart: an ordered list of product lines.
//!
//! Lines are unique by product id. Each line gets a [`LineId`] when it is
//! created, and that id never changes or gets reused within the cart, so a
//! form that was rendered before another line was removed still addresses the
//! right row. Positional addressing is kept for callers that only know the row
//! index.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{CurrencyCode, LineId, Price, ProductId};

/// One product in the cart together with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: LineId,
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// How a cart operation addresses a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRef {
    /// Stable line identifier.
    Id(LineId),
    /// Zero-based position in the current line order.
    Position(usize),
}

/// Outcome of [`Cart::set_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now has the given quantity.
    Updated { line: LineId, quantity: u32 },
    /// A non-positive quantity removed the line.
    Removed(LineId),
    /// No line matched; the cart is unchanged.
    Missing,
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    #[serde(default)]
    next_line_id: u32,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when there are no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line holding `product_id`, if any.
    #[must_use]
    pub fn line_for(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == product_id)
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the product, otherwise appends a new
    /// line with quantity one. Returns the id of the affected line.
    pub fn add(&mut self, product: Product) -> LineId {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product.id == product.id)
        {
            line.quantity = line.quantity.saturating_add(1);
            return line.id;
        }

        let id = LineId::new(self.next_line_id);
        self.next_line_id = self.next_line_id.wrapping_add(1);
        self.lines.push(CartLine {
            id,
            product,
            quantity: 1,
        });
        id
    }

    /// Overwrite a line's quantity.
    ///
    /// A quantity of zero or less removes the line instead, so a line with a
    /// non-positive quantity can never exist. Quantities above `u32::MAX`
    /// saturate.
    pub fn set_quantity(&mut self, line: LineRef, quantity: i64) -> QuantityChange {
        let Some(position) = self.position(line) else {
            return QuantityChange::Missing;
        };

        if quantity <= 0 {
            let removed = self.lines.remove(position);
            return QuantityChange::Removed(removed.id);
        }

        let Some(entry) = self.lines.get_mut(position) else {
            return QuantityChange::Missing;
        };
        entry.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        QuantityChange::Updated {
            line: entry.id,
            quantity: entry.quantity,
        }
    }

    /// Drop a line. Remaining lines keep their relative order.
    pub fn remove(&mut self, line: LineRef) -> Option<CartLine> {
        let position = self.position(line)?;
        Some(self.lines.remove(position))
    }

    /// Remove every line. Line ids keep counting so stale forms never match a
    /// new line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of price times quantity over all lines, in `currency`.
    #[must_use]
    pub fn total(&self, currency: CurrencyCode) -> Price {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .fold(Price::zero(currency), Price::plus)
    }

    fn position(&self, line: LineRef) -> Option<usize> {
        match line {
            LineRef::Id(id) => self.lines.iter().position(|entry| entry.id == id),
            LineRef::Position(index) => (index < self.lines.len()).then_some(index),
        }
    }
}
