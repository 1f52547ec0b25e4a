//! Abstractions for offset-based pagination.

/// Pagination arguments.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Arguments {
    /// 1-based number of the requested page.
    pub page: u32,

    /// Maximum number of items on the requested page.
    pub limit: u32,

    /// [`Order`] of items on the requested page.
    pub order: Order,
}

impl Arguments {
    /// Default [`Arguments::limit`].
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Maximum allowed [`Arguments::limit`].
    pub const MAX_LIMIT: u32 = 100;

    /// Creates new [`Arguments`], substituting defaults and clamping the
    /// `limit` into its allowed range.
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>, order: Order) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            order,
        }
    }

    /// Returns the number of items preceding the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self::new(None, None, Order::Descending)
    }
}

/// Single page of `I` items along with the pagination totals.
#[derive(Clone, Debug)]
pub struct Page<I> {
    /// Items on this [`Page`].
    pub items: Vec<I>,

    /// Total number of items across all pages.
    pub total: u64,

    /// 1-based number of this [`Page`].
    pub page: u32,

    /// Maximum number of items on this [`Page`].
    pub limit: u32,
}

impl<I> Page<I> {
    /// Creates a new [`Page`] out of the selected items and the total count.
    #[must_use]
    pub fn new(args: &Arguments, items: Vec<I>, total: u64) -> Self {
        Self {
            items,
            total,
            page: args.page,
            limit: args.limit,
        }
    }

    /// Returns the total number of pages.
    #[must_use]
    pub fn pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.limit))
    }

    /// Maps items of this [`Page`] with the provided function.
    #[must_use]
    pub fn map<T>(self, f: impl FnMut(I) -> T) -> Page<T> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Order of items on a [`Page`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    Ascending,

    /// Descending order.
    #[default]
    Descending,
}

impl Order {
    #[cfg(feature = "postgres")]
    /// Returns SQL operator representing this [`Order`].
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

#[cfg(test)]
mod spec {
    use super::{Arguments, Order, Page};

    #[test]
    fn clamps_arguments() {
        let args = Arguments::new(None, None, Order::Descending);
        assert_eq!(args.page, 1);
        assert_eq!(args.limit, Arguments::DEFAULT_LIMIT);
        assert_eq!(args.offset(), 0);

        let args = Arguments::new(Some(0), Some(0), Order::Descending);
        assert_eq!(args.page, 1);
        assert_eq!(args.limit, 1);

        let args = Arguments::new(Some(3), Some(1000), Order::Ascending);
        assert_eq!(args.limit, Arguments::MAX_LIMIT);
        assert_eq!(args.offset(), 200);
    }

    #[test]
    fn counts_pages() {
        let args = Arguments::new(Some(1), Some(10), Order::Descending);

        let page = Page::new(&args, vec![1, 2, 3], 21);
        assert_eq!(page.pages(), 3);

        let page = Page::new(&args, vec![1], 20);
        assert_eq!(page.pages(), 2);

        let page = Page::new(&args, Vec::<u8>::new(), 0);
        assert_eq!(page.pages(), 0);
    }
}
