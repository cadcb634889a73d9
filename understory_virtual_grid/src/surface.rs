// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Choosing which element's scroll position drives the window.
//!
//! A page-level grid scrolls with the document, but which element reports
//! that scroll differs between platforms: on many touch browsers the body
//! scrolls while the root element stays at zero, elsewhere it is the reverse.
//! The choice is re-made for every scroll event because scrollability changes
//! as content loads.

/// Scroll state reported by one candidate scroll surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Current scroll offset along the block axis.
    pub scroll_offset: f64,
    /// Height of the visible part of the surface.
    pub client_extent: f64,
    /// Height of the surface's full scrollable content.
    pub scroll_extent: f64,
}

impl ScrollMetrics {
    /// Creates metrics from offset, visible extent, and content extent.
    #[must_use]
    pub const fn new(scroll_offset: f64, client_extent: f64, scroll_extent: f64) -> Self {
        Self {
            scroll_offset,
            client_extent,
            scroll_extent,
        }
    }

    /// Returns `true` if the content overflows the visible extent.
    #[must_use]
    pub fn has_overflow(&self) -> bool {
        self.scroll_extent > self.client_extent
    }
}

/// Which candidate surface is scrolling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollSurface {
    /// The root document element.
    #[default]
    Root,
    /// The body element.
    Body,
}

impl ScrollSurface {
    /// Returns the metrics belonging to this surface.
    #[must_use]
    pub const fn pick<'a>(
        self,
        root: &'a ScrollMetrics,
        body: &'a ScrollMetrics,
    ) -> &'a ScrollMetrics {
        match self {
            Self::Root => root,
            Self::Body => body,
        }
    }
}

/// Picks the surface that actually scrolls.
///
/// The root element wins if it is scrolled away from zero or its content
/// overflows; otherwise the body is used. Only the root's metrics take part
/// in the decision.
#[must_use]
pub fn select_scroll_surface(root: &ScrollMetrics) -> ScrollSurface {
    if root.scroll_offset != 0.0 || root.has_overflow() {
        ScrollSurface::Root
    } else {
        ScrollSurface::Body
    }
}

#[cfg(test)]
mod tests {
    use super::{ScrollMetrics, ScrollSurface, select_scroll_surface};

    #[test]
    fn scrolled_root_wins() {
        let root = ScrollMetrics::new(120.0, 800.0, 800.0);
        assert_eq!(select_scroll_surface(&root), ScrollSurface::Root);
    }

    #[test]
    fn overflowing_root_wins_at_zero() {
        let root = ScrollMetrics::new(0.0, 800.0, 4000.0);
        assert_eq!(select_scroll_surface(&root), ScrollSurface::Root);
    }

    #[test]
    fn body_scrolls_when_root_is_static() {
        // Typical mobile layout: the body carries the overflow.
        let root = ScrollMetrics::new(0.0, 800.0, 800.0);
        let body = ScrollMetrics::new(350.0, 800.0, 4000.0);
        let surface = select_scroll_surface(&root);
        assert_eq!(surface, ScrollSurface::Body);
        assert_eq!(surface.pick(&root, &body).scroll_offset, 350.0);
    }
}
