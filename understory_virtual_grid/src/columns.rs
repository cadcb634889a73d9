// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Discovering the column count from the host's layout engine.
//!
//! Columns are not computed here. The host keeps a hidden, zero-height probe
//! element styled exactly like the real grid, and the layout engine's resolved
//! column template on that probe tells us how many columns the grid has. The
//! probe is sampled on demand; [`ColumnCountTracker`] republishes the count
//! only when a resize actually changes it.

use core::num::NonZeroUsize;

use kurbo::Size;

/// Source of the resolved column count for the grid.
///
/// Implementations return `None` when the layout engine cannot currently
/// resolve a count (probe detached, template empty or malformed). Callers keep
/// their previous value in that case.
pub trait ColumnProbe {
    /// Samples the current column count.
    fn resolved_columns(&self) -> Option<NonZeroUsize>;
}

impl<F> ColumnProbe for F
where
    F: Fn() -> Option<NonZeroUsize>,
{
    fn resolved_columns(&self) -> Option<NonZeroUsize> {
        self()
    }
}

/// Counts the tracks in a resolved column template such as `"240px 240px 240px"`.
///
/// Tokens are whitespace-separated at the top level; parenthesized groups such
/// as `minmax(0px, 1fr)` count as one track and bracketed line names like
/// `[full-start]` are skipped. Returns `None` for `none`, an empty template,
/// or unbalanced brackets.
#[must_use]
pub fn count_template_tracks(template: &str) -> Option<NonZeroUsize> {
    let template = template.trim();
    if template.eq_ignore_ascii_case("none") {
        return None;
    }

    let mut tracks = 0_usize;
    let mut parens = 0_usize;
    let mut in_names = false;
    let mut in_token = false;

    for ch in template.chars() {
        match ch {
            '[' if parens == 0 && !in_names => {
                if in_token {
                    tracks += 1;
                    in_token = false;
                }
                in_names = true;
            }
            ']' if parens == 0 && in_names => in_names = false,
            '[' | ']' => return None,
            _ if in_names => {}
            '(' => {
                parens += 1;
                in_token = true;
            }
            ')' => {
                parens = parens.checked_sub(1)?;
            }
            c if c.is_whitespace() && parens == 0 => {
                if in_token {
                    tracks += 1;
                    in_token = false;
                }
            }
            _ => in_token = true,
        }
    }

    if parens != 0 || in_names {
        return None;
    }
    if in_token {
        tracks += 1;
    }
    NonZeroUsize::new(tracks)
}

/// Publishes the grid's column count, re-sampling the probe on resize.
#[derive(Debug, Clone)]
pub struct ColumnCountTracker<P> {
    probe: P,
    current: NonZeroUsize,
}

impl<P: ColumnProbe> ColumnCountTracker<P> {
    /// Creates a tracker, sampling the probe once.
    ///
    /// If the probe cannot be resolved yet, `fallback` is used until it can.
    #[must_use]
    pub fn new(probe: P, fallback: NonZeroUsize) -> Self {
        let current = match probe.resolved_columns() {
            Some(columns) => columns,
            None => {
                tracing::debug!(
                    fallback = fallback.get(),
                    "column probe unresolved, using fallback"
                );
                fallback
            }
        };
        Self { probe, current }
    }

    /// Returns the current column count.
    #[must_use]
    pub const fn current_column_count(&self) -> NonZeroUsize {
        self.current
    }

    /// Returns the probe.
    #[must_use]
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Returns the probe mutably, for hosts whose probe carries state.
    ///
    /// Call [`ColumnCountTracker::resample`] afterwards to pick up the change.
    pub fn probe_mut(&mut self) -> &mut P {
        &mut self.probe
    }

    /// Handles a resize of the probe element.
    ///
    /// A probe with no width has not been laid out, so the previous count is
    /// kept without sampling. Returns the new count only if it changed.
    pub fn on_resize(&mut self, probe_size: Size) -> Option<NonZeroUsize> {
        if probe_size.width.is_nan() || probe_size.width <= 0.0 {
            tracing::trace!(width = probe_size.width, "ignoring resize of unlaid probe");
            return None;
        }
        self.resample()
    }

    /// Samples the probe and returns the new count only if it changed.
    ///
    /// Unresolvable samples keep the previous count.
    pub fn resample(&mut self) -> Option<NonZeroUsize> {
        let columns = self.probe.resolved_columns()?;
        if columns == self.current {
            return None;
        }
        tracing::debug!(
            from = self.current.get(),
            to = columns.get(),
            "column count changed"
        );
        self.current = columns;
        Some(columns)
    }
}
