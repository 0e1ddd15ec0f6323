use crate::{Ohlcv, Price, PriceSource, Timestamp};
use std::collections::VecDeque;

/// Result of pushing one bar into a [`PriceWindow`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Pushed {
    /// Value extracted from the bar via the configured [`PriceSource`].
    pub value: Price,
    /// Oldest value dropped from a full window, `None` while filling.
    pub evicted: Option<Price>,
}

/// Fixed-length FIFO over extracted bar values with a running sum.
///
/// Shared by the window-based calculators (SMA, WMA, standard deviation).
/// The sum is maintained incrementally via add/subtract and may accumulate
/// FP rounding drift over very long runs, negligible for typical window
/// sizes on financial data.
#[derive(Clone, Debug)]
pub(crate) struct PriceWindow {
    length: usize,
    source: PriceSource,
    window: VecDeque<Price>,
    sum: Price,
    /// Close of the most recent bar, used as `prev_close` for `TrueRange`
    /// extraction on the next bar.
    prev_close: Option<Price>,
    last_open_time: Option<Timestamp>,
}

impl PriceWindow {
    pub fn new(length: usize, source: PriceSource) -> Self {
        Self {
            length,
            source,
            window: VecDeque::with_capacity(length),
            sum: 0.0,
            prev_close: None,
            last_open_time: None,
        }
    }

    /// Extracts the configured source value, appends it, and evicts the
    /// oldest value once the window is at capacity.
    #[inline]
    pub fn add(&mut self, bar: &impl Ohlcv) -> Pushed {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t < bar.open_time()),
            "open_time must be strictly increasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            bar.open_time(),
        );
        self.last_open_time = Some(bar.open_time());

        let evicted = if self.window.len() == self.length {
            let old = self.window.pop_front().expect(
                "PriceWindow invariant violation: window should be full when at capacity",
            );
            self.sum -= old;
            Some(old)
        } else {
            None
        };

        let value = self.source.extract(bar, self.prev_close);

        self.prev_close = Some(bar.close());
        self.window.push_back(value);
        self.sum += value;

        Pushed { value, evicted }
    }

    /// Sum over the window, or `None` until the window is full.
    #[inline]
    pub fn sum(&self) -> Option<Price> {
        self.is_full().then_some(self.sum)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.window.len() == self.length
    }
}
