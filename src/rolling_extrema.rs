use std::{
    collections::VecDeque,
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Timestamp,
};

/// Monotonic deque over the last `length` extracted values.
///
/// Specialised by `MAX`: `true` keeps a decreasing deque whose front is the
/// window maximum, `false` an increasing deque whose front is the minimum.
/// Each value is pushed and popped at most once, so updates are amortised
/// O(1) regardless of window length.
#[derive(Clone, Debug)]
struct ExtremaWindow<const MAX: bool> {
    length: u64,
    source: PriceSource,
    /// `(bar ordinal, value)` pairs, extreme at the front.
    deque: VecDeque<(u64, Price)>,
    seen: u64,
    prev_close: Option<Price>,
    last_open_time: Option<Timestamp>,
}

impl<const MAX: bool> ExtremaWindow<MAX> {
    fn new(length: usize, source: PriceSource) -> Self {
        Self {
            length: length as u64,
            source,
            deque: VecDeque::with_capacity(length),
            seen: 0,
            prev_close: None,
            last_open_time: None,
        }
    }

    #[inline]
    fn add(&mut self, bar: &impl Ohlcv) -> Option<Price> {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t < bar.open_time()),
            "open_time must be strictly increasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            bar.open_time(),
        );
        self.last_open_time = Some(bar.open_time());

        let value = self.source.extract(bar, self.prev_close);
        self.prev_close = Some(bar.close());

        let index = self.seen;
        self.seen += 1;

        // Values dominated by the newcomer can never be the extreme again
        while self
            .deque
            .back()
            .is_some_and(|&(_, v)| if MAX { v <= value } else { v >= value })
        {
            self.deque.pop_back();
        }
        self.deque.push_back((index, value));

        // Drop entries that slid out of the window
        while self
            .deque
            .front()
            .is_some_and(|&(i, _)| i + self.length <= index)
        {
            self.deque.pop_front();
        }

        (self.seen >= self.length).then(|| {
            self.deque
                .front()
                .expect("ExtremaWindow invariant violation: deque holds the newest value")
                .1
        })
    }
}

/// Configuration for the rolling window maximum ([`RollingMax`]) indicator.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{PriceSource, RollingMaxConfig};
/// use std::num::NonZero;
///
/// let config = RollingMaxConfig::high(NonZero::new(20).unwrap());
/// assert_eq!(*config.source(), PriceSource::High);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RollingMaxConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for RollingMaxConfig {
    type Builder = RollingMaxConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RollingMaxConfigBuilder::new()
    }

    #[inline]
    fn min_bars(&self) -> usize {
        self.length
    }
}

impl RollingMaxConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Price source to extract from each bar.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &PriceSource {
        &self.source
    }

    /// Highest high over the window, the usual channel-top setting.
    #[must_use]
    pub fn high(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for RollingMaxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RollingMaxConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`RollingMaxConfig`].
///
/// Defaults: source = [`PriceSource::High`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct RollingMaxConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl RollingMaxConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::High,
        }
    }

    /// Sets the window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    /// Sets the price source.
    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<RollingMaxConfig> for RollingMaxConfigBuilder {
    #[inline]
    fn build(self) -> RollingMaxConfig {
        RollingMaxConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Rolling window maximum.
///
/// Highest extracted value over the last `length` bars, `None` until the
/// window is full. Amortised O(1) per bar via a monotonic deque.
#[derive(Clone, Debug)]
pub struct RollingMax {
    config: RollingMaxConfig,
    window: ExtremaWindow<true>,
    current: Option<Price>,
}

impl Indicator for RollingMax {
    type Config = RollingMaxConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            window: ExtremaWindow::new(config.length, config.source),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, bar: &impl Ohlcv) -> Option<Price> {
        self.current = self.window.add(bar);
        self.current
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for RollingMax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RollingMax({}, {})", self.config.length, self.config.source)
    }
}

/// Configuration for the rolling window minimum ([`RollingMin`]) indicator.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{PriceSource, RollingMinConfig};
/// use std::num::NonZero;
///
/// let config = RollingMinConfig::low(NonZero::new(20).unwrap());
/// assert_eq!(*config.source(), PriceSource::Low);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RollingMinConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for RollingMinConfig {
    type Builder = RollingMinConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RollingMinConfigBuilder::new()
    }

    #[inline]
    fn min_bars(&self) -> usize {
        self.length
    }
}

impl RollingMinConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Price source to extract from each bar.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &PriceSource {
        &self.source
    }

    /// Lowest low over the window, the usual channel-bottom setting.
    #[must_use]
    pub fn low(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for RollingMinConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RollingMinConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`RollingMinConfig`].
///
/// Defaults: source = [`PriceSource::Low`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct RollingMinConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl RollingMinConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Low,
        }
    }

    /// Sets the window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    /// Sets the price source.
    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<RollingMinConfig> for RollingMinConfigBuilder {
    #[inline]
    fn build(self) -> RollingMinConfig {
        RollingMinConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Rolling window minimum.
///
/// Lowest extracted value over the last `length` bars, `None` until the
/// window is full. Amortised O(1) per bar via a monotonic deque.
#[derive(Clone, Debug)]
pub struct RollingMin {
    config: RollingMinConfig,
    window: ExtremaWindow<false>,
    current: Option<Price>,
}

impl Indicator for RollingMin {
    type Config = RollingMinConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            window: ExtremaWindow::new(config.length, config.source),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, bar: &impl Ohlcv) -> Option<Price> {
        self.current = self.window.add(bar);
        self.current
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for RollingMin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RollingMin({}, {})", self.config.length, self.config.source)
    }
}
