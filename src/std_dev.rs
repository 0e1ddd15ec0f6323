use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource,
    price_window::PriceWindow,
};

/// Configuration for the windowed standard deviation ([`StdDev`]) indicator.
///
/// # Example
///
/// ```rust
/// use squeeze_momentum::StdDevConfig;
/// use std::num::NonZero;
///
/// let config = StdDevConfig::close(NonZero::new(20).unwrap());
/// assert_eq!(config.length(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct StdDevConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for StdDevConfig {
    type Builder = StdDevConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        StdDevConfigBuilder::new()
    }

    #[inline]
    fn min_bars(&self) -> usize {
        self.length
    }
}

impl StdDevConfig {
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

    /// Standard deviation of closing prices.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for StdDevConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StdDevConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`StdDevConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct StdDevConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl StdDevConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
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

impl IndicatorConfigBuilder<StdDevConfig> for StdDevConfigBuilder {
    #[inline]
    fn build(self) -> StdDevConfig {
        StdDevConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Windowed population standard deviation.
///
/// Maintains the window mean and the centered sum of squares `M2` with
/// Welford-style add/remove updates, so each bar costs O(1) regardless of
/// window length:
///
/// ```text
/// σ = √(M2 / n)
/// ```
///
/// Centering avoids the catastrophic cancellation a raw
/// `E[X²] − E[X]²` form suffers when prices are large relative to their
/// spread. `M2` is clamped at zero before the square root, so a constant
/// window yields exactly `0.0`.
///
/// Returns `None` until the window is full.
#[derive(Clone, Debug)]
pub struct StdDev {
    config: StdDevConfig,
    window: PriceWindow,
    length_reciprocal: f64,
    mean: f64,
    m2: f64,
    current: Option<Price>,
}

impl Indicator for StdDev {
    type Config = StdDevConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        let window = PriceWindow::new(config.length, config.source);

        Self {
            config,
            window,
            #[allow(clippy::cast_precision_loss)]
            length_reciprocal: 1.0 / config.length as f64,
            mean: 0.0,
            m2: 0.0,
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, bar: &impl Ohlcv) -> Option<Price> {
        let step = self.window.add(bar);
        #[allow(clippy::cast_precision_loss)]
        let count = self.window.len() as f64;

        if let Some(old) = step.evicted {
            // Remove the evicted value from the running moments first; the
            // window length is back at `count` once the new value lands.
            let mean_rest = if self.window.len() == 1 {
                0.0
            } else {
                self.mean + (self.mean - old) / (count - 1.0)
            };
            self.m2 -= (old - self.mean) * (old - mean_rest);
            self.mean = mean_rest;
        }

        let delta = step.value - self.mean;
        self.mean += delta / count;
        self.m2 += delta * (step.value - self.mean);

        self.current = self
            .window
            .is_full()
            .then(|| (self.m2.max(0.0) * self.length_reciprocal).sqrt());

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for StdDev {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StdDev({}, {})", self.config.length, self.config.source)
    }
}
