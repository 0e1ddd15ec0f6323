use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Timestamp,
};

/// Configuration for the Exponential Moving Average ([`Ema`])
/// indicator.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{EmaConfig, IndicatorConfig};
/// use std::num::NonZero;
///
/// let config = EmaConfig::close(NonZero::new(20).unwrap());
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.min_bars(), 1);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for EmaConfig {
    type Builder = EmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        EmaConfigBuilder::new()
    }

    /// Always `1`: the EMA is seeded with the first extracted value and is
    /// defined from the first bar on.
    #[inline]
    fn min_bars(&self) -> usize {
        1
    }
}

impl EmaConfig {
    /// Window length (number of bars), only used to derive the smoothing
    /// factor `α = 2 / (length + 1)`.
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

    /// EMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// EMA on median price: `(high + low) / 2`.
    #[must_use]
    pub fn hl2(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::HL2)
            .build()
    }

    /// EMA on average price: `(open + high + low + close) / 4`.
    #[must_use]
    pub fn ohlc4(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::OHLC4)
            .build()
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`EmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct EmaConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl EmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the indicator window length.
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

impl IndicatorConfigBuilder<EmaConfig> for EmaConfigBuilder {
    #[inline]
    fn build(self) -> EmaConfig {
        EmaConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Exponential Moving Average (EMA).
///
/// A weighted moving average that gives more weight to recent
/// prices. Uses the standard smoothing factor
/// `α = 2 / (length + 1)`. Each value is computed as:
///
/// ```text
/// EMA = α × price + (1 − α) × prev_EMA
/// ```
///
/// The first extracted value seeds the recursion, so the EMA is defined
/// from the very first bar. Early values carry the seed's bias, which
/// decays exponentially as bars arrive. Runs with O(1) constant memory
/// per bar via a single fused multiply-add.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{Ema, EmaConfig};
/// use std::num::NonZero;
/// # use squeeze_momentum::{Ohlcv, Price, Timestamp};
/// #
/// # struct Bar(f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.0 }
/// #     fn low(&self) -> Price { self.0 }
/// #     fn close(&self) -> Price { self.0 }
/// #     fn open_time(&self) -> Timestamp { self.1 }
/// # }
///
/// let mut ema = Ema::new(EmaConfig::close(NonZero::new(3).unwrap()));
///
/// // First bar seeds the recursion
/// assert_eq!(ema.compute(&Bar(2.0, 1)), Some(2.0));
///
/// // EMA(3) α = 0.5: 0.5 × 4 + 0.5 × 2 = 3.0
/// assert_eq!(ema.compute(&Bar(4.0, 2)), Some(3.0));
/// assert_eq!(ema.compute(&Bar(6.0, 3)), Some(4.5));
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
    alpha: f64,
    current: Option<Price>,
    prev_close: Option<Price>,
    last_open_time: Option<Timestamp>,
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            #[allow(clippy::cast_precision_loss)]
            alpha: 2.0 / (config.length + 1) as f64,
            current: None,
            prev_close: None,
            last_open_time: None,
        }
    }

    #[inline]
    fn compute(&mut self, bar: &impl Ohlcv) -> Option<Price> {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t < bar.open_time()),
            "open_time must be strictly increasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            bar.open_time(),
        );
        self.last_open_time = Some(bar.open_time());

        let price = self.config.source.extract(bar, self.prev_close);
        self.prev_close = Some(bar.close());

        self.current = Some(match self.current {
            Some(previous) => self.alpha.mul_add(price - previous, previous),
            None => price,
        });

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.length, self.config.source)
    }
}
