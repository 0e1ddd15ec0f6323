use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{
    Ema, EmaConfig, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource,
    Sma, SmaConfig, Wma, WmaConfig,
};

/// Moving average kind used by the configurable components.
///
/// Closed set of supported smoothings. Components that take a `MaType`
/// (midline average, Bollinger middle band, Keltner midline, ATR smoothing)
/// dispatch over this enum rather than over trait objects, keeping configs
/// plain value types.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum MaType {
    /// Unweighted mean ([`Sma`]).
    #[default]
    Simple,
    /// Exponential smoothing ([`Ema`]).
    Exponential,
    /// Linearly weighted mean ([`Wma`]).
    Weighted,
}

impl Display for MaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Configuration for the kind-dispatched [`MovingAverage`] indicator.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{MaType, MovingAverageConfig, IndicatorConfig, IndicatorConfigBuilder};
/// use std::num::NonZero;
///
/// let config = MovingAverageConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .ma_type(MaType::Exponential)
///     .build();
///
/// assert_eq!(config.length(), 20);
/// // EMA is defined from the first bar
/// assert_eq!(config.min_bars(), 1);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MovingAverageConfig {
    length: usize,
    source: PriceSource,
    ma_type: MaType,
}

impl IndicatorConfig for MovingAverageConfig {
    type Builder = MovingAverageConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        MovingAverageConfigBuilder::new()
    }

    #[inline]
    fn min_bars(&self) -> usize {
        match self.ma_type {
            MaType::Simple | MaType::Weighted => self.length,
            MaType::Exponential => 1,
        }
    }
}

impl MovingAverageConfig {
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

    /// Moving average kind.
    #[inline]
    #[must_use]
    pub fn ma_type(&self) -> MaType {
        self.ma_type
    }

    /// Simple moving average on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for MovingAverageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MovingAverageConfig({}, {}, {})",
            self.ma_type, self.length, self.source
        )
    }
}

/// Builder for [`MovingAverageConfig`].
///
/// Defaults: source = [`PriceSource::Close`], `ma_type` = [`MaType::Simple`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct MovingAverageConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
    ma_type: MaType,
}

impl MovingAverageConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
            ma_type: MaType::Simple,
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

    /// Sets the moving average kind.
    #[inline]
    #[must_use]
    pub fn ma_type(mut self, ma_type: MaType) -> Self {
        self.ma_type = ma_type;
        self
    }
}

impl IndicatorConfigBuilder<MovingAverageConfig> for MovingAverageConfigBuilder {
    #[inline]
    fn build(self) -> MovingAverageConfig {
        MovingAverageConfig {
            length: self.length.expect("length is required"),
            source: self.source,
            ma_type: self.ma_type,
        }
    }
}

#[derive(Clone, Debug)]
enum MaKind {
    Simple(Sma),
    Exponential(Ema),
    Weighted(Wma),
}

/// Moving average dispatching over [`MaType`] at runtime.
///
/// Wraps one of [`Sma`], [`Ema`], or [`Wma`] behind a single indicator type,
/// so components that let callers choose the smoothing keep a fixed field
/// type. Output is identical to the wrapped indicator.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{MaType, MovingAverage, MovingAverageConfig, IndicatorConfig, IndicatorConfigBuilder};
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
/// let config = MovingAverageConfig::builder()
///     .length(NonZero::new(3).unwrap())
///     .build();
/// let mut ma = MovingAverage::new(config);
///
/// assert_eq!(ma.compute(&Bar(10.0, 1)), None);
/// assert_eq!(ma.compute(&Bar(20.0, 2)), None);
/// assert_eq!(ma.compute(&Bar(30.0, 3)), Some(20.0));
/// ```
#[derive(Clone, Debug)]
pub struct MovingAverage {
    config: MovingAverageConfig,
    kind: MaKind,
}

impl MovingAverage {
    #[must_use]
    pub fn config(&self) -> &MovingAverageConfig {
        &self.config
    }
}

impl Indicator for MovingAverage {
    type Config = MovingAverageConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        let length = NonZero::new(config.length).unwrap();
        let kind = match config.ma_type {
            MaType::Simple => MaKind::Simple(Sma::new(
                SmaConfig::builder()
                    .length(length)
                    .source(config.source)
                    .build(),
            )),
            MaType::Exponential => MaKind::Exponential(Ema::new(
                EmaConfig::builder()
                    .length(length)
                    .source(config.source)
                    .build(),
            )),
            MaType::Weighted => MaKind::Weighted(Wma::new(
                WmaConfig::builder()
                    .length(length)
                    .source(config.source)
                    .build(),
            )),
        };

        Self { config, kind }
    }

    #[inline]
    fn compute(&mut self, bar: &impl Ohlcv) -> Option<Price> {
        match &mut self.kind {
            MaKind::Simple(sma) => sma.compute(bar),
            MaKind::Exponential(ema) => ema.compute(bar),
            MaKind::Weighted(wma) => wma.compute(bar),
        }
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        match &self.kind {
            MaKind::Simple(sma) => sma.value(),
            MaKind::Exponential(ema) => ema.value(),
            MaKind::Weighted(wma) => wma.value(),
        }
    }
}

impl Display for MovingAverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            MaKind::Simple(sma) => Display::fmt(sma, f),
            MaKind::Exponential(ema) => Display::fmt(ema, f),
            MaKind::Weighted(wma) => Display::fmt(wma, f),
        }
    }
}
