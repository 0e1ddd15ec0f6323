use std::{fmt::Display, num::NonZero};

use crate::{
    Atr, AtrConfig, Indicator, IndicatorConfig, IndicatorConfigBuilder, MaType, MovingAverage,
    MovingAverageConfig, Multiplier, Ohlcv, Price, PriceSource,
};

/// Configuration for the Keltner Channel ([`Keltner`]) indicator.
///
/// The middle line and the ATR offset are configured independently; by
/// default the ATR uses the same window length as the middle line.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{IndicatorConfig, IndicatorConfigBuilder, KeltnerConfig};
/// use std::num::NonZero;
///
/// // Default: close, 1.5 multiplier, simple smoothing everywhere
/// let config = KeltnerConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .build();
///
/// assert_eq!(config.atr_length(), 20);
/// assert_eq!(config.min_bars(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct KeltnerConfig {
    length: usize,
    source: PriceSource,
    multiplier: Multiplier,
    ma_type: MaType,
    atr_length: usize,
    atr_ma_type: MaType,
}

impl IndicatorConfig for KeltnerConfig {
    type Builder = KeltnerConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        KeltnerConfigBuilder::new()
    }

    /// Warm-up is driven by the slower of the two components.
    fn min_bars(&self) -> usize {
        let middle = match self.ma_type {
            MaType::Exponential => 1,
            MaType::Simple | MaType::Weighted => self.length,
        };
        let atr = match self.atr_ma_type {
            MaType::Exponential => 1,
            MaType::Simple | MaType::Weighted => self.atr_length,
        };

        middle.max(atr)
    }
}

impl KeltnerConfig {
    /// Middle line window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Price source of the middle line.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &PriceSource {
        &self.source
    }

    /// ATR multiplier for the upper and lower channel lines.
    #[inline]
    #[must_use]
    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }

    /// Moving average kind of the middle line.
    #[inline]
    #[must_use]
    pub fn ma_type(&self) -> MaType {
        self.ma_type
    }

    /// ATR window length (number of bars).
    #[inline]
    #[must_use]
    pub fn atr_length(&self) -> usize {
        self.atr_length
    }

    /// Smoothing kind of the ATR.
    #[inline]
    #[must_use]
    pub fn atr_ma_type(&self) -> MaType {
        self.atr_ma_type
    }

    /// The standard setting: close source, 1.5 ATR width, simple averages,
    /// ATR window matching the middle line.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for KeltnerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KeltnerConfig({}, {}, {}, {}, ATR({}, {}))",
            self.length,
            self.source,
            self.multiplier.value(),
            self.ma_type,
            self.atr_length,
            self.atr_ma_type,
        )
    }
}

/// Builder for [`KeltnerConfig`].
///
/// Defaults: source = [`PriceSource::Close`], `multiplier` = `1.5`,
/// `ma_type` = [`MaType::Simple`], `atr_ma_type` = [`MaType::Simple`], and
/// `atr_length` mirrors `length` unless set explicitly.
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct KeltnerConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
    multiplier: Multiplier,
    ma_type: MaType,
    atr_length: Option<usize>,
    atr_ma_type: MaType,
}

impl KeltnerConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
            multiplier: Multiplier::new(1.5),
            ma_type: MaType::Simple,
            atr_length: None,
            atr_ma_type: MaType::Simple,
        }
    }

    /// Sets the middle line window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    /// Sets the middle line price source.
    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    /// Sets the ATR multiplier.
    #[inline]
    #[must_use]
    pub fn multiplier(mut self, multiplier: Multiplier) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the middle line kind.
    #[inline]
    #[must_use]
    pub fn ma_type(mut self, ma_type: MaType) -> Self {
        self.ma_type = ma_type;
        self
    }

    /// Sets the ATR window length.
    #[inline]
    #[must_use]
    pub fn atr_length(mut self, atr_length: NonZero<usize>) -> Self {
        self.atr_length.replace(atr_length.get());
        self
    }

    /// Sets the ATR smoothing kind.
    #[inline]
    #[must_use]
    pub fn atr_ma_type(mut self, atr_ma_type: MaType) -> Self {
        self.atr_ma_type = atr_ma_type;
        self
    }
}

impl IndicatorConfigBuilder<KeltnerConfig> for KeltnerConfigBuilder {
    fn build(self) -> KeltnerConfig {
        let length = self.length.expect("length is required");

        KeltnerConfig {
            length,
            source: self.source,
            multiplier: self.multiplier,
            ma_type: self.ma_type,
            atr_length: self.atr_length.unwrap_or(length),
            atr_ma_type: self.atr_ma_type,
        }
    }
}

/// Keltner Channel output: upper, middle, and lower lines.
///
/// ```text
/// upper  = MA + k × ATR
/// middle = MA
/// lower  = MA − k × ATR
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeltnerValue {
    pub(crate) upper: Price,
    pub(crate) middle: Price,
    pub(crate) lower: Price,
}

impl KeltnerValue {
    /// Upper line: `MA + k × ATR`.
    #[inline]
    #[must_use]
    pub fn upper(&self) -> Price {
        self.upper
    }

    /// Middle line: moving average of the window.
    #[inline]
    #[must_use]
    pub fn middle(&self) -> Price {
        self.middle
    }

    /// Lower line: `MA − k × ATR`.
    #[inline]
    #[must_use]
    pub fn lower(&self) -> Price {
        self.lower
    }

    /// Channel width: `upper − lower`.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Display for KeltnerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KC(u: {}, m: {}, l: {})",
            self.upper, self.middle, self.lower
        )
    }
}

/// Keltner Channel (KC).
///
/// A volatility channel consisting of a moving average (middle) with upper
/// and lower lines offset by a multiple of the Average True Range. Unlike
/// Bollinger Bands, the offset tracks bar-to-bar range rather than the
/// dispersion of a single price source, so gaps widen the channel even when
/// closes barely move.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{Keltner, KeltnerConfig};
/// use std::num::NonZero;
/// # use squeeze_momentum::{Ohlcv, Price, Timestamp};
/// #
/// # struct Bar(f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.0 + 1.0 }
/// #     fn low(&self) -> Price { self.0 - 1.0 }
/// #     fn close(&self) -> Price { self.0 }
/// #     fn open_time(&self) -> Timestamp { self.1 }
/// # }
///
/// let config = KeltnerConfig::close(NonZero::new(20).unwrap());
/// let mut kc = Keltner::new(config);
///
/// // Feed bars...
/// # for i in 1..=19 { kc.compute(&Bar(100.0, i)); }
///
/// if let Some(value) = kc.compute(&Bar(100.0, 20)) {
///     println!("upper: {}, middle: {}, lower: {}",
///         value.upper(), value.middle(), value.lower());
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Keltner {
    config: KeltnerConfig,
    multiplier: f64,
    ma: MovingAverage,
    atr: Atr,
    current: Option<KeltnerValue>,
}

impl Indicator for Keltner {
    type Config = KeltnerConfig;
    type Output = KeltnerValue;

    fn new(config: Self::Config) -> Self {
        let ma = MovingAverage::new(
            MovingAverageConfig::builder()
                .length(NonZero::new(config.length).unwrap())
                .source(config.source)
                .ma_type(config.ma_type)
                .build(),
        );
        let atr = Atr::new(
            AtrConfig::builder()
                .length(NonZero::new(config.atr_length).unwrap())
                .ma_type(config.atr_ma_type)
                .build(),
        );

        Self {
            config,
            multiplier: config.multiplier.value(),
            ma,
            atr,
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, bar: &impl Ohlcv) -> Option<Self::Output> {
        let middle = self.ma.compute(bar);
        let atr = self.atr.compute(bar);

        self.current = match (middle, atr) {
            (Some(middle), Some(atr)) => {
                let offset = atr * self.multiplier;

                Some(KeltnerValue {
                    upper: middle + offset,
                    middle,
                    lower: middle - offset,
                })
            }
            _ => None,
        };

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Display for Keltner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KC({}, {}, {}, {}, ATR({}, {}))",
            self.config.length,
            self.config.source,
            self.multiplier,
            self.config.ma_type,
            self.config.atr_length,
            self.config.atr_ma_type,
        )
    }
}
