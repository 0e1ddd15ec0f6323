use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, MaType, MovingAverage,
    MovingAverageConfig, Multiplier, Ohlcv, Price, PriceSource, StdDev, StdDevConfig,
};

/// Configuration for the Bollinger Bands ([`Bollinger`]) indicator.
///
/// One window length drives both the middle band average and the standard
/// deviation, matching the classic construction.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{BollingerConfig, IndicatorConfig, IndicatorConfigBuilder};
/// use std::num::NonZero;
///
/// // Default: close, 2.0 multiplier, simple middle band
/// let config = BollingerConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .build();
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.min_bars(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct BollingerConfig {
    length: usize,
    source: PriceSource,
    multiplier: Multiplier,
    ma_type: MaType,
}

impl IndicatorConfig for BollingerConfig {
    type Builder = BollingerConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        BollingerConfigBuilder::new()
    }

    /// The standard deviation always needs a full window, so warm-up is the
    /// window length regardless of the middle band kind.
    #[inline]
    fn min_bars(&self) -> usize {
        self.length
    }
}

impl BollingerConfig {
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

    /// Standard deviation multiplier for the upper and lower bands.
    #[inline]
    #[must_use]
    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }

    /// Moving average kind of the middle band.
    #[inline]
    #[must_use]
    pub fn ma_type(&self) -> MaType {
        self.ma_type
    }

    /// The standard setting: close source, 2σ width, simple middle.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for BollingerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BollingerConfig({}, {}, {}, {})",
            self.length,
            self.source,
            self.multiplier.value(),
            self.ma_type,
        )
    }
}

/// Builder for [`BollingerConfig`].
///
/// Defaults: source = [`PriceSource::Close`], `multiplier` = `2.0`,
/// `ma_type` = [`MaType::Simple`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct BollingerConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
    multiplier: Multiplier,
    ma_type: MaType,
}

impl BollingerConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
            multiplier: Multiplier::new(2.0),
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

    /// Sets the standard deviation multiplier.
    #[inline]
    #[must_use]
    pub fn multiplier(mut self, multiplier: Multiplier) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the middle band kind.
    #[inline]
    #[must_use]
    pub fn ma_type(mut self, ma_type: MaType) -> Self {
        self.ma_type = ma_type;
        self
    }
}

impl IndicatorConfigBuilder<BollingerConfig> for BollingerConfigBuilder {
    #[inline]
    fn build(self) -> BollingerConfig {
        BollingerConfig {
            length: self.length.expect("length is required"),
            source: self.source,
            multiplier: self.multiplier,
            ma_type: self.ma_type,
        }
    }
}

/// Bollinger Bands output: upper, middle, and lower bands.
///
/// ```text
/// upper  = MA + k × σ
/// middle = MA
/// lower  = MA − k × σ
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerValue {
    pub(crate) upper: Price,
    pub(crate) middle: Price,
    pub(crate) lower: Price,
}

impl BollingerValue {
    /// Upper band: `MA + k × σ`.
    #[inline]
    #[must_use]
    pub fn upper(&self) -> Price {
        self.upper
    }

    /// Middle band: moving average of the window.
    #[inline]
    #[must_use]
    pub fn middle(&self) -> Price {
        self.middle
    }

    /// Lower band: `MA − k × σ`.
    #[inline]
    #[must_use]
    pub fn lower(&self) -> Price {
        self.lower
    }

    /// Band width: `upper − lower`.
    ///
    /// Narrow width indicates consolidation, wide width high volatility.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Display for BollingerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB(u: {}, m: {}, l: {})",
            self.upper, self.middle, self.lower
        )
    }
}

/// Bollinger Bands (BB).
///
/// A volatility indicator consisting of three bands: a moving average
/// (middle) with upper and lower bands offset by a configurable number of
/// population standard deviations.
///
/// The middle band kind is selectable via [`MaType`]; the offset always uses
/// the standard deviation of the same window and source. O(1) per bar apart
/// from the unavoidable `sqrt`.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{Bollinger, BollingerConfig};
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
/// let config = BollingerConfig::close(NonZero::new(20).unwrap());
/// let mut bb = Bollinger::new(config);
///
/// // Feed bars...
/// # for i in 1..=19 { bb.compute(&Bar(100.0, i)); }
///
/// if let Some(value) = bb.compute(&Bar(100.0, 20)) {
///     println!("upper: {}, middle: {}, lower: {}",
///         value.upper(), value.middle(), value.lower());
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Bollinger {
    config: BollingerConfig,
    multiplier: f64,
    ma: MovingAverage,
    std_dev: StdDev,
    current: Option<BollingerValue>,
}

impl Indicator for Bollinger {
    type Config = BollingerConfig;
    type Output = BollingerValue;

    fn new(config: Self::Config) -> Self {
        let length = NonZero::new(config.length).unwrap();
        let ma = MovingAverage::new(
            MovingAverageConfig::builder()
                .length(length)
                .source(config.source)
                .ma_type(config.ma_type)
                .build(),
        );
        let std_dev = StdDev::new(
            StdDevConfig::builder()
                .length(length)
                .source(config.source)
                .build(),
        );

        Self {
            config,
            multiplier: config.multiplier.value(),
            ma,
            std_dev,
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, bar: &impl Ohlcv) -> Option<Self::Output> {
        let middle = self.ma.compute(bar);
        let sigma = self.std_dev.compute(bar);

        self.current = match (middle, sigma) {
            (Some(middle), Some(sigma)) => {
                let offset = sigma * self.multiplier;

                Some(BollingerValue {
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

impl Display for Bollinger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB({}, {}, {}, {})",
            self.config.length, self.config.source, self.multiplier, self.config.ma_type,
        )
    }
}
