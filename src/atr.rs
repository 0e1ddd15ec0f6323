use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, MaType, MovingAverage,
    MovingAverageConfig, Ohlcv, Price, PriceSource,
};

/// Configuration for the Average True Range ([`Atr`]) indicator.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{AtrConfig, IndicatorConfig, IndicatorConfigBuilder, MaType};
/// use std::num::NonZero;
///
/// let config = AtrConfig::builder()
///     .length(NonZero::new(14).unwrap())
///     .ma_type(MaType::Exponential)
///     .build();
///
/// assert_eq!(config.length(), 14);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct AtrConfig {
    length: usize,
    ma_type: MaType,
}

impl IndicatorConfig for AtrConfig {
    type Builder = AtrConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        AtrConfigBuilder::new()
    }

    #[inline]
    fn min_bars(&self) -> usize {
        match self.ma_type {
            MaType::Simple | MaType::Weighted => self.length,
            MaType::Exponential => 1,
        }
    }
}

impl AtrConfig {
    /// Smoothing window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Moving average kind used to smooth the true range.
    #[inline]
    #[must_use]
    pub fn ma_type(&self) -> MaType {
        self.ma_type
    }

    /// Simple-smoothed ATR.
    #[must_use]
    pub fn simple(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for AtrConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AtrConfig({}, {})", self.length, self.ma_type)
    }
}

/// Builder for [`AtrConfig`].
///
/// Defaults: `ma_type` = [`MaType::Simple`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct AtrConfigBuilder {
    length: Option<usize>,
    ma_type: MaType,
}

impl AtrConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            ma_type: MaType::Simple,
        }
    }

    /// Sets the smoothing window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    /// Sets the smoothing kind.
    #[inline]
    #[must_use]
    pub fn ma_type(mut self, ma_type: MaType) -> Self {
        self.ma_type = ma_type;
        self
    }
}

impl IndicatorConfigBuilder<AtrConfig> for AtrConfigBuilder {
    #[inline]
    fn build(self) -> AtrConfig {
        AtrConfig {
            length: self.length.expect("length is required"),
            ma_type: self.ma_type,
        }
    }
}

/// Average True Range (ATR).
///
/// Smooths the per-bar true range with the configured moving average kind.
/// True range is `max(high − low, |high − prev_close|, |low − prev_close|)`,
/// falling back to `high − low` on the first bar.
///
/// Warm-up follows the smoothing: a simple or weighted ATR needs a full
/// window, an exponential ATR is defined from the first bar.
#[derive(Clone, Debug)]
pub struct Atr {
    config: AtrConfig,
    ma: MovingAverage,
}

impl Indicator for Atr {
    type Config = AtrConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        let ma = MovingAverage::new(
            MovingAverageConfig::builder()
                .length(NonZero::new(config.length).unwrap())
                .source(PriceSource::TrueRange)
                .ma_type(config.ma_type)
                .build(),
        );

        Self { config, ma }
    }

    #[inline]
    fn compute(&mut self, bar: &impl Ohlcv) -> Option<Price> {
        self.ma.compute(bar)
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.ma.value()
    }
}

impl Display for Atr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ATR({}, {})", self.config.length, self.config.ma_type)
    }
}
