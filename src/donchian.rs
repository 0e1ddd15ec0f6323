use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, RollingMax,
    RollingMaxConfig, RollingMin, RollingMinConfig,
};

/// Configuration for the Donchian midline ([`DonchianMidline`]) indicator.
///
/// The midline is always built from bar highs and lows, so the window length
/// is the only knob.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{DonchianConfig, IndicatorConfig, IndicatorConfigBuilder};
/// use std::num::NonZero;
///
/// let config = DonchianConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .build();
///
/// assert_eq!(config.min_bars(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct DonchianConfig {
    length: usize,
}

impl IndicatorConfig for DonchianConfig {
    type Builder = DonchianConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        DonchianConfigBuilder::new()
    }

    #[inline]
    fn min_bars(&self) -> usize {
        self.length
    }
}

impl DonchianConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Display for DonchianConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DonchianConfig({})", self.length)
    }
}

/// Builder for [`DonchianConfig`].
///
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct DonchianConfigBuilder {
    length: Option<usize>,
}

impl DonchianConfigBuilder {
    fn new() -> Self {
        Self { length: None }
    }

    /// Sets the window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }
}

impl IndicatorConfigBuilder<DonchianConfig> for DonchianConfigBuilder {
    #[inline]
    fn build(self) -> DonchianConfig {
        DonchianConfig {
            length: self.length.expect("length is required"),
        }
    }
}

/// Donchian channel midline.
///
/// The midpoint between the highest high and the lowest low of the last
/// `length` bars:
///
/// ```text
/// midline = (highest(high, length) + lowest(low, length)) / 2
/// ```
///
/// Unlike a moving average the midline only moves when the channel itself
/// moves, which makes it a useful anchor for range-bound price action.
/// Amortised O(1) per bar.
#[derive(Clone, Debug)]
pub struct DonchianMidline {
    config: DonchianConfig,
    highest: RollingMax,
    lowest: RollingMin,
    current: Option<Price>,
}

impl Indicator for DonchianMidline {
    type Config = DonchianConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        let length = NonZero::new(config.length).unwrap();

        Self {
            config,
            highest: RollingMax::new(RollingMaxConfig::high(length)),
            lowest: RollingMin::new(RollingMinConfig::low(length)),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, bar: &impl Ohlcv) -> Option<Price> {
        let highest = self.highest.compute(bar);
        let lowest = self.lowest.compute(bar);

        self.current = match (highest, lowest) {
            (Some(high), Some(low)) => Some(f64::midpoint(high, low)),
            _ => None,
        };

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for DonchianMidline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DonchianMidline({})", self.config.length)
    }
}
