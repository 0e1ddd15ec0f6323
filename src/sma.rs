use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource,
    price_window::PriceWindow,
};

/// Configuration for the Simple Moving Average ([`Sma`]) indicator.
///
/// # Example
///
/// ```rust
/// use squeeze_momentum::SmaConfig;
/// use std::num::NonZero;
///
/// let config = SmaConfig::close(NonZero::new(20).unwrap());
/// assert_eq!(config.length(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SmaConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for SmaConfig {
    type Builder = SmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SmaConfigBuilder::new()
    }

    #[inline]
    fn min_bars(&self) -> usize {
        self.length
    }
}

impl SmaConfig {
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

    /// SMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// SMA on median price: `(high + low) / 2`.
    #[must_use]
    pub fn hl2(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::HL2)
            .build()
    }

    /// SMA on average price: `(open + high + low + close) / 4`.
    #[must_use]
    pub fn ohlc4(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::OHLC4)
            .build()
    }
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`SmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct SmaConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl SmaConfigBuilder {
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

impl IndicatorConfigBuilder<SmaConfig> for SmaConfigBuilder {
    #[inline]
    fn build(self) -> SmaConfig {
        SmaConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Simple Moving Average (SMA).
///
/// Computes the unweighted mean of the last *n* values, where *n* is the
/// configured window length. Returns `None` until the window is full.
///
/// Uses a running sum for O(1) updates per bar.
///
/// # Example
///
/// ```rust
/// use squeeze_momentum::{Sma, SmaConfig};
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
/// let mut sma = Sma::new(SmaConfig::close(NonZero::new(3).unwrap()));
///
/// assert_eq!(sma.compute(&Bar(10.0, 1)), None);
/// assert_eq!(sma.compute(&Bar(20.0, 2)), None);
/// assert_eq!(sma.compute(&Bar(30.0, 3)), Some(20.0));
/// ```
#[derive(Clone, Debug)]
pub struct Sma {
    config: SmaConfig,
    window: PriceWindow,
    length_reciprocal: f64,
    current: Option<Price>,
}

impl Indicator for Sma {
    type Config = SmaConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        let window = PriceWindow::new(config.length, config.source);

        Self {
            config,
            window,
            #[allow(clippy::cast_precision_loss)]
            length_reciprocal: 1.0 / config.length as f64,
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, bar: &impl Ohlcv) -> Option<Price> {
        self.window.add(bar);

        self.current = self.window.sum().map(|sum| sum * self.length_reciprocal);

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}, {})", self.config.length, self.config.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, bar};
    use std::num::NonZero;

    fn sma(length: usize) -> Sma {
        Sma::new(SmaConfig::close(NonZero::new(length).unwrap()))
    }

    mod filling {
        use super::*;

        #[test]
        fn none_until_window_full() {
            let mut sma = sma(3);
            assert_eq!(sma.compute(&bar(10.0, 1)), None);
            assert_eq!(sma.compute(&bar(20.0, 2)), None);
        }

        #[test]
        fn returns_average_when_full() {
            let mut sma = sma(3);
            sma.compute(&bar(10.0, 1));
            sma.compute(&bar(20.0, 2));
            assert_eq!(sma.compute(&bar(30.0, 3)), Some(20.0));
        }

        #[test]
        fn fractional_average() {
            let mut sma = sma(3);
            sma.compute(&bar(10.0, 1));
            sma.compute(&bar(15.0, 2));
            // (10 + 15 + 30) / 3 = 18.333...
            let result = sma.compute(&bar(30.0, 3));
            assert_approx!(result.unwrap(), 55.0 / 3.0);
        }
    }

    mod sliding {
        use super::*;

        #[test]
        fn drops_oldest_on_advance() {
            let mut sma = sma(2);
            sma.compute(&bar(10.0, 1));
            sma.compute(&bar(20.0, 2));
            // (20 + 30) / 2 = 25
            assert_eq!(sma.compute(&bar(30.0, 3)), Some(25.0));
        }

        #[test]
        fn slides_across_many_bars() {
            let mut sma = sma(2);
            sma.compute(&bar(10.0, 1));
            sma.compute(&bar(20.0, 2));
            sma.compute(&bar(30.0, 3));
            sma.compute(&bar(40.0, 4));
            // (40 + 50) / 2 = 45
            assert_eq!(sma.compute(&bar(50.0, 5)), Some(45.0));
        }
    }

    mod price_source {
        use super::*;
        use crate::test_util::Bar;

        #[test]
        fn hl2_source() {
            let mut sma = Sma::new(SmaConfig::hl2(NonZero::new(2).unwrap()));
            // HL2 = (high + low) / 2
            sma.compute(&Bar::new(0.0, 20.0, 10.0, 0.0).at(1)); // HL2 = 15
            let result = sma.compute(&Bar::new(0.0, 30.0, 20.0, 0.0).at(2)); // HL2 = 25
            // (15 + 25) / 2 = 20
            assert_eq!(result, Some(20.0));
        }
    }

    mod display {
        use super::*;

        #[test]
        fn formats_correctly() {
            let sma = sma(20);
            assert_eq!(sma.to_string(), "SMA(20, Close)");
        }
    }

    mod clone {
        use super::*;

        #[test]
        fn produces_independent_state() {
            let mut sma = sma(3);
            sma.compute(&bar(10.0, 1));
            sma.compute(&bar(20.0, 2));

            let mut cloned = sma.clone();

            // Advance original to a full window
            assert_eq!(sma.compute(&bar(30.0, 3)), Some(20.0));

            // Clone still has no value (only saw 2 bars)
            assert_eq!(cloned.value(), None);

            // Clone fills independently
            assert_eq!(cloned.compute(&bar(90.0, 3)), Some(40.0));
        }
    }

    mod config {
        use super::*;
        use std::collections::HashSet;

        #[test]
        fn close_helper_uses_close_source() {
            let config = SmaConfig::close(NonZero::new(10).unwrap());
            assert_eq!(*config.source(), PriceSource::Close);
        }

        #[test]
        fn hl2_helper_uses_hl2_source() {
            let config = SmaConfig::hl2(NonZero::new(10).unwrap());
            assert_eq!(*config.source(), PriceSource::HL2);
        }

        #[test]
        fn ohlc4_helper_uses_ohlc4_source() {
            let config = SmaConfig::ohlc4(NonZero::new(10).unwrap());
            assert_eq!(*config.source(), PriceSource::OHLC4);
        }

        #[test]
        fn min_bars_equals_length() {
            let config = SmaConfig::close(NonZero::new(10).unwrap());
            assert_eq!(config.min_bars(), 10);
        }

        #[test]
        #[should_panic(expected = "length is required")]
        fn panics_without_length() {
            let _ = SmaConfig::builder().build();
        }

        #[test]
        fn display_config() {
            let config = SmaConfig::close(NonZero::new(20).unwrap());
            assert_eq!(config.to_string(), "SmaConfig(20, Close)");
        }

        #[test]
        fn eq_and_hash() {
            let a = SmaConfig::close(NonZero::new(20).unwrap());
            let b = SmaConfig::close(NonZero::new(20).unwrap());
            let c = SmaConfig::close(NonZero::new(10).unwrap());

            let mut set = HashSet::new();
            set.insert(a);

            assert!(set.contains(&b));
            assert!(!set.contains(&c));
        }
    }

    mod true_range {
        use super::*;
        use crate::test_util::Bar;

        fn tr_sma(length: usize) -> Sma {
            Sma::new(
                SmaConfig::builder()
                    .length(NonZero::new(length).unwrap())
                    .source(PriceSource::TrueRange)
                    .build(),
            )
        }

        fn ohlc(open: f64, high: f64, low: f64, close: f64, time: u64) -> Bar {
            Bar::new(open, high, low, close).at(time)
        }

        #[test]
        fn first_bar_uses_high_minus_low() {
            let mut sma = tr_sma(1);
            // No prev_close → TR = high - low = 25
            assert_eq!(sma.compute(&ohlc(10.0, 30.0, 5.0, 20.0, 1)), Some(25.0));
        }

        #[test]
        fn averages_true_range_over_window() {
            let mut sma = tr_sma(2);
            sma.compute(&ohlc(10.0, 20.0, 5.0, 15.0, 1)); // TR=15
            // TR2: hl=10, |22-15|=7, |12-15|=3 → 10
            // SMA = (15 + 10) / 2 = 12.5
            assert_eq!(sma.compute(&ohlc(16.0, 22.0, 12.0, 18.0, 2)), Some(12.5),);
        }

        #[test]
        fn gap_up_uses_prev_close() {
            let mut sma = tr_sma(1);
            sma.compute(&ohlc(10.0, 15.0, 5.0, 10.0, 1)); // close=10
            // Gap up: hl=10, |30-10|=20, |20-10|=10 → 20
            assert_eq!(sma.compute(&ohlc(25.0, 30.0, 20.0, 28.0, 2)), Some(20.0),);
        }
    }

    mod value_accessor {
        use super::*;

        #[test]
        fn none_before_first_full_window() {
            let sma = sma(3);
            assert_eq!(sma.value(), None);
        }

        #[test]
        fn returns_current_value() {
            let mut sma = sma(2);
            sma.compute(&bar(10.0, 1));
            sma.compute(&bar(20.0, 2));
            assert_eq!(sma.value(), Some(15.0));
        }

        #[test]
        fn matches_last_compute() {
            let mut sma = sma(2);
            sma.compute(&bar(10.0, 1));
            let computed = sma.compute(&bar(20.0, 2));
            assert_eq!(sma.value(), computed);
        }
    }
}
