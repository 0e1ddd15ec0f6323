use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource,
    price_window::PriceWindow,
};

/// Configuration for the Weighted Moving Average ([`Wma`]) indicator.
///
/// # Example
///
/// ```rust
/// use squeeze_momentum::WmaConfig;
/// use std::num::NonZero;
///
/// let config = WmaConfig::close(NonZero::new(20).unwrap());
/// assert_eq!(config.length(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct WmaConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for WmaConfig {
    type Builder = WmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        WmaConfigBuilder::new()
    }

    #[inline]
    fn min_bars(&self) -> usize {
        self.length
    }
}

impl WmaConfig {
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

    /// WMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// WMA on median price: `(high + low) / 2`.
    #[must_use]
    pub fn hl2(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::HL2)
            .build()
    }

    /// WMA on average price: `(open + high + low + close) / 4`.
    #[must_use]
    pub fn ohlc4(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::OHLC4)
            .build()
    }
}

impl Display for WmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`WmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct WmaConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl WmaConfigBuilder {
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

impl IndicatorConfigBuilder<WmaConfig> for WmaConfigBuilder {
    #[inline]
    fn build(self) -> WmaConfig {
        WmaConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Weighted Moving Average (WMA).
///
/// Linearly weighted mean of the last *n* values: the newest value carries
/// weight *n*, the oldest weight 1, divided by `n × (n + 1) / 2`. Returns
/// `None` until the window is full.
///
/// Maintained in O(1) per bar: on each slide every surviving weight drops by
/// one, so the weighted sum changes by the plain window sum.
///
/// ```text
/// W' = W − Σwindow + n × newest
/// ```
///
/// # Example
///
/// ```rust
/// use squeeze_momentum::{Wma, WmaConfig};
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
/// let mut wma = Wma::new(WmaConfig::close(NonZero::new(2).unwrap()));
///
/// assert_eq!(wma.compute(&Bar(3.0, 1)), None);
/// // (1 × 3 + 2 × 6) / 3 = 5
/// assert_eq!(wma.compute(&Bar(6.0, 2)), Some(5.0));
/// ```
#[derive(Clone, Debug)]
pub struct Wma {
    config: WmaConfig,
    window: PriceWindow,
    length_f: f64,
    divisor_reciprocal: f64,
    weighted_sum: f64,
    plain_sum: f64,
    current: Option<Price>,
}

impl Indicator for Wma {
    type Config = WmaConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        let window = PriceWindow::new(config.length, config.source);

        Self {
            config,
            window,
            #[allow(clippy::cast_precision_loss)]
            length_f: config.length as f64,
            #[allow(clippy::cast_precision_loss)]
            divisor_reciprocal: 2.0 / (config.length * (config.length + 1)) as f64,
            weighted_sum: 0.0,
            plain_sum: 0.0,
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, bar: &impl Ohlcv) -> Option<Price> {
        let step = self.window.add(bar);

        if let Some(old) = step.evicted {
            self.weighted_sum = self
                .length_f
                .mul_add(step.value, self.weighted_sum - self.plain_sum);
            self.plain_sum += step.value - old;
        } else {
            // Filling: the k-th value enters with weight k
            #[allow(clippy::cast_precision_loss)]
            let weight = self.window.len() as f64;
            self.weighted_sum = weight.mul_add(step.value, self.weighted_sum);
            self.plain_sum += step.value;
        }

        self.current = self
            .window
            .is_full()
            .then(|| self.weighted_sum * self.divisor_reciprocal);

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for Wma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WMA({}, {})", self.config.length, self.config.source)
    }
}
