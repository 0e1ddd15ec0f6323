use std::{fmt::Display, num::NonZero};

use crate::{
    Bollinger, BollingerConfig, DonchianConfig, DonchianMidline, IndicatorConfig,
    IndicatorConfigBuilder, Keltner, KeltnerConfig, LinRegConfig, LinRegForecast, MovingAverage,
    MovingAverageConfig, Ohlcv, Price, Series,
};

const DEFAULT_PERIOD: NonZero<usize> = NonZero::new(20).unwrap();

/// Presence sentinel carried by the squeeze marker series.
const MARKER: Price = 0.0;

/// Configuration for the squeeze momentum engine ([`SqueezeMomentum`]).
///
/// Five sub-configurations, one per pipeline component. Every one of them
/// defaults to the classic 20-period setting, so
/// [`default_20`](Self::default_20) (or an empty builder) reproduces the
/// indicator as it is usually charted.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{
///     IndicatorConfig, IndicatorConfigBuilder, LinRegConfig, SqueezeMomentumConfig,
/// };
/// use std::num::NonZero;
///
/// let config = SqueezeMomentumConfig::builder()
///     .lin_reg(
///         LinRegConfig::builder()
///             .length(NonZero::new(10).unwrap())
///             .build(),
///     )
///     .build();
///
/// assert_eq!(config.lin_reg().length(), 10);
/// assert_eq!(config.bollinger().length(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SqueezeMomentumConfig {
    bollinger: BollingerConfig,
    keltner: KeltnerConfig,
    donchian: DonchianConfig,
    ma: MovingAverageConfig,
    lin_reg: LinRegConfig,
}

impl IndicatorConfig for SqueezeMomentumConfig {
    type Builder = SqueezeMomentumConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SqueezeMomentumConfigBuilder::new()
    }

    /// First bar on which every output pair has a defined member.
    ///
    /// The momentum path needs the delta slot defined (slower of Donchian
    /// midline and moving average) for a full regression window; the marker
    /// path needs both bands. With all-20 defaults this is bar 39.
    fn min_bars(&self) -> usize {
        let delta = self.donchian.min_bars().max(self.ma.min_bars());
        let momentum = delta + self.lin_reg.min_bars() - 1;

        momentum
            .max(self.bollinger.min_bars())
            .max(self.keltner.min_bars())
    }
}

impl SqueezeMomentumConfig {
    /// Bollinger Band configuration.
    #[inline]
    #[must_use]
    pub fn bollinger(&self) -> BollingerConfig {
        self.bollinger
    }

    /// Keltner Channel configuration.
    #[inline]
    #[must_use]
    pub fn keltner(&self) -> KeltnerConfig {
        self.keltner
    }

    /// Donchian midline configuration.
    #[inline]
    #[must_use]
    pub fn donchian(&self) -> DonchianConfig {
        self.donchian
    }

    /// Configuration of the moving average inside the delta series.
    #[inline]
    #[must_use]
    pub fn ma(&self) -> MovingAverageConfig {
        self.ma
    }

    /// Momentum regression configuration.
    #[inline]
    #[must_use]
    pub fn lin_reg(&self) -> LinRegConfig {
        self.lin_reg
    }

    /// The standard charted setting: every period 20, Bollinger 2σ, Keltner
    /// 1.5 ATR, simple averages on close throughout.
    #[must_use]
    pub fn default_20() -> Self {
        Self::builder().build()
    }
}

impl Display for SqueezeMomentumConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SqueezeMomentumConfig({}, {}, {}, {}, {})",
            self.bollinger, self.keltner, self.donchian, self.ma, self.lin_reg,
        )
    }
}

/// Builder for [`SqueezeMomentumConfig`].
///
/// Every component defaults to its 20-period setting, so `build` always
/// succeeds; set only the pieces that differ.
pub struct SqueezeMomentumConfigBuilder {
    bollinger: BollingerConfig,
    keltner: KeltnerConfig,
    donchian: DonchianConfig,
    ma: MovingAverageConfig,
    lin_reg: LinRegConfig,
}

impl SqueezeMomentumConfigBuilder {
    fn new() -> Self {
        Self {
            bollinger: BollingerConfig::close(DEFAULT_PERIOD),
            keltner: KeltnerConfig::close(DEFAULT_PERIOD),
            donchian: DonchianConfig::builder().length(DEFAULT_PERIOD).build(),
            ma: MovingAverageConfig::builder().length(DEFAULT_PERIOD).build(),
            lin_reg: LinRegConfig::builder().length(DEFAULT_PERIOD).build(),
        }
    }

    /// Sets the Bollinger Band configuration.
    #[inline]
    #[must_use]
    pub fn bollinger(mut self, bollinger: BollingerConfig) -> Self {
        self.bollinger = bollinger;
        self
    }

    /// Sets the Keltner Channel configuration.
    #[inline]
    #[must_use]
    pub fn keltner(mut self, keltner: KeltnerConfig) -> Self {
        self.keltner = keltner;
        self
    }

    /// Sets the Donchian midline configuration.
    #[inline]
    #[must_use]
    pub fn donchian(mut self, donchian: DonchianConfig) -> Self {
        self.donchian = donchian;
        self
    }

    /// Sets the delta-series moving average configuration.
    #[inline]
    #[must_use]
    pub fn ma(mut self, ma: MovingAverageConfig) -> Self {
        self.ma = ma;
        self
    }

    /// Sets the momentum regression configuration.
    #[inline]
    #[must_use]
    pub fn lin_reg(mut self, lin_reg: LinRegConfig) -> Self {
        self.lin_reg = lin_reg;
        self
    }
}

impl IndicatorConfigBuilder<SqueezeMomentumConfig> for SqueezeMomentumConfigBuilder {
    #[inline]
    fn build(self) -> SqueezeMomentumConfig {
        SqueezeMomentumConfig {
            bollinger: self.bollinger,
            keltner: self.keltner,
            donchian: self.donchian,
            ma: self.ma,
            lin_reg: self.lin_reg,
        }
    }
}

/// Squeeze regime of a single bar.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum SqueezeState {
    /// The Bollinger Band sits strictly inside the Keltner Channel.
    On,
    /// At least one Bollinger edge touches or crosses the Keltner edge.
    Off,
}

impl Display for SqueezeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Per-bar output of the squeeze momentum engine.
///
/// Four sparse slots, one per output series. At most one of
/// (`up`, `down`) and at most one of (`squeeze_on`, `squeeze_off`) is
/// defined on any bar; during warm-up a whole pair is `None`. Markers carry
/// `0.0` as a presence sentinel, histogram slots carry the momentum value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqueezeMomentumValue {
    pub(crate) up: Option<Price>,
    pub(crate) down: Option<Price>,
    pub(crate) squeeze_on: Option<Price>,
    pub(crate) squeeze_off: Option<Price>,
}

impl SqueezeMomentumValue {
    /// Up histogram slot: the momentum when it is positive.
    #[inline]
    #[must_use]
    pub fn up(&self) -> Option<Price> {
        self.up
    }

    /// Down histogram slot: the momentum when it is zero or negative.
    #[inline]
    #[must_use]
    pub fn down(&self) -> Option<Price> {
        self.down
    }

    /// Squeeze-on marker slot, `Some(0.0)` when the squeeze is on.
    #[inline]
    #[must_use]
    pub fn squeeze_on(&self) -> Option<Price> {
        self.squeeze_on
    }

    /// Squeeze-off marker slot, `Some(0.0)` when the squeeze is off.
    #[inline]
    #[must_use]
    pub fn squeeze_off(&self) -> Option<Price> {
        self.squeeze_off
    }

    /// The signed momentum, whichever histogram it landed in.
    #[inline]
    #[must_use]
    pub fn momentum(&self) -> Option<Price> {
        self.up.or(self.down)
    }

    /// The squeeze regime, `None` while the bands are warming up.
    #[inline]
    #[must_use]
    pub fn squeeze(&self) -> Option<SqueezeState> {
        if self.squeeze_on.is_some() {
            Some(SqueezeState::On)
        } else if self.squeeze_off.is_some() {
            Some(SqueezeState::Off)
        } else {
            None
        }
    }
}

impl Display for SqueezeMomentumValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SQZMOM(momentum: ")?;
        match self.momentum() {
            Some(momentum) => write!(f, "{momentum}")?,
            None => f.write_str("none")?,
        }
        f.write_str(", squeeze: ")?;
        match self.squeeze() {
            Some(state) => write!(f, "{state}")?,
            None => f.write_str("none")?,
        }
        f.write_str(")")
    }
}

/// Squeeze momentum indicator (SQZMOM).
///
/// Detects volatility compression by nesting a Bollinger Band inside a
/// Keltner Channel, and measures momentum with a least-squares forecast of
/// how far price has pulled away from its recent range:
///
/// ```text
/// delta    = close − (donchian_midline + ma) / 2
/// momentum = linear regression forecast over the last delta slots
/// squeeze  = bb.upper < kc.upper  AND  bb.lower > kc.lower
/// ```
///
/// Each bar appends one slot to each of four sparse output series: positive
/// momentum fills the up histogram, zero or negative momentum the down
/// histogram, and exactly one squeeze marker fires once both bands are
/// defined. The squeeze comparison is strict, so exactly overlapping bands
/// read as squeeze-off.
///
/// Bars must arrive in strictly increasing `open_time` order; every slot is
/// written once and never revised. A fresh engine replaying the same bars
/// reproduces the series bit for bit.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{SqueezeMomentum, SqueezeMomentumConfig, SqueezeState};
/// # use squeeze_momentum::{Ohlcv, Price, Timestamp};
/// #
/// # struct Bar(f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.0 + 2.0 }
/// #     fn low(&self) -> Price { self.0 - 2.0 }
/// #     fn close(&self) -> Price { self.0 }
/// #     fn open_time(&self) -> Timestamp { self.1 }
/// # }
///
/// let mut engine = SqueezeMomentum::new(SqueezeMomentumConfig::default_20());
///
/// // Feed bars...
/// # for i in 1..=39_u32 {
/// #     engine.compute(&Bar(100.0 + f64::from(i % 4), u64::from(i)));
/// # }
///
/// let value = engine.compute(&Bar(103.0, 40));
/// assert!(value.momentum().is_some());
///
/// match value.squeeze() {
///     Some(SqueezeState::On) => println!("volatility compressed"),
///     Some(SqueezeState::Off) => println!("no squeeze"),
///     None => println!("warming up"),
/// }
/// ```
#[derive(Clone, Debug)]
pub struct SqueezeMomentum {
    config: SqueezeMomentumConfig,
    bollinger: Bollinger,
    keltner: Keltner,
    donchian: DonchianMidline,
    ma: MovingAverage,
    forecast: LinRegForecast,
    delta: Series<Option<Price>>,
    up: Series<Option<Price>>,
    down: Series<Option<Price>>,
    squeeze_on: Series<Option<Price>>,
    squeeze_off: Series<Option<Price>>,
    current: Option<SqueezeMomentumValue>,
}

impl SqueezeMomentum {
    #[must_use]
    pub fn new(config: SqueezeMomentumConfig) -> Self {
        Self {
            config,
            bollinger: Bollinger::new(config.bollinger),
            keltner: Keltner::new(config.keltner),
            donchian: DonchianMidline::new(config.donchian),
            ma: MovingAverage::new(config.ma),
            forecast: LinRegForecast::new(config.lin_reg),
            delta: Series::new(),
            up: Series::new(),
            down: Series::new(),
            squeeze_on: Series::new(),
            squeeze_off: Series::new(),
            current: None,
        }
    }

    /// Processes one bar and returns that bar's output slots.
    ///
    /// Always returns a value; during warm-up its fields are `None`.
    pub fn compute(&mut self, bar: &impl Ohlcv) -> SqueezeMomentumValue {
        let bollinger = self.bollinger.compute(bar);
        let keltner = self.keltner.compute(bar);
        let midline = self.donchian.compute(bar);
        let average = self.ma.compute(bar);

        let slot = match (midline, average) {
            (Some(midline), Some(average)) => {
                Some(bar.close() - f64::midpoint(midline, average))
            }
            _ => None,
        };
        self.delta.push(slot);

        let (up, down) = match self.forecast.compute(slot) {
            Some(momentum) if momentum > 0.0 => (Some(momentum), None),
            Some(momentum) => (None, Some(momentum)),
            None => (None, None),
        };

        let (squeeze_on, squeeze_off) = match (bollinger, keltner) {
            (Some(bb), Some(kc)) => {
                if bb.upper() < kc.upper() && bb.lower() > kc.lower() {
                    (Some(MARKER), None)
                } else {
                    (None, Some(MARKER))
                }
            }
            _ => (None, None),
        };

        self.up.push(up);
        self.down.push(down);
        self.squeeze_on.push(squeeze_on);
        self.squeeze_off.push(squeeze_off);

        let value = SqueezeMomentumValue {
            up,
            down,
            squeeze_on,
            squeeze_off,
        };
        self.current = Some(value);
        value
    }

    /// The most recent bar's output, `None` before the first bar.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<SqueezeMomentumValue> {
        self.current
    }

    #[must_use]
    pub fn config(&self) -> &SqueezeMomentumConfig {
        &self.config
    }

    /// The delta series feeding the momentum regression, one slot per bar.
    #[must_use]
    pub fn delta(&self) -> &Series<Option<Price>> {
        &self.delta
    }

    /// Positive-momentum histogram, one slot per bar.
    #[must_use]
    pub fn up_histogram(&self) -> &Series<Option<Price>> {
        &self.up
    }

    /// Zero-or-negative-momentum histogram, one slot per bar.
    #[must_use]
    pub fn down_histogram(&self) -> &Series<Option<Price>> {
        &self.down
    }

    /// Squeeze-on marker series, one slot per bar.
    #[must_use]
    pub fn squeeze_on(&self) -> &Series<Option<Price>> {
        &self.squeeze_on
    }

    /// Squeeze-off marker series, one slot per bar.
    #[must_use]
    pub fn squeeze_off(&self) -> &Series<Option<Price>> {
        &self.squeeze_off
    }
}

impl Display for SqueezeMomentum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SQZMOM({}, {}, {}, {}, {})",
            self.bollinger, self.keltner, self.donchian, self.ma, self.forecast,
        )
    }
}
