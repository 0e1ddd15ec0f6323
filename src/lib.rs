//! Streaming squeeze momentum indicator for Rust.
//!
//! The [`SqueezeMomentum`] engine consumes one closed OHLC bar per call
//! through the [`Ohlcv`] trait and appends to four sparse output series:
//! up/down momentum histograms and squeeze on/off markers. The windowed
//! calculators it is built from ([`Sma`], [`Ema`], [`Wma`], [`StdDev`],
//! [`Atr`], [`RollingMax`], [`RollingMin`]) and the band compositions
//! ([`Bollinger`], [`Keltner`], [`DonchianMidline`]) are exported on their
//! own as well. Values are `None` until a calculator's window has filled.
//!
//! Each indicator type exposes [`new`](Sma::new), [`compute`](Sma::compute),
//! and [`value`](Sma::value) as inherent methods; no trait import needed.
//! Import [`Indicator`] only for generic code.

mod atr;
mod bollinger;
mod donchian;
mod ema;
mod indicator;
mod keltner;
mod lin_reg;
mod moving_average;
mod ohlcv;
mod price_source;
mod price_window;
mod rolling_extrema;
mod series;
mod sma;
mod squeeze;
mod std_dev;
mod wma;

pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder, Multiplier};
pub use crate::ohlcv::{Ohlcv, Price, Timestamp};
pub use crate::price_source::PriceSource;
pub use crate::series::Series;

pub use crate::atr::{Atr, AtrConfig, AtrConfigBuilder};
pub use crate::bollinger::{Bollinger, BollingerConfig, BollingerConfigBuilder, BollingerValue};
pub use crate::donchian::{DonchianConfig, DonchianConfigBuilder, DonchianMidline};
pub use crate::ema::{Ema, EmaConfig, EmaConfigBuilder};
pub use crate::keltner::{Keltner, KeltnerConfig, KeltnerConfigBuilder, KeltnerValue};
pub use crate::lin_reg::{LinRegConfig, LinRegConfigBuilder, LinRegForecast};
pub use crate::moving_average::{
    MaType, MovingAverage, MovingAverageConfig, MovingAverageConfigBuilder,
};
pub use crate::rolling_extrema::{
    RollingMax, RollingMaxConfig, RollingMaxConfigBuilder, RollingMin, RollingMinConfig,
    RollingMinConfigBuilder,
};
pub use crate::sma::{Sma, SmaConfig, SmaConfigBuilder};
pub use crate::squeeze::{
    SqueezeMomentum, SqueezeMomentumConfig, SqueezeMomentumConfigBuilder, SqueezeMomentumValue,
    SqueezeState,
};
pub use crate::std_dev::{StdDev, StdDevConfig, StdDevConfigBuilder};
pub use crate::wma::{Wma, WmaConfig, WmaConfigBuilder};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&mut self, bar: &impl Ohlcv) -> Option<$output> {
                <Self as Indicator>::compute(self, bar)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<$output> {
                <Self as Indicator>::value(self)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, Price);
impl_indicator_methods!(Ema, EmaConfig, Price);
impl_indicator_methods!(Wma, WmaConfig, Price);
impl_indicator_methods!(MovingAverage, MovingAverageConfig, Price);
impl_indicator_methods!(StdDev, StdDevConfig, Price);
impl_indicator_methods!(Atr, AtrConfig, Price);
impl_indicator_methods!(RollingMax, RollingMaxConfig, Price);
impl_indicator_methods!(RollingMin, RollingMinConfig, Price);
impl_indicator_methods!(Bollinger, BollingerConfig, BollingerValue);
impl_indicator_methods!(Keltner, KeltnerConfig, KeltnerValue);
impl_indicator_methods!(DonchianMidline, DonchianConfig, Price);

#[cfg(test)]
mod test_util;

#[cfg(test)]
mod inherent_methods {
    use super::{
        Bollinger, BollingerConfig, BollingerValue, MovingAverage, MovingAverageConfig, Ohlcv,
        Price, Sma, SmaConfig, SqueezeMomentum, SqueezeMomentumConfig, Timestamp,
    };
    use std::num::NonZero;

    struct Bar(f64, u64);
    impl Ohlcv for Bar {
        fn open(&self) -> Price {
            self.0
        }
        fn high(&self) -> Price {
            self.0
        }
        fn low(&self) -> Price {
            self.0
        }
        fn close(&self) -> Price {
            self.0
        }
        fn open_time(&self) -> Timestamp {
            self.1
        }
    }

    #[test]
    fn sma_without_indicator_import() {
        let mut sma = Sma::new(SmaConfig::close(NonZero::new(2).unwrap()));
        assert_eq!(sma.compute(&Bar(10.0, 1)), None);
        assert_eq!(sma.compute(&Bar(20.0, 2)), Some(15.0));
        assert_eq!(sma.value(), Some(15.0));
    }

    #[test]
    fn moving_average_without_indicator_import() {
        let mut ma = MovingAverage::new(MovingAverageConfig::close(NonZero::new(2).unwrap()));
        assert_eq!(ma.compute(&Bar(10.0, 1)), None);
        assert_eq!(ma.compute(&Bar(20.0, 2)), Some(15.0));
        assert_eq!(ma.value(), Some(15.0));
    }

    #[test]
    fn bollinger_without_indicator_import() {
        let mut bb = Bollinger::new(BollingerConfig::close(NonZero::new(2).unwrap()));
        assert!(bb.compute(&Bar(10.0, 1)).is_none());
        let v: Option<BollingerValue> = bb.compute(&Bar(20.0, 2));
        assert!(v.is_some());
        assert!(bb.value().is_some());
    }

    #[test]
    fn squeeze_engine_without_indicator_import() {
        let mut engine = SqueezeMomentum::new(SqueezeMomentumConfig::default_20());
        let value = engine.compute(&Bar(10.0, 1));
        assert_eq!(value.momentum(), None);
        assert!(engine.value().is_some());
    }
}
