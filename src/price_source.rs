use crate::{Ohlcv, Price};

use std::fmt::{Debug, Display};

/// Price series extracted from an [`Ohlcv`] bar before feeding into an
/// indicator.
///
/// Every indicator is configured with a `PriceSource` selecting which raw or
/// derived value it runs on. The squeeze engine defaults to [`Close`] for the
/// moving averages and bands, [`High`]/[`Low`] for the channel extremes and
/// [`TrueRange`] for average true range, but any component can be pointed at
/// any source.
///
/// [`Close`]: PriceSource::Close
/// [`High`]: PriceSource::High
/// [`Low`]: PriceSource::Low
/// [`TrueRange`]: PriceSource::TrueRange
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Closing price.
    #[default]
    Close,
    /// Lowest price.
    Low,
    /// Median price: `(high + low) / 2`.
    HL2,
    /// Typical price: `(high + low + close) / 3`.
    HLC3,
    /// Average price: `(open + high + low + close) / 4`.
    OHLC4,
    /// Weighted close: `(high + low + close + close) / 4`.
    HLCC4,
    /// True range: `max(high - low, |high - prev_close|, |low - prev_close|)`.
    ///
    /// On the first bar (no previous close), falls back to `high - low`.
    TrueRange,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl PriceSource {
    #[inline]
    pub(crate) fn extract(self, bar: &impl Ohlcv, prev_close: Option<Price>) -> Price {
        match self {
            Self::Open => bar.open(),
            Self::High => bar.high(),
            Self::Close => bar.close(),
            Self::Low => bar.low(),
            Self::HL2 => f64::midpoint(bar.high(), bar.low()),
            Self::HLC3 => (bar.high() + bar.low() + bar.close()) / 3.0,
            Self::OHLC4 => (bar.open() + bar.high() + bar.low() + bar.close()) / 4.0,
            Self::HLCC4 => (bar.high() + bar.low() + bar.close() + bar.close()) / 4.0,
            Self::TrueRange => {
                let hl = bar.high() - bar.low();

                match prev_close {
                    Some(prev_close) => {
                        let hc = (bar.high() - prev_close).abs();
                        let lc = (bar.low() - prev_close).abs();
                        hl.max(hc).max(lc)
                    }
                    None => hl,
                }
            }
        }
    }
}
