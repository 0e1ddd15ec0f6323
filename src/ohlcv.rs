/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar open timestamp or sequence number.
///
/// Orders the bar stream. Must be strictly increasing between
/// consecutive calls to [`Indicator::compute`](crate::Indicator::compute).
pub type Timestamp = u64;

/// OHLC bar data used as input to all indicators.
///
/// Implement this on your own kline/candle type to avoid per-bar
/// conversion. Indicators accept `&impl Ohlcv` and extract the
/// configured [`PriceSource`](crate::PriceSource) internally.
///
/// # Closed bars only
///
/// Every call with a fresh [`open_time`](Ohlcv::open_time) is treated as a
/// finished bar and advances the window. Feed closed bars; streaming partial
/// updates of the current bar would each be counted as a new bar.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{Ohlcv, Price, Timestamp};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64,
///     ts: u64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn open_time(&self) -> Timestamp { self.ts }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Bar open timestamp or sequence number.
    ///
    /// Values must be strictly increasing between calls. Behaviour is
    /// undefined if `open_time` repeats or decreases.
    fn open_time(&self) -> Timestamp;
}
