use crate::Ohlcv;

use std::{
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters
/// (length, price source, etc). Configs are value types: cheap to clone,
/// compare, and hash.
pub trait IndicatorConfig: Sized + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder with default values.
    fn builder() -> Self::Builder;

    /// Number of bars that must be fed before the indicator yields its first
    /// defined value.
    ///
    /// [`Indicator::compute`] returns `None` for the first `min_bars() - 1`
    /// bars and `Some` from bar `min_bars()` on.
    fn min_bars(&self) -> usize;
}

/// Builder for an [`IndicatorConfig`].
///
/// Setters are inherent methods on each builder type; the trait only fixes the
/// terminal [`build`](IndicatorConfigBuilder::build) step.
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Builds the config. Panics if required fields are missing.
    #[must_use]
    fn build(self) -> Config;
}

/// A streaming technical indicator.
///
/// Indicators maintain internal state and update incrementally on each call to
/// [`compute`](Indicator::compute). Output is `None` until the warm-up window
/// described by [`IndicatorConfig::min_bars`] has been filled.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{Sma, SmaConfig, Indicator, IndicatorConfig};
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
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. `f64` for simple indicators,
    /// a struct for composite ones (e.g. Bollinger Bands).
    type Output: Send + Sync + Display + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// Feeds a closed bar and returns the updated indicator value,
    /// or `None` while still warming up.
    fn compute(&mut self, bar: &impl Ohlcv) -> Option<Self::Output>;

    /// Returns the last computed indicator value without advancing state,
    /// or `None` while still warming up.
    ///
    /// This is a cached field read — O(1) with no computation.
    fn value(&self) -> Option<Self::Output>;
}

/// Band width multiplier for Bollinger Bands and Keltner Channels.
///
/// Wraps a finite, non-negative `f64`. The constructor panics on negative,
/// NaN, or infinite values. Zero is allowed and collapses the bands onto
/// their midline.
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is safe because
/// NaN is rejected at construction.
#[derive(Clone, Copy, Debug)]
pub struct Multiplier(f64);

impl Multiplier {
    /// Creates a new band width multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `value` is negative, NaN, or infinite.
    #[must_use]
    pub fn new(value: f64) -> Self {
        assert!(value.is_finite(), "multiplier must be finite");
        assert!(value >= 0.0, "multiplier must not be negative");
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Multiplier {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Multiplier {}

impl Hash for Multiplier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod multiplier {
        use super::*;
        use std::collections::HashSet;

        #[test]
        #[allow(clippy::float_cmp)]
        fn wraps_the_value() {
            assert_eq!(Multiplier::new(1.5).value(), 1.5);
        }

        #[test]
        #[allow(clippy::float_cmp)]
        fn zero_is_allowed() {
            assert_eq!(Multiplier::new(0.0).value(), 0.0);
        }

        #[test]
        #[should_panic(expected = "multiplier must not be negative")]
        fn rejects_negative() {
            let _ = Multiplier::new(-2.0);
        }

        #[test]
        #[should_panic(expected = "multiplier must be finite")]
        fn rejects_nan() {
            let _ = Multiplier::new(f64::NAN);
        }

        #[test]
        #[should_panic(expected = "multiplier must be finite")]
        fn rejects_infinity() {
            let _ = Multiplier::new(f64::INFINITY);
        }

        #[test]
        fn usable_as_hash_key() {
            let mut set = HashSet::new();
            set.insert(Multiplier::new(2.0));

            assert!(set.contains(&Multiplier::new(2.0)));
            assert!(!set.contains(&Multiplier::new(1.5)));
        }
    }
}
