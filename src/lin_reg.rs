use std::{collections::VecDeque, fmt::Display, num::NonZero};

use crate::{IndicatorConfig, IndicatorConfigBuilder, Price};

/// Configuration for the linear regression forecast ([`LinRegForecast`]).
///
/// # Example
///
/// ```
/// use squeeze_momentum::{IndicatorConfig, IndicatorConfigBuilder, LinRegConfig};
/// use std::num::NonZero;
///
/// let config = LinRegConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .build();
///
/// assert_eq!(config.min_bars(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct LinRegConfig {
    length: usize,
}

impl IndicatorConfig for LinRegConfig {
    type Builder = LinRegConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        LinRegConfigBuilder::new()
    }

    #[inline]
    fn min_bars(&self) -> usize {
        self.length
    }
}

impl LinRegConfig {
    /// Regression window length (number of slots).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Display for LinRegConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LinRegConfig({})", self.length)
    }
}

/// Builder for [`LinRegConfig`].
///
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct LinRegConfigBuilder {
    length: Option<usize>,
}

impl LinRegConfigBuilder {
    fn new() -> Self {
        Self { length: None }
    }

    /// Sets the regression window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }
}

impl IndicatorConfigBuilder<LinRegConfig> for LinRegConfigBuilder {
    #[inline]
    fn build(self) -> LinRegConfig {
        LinRegConfig {
            length: self.length.expect("length is required"),
        }
    }
}

/// Least-squares linear regression forecast over a sliding window of slots.
///
/// Fits `y = intercept + slope × t` to the last `length` slots (`t` counting
/// `0..length` from the oldest) and evaluates the fitted line at the newest
/// slot, `t = length − 1`:
///
/// ```text
/// slope     = (n × Σty − Σt × Σy) / (n × Σtt − (Σt)²)
/// intercept = (Σy − slope × Σt) / n
/// forecast  = intercept + slope × (n − 1)
/// ```
///
/// Consumes one slot per bar rather than the bar itself, so it plugs into
/// derived series whose early entries are undefined. The forecast is `None`
/// until `length` consecutive defined slots have arrived; a single undefined
/// slot resets that streak. With `length` of 1 the forecast is the slot
/// itself.
///
/// # Example
///
/// ```
/// use squeeze_momentum::{IndicatorConfig, IndicatorConfigBuilder, LinRegConfig, LinRegForecast};
/// use std::num::NonZero;
///
/// let config = LinRegConfig::builder()
///     .length(NonZero::new(3).unwrap())
///     .build();
/// let mut forecast = LinRegForecast::new(config);
///
/// forecast.compute(Some(3.0));
/// forecast.compute(Some(5.0));
///
/// // Slots fall on the line y = 3 + 2t, forecast at t = 2
/// assert_eq!(forecast.compute(Some(7.0)), Some(7.0));
/// ```
#[derive(Clone, Debug)]
pub struct LinRegForecast {
    config: LinRegConfig,
    length: usize,
    length_f: f64,
    sum_t: f64,
    denominator: f64,
    window: VecDeque<Option<Price>>,
    streak: usize,
    current: Option<Price>,
}

impl LinRegForecast {
    #[must_use]
    pub fn new(config: LinRegConfig) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let length_f = config.length as f64;
        let sum_t = length_f * (length_f - 1.0) / 2.0;
        let sum_tt = length_f * (length_f - 1.0) * (2.0f64.mul_add(length_f, -1.0)) / 6.0;

        Self {
            config,
            length: config.length,
            length_f,
            sum_t,
            denominator: length_f.mul_add(sum_tt, -(sum_t * sum_t)),
            window: VecDeque::with_capacity(config.length),
            streak: 0,
            current: None,
        }
    }

    /// Pushes the next slot and returns the forecast, or `None` while any of
    /// the last `length` slots is undefined.
    pub fn compute(&mut self, slot: Option<Price>) -> Option<Price> {
        if self.window.len() == self.length {
            self.window.pop_front();
        }
        self.window.push_back(slot);
        self.streak = match slot {
            Some(_) => self.streak + 1,
            None => 0,
        };

        self.current = (self.streak >= self.length).then(|| self.forecast());
        self.current
    }

    /// The most recent forecast, `None` until the first defined one.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<Price> {
        self.current
    }

    #[must_use]
    pub fn config(&self) -> &LinRegConfig {
        &self.config
    }

    fn forecast(&self) -> Price {
        let mut t: f64 = 0.0;
        let mut sum_y = 0.0;
        let mut sum_ty = 0.0;

        for slot in &self.window {
            let y = slot
                .expect("LinRegForecast invariant violation: streak should cover the full window");
            sum_y += y;
            sum_ty = t.mul_add(y, sum_ty);
            t += 1.0;
        }

        // A single point has no slope; the forecast is the point
        if self.length == 1 {
            return sum_y;
        }

        let slope = self.length_f.mul_add(sum_ty, -(self.sum_t * sum_y)) / self.denominator;
        let intercept = (sum_y - slope * self.sum_t) / self.length_f;

        slope.mul_add(self.length_f - 1.0, intercept)
    }
}

impl Display for LinRegForecast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LinRegForecast({})", self.length)
    }
}
