#![allow(dead_code)]

use serde::{Deserialize, de::DeserializeOwned};
use squeeze_momentum::{Ohlcv, Price, Timestamp};

/// OHLC bar parsed from the fixture CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub open_time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Ohlcv for RefBar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn open_time(&self) -> Timestamp {
        self.open_time
    }
}

/// Reference value with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub open_time: u64,
    pub expected: f64,
}

/// Reference band triple with timestamp (Bollinger and Keltner).
#[derive(Debug, Deserialize)]
pub struct RefBandValue {
    pub open_time: u64,
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Reference squeeze row with timestamp. Empty CSV fields are undefined
/// slots, so every row mirrors one bar of engine output.
#[derive(Debug, Deserialize)]
pub struct RefSqueezeValue {
    pub open_time: u64,
    pub up: Option<f64>,
    pub down: Option<f64>,
    pub squeeze_on: Option<f64>,
    pub squeeze_off: Option<f64>,
}

const OHLCV_PATH: &str = "tests/fixtures/data/bars-1h.csv";

/// Load the fixture OHLC bars.
pub fn load_reference_ohlcvs() -> Vec<RefBar> {
    load_records(OHLCV_PATH, "invalid OHLC record")
}

/// Load single-value reference data (SMA, EMA, Donchian).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Load band reference data (upper, middle, lower).
pub fn load_band_ref(path: &str) -> Vec<RefBandValue> {
    load_records(path, "invalid band reference record")
}

/// Load squeeze reference data (one row per bar).
pub fn load_squeeze_ref(path: &str) -> Vec<RefSqueezeValue> {
    load_records(path, "invalid squeeze reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Assert an optional value matches an optional reference slot.
pub fn assert_slot_near(
    actual: Option<f64>,
    expected: Option<f64>,
    tolerance: f64,
    context: &str,
) {
    match (actual, expected) {
        (None, None) => {}
        (Some(a), Some(e)) => assert_near(a, e, tolerance, context),
        (a, e) => panic!("{context}: expected {e:?}, got {a:?}"),
    }
}

/// Generate a reference match test for a single-value indicator.
///
/// Usage: `reference_test!(sma_20, Sma, SmaConfig::close(nz(20)), "tests/fixtures/data/sma-20-close.csv", 1e-6);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $ind:ty, $config:expr, $ref_path:expr, $tolerance:expr) => {
        mod $name {
            use super::fixtures::*;
            use squeeze_momentum::*;
            use std::num::NonZero;

            fn nz(n: usize) -> NonZero<usize> {
                NonZero::new(n).unwrap()
            }

            #[test]
            fn matches_reference() {
                let bars = load_reference_ohlcvs();
                let reference = load_ref_values($ref_path);
                let config = $config;
                let mut ind = <$ind>::new(config);

                let mut ref_idx = 0;
                for bar in &bars {
                    ind.compute(bar);

                    if ref_idx < reference.len()
                        && bar.open_time == reference[ref_idx].open_time
                    {
                        let value = ind.value().unwrap_or_else(|| {
                            panic!("{} returned None at t={}", stringify!($name), bar.open_time)
                        });
                        assert_near(
                            value,
                            reference[ref_idx].expected,
                            $tolerance,
                            &format!(
                                "{} at bar {ref_idx} (t={})",
                                stringify!($name),
                                bar.open_time
                            ),
                        );
                        ref_idx += 1;
                    }
                }

                assert_eq!(
                    ref_idx,
                    reference.len(),
                    "not all reference values checked: {ref_idx}/{}",
                    reference.len()
                );
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
