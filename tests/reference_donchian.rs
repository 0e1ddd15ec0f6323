mod fixtures;

use fixtures::reference_test;

// Tolerance 1e-6: the midline is a midpoint of two window extremes,
// both reproduced exactly by the reference, so only representation
// noise remains.
reference_test!(
    donchian_20,
    DonchianMidline,
    DonchianConfig::builder().length(nz(20)).build(),
    "tests/fixtures/data/donchian-20.csv",
    1e-6
);
