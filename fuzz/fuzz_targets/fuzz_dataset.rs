#![no_main]

use geoquest::Dataset;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Anything that parses must satisfy the loader's guarantees
    if let Ok(dataset) = Dataset::from_json(text) {
        assert!(!dataset.is_empty());
        for region in dataset.regions() {
            assert!(region.cities.contains_key(&region.capital));
            assert!(region.boundary.len() >= 3);
            assert_eq!(dataset.region(&region.id), Some(region));
        }
    }
});
