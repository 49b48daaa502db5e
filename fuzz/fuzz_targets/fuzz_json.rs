#![no_main]

use curtain_pricing::{io::read_json_from_bytes, models::PriceMode, pricing::PriceEngine};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(catalog) = read_json_from_bytes(data, "fuzz") {
        let engine = PriceEngine::default();
        for product in &catalog.products {
            let _ = product.price(250.0, 300.0, PriceMode::Platform, &engine).describe();
        }
    }
});
