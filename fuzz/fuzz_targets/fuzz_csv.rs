#![no_main]

use curtain_pricing::{io::read_csv_from_bytes, models::PriceMode, pricing::PriceEngine};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(catalog) = read_csv_from_bytes(data, "fuzz") {
        let engine = PriceEngine::default();
        for product in &catalog.products {
            for mode in [PriceMode::Standard, PriceMode::Platform] {
                let _ = product.price(120.0, 210.0, mode, &engine).describe();
            }
        }
    }
});
