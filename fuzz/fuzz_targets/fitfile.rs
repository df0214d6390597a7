#![no_main]

use libfuzzer_sys::fuzz_target;
use fitscope::{CodecConfig, FitFile};

fuzz_target!(|data: &[u8]| {
    if let Ok(fit) = FitFile::from_mem_with_config(data.to_vec(), CodecConfig::lenient()) {
        // whatever decodes must encode back to the same bytes
        let encoded = fit.to_memory().unwrap();
        assert_eq!(encoded, data);
    }
});
