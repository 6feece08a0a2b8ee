#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtree::{from_bytes_with_opts, to_bytes, DecodeOpts};

fuzz_target!(|data: &[u8]| {
    if let Ok(root) = from_bytes_with_opts(data, DecodeOpts::new().max_seq_len(100)) {
        let bytes = to_bytes(&root).unwrap();
        assert_eq!(nbtree::from_bytes(&bytes).unwrap(), root);

        // Duplicate names collapse on decode, so only a second pass is
        // guaranteed to be byte identical.
        let again = nbtree::from_bytes(&bytes).unwrap();
        assert_eq!(to_bytes(&again).unwrap(), bytes);
    }
});
