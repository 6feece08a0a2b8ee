#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtree::{from_bytes, to_bytes, NamedTag};

fuzz_target!(|root: NamedTag| {
    // Generated trees passed construction checks, so encoding cannot fail.
    let bytes = to_bytes(&root).unwrap();
    assert_eq!(from_bytes(&bytes).unwrap(), root);
});
