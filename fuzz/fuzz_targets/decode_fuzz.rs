#![no_main]
use libfuzzer_sys::fuzz_target;
use rlelz::codec::{rle, window};
use rlelz::frame;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode or fail cleanly, never panic.
    let _ = rle::decode(data);
    let _ = window::decode(data);
    let _ = frame::decode_framed(data);
});
