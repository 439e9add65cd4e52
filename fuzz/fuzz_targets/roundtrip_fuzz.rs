#![no_main]
use libfuzzer_sys::fuzz_target;
use rlelz::codec::window::{self, WindowConfig};
use rlelz::codec::rle;
use rlelz::frame;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First two bytes pick the window-match configuration.
    let config = WindowConfig {
        window_size: data[0] as usize,
        min_match: (data[1] & 0x7F) as usize,
        allow_overlap: data[1] & 0x80 == 0,
    };
    let payload = &data[2..];

    let encoded = rle::encode(payload);
    assert_eq!(rle::decode(&encoded).unwrap(), payload);

    let encoded = window::encode_with(payload, &config);
    assert_eq!(window::decode(&encoded).unwrap(), payload);

    let (algorithm, framed) = frame::encode_framed_auto(payload);
    let (decoded_with, decoded) = frame::decode_framed(&framed).unwrap();
    assert_eq!(decoded_with, algorithm);
    assert_eq!(decoded, payload);
});
