#![no_main]
use libfuzzer_sys::fuzz_target;

const SUBCOMMANDS: [&str; 5] = ["compress", "decompress", "select", "inspect", "config"];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };

    // Lead with a real subcommand so the fuzzer reaches its argument parsers.
    let mut args = vec![SUBCOMMANDS[selector as usize % SUBCOMMANDS.len()].to_string()];
    let text = String::from_utf8_lossy(rest);
    args.extend(text.split_whitespace().take(32).map(str::to_string));
    rlelz::cli::fuzz_try_parse_args(&args);
});
