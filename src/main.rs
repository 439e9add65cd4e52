fn main() {
    #[cfg(feature = "cli")]
    rlelz::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("rlelz: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
