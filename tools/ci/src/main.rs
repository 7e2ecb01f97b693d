use bitflags::bitflags;
use itertools::Itertools;
use xshell::{cmd, Shell};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Check: u32 {
        const FORMAT = 1 << 0;
        const CLIPPY = 1 << 1;
        const TEST = 1 << 2;
        const DOC_TEST = 1 << 3;
        const DEMOS = 1 << 4;
        const BENCH_CHECK = 1 << 5;
    }
}

impl Check {
    fn from_arg(arg: &str) -> Option<Check> {
        match arg {
            "format" => Some(Check::FORMAT),
            "clippy" => Some(Check::CLIPPY),
            "test" => Some(Check::TEST),
            "doctest" => Some(Check::DOC_TEST),
            "demos" => Some(Check::DEMOS),
            "bench-check" => Some(Check::BENCH_CHECK),
            _ => None,
        }
    }
}

fn main() {
    // When run locally, results may differ from actual CI runs
    // - Official CI runs latest stable
    // - Local runs use whatever the default Rust is locally
    //
    // Pass any of `format`, `clippy`, `test`, `doctest`, `demos` or `bench-check` to run a subset.

    let args: Vec<String> = std::env::args().skip(1).collect();
    let unknown = args
        .iter()
        .filter(|arg| Check::from_arg(arg).is_none())
        .join(", ");
    if !unknown.is_empty() {
        panic!("Unknown checks: {unknown}");
    }

    let checks = args
        .iter()
        .filter_map(|arg| Check::from_arg(arg))
        .fold(Check::empty(), |checks, check| checks | check);
    let checks = if checks.is_empty() {
        Check::all()
    } else {
        checks
    };

    let sh = Shell::new().expect("Failed to open a shell");

    if checks.contains(Check::FORMAT) {
        // See if any code needs to be formatted
        cmd!(sh, "cargo fmt --all -- --check")
            .run()
            .expect("Please run `cargo fmt --all` to format your code.");
    }

    if checks.contains(Check::CLIPPY) {
        // See if clippy has any complaints.
        // - Type complexity must be ignored because we use huge templates for queries
        cmd!(
            sh,
            "cargo clippy --workspace --all-targets -- -D warnings -A clippy::type_complexity"
        )
        .run()
        .expect("Please fix `cargo clippy` errors.");
    }

    if checks.contains(Check::TEST) {
        // Unit and integration tests
        cmd!(sh, "cargo test --workspace --lib --bins --tests")
            .run()
            .expect("Please fix failing tests.");
    }

    if checks.contains(Check::DOC_TEST) {
        // The README is included in the crate docs, so this covers it too
        cmd!(sh, "cargo test --workspace --doc")
            .run()
            .expect("Please fix failing doc tests.");
    }

    if checks.contains(Check::DEMOS) {
        // The headless demo runs to completion without a window
        cmd!(sh, "cargo run --example headless_walk")
            .run()
            .expect("Please fix the `headless_walk` demo.");
    }

    if checks.contains(Check::BENCH_CHECK) {
        cmd!(sh, "cargo check --benches")
            .run()
            .expect("Please fix compiler errors in benchmarks.");
    }
}
