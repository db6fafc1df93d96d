use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=SEED_ANALYZER_VERSION");
    let version = env::var("SEED_ANALYZER_VERSION")
        .unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap());
    println!("cargo:rustc-env=SEED_ANALYZER_VERSION={version}");
}
