use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=memory.x");

    // Only the stm32 feature links against memory.x; host builds
    // (tests, simulation) must not see a linker script.
    if env::var_os("CARGO_FEATURE_STM32").is_some() {
        let out = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
        fs::copy("memory.x", out.join("memory.x")).expect("copy memory.x");
        println!("cargo:rustc-link-search={}", out.display());
    }
}
