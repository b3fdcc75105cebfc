use std::env;

/// Cargo target variables re-exported to the crate, as `(source, embedded name)`.
const TARGET_VARS: &[(&str, &str)] = &[
    ("TARGET", "ARCH_INFO_TARGET"),
    ("CARGO_CFG_TARGET_ARCH", "ARCH_INFO_TARGET_ARCH"),
    ("CARGO_CFG_TARGET_ENDIAN", "ARCH_INFO_TARGET_ENDIAN"),
    ("CARGO_CFG_TARGET_POINTER_WIDTH", "ARCH_INFO_TARGET_POINTER_WIDTH"),
];

fn main() {
    // Cargo sets these for every build script; they describe the target being
    // compiled for, not the machine doing the compiling.
    for (source, embedded) in TARGET_VARS {
        let missing = format!("{source} not set by Cargo");
        let value = env::var(source).expect(&missing);
        println!("cargo:rustc-env={embedded}={value}");
    }

    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    println!("cargo:rustc-env=ARCH_INFO_BUILD_TIMESTAMP={timestamp}");

    println!("cargo:rerun-if-changed=build.rs");
}
