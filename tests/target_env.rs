// The build script must embed the target, not the host.
use arch_info::BuildTarget;

#[test]
fn test_embedded_triple_starts_with_arch_family() {
    let target = BuildTarget::current();
    let sub = target.triple.split('-').next().unwrap_or_default();

    let expected_prefixes = match target.arch {
        "x86" => vec!["i386", "i586", "i686"],
        "arm" => vec!["arm", "thumb"],
        "mips64" | "mips64r6" => vec!["mips"],
        other => vec![other],
    };

    assert!(
        expected_prefixes.iter().any(|p| sub.starts_with(p)),
        "triple {} does not fit arch {}",
        target.triple,
        target.arch
    );
}

#[test]
fn test_embedded_triple_names_compiled_os() {
    let target = BuildTarget::current();
    let mut segments = target.triple.split('-').skip(1);

    // std names macOS "macos"; triples spell it "darwin".
    let os = match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    };

    assert!(
        segments.any(|segment| segment.starts_with(os)),
        "triple {} does not name os {os}",
        target.triple
    );
}
