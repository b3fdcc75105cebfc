use std::{fmt, io::Write};

use tracing::{debug, trace};

//
// ──────────────────────────────────────────────────────────────────────────────
//  BUILD TARGET
// ──────────────────────────────────────────────────────────────────────────────
//
// Everything here is fixed when the binary is compiled. build.rs re-exports
// Cargo's target variables as ARCH_INFO_* so that a cross-compiled artifact
// describes the machine it was built *for*. Nothing is queried at runtime.
//

/// Printed when no rule matches the compilation target.
pub const UNKNOWN: &str = "Architecture: Unknown";

/// UTC time the build script ran.
pub const BUILD_TIMESTAMP: &str = env!("ARCH_INFO_BUILD_TIMESTAMP");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Parses the value of `CARGO_CFG_TARGET_ENDIAN`.
    pub fn from_cfg(value: &str) -> Self {
        match value {
            "big" => Endian::Big,
            _ => Endian::Little,
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endian::Little => f.write_str("little"),
            Endian::Big => f.write_str("big"),
        }
    }
}

/// 32-bit ARM architecture revisions that have a canonical platform string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmRevision {
    /// ARMv6, including the J, K, Z, ZK and T2 variants.
    V6,
    /// ARMv7-A (application profile).
    V7A,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTarget {
    pub triple: &'static str,
    pub arch: &'static str,
    pub endian: Endian,
    pub pointer_width: u32,
}

impl BuildTarget {
    /// The target this binary was compiled for.
    pub fn current() -> Self {
        BuildTarget {
            triple: env!("ARCH_INFO_TARGET"),
            arch: env!("ARCH_INFO_TARGET_ARCH"),
            endian: Endian::from_cfg(env!("ARCH_INFO_TARGET_ENDIAN")),
            pointer_width: env!("ARCH_INFO_TARGET_POINTER_WIDTH")
                .parse()
                .unwrap_or_default(),
        }
    }

    /// Revision of a 32-bit ARM target, read from the triple's sub-architecture.
    ///
    /// rustc reports every 32-bit ARM target as `arch = "arm"`; the revision
    /// only shows up in the first segment of the triple (`armv7`, `armv6k`,
    /// `thumbv7neon`, ...). The bare `arm` prefix names Rust's ARMv6 Linux
    /// targets. M- and R-profile cores and Apple's `v7s`/`v7k` have no platform
    /// string and yield `None`.
    pub fn arm_revision(&self) -> Option<ArmRevision> {
        if self.arch != "arm" {
            return None;
        }

        let sub = self.triple.split('-').next().unwrap_or_default();

        if sub == "arm" {
            return Some(ArmRevision::V6);
        }

        let rev = sub
            .strip_prefix("arm")
            .or_else(|| sub.strip_prefix("thumb"))?;

        // armv7s/armv7k (Apple) are their own revisions, not v7-A.
        if let Some(profile) = rev.strip_prefix("v7") {
            return matches!(profile, "" | "a" | "neon").then_some(ArmRevision::V7A);
        }

        if let Some(variant) = rev.strip_prefix("v6") {
            return (!variant.starts_with('m')).then_some(ArmRevision::V6);
        }

        None
    }

    fn is_mips64(&self) -> bool {
        matches!(self.arch, "mips64" | "mips64r6")
    }
}

//
// ──────────────────────────────────────────────────────────────────────────────
//  ARCHITECTURE MAPPING TABLE
// ──────────────────────────────────────────────────────────────────────────────
//
// Rules are evaluated top to bottom and the first match wins. Order matters:
// little-endian MIPS64 must be tested before generic MIPS64, which would
// otherwise claim it. Keep this a slice, never a map.
//

pub struct Rule {
    /// Short label used in logs and the `--info` report.
    pub name: &'static str,
    /// Canonical platform string.
    pub platform: &'static str,
    matches: fn(&BuildTarget) -> bool,
}

impl Rule {
    pub fn matches(&self, target: &BuildTarget) -> bool {
        (self.matches)(target)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("platform", &self.platform)
            .finish()
    }
}

pub static RULES: &[Rule] = &[
    Rule {
        name: "x86_64",
        platform: "linux/amd64",
        matches: |t| t.arch == "x86_64",
    },
    Rule {
        name: "aarch64",
        platform: "linux/arm64",
        matches: |t| t.arch == "aarch64",
    },
    Rule {
        name: "riscv64",
        platform: "linux/riscv64",
        matches: |t| t.arch == "riscv64",
    },
    // Both big- and little-endian PowerPC64 report as ppc64le.
    Rule {
        name: "powerpc64",
        platform: "linux/ppc64le",
        matches: |t| t.arch == "powerpc64",
    },
    Rule {
        name: "s390x",
        platform: "linux/s390x",
        matches: |t| t.arch == "s390x",
    },
    Rule {
        name: "x86",
        platform: "linux/386",
        matches: |t| t.arch == "x86",
    },
    Rule {
        name: "mips64el",
        platform: "linux/mips64le",
        matches: |t| t.is_mips64() && t.endian == Endian::Little,
    },
    Rule {
        name: "mips64",
        platform: "linux/mips64",
        matches: |t| t.is_mips64(),
    },
    Rule {
        name: "armv7-a",
        platform: "linux/arm/v7",
        matches: |t| t.arm_revision() == Some(ArmRevision::V7A),
    },
    Rule {
        name: "armv6",
        platform: "linux/arm/v6",
        matches: |t| t.arm_revision() == Some(ArmRevision::V6),
    },
];

//
// ──────────────────────────────────────────────────────────────────────────────
//  RESOLUTION
// ──────────────────────────────────────────────────────────────────────────────
//

/// First rule in [`RULES`] matching `target`, or `None` when the fallback applies.
pub fn matching_rule(target: &BuildTarget) -> Option<&'static Rule> {
    RULES.iter().find(|rule| {
        let hit = rule.matches(target);
        trace!(rule = rule.name, hit, "evaluated rule");
        hit
    })
}

/// Canonical platform string for `target`. Never fails: unmatched targets
/// resolve to [`UNKNOWN`].
pub fn classify(target: &BuildTarget) -> &'static str {
    match matching_rule(target) {
        Some(rule) => {
            debug!(rule = rule.name, platform = rule.platform, "matched");
            rule.platform
        }
        None => {
            debug!(triple = target.triple, arch = target.arch, "no rule matched");
            UNKNOWN
        }
    }
}

/// Canonical platform string for the target this binary was compiled for.
pub fn resolve() -> &'static str {
    let target = BuildTarget::current();
    debug!(
        triple = target.triple,
        arch = target.arch,
        endian = %target.endian,
        pointer_width = target.pointer_width,
        "resolving build target"
    );
    classify(&target)
}

/// Writes the resolved platform as a single newline-terminated line.
pub fn write_platform<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", resolve())
}

/// Writes the `--info` build report for `target`, platform line first.
pub fn write_info<W: Write>(out: &mut W, target: &BuildTarget) -> std::io::Result<()> {
    let rule = matching_rule(target);
    let platform = rule.map_or(UNKNOWN, |r| r.platform);

    writeln!(out, "Platform: {platform}")?;
    writeln!(out, "Target triple: {}", target.triple)?;
    writeln!(out, "Target arch: {}", target.arch)?;
    writeln!(out, "Endianness: {}", target.endian)?;
    writeln!(out, "Pointer width: {}", target.pointer_width)?;
    writeln!(out, "Matched rule: {}", rule.map_or("fallback", |r| r.name))?;
    writeln!(out, "Built: {BUILD_TIMESTAMP}")?;

    Ok(())
}

#[cfg(test)]
mod common;
