//! Originating server detection from embedded signature strings

use std::sync::LazyLock;

use super::tags::TagPattern;

/// Where a platform leaves its fingerprint in a record
#[derive(Debug, Clone, Copy)]
pub struct PlatformSignature {
    pub name: &'static str,
    pub tag: &'static str,
    pub identifier: &'static str,
}

/// Known platforms, checked in this order. The first hit wins.
pub const PLATFORMS: &[PlatformSignature] = &[
    PlatformSignature {
        name: "OGS",
        tag: "PC",
        identifier: "OGS:",
    },
    PlatformSignature {
        name: "KGS",
        tag: "PC",
        identifier: "The KGS Go Server",
    },
    PlatformSignature {
        name: "Tygem",
        tag: "PC",
        identifier: "Tygem",
    },
    PlatformSignature {
        name: "WBaduk",
        tag: "PC",
        identifier: "wbaduk",
    },
    PlatformSignature {
        name: "CyberOro",
        tag: "US",
        identifier: "www.cyberoro.com",
    },
    PlatformSignature {
        name: "IGS",
        tag: "PC",
        identifier: "IGS:",
    },
    PlatformSignature {
        name: "Fox",
        tag: "AP",
        identifier: "foxwq",
    },
    PlatformSignature {
        name: "DGS",
        tag: "PC",
        identifier: "Dragon Go Server",
    },
    PlatformSignature {
        name: "GoShrine",
        tag: "PC",
        identifier: "GoShrine",
    },
    PlatformSignature {
        name: "INGO",
        tag: "PC",
        identifier: "Played on INGO",
    },
    PlatformSignature {
        name: "LankeWeiqi",
        tag: "PC",
        identifier: "烂柯围棋网",
    },
];

static SIGNATURE_PATTERNS: LazyLock<Vec<(PlatformSignature, TagPattern)>> = LazyLock::new(|| {
    PLATFORMS
        .iter()
        .map(|sig| (*sig, TagPattern::new(sig.tag)))
        .collect()
});

/// Name of the first platform whose tag value starts with its identifier.
///
/// Returns `None` when no signature matches. Prefix matching is case-sensitive.
pub fn classify_platform(text: &str) -> Option<&'static str> {
    SIGNATURE_PATTERNS.iter().find_map(|(sig, pattern)| {
        pattern
            .find_all(text)
            .iter()
            .any(|value| value.starts_with(sig.identifier))
            .then_some(sig.name)
    })
}
