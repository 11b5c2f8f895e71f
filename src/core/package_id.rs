//! Binary package identity.
//!
//! Two configurations share a package id when they would produce the same
//! exported environment. The consumer's compiler and target architecture do
//! not take part: the toolchain is a build-machine tool.

use crate::core::options::OptionSet;
use crate::core::settings::Settings;
use crate::util::hash::Fingerprint;

/// Compute the package id for an option set and the build settings.
pub fn package_id(options: &OptionSet, settings: &Settings) -> String {
    let mut fp = Fingerprint::new();

    for (key, value) in options.iter() {
        if value.is_inherit() {
            continue;
        }
        fp.update_str(key).update_str(&value.to_string());
    }

    fp.update_str("os_build").update_str(&settings.os_build);
    // Same build serves x86 and x86_64 on Windows.
    if !settings.os_build.eq_ignore_ascii_case("windows") {
        fp.update_str("arch_build").update_str(&settings.arch_build);
    }
    fp.update_str("build_type").update_str(&settings.build_type);

    fp.finish()
}
