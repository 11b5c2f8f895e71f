//! Option synchronisation between the wrapper and the LLVM dependency.
//!
//! The wrapper mirrors a subset of its options onto the dependency. Both
//! directions are checked: every mirrored key the wrapper sets must be
//! declared by the dependency, and every option the dependency declares must
//! be known to the catalog.

use std::collections::BTreeSet;

use crate::core::catalog::{self, OptionScope};
use crate::core::options::OptionSet;
use crate::util::diagnostic::ConfigError;

/// Propagate mirrored wrapper options onto the dependency.
///
/// `dependency_options` is the dependency's declared option set; its keys
/// are the declared keys and its values are kept wherever the wrapper
/// inherits. Returns the option set to hand to the dependency.
pub fn synchronize(
    dependency: &str,
    local_options: &OptionSet,
    dependency_options: &OptionSet,
) -> Result<OptionSet, ConfigError> {
    let declared: BTreeSet<&str> = dependency_options.keys().collect();
    let mirrored = catalog::mirrored_keys();

    let mut synced = dependency_options.clone();

    for (key, value) in local_options.iter() {
        if !mirrored.contains(key) {
            continue;
        }
        if !declared.contains(key) {
            return Err(ConfigError::MissingInDependency {
                key: key.to_string(),
                dependency: dependency.to_string(),
            });
        }
        if value.is_inherit() {
            continue;
        }

        tracing::debug!("{}:{} = {}", dependency, key, value);
        synced.set(key, value.clone());
    }

    Ok(synced)
}

/// Check that the dependency exposes no option the catalog does not know.
///
/// `known_keys` are the keys the wrapper mirrors; passthrough keys of the
/// catalog are exempt.
pub fn verify_consistency(
    dependency: &str,
    dependency_options: &OptionSet,
    known_keys: &BTreeSet<&str>,
) -> Result<(), ConfigError> {
    let passthrough = catalog::keys_in(OptionScope::Passthrough);

    for key in dependency_options.keys() {
        if known_keys.contains(key) || passthrough.contains(key) {
            continue;
        }
        return Err(ConfigError::UnknownDependencyOption {
            key: key.to_string(),
            dependency: dependency.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::OptionValue;

    fn dependency() -> OptionSet {
        catalog::dependency_defaults()
    }

    #[test]
    fn test_synchronize_propagates_non_inherit_values() {
        let local = catalog::wrapper_defaults()
            .with("link_ltinfo", true)
            .with("use_sanitizer", "Address")
            .with("link_libcxx", OptionValue::Inherit);

        let synced = synchronize("llvm_9", &local, &dependency()).unwrap();

        assert!(synced.bool_or("link_ltinfo", false));
        assert_eq!(synced.text("use_sanitizer"), Some("Address"));
        // Inherited keeps the dependency's own value.
        assert!(synced.bool_or("link_libcxx", false));
        // Wrapper-only options never cross the boundary.
        assert!(!synced.contains_key("compile_with_clang"));
    }

    #[test]
    fn test_synchronize_matches_wrapper_for_every_mirrored_key() {
        let local = catalog::wrapper_defaults()
            .with("force_x86_64", false)
            .with("with_lldb", true)
            .with("target_riscv", true);

        let synced = synchronize("llvm_9", &local, &dependency()).unwrap();

        for key in catalog::mirrored_keys() {
            if let Some(value) = local.get(key) {
                assert_eq!(synced.get(key), Some(value), "mismatch for {}", key);
            }
        }
    }

    #[test]
    fn test_synchronize_fails_on_undeclared_mirrored_key() {
        let mut dep = OptionSet::new();
        for (key, value) in dependency().iter() {
            if key != "link_ltinfo" {
                dep.set(key, value.clone());
            }
        }

        let err = synchronize("llvm_9", &catalog::wrapper_defaults(), &dep).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingInDependency {
                key: "link_ltinfo".into(),
                dependency: "llvm_9".into(),
            }
        );
    }

    #[test]
    fn test_synchronize_fails_even_when_value_is_inherit() {
        let dep = OptionSet::new().with("link_libcxx", true);
        let local = OptionSet::new().with("link_ltinfo", OptionValue::Inherit);

        assert!(synchronize("llvm_9", &local, &dep).is_err());
    }

    #[test]
    fn test_verify_consistency_accepts_catalog() {
        verify_consistency("llvm_9", &dependency(), &catalog::mirrored_keys()).unwrap();
    }

    #[test]
    fn test_verify_consistency_allows_passthrough() {
        let dep = dependency().with("llvm_build_type", "Debug");
        verify_consistency("llvm_9", &dep, &catalog::mirrored_keys()).unwrap();
    }

    #[test]
    fn test_verify_consistency_rejects_unknown_dependency_option() {
        let dep = dependency().with("enable_lsan", false);
        let err = verify_consistency("llvm_9", &dep, &catalog::mirrored_keys()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownDependencyOption { ref key, .. } if key == "enable_lsan"
        ));
    }
}
