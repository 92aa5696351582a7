//! Property-based tests for default application.
//!
//! Applying defaults twice must be indistinguishable from applying them
//! once, for every reachable configuration shape.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::architecture::Architecture;
    use crate::config::Configuration;
    use crate::levels::{CiGenerationLevel, ContainerSupport, NativeCompilation};
    use crate::platform::Platform;
    use crate::project_kind::ProjectKind;

    fn project_kind_strategy() -> impl Strategy<Value = ProjectKind> {
        prop::sample::select(ProjectKind::ALL.to_vec())
    }

    fn platforms_strategy() -> impl Strategy<Value = Vec<Platform>> {
        prop::collection::vec(prop::sample::select(Platform::ALL.to_vec()), 0..4)
    }

    fn architectures_strategy() -> impl Strategy<Value = Vec<Architecture>> {
        prop::collection::vec(prop::sample::select(Architecture::ALL.to_vec()), 0..4)
    }

    fn configuration_strategy() -> impl Strategy<Value = Configuration> {
        (
            "[a-z][a-z0-9-]{0,20}",
            project_kind_strategy(),
            platforms_strategy(),
            architectures_strategy(),
            prop::bool::ANY,
            prop::bool::ANY,
        )
            .prop_map(|(name, kind, platforms, architectures, container, ci)| {
                let mut config = Configuration::new();
                config.project_name = name;
                config.project_kind = kind;
                config.platforms = platforms;
                config.architectures = architectures;
                if container {
                    config.container_support = ContainerSupport::BuildAndPublish;
                }
                if ci {
                    config.ci_generation_level = CiGenerationLevel::Basic;
                }
                config
            })
    }

    proptest! {
        /// Property: `apply_defaults` is idempotent.
        #[test]
        fn prop_apply_defaults_is_idempotent(config in configuration_strategy()) {
            let mut once = config.clone();
            once.apply_defaults();

            let mut twice = once.clone();
            twice.apply_defaults();

            prop_assert_eq!(once, twice);
        }

        /// Property: defaults always leave non-empty platform and
        /// architecture sets behind.
        #[test]
        fn prop_defaults_fill_required_sets(config in configuration_strategy()) {
            let mut filled = config;
            filled.apply_defaults();
            prop_assert!(!filled.platforms.is_empty());
            prop_assert!(!filled.architectures.is_empty());
        }

        /// Property: container-enabled configurations end up with a
        /// registry and an image name after defaults.
        #[test]
        fn prop_container_defaults_are_complete(config in configuration_strategy()) {
            let mut filled = config;
            filled.container_support = ContainerSupport::BuildAndPublish;
            filled.apply_defaults();
            prop_assert!(filled.container_registry.is_some());
            prop_assert!(filled.container_image.is_some());
        }

        /// Property: defaults never downgrade an explicit Required
        /// native-compilation setting.
        #[test]
        fn prop_required_native_compilation_survives(config in configuration_strategy()) {
            let mut filled = config;
            filled.native_compilation = NativeCompilation::Required;
            filled.apply_defaults();
            prop_assert_eq!(filled.native_compilation, NativeCompilation::Required);
        }
    }
}
