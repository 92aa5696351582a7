//! Property-based tests for the lifecycle state machine.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::config::Configuration;
    use crate::error::ErrorCode;
    use crate::state::ConfigState;

    fn state_strategy() -> impl Strategy<Value = ConfigState> {
        prop::sample::select(ConfigState::ALL.to_vec())
    }

    /// Walk a configuration into `target` along allowed edges only.
    fn configuration_in_state(target: ConfigState) -> Configuration {
        let mut config = Configuration::new();
        config.project_name = "probe".to_string();
        match target {
            ConfigState::Draft => {}
            ConfigState::Valid => {
                config.transition_to(ConfigState::Valid).unwrap();
            }
            ConfigState::Invalid => {
                config.transition_to(ConfigState::Invalid).unwrap();
            }
            ConfigState::Processing => {
                config.transition_to(ConfigState::Valid).unwrap();
                config.transition_to(ConfigState::Processing).unwrap();
            }
            ConfigState::Generated => {
                config.transition_to(ConfigState::Valid).unwrap();
                config.transition_to(ConfigState::Processing).unwrap();
                config.transition_to(ConfigState::Generated).unwrap();
            }
        }
        config
    }

    proptest! {
        /// Property: for every pair of states, `transition_to` succeeds
        /// exactly when the pair is an edge of the lifecycle graph, and a
        /// rejected transition leaves the aggregate unchanged.
        #[test]
        fn prop_transitions_match_the_edge_table(
            from in state_strategy(),
            to in state_strategy(),
        ) {
            let mut config = configuration_in_state(from);
            let before = config.clone();
            let result = config.transition_to(to);

            if from.allows_transition_to(to) {
                prop_assert!(result.is_ok());
                prop_assert_eq!(config.state(), to);
            } else {
                let err = result.unwrap_err();
                prop_assert_eq!(err.code, ErrorCode::InvalidStateTransition);
                prop_assert_eq!(&config, &before);
            }
        }

        /// Property: no sequence of allowed transitions escapes the
        /// Generated state.
        #[test]
        fn prop_generated_is_absorbing(to in state_strategy()) {
            let mut config = configuration_in_state(ConfigState::Generated);
            prop_assert!(config.transition_to(to).is_err());
            prop_assert_eq!(config.state(), ConfigState::Generated);
        }
    }

    #[test]
    fn every_state_is_reachable_through_allowed_edges() {
        for state in ConfigState::ALL {
            assert_eq!(configuration_in_state(state).state(), state);
        }
    }
}
