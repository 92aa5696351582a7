//! Non-interactive generation from flags.

use tracing::info;

use relforge_domain::ConfigState;
use relforge_validation::ConfigValidator;

use crate::flags::GenerateFlags;
use crate::report::Report;

use super::{run_generation, shielded, UseCaseOptions};

/// Populate a configuration from flags, validate it, and run the
/// generation plan. Never panics across the boundary.
pub async fn generate_workflow(flags: GenerateFlags, opts: UseCaseOptions) -> Report {
    shielded(generate_inner(flags, opts)).await
}

async fn generate_inner(flags: GenerateFlags, opts: UseCaseOptions) -> Report {
    let mut report = Report::new();

    let mut config = match flags.into_configuration() {
        Ok(config) => config,
        Err(err) => {
            report.add_error(err);
            return report;
        }
    };

    info!(project = %config.project_name, "generating release configuration");

    let validation = ConfigValidator::new().validate(&config);
    for warning in validation.warnings {
        report.add_warning(warning);
    }

    if !validation.ok {
        for error in validation.errors {
            report.add_error(error);
        }
        let _ = config.transition_to(ConfigState::Invalid);
        report.final_state = Some(config.state());
        return report;
    }

    if let Err(err) = config.transition_to(ConfigState::Valid) {
        report.add_error(err);
        report.final_state = Some(config.state());
        return report;
    }

    run_generation(&mut config, &opts, &mut report).await;
    report
}
