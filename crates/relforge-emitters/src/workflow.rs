//! CI release-workflow emitter.

use relforge_domain::{CiGenerationLevel, Configuration, ContainerRegistry};

/// Render the CI release workflow for a configuration.
///
/// The `on:` section concatenates the trigger patterns in enum
/// declaration order. The single `releaser` job checks out the
/// repository, sets up the toolchain, and runs the release tool;
/// container support adds registry credentials and signing adds a
/// cosign install step plus token permissions.
pub fn emit_workflow(config: &Configuration) -> String {
    let mut out = String::new();

    out.push_str("name: Release\n");

    out.push_str("\non:\n");
    for trigger in config.ordered_triggers() {
        for line in trigger.ci_pattern().lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }

    if config.signing_level.is_enabled() {
        out.push_str("\npermissions:\n");
        out.push_str("  id-token: write\n");
        out.push_str("  contents: write\n");
    }

    out.push_str("\njobs:\n");
    out.push_str("  releaser:\n");
    out.push_str("    runs-on: ubuntu-latest\n");
    out.push_str("    steps:\n");

    out.push_str("      - name: Checkout\n");
    out.push_str("        uses: actions/checkout@v4\n");
    out.push_str("        with:\n");
    out.push_str("          fetch-depth: 0\n");

    out.push_str("\n      - name: Setup toolchain\n");
    out.push_str("        uses: actions/setup-go@v5\n");
    out.push_str("        with:\n");
    out.push_str("          go-version: 'stable'\n");

    if config.ci_generation_level == CiGenerationLevel::Advanced {
        out.push_str("\n      - name: Cache build artifacts\n");
        out.push_str("        uses: actions/cache@v4\n");
        out.push_str("        with:\n");
        out.push_str("          path: ~/go/pkg/mod\n");
        out.push_str(
            "          key: ${{ runner.os }}-build-${{ hashFiles('**/go.sum') }}\n",
        );
    }

    if config.signing_level.is_enabled() {
        out.push_str("\n      - name: Install cosign\n");
        out.push_str("        uses: sigstore/cosign-installer@v3\n");
    }

    out.push_str("\n      - name: Run releaser\n");
    out.push_str("        uses: releaser/releaser-action@v5\n");
    out.push_str("        with:\n");
    out.push_str("          version: latest\n");
    out.push_str("          args: release --clean\n");

    if config.should_emit_containers() {
        out.push_str("        env:\n");
        match config.effective_registry() {
            ContainerRegistry::Ghcr => {
                out.push_str("          GITHUB_TOKEN: ${{ secrets.GITHUB_TOKEN }}\n");
            }
            _ => {
                out.push_str("          DOCKER_USERNAME: ${{ secrets.DOCKER_USERNAME }}\n");
                out.push_str("          DOCKER_PASSWORD: ${{ secrets.DOCKER_PASSWORD }}\n");
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use relforge_domain::{
        Architecture, ContainerSupport, Platform, ProjectKind, SigningLevel, TriggerKind,
    };
    use relforge_validation::{validate_rendered_artifact, ArtifactKind};

    fn base_config() -> Configuration {
        let mut config = Configuration::new();
        config.project_name = "my-cli".to_string();
        config.project_kind = ProjectKind::Cli;
        config.platforms = vec![Platform::Linux];
        config.architectures = vec![Architecture::Amd64];
        config.ci_generation_level = CiGenerationLevel::Basic;
        config.triggers = vec![TriggerKind::VersionTags];
        config.apply_defaults();
        config
    }

    #[test]
    fn workflow_is_named_release() {
        let workflow = emit_workflow(&base_config());
        assert!(workflow.starts_with("name: Release\n"));
    }

    #[test]
    fn version_tag_trigger_is_indented_under_on() {
        let workflow = emit_workflow(&base_config());
        assert!(workflow.contains("\non:\n  push:\n    tags:\n      - 'v*'\n"));
    }

    #[test]
    fn triggers_concatenate_in_declaration_order() {
        let mut config = base_config();
        config.triggers = vec![TriggerKind::Manual, TriggerKind::VersionTags];
        let workflow = emit_workflow(&config);
        let tags_at = workflow.find("push:").unwrap();
        let manual_at = workflow.find("workflow_dispatch:").unwrap();
        assert!(tags_at < manual_at);
    }

    #[test]
    fn the_job_runs_on_ubuntu_latest() {
        let workflow = emit_workflow(&base_config());
        assert!(workflow.contains("  releaser:\n    runs-on: ubuntu-latest\n"));
        assert!(workflow.contains("          fetch-depth: 0\n"));
        assert!(workflow.contains("          args: release --clean\n"));
    }

    #[test]
    fn container_support_exposes_the_provider_token() {
        let mut config = base_config();
        config.container_support = ContainerSupport::BuildAndPublish;
        config.apply_defaults();
        let workflow = emit_workflow(&config);
        assert!(workflow.contains("          GITHUB_TOKEN: ${{ secrets.GITHUB_TOKEN }}\n"));
    }

    #[test]
    fn hub_containers_use_username_and_password() {
        let mut config = base_config();
        config.container_support = ContainerSupport::BuildAndPublish;
        config.container_registry = Some(relforge_domain::ContainerRegistry::DockerHub);
        let workflow = emit_workflow(&config);
        assert!(workflow.contains("DOCKER_USERNAME: ${{ secrets.DOCKER_USERNAME }}"));
        assert!(workflow.contains("DOCKER_PASSWORD: ${{ secrets.DOCKER_PASSWORD }}"));
        assert!(!workflow.contains("GITHUB_TOKEN"));
    }

    #[test]
    fn signing_adds_permissions_and_cosign() {
        let mut config = base_config();
        config.signing_level = SigningLevel::Basic;
        let workflow = emit_workflow(&config);
        assert!(workflow.contains("\npermissions:\n  id-token: write\n  contents: write\n"));
        assert!(workflow.contains("      - name: Install cosign\n"));
        let cosign_at = workflow.find("Install cosign").unwrap();
        let release_at = workflow.find("Run releaser").unwrap();
        assert!(cosign_at < release_at);
    }

    #[test]
    fn advanced_level_inserts_a_cache_step() {
        let mut config = base_config();
        config.ci_generation_level = CiGenerationLevel::Advanced;
        let workflow = emit_workflow(&config);
        assert!(workflow.contains("      - name: Cache build artifacts\n"));
        let cache_at = workflow.find("Cache build artifacts").unwrap();
        let release_at = workflow.find("Run releaser").unwrap();
        assert!(cache_at < release_at);

        let basic = emit_workflow(&base_config());
        assert!(!basic.contains("Cache build artifacts"));
    }

    #[test]
    fn emitted_workflows_pass_the_artifact_scan() {
        let mut config = base_config();
        config.container_support = ContainerSupport::BuildAndPublish;
        config.signing_level = SigningLevel::Basic;
        config.ci_generation_level = CiGenerationLevel::Advanced;
        config.apply_defaults();
        let workflow = emit_workflow(&config);
        validate_rendered_artifact(&workflow, ArtifactKind::CiWorkflow)
            .expect("emitted workflow must pass the scan");
    }

    #[test]
    fn emission_is_deterministic() {
        let config = base_config();
        assert_eq!(emit_workflow(&config), emit_workflow(&config.clone()));
    }

    #[test]
    fn output_has_clean_line_hygiene() {
        let workflow = emit_workflow(&base_config());
        assert!(workflow.ends_with('\n'));
        for line in workflow.lines() {
            assert_eq!(line, line.trim_end(), "trailing whitespace in {line:?}");
        }
    }
}
