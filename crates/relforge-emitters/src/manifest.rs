//! Release-tool manifest emitter.

use relforge_domain::{Configuration, ContainerRegistry};
use relforge_validation::escape_yaml;

/// Render the release manifest for a configuration.
///
/// Top-level key order is fixed: `project_name`, `project_description?`,
/// `builds`, `archives`, `release`, `dockers?`, `sboms?`, `signs?`,
/// `brews?`, `snapcrafts?`. Platform and architecture lists follow enum
/// declaration order with duplicates collapsed.
pub fn emit_manifest(config: &Configuration) -> String {
    let mut out = String::new();

    out.push_str("project_name: ");
    out.push_str(&escape_yaml(&config.project_name));
    out.push('\n');

    if let Some(description) = config.description.as_deref() {
        if !description.is_empty() {
            out.push_str("project_description: ");
            out.push_str(&escape_yaml(description));
            out.push('\n');
        }
    }

    emit_builds(config, &mut out);
    emit_archives(&mut out);
    emit_release(config, &mut out);

    if config.should_emit_containers() {
        emit_dockers(config, &mut out);
    }

    if config.emit_sbom {
        out.push_str("\nsboms:\n  - artifacts: archive\n");
    }

    if config.signing_level.is_enabled() {
        emit_signs(&mut out);
    }

    if config.package_homebrew {
        out.push_str("\nbrews:\n  - repository:\n      owner: YOUR_USER\n      name: homebrew-tap\n");
    }

    if config.package_snap {
        out.push_str("\nsnapcrafts:\n  - summary: ");
        out.push_str(&escape_yaml(&format!("{} release build", config.project_name)));
        out.push('\n');
    }

    out
}

fn emit_builds(config: &Configuration, out: &mut String) {
    out.push_str("\nbuilds:\n");
    out.push_str("  - env:\n");
    out.push_str(&format!(
        "      - NATIVE_COMPILATION={}\n",
        config.native_compilation.env_value()
    ));

    out.push_str("    goos:\n");
    for platform in config.ordered_platforms() {
        out.push_str(&format!("      - {}\n", platform.slug()));
    }

    out.push_str("    goarch:\n");
    for arch in config.ordered_architectures() {
        out.push_str(&format!("      - {}\n", arch.slug()));
    }

    if !config.entry_path.is_empty() {
        out.push_str("    main: ");
        out.push_str(&escape_yaml(&config.entry_path));
        out.push('\n');
    }

    if !config.binary_name.is_empty() {
        out.push_str("    binary: ");
        out.push_str(&escape_yaml(&config.binary_name));
        out.push('\n');
    }

    if config.inject_version_info {
        out.push_str("    ldflags:\n");
        out.push_str("      - -s -w -X main.version={{ .Version }}\n");
    }

    if !config.build_flags.is_empty() {
        out.push_str("    tags:\n");
        for flag in &config.build_flags {
            out.push_str(&format!("      - {}\n", escape_yaml(&flag.name)));
        }
    }
}

fn emit_archives(out: &mut String) {
    out.push_str("\narchives:\n");
    out.push_str("  - format: tar.gz\n");
    out.push_str(
        "    name_template: '{{ .ProjectName }}_{{ .Version }}_{{ .Os }}_{{ .Arch }}'\n",
    );
}

fn emit_release(config: &Configuration, out: &mut String) {
    out.push_str("\nrelease:\n");
    out.push_str(&format!("  {}:\n", config.hosting_provider.slug()));
    out.push_str("    owner: YOUR_USER\n");
    out.push_str("    name: ");
    out.push_str(&escape_yaml(&config.project_name));
    out.push('\n');
}

fn emit_dockers(config: &Configuration, out: &mut String) {
    let image = config.effective_image_name();
    let registry = config.effective_registry();

    out.push_str("\ndockers:\n");
    for platform in config.ordered_platforms() {
        out.push_str(&format!("  - goos: {}\n", platform.slug()));
        out.push_str("    image_templates:\n");
        out.push_str(&format!("      - '{}'\n", image_template(registry, &image)));
    }
}

fn image_template(registry: ContainerRegistry, image: &str) -> String {
    match registry {
        ContainerRegistry::Ghcr => {
            format!("ghcr.io/YOUR_USER/{image}:{{{{ .Tag }}}}")
        }
        _ => format!("YOUR_USER/{image}:{{{{ .Tag }}}}"),
    }
}

fn emit_signs(out: &mut String) {
    out.push_str("\nsigns:\n");
    out.push_str("  - cmd: cosign\n");
    out.push_str("    artifacts: checksum\n");
    out.push_str("    args:\n");
    out.push_str("      - sign-blob\n");
    out.push_str("      - '--yes'\n");
    out.push_str("      - '${artifact}'\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use relforge_domain::{
        Architecture, ContainerSupport, Platform, ProjectKind, SigningLevel,
    };

    fn s1_config() -> Configuration {
        let mut config = Configuration::new();
        config.project_name = "my-cli".to_string();
        config.project_kind = ProjectKind::Cli;
        config.platforms = vec![Platform::Linux, Platform::Darwin, Platform::Windows];
        config.architectures = vec![Architecture::Amd64, Architecture::Arm64];
        config.apply_defaults();
        config
    }

    #[test]
    fn manifest_begins_with_the_project_name() {
        let manifest = emit_manifest(&s1_config());
        assert!(manifest.starts_with("project_name: my-cli\n"));
    }

    #[test]
    fn goos_and_goarch_follow_declaration_order() {
        let mut config = s1_config();
        // Scrambled and duplicated input order must not show through.
        config.platforms = vec![
            Platform::Windows,
            Platform::Linux,
            Platform::Darwin,
            Platform::Linux,
        ];
        config.architectures = vec![
            Architecture::Arm64,
            Architecture::Amd64,
            Architecture::Arm64,
        ];
        let manifest = emit_manifest(&config);
        assert!(manifest.contains("      - linux\n      - darwin\n      - windows\n"));
        assert!(manifest.contains("      - amd64\n      - arm64\n"));
    }

    #[test]
    fn s1_has_no_dockers_block() {
        let manifest = emit_manifest(&s1_config());
        assert!(!manifest.contains("dockers:"));
    }

    #[test]
    fn container_configs_get_the_registry_prefixed_template() {
        let mut config = s1_config();
        config.container_support = ContainerSupport::BuildAndPublish;
        config.apply_defaults();
        let manifest = emit_manifest(&config);
        assert!(manifest.contains("dockers:"));
        assert!(manifest.contains("ghcr.io/YOUR_USER/my-cli:{{ .Tag }}"));
    }

    #[test]
    fn hub_templates_have_no_registry_host() {
        let mut config = s1_config();
        config.container_support = ContainerSupport::BuildAndPublish;
        config.container_registry = Some(relforge_domain::ContainerRegistry::DockerHub);
        config.apply_defaults();
        let manifest = emit_manifest(&config);
        assert!(manifest.contains("      - 'YOUR_USER/my-cli:{{ .Tag }}'"));
        assert!(!manifest.contains("ghcr.io"));
    }

    #[test]
    fn native_compilation_env_reflects_the_setting() {
        let config = s1_config();
        let manifest = emit_manifest(&config);
        assert!(manifest.contains("      - NATIVE_COMPILATION=0\n"));

        let mut native = s1_config();
        native.native_compilation = relforge_domain::NativeCompilation::Required;
        let manifest = emit_manifest(&native);
        assert!(manifest.contains("      - NATIVE_COMPILATION=1\n"));
    }

    #[test]
    fn release_block_is_keyed_by_the_provider_slug() {
        let manifest = emit_manifest(&s1_config());
        assert!(manifest.contains("\nrelease:\n  github:\n    owner: YOUR_USER\n    name: my-cli\n"));
    }

    #[test]
    fn sbom_and_sign_blocks_are_conditional() {
        let mut config = s1_config();
        let plain = emit_manifest(&config);
        assert!(!plain.contains("sboms:"));
        assert!(!plain.contains("signs:"));

        config.emit_sbom = true;
        config.signing_level = SigningLevel::Basic;
        let rich = emit_manifest(&config);
        assert!(rich.contains("\nsboms:\n  - artifacts: archive\n"));
        assert!(rich.contains("\nsigns:\n  - cmd: cosign\n"));
    }

    #[test]
    fn emission_is_deterministic() {
        let config = s1_config();
        assert_eq!(emit_manifest(&config), emit_manifest(&config.clone()));
    }

    #[test]
    fn output_has_clean_line_hygiene() {
        let mut config = s1_config();
        config.description = Some("A release helper".to_string());
        config.emit_sbom = true;
        config.package_homebrew = true;
        config.package_snap = true;
        let manifest = emit_manifest(&config);
        assert!(manifest.ends_with('\n'));
        assert!(!manifest.ends_with("\n\n"));
        for line in manifest.lines() {
            assert_eq!(line, line.trim_end(), "trailing whitespace in {line:?}");
        }
    }

    #[test]
    fn manifest_parses_as_yaml() {
        let mut config = s1_config();
        config.description = Some("A release helper".to_string());
        config.container_support = ContainerSupport::BuildAndPublish;
        config.emit_sbom = true;
        config.signing_level = SigningLevel::Basic;
        config.apply_defaults();
        let manifest = emit_manifest(&config);
        let value: serde_yaml::Value = serde_yaml::from_str(&manifest).expect("valid yaml");
        assert!(value.get("builds").is_some());
        assert!(value.get("dockers").is_some());
    }

    #[test]
    fn emitted_manifests_pass_the_artifact_scan() {
        let mut config = s1_config();
        config.description = Some("A release helper".to_string());
        config.container_support = ContainerSupport::BuildAndPublish;
        config.emit_sbom = true;
        config.signing_level = SigningLevel::Basic;
        config.package_homebrew = true;
        config.package_snap = true;
        config.apply_defaults();
        let manifest = emit_manifest(&config);
        relforge_validation::validate_rendered_artifact(
            &manifest,
            relforge_validation::ArtifactKind::Manifest,
        )
        .expect("emitted manifest must pass the scan");
    }

    #[test]
    fn archive_template_is_fixed() {
        let manifest = emit_manifest(&s1_config());
        assert!(manifest.contains(
            "    name_template: '{{ .ProjectName }}_{{ .Version }}_{{ .Os }}_{{ .Arch }}'\n"
        ));
        assert!(manifest.contains("  - format: tar.gz\n"));
    }
}
