//! Target generation: render a manifest target and write its output file

use crate::config::ModelConfig;
use crate::error::{DtigError, Result};
use crate::project::{Project, Target};
use crate::template::TemplateEngine;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Render one target and write its output
///
/// # Steps
/// 1. Load the project's model configuration
/// 2. Read the template (path relative to the project root)
/// 3. Render with the target language's callbacks and `[render]` limits
/// 4. Write to a temp file next to the output → atomic rename
///
/// Returns the path written. Nothing is written when rendering fails.
pub fn generate_target(project: &Project, target: &Target) -> Result<PathBuf> {
    let model = project.model()?;
    render_target(project, target, &model)
}

/// Render every target in manifest order
///
/// Stops at the first failing target; outputs already written stay.
/// Returns the written paths.
pub fn generate_all(project: &Project) -> Result<Vec<PathBuf>> {
    let model = project.model()?;
    info!(
        project = project.name(),
        targets = project.manifest().targets.len(),
        model = %model.summary(),
        "generating project"
    );

    project
        .manifest()
        .targets
        .iter()
        .map(|target| render_target(project, target, &model))
        .collect()
}

fn render_target(project: &Project, target: &Target, model: &ModelConfig) -> Result<PathBuf> {
    let template_path = project.resolve(&target.template)?;
    let output_path = project.resolve(&target.output)?;

    let template = fs::read_to_string(&template_path).map_err(|e| DtigError::TemplateRead {
        path: template_path.clone(),
        reason: e.to_string(),
    })?;

    let engine = TemplateEngine::with_options(
        target.language.callbacks(),
        project.manifest().render_options(),
    );
    let rendered = engine
        .render(&template, model)
        .map_err(|source| DtigError::RenderFailed {
            template: target.template.display().to_string(),
            source,
        })?;

    let parent = output_path
        .parent()
        .ok_or_else(|| DtigError::Generic(format!("invalid output path '{}'", output_path.display())))?;
    fs::create_dir_all(parent)?;

    // Atomic rename: temp file in the same directory → output
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(rendered.as_bytes())?;
    temp.persist(&output_path).map_err(|e| DtigError::IoError(e.error))?;

    debug!(
        template = %target.template.display(),
        output = %output_path.display(),
        language = %target.language,
        bytes = rendered.len(),
        "generated target"
    );
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::project::MANIFEST_FILE;
    use dtig_testkit::{temp_dir_in_workspace, write_project};
    use std::path::Path;

    fn load(root: &Path) -> Project {
        Project::load(root.to_path_buf()).unwrap()
    }

    #[test]
    fn test_generate_single_target() {
        let temp = temp_dir_in_workspace();
        write_project(temp.path());
        let project = load(temp.path());

        let target = &project.manifest().targets[0];
        let written = generate_target(&project, target).unwrap();

        assert_eq!(written, temp.path().join("generated/server.py"));
        let content = fs::read_to_string(&written).unwrap();
        assert!(content.contains("if ref == \"throttle\":"));
        assert!(content.contains("    value = dtig_utils.MF32()"));
        assert!(content.contains("elif ref == \"brake\":"));
    }

    #[test]
    fn test_generate_all_targets() {
        let temp = temp_dir_in_workspace();
        write_project(temp.path());
        let project = load(temp.path());

        let written = generate_all(&project).unwrap();
        assert_eq!(written.len(), 2);

        let cpp = fs::read_to_string(temp.path().join("generated/model.hpp")).unwrap();
        assert!(cpp.contains("float throttle;"));
        assert!(cpp.contains("bool brake;"));
    }

    #[test]
    fn test_generate_overwrites_previous_output() {
        let temp = temp_dir_in_workspace();
        write_project(temp.path());
        let project = load(temp.path());
        let output = temp.path().join("generated/server.py");
        fs::create_dir_all(output.parent().unwrap()).unwrap();
        fs::write(&output, "stale").unwrap();

        generate_target(&project, &project.manifest().targets[0]).unwrap();
        assert_ne!(fs::read_to_string(&output).unwrap(), "stale");
    }

    #[test]
    fn test_failed_render_writes_nothing() {
        let temp = temp_dir_in_workspace();
        write_project(temp.path());
        fs::write(
            temp.path().join("templates/broken.tmpl"),
            "DTIG_IF(DTIG_INPUTS_LENGTH)\nnever closed\n",
        )
        .unwrap();

        let mut project = load(temp.path());
        project.manifest.targets.insert(
            0,
            Target {
                template: PathBuf::from("templates/broken.tmpl"),
                output: PathBuf::from("generated/broken.py"),
                language: Language::Python,
            },
        );

        let err = generate_all(&project).unwrap_err();
        match err {
            DtigError::RenderFailed { template, source } => {
                assert_eq!(template, "templates/broken.tmpl");
                assert_eq!(source.line(), Some(1));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(!temp.path().join("generated/broken.py").exists());
        // Later targets never ran
        assert!(!temp.path().join("generated/server.py").exists());
    }

    #[test]
    fn test_missing_template() {
        let temp = temp_dir_in_workspace();
        write_project(temp.path());
        let project = load(temp.path());
        let target = Target {
            template: PathBuf::from("templates/missing.tmpl"),
            output: PathBuf::from("generated/missing.py"),
            language: Language::Python,
        };
        assert!(matches!(
            generate_target(&project, &target),
            Err(DtigError::TemplateRead { .. })
        ));
    }

    #[test]
    fn test_output_cannot_escape_project() {
        let temp = temp_dir_in_workspace();
        write_project(temp.path());
        let project = load(temp.path());
        let target = Target {
            template: PathBuf::from("templates/server.py.tmpl"),
            output: PathBuf::from("../escaped.py"),
            language: Language::Python,
        };
        assert!(matches!(
            generate_target(&project, &target),
            Err(DtigError::ProjectPathEscape { .. })
        ));
        assert!(temp.path().join(MANIFEST_FILE).exists());
    }
}
