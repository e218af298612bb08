//! Project and experiment display formatting

use crate::models::{Experiment, Project};

/// Format a list of projects as a table
pub fn format_project_list(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found.".to_string();
    }

    let name_width = projects
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<16}  {:<40}\n",
        "Name",
        "Created",
        "ID",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<16}  {:-<40}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for project in projects {
        output.push_str(&format!(
            "{:<name_width$}  {:<16}  {}\n",
            project.name,
            project.created_at.format("%Y-%m-%d %H:%M"),
            project.id,
            name_width = name_width,
        ));
    }

    output
}

/// Format a project's details with its experiments
pub fn format_project_details(project: &Project, experiments: &[Experiment]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Project: {}\n", project.name));
    output.push_str(&format!("  ID:      {}\n", project.id));
    if !project.description.is_empty() {
        output.push_str(&format!("  About:   {}\n", project.description));
    }
    output.push_str(&format!(
        "  Created: {}\n",
        project.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    if experiments.is_empty() {
        output.push_str("\n  No experiments.\n");
    } else {
        output.push_str("\n  Experiments:\n");
        for experiment in experiments {
            output.push_str(&format!(
                "    - {} ({})\n",
                experiment.title, experiment.id
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_project_list() {
        let projects = vec![Project::new("FEL beamtime", "")];
        let output = format_project_list(&projects);
        assert!(output.contains("FEL beamtime"));
        assert!(output.contains("prj-"));
    }

    #[test]
    fn test_format_project_details_with_experiments() {
        let project = Project::new("FEL beamtime", "Spring campaign");
        let experiments = vec![Experiment::new(project.id, "Run 12", "")];

        let output = format_project_details(&project, &experiments);
        assert!(output.contains("Spring campaign"));
        assert!(output.contains("Run 12"));
    }

    #[test]
    fn test_format_project_details_empty() {
        let project = Project::new("FEL beamtime", "");
        let output = format_project_details(&project, &[]);
        assert!(output.contains("No experiments"));
    }
}
