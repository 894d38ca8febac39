use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use mailcraft_common::{NodeStats, VariableReferences};
use mailcraft_document::{
    duplicate_uids, load_template_value, validation::missing_global_style_sections,
    validate_template_value,
};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Template JSON file
    pub file: String,
}

/// Findings for one template file
#[derive(Debug, Default)]
pub struct Report {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub nodes: usize,
}

impl Report {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate(args: ValidateArgs, cwd: &Path) -> Result<()> {
    let path = cwd.join(&args.file);
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Cannot read {}", path.display()))?;

    let report = check(&json);

    for warning in &report.warnings {
        println!("  {} {}", "⚠".yellow(), warning);
    }
    for error in &report.errors {
        println!("  {} {}", "✗".red(), error);
    }

    if report.is_valid() {
        println!(
            "{} {} is valid ({} nodes)",
            "✅".green(),
            args.file,
            report.nodes
        );
        Ok(())
    } else {
        Err(anyhow!(
            "{} has {} problem(s)",
            args.file,
            report.errors.len()
        ))
    }
}

pub fn check(json: &str) -> Report {
    let mut report = Report::default();

    let value: Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            report.errors.push(format!("not JSON: {}", e));
            return report;
        }
    };

    if let Err(e) = validate_template_value(&value) {
        report.errors.push(e.to_string());
        return report;
    }

    let missing = missing_global_style_sections(&value);
    if !missing.is_empty() {
        report.warnings.push(format!(
            "globalStyles missing {} (defaults will be used)",
            missing.join(", ")
        ));
    }

    let template = match load_template_value(value) {
        Ok(loaded) => loaded.template,
        Err(e) => {
            report.errors.push(e.to_string());
            return report;
        }
    };

    let stats = NodeStats::collect(&template.content);
    report.nodes = stats.total();
    for unknown in &stats.unknown_types {
        report
            .warnings
            .push(format!("unknown node type `{}` will be skipped", unknown));
    }
    if stats.missing_uids > 0 {
        report
            .warnings
            .push(format!("{} block(s) have no uid", stats.missing_uids));
    }

    for uid in duplicate_uids(&template.content) {
        report.errors.push(format!("duplicate uid `{}`", uid));
    }

    let defaults = template.variable_defaults();
    for name in VariableReferences::collect(&template.content) {
        if !defaults.contains_key(&name) {
            report
                .warnings
                .push(format!("`{{{{{}}}}}` is not a declared variable", name));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::starter_template;
    use serde_json::json;

    #[test]
    fn test_starter_template_is_clean() {
        let json = serde_json::to_string(&starter_template()).unwrap();
        let report = check(&json);
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert!(report.nodes > 0);
    }

    #[test]
    fn test_reports_structural_error() {
        let report = check(r#"{ "id": "x" }"#);
        assert!(!report.is_valid());

        let report = check("[");
        assert!(report.errors[0].starts_with("not JSON"));
    }

    #[test]
    fn test_reports_duplicates_and_migration() {
        let mut value = serde_json::to_value(starter_template()).unwrap();
        value["globalStyles"].as_object_mut().unwrap().remove("body");
        value["content"]["content"] = json!([
            { "type": "paragraph", "attrs": { "uid": "same" } },
            { "type": "paragraph", "attrs": { "uid": "same" } },
            { "type": "marquee" },
            { "type": "paragraph", "content": [{ "type": "text", "text": "{{coupon}}" }] }
        ]);

        let report = check(&value.to_string());
        assert_eq!(report.errors, vec!["duplicate uid `same`".to_string()]);
        assert!(report.warnings.iter().any(|w| w.contains("body")));
        assert!(report.warnings.iter().any(|w| w.contains("marquee")));
        assert!(report.warnings.iter().any(|w| w.contains("1 block(s) have no uid")));
        assert!(report.warnings.iter().any(|w| w.contains("{{coupon}}")));
    }
}
