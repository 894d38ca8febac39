use super::read_template;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use mailcraft_document::{EmailTemplate, Variable, VariableType, VariableValue};
use mailcraft_workspace::{render_html, Config};
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Template JSON file
    pub file: String,

    /// Write HTML here instead of stdout
    #[arg(short, long)]
    pub out: Option<String>,

    /// Emit compact HTML
    #[arg(long)]
    pub compact: bool,

    /// Variable value as name=value (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// Base URL for email-bound assets (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,
}

pub async fn render(args: RenderArgs, cwd: &Path) -> Result<()> {
    let mut config = Config::load(cwd)?;
    if args.base_url.is_some() {
        config.asset_base_url = args.base_url.clone();
    }

    let loaded = read_template(&cwd.join(&args.file))?;
    if loaded.was_migrated() {
        eprintln!(
            "{} backfilled {} from defaults",
            "⚠️".yellow(),
            loaded.migrated_sections.join(", ")
        );
    }

    let mut template = loaded.template;
    let overrides = args
        .vars
        .iter()
        .map(|pair| parse_var(pair))
        .collect::<Result<Vec<_>>>()?;
    apply_overrides(&mut template, &overrides);

    let mut compile = config.compile_options();
    if args.compact {
        compile.pretty = false;
    }

    let html = render_html(Arc::new(template), config.eval_options(), compile).await?;

    match &args.out {
        Some(out) => {
            fs::write(cwd.join(out), &html)?;
            eprintln!("{} {} → {}", "✓".green(), args.file, out);
        }
        None => println!("{}", html),
    }

    Ok(())
}

fn parse_var(pair: &str) -> Result<(String, String)> {
    let (name, value) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected NAME=VALUE, got `{}`", pair))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Empty variable name in `{}`", pair));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Replace declared defaults; undeclared names become string variables
fn apply_overrides(template: &mut EmailTemplate, overrides: &[(String, String)]) {
    for (name, value) in overrides {
        match template.variables.iter_mut().find(|v| &v.name == name) {
            Some(variable) => variable.default_value = VariableValue::Text(value.clone()),
            None => template.variables.push(Variable {
                id: name.clone(),
                name: name.clone(),
                var_type: VariableType::String,
                default_value: VariableValue::Text(value.clone()),
                description: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::starter_template;

    #[test]
    fn test_parse_var() {
        assert_eq!(
            parse_var("name=Ada=Lovelace").unwrap(),
            ("name".to_string(), "Ada=Lovelace".to_string())
        );
        assert_eq!(parse_var("empty=").unwrap().1, "");
        assert!(parse_var("novalue").is_err());
        assert!(parse_var("=x").is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut template = starter_template();
        apply_overrides(
            &mut template,
            &[
                ("name".to_string(), "Ada".to_string()),
                ("code".to_string(), "X1".to_string()),
            ],
        );

        let defaults = template.variable_defaults();
        assert_eq!(defaults["name"], "Ada");
        assert_eq!(defaults["code"], "X1");
        assert_eq!(template.variables.len(), 2);
    }

    #[tokio::test]
    async fn test_render_to_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("t.json"),
            serde_json::to_string(&starter_template()).unwrap(),
        )
        .unwrap();

        render(
            RenderArgs {
                file: "t.json".into(),
                out: Some("t.html".into()),
                compact: true,
                vars: vec!["name=Ada".into()],
                base_url: None,
            },
            dir.path(),
        )
        .await
        .unwrap();

        let html = fs::read_to_string(dir.path().join("t.html")).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Hi Ada, thanks for signing up."));
        assert!(html.contains("<title>Welcome</title>"));
    }
}
