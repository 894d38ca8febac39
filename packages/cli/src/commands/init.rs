use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailcraft_document::{
    assign_missing_uids, EmailTemplate, Node, RandomUidGenerator, Variable, VariableType,
    VariableValue,
};
use mailcraft_workspace::{Config, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Template file to create
    #[arg(default_value = "email-template.json")]
    pub file: String,

    /// Force overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let template_path = cwd.join(&args.file);

    if template_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            args.file.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing mailcraft template...".bright_blue().bold());

    fs::write(&template_path, serde_json::to_string_pretty(&starter_template())?)?;
    println!("  {} Created {}", "✓".green(), args.file);

    let config_path = cwd.join(DEFAULT_CONFIG_NAME);
    if !config_path.exists() || args.force {
        fs::write(&config_path, serde_json::to_string_pretty(&Config::default())?)?;
        println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    }

    println!();
    println!("{}", "✅ Template initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", args.file);
    println!("  2. Run: mailcraft render {} --out email.html", args.file);

    Ok(())
}

/// Default template with a greeting that uses one variable
pub fn starter_template() -> EmailTemplate {
    let mut template = EmailTemplate::new();
    template.header.subject = "Welcome".to_string();
    template.header.preview = "Thanks for signing up".to_string();
    template.content = Node::doc(vec![
        Node::heading(1, "Welcome aboard"),
        Node::paragraph("Hi {{name}}, thanks for signing up."),
    ]);
    assign_missing_uids(&mut template.content, &mut RandomUidGenerator);
    template.variables = vec![Variable {
        id: "name".to_string(),
        name: "name".to_string(),
        var_type: VariableType::String,
        default_value: VariableValue::Text("there".to_string()),
        description: Some("Recipient first name".to_string()),
    }];
    template
}
