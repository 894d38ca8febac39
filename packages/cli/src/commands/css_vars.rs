use super::read_template;
use anyhow::Result;
use clap::Args;
use mailcraft_evaluator::{css_variables, to_root_block};
use std::path::Path;

#[derive(Debug, Args)]
pub struct CssVarsArgs {
    /// Template JSON file
    pub file: String,

    /// Print a `:root { ... }` block instead of one property per line
    #[arg(long)]
    pub root: bool,
}

pub fn css_vars(args: CssVarsArgs, cwd: &Path) -> Result<()> {
    let template = read_template(&cwd.join(&args.file))?.template;
    let vars = css_variables(&template.global_styles);

    if args.root {
        println!("{}", to_root_block(&vars));
    } else {
        for (name, value) in &vars {
            println!("{}: {};", name, value);
        }
    }

    Ok(())
}
