//! HTML output for evaluated email documents.

pub mod compiler;


pub use compiler::{
    compile_email, compile_fragment, escape_html, substitute_variables, CompileError,
    CompileOptions, PREVIEW_MAX_LENGTH,
};

use mailcraft_document::EmailTemplate;
use mailcraft_evaluator::{EvalOptions, Evaluator};

/// Evaluate and compile a template in one step, then fill in the template's
/// own variable defaults
pub fn render_template(
    template: &EmailTemplate,
    eval_options: EvalOptions,
    options: CompileOptions,
) -> Result<String, CompileError> {
    let document = Evaluator::with_options(eval_options).evaluate(template);
    let html = compile_email(&document, options)?;
    Ok(substitute_variables(&html, &template.variable_defaults()))
}
