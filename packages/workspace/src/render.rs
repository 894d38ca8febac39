use crate::error::{WorkspaceError, WorkspaceResult};
use mailcraft_compiler_html::{render_template, CompileOptions};
use mailcraft_document::EmailTemplate;
use mailcraft_evaluator::EvalOptions;
use std::sync::Arc;
use tracing::{info, instrument};

/// Transform and serialise a template off the async executor
#[instrument(skip(template, eval, compile), fields(id = %template.id))]
pub async fn render_html(
    template: Arc<EmailTemplate>,
    eval: EvalOptions,
    compile: CompileOptions,
) -> WorkspaceResult<String> {
    let html = tokio::task::spawn_blocking(move || render_template(&template, eval, compile))
        .await
        .map_err(|e| WorkspaceError::Task(e.to_string()))??;

    info!(bytes = html.len(), "Rendered template");
    Ok(html)
}
