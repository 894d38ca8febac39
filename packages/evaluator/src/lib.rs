pub mod css;
pub mod css_variables;
pub mod embeds;
pub mod evaluator;
pub mod marks;
pub mod style_resolver;
pub mod vdom;

#[cfg(test)]
mod tests_nodes;

#[cfg(test)]
mod tests_error_recovery;

pub use css::{to_css_properties, to_inline_css, to_style_string, CssContext, CssProperties};
pub use css_variables::{css_variables, css_variables_from_value, to_root_block};
pub use embeds::{youtube_video_id, SocialLink, SocialPlatform};
pub use evaluator::{
    code_block_text, default_unsubscribe_content, transform_template, EvalError, EvalOptions,
    EvalResult, Evaluator,
};
pub use marks::{apply_marks, mark_priority, sort_marks};
pub use style_resolver::{body_css, container_css, node_css, resolve_effective_style};
pub use vdom::{EmailDocument, VNode};
