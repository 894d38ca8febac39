//! Projection of global styles onto `--email-*` custom properties for the
//! editing surface.

use crate::css::{number, px, CssProperties};
use mailcraft_document::{GlobalStyles, GlobalStylesPatch, Padding};
use serde_json::Value;
use tracing::warn;

fn insert(vars: &mut CssProperties, name: &str, value: String) {
    vars.insert(format!("--email-{}", name), value);
}

fn insert_padding(vars: &mut CssProperties, prefix: &str, padding: &Padding) {
    insert(vars, &format!("{}-padding-top", prefix), px(padding.top));
    insert(vars, &format!("{}-padding-right", prefix), px(padding.right));
    insert(vars, &format!("{}-padding-bottom", prefix), px(padding.bottom));
    insert(vars, &format!("{}-padding-left", prefix), px(padding.left));
}

/// Every variable, always present
pub fn css_variables(styles: &GlobalStyles) -> CssProperties {
    let mut vars = CssProperties::new();

    let typography = &styles.typography;
    insert(&mut vars, "font-family", typography.font_family.clone());
    insert(&mut vars, "font-size", px(typography.font_size));
    insert(&mut vars, "line-height", number(typography.line_height));
    insert(&mut vars, "text-color", typography.color.clone());

    insert(&mut vars, "link-color", styles.link.color.clone());
    insert(
        &mut vars,
        "link-decoration",
        styles.link.text_decoration.as_str().to_string(),
    );

    insert(&mut vars, "container-width", px(styles.container.width));
    insert_padding(&mut vars, "container", &styles.container.padding);

    insert(&mut vars, "image-border-radius", px(styles.image.border_radius));

    let button = &styles.button;
    insert(&mut vars, "button-bg", button.background_color.clone());
    insert(&mut vars, "button-text", button.text_color.clone());
    insert(&mut vars, "button-radius", px(button.border_radius));
    insert_padding(&mut vars, "button", &button.padding);

    let code = &styles.code_block;
    insert(&mut vars, "code-block-bg", code.background_color.clone());
    insert(&mut vars, "code-block-radius", px(code.border_radius));
    insert_padding(&mut vars, "code-block", &code.padding);

    let inline = &styles.inline_code;
    insert(&mut vars, "inline-code-bg", inline.background_color.clone());
    insert(&mut vars, "inline-code-text", inline.text_color.clone());
    insert(&mut vars, "inline-code-radius", px(inline.border_radius));

    vars
}

/// Project possibly partial global style data; missing fields take defaults
pub fn css_variables_from_value(value: &Value) -> CssProperties {
    let defaults = GlobalStyles::default();
    let styles = match serde_json::from_value::<GlobalStylesPatch>(value.clone()) {
        Ok(patch) => defaults.merged(&patch),
        Err(e) => {
            warn!(error = %e, "Unreadable global styles, projecting defaults");
            defaults
        }
    };
    css_variables(&styles)
}

/// `:root { … }` block for a stylesheet
pub fn to_root_block(vars: &CssProperties) -> String {
    let mut out = String::from(":root {\n");
    for (name, value) in vars {
        out.push_str(&format!("  {}: {};\n", name, value));
    }
    out.push('}');
    out
}
