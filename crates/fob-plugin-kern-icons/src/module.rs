//! The generated `virtual:kern-extra-icons` stylesheet module
//!
//! `load` hands Rolldown a template referencing a placeholder; `transform`
//! swaps the placeholder for the JSON-encoded CSS once every icon is resolved.

/// Specifier application code imports
pub const VIRTUAL_MODULE_ID: &str = "virtual:kern-extra-icons";

/// Resolved id the plugin owns (NUL prefix keeps other plugins away)
pub const RESOLVED_VIRTUAL_MODULE_ID: &str = "\0virtual:kern-extra-icons";

/// Token replaced with the stylesheet text during transform
pub const CSS_PLACEHOLDER: &str = "import.meta.kernExtraIcons";

/// Source of the virtual module before the CSS is spliced in
pub fn module_template(css_layer: Option<&str>) -> String {
    match css_layer {
        Some(layer) => format!(
            "const sheet = new CSSStyleSheet()\nsheet.replaceSync(`@layer {} {{\n\t${{{}}}\n}}`)\nexport default sheet\n",
            layer, CSS_PLACEHOLDER
        ),
        None => format!(
            "const sheet = new CSSStyleSheet()\nsheet.replaceSync({})\nexport default sheet\n",
            CSS_PLACEHOLDER
        ),
    }
}

/// Replace the first placeholder in `code` with `rules` as a JS string literal
pub fn inject_rules(code: &str, rules: &[String]) -> String {
    let css = rules.join("\n");
    let literal = serde_json::to_string(&css).unwrap_or_else(|_| "\"\"".to_string());
    code.replacen(CSS_PLACEHOLDER, &literal, 1)
}
