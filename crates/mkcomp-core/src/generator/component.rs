//! Component source template

use serde::{Deserialize, Serialize};

use super::props::PropsParser;
use super::{ComponentType, StyleType};

/// `useEffect` body run when `trigger` changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub trigger: String,
    pub action: String,
}

/// Inputs for one component file
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub name: &'a str,
    pub props: &'a str,
    pub markup: &'a str,
    pub component_type: ComponentType,
    pub style: StyleType,
    /// Recorded in a header comment when set
    pub command: Option<&'a str>,
    pub imports: &'a [String],
    pub hooks: &'a [String],
    pub effects: &'a [Effect],
}

impl<'a> TemplateContext<'a> {
    /// Context with no header, extra imports, hooks or effects.
    pub fn new(
        name: &'a str,
        props: &'a str,
        markup: &'a str,
        component_type: ComponentType,
        style: StyleType,
    ) -> Self {
        Self {
            name,
            props,
            markup,
            component_type,
            style,
            command: None,
            imports: &[],
            hooks: &[],
            effects: &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedComponent {
    pub imports: String,
    pub component: String,
    /// `imports`, a blank line, then `component`
    pub full_content: String,
}

pub struct ComponentTemplate;

impl ComponentTemplate {
    pub fn generate(ctx: &TemplateContext<'_>) -> GeneratedComponent {
        let imports = Self::imports(ctx);
        let component = Self::component(ctx);
        let full_content = format!("{imports}\n\n{component}");

        GeneratedComponent {
            imports,
            component,
            full_content,
        }
    }

    fn imports(ctx: &TemplateContext<'_>) -> String {
        let mut lines = Vec::new();

        if let Some(command) = ctx.command {
            lines.push(format!("// Generated by mkcomp: {command}"));
        }

        let hooks = Self::hooks(ctx);
        if hooks.is_empty() {
            lines.push("import React from 'react';".to_string());
        } else {
            lines.push(format!("import React, {{ {} }} from 'react';", hooks.join(", ")));
        }

        if ctx.component_type == ComponentType::Jsx {
            lines.push("import PropTypes from 'prop-types';".to_string());
        }

        lines.extend(ctx.imports.iter().cloned());

        match ctx.style {
            StyleType::Css | StyleType::Scss => {
                lines.push(format!("import './{}.{}';", ctx.name, ctx.style));
            }
            StyleType::Tailwind | StyleType::Styled | StyleType::None => {}
        }

        lines.join("\n")
    }

    /// Requested hooks plus `useEffect` when effects are present.
    fn hooks(ctx: &TemplateContext<'_>) -> Vec<String> {
        let mut hooks: Vec<String> = Vec::new();
        for hook in ctx.hooks {
            if !hooks.contains(hook) {
                hooks.push(hook.clone());
            }
        }
        if !ctx.effects.is_empty() && !hooks.iter().any(|h| h == "useEffect") {
            hooks.push("useEffect".to_string());
        }
        hooks
    }

    fn component(ctx: &TemplateContext<'_>) -> String {
        let props = PropsParser::parse(ctx.props, ctx.name);
        let has_props = !props.interface.is_empty();
        let mut out = String::new();

        if has_props && ctx.component_type == ComponentType::Tsx {
            out.push_str(&props.interface);
            out.push_str("\n\n");
        }

        let signature = match (has_props, ctx.component_type) {
            (true, ComponentType::Tsx) => format!("(props: {}Props)", ctx.name),
            (true, ComponentType::Jsx) => "(props)".to_string(),
            (false, _) => "()".to_string(),
        };
        out.push_str(&format!("const {} = {} => {{\n", ctx.name, signature));

        for effect in ctx.effects {
            let action = effect.action.trim().trim_end_matches(';');
            out.push_str("  useEffect(() => {\n");
            out.push_str(&format!("    {action};\n"));
            out.push_str(&format!("  }}, [{}]);\n\n", effect.trigger));
        }

        out.push_str("  return (\n");
        for line in ctx.markup.lines() {
            if line.trim().is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!("    {line}\n"));
            }
        }
        out.push_str("  );\n};");

        if has_props && ctx.component_type == ComponentType::Jsx {
            out.push_str("\n\n");
            out.push_str(&props.prop_types);
        }

        out.push_str(&format!("\n\nexport default {};", ctx.name));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUTTON: &str = r#"<button className="btn">Click me</button>"#;

    #[test]
    fn test_basic_tsx_component() {
        let result = ComponentTemplate::generate(&TemplateContext::new(
            "Button",
            "",
            BUTTON,
            ComponentType::Tsx,
            StyleType::Css,
        ));

        assert_eq!(result.imports, "import React from 'react';\nimport './Button.css';");
        assert_eq!(
            result.component,
            "const Button = () => {\n  return (\n    <button className=\"btn\">Click me</button>\n  );\n};\n\nexport default Button;"
        );
        assert_eq!(result.full_content, format!("{}\n\n{}", result.imports, result.component));
    }

    #[test]
    fn test_jsx_imports_prop_types() {
        let result = ComponentTemplate::generate(&TemplateContext::new(
            "Button",
            "",
            BUTTON,
            ComponentType::Jsx,
            StyleType::Scss,
        ));

        assert!(result.imports.contains("import PropTypes from 'prop-types';"));
        assert!(result.imports.contains("import './Button.scss';"));
        assert!(!result.imports.contains("Button.css"));
    }

    #[test]
    fn test_tsx_with_props() {
        let result = ComponentTemplate::generate(&TemplateContext::new(
            "Modal",
            "title:string,onClose:()=>void,children",
            "<div className=\"modal\">{props.children}</div>",
            ComponentType::Tsx,
            StyleType::Css,
        ));

        assert!(result.component.starts_with("interface ModalProps {\n  title: string;"));
        assert!(result.component.contains("children?: React.ReactNode;"));
        assert!(result.component.contains("const Modal = (props: ModalProps) => {"));
        assert!(!result.component.contains("PropTypes"));
    }

    #[test]
    fn test_jsx_with_props() {
        let result = ComponentTemplate::generate(&TemplateContext::new(
            "Button",
            "text:string,onClick:()=>void",
            BUTTON,
            ComponentType::Jsx,
            StyleType::Css,
        ));

        assert!(!result.component.contains("interface"));
        assert!(result.component.contains("const Button = (props) => {"));
        assert!(result.component.contains("  text: PropTypes.string.isRequired,"));
        assert!(result.component.contains("  onClick: PropTypes.func.isRequired,"));
        assert!(result.component.ends_with("};\n\nexport default Button;"));
    }

    #[test]
    fn test_no_style_imports_for_tailwind_and_none() {
        for style in [StyleType::Tailwind, StyleType::Styled, StyleType::None] {
            let result = ComponentTemplate::generate(&TemplateContext::new(
                "Button",
                "",
                BUTTON,
                ComponentType::Tsx,
                style,
            ));
            assert_eq!(result.imports, "import React from 'react';");
        }
    }

    #[test]
    fn test_hooks_effects_and_custom_imports() {
        let imports = vec!["import clsx from 'clsx';".to_string()];
        let hooks = vec!["useState".to_string()];
        let effects = vec![Effect {
            trigger: "isOpen".into(),
            action: "document.body.style.overflow = isOpen ? 'hidden' : 'auto';".into(),
        }];
        let ctx = TemplateContext {
            command: Some("mkcomp Modal --tsx"),
            imports: &imports,
            hooks: &hooks,
            effects: &effects,
            ..TemplateContext::new(
                "Modal",
                "isOpen:boolean",
                "<div></div>",
                ComponentType::Tsx,
                StyleType::None,
            )
        };
        let result = ComponentTemplate::generate(&ctx);

        assert_eq!(
            result.imports,
            "// Generated by mkcomp: mkcomp Modal --tsx\nimport React, { useState, useEffect } from 'react';\nimport clsx from 'clsx';"
        );
        assert!(result.component.contains(
            "  useEffect(() => {\n    document.body.style.overflow = isOpen ? 'hidden' : 'auto';\n  }, [isOpen]);\n\n  return ("
        ));
    }

    #[test]
    fn test_multiline_markup_is_indented() {
        let result = ComponentTemplate::generate(&TemplateContext::new(
            "List",
            "",
            "<ul>\n  <li></li>\n</ul>",
            ComponentType::Tsx,
            StyleType::None,
        ));
        assert!(
            result
                .component
                .contains("  return (\n    <ul>\n      <li></li>\n    </ul>\n  );")
        );
    }
}
