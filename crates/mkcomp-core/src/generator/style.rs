//! Stylesheet stub with one empty rule per selector

use super::StyleType;

pub struct StyleTemplate;

impl StyleTemplate {
    /// Stub rules for `classes` and `ids`. Styles without a stylesheet file
    /// produce an empty string.
    pub fn generate(
        classes: &[String],
        ids: &[String],
        style: StyleType,
        command: Option<&str>,
    ) -> String {
        let comment: fn(&str) -> String = match style {
            StyleType::Css => |text| format!("/* {text} */"),
            StyleType::Scss => |text| format!("// {text}"),
            StyleType::Tailwind | StyleType::Styled | StyleType::None => return String::new(),
        };

        let mut out = String::new();
        if let Some(command) = command {
            out.push_str(&comment(&format!("Generated by mkcomp: {command}")));
            out.push('\n');
        }
        out.push_str(&comment("Generated styles"));
        out.push('\n');

        let selectors = classes
            .iter()
            .map(|class| format!(".{class}"))
            .chain(ids.iter().map(|id| format!("#{id}")));
        for selector in selectors {
            out.push_str(&format!(
                "\n{selector} {{\n  {}\n}}\n",
                comment("Add your styles here")
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_css_rules() {
        let result = StyleTemplate::generate(
            &strings(&["btn"]),
            &strings(&["header"]),
            StyleType::Css,
            None,
        );
        assert_eq!(
            result,
            "/* Generated styles */\n\n.btn {\n  /* Add your styles here */\n}\n\n#header {\n  /* Add your styles here */\n}\n"
        );
    }

    #[test]
    fn test_scss_comments() {
        let result =
            StyleTemplate::generate(&strings(&["btn", "primary"]), &[], StyleType::Scss, None);
        assert!(result.starts_with("// Generated styles\n"));
        assert!(result.contains(".primary {\n  // Add your styles here\n}"));
        assert!(!result.contains("/*"));
    }

    #[test]
    fn test_no_stylesheet_styles_are_empty() {
        for style in [StyleType::Tailwind, StyleType::Styled, StyleType::None] {
            assert_eq!(StyleTemplate::generate(&strings(&["btn"]), &[], style, None), "");
        }
    }

    #[test]
    fn test_empty_selectors_and_header() {
        let result = StyleTemplate::generate(&[], &[], StyleType::Css, Some("mkcomp Box"));
        assert_eq!(result, "/* Generated by mkcomp: mkcomp Box */\n/* Generated styles */\n");
    }
}
