//! Props list conversion to a TypeScript interface and PropTypes

/// One entry of a props list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropDefinition {
    pub name: String,
    pub ty: String,
    pub optional: bool,
}

/// Generated prop declarations; both empty when there are no props
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedProps {
    pub interface: String,
    pub prop_types: String,
}

pub struct PropsParser;

impl PropsParser {
    /// Convert `title:string,count?:number,children` into declarations for
    /// `component`.
    pub fn parse(props: &str, component: &str) -> ParsedProps {
        let definitions = Self::definitions(props);
        if definitions.is_empty() {
            return ParsedProps::default();
        }

        ParsedProps {
            interface: Self::interface(&definitions, component),
            prop_types: Self::prop_types(&definitions, component),
        }
    }

    pub fn definitions(props: &str) -> Vec<PropDefinition> {
        props
            .split(',')
            .map(str::trim)
            .filter(|prop| !prop.is_empty())
            .map(|prop| {
                if prop == "children" {
                    return PropDefinition {
                        name: "children".to_string(),
                        ty: "React.ReactNode".to_string(),
                        optional: true,
                    };
                }

                let (name, ty) = match prop.split_once(':') {
                    Some((name, ty)) => (name.trim(), ty.trim()),
                    None => (prop, ""),
                };
                let (name, optional) = match name.strip_suffix('?') {
                    Some(stripped) => (stripped, true),
                    None => (name, false),
                };

                PropDefinition {
                    name: name.to_string(),
                    ty: if ty.is_empty() { "any" } else { ty }.to_string(),
                    optional,
                }
            })
            .collect()
    }

    fn interface(definitions: &[PropDefinition], component: &str) -> String {
        let fields: Vec<String> = definitions
            .iter()
            .map(|prop| {
                let marker = if prop.optional { "?" } else { "" };
                format!("  {}{}: {};", prop.name, marker, prop.ty)
            })
            .collect();

        format!("interface {component}Props {{\n{}\n}}", fields.join("\n"))
    }

    fn prop_types(definitions: &[PropDefinition], component: &str) -> String {
        let fields: Vec<String> = definitions
            .iter()
            .map(|prop| {
                let required = if prop.optional { "" } else { ".isRequired" };
                format!("  {}: {}{},", prop.name, Self::prop_type(&prop.ty), required)
            })
            .collect();

        format!("{component}.propTypes = {{\n{}\n}};", fields.join("\n"))
    }

    fn prop_type(ty: &str) -> &'static str {
        let compact: String = ty.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.as_str() {
            "string" => "PropTypes.string",
            "number" => "PropTypes.number",
            "boolean" => "PropTypes.bool",
            "()=>void" => "PropTypes.func",
            "React.ReactNode" => "PropTypes.node",
            _ => "PropTypes.any",
        }
    }
}
