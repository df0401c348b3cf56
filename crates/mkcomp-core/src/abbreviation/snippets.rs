//! Snippet registry and resolution
//!
//! A snippet maps an element name to another abbreviation. Resolution runs
//! over the converted tree: a node whose name has a snippet is replaced by the
//! snippet's parsed nodes, which are resolved in turn. An explicit stack of
//! active snippet keys stops self-referencing snippets such as
//! `input: input[type=text]/`.

use indexmap::IndexMap;

use super::config::ExpandConfig;
use super::convert::ConvertOptions;
use super::error::AbbreviationError;
use super::node::{Abbreviation, Node};
use super::parse_tree;

/// Snippet bodies keyed by name. `a|b` keys register the body under each alias.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetRegistry {
    entries: IndexMap<String, String>,
}

impl SnippetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut registry = Self::new();
        for (key, body) in pairs {
            registry.insert(key, *body);
        }
        registry
    }

    /// Default HTML snippets.
    pub fn html() -> Self {
        Self::from_pairs(HTML_SNIPPETS)
    }

    /// Default XSL snippets.
    pub fn xsl() -> Self {
        Self::from_pairs(XSL_SNIPPETS)
    }

    /// Register `body` under every `|`-separated alias in `key`.
    pub fn insert(&mut self, key: &str, body: impl Into<String>) {
        let body = body.into();
        for alias in key.split('|').map(str::trim).filter(|k| !k.is_empty()) {
            self.entries.insert(alias.to_string(), body.clone());
        }
    }

    pub fn extend(&mut self, other: &SnippetRegistry) {
        for (key, body) in &other.entries {
            self.entries.insert(key.clone(), body.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Outcome of looking up a single node
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No snippet for this name
    Unknown,
    /// The snippet is already being expanded further up the stack
    Cyclic,
    Malformed {
        snippet: String,
        error: AbbreviationError,
    },
    Resolved(Vec<Node>),
}

/// Replace every snippet reference in the tree.
pub fn resolve_snippets(abbr: Abbreviation, config: &ExpandConfig) -> Abbreviation {
    let mut stack = Vec::new();
    Abbreviation {
        children: resolve_children(abbr.children, config, &mut stack),
    }
}

fn resolve_children(
    children: Vec<Node>,
    config: &ExpandConfig,
    stack: &mut Vec<String>,
) -> Vec<Node> {
    let mut result = Vec::with_capacity(children.len());

    for mut child in children {
        let own_children = std::mem::take(&mut child.children);

        match resolve_node(&child, config, stack) {
            Resolution::Resolved(mut nodes) => {
                let inner = resolve_children(own_children, config, stack);
                if let Some(last) = nodes.last_mut() {
                    last.deepest_mut().children.extend(inner);
                }
                result.extend(nodes);
            }
            resolution => {
                if let Resolution::Malformed { snippet, error } = &resolution {
                    config.warn(&format!("Unable to parse \"{snippet}\" snippet"));
                    tracing::debug!("Snippet parse error: {}", error);
                }
                child.children = resolve_children(own_children, config, stack);
                result.push(child);
            }
        }
    }

    result
}

/// Resolve one node against the registry. `stack` holds the keys of the
/// snippets currently being expanded.
pub fn resolve_node(node: &Node, config: &ExpandConfig, stack: &mut Vec<String>) -> Resolution {
    let Some(name) = node.name() else {
        return Resolution::Unknown;
    };
    let Some(body) = config.snippets.get(name) else {
        return Resolution::Unknown;
    };

    if is_active(name, body, &config.snippets, stack) {
        return Resolution::Cyclic;
    }

    let options = ConvertOptions {
        text: None,
        ..ConvertOptions::from_config(config)
    };
    let parsed = match parse_tree(body, config.options.jsx, options) {
        Ok(parsed) => parsed,
        Err(error) => {
            return Resolution::Malformed {
                snippet: body.to_string(),
                error,
            };
        }
    };

    stack.push(name.to_string());
    let mut nodes = resolve_children(parsed.children, config, stack);
    stack.pop();

    for top in &mut nodes {
        if let Some(own) = &node.attributes {
            let snippet_attrs = top.attributes.take().unwrap_or_default();
            top.attributes = Some(if config.options.reverse_attributes {
                own.iter().cloned().chain(snippet_attrs).collect()
            } else {
                snippet_attrs.into_iter().chain(own.iter().cloned()).collect()
            });
        }

        if node.self_closing {
            top.self_closing = true;
        }
        if node.value.is_some() {
            top.value = node.value.clone();
        }
        if node.repeat.is_some() {
            top.repeat = node.repeat;
        }
    }

    Resolution::Resolved(nodes)
}

/// A key is active when it, or an alias with the same body, is on the stack.
fn is_active(name: &str, body: &str, registry: &SnippetRegistry, stack: &[String]) -> bool {
    stack
        .iter()
        .any(|key| key == name || registry.get(key) == Some(body))
}

const HTML_SNIPPETS: &[(&str, &str)] = &[
    ("a", "a[href]"),
    ("a:blank", "a[href='http://${0}' target='_blank' rel='noopener noreferrer']"),
    ("a:link", "a[href='http://${0}']"),
    ("a:mail", "a[href='mailto:${0}']"),
    ("a:tel", "a[href='tel:+${0}']"),
    ("abbr", "abbr[title]"),
    ("acr|acronym", "acronym[title]"),
    ("base", "base[href]/"),
    ("basefont", "basefont/"),
    ("br", "br/"),
    ("frame", "frame/"),
    ("hr", "hr/"),
    ("bdo", "bdo[dir]"),
    ("bdo:r", "bdo[dir=rtl]"),
    ("bdo:l", "bdo[dir=ltr]"),
    ("col", "col/"),
    ("link", "link[rel=stylesheet href]/"),
    ("link:css", "link[href='${1:style}.css']"),
    ("link:print", "link[href='${1:print}.css' media=print]"),
    ("link:favicon", "link[rel='shortcut icon' type=image/x-icon href='${1:favicon.ico}']"),
    ("link:mf|link:manifest", "link[rel='manifest' href='${1:manifest.json}']"),
    ("link:touch", "link[rel=apple-touch-icon href='${1:favicon.png}']"),
    ("link:rss", "link[rel=alternate type=application/rss+xml title=RSS href='${1:rss.xml}']"),
    ("link:atom", "link[rel=alternate type=application/atom+xml title=Atom href='${1:atom.xml}']"),
    ("link:im|link:import", "link[rel=import href='${1:component}.html']"),
    ("meta", "meta/"),
    ("meta:utf", "meta[http-equiv=Content-Type content='text/html;charset=UTF-8']"),
    ("meta:vp", "meta[name=viewport content='width=${1:device-width}, initial-scale=${2:1.0}']"),
    ("meta:compat", "meta[http-equiv=X-UA-Compatible content='${1:IE=7}']"),
    ("meta:edge", "meta:compat[content='${1:ie=edge}']"),
    ("meta:redirect", "meta[http-equiv=refresh content='0; url=${1:http://example.com}']"),
    ("meta:refresh", "meta[http-equiv=refresh content='${1:5}']"),
    ("meta:kw", "meta[name=keywords content]"),
    ("meta:desc", "meta[name=description content]"),
    ("style", "style"),
    ("script", "script"),
    ("script:src", "script[src]"),
    ("script:module", "script[type=module src]"),
    ("img", "img[src alt]/"),
    ("img:s|img:srcset", "img[srcset src alt]"),
    ("img:z|img:sizes", "img[sizes srcset src alt]"),
    ("picture", "picture"),
    ("src|source", "source/"),
    ("src:sc|source:src", "source[src type]"),
    ("src:s|source:srcset", "source[srcset]"),
    ("src:t|source:type", "source[srcset type='${1:image/}']"),
    ("src:z|source:sizes", "source[sizes srcset]"),
    ("src:m|source:media", "source[media='(${1:min-width: })' srcset]"),
    ("iframe", "iframe[src frameborder=0]"),
    ("embed", "embed[src type]/"),
    ("object", "object[data type]"),
    ("param", "param[name value]/"),
    ("map", "map[name]"),
    ("area", "area[shape coords href alt]/"),
    ("area:d", "area[shape=default]"),
    ("area:c", "area[shape=circle]"),
    ("area:r", "area[shape=rect]"),
    ("area:p", "area[shape=poly]"),
    ("form", "form[action]"),
    ("form:get", "form[method=get]"),
    ("form:post", "form[method=post]"),
    ("label", "label[for]"),
    ("input", "input[type=${1:text}]/"),
    ("inp", "input[name=${1} id=${1}]"),
    ("input:h|input:hidden", "input[type=hidden name]"),
    ("input:t|input:text", "inp[type=text]"),
    ("input:search", "inp[type=search]"),
    ("input:email", "inp[type=email]"),
    ("input:url", "inp[type=url]"),
    ("input:p|input:password", "inp[type=password]"),
    ("input:datetime", "inp[type=datetime]"),
    ("input:date", "inp[type=date]"),
    ("input:datetime-local", "inp[type=datetime-local]"),
    ("input:month", "inp[type=month]"),
    ("input:week", "inp[type=week]"),
    ("input:time", "inp[type=time]"),
    ("input:tel", "inp[type=tel]"),
    ("input:number", "inp[type=number]"),
    ("input:color", "inp[type=color]"),
    ("input:c|input:checkbox", "inp[type=checkbox]"),
    ("input:r|input:radio", "inp[type=radio]"),
    ("input:range", "inp[type=range]"),
    ("input:f|input:file", "inp[type=file]"),
    ("input:s|input:submit", "input[type=submit value]"),
    ("input:i|input:image", "input[type=image src alt]"),
    ("input:b|input:btn|input:button", "input[type=button value]"),
    ("input:reset", "input:button[type=reset]"),
    ("select", "select[name=${1} id=${1}]"),
    ("select:d|select:disabled", "select[disabled.]"),
    ("opt|option", "option[value]"),
    ("textarea", "textarea[name=${1} id=${1} cols=${2:30} rows=${3:10}]"),
    ("marquee", "marquee[behavior direction]"),
    ("video", "video[src]"),
    ("audio", "audio[src]"),
    ("html:xml", "html[xmlns=http://www.w3.org/1999/xhtml]"),
    ("keygen", "keygen/"),
    ("command", "command/"),
    ("btn:s|button:s|button:submit", "button[type=submit]"),
    ("btn:r|button:r|button:reset", "button[type=reset]"),
    ("btn:b|button:b|button:button", "button[type=button]"),
    ("btn:d|button:d|button:disabled", "button[disabled.]"),
    ("fst:d|fset:d|fieldset:d|fieldset:disabled", "fieldset[disabled.]"),
    ("bq", "blockquote"),
    ("fig", "figure"),
    ("figc", "figcaption"),
    ("pic", "picture"),
    ("ifr", "iframe"),
    ("emb", "embed"),
    ("obj", "object"),
    ("cap", "caption"),
    ("colg", "colgroup"),
    ("fst|fset", "fieldset"),
    ("btn", "button"),
    ("optg", "optgroup"),
    ("tarea", "textarea"),
    ("leg", "legend"),
    ("sect", "section"),
    ("art", "article"),
    ("hdr", "header"),
    ("ftr", "footer"),
    ("adr", "address"),
    ("dlg", "dialog"),
    ("str", "strong"),
    ("prog", "progress"),
    ("mn", "main"),
    ("tem", "template"),
    ("datal", "datalist"),
    ("out", "output"),
    ("det", "details"),
    ("sum", "summary"),
    ("data", "data[value]"),
    ("meter", "meter[value]"),
    ("time", "time[datetime]"),
    ("ri:d|ri:dpr", "img:s"),
    ("ri:v|ri:viewport", "img:z"),
    ("ri:a|ri:art", "pic>src:m+img"),
    ("ri:t|ri:type", "pic>src:t+img"),
    ("!!!", "{<!DOCTYPE html>}"),
    (
        "doc",
        "html[lang=${lang}]>(head>meta[charset=${charset}]+meta:vp+title{${1:Document}})+body",
    ),
    ("!|html:5", "!!!+doc"),
    ("c", "{<!-- ${0} -->}"),
    ("cc:ie", "{<!--[if IE]>${0}<![endif]-->}"),
    ("cc:noie", "{<!--[if !IE]><!-->${0}<!--<![endif]-->}"),
];

const XSL_SNIPPETS: &[(&str, &str)] = &[
    ("tm|tmatch", "xsl:template[match mode]"),
    ("tn|tname", "xsl:template[name]"),
    ("call", "xsl:call-template[name]"),
    ("ap", "xsl:apply-templates[select mode]"),
    ("api", "xsl:apply-imports"),
    ("imp", "xsl:import[href]"),
    ("inc", "xsl:include[href]"),
    ("ch", "xsl:choose"),
    ("wh|xsl:when", "xsl:when[test]"),
    ("ot", "xsl:otherwise"),
    ("if", "xsl:if[test]"),
    ("par", "xsl:param[name]"),
    ("pare", "xsl:param[name select]"),
    ("var", "xsl:variable[name]"),
    ("vare", "xsl:variable[name select]"),
    ("wp", "xsl:with-param[name select]"),
    ("key", "xsl:key[name match use]"),
    ("elem", "xsl:element[name]"),
    ("attr", "xsl:attribute[name]"),
    ("attrs", "xsl:attribute-set[name]"),
    ("cp", "xsl:copy[select]"),
    ("co", "xsl:copy-of[select]"),
    ("val", "xsl:value-of[select]"),
    ("for|each", "xsl:for-each[select]"),
    ("tex", "xsl:text"),
    ("com", "xsl:comment"),
    ("msg", "xsl:message[terminate=no]"),
    ("fall", "xsl:fallback"),
    ("num", "xsl:number[value]"),
    ("nam", "namespace-alias[stylesheet-prefix result-prefix]"),
    ("pres", "xsl:preserve-space[elements]"),
    ("strip", "xsl:strip-space[elements]"),
    ("proc", "xsl:processing-instruction[name]"),
    ("sort", "xsl:sort[select order]"),
    ("choose", "xsl:choose>xsl:when+xsl:otherwise"),
    (
        "xsl",
        "!!!+xsl:stylesheet[version=1.0 xmlns:xsl=http://www.w3.org/1999/XSL/Transform]",
    ),
    ("!!!", "{<?xml version=\"1.0\" encoding=\"UTF-8\"?>}"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abbreviation::parse_tree;
    use std::sync::{Arc, Mutex};

    fn resolve_str(source: &str, config: &ExpandConfig) -> Abbreviation {
        let tree = parse_tree(source, false, ConvertOptions::from_config(config)).unwrap();
        resolve_snippets(tree, config)
    }

    #[test]
    fn test_aliases_share_body() {
        let registry = SnippetRegistry::from_pairs(&[("a|b | c", "div")]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("c"), Some("div"));
    }

    #[test]
    fn test_self_reference_stops() {
        let config = ExpandConfig::default();
        let abbr = resolve_str("input", &config);
        let input = &abbr.children[0];
        assert_eq!(input.name(), Some("input"));
        assert!(input.self_closing);
        assert_eq!(input.attributes().len(), 1);
    }

    #[test]
    fn test_cyclic_lookup_is_reported() {
        let config = ExpandConfig::default();
        let node = Node::named("input");
        let mut stack = vec!["input".to_string()];
        assert_eq!(resolve_node(&node, &config, &mut stack), Resolution::Cyclic);
        assert_eq!(
            resolve_node(&Node::named("section"), &config, &mut stack),
            Resolution::Unknown
        );
    }

    #[test]
    fn test_mutual_reference_terminates() {
        let mut config = ExpandConfig::default();
        config.snippets = SnippetRegistry::from_pairs(&[("foo", "bar"), ("bar", "foo.x")]);
        let abbr = resolve_str("foo", &config);
        assert_eq!(abbr.children.len(), 1);
        assert_eq!(abbr.children[0].name(), Some("foo"));
    }

    #[test]
    fn test_original_attributes_follow_snippet_attributes() {
        let config = ExpandConfig::default();
        let abbr = resolve_str("a.link[title=x]", &config);
        let names: Vec<_> = abbr.children[0]
            .attributes()
            .iter()
            .filter_map(|a| a.name.as_deref())
            .collect();
        assert_eq!(names, vec!["href", "class", "title"]);

        let mut config = ExpandConfig::default();
        config.options.reverse_attributes = true;
        let abbr = resolve_str("a.link", &config);
        assert_eq!(abbr.children[0].attributes()[0].name.as_deref(), Some("class"));
    }

    #[test]
    fn test_children_go_to_deepest_snippet_node() {
        let mut config = ExpandConfig::default();
        config.snippets.insert("card", "div.card>div.body");
        let abbr = resolve_str("card>p", &config);
        let body = &abbr.children[0].children[0];
        assert_eq!(body.children[0].name(), Some("p"));
    }

    #[test]
    fn test_multi_root_snippet_splices_in_place() {
        let config = ExpandConfig::default();
        let abbr = resolve_str("header+!+footer", &config);
        // doctype text node, html, header and footer
        let names: Vec<_> = abbr.children.iter().map(|n| n.name().unwrap_or("#text")).collect();
        assert_eq!(names, vec!["header", "#text", "html", "footer"]);
    }

    #[test]
    fn test_malformed_snippet_warns_and_keeps_node() {
        let warnings = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&warnings);
        let mut config = ExpandConfig::default()
            .with_warn(move |msg| sink.lock().unwrap().push(msg.to_string()));
        config.snippets.insert("broken", "div[");

        let abbr = resolve_str("broken>span", &config);
        assert_eq!(abbr.children[0].name(), Some("broken"));
        assert_eq!(abbr.children[0].children[0].name(), Some("span"));
        assert_eq!(
            *warnings.lock().unwrap(),
            vec!["Unable to parse \"div[\" snippet".to_string()]
        );
    }
}
