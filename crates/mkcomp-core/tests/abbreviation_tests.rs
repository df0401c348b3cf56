//! End-to-end behavior of the abbreviation engine
//!
//! Structure is checked on the parsed tree where formatting would only add
//! noise; full output is checked with inline snapshots.

use insta::assert_snapshot;
use mkcomp_core::abbreviation::{
    AbbreviationErrorKind, DEFAULT_MAX_REPEAT, ExpandConfig, ExpandOptions, Node, Syntax, expand,
    parse_abbreviation,
};
use mkcomp_core::generator::MarkupResult;

fn tree(source: &str) -> Vec<Node> {
    parse_abbreviation(source, &ExpandConfig::default())
        .unwrap()
        .children
}

fn names(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.name().unwrap_or("")).collect()
}

fn two_space() -> ExpandConfig {
    ExpandConfig::default().with_options(ExpandOptions {
        indent: "  ".into(),
        ..Default::default()
    })
}

#[test]
fn test_expansion_is_deterministic() {
    let config = ExpandConfig::default();
    let source = "nav#main>ul.menu>li.item$*3>a[title=go]{Link $}";
    assert_eq!(expand(source, &config).unwrap(), expand(source, &config).unwrap());
}

#[test]
fn test_sibling_binds_under_current_parent() {
    let nodes = tree("section>header+footer");
    assert_eq!(names(&nodes), vec!["section"]);
    assert_eq!(names(&nodes[0].children), vec!["header", "footer"]);
    assert!(nodes[0].children[0].children.is_empty());
}

#[test]
fn test_climb_returns_to_ancestor_level() {
    let nodes = tree("div>p^section");
    assert_eq!(names(&nodes), vec!["div", "section"]);

    let nodes = tree("div>ul>li^^p");
    assert_eq!(names(&nodes), vec!["div", "p"]);
    assert_eq!(names(&nodes[0].children[0].children), vec!["li"]);
}

#[test]
fn test_climb_past_root_stays_at_root() {
    let nodes = tree("div>p^^^span");
    assert_eq!(names(&nodes), vec!["div", "span"]);
}

#[test]
fn test_repeater_count() {
    let nodes = tree("div*3");
    assert_eq!(names(&nodes), vec!["div", "div", "div"]);

    let nodes = tree("div*3>span");
    assert_eq!(nodes.len(), 3);
    for div in &nodes {
        assert_eq!(names(&div.children), vec!["span"]);
    }
}

#[test]
fn test_numbering_is_one_based() {
    let nodes = tree("div*3>span{$}");
    let texts: Vec<String> = nodes.iter().map(|div| div.children[0].value_text()).collect();
    assert_eq!(texts, vec!["1", "2", "3"]);
}

#[test]
fn test_numbering_padding_reverse_and_base() {
    let classes = |source: &str| -> Vec<String> {
        tree(source)
            .iter()
            .map(|n| n.find_attribute("class").unwrap().value_text())
            .collect()
    };

    assert_eq!(classes("li.item$$*3"), vec!["item01", "item02", "item03"]);
    assert_eq!(classes("li.item$@-*3"), vec!["item3", "item2", "item1"]);
    assert_eq!(classes("li.item$@3*2"), vec!["item3", "item4"]);
}

#[test]
fn test_huge_number_base_does_not_overflow() {
    let max = usize::MAX.to_string();
    let html = expand(&format!("li*2{{$@{max}}}"), &ExpandConfig::default()).unwrap();
    assert_eq!(html.matches(&format!("<li>{max}</li>")).count(), 2);

    let html = expand("li*2{$@99999999999999999999999}", &ExpandConfig::default()).unwrap();
    assert_eq!(html.matches(&format!("<li>{max}</li>")).count(), 2);
}

#[test]
fn test_class_chain_merges_into_one_attribute() {
    let nodes = tree("div.a.b");
    let classes: Vec<_> = nodes[0]
        .attributes()
        .iter()
        .filter(|a| a.name.as_deref() == Some("class"))
        .collect();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].value_text(), "a b");

    assert_eq!(expand("div.a.b", &ExpandConfig::default()).unwrap(), "<div class=\"a b\"></div>");
}

#[test]
fn test_duplicate_attribute_last_value_wins_in_place() {
    let nodes = tree("div[title=a id=x title=b]");
    let attrs: Vec<(String, String)> = nodes[0]
        .attributes()
        .iter()
        .map(|a| (a.name.clone().unwrap_or_default(), a.value_text()))
        .collect();
    assert_eq!(
        attrs,
        vec![("title".to_string(), "b".to_string()), ("id".to_string(), "x".to_string())]
    );
}

#[test]
fn test_implicit_tag_names() {
    let nodes = tree("ul>.item*2");
    assert_eq!(names(&nodes[0].children), vec!["li", "li"]);

    assert_eq!(names(&tree("table>.row")[0].children), vec!["tr"]);
    assert_eq!(names(&tree("select>.opt")[0].children), vec!["option"]);
    assert_eq!(names(&tree("span>.inner")[0].children), vec!["span"]);
    assert_eq!(names(&tree(".box")), vec!["div"]);
}

#[test]
fn test_self_closing_by_style() {
    assert_eq!(expand("img/", &ExpandConfig::default()).unwrap(), "<img src=\"\" alt=\"\">");
    assert_eq!(
        expand("img/", &ExpandConfig::for_syntax(Syntax::Xhtml)).unwrap(),
        "<img src=\"\" alt=\"\" />"
    );
}

#[test]
fn test_repeat_guard_bounds_expansion() {
    let nodes = tree("div*100000000");
    assert!(!nodes.is_empty());
    assert!(nodes.len() <= DEFAULT_MAX_REPEAT);

    let config = ExpandConfig::default().with_max_repeat(5);
    let abbr = parse_abbreviation("li*50", &config).unwrap();
    assert_eq!(abbr.children.len(), 5);
}

#[test]
fn test_errors_carry_offsets() {
    let source = "div[";
    let err = expand(source, &ExpandConfig::default()).unwrap_err();
    assert_eq!(err.kind, AbbreviationErrorKind::UnclosedAttributeSet);
    assert_eq!(err.offset, Some(3));
    assert!(err.annotate(source).ends_with("   ^ Unclosed attribute set"));

    let err = expand("div{text", &ExpandConfig::default()).unwrap_err();
    assert_eq!(err.offset, Some(3));

    let err = expand("(div", &ExpandConfig::default()).unwrap_err();
    assert_eq!(err.kind, AbbreviationErrorKind::UnclosedGroup);
    assert_eq!(err.offset, Some(0));

    let err = expand("div)", &ExpandConfig::default()).unwrap_err();
    assert!(err.offset.is_some());
}

#[test]
fn test_modal_scenario() {
    let output =
        expand("div.modal>div.header>h2.title+button.close", &ExpandConfig::default()).unwrap();

    let nodes = tree("div.modal>div.header>h2.title+button.close");
    assert_eq!(names(&nodes), vec!["div"]);
    assert_eq!(names(&nodes[0].children), vec!["div"]);
    assert_eq!(names(&nodes[0].children[0].children), vec!["h2", "button"]);

    let scraped = MarkupResult::from_markup(&output);
    assert_eq!(scraped.classes, vec!["modal", "header", "title", "close"]);
    assert!(scraped.ids.is_empty());
}

#[test]
fn test_nested_block_snapshot() {
    assert_snapshot!(expand("section>header+footer", &two_space()).unwrap(), @r#"
<section>
  <header></header>
  <footer></footer>
</section>
"#);

    assert_snapshot!(expand("div>ul>li^^p", &two_space()).unwrap(), @r#"
<div>
  <ul>
    <li></li>
  </ul>
</div>
<p></p>
"#);
}

#[test]
fn test_group_repeat_snapshot() {
    assert_snapshot!(expand("(dt+dd)*2", &two_space()).unwrap(), @r#"
<dt></dt>
<dd></dd>
<dt></dt>
<dd></dd>
"#);
}

#[test]
fn test_lorem_is_reproducible_with_seed() {
    let config = ExpandConfig::default().with_lorem_seed(42);
    let first = expand("p>lorem8", &config).unwrap();
    let second = expand("p>lorem8", &config).unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with("<p>"));
    assert!(first.len() > "<p></p>".len());
}

#[test]
fn test_jsx_output() {
    let config = ExpandConfig::for_syntax(Syntax::Jsx);
    assert_eq!(
        expand("span.field[for=name]", &config).unwrap(),
        "<span className=\"field\" htmlFor=\"name\"></span>"
    );
}
