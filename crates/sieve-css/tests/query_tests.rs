//! Integration tests running selectors against parsed documents.

use sieve_common::CaseMode;
use sieve_css::{Query, Selector};
use sieve_dom::{DomTree, NodeId};
use sieve_html::{ParserOptions, parse_document, parse_document_with};

const PAGE: &str = concat!(
    "<html><body>",
    r#"<ul id="list"><li>1</li><li class="odd x">2</li><li>3</li><li>4</li><li>5</li></ul>"#,
    r#"<p lang="en-US">t</p>"#,
    "<div></div><span> </span><svg:g/>",
    "</body></html>",
);

fn page() -> DomTree {
    parse_document(PAGE)
}

/// Helper to compile `text` and select over the whole tree
fn select(tree: &DomTree, text: &str) -> Vec<NodeId> {
    Selector::parse(text).unwrap().select(tree)
}

/// Helper to map matches to their text content
fn texts(tree: &DomTree, ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|&id| tree.text_content(id)).collect()
}

/// Helper to map matches to their qualified tag names
fn tags(tree: &DomTree, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .filter_map(|&id| tree.as_element(id))
        .map(sieve_dom::ElementData::qualified_name)
        .collect()
}

fn selected_texts(tree: &DomTree, text: &str) -> Vec<String> {
    texts(tree, &select(tree, text))
}

fn selected_tags(tree: &DomTree, text: &str) -> Vec<String> {
    tags(tree, &select(tree, text))
}

// ========== structural pseudo-classes ==========

#[test]
fn test_nth_child_sequences() {
    let tree = page();
    assert_eq!(selected_texts(&tree, "li:nth-child(2n+1)"), ["1", "3", "5"]);
    assert_eq!(selected_texts(&tree, "li:nth-child(odd)"), ["1", "3", "5"]);
    assert_eq!(selected_texts(&tree, "li:nth-child(even)"), ["2", "4"]);
    assert_eq!(selected_texts(&tree, "li:nth-child(3)"), ["3"]);
    assert_eq!(selected_texts(&tree, "li:nth-child(n+4)"), ["4", "5"]);
    assert_eq!(selected_texts(&tree, "li:nth-child(-n+2)"), ["1", "2"]);
    assert!(select(&tree, "li:nth-child(0)").is_empty());
}

#[test]
fn test_nth_from_the_end() {
    let tree = page();
    assert_eq!(selected_texts(&tree, "li:nth-last-child(1)"), ["5"]);
    assert_eq!(selected_texts(&tree, "li:nth-last-child(2n)"), ["2", "4"]);
    assert_eq!(selected_texts(&tree, "li:nth-last-of-type(5)"), ["1"]);
}

#[test]
fn test_nth_of_type_counts_same_tag_only() {
    let tree = parse_document("<div><p>a</p><span>b</span><p>c</p><span>d</span><p>e</p></div>");
    assert_eq!(selected_texts(&tree, "p:nth-of-type(2)"), ["c"]);
    assert_eq!(selected_texts(&tree, "span:nth-of-type(2)"), ["d"]);
    assert_eq!(selected_texts(&tree, "p:nth-child(3)"), ["c"]);
    assert_eq!(selected_texts(&tree, "span:nth-last-of-type(1)"), ["d"]);
}

#[test]
fn test_first_last_and_only() {
    let tree = page();
    assert_eq!(selected_texts(&tree, "li:first-child"), ["1"]);
    assert_eq!(selected_texts(&tree, "li:last-child"), ["5"]);
    assert_eq!(selected_texts(&tree, "li:first-of-type"), ["1"]);
    assert_eq!(selected_texts(&tree, "li:last-of-type"), ["5"]);
    assert_eq!(selected_tags(&tree, ":only-child"), ["html", "body"]);
    assert_eq!(
        selected_tags(&tree, "body > :only-of-type"),
        ["ul", "p", "div", "span", "svg:g"]
    );
    assert!(select(&tree, "li:only-of-type").is_empty());
}

#[test]
fn test_position_ignores_text_and_comments() {
    let tree = parse_document("<ul> <!--x--> <li>a</li> text <li>b</li> </ul>");
    assert_eq!(selected_texts(&tree, "li:first-child"), ["a"]);
    assert_eq!(selected_texts(&tree, "li:nth-child(2)"), ["b"]);
}

#[test]
fn test_root() {
    let tree = page();
    assert_eq!(selected_tags(&tree, ":root"), ["html"]);
}

#[test]
fn test_empty_and_only_text() {
    let tree = page();
    assert_eq!(selected_tags(&tree, "body > :empty"), ["div", "span", "svg:g"]);
    assert!(select(&tree, "li:empty").is_empty());
    assert_eq!(selected_tags(&tree, "p:only-text"), ["p"]);
    assert!(select(&tree, "ul:only-text").is_empty());
    assert!(select(&tree, "div:only-text").is_empty());
}

// ========== combinators ==========

#[test]
fn test_descendant_and_child() {
    let tree = page();
    assert_eq!(select(&tree, "body li").len(), 5);
    assert_eq!(select(&tree, "html li").len(), 5);
    assert!(select(&tree, "html > li").is_empty());
    assert_eq!(selected_texts(&tree, "body > ul > li:last-child"), ["5"]);
}

#[test]
fn test_sibling_combinators() {
    let tree = page();
    assert_eq!(selected_texts(&tree, "li.odd + li"), ["3"]);
    assert_eq!(selected_texts(&tree, "li.odd ~ li"), ["3", "4", "5"]);
    assert_eq!(selected_texts(&tree, "li.odd < li"), ["1"]);
    assert_eq!(selected_texts(&tree, "li.odd % li"), ["1"]);
    assert_eq!(selected_tags(&tree, "ul + p"), ["p"]);
    assert!(select(&tree, "ul + div").is_empty());
    assert_eq!(selected_tags(&tree, "ul ~ div"), ["div"]);
}

#[test]
fn test_neighbour_skips_text_and_comments() {
    let tree = parse_document("<div><a/>text<!--c--><b/></div>");
    assert_eq!(selected_tags(&tree, "a + b"), ["b"]);
    assert_eq!(selected_tags(&tree, "b < a"), ["a"]);
}

#[test]
fn test_parent_step() {
    let tree = page();
    assert_eq!(selected_tags(&tree, "li.."), ["ul"]);
    assert_eq!(selected_tags(&tree, "li.odd.."), ["ul"]);
    assert_eq!(selected_tags(&tree, "li.. + p"), ["p"]);
    assert_eq!(selected_tags(&tree, "html.."), Vec::<String>::new());
}

// ========== negation ==========

#[test]
fn test_not_and_eps() {
    let tree = page();
    assert_eq!(selected_texts(&tree, "li:not(.odd)"), ["1", "3", "4", "5"]);
    assert_eq!(selected_texts(&tree, "*:eps(li.odd)"), ["2"]);
    assert_eq!(selected_tags(&tree, "ul:eps(ul li.odd)"), ["ul"]);
    assert_eq!(selected_tags(&tree, "ul:not(ul li.missing)"), ["ul"]);
    assert_eq!(selected_texts(&tree, "li:not(:first-child, :last-child, .x)"), ["3", "4"]);
}

// ========== attributes ==========

#[test]
fn test_attribute_operators() {
    let tree = page();
    assert_eq!(selected_tags(&tree, "[lang]"), ["p"]);
    assert_eq!(selected_tags(&tree, "[lang=en-US]"), ["p"]);
    assert_eq!(selected_tags(&tree, "[lang|=en]"), ["p"]);
    assert_eq!(selected_tags(&tree, "[lang^=en]"), ["p"]);
    assert_eq!(selected_tags(&tree, "[lang$=US]"), ["p"]);
    assert_eq!(selected_tags(&tree, "[lang*='n-U']"), ["p"]);
    assert_eq!(selected_tags(&tree, r#"[lang/="^en-[A-Z]+$"]"#), ["p"]);
    assert!(select(&tree, "[lang|=e]").is_empty());
    assert!(select(&tree, "[lang=en]").is_empty());
}

#[test]
fn test_id_and_class_shorthands() {
    let tree = page();
    assert_eq!(selected_tags(&tree, "#list"), ["ul"]);
    assert_eq!(selected_texts(&tree, ".x"), ["2"]);
    assert_eq!(selected_texts(&tree, "li.odd.x"), ["2"]);
    assert_eq!(selected_texts(&tree, "[class~=x]"), ["2"]);
    assert!(select(&tree, "[class=x]").is_empty());
    assert!(select(&tree, "#List").is_empty());
}

#[test]
fn test_valueless_attribute_only_exists() {
    let tree = parse_document(r#"<i hidden></i><i hidden=""></i>"#);
    assert_eq!(select(&tree, "[hidden]").len(), 2);
    assert_eq!(select(&tree, r#"[hidden=""]"#).len(), 1);
    assert_eq!(select(&tree, "[hidden*=x]").len(), 0);
}

#[test]
fn test_first_attribute_with_a_name_decides() {
    let tree = parse_document(r#"<a x="1" x="2"></a>"#);
    assert_eq!(select(&tree, "[x='1']").len(), 1);
    assert!(select(&tree, "[x='2']").is_empty());
}

// ========== namespaces ==========

#[test]
fn test_namespaced_types() {
    let tree = page();
    assert_eq!(selected_tags(&tree, "svg|g"), ["svg:g"]);
    assert_eq!(selected_tags(&tree, "g"), ["svg:g"]);
    assert_eq!(selected_tags(&tree, "*|g"), ["svg:g"]);
    assert_eq!(selected_tags(&tree, "svg|*"), ["svg:g"]);
    assert!(select(&tree, "math|g").is_empty());
}

#[test]
fn test_namespaced_attributes() {
    let tree = parse_document(r#"<p xml:lang="en"></p><p lang="de"></p>"#);
    assert_eq!(select(&tree, "[xml|lang]").len(), 1);
    assert_eq!(select(&tree, "[*|lang]").len(), 2);
    assert_eq!(select(&tree, "[lang]").len(), 2);
}

// ========== results ==========

#[test]
fn test_alternatives_are_merged_in_document_order() {
    let tree = page();
    assert_eq!(
        selected_texts(&tree, "p, li.odd, li"),
        ["1", "2", "3", "4", "5", "t"]
    );
}

#[test]
fn test_iter_streams_in_discovery_order() {
    let tree = page();
    let selector = Selector::parse("li:nth-child(3) % li").unwrap();
    assert_eq!(texts(&tree, &selector.iter(&tree).collect::<Vec<_>>()), ["2", "1"]);
    assert_eq!(texts(&tree, &selector.select(&tree)), ["1", "2"]);
}

#[test]
fn test_iter_skips_duplicates() {
    let tree = page();
    let selector = Selector::parse("li, li:nth-child(odd), li..").unwrap();
    assert_eq!(selector.iter(&tree).count(), 6);
}

#[test]
fn test_only_elements_match() {
    let tree = parse_document("<!DOCTYPE html><a><!--c-->t<![CDATA[x]]></a>");
    assert_eq!(selected_tags(&tree, "*"), ["a"]);
    assert_eq!(selected_tags(&tree, "a > *"), Vec::<String>::new());
}

#[test]
fn test_select_within_scope() {
    let tree = page();
    let ul = select(&tree, "ul")[0];
    let p = select(&tree, "p")[0];
    let third = select(&tree, "li:nth-child(3)")[0];
    let li = Selector::parse("li").unwrap();

    assert_eq!(li.select_within(&tree, ul).len(), 5);
    assert!(li.select_within(&tree, p).is_empty());
    assert_eq!(li.select_within(&tree, third), vec![third]);

    let parent = Selector::parse("li..").unwrap();
    assert_eq!(parent.select_within(&tree, third), vec![ul]);
    assert_eq!(parent.iter_within(&tree, third).collect::<Vec<_>>(), vec![ul]);
}

#[test]
fn test_matches_single_node() {
    let tree = page();
    let second = select(&tree, "li")[1];
    assert!(Selector::parse(".odd").unwrap().matches(&tree, second));
    assert!(!Selector::parse("p").unwrap().matches(&tree, second));
    assert!(!Selector::parse("li").unwrap().matches(&tree, NodeId::ROOT));
}

#[test]
fn test_operators() {
    let tree = page();
    let li = Selector::parse("li").unwrap();
    let missing = Selector::parse("table").unwrap();

    assert_eq!(texts(&tree, &(&tree / &li)), ["1", "2", "3", "4", "5"]);
    assert_eq!((&tree % &li).map(|id| tree.text_content(id)), Some("1".to_string()));
    assert!((&tree / &missing).is_empty());
    assert_eq!(&tree % &missing, None);
}

#[test]
fn test_query_trait_and_each() {
    let tree = page();
    let li = Selector::parse("li:nth-child(even)").unwrap();

    assert_eq!(texts(&tree, &tree.select(&li)), ["2", "4"]);
    assert_eq!(tree.select_first(&li), Some(tree.select(&li)[0]));

    let mut seen = Vec::new();
    tree.each(&li, |id| seen.push(tree.text_content(id)));
    assert_eq!(seen, ["2", "4"]);

    let mut count = 0;
    li.each(&tree, |_| count += 1);
    assert_eq!(count, 2);
}

// ========== case policy ==========

#[test]
fn test_case_policies() {
    let (tree, _) = parse_document_with(
        r#"<UL><LI DATA-X="1">x</LI></UL>"#,
        ParserOptions::default().with_case_sensitive(),
    );

    let exact = |text: &str| {
        Selector::parse_with(text, CaseMode::Preserve)
            .unwrap()
            .select(&tree)
            .len()
    };
    assert_eq!(exact("LI"), 1);
    assert_eq!(exact("li"), 0);
    assert_eq!(exact("[DATA-X]"), 1);
    assert_eq!(exact("[data-x]"), 0);
    assert_eq!(exact("UL > LI:first-of-type"), 1);

    assert_eq!(select(&tree, "li").len(), 1);
    assert_eq!(select(&tree, "LI[data-x]").len(), 1);
}

#[test]
fn test_deep_documents() {
    let depth = 2_000;
    let html = "<div>".repeat(depth);
    let tree = parse_document(&html);
    assert_eq!(select(&tree, "div").len(), depth);
    assert_eq!(select(&tree, "div:empty").len(), 1);
    assert_eq!(select(&tree, ":root").len(), 1);
}
