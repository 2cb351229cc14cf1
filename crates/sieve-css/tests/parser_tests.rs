//! Integration tests for the selector finding stream.

use sieve_common::CaseMode;
use sieve_css::{
    AttrOp, AttributeTest, Combinator, Failure, NameMatch, Nth, PseudoClass, Rule,
    SelectorFinding, SelectorParser,
};

/// Helper to collect every finding for `text` with default case folding
fn findings(text: &str) -> Vec<SelectorFinding> {
    SelectorParser::new(text).collect()
}

fn element(name: &str) -> SelectorFinding {
    SelectorFinding::Element(NameMatch::Named(name.to_string()))
}

fn class(name: &str) -> SelectorFinding {
    SelectorFinding::Attribute(AttributeTest::compare("class", AttrOp::Includes, name))
}

fn combinator(kind: Combinator) -> SelectorFinding {
    SelectorFinding::Combinator(kind)
}

fn tail(rest: &str) -> SelectorFinding {
    SelectorFinding::Tail(rest.to_string())
}

// ========== compounds ==========

#[test]
fn test_type_id_and_class() {
    assert_eq!(
        findings("li#main.item"),
        vec![
            element("li"),
            SelectorFinding::Attribute(AttributeTest::compare("id", AttrOp::Equals, "main")),
            class("item"),
        ]
    );
}

#[test]
fn test_universal_and_namespaces() {
    assert_eq!(
        findings("svg|rect"),
        vec![
            SelectorFinding::Namespace(NameMatch::Named("svg".to_string())),
            element("rect"),
        ]
    );
    assert_eq!(
        findings("*|*"),
        vec![
            SelectorFinding::Namespace(NameMatch::Any),
            SelectorFinding::Element(NameMatch::Any),
        ]
    );
}

#[test]
fn test_namespace_without_type() {
    assert_eq!(
        findings("svg|.x"),
        vec![SelectorFinding::Namespace(NameMatch::Named("svg".to_string())), class("x")]
    );
}

#[test]
fn test_additional_only_compound() {
    assert_eq!(findings(".a.b"), vec![class("a"), class("b")]);
}

#[test]
fn test_parent_step() {
    assert_eq!(
        findings("li..:first-child"),
        vec![
            element("li"),
            SelectorFinding::Parent,
            SelectorFinding::Pseudo(PseudoClass::FirstChild),
        ]
    );
}

// ========== attributes ==========

#[test]
fn test_attribute_operators() {
    let cases = [
        ("=", AttrOp::Equals),
        ("~=", AttrOp::Includes),
        ("^=", AttrOp::BeginsWith),
        ("$=", AttrOp::EndsWith),
        ("*=", AttrOp::Contains),
        ("|=", AttrOp::DashMatch),
        ("/=", AttrOp::Matches),
    ];
    for (symbol, op) in cases {
        assert_eq!(op.to_string(), symbol);
        assert_eq!(
            findings(&format!("[lang{symbol}en]")),
            vec![SelectorFinding::Attribute(AttributeTest::compare("lang", op, "en"))],
            "operator {symbol}"
        );
    }
}

#[test]
fn test_attribute_existence_and_whitespace() {
    assert_eq!(
        findings("[ hidden ]"),
        vec![SelectorFinding::Attribute(AttributeTest::exists("hidden"))]
    );
    assert_eq!(
        findings(r#"[ x = "1" ]"#),
        vec![SelectorFinding::Attribute(AttributeTest::compare("x", AttrOp::Equals, "1"))]
    );
}

#[test]
fn test_quoted_attribute_values() {
    assert_eq!(
        findings(r#"[title="a \"b\" c"]"#),
        vec![SelectorFinding::Attribute(AttributeTest::compare(
            "title",
            AttrOp::Equals,
            r#"a "b" c"#
        ))]
    );
    assert_eq!(
        findings(r"[href/='\.pdf$']"),
        vec![SelectorFinding::Attribute(AttributeTest::compare(
            "href",
            AttrOp::Matches,
            r"\.pdf$"
        ))]
    );
}

#[test]
fn test_attribute_namespace() {
    assert_eq!(
        findings("[xlink|href]"),
        vec![SelectorFinding::Attribute(AttributeTest {
            namespace: Some(NameMatch::Named("xlink".to_string())),
            name: "href".to_string(),
            value: None,
        })]
    );
}

#[test]
fn test_unterminated_attribute_rolls_back() {
    let mut parser = SelectorParser::new("a[b");
    assert_eq!(parser.next(), Some(element("a")));
    assert_eq!(parser.next(), Some(tail("[b")));
    assert_eq!(parser.next(), None);
    assert_eq!(
        parser.last_failure(),
        Some(&Failure {
            rule: Rule::Attribute,
            offset: 3,
        })
    );
}

#[test]
fn test_missing_attribute_value() {
    let mut parser = SelectorParser::new("[x=]");
    assert_eq!(parser.next(), Some(tail("[x=]")));
    assert_eq!(parser.last_failure().map(|f| f.rule), Some(Rule::AttributeValue));
}

// ========== pseudo-classes ==========

#[test]
fn test_simple_pseudo_classes() {
    assert_eq!(
        findings(":root:empty:only-text:ONLY-CHILD"),
        vec![
            SelectorFinding::Pseudo(PseudoClass::Root),
            SelectorFinding::Pseudo(PseudoClass::Empty),
            SelectorFinding::Pseudo(PseudoClass::OnlyText),
            SelectorFinding::Pseudo(PseudoClass::OnlyChild),
        ]
    );
}

#[test]
fn test_nth_arguments() {
    assert_eq!(
        findings("li:nth-child(2n+1)"),
        vec![element("li"), SelectorFinding::Pseudo(PseudoClass::NthChild(Nth::new(2, 1)))]
    );
    assert_eq!(
        findings(":nth-last-of-type( even )"),
        vec![SelectorFinding::Pseudo(PseudoClass::NthLastOfType(Nth::EVEN))]
    );
    assert_eq!(
        findings(":nth-of-type(-n+3)"),
        vec![SelectorFinding::Pseudo(PseudoClass::NthOfType(Nth::new(-1, 3)))]
    );
}

#[test]
fn test_invalid_nth_argument_becomes_tail() {
    let mut parser = SelectorParser::new(":nth-child(foo)");
    assert_eq!(parser.next(), Some(tail(":nth-child(foo)")));
    assert_eq!(parser.last_failure().map(|f| f.rule), Some(Rule::NthArgument));
}

#[test]
fn test_unknown_pseudo_class_becomes_tail() {
    let mut parser = SelectorParser::new("a:hover");
    assert_eq!(parser.next(), Some(element("a")));
    assert_eq!(parser.next(), Some(tail(":hover")));
    assert_eq!(parser.last_failure().map(|f| f.rule), Some(Rule::Pseudo));
}

#[test]
fn test_nested_selectors() {
    assert_eq!(
        findings("li:not(.x, ul > li)"),
        vec![
            element("li"),
            SelectorFinding::Pseudo(PseudoClass::Not(vec![
                class("x"),
                SelectorFinding::Alternative,
                element("ul"),
                combinator(Combinator::Child),
                element("li"),
            ])),
        ]
    );
    assert_eq!(
        findings(":eps(:not(p))"),
        vec![SelectorFinding::Pseudo(PseudoClass::Eps(vec![
            SelectorFinding::Pseudo(PseudoClass::Not(vec![element("p")])),
        ]))]
    );
}

#[test]
fn test_broken_nested_selector_becomes_tail() {
    let mut parser = SelectorParser::new("a:not(b[)");
    assert_eq!(parser.next(), Some(element("a")));
    assert_eq!(parser.next(), Some(tail(":not(b[)")));
    assert_eq!(parser.next(), None);
}

#[test]
fn test_unclosed_nested_selector_becomes_tail() {
    assert_eq!(findings(":not(b"), vec![tail(":not(b")]);
}

// ========== combinators and alternatives ==========

#[test]
fn test_every_combinator() {
    let cases = [
        (" ", Combinator::Descendant),
        (">", Combinator::Child),
        (" + ", Combinator::Neighbour),
        ("~", Combinator::Follower),
        (" <", Combinator::ReverseNeighbour),
        ("% ", Combinator::Predecessor),
    ];
    for (symbol, kind) in cases {
        assert_eq!(
            findings(&format!("a{symbol}b")),
            vec![element("a"), combinator(kind), element("b")],
            "combinator {kind}"
        );
    }
}

#[test]
fn test_descendant_before_additional() {
    assert_eq!(
        findings("ul .x"),
        vec![element("ul"), combinator(Combinator::Descendant), class("x")]
    );
}

#[test]
fn test_alternatives() {
    assert_eq!(
        findings("a , b,c"),
        vec![
            element("a"),
            SelectorFinding::Alternative,
            element("b"),
            SelectorFinding::Alternative,
            element("c"),
        ]
    );
}

#[test]
fn test_trailing_whitespace_is_accepted() {
    assert_eq!(findings("  a  "), vec![element("a")]);
}

#[test]
fn test_dangling_combinator_becomes_tail() {
    let mut parser = SelectorParser::new("a >");
    assert_eq!(parser.next(), Some(element("a")));
    assert_eq!(parser.next(), Some(tail(" >")));
    assert_eq!(parser.last_failure().map(|f| f.rule), Some(Rule::Combinator));
}

#[test]
fn test_dangling_alternative_gives_empty_tail() {
    assert_eq!(
        findings("a,"),
        vec![element("a"), SelectorFinding::Alternative, tail("")]
    );
}

#[test]
fn test_empty_selector_is_empty_tail() {
    let mut parser = SelectorParser::new("");
    assert_eq!(parser.next(), Some(tail("")));
    assert_eq!(parser.last_failure().map(|f| f.rule), Some(Rule::Compound));
}

// ========== options and surface ==========

#[test]
fn test_case_policy() {
    assert_eq!(
        findings("DIV[DATA-X]"),
        vec![element("div"), SelectorFinding::Attribute(AttributeTest::exists("data-x"))]
    );

    let preserved: Vec<SelectorFinding> =
        SelectorParser::with_case("Svg|Rect.Big", CaseMode::Preserve).collect();
    assert_eq!(
        preserved,
        vec![
            SelectorFinding::Namespace(NameMatch::Named("Svg".to_string())),
            element("Rect"),
            class("Big"),
        ]
    );
}

#[test]
fn test_values_keep_their_case() {
    assert_eq!(
        findings("#Main"),
        vec![SelectorFinding::Attribute(AttributeTest::compare("id", AttrOp::Equals, "Main"))]
    );
}

#[test]
fn test_offset_advances_with_each_finding() {
    let mut parser = SelectorParser::new("ul > li");
    assert_eq!(parser.offset(), 0);
    assert_eq!(parser.next(), Some(element("ul")));
    assert_eq!(parser.offset(), 2);
    assert_eq!(parser.next(), Some(combinator(Combinator::Child)));
    assert_eq!(parser.offset(), 5);
    assert_eq!(parser.next(), Some(element("li")));
    assert_eq!(parser.next(), None);
    assert_eq!(parser.offset(), 7);
}

#[test]
fn test_display_names() {
    assert_eq!(element("a").to_string(), "element");
    assert_eq!(SelectorFinding::Alternative.to_string(), "alternative");
    assert_eq!(combinator(Combinator::ReverseNeighbour).to_string(), "combinator");
    assert_eq!(Combinator::ReverseNeighbour.to_string(), "reverse-neighbour");
    assert_eq!(Rule::NthArgument.to_string(), "nth-argument");
    assert_eq!(
        Failure {
            rule: Rule::Attribute,
            offset: 3,
        }
        .to_string(),
        "could not parse attribute at offset 3"
    );
}

#[test]
fn test_findings_serialize_to_json() {
    let json = serde_json::to_value(findings("a:nth-child(odd)")).unwrap();
    assert_eq!(json[0]["Element"]["Named"], "a");
    assert_eq!(json[1]["Pseudo"]["NthChild"]["a"], 2);
    assert_eq!(json[1]["Pseudo"]["NthChild"]["b"], 1);
}
