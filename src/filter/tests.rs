//! Unit tests for filter parsing, rendering, and matching.

use std::collections::BTreeMap;

use super::*;
use crate::error::ProvisoError;
use crate::records::{capabilities_from_header, Capability, Requirement};
use crate::types::TypedValue;
use crate::version::{Version, VersionRange};

fn capability(header: &str) -> Capability {
    capabilities_from_header(header).unwrap().remove(0)
}

// ==================== Parsing ====================

#[test]
fn parses_simple_equality() {
    let node = parse_filter("(name=foo)").unwrap();
    assert_eq!(
        node,
        FilterNode::Comparison {
            attribute: "name".into(),
            operator: Operator::Equal,
            operand: "foo".into(),
        }
    );
}

#[test]
fn parses_ordering_and_approximate_operators() {
    assert!(matches!(
        parse_filter("(v>=2.0)").unwrap(),
        FilterNode::Comparison {
            operator: Operator::GreaterEqual,
            ..
        }
    ));
    assert!(matches!(
        parse_filter("(v<=2.0)").unwrap(),
        FilterNode::Comparison {
            operator: Operator::LessEqual,
            ..
        }
    ));
    assert!(matches!(
        parse_filter("(v~=2.0)").unwrap(),
        FilterNode::Comparison {
            operator: Operator::Approximate,
            ..
        }
    ));
}

#[test]
fn parses_presence_test() {
    assert_eq!(
        parse_filter("(name=*)").unwrap(),
        FilterNode::Present {
            attribute: "name".into()
        }
    );
}

#[test]
fn parses_substring_segments() {
    let node = parse_filter("(name=ab*cd*)").unwrap();
    match node {
        FilterNode::Substring { attribute, pattern } => {
            assert_eq!(attribute, "name");
            assert_eq!(pattern.segments, vec!["ab", "cd"]);
            assert!(pattern.anchored_start);
            assert!(!pattern.anchored_end);
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn escaped_star_is_a_literal() {
    let node = parse_filter("(name=a\\*b)").unwrap();
    assert_eq!(
        node,
        FilterNode::Comparison {
            attribute: "name".into(),
            operator: Operator::Equal,
            operand: "a*b".into(),
        }
    );
}

#[test]
fn parses_boolean_composition() {
    let node = parse_filter("(&(a=1)(|(b=2)(c=3))(!(d=4)))").unwrap();
    match node {
        FilterNode::And(children) => {
            assert_eq!(children.len(), 3);
            assert!(matches!(children[1], FilterNode::Or(ref or) if or.len() == 2));
            assert!(matches!(children[2], FilterNode::Not(_)));
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn tolerates_whitespace_between_nodes() {
    let node = parse_filter("  (& (a=1) (b=2) )  ").unwrap();
    assert!(matches!(node, FilterNode::And(ref c) if c.len() == 2));
}

#[test]
fn rejects_empty_operand_lists() {
    assert!(matches!(
        parse_filter("(&)"),
        Err(ProvisoError::FilterSyntax { .. })
    ));
    assert!(matches!(
        parse_filter("(|)"),
        Err(ProvisoError::FilterSyntax { .. })
    ));
}

#[test]
fn not_is_strictly_unary() {
    assert!(parse_filter("(!(a=1))").is_ok());
    let err = parse_filter("(!(a=1)(b=2))").unwrap_err();
    assert!(matches!(err, ProvisoError::FilterSyntax { .. }));
    assert!(matches!(
        parse_filter("(!)"),
        Err(ProvisoError::FilterSyntax { .. })
    ));
}

#[test]
fn syntax_errors_carry_the_offending_input() {
    let err = parse_filter("(&(a=1)").unwrap_err();
    match err {
        ProvisoError::FilterSyntax { message, .. } => {
            assert!(message.contains("expected ')'"), "got: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    match parse_filter("(a=1)garbage").unwrap_err() {
        ProvisoError::FilterSyntax { at, .. } => assert_eq!(at, "garbage"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_missing_operator() {
    assert!(matches!(
        parse_filter("(name)"),
        Err(ProvisoError::FilterSyntax { .. })
    ));
    assert!(matches!(
        parse_filter("(>=1)"),
        Err(ProvisoError::FilterSyntax { .. })
    ));
}

#[test]
fn depth_cap_guards_pathological_nesting() {
    let mut expr = String::new();
    for _ in 0..100 {
        expr.push_str("(!");
    }
    expr.push_str("(a=1)");
    for _ in 0..100 {
        expr.push(')');
    }
    assert!(matches!(
        parse_filter(&expr),
        Err(ProvisoError::FilterTooDeep { .. })
    ));

    // Well under the cap parses fine.
    let mut expr = String::new();
    for _ in 0..10 {
        expr.push_str("(!");
    }
    expr.push_str("(a=1)");
    for _ in 0..10 {
        expr.push(')');
    }
    assert!(parse_filter(&expr).is_ok());
}

#[test]
fn rendering_round_trips() {
    for expr in [
        "(name=foo)",
        "(v>=2.0.0)",
        "(v<=2.0.0)",
        "(v~=abc)",
        "(name=*)",
        "(name=ab*cd*)",
        "(*)",
        "(&(a=1)(b=2))",
        "(|(a=1)(!(b=2)))",
        "(name=a\\*b\\(c\\))",
    ] {
        let node = parse_filter(expr).unwrap();
        let rendered = node.to_string();
        assert_eq!(parse_filter(&rendered).unwrap(), node, "via {rendered}");
    }
}

// ==================== Construction from attribute maps ====================

#[test]
fn empty_attribute_map_builds_match_all() {
    assert_eq!(
        FilterNode::from_attributes(&BTreeMap::new()),
        FilterNode::MatchAll
    );
}

#[test]
fn single_attribute_builds_one_leaf() {
    let mut attrs = BTreeMap::new();
    attrs.insert("name".to_string(), TypedValue::Str("foo".into()));
    let node = FilterNode::from_attributes(&attrs);
    assert_eq!(node.to_string(), "(name=foo)");
}

#[test]
fn several_attributes_build_a_conjunction() {
    let mut attrs = BTreeMap::new();
    attrs.insert("a".to_string(), TypedValue::Long(1));
    attrs.insert("b".to_string(), TypedValue::Str("x".into()));
    let node = FilterNode::from_attributes(&attrs);
    assert_eq!(node.to_string(), "(&(a=1)(b=x))");
}

#[test]
fn version_range_expands_to_bound_comparisons() {
    let range: VersionRange = "[1.0,2.0)".parse().unwrap();
    let mut attrs = BTreeMap::new();
    attrs.insert("version".to_string(), TypedValue::Range(range));
    let node = FilterNode::from_attributes(&attrs);
    assert_eq!(
        node.to_string(),
        "(&(version>=1.0.0)(version<=2.0.0)(!(version=2.0.0)))"
    );

    // The built filter behaves like the range.
    let inside = Capability::new("ns").with_attribute("version", Version::new(1, 5, 0));
    let at_ceiling = Capability::new("ns").with_attribute("version", Version::new(2, 0, 0));
    assert!(matches(&inside, &node));
    assert!(!matches(&at_ceiling, &node));
}

// ==================== Matching ====================

#[test]
fn string_comparisons() {
    let cap = capability("ns;name=foo");
    assert!(matches(&cap, &parse_filter("(name=foo)").unwrap()));
    assert!(!matches(&cap, &parse_filter("(name=bar)").unwrap()));
    assert!(matches(&cap, &parse_filter("(name>=f)").unwrap()));
    assert!(matches(&cap, &parse_filter("(name<=g)").unwrap()));
    assert!(!matches(&cap, &parse_filter("(name<=e)").unwrap()));
}

#[test]
fn approximate_string_ignores_case_and_whitespace() {
    let cap = capability("ns;label=\"Hello World\"");
    assert!(matches(&cap, &parse_filter("(label~=helloworld)").unwrap()));
    assert!(matches(&cap, &parse_filter("(label~=HELLO WORLD)").unwrap()));
    assert!(!matches(&cap, &parse_filter("(label=helloworld)").unwrap()));
}

#[test]
fn long_and_double_comparisons() {
    let cap = capability("ns;port:Long=8080;load:Double=0.75");
    assert!(matches(&cap, &parse_filter("(port=8080)").unwrap()));
    assert!(matches(&cap, &parse_filter("(port>=1024)").unwrap()));
    assert!(!matches(&cap, &parse_filter("(port<=1024)").unwrap()));
    assert!(matches(&cap, &parse_filter("(load<=1.0)").unwrap()));
    assert!(matches(&cap, &parse_filter("(load>=0.75)").unwrap()));
    // Unparseable operand: no match, no error.
    assert!(!matches(&cap, &parse_filter("(port=eighty)").unwrap()));
}

#[test]
fn version_comparisons() {
    let cap = capability("ns;v:Version=2.1.0");
    assert!(matches(&cap, &parse_filter("(v>=2.0.0)").unwrap()));
    assert!(!matches(&cap, &parse_filter("(v<=1.9.9)").unwrap()));
    assert!(matches(&cap, &parse_filter("(v=2.1.0)").unwrap()));
    assert!(matches(&cap, &parse_filter("(v=2.1)").unwrap()));
}

#[test]
fn version_equality_against_range_operand_is_inclusion() {
    // The closing bracket of the range is escaped so the value scanner does
    // not take it for the leaf terminator.
    let cap = capability("ns;v:Version=1.5.0");
    assert!(matches(&cap, &parse_filter("(v=[1.0,2.0\\))").unwrap()));
    assert!(!matches(&cap, &parse_filter("(v=[1.6,2.0\\))").unwrap()));
    assert!(matches(&cap, &parse_filter("(v=[1.0,1.5])").unwrap()));
}

#[test]
fn boolean_attributes_reduce_to_equality() {
    let cap = Capability::new("ns").with_attribute("enabled", true);
    for expr in ["(enabled=true)", "(enabled>=true)", "(enabled<=TRUE)", "(enabled~=true)"] {
        assert!(matches(&cap, &parse_filter(expr).unwrap()), "{expr}");
    }
    assert!(!matches(&cap, &parse_filter("(enabled=false)").unwrap()));
}

#[test]
fn character_attributes_compare_and_fold_case() {
    let cap = Capability::new("ns").with_attribute("grade", 'b');
    assert!(matches(&cap, &parse_filter("(grade=b)").unwrap()));
    assert!(matches(&cap, &parse_filter("(grade>=a)").unwrap()));
    assert!(matches(&cap, &parse_filter("(grade~=B)").unwrap()));
    assert!(!matches(&cap, &parse_filter("(grade=bb)").unwrap()));
}

#[test]
fn list_attributes_match_any_element() {
    let cap = capability("ns;sizes:List<Long>=\"1,2,3\"");
    assert!(matches(&cap, &parse_filter("(sizes=2)").unwrap()));
    assert!(!matches(&cap, &parse_filter("(sizes=9)").unwrap()));
    assert!(matches(&cap, &parse_filter("(sizes>=3)").unwrap()));

    let cap = capability("ns;names:List<String>=\"alpha,beta\"");
    assert!(matches(&cap, &parse_filter("(names=al*)").unwrap()));
    assert!(!matches(&cap, &parse_filter("(names=gamma*)").unwrap()));
}

#[test]
fn substring_matching_honors_anchors() {
    let cap = capability("ns;name=abcdef");
    assert!(matches(&cap, &parse_filter("(name=abc*)").unwrap()));
    assert!(matches(&cap, &parse_filter("(name=*def)").unwrap()));
    assert!(matches(&cap, &parse_filter("(name=a*d*f)").unwrap()));
    assert!(matches(&cap, &parse_filter("(name=*cd*)").unwrap()));
    assert!(!matches(&cap, &parse_filter("(name=*zz*)").unwrap()));
    assert!(!matches(&cap, &parse_filter("(name=abc*z)").unwrap()));
}

#[test]
fn substring_on_non_string_is_false() {
    let cap = capability("ns;port:Long=8080");
    assert!(!matches(&cap, &parse_filter("(port=80*)").unwrap()));
}

#[test]
fn substring_is_idempotent() {
    let cap = capability("ns;name=abcd");
    let filter = parse_filter("(name=ab*cd*)").unwrap();
    let first = matches(&cap, &filter);
    let second = matches(&cap, &filter);
    assert!(first);
    assert_eq!(first, second);
}

#[test]
fn presence_requires_the_attribute_to_exist() {
    let cap = capability("ns;name=foo");
    assert!(matches(&cap, &parse_filter("(name=*)").unwrap()));
    assert!(!matches(&cap, &parse_filter("(other=*)").unwrap()));
}

#[test]
fn absent_attribute_never_matches() {
    let cap = capability("ns;name=foo");
    assert!(!matches(&cap, &parse_filter("(other=foo)").unwrap()));
    assert!(!matches(&cap, &parse_filter("(other>=1)").unwrap()));
}

#[test]
fn boolean_composition_evaluates() {
    let cap = capability("ns;a=1;b=2");
    assert!(matches(&cap, &parse_filter("(&(a=1)(b=2))").unwrap()));
    assert!(!matches(&cap, &parse_filter("(&(a=1)(b=3))").unwrap()));
    assert!(matches(&cap, &parse_filter("(|(a=9)(b=2))").unwrap()));
    assert!(!matches(&cap, &parse_filter("(|(a=9)(b=9))").unwrap()));
    assert!(matches(&cap, &parse_filter("(!(a=9))").unwrap()));
    assert!(!matches(&cap, &parse_filter("(!(a=1))").unwrap()));
}

#[test]
fn match_all_matches_without_mandatory_attributes() {
    let cap = capability("ns;a=1");
    assert!(matches(&cap, &FilterNode::MatchAll));
}

// ==================== Mandatory attribute enforcement ====================

#[test]
fn unreferenced_mandatory_attribute_defeats_a_structural_match() {
    let cap = capability("ns;ver=1.0;name=foo;mandatory:=ver");
    // Structurally true, but `ver` is never mentioned.
    assert!(!matches(&cap, &parse_filter("(name=foo)").unwrap()));
    // Referencing the mandatory attribute restores the match.
    assert!(matches(&cap, &parse_filter("(&(name=foo)(ver>=1.0))").unwrap()));
}

#[test]
fn mandatory_reference_must_be_top_level() {
    let cap = capability("ns;ver=1.0;name=foo;mandatory:=ver");
    // Buried inside an OR under the AND: does not count.
    assert!(!matches(
        &cap,
        &parse_filter("(&(name=foo)(|(ver>=1.0)(name=bar)))").unwrap()
    ));
    // A NOT child of the AND does not count either.
    assert!(!matches(
        &cap,
        &parse_filter("(&(name=foo)(!(ver=2.0)))").unwrap()
    ));
}

#[test]
fn presence_counts_as_a_mandatory_reference() {
    let cap = capability("ns;ver=1.0;mandatory:=ver");
    assert!(matches(&cap, &parse_filter("(ver=*)").unwrap()));
}

#[test]
fn every_mandatory_attribute_must_be_referenced() {
    let cap = capability("ns;a=1;b=2;mandatory:=\"a,b\"");
    assert!(!matches(&cap, &parse_filter("(a=1)").unwrap()));
    assert!(matches(&cap, &parse_filter("(&(a=1)(b=2))").unwrap()));
}

#[test]
fn match_all_fails_against_mandatory_attributes() {
    let cap = capability("ns;ver=1.0;mandatory:=ver");
    assert!(!matches(&cap, &FilterNode::MatchAll));
}

// ==================== Requirement satisfaction ====================

#[test]
fn satisfies_requires_equal_namespaces() {
    let cap = capability("svc.http;port:Long=8080");
    let req = Requirement::new("svc.tcp");
    assert!(!satisfies(&cap, &req).unwrap());

    let req = Requirement::new("svc.http");
    assert!(satisfies(&cap, &req).unwrap());
}

#[test]
fn satisfies_applies_the_filter_directive() {
    let cap = capability("svc.http;port:Long=8080");
    let req = Requirement::new("svc.http").with_directive("filter", "(port>=1024)");
    assert!(satisfies(&cap, &req).unwrap());

    let req = Requirement::new("svc.http").with_directive("filter", "(port<=80)");
    assert!(!satisfies(&cap, &req).unwrap());
}

#[test]
fn satisfies_reports_malformed_filters() {
    let cap = capability("svc.http;port:Long=8080");
    let req = Requirement::new("svc.http").with_directive("filter", "(port>=");
    assert!(satisfies(&cap, &req).is_err());
}

#[test]
fn filterless_requirement_still_honors_mandatory_attributes() {
    let cap = capability("svc.http;port:Long=8080;mandatory:=port");
    let req = Requirement::new("svc.http");
    assert!(!satisfies(&cap, &req).unwrap());

    let req = Requirement::new("svc.http").with_directive("filter", "(port=*)");
    assert!(satisfies(&cap, &req).unwrap());
}

#[test]
fn requirement_built_from_attributes_round_trips() {
    let mut attrs = BTreeMap::new();
    attrs.insert("port".to_string(), TypedValue::Long(8080));
    let filter = FilterNode::from_attributes(&attrs);
    let req = Requirement::new("svc.http").with_filter(&filter);
    assert_eq!(req.directive("filter"), Some("(port=8080)"));
    assert_eq!(req.filter().unwrap(), Some(filter));

    let cap = capability("svc.http;port:Long=8080");
    assert!(satisfies(&cap, &req).unwrap());
}
