use std::rc::Rc;

use vizij_scroll_core::{
    AnimationTree, BindingOptions, ConfigError, FallbackPolicy, Tween, ROOT_SELECTOR,
};
use vizij_scroll_fixtures::{configs, FakeElement, FakeHost};

struct Page {
    host: Rc<FakeHost>,
    nav: Vec<FakeElement>,
}

fn page() -> Page {
    let host = FakeHost::new();
    let root = host.root();
    let header = host.append(root, "header", &[]);
    let nav = vec![
        host.append(header, "a", &["nav-item"]),
        host.append(header, "a", &["nav-item"]),
    ];
    Page { host, nav }
}

#[test]
fn builds_nodes_in_declaration_order() {
    let p = page();
    let options = configs::options("header-collapse").expect("fixture");
    let tree = AnimationTree::build(&*p.host, &p.host.root(), &options).expect("tree");

    let selectors: Vec<_> = tree.iter().map(|n| n.selector.as_str()).collect();
    assert_eq!(selectors, [ROOT_SELECTOR, ".nav-item", ".missing"]);

    let this = tree.get(ROOT_SELECTOR).unwrap();
    assert_eq!(this.targets, vec![p.host.root()]);
    let props: Vec<_> = this.properties.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(props, ["padding-top", "opacity"]);
    assert_eq!(this.property("opacity").unwrap().unit, "");
    assert_eq!(this.property("padding-top").unwrap().unit, "px");
    assert_eq!(this.property("padding-top").unwrap().over, 120.0);

    let nav = tree.get(".nav-item").unwrap();
    assert_eq!(nav.targets, p.nav);
    let ty = nav.property("translateY").unwrap();
    assert!(ty.is_transform);
    assert_eq!(ty.over, 60.0);
    assert_eq!(ty.unit, "px");
    assert!(nav.has_transforms());
    assert!(!this.has_transforms());
}

#[test]
fn zero_matches_is_an_inert_node() {
    let p = page();
    let options = configs::options("header-collapse").unwrap();
    let tree = AnimationTree::build(&*p.host, &p.host.root(), &options).unwrap();
    let missing = tree.get(".missing").unwrap();
    assert!(missing.targets.is_empty());
    assert!(missing.is_inert());
    // Still resolved and validated.
    assert_eq!(missing.property("height").unwrap().to, 100.0);
}

#[test]
fn invalid_over_fails_the_whole_build() {
    let p = page();
    let options = configs::options("invalid-over").unwrap();
    let err = AnimationTree::build(&*p.host, &p.host.root(), &options).unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidOver {
            selector: ".title".into(),
            property: "letter-spacing".into(),
            value: 0.0,
        }
    );
}

#[test]
fn unsupported_selector_is_a_config_error() {
    let p = page();
    let options = BindingOptions::default().animate("header > a", "width", Tween::to(10.0));
    let err = AnimationTree::build(&*p.host, &p.host.root(), &options).unwrap_err();
    assert!(matches!(err, ConfigError::Selector { ref selector, .. } if selector == "header > a"));
}

#[test]
fn infers_endpoints_from_first_target() {
    let p = page();
    p.host.set_computed(p.nav[0], "font-size", "16px");
    p.host.set_computed(p.nav[1], "font-size", "99px");
    let options = BindingOptions::default().animate(".nav-item", "font-size", Tween::to(12.0));
    let tree = AnimationTree::build(&*p.host, &p.host.root(), &options).unwrap();
    let fs = tree.get(".nav-item").unwrap().property("font-size").unwrap();
    assert_eq!((fs.from, fs.to), (16.0, 12.0));
}

#[test]
fn style_is_read_only_when_needed() {
    let p = page();
    p.host.set_computed(p.host.root(), "margin-top", "10px");

    let explicit = BindingOptions::default().animate("this", "margin-top", Tween::between(0.0, 5.0));
    AnimationTree::build(&*p.host, &p.host.root(), &explicit).unwrap();
    assert_eq!(p.host.style_reads(), 0);

    let inferred = BindingOptions::default().animate("this", "margin-top", Tween::default());
    let tree = AnimationTree::build(&*p.host, &p.host.root(), &inferred).unwrap();
    assert_eq!(p.host.style_reads(), 1);
    let mt = tree.get("this").unwrap().property("margin-top").unwrap();
    assert_eq!((mt.from, mt.to), (10.0, 10.0));
    assert!(mt.is_constant());
}

#[test]
fn identity_fallback_for_unreadable_transforms() {
    let p = page();
    p.host.set_computed(p.nav[0], "scaleX", "none");
    let options = BindingOptions::default()
        .with_fallback(FallbackPolicy::Identity)
        .animate(".nav-item", "scaleX", Tween::to(2.0))
        .animate(".nav-item", "rotate", Tween::to(45.0).with_unit("deg"));
    let tree = AnimationTree::build(&*p.host, &p.host.root(), &options).unwrap();
    let node = tree.get(".nav-item").unwrap();
    assert_eq!(node.property("scaleX").unwrap().from, 1.0);
    assert_eq!(node.property("rotate").unwrap().from, 0.0);
}
