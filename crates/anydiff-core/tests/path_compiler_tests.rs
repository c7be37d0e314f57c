#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Selector Compilation Tests
//!
//! ## Scenarios Covered
//!
//! 1. Direct members compile to single-segment paths
//! 2. Projections (each / first) disappear from the compiled path
//! 3. Deep nesting through objects and collections
//! 4. Invalid chains are rejected with `InvalidSelector`
//! 5. Compiled paths drive exclusion and inclusion filtering

mod common;

use anydiff_core::path::compile_all;
use anydiff_core::{compute_diff, CanonicalPath, ComparisonPolicy, ExErrorKind, Selector};
use common::{
    basic_child, deep_object, ComplexObject, ComplexObjectWithListChildren, DeepObject, ListChild,
};

fn rendered<T: anydiff_core::Diffable>(selectors: &[Selector<T>]) -> Vec<String> {
    compile_all(selectors)
        .unwrap()
        .iter()
        .map(CanonicalPath::to_string)
        .collect()
}

type Complex = Selector<ComplexObjectWithListChildren>;

#[test]
fn test_basic_member_path() {
    let paths = rendered(&[Selector::<ComplexObject>::root().member("Id")]);
    assert_eq!(paths, vec![".Id"]);
}

#[test]
fn test_paths_with_collection_root() {
    let paths = rendered(&[
        Complex::root().member("Id"),
        Complex::root().member("Name"),
        Complex::root().member("Children"),
    ]);
    assert_eq!(paths, vec![".Id", ".Name", ".Children"]);
}

#[test]
fn test_first_projection_is_invisible() {
    let paths = rendered(&[Complex::root()
        .member("Children")
        .first()
        .member("BasicChild")
        .member("BasicChildId")]);
    assert_eq!(paths, vec![".Children.BasicChild.BasicChildId"]);
}

#[test]
fn test_each_projection_is_invisible() {
    let paths = rendered(&[
        Complex::root().member("Id"),
        Complex::root().member("Name"),
        Complex::root()
            .member("Children")
            .each()
            .member("BasicChild")
            .member("BasicChildId"),
    ]);
    assert_eq!(
        paths,
        vec![".Id", ".Name", ".Children.BasicChild.BasicChildId"]
    );
}

#[test]
fn test_deep_projections() {
    let paths = rendered(&[
        Complex::root().member("Id"),
        Complex::root().member("Name"),
        Complex::root()
            .member("Children")
            .each()
            .member("BasicChild")
            .member("BasicChildId"),
        Complex::root()
            .member("BasicChild")
            .member("Children")
            .each()
            .member("BasicChildId"),
        Complex::root()
            .member("BasicChild")
            .member("Children")
            .each()
            .member("Children")
            .each()
            .member("BasicChildName"),
    ]);
    assert_eq!(
        paths,
        vec![
            ".Id",
            ".Name",
            ".Children.BasicChild.BasicChildId",
            ".BasicChild.Children.BasicChildId",
            ".BasicChild.Children.Children.BasicChildName",
        ]
    );
}

#[test]
fn test_nested_first_projection() {
    let paths = rendered(&[Complex::root()
        .member("BasicChild")
        .member("Children")
        .each()
        .member("Children")
        .first()
        .member("BasicChildName")]);
    assert_eq!(paths, vec![".BasicChild.Children.Children.BasicChildName"]);
}

#[test]
fn test_deep_object_chain() {
    let paths = rendered(&[Selector::<DeepObject>::root()
        .member("DeepChildObject")
        .member("DeepChild2Object")
        .member("DeepChild3Object")
        .member("Name")]);
    assert_eq!(
        paths,
        vec![".DeepChildObject.DeepChild2Object.DeepChild3Object.Name"]
    );
}

#[test]
fn test_compiled_paths_preserve_input_order() {
    let paths = rendered(&[
        Complex::root().member("Name"),
        Complex::root().member("Id"),
        Complex::root().member("Name"),
    ]);
    assert_eq!(paths, vec![".Name", ".Id", ".Name"]);
}

#[test]
fn test_invalid_selectors_are_rejected() {
    let invalid = [
        Complex::root(),
        Complex::root().member("Missing"),
        Complex::root().member("Id").member("Value"),
        Complex::root().member("Children").member("BasicChild"),
        Complex::root().member("Name").each(),
        Complex::root().each(),
    ];
    for selector in invalid {
        let err = selector.compile().unwrap_err();
        let ex = anydiff_core::ExError::from(err);
        assert_eq!(ex.kind(), ExErrorKind::InvalidSelector, "{}", selector);
        assert_eq!(ex.type_name(), Some("ComplexObjectWithListChildren"));
    }
}

#[test]
fn test_one_invalid_selector_fails_the_batch() {
    let selectors = [
        Complex::root().member("Id"),
        Complex::root().member("Nope"),
    ];
    assert!(compile_all(&selectors).is_err());

    let value = ComplexObjectWithListChildren::default();
    let err = compute_diff(&value, &value, ComparisonPolicy::ALL, &selectors).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidSelector);
}

fn family(child_id: i32, grandchild_name: &str, name: &str) -> ComplexObjectWithListChildren {
    let mut grandparent = basic_child(1, "root");
    let mut child = basic_child(2, "child");
    child.children.push(basic_child(3, grandchild_name));
    grandparent.children.push(child);
    ComplexObjectWithListChildren {
        id: 7,
        name: name.to_string(),
        children: vec![ListChild {
            basic_child: basic_child(child_id, "list child"),
        }],
        basic_child: grandparent,
    }
}

#[test]
fn test_excluded_projection_hides_element_members() {
    let left = family(10, "x", "same");
    let right = family(11, "y", "same");

    let all = compute_diff(&left, &right, ComparisonPolicy::ALL, &[]).unwrap();
    let properties: Vec<String> = all.iter().map(|d| d.property()).collect();
    assert_eq!(
        properties,
        vec![
            ".Children.BasicChild.BasicChildId",
            ".BasicChild.Children.Children.BasicChildName",
        ]
    );

    let excluded = compute_diff(
        &left,
        &right,
        ComparisonPolicy::ALL,
        &[Complex::root()
            .member("Children")
            .each()
            .member("BasicChild")
            .member("BasicChildId")],
    )
    .unwrap();
    assert_eq!(excluded.len(), 1);
    assert_eq!(
        excluded[0].property(),
        ".BasicChild.Children.Children.BasicChildName"
    );
}

#[test]
fn test_included_deep_path_reports_only_that_leaf() {
    let left = family(10, "x", "left");
    let right = family(11, "y", "right");

    let diffs = compute_diff(
        &left,
        &right,
        ComparisonPolicy::ALL | ComparisonPolicy::INCLUDE_LIST,
        &[Complex::root()
            .member("BasicChild")
            .member("Children")
            .each()
            .member("Children")
            .each()
            .member("BasicChildName")],
    )
    .unwrap();

    assert_eq!(diffs.len(), 1);
    assert_eq!(
        diffs[0].property(),
        ".BasicChild.Children.Children.BasicChildName"
    );
}

#[test]
fn test_include_only_deep_object_path() {
    let left = deep_object("a", "b", "leaf", 1);
    let right = deep_object("x", "y", "other leaf", 2);
    let selector = Selector::<DeepObject>::root()
        .member("DeepChildObject")
        .member("DeepChild2Object")
        .member("DeepChild3Object")
        .member("Name");

    let diffs = compute_diff(
        &left,
        &right,
        ComparisonPolicy::ALL | ComparisonPolicy::INCLUDE_LIST,
        &[selector],
    )
    .unwrap();

    assert_eq!(diffs.len(), 1);
    assert_eq!(
        diffs[0].property(),
        ".DeepChildObject.DeepChild2Object.DeepChild3Object.Name"
    );
}

#[test]
fn test_selector_display_shows_projections() {
    let selector = Complex::root()
        .member("BasicChild")
        .member("Children")
        .each()
        .member("BasicChildId");
    assert_eq!(
        selector.to_string(),
        "x => x.BasicChild.Children[*].BasicChildId"
    );
}
