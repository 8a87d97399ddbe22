//! Output of each format for small documents

use assessml::assessml::ast::{Node, VarValue};
use assessml::assessml::formats::{serialize_html, serialize_markup, FormatRegistry};
use assessml::assessml::parsing::parse;
use assessml::assessml::providers::{FnPayloads, PayloadProvider};
use insta::assert_snapshot;

fn fixed() -> impl PayloadProvider {
    FnPayloads {
        variable: |_: &str| VarValue::from(4),
        image: |name: &str| format!("{}.png", name),
        graph: |_: &str| vec!["x^2".to_string()],
        shuffle: |_: &str| Some(vec![2, 0]),
    }
}

fn html(source: &str) -> String {
    let tree = parse(source, &mut fixed()).unwrap();
    let mut n = 0;
    serialize_html(&tree, &mut || {
        n += 1;
        format!("group{}", n)
    })
}

fn markup(source: &str) -> String {
    let tree = parse(source, &mut fixed()).unwrap();
    serialize_markup(&tree).unwrap()
}

#[test]
fn test_markup_names_every_construct() {
    assert_snapshot!(
        markup("Is [var1] the same as [var2]?[input]"),
        @"Is [var1] the same as [var2]?[input1]"
    );
    assert_snapshot!(
        markup("[check]A [input][check][check]B[check]"),
        @"[check1]A [input1][check1][check2]B[check2]"
    );
    assert_snapshot!(
        markup("[shuffle][input] or [essay][shuffle]"),
        @"[shuffle1][input1] or [essay1][shuffle1]"
    );
}

#[test]
fn test_html_check() {
    assert_snapshot!(
        html("[check1]A[check1]"),
        @r#"<input id="check1" type="checkbox" style="width: calc(40px - 1vw); height: calc(40px - 1vw);">A"#
    );
}

#[test]
fn test_html_radio_groups() {
    assert_snapshot!(
        html("[radio]A[radio] [radio]B[radio]"),
        @r#"<input id="radio1" type="radio" name="group1" style="width: calc(40px - 1vw); height: calc(40px - 1vw);">A <input id="radio2" type="radio" name="group1" style="width: calc(40px - 1vw); height: calc(40px - 1vw);">B"#
    );
}

#[test]
fn test_html_leaves() {
    assert_snapshot!(
        html("x = [var1], [img] [graph]"),
        @r#"x = 4, <img src="img1.png"> <function-plot data='[{ "fn": "x^2" }]'></function-plot>"#
    );
    assert_snapshot!(
        html("[essay]"),
        @r#"<textarea id="essay1" style="width: 100%; height: 50vh;"></textarea>"#
    );
}

#[test]
fn test_html_shuffle_and_wrappers() {
    assert_snapshot!(
        html("[shuffle][solution]S[solution] or [drag][drag][shuffle]"),
        @r#"DRAG NOT IMPLEMENTED or <template id="solution1">S</template>"#
    );
    assert_snapshot!(
        html("[markdown]# Title[markdown]"),
        @r#"<marked-element><div slot="markdown-html"></div><script type="text/markdown"># Title</script></marked-element>"#
    );
}

#[test]
fn test_json_shape() {
    let tree = vec![Node::variable("var1", 4)];
    let json = FormatRegistry::with_defaults().serialize(&tree, "json").unwrap();
    assert_snapshot!(json, @r#"
    [
      {
        "type": "VARIABLE",
        "varName": "var1",
        "value": 4.0
      }
    ]
    "#);
}

#[test]
fn test_unknown_format() {
    let registry = FormatRegistry::with_defaults();
    assert!(registry.serialize(&[], "pdf").is_err());
}
