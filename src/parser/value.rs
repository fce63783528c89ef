//! Lowering of `hcl` expressions into the [`AttrValue`] tree.
//!
//! Literal values map directly; anything that would require evaluation
//! (traversals, function calls, templates, conditionals) is rendered back to
//! source-like text and kept as a string, wrapped in the `${...}` marker the
//! classic interpolation syntax uses. Reference detection downstream scans
//! inside those markers.

use crate::types::{AttrMap, AttrValue};
use hcl::expr::{Expression, ObjectKey, TemplateExpr, Traversal, TraversalOperator};
use hcl::{Body, Structure};

/// Convert a block body into an ordered attribute map.
///
/// Nested blocks become nested maps under their keyword; labeled nested
/// blocks (e.g. `provisioner "local-exec"`) nest one map per label. Repeated
/// nested blocks with the same keyword collect into a list.
#[must_use]
pub fn body_to_map(body: &Body) -> AttrMap {
    let mut map = AttrMap::new();

    for structure in body.clone().into_inner() {
        match structure {
            Structure::Attribute(attr) => {
                map.insert(attr.key.as_str(), expression_to_value(&attr.expr));
            }
            Structure::Block(block) => {
                let mut nested = AttrValue::Map(body_to_map(&block.body));
                for label in block.labels.iter().rev() {
                    let mut wrapper = AttrMap::new();
                    wrapper.insert(label.as_str(), nested);
                    nested = AttrValue::Map(wrapper);
                }
                insert_repeatable(&mut map, block.identifier.as_str(), nested);
            }
        }
    }

    map
}

/// Insert a nested-block value, collecting repeats under the same keyword
/// into a list.
fn insert_repeatable(map: &mut AttrMap, key: &str, value: AttrValue) {
    match map.get_mut(key) {
        Some(AttrValue::List(items)) => items.push(value),
        Some(existing) => {
            let first = std::mem::replace(existing, AttrValue::Null);
            *existing = AttrValue::List(vec![first, value]);
        }
        None => map.insert(key, value),
    }
}

/// Convert a single expression into an attribute value.
#[must_use]
pub fn expression_to_value(expr: &Expression) -> AttrValue {
    match expr {
        Expression::Null => AttrValue::Null,
        Expression::Bool(b) => AttrValue::Bool(*b),
        Expression::Number(n) => number_to_value(n),
        Expression::String(s) => AttrValue::String(s.clone()),
        Expression::Array(items) => {
            AttrValue::List(items.iter().map(expression_to_value).collect())
        }
        Expression::Object(obj) => {
            let mut map = AttrMap::new();
            for (key, value) in obj {
                map.insert(object_key_to_string(key), expression_to_value(value));
            }
            AttrValue::Map(map)
        }
        Expression::TemplateExpr(t) => AttrValue::String(template_text(t)),
        // Bare expressions keep their source-like text inside the classic
        // interpolation marker, matching how they would appear pre-0.12.
        other => AttrValue::String(format!("${{{}}}", render_expression(other))),
    }
}

/// Lower a number, keeping integers that survive the trip through `f64`.
///
/// Integers beyond 2^53 lose precision as `f64`, so they keep their source
/// text instead, like every other lossy value in this module.
fn number_to_value(n: &hcl::Number) -> AttrValue {
    const EXACT: u64 = 1 << 53;

    if let Some(i) = n.as_i64() {
        if i.unsigned_abs() <= EXACT {
            return AttrValue::Number(i as f64);
        }
    } else if let Some(u) = n.as_u64() {
        if u <= EXACT {
            return AttrValue::Number(u as f64);
        }
    } else if let Some(f) = n.as_f64() {
        return AttrValue::Number(f);
    }
    AttrValue::String(n.to_string())
}

/// Render an expression back to source-like text.
fn render_expression(expr: &Expression) -> String {
    match expr {
        Expression::Null => "null".to_string(),
        Expression::Bool(b) => b.to_string(),
        Expression::Number(n) => n.to_string(),
        Expression::String(s) => format!("\"{s}\""),
        Expression::Variable(v) => v.as_str().to_string(),
        Expression::Traversal(t) => render_traversal(t),
        Expression::FuncCall(f) => {
            let args: Vec<String> = f.args.iter().map(render_expression).collect();
            // FuncName's Display keeps namespace segments (`provider::fn`).
            format!("{}({})", f.name, args.join(", "))
        }
        Expression::Parenthesis(inner) => format!("({})", render_expression(inner)),
        Expression::Conditional(c) => format!(
            "{} ? {} : {}",
            render_expression(&c.cond_expr),
            render_expression(&c.true_expr),
            render_expression(&c.false_expr)
        ),
        Expression::TemplateExpr(t) => format!("\"{}\"", template_text(t)),
        Expression::Array(items) => {
            let rendered: Vec<String> = items.iter().map(render_expression).collect();
            format!("[{}]", rendered.join(", "))
        }
        // Operations, for-expressions and anything exotic round-trip
        // through the hcl formatter.
        other => hcl::format::to_string(other).unwrap_or_default(),
    }
}

/// Render a traversal chain (`aws_vpc.main.id`, `var.subnets[0]`, ...).
fn render_traversal(traversal: &Traversal) -> String {
    let mut out = render_expression(&traversal.expr);
    for op in &traversal.operators {
        match op {
            TraversalOperator::GetAttr(id) => {
                out.push('.');
                out.push_str(id.as_str());
            }
            TraversalOperator::Index(idx) => {
                out.push('[');
                out.push_str(&render_expression(idx));
                out.push(']');
            }
            TraversalOperator::LegacyIndex(n) => {
                out.push('.');
                out.push_str(&n.to_string());
            }
            _ => out.push_str(".*"),
        }
    }
    out
}

/// The literal text of a template expression, `${...}` markers included.
fn template_text(template: &TemplateExpr) -> String {
    match template {
        TemplateExpr::QuotedString(s) => s.clone(),
        TemplateExpr::Heredoc(h) => h.template.clone(),
    }
}

/// Convert an object key to a string.
fn object_key_to_string(key: &ObjectKey) -> String {
    match key {
        ObjectKey::Identifier(id) => id.as_str().to_string(),
        ObjectKey::Expression(expr) => match expr {
            Expression::String(s) => s.clone(),
            other => render_expression(other),
        },
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_body(content: &str) -> Body {
        hcl::from_str(content).unwrap()
    }

    #[test]
    fn test_literal_values() {
        let body = parse_body(
            r#"
name    = "my-vpc"
count   = 2
enabled = true
empty   = null
"#,
        );
        let map = body_to_map(&body);

        assert_eq!(map.get("name"), Some(&AttrValue::String("my-vpc".into())));
        assert_eq!(map.get("count"), Some(&AttrValue::Number(2.0)));
        assert_eq!(map.get("enabled"), Some(&AttrValue::Bool(true)));
        assert_eq!(map.get("empty"), Some(&AttrValue::Null));
    }

    #[test]
    fn test_template_keeps_interpolation_literal() {
        let body = parse_body(r#"vpc_id = "${aws_vpc.main.id}""#);
        let map = body_to_map(&body);

        assert_eq!(
            map.get("vpc_id"),
            Some(&AttrValue::String("${aws_vpc.main.id}".into()))
        );
    }

    #[test]
    fn test_bare_traversal_rendered_with_marker() {
        let body = parse_body("vpc_id = aws_vpc.main.id");
        let map = body_to_map(&body);

        assert_eq!(
            map.get("vpc_id"),
            Some(&AttrValue::String("${aws_vpc.main.id}".into()))
        );
    }

    #[test]
    fn test_list_of_references() {
        let body = parse_body("depends_on = [aws_vpc.main, aws_subnet.public]");
        let map = body_to_map(&body);

        match map.get("depends_on") {
            Some(AttrValue::List(items)) => {
                assert_eq!(items[0], AttrValue::String("${aws_vpc.main}".into()));
                assert_eq!(items[1], AttrValue::String("${aws_subnet.public}".into()));
            }
            other => panic!("Expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_block_becomes_nested_map() {
        let body = parse_body(
            r#"
lifecycle {
  create_before_destroy = true
}
"#,
        );
        let map = body_to_map(&body);

        match map.get("lifecycle") {
            Some(AttrValue::Map(nested)) => {
                assert_eq!(
                    nested.get("create_before_destroy"),
                    Some(&AttrValue::Bool(true))
                );
            }
            other => panic!("Expected nested map, got {other:?}"),
        }
    }

    #[test]
    fn test_repeated_nested_blocks_collect_into_list() {
        let body = parse_body(
            r#"
ingress {
  from_port = 80
}
ingress {
  from_port = 443
}
"#,
        );
        let map = body_to_map(&body);

        match map.get("ingress") {
            Some(AttrValue::List(items)) => assert_eq!(items.len(), 2),
            other => panic!("Expected list of blocks, got {other:?}"),
        }
    }

    #[test]
    fn test_labeled_nested_block() {
        let body = parse_body(
            r#"
provisioner "local-exec" {
  command = "echo done"
}
"#,
        );
        let map = body_to_map(&body);

        match map.get("provisioner") {
            Some(AttrValue::Map(by_label)) => {
                assert!(matches!(by_label.get("local-exec"), Some(AttrValue::Map(_))));
            }
            other => panic!("Expected labeled map, got {other:?}"),
        }
    }

    #[test]
    fn test_function_call_rendered_as_text() {
        let body = parse_body("subnet_count = length(var.subnets)");
        let map = body_to_map(&body);

        assert_eq!(
            map.get("subnet_count"),
            Some(&AttrValue::String("${length(var.subnets)}".into()))
        );
    }

    #[test]
    fn test_namespaced_function_call_rendered_as_text() {
        let body = parse_body("arn = provider::aws::arn_parse(var.arn)");
        let map = body_to_map(&body);

        assert_eq!(
            map.get("arn"),
            Some(&AttrValue::String(
                "${provider::aws::arn_parse(var.arn)}".into()
            ))
        );
    }

    #[test]
    fn test_large_integer_keeps_source_text() {
        let body = parse_body("small = 9007199254740992\nbig = 9007199254740993");
        let map = body_to_map(&body);

        assert_eq!(
            map.get("small"),
            Some(&AttrValue::Number(9_007_199_254_740_992.0))
        );
        assert_eq!(
            map.get("big"),
            Some(&AttrValue::String("9007199254740993".into()))
        );
    }

    #[test]
    fn test_object_value() {
        let body = parse_body(
            r#"
tags = {
  Name = "main"
  Env  = "prod"
}
"#,
        );
        let map = body_to_map(&body);

        match map.get("tags") {
            Some(AttrValue::Map(tags)) => {
                assert_eq!(tags.get("Name"), Some(&AttrValue::String("main".into())));
                assert_eq!(tags.get("Env"), Some(&AttrValue::String("prod".into())));
            }
            other => panic!("Expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_indexed_traversal() {
        let body = parse_body("subnet_id = aws_subnet.public[0].id");
        let map = body_to_map(&body);

        assert_eq!(
            map.get("subnet_id"),
            Some(&AttrValue::String("${aws_subnet.public[0].id}".into()))
        );
    }
}
