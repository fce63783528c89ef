//! Reference resolution.
//!
//! Scans every entity's attribute values for interpolation-style references
//! to other entities and maps each match onto the corpus-wide entity-id
//! namespace. Resolution is a conservative syntactic match: a dotted chain
//! inside a `${...}` marker is only turned into a dependency when the
//! candidate id actually exists in the namespace. Anything else (external
//! ids, typos, `local.*`, builtins like `count.index`) is dropped silently.

use crate::types::{AttrValue, Entity};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Matches the delimited interpolation marker.
fn interp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]*)\}").expect("valid interpolation regex"))
}

/// Matches dotted identifier chains inside an expression.
fn chain_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z_][\w-]*(?:\.[A-Za-z_][\w-]*)+").expect("valid chain regex")
    })
}

/// The complete set of entity ids declared in one corpus.
///
/// Built once by the graph assembler and passed into resolution by
/// reference, so parse invocations stay independent of one another.
#[derive(Debug, Clone, Default)]
pub struct EntityNamespace {
    ids: HashSet<String>,
}

impl EntityNamespace {
    /// Build a namespace from the declared entity ids.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether an id is declared in this corpus.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of declared ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the namespace is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Resolves attribute references against an entity namespace.
#[derive(Debug, Clone, Default)]
pub struct ReferenceResolver;

impl ReferenceResolver {
    /// Create a new resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Collect the ids of every entity this entity's attributes reference.
    ///
    /// The result preserves discovery order, is deduplicated, and never
    /// contains the entity's own id.
    #[must_use]
    pub fn resolve(&self, entity: &Entity, namespace: &EntityNamespace) -> Vec<String> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();

        for (_, value) in entity.attributes.iter() {
            scan_value(value, namespace, &mut |id| {
                if id != entity.id && seen.insert(id.to_string()) {
                    found.push(id.to_string());
                }
            });
        }

        found
    }
}

/// Recursively scan an attribute value for resolvable references.
fn scan_value(value: &AttrValue, namespace: &EntityNamespace, sink: &mut impl FnMut(&str)) {
    match value {
        AttrValue::String(text) => scan_text(text, namespace, sink),
        AttrValue::List(items) => {
            for item in items {
                scan_value(item, namespace, sink);
            }
        }
        AttrValue::Map(map) => {
            for (_, nested) in map.iter() {
                scan_value(nested, namespace, sink);
            }
        }
        AttrValue::Null | AttrValue::Bool(_) | AttrValue::Number(_) => {}
    }
}

/// Scan one string for references inside `${...}` markers.
fn scan_text(text: &str, namespace: &EntityNamespace, sink: &mut impl FnMut(&str)) {
    for marker in interp_re().captures_iter(text) {
        let expr = &marker[1];
        for chain in chain_re().find_iter(expr) {
            if let Some(id) = resolve_chain(chain.as_str(), namespace) {
                sink(&id);
            }
        }
    }
}

/// Map a dotted chain onto a declared entity id, if any.
///
/// `var.x` addresses `variable.x`; `data.t.n.attr` addresses `data.t.n`;
/// `module.n.out` addresses `module.n`; a bare `t.n.attr` chain addresses
/// `resource.t.n`. Chains whose candidate id is not declared resolve to
/// nothing.
fn resolve_chain(chain: &str, namespace: &EntityNamespace) -> Option<String> {
    let segments: Vec<&str> = chain.split('.').collect();

    let candidate = match (segments.first().copied(), segments.len()) {
        (Some("var"), n) if n >= 2 => format!("variable.{}", segments[1]),
        (Some("module"), n) if n >= 2 => format!("module.{}", segments[1]),
        (Some("data"), n) if n >= 3 => format!("data.{}.{}", segments[1], segments[2]),
        (Some("output"), n) if n >= 2 => format!("output.{}", segments[1]),
        (Some("provider"), n) if n >= 2 => format!("provider.{}", segments[1]),
        (Some("resource"), n) if n >= 3 => {
            format!("resource.{}.{}", segments[1], segments[2])
        }
        // local.* values and single-segment builtins never address entities
        (Some("local"), _) => return None,
        (Some(first), n) if n >= 2 => format!("resource.{}.{}", first, segments[1]),
        _ => return None,
    };

    namespace.contains(&candidate).then_some(candidate)
}
