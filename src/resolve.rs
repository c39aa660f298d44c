//! Reachability walk over the schema's type graph.
//!
//! Starting from the requested roots, every type reachable through field types,
//! interface implementations and union/interface members is rendered exactly once.
//!
//! - A name is marked visited *before* its dependencies are walked, so cycles
//!   (`A → B → A`, `Node.next: Node`) terminate.
//! - Scalars map to built-in Rust types and never get an entry of their own.
//! - Failures are per-branch: an unknown name or unsupported kind is recorded and
//!   the walk carries on with everything else.
//!
//! Pure: no I/O, and a fresh [`ResolutionState`] per call.
use std::collections::HashSet;

use indexmap::IndexMap;
use thiserror::Error;

use crate::render::{self, RenderOptions};
use crate::schema::{FieldDescriptor, Kind, Schema, TypeDescriptor};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unknown type `{name}`{}", referrer(.referenced_by))]
    UnknownType { name: String, referenced_by: Option<String> },
    #[error("type `{name}` has unsupported kind `{kind}`")]
    UnsupportedKind { name: String, kind: Kind },
}

/// One rendered definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedType {
    pub name: String,
    pub kind: Kind,
    pub source: String,
}

/// Resolver output: rendered types keyed by schema name plus per-branch errors.
///
/// `types` is in discovery order, which is *not* a stable contract; sort by key
/// (see [`Resolution::sorted`]) before emitting anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub types: IndexMap<String, GeneratedType>,
    pub errors: Vec<ResolveError>,
}

/// Per-invocation bookkeeping.
#[derive(Debug)]
struct ResolutionState<'a> {
    schema: &'a Schema,
    options: &'a RenderOptions,
    visited: HashSet<String>,
    out: Resolution,
}

// ————————————————————————————————————————————————————————————————————————————
// FRONT API
// ————————————————————————————————————————————————————————————————————————————

pub fn resolve<I>(schema: &Schema, roots: I, options: &RenderOptions) -> Resolution
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut state = ResolutionState::new(schema, options);
    for root in roots {
        state.visit(root.as_ref(), None);
    }
    state.out
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
    /// Definitions ordered by type name.
    pub fn sorted(&self) -> Vec<&GeneratedType> {
        let mut types = self.types.values().collect::<Vec<_>>();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }
    pub fn get(&self, name: &str) -> Option<&str> {
        self.types.get(name).map(|t| t.source.as_str())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl<'a> ResolutionState<'a> {
    fn new(schema: &'a Schema, options: &'a RenderOptions) -> Self {
        Self { schema, options, visited: HashSet::new(), out: Resolution::default() }
    }

    fn visit(&mut self, name: &str, referenced_by: Option<&str>) {
        if !self.visited.insert(name.to_string()) {
            return;
        }
        let schema = self.schema;
        let Some(ty) = schema.get(name) else {
            self.out.errors.push(ResolveError::UnknownType {
                name: name.to_string(),
                referenced_by: referenced_by.map(str::to_string),
            });
            return;
        };
        let source = match &ty.kind {
            Kind::Scalar => return,
            Kind::Object | Kind::InputObject => render::render_record(ty, self.options),
            Kind::Enum => render::render_enum(ty),
            Kind::Interface | Kind::Union => render::render_polymorphic(ty),
            Kind::List | Kind::NonNull | Kind::Unrecognized(_) => {
                self.out.errors.push(ResolveError::UnsupportedKind {
                    name: name.to_string(),
                    kind: ty.kind.clone(),
                });
                return;
            }
        };
        for dependency in dependencies(ty) {
            self.visit(dependency, Some(name));
        }
        self.out.types.insert(name.to_string(), GeneratedType {
            name: name.to_string(),
            kind: ty.kind.clone(),
            source,
        });
    }
}

/// Names a type points at, in schema order. Scalar field types are included so a
/// scalar missing from the catalog is reported like any other unknown name.
fn dependencies(ty: &TypeDescriptor) -> Vec<&str> {
    let fields: &[FieldDescriptor] = match ty.kind {
        Kind::Object | Kind::InputObject | Kind::Interface => ty.members(),
        _ => &[],
    };
    let mut out = fields.iter().filter_map(|f| f.ty.named().name.as_deref()).collect::<Vec<_>>();
    if matches!(ty.kind, Kind::Object | Kind::Interface) {
        out.extend(ty.interfaces.iter().map(|i| i.name.as_str()));
    }
    if matches!(ty.kind, Kind::Interface | Kind::Union) {
        out.extend(ty.possible_types.iter().map(|p| p.name.as_str()));
    }
    out
}

fn referrer(referenced_by: &Option<String>) -> String {
    match referenced_by {
        Some(by) => format!(" (referenced by `{by}`)"),
        None => String::new(),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures::*;
    use serde_json::json;

    fn keys(r: &Resolution) -> Vec<&str> {
        let mut keys = r.types.keys().map(String::as_str).collect::<Vec<_>>();
        keys.sort();
        keys
    }

    fn node_and_status() -> Schema {
        schema(json!([
            object("Node", vec![
                field("id", non_null(named("SCALAR", "ID"))),
                field("next", named("OBJECT", "Node")),
            ]),
            enumeration("Status", &["ACTIVE", "INACTIVE"]),
            scalar("ID"),
        ]))
    }

    #[test]
    fn self_reference_and_enum_example() {
        let r = resolve(&node_and_status(), ["Node", "Status"], &RenderOptions::new());
        assert!(r.is_complete());
        assert_eq!(keys(&r), ["Node", "Status"]);

        let node = r.get("Node").unwrap();
        assert!(node.contains("    pub id: String,\n"));
        assert!(node.contains("    pub next: Option<Box<Node>>,\n"));

        let status = r.get("Status").unwrap();
        let active = status.find("Active,").unwrap();
        let inactive = status.find("Inactive,").unwrap();
        assert!(active < inactive);
    }

    #[test]
    fn mutual_cycle_terminates_with_two_entries() {
        let s = schema(json!([
            object("A", vec![field("b", non_null(named("OBJECT", "B")))]),
            object("B", vec![field("a", named("OBJECT", "A"))]),
        ]));
        let r = resolve(&s, ["A"], &RenderOptions::new());
        assert!(r.is_complete());
        assert_eq!(keys(&r), ["A", "B"]);
        assert!(r.get("A").unwrap().contains("pub b: Box<B>,"));
        assert!(r.get("B").unwrap().contains("pub a: Option<Box<A>>,"));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let s = node_and_status();
        let first = resolve(&s, ["Status", "Node"], &RenderOptions::new());
        let second = resolve(&s, ["Status", "Node"], &RenderOptions::new());
        assert_eq!(first, second);
    }

    #[test]
    fn transitive_types_through_lists_and_wrappers() {
        let s = schema(json!([
            object("Account", vec![
                field("users", non_null(list(non_null(named("OBJECT", "User"))))),
            ]),
            object("User", vec![
                field("role", named("ENUM", "Role")),
                field("tags", list(named("OBJECT", "Tag"))),
                field("name", named("SCALAR", "String")),
            ]),
            enumeration("Role", &["ADMIN", "MEMBER"]),
            object("Tag", vec![field("key", non_null(named("SCALAR", "String")))]),
            object("Unrelated", vec![]),
            scalar("String"),
        ]));
        let r = resolve(&s, ["Account"], &RenderOptions::new());
        assert!(r.is_complete());
        assert_eq!(keys(&r), ["Account", "Role", "Tag", "User"]);
    }

    #[test]
    fn scalars_never_become_entries() {
        let s = node_and_status();
        let r = resolve(&s, ["ID", "Node"], &RenderOptions::new());
        assert!(r.is_complete());
        assert_eq!(keys(&r), ["Node"]);
    }

    #[test]
    fn missing_root_yields_partial_result() {
        let r = resolve(&node_and_status(), ["Status", "Nope"], &RenderOptions::new());
        assert_eq!(keys(&r), ["Status"]);
        assert_eq!(r.errors, vec![ResolveError::UnknownType { name: "Nope".into(), referenced_by: None }]);
        assert_eq!(r.errors[0].to_string(), "unknown type `Nope`");
    }

    #[test]
    fn missing_reference_skips_only_that_branch() {
        let s = schema(json!([
            object("Root", vec![
                field("gone", named("OBJECT", "Gone")),
                field("kept", named("OBJECT", "Kept")),
            ]),
            object("Kept", vec![field("other", named("OBJECT", "Gone"))]),
        ]));
        let r = resolve(&s, ["Root"], &RenderOptions::new());
        assert_eq!(keys(&r), ["Kept", "Root"]);
        // reported once even though two fields point at it
        assert_eq!(r.errors.len(), 1);
        assert_eq!(r.errors[0].to_string(), "unknown type `Gone` (referenced by `Root`)");
        assert!(r.get("Root").unwrap().contains("pub gone: Option<Box<Gone>>,"));
    }

    #[test]
    fn unsupported_kinds_are_recorded() {
        let s = schema(json!([
            object("Root", vec![field("odd", named("OBJECT", "Odd"))]),
            { "kind": "FUTURE_KIND", "name": "Odd" },
            { "kind": "LIST", "name": "Wrapper" },
        ]));
        let r = resolve(&s, ["Root", "Wrapper"], &RenderOptions::new());
        assert_eq!(keys(&r), ["Root"]);
        assert_eq!(r.errors, vec![
            ResolveError::UnsupportedKind { name: "Odd".into(), kind: Kind::Unrecognized("FUTURE_KIND".into()) },
            ResolveError::UnsupportedKind { name: "Wrapper".into(), kind: Kind::List },
        ]);
        assert_eq!(r.errors[0].to_string(), "type `Odd` has unsupported kind `FUTURE_KIND`");
    }

    #[test]
    fn interfaces_and_unions_pull_in_members() {
        let s = schema(json!([
            { "kind": "INTERFACE", "name": "Entity",
              "fields": [ field("owner", named("OBJECT", "Owner")) ],
              "possibleTypes": [ { "kind": "OBJECT", "name": "Host" }, { "kind": "OBJECT", "name": "App" } ] },
            { "kind": "OBJECT", "name": "Host", "fields": [], "interfaces": [ { "name": "Entity" } ] },
            { "kind": "OBJECT", "name": "App", "fields": [ field("hits", named("UNION", "Hit")) ],
              "interfaces": [ { "name": "Entity" } ] },
            { "kind": "UNION", "name": "Hit", "possibleTypes": [ { "name": "Span" } ] },
            object("Span", vec![]),
            object("Owner", vec![]),
        ]));
        let r = resolve(&s, ["Entity"], &RenderOptions::new());
        assert!(r.is_complete());
        assert_eq!(keys(&r), ["App", "Entity", "Hit", "Host", "Owner", "Span"]);
        let entity = r.get("Entity").unwrap();
        assert!(entity.contains("    Host(Host),\n    App(App),\n"));
    }

    #[test]
    fn implemented_interfaces_are_resolved_from_objects() {
        let s = schema(json!([
            { "kind": "OBJECT", "name": "Host", "fields": [], "interfaces": [ { "name": "Entity" } ] },
            { "kind": "INTERFACE", "name": "Entity", "fields": [], "possibleTypes": [ { "name": "Host" } ] },
        ]));
        let r = resolve(&s, ["Host"], &RenderOptions::new());
        assert_eq!(keys(&r), ["Entity", "Host"]);
    }

    #[test]
    fn interfaces_implementing_interfaces_are_reached() {
        let s = schema(json!([
            { "kind": "INTERFACE", "name": "Entity", "fields": [],
              "interfaces": [ { "kind": "INTERFACE", "name": "Node" } ],
              "possibleTypes": [ { "kind": "OBJECT", "name": "Host" } ] },
            { "kind": "INTERFACE", "name": "Node", "fields": [], "possibleTypes": [] },
            { "kind": "OBJECT", "name": "Host", "fields": [],
              "interfaces": [ { "name": "Entity" }, { "name": "Node" } ] },
        ]));
        let r = resolve(&s, ["Entity"], &RenderOptions::new());
        assert!(r.is_complete());
        assert_eq!(keys(&r), ["Entity", "Host", "Node"]);
    }

    #[test]
    fn scalar_references_are_looked_up_in_the_catalog() {
        let s = schema(json!([
            object("A", vec![
                field("when", named("SCALAR", "EpochMillis")),
                field("id", non_null(named("SCALAR", "ID"))),
            ]),
            scalar("ID"),
        ]));
        let r = resolve(&s, ["A"], &RenderOptions::new());
        assert_eq!(keys(&r), ["A"]);
        assert_eq!(r.errors, vec![ResolveError::UnknownType {
            name: "EpochMillis".into(),
            referenced_by: Some("A".into()),
        }]);
        assert_eq!(r.errors[0].to_string(), "unknown type `EpochMillis` (referenced by `A`)");
        // the field still renders, falling back to the custom scalar default
        assert!(r.get("A").unwrap().contains("pub when: Option<String>,"));
    }

    #[test]
    fn input_objects_walk_input_fields() {
        let s = schema(json!([
            { "kind": "INPUT_OBJECT", "name": "ConditionInput", "fields": null, "inputFields": [
                field("terms", non_null(list(non_null(named("INPUT_OBJECT", "TermInput"))))),
                field("priority", named("ENUM", "Priority")),
            ]},
            { "kind": "INPUT_OBJECT", "name": "TermInput", "inputFields": [
                field("threshold", non_null(named("SCALAR", "Float"))),
            ]},
            enumeration("Priority", &["CRITICAL", "WARNING"]),
            scalar("Float"),
        ]));
        let r = resolve(&s, ["ConditionInput"], &RenderOptions::new());
        assert!(r.is_complete());
        assert_eq!(keys(&r), ["ConditionInput", "Priority", "TermInput"]);
        assert!(r.get("ConditionInput").unwrap().contains("pub terms: Vec<TermInput>,"));
        assert!(r.get("TermInput").unwrap().contains("pub threshold: f64,"));
    }

    #[test]
    fn sorted_orders_by_name() {
        let r = resolve(&node_and_status(), ["Status", "Node"], &RenderOptions::new());
        let names = r.sorted().iter().map(|t| t.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Node", "Status"]);
        assert_eq!(r.sorted()[1].kind, Kind::Enum);
    }
}
