//! End-to-end behaviour of entity views against the in-memory store.

use std::sync::Arc;

use rdfview_core::{vocab, Literal, Node, Value};
use rdfview_engine::{
    Argument, Element, EntityFactory, EntityView, NativeType, NativeValue, Operation, Outcome,
    PropertyDescriptor, SchemaError, SchemaSet, TypeSchema, TypedView, ValueConverterRegistry,
    ViewError,
};
use rdfview_store::{GraphStore, MemoryStore, SharedStore, StorePattern};

const EX: &str = "http://example.org/";

fn ex(local: &str) -> Node {
    Node::iri_unchecked(format!("{EX}{local}"))
}

fn schemas() -> SchemaSet {
    let agent = TypeSchema::new(ex("Agent")).with_property(
        "name",
        PropertyDescriptor::literal(ex("name"), true, NativeType::STRING),
    );
    let node = TypeSchema::new(ex("Node"))
        .with_supertype(ex("Agent"))
        .with_property(
            "pointsTo",
            PropertyDescriptor::entity(ex("pointsTo"), true, ex("Node")),
        )
        .with_property(
            "multiPointsTo",
            PropertyDescriptor::entity(ex("multiPointsTo"), false, ex("Node")),
        )
        .with_property(
            "age",
            PropertyDescriptor::literal(ex("age"), true, NativeType::INT),
        )
        .with_property(
            "tags",
            PropertyDescriptor::literal(ex("tag"), false, NativeType::STRING),
        )
        .with_property(
            "scores",
            PropertyDescriptor::literal(ex("score"), false, NativeType::DOUBLE),
        );
    let team = TypeSchema::new(ex("Team"))
        .with_property(
            "lead",
            PropertyDescriptor::entity(ex("lead"), true, ex("Agent")),
        )
        .with_property(
            "members",
            PropertyDescriptor::entity(ex("member"), false, ex("Agent")),
        );
    SchemaSet::new([agent, node, team]).unwrap()
}

fn setup() -> (EntityFactory, SharedStore) {
    let factory = EntityFactory::new(schemas(), ValueConverterRegistry::with_builtins()).unwrap();
    (factory, Arc::new(MemoryStore::new()))
}

fn type_statements(store: &SharedStore, resource: &Node, type_id: &Node) -> usize {
    store
        .filter(
            &StorePattern::new()
                .subject(resource)
                .predicate(&vocab::rdf::type_())
                .object(&Value::Resource(type_id.clone())),
        )
        .unwrap()
        .len()
}

// ── Existence ─────────────────────────────────────────────────────

#[test]
fn create_then_duplicate() {
    let (factory, store) = setup();

    let view = factory.create(&ex("Node"), &ex("r"), &store).unwrap();
    assert_eq!(view.resource(), &ex("r"));
    assert_eq!(type_statements(&store, &ex("r"), &ex("Node")), 1);

    let err = factory.create(&ex("Node"), &ex("r"), &store).unwrap_err();
    assert!(matches!(
        err,
        ViewError::DuplicateEntity { ref resource, ref type_id }
            if *resource == ex("r") && *type_id == ex("Node")
    ));
    assert_eq!(type_statements(&store, &ex("r"), &ex("Node")), 1);
}

#[test]
fn get_before_and_after_create() {
    let (factory, store) = setup();

    assert!(factory.get(&ex("Node"), &ex("r"), &store).unwrap().is_none());
    assert_eq!(store.size().unwrap(), 0);

    factory.create(&ex("Node"), &ex("r"), &store).unwrap();
    let found = factory.get(&ex("Node"), &ex("r"), &store).unwrap().unwrap();
    assert_eq!(found.resource(), &ex("r"));
    assert_eq!(found.type_id(), &ex("Node"));
}

#[test]
fn create_under_another_type_is_allowed() {
    let (factory, store) = setup();
    factory.create(&ex("Agent"), &ex("r"), &store).unwrap();
    assert!(factory.create(&ex("Node"), &ex("r"), &store).is_ok());
    assert_eq!(store.size().unwrap(), 2);
}

#[test]
fn views_share_the_store() {
    let (factory, store) = setup();
    let a = factory.create(&ex("Node"), &ex("a"), &store).unwrap();
    let b = factory.get(&ex("Node"), &ex("a"), &store).unwrap().unwrap();

    a.set_literal("name", "first".to_string()).unwrap();
    assert_eq!(b.get_literal::<String>("name").unwrap().as_deref(), Some("first"));
    assert_eq!(a, b);
}

#[test]
fn view_identity_comes_from_resource_and_type() {
    let (factory, store) = setup();
    let view = factory.create(&ex("Node"), &ex("a"), &store).unwrap();

    assert_eq!(
        view.to_string(),
        "<http://example.org/a> a <http://example.org/Node>"
    );
    assert!(format!("{view:?}").contains("http://example.org/a"));
    assert!(view.is_a(&ex("Agent")));
    assert!(!view.is_a(&ex("Thing")));
    assert_eq!(view.types().cloned().collect::<Vec<_>>(), vec![ex("Node"), ex("Agent")]);
}

// ── Literal properties ────────────────────────────────────────────

#[test]
fn functional_replace() {
    let (factory, store) = setup();
    let view = factory.create(&ex("Node"), &ex("r"), &store).unwrap();

    assert_eq!(view.get_literal::<String>("name").unwrap(), None);
    view.set_literal("name", "v1".to_string()).unwrap();
    view.set_literal("name", "v2".to_string()).unwrap();

    assert_eq!(view.get_literal::<String>("name").unwrap().as_deref(), Some("v2"));
    assert_eq!(view.core().get_properties(&ex("name")).unwrap().len(), 1);
}

#[test]
fn inherited_property_is_served() {
    let (factory, store) = setup();
    let view = factory.create(&ex("Node"), &ex("r"), &store).unwrap();
    view.set_literal("name", "n".to_string()).unwrap();

    let as_agent = factory.get(&ex("Agent"), &ex("r"), &store).unwrap();
    // Typed only as Node, so no Agent entity exists here.
    assert!(as_agent.is_none());
    assert_eq!(view.get_literal::<String>("name").unwrap().as_deref(), Some("n"));
}

#[test]
fn non_functional_mutation() {
    let (factory, store) = setup();
    let view = factory.create(&ex("Node"), &ex("r"), &store).unwrap();

    assert!(view.add_literal("tags", "v1".to_string()).unwrap());
    assert!(view.add_literal("tags", "v2".to_string()).unwrap());
    let mut tags: Vec<String> = view.get_literals("tags").unwrap();
    tags.sort();
    assert_eq!(tags, vec!["v1", "v2"]);

    assert!(view.remove_literal("tags", "v1".to_string()).unwrap());
    assert_eq!(view.get_literals::<String>("tags").unwrap(), vec!["v2"]);

    assert!(view.clear("tags").unwrap());
    assert!(view.get_literals::<String>("tags").unwrap().is_empty());
    assert!(!view.clear("tags").unwrap());
}

#[test]
fn non_functional_set_replaces_all() {
    let (factory, store) = setup();
    let view = factory.create(&ex("Node"), &ex("r"), &store).unwrap();

    view.set_literals("scores", [1.5, 2.5]).unwrap();
    view.set_literals("scores", [3.0]).unwrap();
    assert_eq!(view.get_literals::<f64>("scores").unwrap(), vec![3.0]);
}

#[test]
fn functional_add_keeps_single_value() {
    let (factory, store) = setup();
    let view = factory.create(&ex("Node"), &ex("r"), &store).unwrap();

    assert!(view.add_literal("age", 30i32).unwrap());
    assert!(!view.add_literal("age", 31i32).unwrap());
    assert_eq!(view.get_literal::<i32>("age").unwrap(), Some(30));
}

#[test]
fn literals_are_stored_with_datatypes() {
    let (factory, store) = setup();
    let view = factory.create(&ex("Node"), &ex("r"), &store).unwrap();
    view.set_literal("age", 42i32).unwrap();

    assert_eq!(
        view.core().get_property(&ex("age")).unwrap(),
        Some(Value::from(Literal::typed("42", vocab::xsd::datatype(vocab::xsd::INT))))
    );
}

#[test]
fn unparseable_stored_value_is_conversion_error() {
    let (factory, store) = setup();
    let view = factory.create(&ex("Node"), &ex("r"), &store).unwrap();
    view.core()
        .set_property(&Literal::string("forty").into(), &ex("age"))
        .unwrap();

    match view.get_literal::<i32>("age").unwrap_err() {
        ViewError::ValueConversion(e) => {
            assert_eq!(e.target, NativeType::INT);
            assert!(e.value.contains("forty"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn out_of_range_write_is_conversion_error() {
    let (factory, store) = setup();
    let view = factory.create(&ex("Node"), &ex("r"), &store).unwrap();
    let err = view.set_literal("age", i64::MAX).unwrap_err();
    assert!(matches!(err, ViewError::ValueConversion(_)));
    assert_eq!(view.get_literal::<i32>("age").unwrap(), None);
}

// ── Entity references ─────────────────────────────────────────────

#[test]
fn functional_entity_ref() {
    let (factory, store) = setup();
    let a = factory.create(&ex("Node"), &ex("a"), &store).unwrap();
    let b = factory.create(&ex("Node"), &ex("b"), &store).unwrap();

    a.set_entity("pointsTo", &b).unwrap();
    let target = a.get_entity("pointsTo").unwrap().unwrap();
    assert_eq!(target, b);
    assert_eq!(target.resource(), &ex("b"));

    // Untyping the target makes the reference read as absent.
    store
        .remove(
            &ex("b"),
            &vocab::rdf::type_(),
            Some(&Value::Resource(ex("Node"))),
            None,
        )
        .unwrap();
    assert_eq!(a.get_entity("pointsTo").unwrap(), None);
}

#[test]
fn non_functional_dangling_reference() {
    let (factory, store) = setup();
    let a = factory.create(&ex("Node"), &ex("a"), &store).unwrap();
    let b = factory.create(&ex("Node"), &ex("b"), &store).unwrap();
    let c = factory.create(&ex("Node"), &ex("c"), &store).unwrap();

    a.set_entities("multiPointsTo", [&b, &c]).unwrap();
    assert_eq!(a.get_entities("multiPointsTo").unwrap().len(), 2);

    store
        .remove(&ex("c"), &vocab::rdf::type_(), None, None)
        .unwrap();
    match a.get_entities("multiPointsTo").unwrap_err() {
        ViewError::DanglingReference {
            subject,
            property,
            target,
            target_type,
        } => {
            assert_eq!(subject, ex("a"));
            assert_eq!(property, "multiPointsTo");
            assert_eq!(target, ex("c"));
            assert_eq!(target_type, ex("Node"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn non_functional_entity_add_and_remove() {
    let (factory, store) = setup();
    let a = factory.create(&ex("Node"), &ex("a"), &store).unwrap();
    let b = factory.create(&ex("Node"), &ex("b"), &store).unwrap();

    assert!(a.add_entity("multiPointsTo", &b).unwrap());
    assert!(!a.add_entity("multiPointsTo", &b).unwrap());
    assert_eq!(a.get_entities("multiPointsTo").unwrap(), vec![b.clone()]);
    assert!(a.remove_entity("multiPointsTo", &b).unwrap());
    assert!(a.get_entities("multiPointsTo").unwrap().is_empty());
}

#[test]
fn entity_of_wrong_type_is_rejected() {
    let (factory, store) = setup();
    let a = factory.create(&ex("Node"), &ex("a"), &store).unwrap();
    let agent = factory.create(&ex("Agent"), &ex("x"), &store).unwrap();

    let err = a.set_entity("pointsTo", &agent).unwrap_err();
    assert!(matches!(err, ViewError::ArgumentShape { .. }));
}

#[test]
fn subtype_entities_read_back_through_supertype_properties() {
    let (factory, store) = setup();
    let team = factory.create(&ex("Team"), &ex("t"), &store).unwrap();
    let agent = factory.create(&ex("Agent"), &ex("ag"), &store).unwrap();
    let node = factory.create(&ex("Node"), &ex("n"), &store).unwrap();

    assert!(team.set_entity("lead", &node).unwrap());
    let lead = team.get_entity("lead").unwrap().unwrap();
    assert_eq!(lead, node);
    assert_eq!(lead.type_id(), &ex("Node"));
    assert!(lead.is_a(&ex("Agent")));

    assert!(team.add_entity("members", &node).unwrap());
    assert!(team.add_entity("members", &agent).unwrap());
    let members = team.get_entities("members").unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.contains(&node));
    assert!(members.contains(&agent));

    // A resource typed with both reads back under the exact type.
    factory.create(&ex("Agent"), &ex("n"), &store).unwrap();
    let lead = team.get_entity("lead").unwrap().unwrap();
    assert_eq!(lead.type_id(), &ex("Agent"));
}

#[test]
fn self_reference_does_not_recurse() {
    let (factory, store) = setup();
    let a = factory.create(&ex("Node"), &ex("a"), &store).unwrap();
    a.set_entity("pointsTo", &a).unwrap();
    let again = a.get_entity("pointsTo").unwrap().unwrap();
    assert_eq!(again.get_entity("pointsTo").unwrap().unwrap(), a);
}

// ── Generic dispatch ──────────────────────────────────────────────

#[test]
fn invoke_is_the_generic_entry_point() {
    let (factory, store) = setup();
    let view = factory.create(&ex("Node"), &ex("r"), &store).unwrap();

    let outcome = view
        .invoke(
            "tags",
            Operation::Set,
            Argument::Many(vec![
                Element::Literal(NativeValue::String("x".into())),
                Element::Literal(NativeValue::String("y".into())),
            ]),
        )
        .unwrap();
    assert_eq!(outcome, Outcome::Done);

    match view.invoke("tags", Operation::Get, Argument::None).unwrap() {
        Outcome::Many(elements) => assert_eq!(elements.len(), 2),
        other => panic!("unexpected outcome {other:?}"),
    }

    assert_eq!(
        view.invoke("name", Operation::Set, Argument::None).unwrap(),
        Outcome::Changed(false)
    );
}

#[test]
fn argument_shape_errors() {
    let (factory, store) = setup();
    let view = factory.create(&ex("Node"), &ex("r"), &store).unwrap();

    let err = view
        .invoke(
            "name",
            Operation::Set,
            Argument::Many(vec![Element::Literal(NativeValue::String("x".into()))]),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ViewError::ArgumentShape { operation: Operation::Set, .. }
    ));

    assert!(matches!(
        view.set_literal("tags", "x".to_string()),
        Err(ViewError::ArgumentShape { .. })
    ));
    assert!(matches!(
        view.get_literal::<String>("pointsTo"),
        Err(ViewError::ArgumentShape { .. })
    ));
}

#[test]
fn unknown_key_is_schema_error() {
    let (factory, store) = setup();
    let view = factory.create(&ex("Node"), &ex("r"), &store).unwrap();
    assert!(matches!(
        view.get_literal::<String>("nickname"),
        Err(ViewError::Schema(SchemaError::UnknownProperty { .. }))
    ));
}

// ── Typed facades ─────────────────────────────────────────────────

struct GraphNode(EntityView);

impl TypedView for GraphNode {
    const TYPE_IRI: &'static str = "http://example.org/Node";

    fn from_view(view: EntityView) -> Self {
        Self(view)
    }

    fn view(&self) -> &EntityView {
        &self.0
    }
}

impl GraphNode {
    fn age(&self) -> rdfview_engine::Result<Option<i32>> {
        self.0.get_literal("age")
    }

    fn set_age(&self, age: i32) -> rdfview_engine::Result<bool> {
        self.0.set_literal("age", age)
    }

    fn points_to(&self) -> rdfview_engine::Result<Option<GraphNode>> {
        Ok(self.0.get_entity("pointsTo")?.and_then(EntityView::into_typed))
    }
}

#[test]
fn typed_facade() {
    let (factory, store) = setup();
    let a: GraphNode = factory.create_typed(&ex("a"), &store).unwrap();
    let b: GraphNode = factory.create_typed(&ex("b"), &store).unwrap();

    a.set_age(7).unwrap();
    assert_eq!(a.age().unwrap(), Some(7));

    a.view().set_entity("pointsTo", b.view()).unwrap();
    assert_eq!(a.points_to().unwrap().unwrap().resource(), &ex("b"));

    let again = factory.get_typed::<GraphNode>(&ex("a"), &store).unwrap().unwrap();
    assert_eq!(again.age().unwrap(), Some(7));
    assert!(factory.get_typed::<GraphNode>(&ex("zzz"), &store).unwrap().is_none());
}

#[test]
fn anonymous_entities_use_blank_nodes() {
    let (factory, store) = setup();
    let view = factory.create_anonymous(&ex("Node"), &store).unwrap();
    assert!(view.resource().is_blank());
    assert!(factory.get(&ex("Node"), view.resource(), &store).unwrap().is_some());
}
