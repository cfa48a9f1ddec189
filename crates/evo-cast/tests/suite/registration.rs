use evo_cast::cluster::UsabilityRules;
use evo_cast::CastError;
use evo_config::FunctionalMockingConfig;
use evo_types::{ClassType, PrimitiveType, Type, TypeEnv};

use pretty_assertions::assert_eq;

use super::{seeded_with_defaults, Fixture};

const OBJECT_ONLY: &[(&str, i32)] = &[("java.lang.Object", 0)];

#[test]
fn abstract_types_register_their_implementations() {
    let fixture = Fixture::jdk();
    let mut manager = fixture.manager(&seeded_with_defaults(0, OBJECT_ONLY));

    manager.add_candidate_by_name(&fixture.cluster(), "java.util.List", 4);

    let registered: Vec<(String, i32)> = manager
        .candidates()
        .iter()
        .map(|(ty, priority)| (fixture.render(ty), *priority))
        .collect();
    assert_eq!(
        registered,
        vec![
            ("java.lang.Object".to_owned(), 0),
            ("java.util.ArrayList".to_owned(), 4),
            ("java.util.LinkedList".to_owned(), 4),
        ]
    );
}

#[test]
fn parameterized_abstract_types_keep_their_arguments() {
    let fixture = Fixture::jdk();
    let string = Type::class(fixture.store.well_known().string, vec![]);
    let mut manager = fixture.manager(&seeded_with_defaults(0, OBJECT_ONLY));

    manager
        .add_candidate(
            &fixture.cluster(),
            &fixture.ty("java.util.List", vec![string.clone()]),
            2,
        )
        .unwrap();

    for name in ["java.util.ArrayList", "java.util.LinkedList"] {
        assert!(manager.contains(&ClassType::new(fixture.class(name), vec![string.clone()])));
        assert!(!manager.contains(&ClassType::raw(fixture.class(name))));
    }
}

#[test]
fn functional_mocking_also_registers_the_abstract_type() {
    let fixture = Fixture::jdk();
    let list = fixture.class("java.util.List");

    let mut config = seeded_with_defaults(0, OBJECT_ONLY);
    config.functional_mocking = FunctionalMockingConfig {
        enabled: true,
        probability: 0.5,
    };
    let mut manager = fixture.manager(&config);
    manager.add_candidate_by_name(&fixture.cluster(), "java.util.List", 1);
    assert!(manager.contains(&ClassType::raw(list)));

    // Enabled with zero probability never produces a mock.
    config.functional_mocking.probability = 0.0;
    let mut manager = fixture.manager(&config);
    manager.add_candidate_by_name(&fixture.cluster(), "java.util.List", 1);
    assert!(!manager.contains(&ClassType::raw(list)));
}

#[test]
fn unusable_classes_are_skipped_silently() {
    let fixture = Fixture::jdk().with_rules(UsabilityRules::new().deny("java.util.ArrayList"));
    let mut manager = fixture.manager(&seeded_with_defaults(0, OBJECT_ONLY));

    manager.add_candidate_by_name(&fixture.cluster(), "java.util.ArrayList", 1);
    manager.add_candidate_by_name(&fixture.cluster(), "java.util.List", 1);

    assert!(!manager.contains(&ClassType::raw(fixture.class("java.util.ArrayList"))));
    assert!(manager.contains(&ClassType::raw(fixture.class("java.util.LinkedList"))));
}

#[test]
fn unknown_names_are_ignored() {
    let fixture = Fixture::jdk();
    let mut manager = fixture.manager(&seeded_with_defaults(
        0,
        &[("java.lang.Object", 0), ("com.example.Missing", 1)],
    ));
    assert_eq!(manager.len(), 1);

    manager.add_candidate_by_name(&fixture.cluster(), "org.example.Gone", 0);
    assert_eq!(manager.len(), 1);

    // Unqualified `java.lang` names resolve.
    manager.add_candidate_by_name(&fixture.cluster(), "String", 1);
    assert!(manager.contains(&ClassType::raw(fixture.store.well_known().string)));
}

#[test]
fn primitives_are_rejected_as_candidates() {
    let fixture = Fixture::jdk();
    let mut manager = fixture.manager(&seeded_with_defaults(0, OBJECT_ONLY));

    let err = manager
        .add_candidate(&fixture.cluster(), &Type::Primitive(PrimitiveType::Int), 0)
        .unwrap_err();
    assert_eq!(
        err,
        CastError::InvalidCandidate {
            candidate: "int".to_owned()
        }
    );
}

#[test]
fn re_registering_updates_priority_only() {
    let fixture = Fixture::jdk();
    let string = ClassType::raw(fixture.store.well_known().string);
    let mut manager = fixture.manager(&seeded_with_defaults(0, OBJECT_ONLY));

    manager.add_candidate(&fixture.cluster(), &string.to_type(), 5).unwrap();
    manager.add_candidate(&fixture.cluster(), &string.to_type(), 2).unwrap();

    assert_eq!(manager.len(), 2);
    assert!(manager.candidates().contains(&(string, 2)));
}
