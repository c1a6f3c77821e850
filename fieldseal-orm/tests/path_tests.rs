//! Path resolution against a live unit of work.

use fieldseal_orm::{read_path, write_path, InMemoryUnitOfWork, OrmError, PropertyPath, UnitOfWork};
use fieldseal_types::{Record, TypeMetadata};
use pretty_assertions::assert_eq;
use serde_json::json;

fn uow_with_customer_and_address() -> InMemoryUnitOfWork {
    let mut uow = InMemoryUnitOfWork::new();
    uow.register_loaded(
        Record::new("a1", "address")
            .with_field("street", json!("12 Baker St"))
            .with_field("city", json!("London")),
    );
    uow.register_loaded(
        Record::new("c1", "customer")
            .with_field("name", json!("Ada"))
            .with_field("card_number", json!("4111-1111"))
            .with_relation("address", "a1"),
    );
    uow
}

#[test]
fn reads_a_direct_field() {
    let uow = uow_with_customer_and_address();
    let path = PropertyPath::parse("card_number").unwrap();

    let value = read_path(&uow, &"c1".to_string(), &path).unwrap();
    assert_eq!(value, json!("4111-1111"));
}

#[test]
fn reads_through_a_relation_hop() {
    let uow = uow_with_customer_and_address();
    let path = PropertyPath::parse("address.street").unwrap();

    let value = read_path(&uow, &"c1".to_string(), &path).unwrap();
    assert_eq!(value, json!("12 Baker St"));
}

#[test]
fn writes_through_a_relation_hop_without_disturbing_siblings() {
    let mut uow = uow_with_customer_and_address();
    let path = PropertyPath::parse("address.street").unwrap();

    let target = write_path(&mut uow, &"c1".to_string(), &path, json!("1 Main St")).unwrap();
    assert_eq!(target.record_type, "address");
    assert_eq!(target.record_id, "a1");
    assert!(target.via_relation);

    let address = uow.record(&"a1".to_string()).unwrap();
    assert_eq!(address.fields["street"], json!("1 Main St"));
    assert_eq!(address.fields["city"], json!("London"));

    let customer = uow.record(&"c1".to_string()).unwrap();
    assert_eq!(customer.fields["name"], json!("Ada"));
    assert_eq!(customer.fields["card_number"], json!("4111-1111"));
}

#[test]
fn direct_write_targets_the_root() {
    let mut uow = uow_with_customer_and_address();
    let path = PropertyPath::parse("card_number").unwrap();

    let target = write_path(&mut uow, &"c1".to_string(), &path, json!("xxxx")).unwrap();
    assert_eq!(target.record_id, "c1");
    assert!(!target.via_relation);
}

#[test]
fn unpopulated_relation_is_not_accessible() {
    let mut uow = InMemoryUnitOfWork::new();
    uow.register_loaded(Record::new("c1", "customer").with_field("name", json!("Ada")));
    let path = PropertyPath::parse("address.street").unwrap();

    let err = read_path(&uow, &"c1".to_string(), &path).unwrap_err();
    match err {
        OrmError::PropertyNotAccessible {
            record_type, path, ..
        } => {
            assert_eq!(record_type, "customer");
            assert_eq!(path, "address.street");
        }
        other => panic!("expected PropertyNotAccessible, got {other:?}"),
    }
}

#[test]
fn unloaded_relation_target_is_not_accessible() {
    let mut uow = InMemoryUnitOfWork::new();
    uow.register_loaded(
        Record::new("c1", "customer").with_relation("address", "a-missing"),
    );
    let path = PropertyPath::parse("address.street").unwrap();

    assert!(matches!(
        read_path(&uow, &"c1".to_string(), &path),
        Err(OrmError::PropertyNotAccessible { .. })
    ));
    assert!(matches!(
        write_path(&mut uow, &"c1".to_string(), &path, json!("x")),
        Err(OrmError::PropertyNotAccessible { .. })
    ));
}

#[test]
fn missing_leaf_field_is_not_accessible_on_read() {
    let uow = uow_with_customer_and_address();
    let path = PropertyPath::parse("address.postcode").unwrap();

    assert!(matches!(
        read_path(&uow, &"c1".to_string(), &path),
        Err(OrmError::PropertyNotAccessible { .. })
    ));
}

#[test]
fn write_validates_against_declared_metadata() {
    let mut uow = uow_with_customer_and_address();
    uow.register_metadata(
        TypeMetadata::new("address")
            .with_fields(["street", "city"]),
    );

    let declared = PropertyPath::parse("address.street").unwrap();
    assert!(write_path(&mut uow, &"c1".to_string(), &declared, json!("x")).is_ok());

    let undeclared = PropertyPath::parse("address.postcode").unwrap();
    assert!(matches!(
        write_path(&mut uow, &"c1".to_string(), &undeclared, json!("x")),
        Err(OrmError::PropertyNotAccessible { .. })
    ));
}

#[test]
fn unknown_root_record_is_not_accessible() {
    let uow = InMemoryUnitOfWork::new();
    let path = PropertyPath::parse("name").unwrap();

    assert!(matches!(
        read_path(&uow, &"ghost".to_string(), &path),
        Err(OrmError::PropertyNotAccessible { .. })
    ));
}
