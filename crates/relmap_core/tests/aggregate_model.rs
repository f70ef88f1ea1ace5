use relmap_core::{Child, Parent};
use uuid::Uuid;

#[test]
fn parent_serializes_with_ordered_child_ids() {
    let parent_id = Uuid::parse_str("6f1c2a4e-9b3d-4c8e-a1f0-2d5e7b9c0a11").unwrap();
    let child_id = Uuid::parse_str("0b8e4d2c-7a19-4f36-9e5d-c3a2b1f0e987").unwrap();
    let parent = Parent::with_id(parent_id, vec![Child::with_id(child_id)]);

    let json = serde_json::to_value(&parent).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "6f1c2a4e-9b3d-4c8e-a1f0-2d5e7b9c0a11",
            "children": [{ "id": "0b8e4d2c-7a19-4f36-9e5d-c3a2b1f0e987" }]
        })
    );
}

#[test]
fn parent_deserializes_from_external_json() {
    let json = r#"{"id":"6f1c2a4e-9b3d-4c8e-a1f0-2d5e7b9c0a11","children":[]}"#;
    let parent: Parent = serde_json::from_str(json).unwrap();
    assert!(parent.children.is_empty());
    assert_eq!(
        parent.id.to_string(),
        "6f1c2a4e-9b3d-4c8e-a1f0-2d5e7b9c0a11"
    );
}
