use super::*;

#[test]
fn object_id_packs_into_nonzero_word() {
    let id = ObjectId::new(7, 3);
    let bits = id.to_bits();

    assert_ne!(bits, 0);
    assert_eq!(ObjectId::from_bits(bits), Some(id));
    assert_eq!(ObjectId::from_bits(0), None);
}

#[test]
fn view_kinds() {
    assert!(!ViewKind::ArrayBuffer.is_view());
    assert!(ViewKind::Uint8.is_view());
    assert_eq!(ViewKind::Uint8.class_name(), "Uint8Array");
    assert_eq!(ViewKind::Float64.element_size(), 8);

    assert!(ValueKind::ArrayBuffer(ViewKind::Int16).is_array_buffer_view());
    assert!(!ValueKind::ArrayBuffer(ViewKind::ArrayBuffer).is_array_buffer_view());
}

#[test]
fn value_conversions() {
    assert_eq!(Value::from(true), Value::Bool(true));
    assert_eq!(Value::from(5), Value::Int(5));
    assert_eq!(Value::default(), Value::Undefined);
    assert_eq!(Value::Int(1).as_object(), None);
}

#[test]
fn colors_toggle() {
    assert!(Colors::new(true).is_enabled());
    assert!(!Colors::new(false).is_enabled());
    assert_eq!(Colors::default(), Colors::OFF);
}
