use super::*;

#[test]
fn test_typed_id_from_str() {
    let id = BudgetId::from("65f0c2a1");
    assert_eq!(id.as_str(), "65f0c2a1");
    assert_eq!(id.to_string(), "65f0c2a1");
}

#[test]
fn test_typed_id_into_inner() {
    let id = TaxId::new(String::from("vat"));
    assert_eq!(id.into_inner(), "vat");
}

#[test]
fn test_typed_id_is_empty() {
    assert!(BudgetId::new("  ").is_empty());
    assert!(!BudgetId::new("b-1").is_empty());
}

#[test]
fn test_typed_id_serde_transparent() {
    let id = TaxId::new("gst");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"gst\"");
    let back: TaxId = serde_json::from_str("\"gst\"").unwrap();
    assert_eq!(back, id);
}
