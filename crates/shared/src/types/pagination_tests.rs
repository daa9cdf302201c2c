use super::*;

#[test]
fn test_list_query_default() {
    let query = ListQuery::default();
    assert_eq!(query.page, 1);
    assert_eq!(query.limit, 10);
    assert!(query.search.is_none());
    assert!(query.status.is_none());
}

#[test]
fn test_list_query_offset() {
    let query = ListQuery::default();
    assert_eq!(query.offset(), 0);

    let query = ListQuery {
        page: 3,
        limit: 20,
        ..ListQuery::default()
    };
    assert_eq!(query.offset(), 40);
}

#[test]
fn test_list_query_blank_search_dropped() {
    let query = ListQuery::default().with_search("  ");
    assert!(query.search.is_none());

    let query = ListQuery::default().with_search("travel");
    assert_eq!(query.search.as_deref(), Some("travel"));
}

#[test]
fn test_list_query_serializes_without_empty_filters() {
    let json = serde_json::to_value(ListQuery::default()).unwrap();
    assert_eq!(json, serde_json::json!({"page": 1, "limit": 10}));

    let json = serde_json::to_value(ListQuery::default().with_status("active")).unwrap();
    assert_eq!(json["status"], "active");
}

#[test]
fn test_list_response_deserialize() {
    let body = r#"{"data": [1, 2, 3], "pagination": {"totalRecords": 25}}"#;
    let response: ListResponse<i32> = serde_json::from_str(body).unwrap();
    assert_eq!(response.data, vec![1, 2, 3]);
    assert_eq!(response.pagination.total_records, 25);
    assert_eq!(response.total_pages(10), 3);
}

#[test]
fn test_list_response_missing_pagination() {
    let response: ListResponse<i32> = serde_json::from_str(r#"{"data": []}"#).unwrap();
    assert_eq!(response.pagination.total_records, 0);
    assert_eq!(response.total_pages(10), 1);
}

#[test]
fn test_data_response_deserialize() {
    let response: DataResponse<String> = serde_json::from_str(r#"{"data": "ok"}"#).unwrap();
    assert_eq!(response.data, "ok");
}
