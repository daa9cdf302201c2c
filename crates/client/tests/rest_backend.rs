//! REST backend tests against a mock server.

use std::time::Duration;

use rust_decimal_macros::dec;
use serde_json::json;
use tally_client::{ClientError, RestBackend};
use tally_core::budget::{AppliedTax, BudgetLineItem, BudgetService, BudgetType};
use tally_core::ports::BudgetBackend;
use tally_shared::AppError;
use tally_shared::types::{BudgetId, ListQuery};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> RestBackend {
    RestBackend::new(format!("{}/api/", server.uri()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_items_parses_lenient_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/budget/budget-items/b-1"))
        .and(query_param("type", "income"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"category": "Ads", "description": "Pre-roll", "quantity": "2", "amount": "50", "total_amount": "100"},
                {"description": "Blank", "quantity": "", "amount": "", "total_amount": null}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = backend(&server)
        .fetch_items(&BudgetId::new("b-1"), BudgetType::Income)
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].quantity, Some(2));
    assert_eq!(items[0].total_amount, Some(dec!(100)));
    assert_eq!(items[1].amount, None);
    assert_eq!(BudgetService::grand_total(&items), dec!(100));
}

#[tokio::test]
async fn test_save_items_patches_full_buffer() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/budget/budget-items/b-1"))
        .and(body_partial_json(json!({"budget_type": "expense"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&server)
        .await;

    let items = vec![BudgetLineItem::empty(BudgetType::Expense); 3];
    backend(&server)
        .save_items(&BudgetId::new("b-1"), BudgetType::Expense, &items)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_apply_taxes_posts_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/budget/apply-tax"))
        .and(body_partial_json(json!({
            "budget_id": "b-1",
            "taxes": [{"tax_id": "gst", "tax_name": "GST"}]
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let items = [BudgetLineItem {
        total_amount: Some(dec!(300)),
        ..BudgetLineItem::empty(BudgetType::Income)
    }];
    let totals = BudgetService::totals(&items, &[AppliedTax::new("gst", "GST", dec!(10))]);
    let request = BudgetService::tax_request(&BudgetId::new("b-1"), &totals);

    backend(&server).apply_taxes(&request).await.unwrap();
}

#[tokio::test]
async fn test_list_budgets_sends_query_and_reads_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/budget"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .and(query_param("search", "morning"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"_id": "66a1", "budget_id": "BGT-0042", "title": "Morning Show"}],
            "pagination": {"totalRecords": 1}
        })))
        .mount(&server)
        .await;

    let page = backend(&server)
        .list_budgets(&ListQuery::default().with_search("morning"))
        .await
        .unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id.as_str(), "66a1");
    assert_eq!(page.pagination.total_records, 1);
}

#[tokio::test]
async fn test_fetch_subcategories_by_category_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/budget-category/sub-categories"))
        .and(query_param("category", "Travel"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": ["Flights", "Hotels"]})),
        )
        .mount(&server)
        .await;

    let names = backend(&server).fetch_subcategories("Travel").await.unwrap();
    assert_eq!(names, ["Flights", "Hotels"]);
}

#[tokio::test]
async fn test_error_status_maps_to_app_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/budget/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Budget not found"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/budget/budget-items/b-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let client = backend(&server);
    let err = client.get_budget(&BudgetId::new("missing")).await.unwrap_err();
    assert_eq!(err, AppError::NotFound("Budget not found".into()));

    let err = client
        .save_items(&BudgetId::new("b-1"), BudgetType::Income, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ExternalService(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let client = RestBackend::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    let err = client
        .fetch_applied_taxes(&BudgetId::new("b-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Network(_)));
}

#[test]
fn test_rejects_non_http_base_url() {
    assert!(matches!(
        RestBackend::new("localhost:5000", Duration::from_secs(1)),
        Err(ClientError::InvalidBaseUrl(_))
    ));
}
