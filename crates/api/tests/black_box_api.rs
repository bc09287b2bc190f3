use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};

use stallbook_ai::{LlmClient, MockLlmClient};
use stallbook_api::app::{router_with, AppServices};
use stallbook_infra::store::InMemorySnapshotStore;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(None).await
    }

    async fn spawn_with(llm: Option<Arc<dyn LlmClient>>) -> Self {
        // Same router as prod over a seeded in-memory store, on an ephemeral port.
        let services = AppServices::new(
            Box::new(InMemorySnapshotStore::seeded()),
            llm.map(|client| (client, "test-model".to_string())),
        )
        .expect("failed to build services");
        let app = router_with(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> Value {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "GET {path}");
        res.json().await.unwrap()
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(&body).send().await.unwrap()
    }

    async fn item_id(&self, name: &str) -> String {
        let items = self.get_json("/inventory/items").await;
        items
            .as_array()
            .unwrap()
            .iter()
            .find(|i| i["name"] == name)
            .unwrap_or_else(|| panic!("{name} not listed"))["id"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::spawn().await;
    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn purchase_of_new_ingredient_creates_item_and_transaction() {
    let server = TestServer::spawn().await;

    let res = server
        .post(
            "/inventory/purchases",
            json!({ "name": "Onions", "quantity": 10.0, "unit": "kg" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["itemCreated"], true);
    assert_eq!(body["item"]["quantity"], 10.0);
    assert_eq!(body["item"]["status"], "in-stock");
    assert_eq!(body["transaction"]["type"], "purchase");
    assert!(body.get("expense").is_none());

    let transactions = server.get_json("/inventory/transactions").await;
    assert_eq!(transactions[0]["name"], "Onions");
    assert_eq!(transactions.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn purchase_of_existing_ingredient_increments_and_books_expense() {
    let server = TestServer::spawn().await;
    let chicken_id = server.item_id("Chicken").await;

    let res = server
        .post(
            "/inventory/purchases",
            json!({ "name": "  chicken ", "quantity": 5.0, "unit": "kg", "cost": 5000 }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["itemCreated"], false);
    assert_eq!(body["item"]["id"], chicken_id.as_str());
    assert_eq!(body["item"]["name"], "Chicken");
    assert_eq!(body["item"]["quantity"], 25.0);
    assert_eq!(body["expense"]["amount"], 5000);
    assert_eq!(body["expense"]["category"], "supplies");

    let items = server.get_json("/inventory/items").await;
    assert_eq!(items.as_array().unwrap().len(), 2);

    let expenses = server.get_json("/expenses").await;
    assert_eq!(expenses.as_array().unwrap().len(), 2);
    assert_eq!(expenses[0]["amount"], 5000);
}

#[tokio::test]
async fn usage_above_stock_is_rejected_with_details() {
    let server = TestServer::spawn().await;
    let chicken_id = server.item_id("Chicken").await;

    let res = server
        .post(
            &format!("/inventory/items/{chicken_id}/usage"),
            json!({ "quantity": 50.0 }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["name"], "Chicken");
    assert_eq!(body["requested"], 50.0);
    assert_eq!(body["available"], 20.0);
    assert_eq!(body["unit"], "kg");

    let item = server.get_json(&format!("/inventory/items/{chicken_id}")).await;
    assert_eq!(item["quantity"], 20.0);
}

#[tokio::test]
async fn usage_of_all_stock_leaves_item_out_of_stock() {
    let server = TestServer::spawn().await;
    let chicken_id = server.item_id("Chicken").await;

    let res = server
        .post(
            &format!("/inventory/items/{chicken_id}/usage"),
            json!({ "quantity": 20.0 }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["item"]["quantity"], 0.0);
    assert_eq!(body["item"]["status"], "out-of-stock");
    assert_eq!(body["transaction"]["type"], "usage");

    let low = server.get_json("/inventory/low-stock").await;
    assert_eq!(low[0]["name"], "Chicken");
}

#[tokio::test]
async fn bad_and_unknown_ids_are_distinguished() {
    let server = TestServer::spawn().await;

    let res = server
        .post("/inventory/items/not-a-uuid/usage", json!({ "quantity": 1.0 }))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");

    let res = server
        .client
        .get(server.url("/inventory/items/0190b7a4-1d2e-7c3f-8a9b-0c1d2e3f4a5b"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn edited_transaction_keeps_history_and_shows_drift() {
    let server = TestServer::spawn().await;
    let transactions = server.get_json("/inventory/transactions").await;
    let tx_id = transactions[0]["id"].as_str().unwrap().to_string();

    let res = server
        .client
        .put(server.url(&format!("/inventory/transactions/{tx_id}")))
        .json(&json!({ "type": "purchase", "name": "Chicken", "quantity": 30.0, "unit": "kg", "cost": 2000000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["quantity"], 30.0);
    assert_eq!(body["editHistory"].as_array().unwrap().len(), 1);
    assert_eq!(body["editHistory"][0]["originalValues"]["quantity"], 25.0);

    let original = server
        .get_json(&format!("/inventory/transactions/{tx_id}/revisions/0"))
        .await;
    assert_eq!(original["values"]["quantity"], 25.0);
    assert_eq!(original["latest"], 1);

    let res = server
        .client
        .get(server.url(&format!("/inventory/transactions/{tx_id}/revisions/2")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Editing does not move stock.
    let item = server.get_json(&format!("/inventory/items/{}", server.item_id("Chicken").await)).await;
    assert_eq!(item["quantity"], 20.0);

    let lines = server.get_json("/inventory/reconciliation").await;
    let chicken = lines
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["name"] == "Chicken")
        .unwrap();
    assert_eq!(chicken["transactionNet"], 30.0);
    assert_eq!(chicken["drift"], -10.0);
}

#[tokio::test]
async fn sale_defaults_its_amount_and_can_be_edited() {
    let server = TestServer::spawn().await;

    let res = server
        .post("/sales", json!({ "variation": "medium", "quantity": 3, "type": "cash" }))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let sale: Value = res.json().await.unwrap();
    assert_eq!(sale["amount"], 300_000);
    let sale_id = sale["id"].as_str().unwrap().to_string();

    let res = server
        .client
        .put(server.url(&format!("/sales/{sale_id}")))
        .json(&json!({ "variation": "medium", "quantity": 2, "type": "jazzcash", "amount": 200000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let edited: Value = res.json().await.unwrap();
    assert_eq!(edited["type"], "jazzcash");
    assert_eq!(edited["editHistory"][0]["originalValues"]["quantity"], 3);

    let sales = server.get_json("/sales").await;
    assert_eq!(sales.as_array().unwrap().len(), 3);
    assert_eq!(sales[0]["id"], sale_id.as_str());

    let res = server
        .post("/sales", json!({ "variation": "small", "quantity": 0, "type": "cash" }))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expense_form_is_validated() {
    let server = TestServer::spawn().await;

    let res = server
        .post(
            "/expenses",
            json!({ "amount": 5000, "category": "utilities", "description": "   " }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let res = server
        .post(
            "/expenses",
            json!({ "amount": 5000, "category": "utilities", "description": "Gas bill" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let categories = server.get_json("/expenses/categories").await;
    assert_eq!(categories.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn summary_and_csv_exports_cover_the_seed_data() {
    let server = TestServer::spawn().await;

    let summary = server.get_json("/reports/summary").await;
    assert_eq!(summary["totalSales"], 280_000);
    assert_eq!(summary["totalExpenses"], 150_000);
    assert_eq!(summary["netProfit"], 130_000);

    let ranged = server
        .get_json("/reports/summary?from=2023-10-26T00:00:00Z&to=2023-10-26T10:30:00Z")
        .await;
    assert_eq!(ranged["totalSales"], 120_000);
    assert_eq!(ranged["totalExpenses"], 0);

    let res = server.client.get(server.url("/reports/compiled.csv")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res.headers()[reqwest::header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/csv"));
    let csv = res.text().await.unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().contains("Amount_PKR"));
    assert_eq!(lines.count(), 3);
    assert!(csv.contains("-1500.00"));

    let res = server
        .client
        .get(server.url("/reports/export/inventory.csv"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("Pita Bread"));

    let res = server
        .client
        .get(server.url("/reports/export/customers"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn compiled_report_with_empty_range_is_no_data() {
    let server = TestServer::spawn().await;

    let res = server
        .client
        .get(server.url("/reports/compiled.csv?from=2030-01-01T00:00:00Z"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "no_data");
}

#[tokio::test]
async fn suggestions_need_a_model() {
    let server = TestServer::spawn().await;

    let res = server
        .post("/suggestions", json!({ "season": "winter", "menu": "shawarma" }))
        .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn suggestions_parse_the_model_answer() {
    let mock: Arc<dyn LlmClient> = Arc::new(MockLlmClient {
        response: "```json\n{\"ingredientSuggestions\": {\"Chicken\": 30, \"Pita Bread\": 120}, \"reasoning\": \"Cold weekends sell more.\"}\n```".to_string(),
    });
    let server = TestServer::spawn_with(Some(mock)).await;

    let res = server
        .post("/suggestions", json!({ "season": "winter", "menu": "Small, Medium, Large" }))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ingredientSuggestions"]["Chicken"], 30.0);
    assert_eq!(body["reasoning"], "Cold weekends sell more.");

    let res = server
        .post("/suggestions", json!({ "season": " ", "menu": "Small" }))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_model_answer_is_a_bad_gateway() {
    let mock: Arc<dyn LlmClient> = Arc::new(MockLlmClient {
        response: "I cannot help with that.".to_string(),
    });
    let server = TestServer::spawn_with(Some(mock)).await;

    let res = server
        .post("/suggestions", json!({ "salesData": "", "season": "summer", "menu": "Small" }))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "model_error");
}

#[tokio::test]
async fn stream_announces_committed_sales() {
    let server = TestServer::spawn().await;

    let mut stream = server.client.get(server.url("/stream")).send().await.unwrap();
    assert_eq!(stream.status(), StatusCode::OK);

    let res = server
        .post("/sales", json!({ "variation": "bun-burger", "quantity": 1, "type": "easypaisa" }))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let mut seen = String::new();
    while !seen.contains("event: sales.updated") {
        let chunk = tokio::time::timeout(Duration::from_secs(5), stream.chunk())
            .await
            .expect("no realtime message within timeout")
            .unwrap()
            .expect("stream ended");
        seen.push_str(&String::from_utf8_lossy(&chunk));
    }
    assert!(seen.contains("saleId"));
}

#[tokio::test]
async fn stock_lookup_matches_name_case_insensitively() {
    let server = TestServer::spawn().await;

    let chicken = server.get_json("/inventory/stock?name=chicken&unit=kg").await;
    assert_eq!(chicken["quantity"], 20.0);
    assert_eq!(chicken["known"], true);
    assert_eq!(chicken["status"], "in-stock");

    let missing = server.get_json("/inventory/stock?name=chicken&unit=g").await;
    assert_eq!(missing["known"], false);
    assert_eq!(missing["status"], "out-of-stock");
}
