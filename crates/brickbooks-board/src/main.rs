use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result as AnyResult;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use brickbooks_core::{
    BalanceSheetStrategy, Clock, HeuristicDerivation, MonthKey, RecordCategory, RecordStore,
    SystemClock, normalize, suggest_capital, suggest_cost, suggest_misc,
};
use brickbooks_finance::{
    BalanceSheet, CashFlowEntry, CashFlowInput, ConsistencyReport, DateRange, IncomeStatement,
    LineItem, OperatingFlows, OtherIncome, TransactionSummary, cash_flow, close_month,
};
use brickbooks_inventory::{
    StockLevel, StockStatus, movement_from_cost, movement_from_sale, record_movement,
    stock_levels,
};
use brickbooks_platform::{
    BalanceQuery, CashFlowLine, CashFlowRequest, HealthResponse, IncomeQuery, RecordCreated,
    ServiceConfig, StockQuery, SuggestQuery,
};
use brickbooks_store::{BookError, InMemoryRecordStore, RecordBook};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{error, info, warn};

type HandlerError = (StatusCode, String);

#[derive(Clone)]
struct AppState {
    book: Arc<RecordBook<Arc<dyn RecordStore>>>,
    strategy: Arc<dyn BalanceSheetStrategy>,
    clock: Arc<dyn Clock>,
    auto_inventory: bool,
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "brickbooks_board=info".to_string()),
        )
        .init();

    let config = ServiceConfig::from_env("0.0.0.0:8090")?;
    let store = match config.seed_document()? {
        Some(document) => InMemoryRecordStore::from_document(document)?,
        None => InMemoryRecordStore::default(),
    };
    let store: Arc<dyn RecordStore> = Arc::new(store);

    let state = AppState {
        book: Arc::new(RecordBook::new(store)),
        strategy: Arc::new(HeuristicDerivation::default()),
        clock: Arc::new(SystemClock),
        auto_inventory: config.auto_inventory,
    };
    let router = router(state);

    let addr: SocketAddr = config.http_addr.parse()?;
    info!("board service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/statements/income", get(income_statement))
        .route("/statements/balance", get(balance_sheet))
        .route(
            "/statements/cash-flow/{year}/{month}",
            get(cash_flow_month).post(close_cash_flow),
        )
        .route(
            "/statements/cash-flow/{year}/{month}/derive",
            post(derive_cash_flow),
        )
        .route("/checks", get(consistency_checks))
        .route("/summary", get(transaction_summary))
        .route("/inventory/stock", get(inventory_stock))
        .route("/suggestions/{category}", get(suggest_classification))
        .route("/records/{category}", get(list_records).post(create_record))
        .route(
            "/records/{category}/{id}",
            put(update_record).delete(delete_record),
        )
        .with_state(state)
}

async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        balance_strategy: state.strategy.name().to_string(),
        auto_inventory: state.auto_inventory,
    })
}

async fn income_statement(
    State(state): State<AppState>,
    Query(query): Query<IncomeQuery>,
) -> Result<Json<IncomeStatement>, HandlerError> {
    let period = match (query.from, query.to) {
        (Some(from), Some(to)) if from <= to => Some(DateRange::new(from, to)),
        (Some(from), Some(to)) => {
            return Err(bad_request(format!("period start {from} is after end {to}")));
        }
        (None, None) => None,
        _ => return Err(bad_request("both from and to are required for a period")),
    };
    let other = OtherIncome {
        interest_income: query.interest_income.unwrap_or_default(),
        interest_expense: query.interest_expense.unwrap_or_default(),
        gain_loss_on_assets: query.gain_loss_on_assets.unwrap_or_default(),
    };
    let tax = query.tax.unwrap_or_default();
    bounded(&[
        ("interest_income", other.interest_income),
        ("interest_expense", other.interest_expense),
        ("gain_loss_on_assets", other.gain_loss_on_assets),
        ("tax", tax),
    ])?;

    let snapshot = state.book.snapshot().await;
    let statement = IncomeStatement::build(&snapshot, period, other, tax);
    Ok(Json(statement))
}

async fn balance_sheet(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> Json<BalanceSheet> {
    let snapshot = state.book.snapshot().await;
    Json(BalanceSheet::build(
        &snapshot,
        query.as_of,
        state.strategy.as_ref(),
    ))
}

async fn cash_flow_month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<CashFlowEntry>, HandlerError> {
    let month = month_key(year, month)?;
    let history = cash_flow::history(state.book.as_ref()).await;
    history
        .get(month)
        .cloned()
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("no cash flow closed for {month}")))
}

async fn close_cash_flow(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Json(request): Json<CashFlowRequest>,
) -> Result<Json<CashFlowEntry>, HandlerError> {
    let mut figures = vec![
        ("operatingInflow", request.operating_inflow),
        ("operatingOutflow", request.operating_outflow),
        ("openingCash", request.opening_cash.unwrap_or_default()),
    ];
    figures.extend(
        request
            .investing
            .iter()
            .chain(&request.financing)
            .map(|line| (line.label.as_str(), line.amount)),
    );
    bounded(&figures)?;

    let lines = |items: Vec<CashFlowLine>| -> Vec<LineItem> {
        items
            .into_iter()
            .map(|line| LineItem {
                label: line.label,
                amount: line.amount,
            })
            .collect()
    };
    let input = CashFlowInput {
        month: month_key(year, month)?,
        operating: OperatingFlows {
            inflow: request.operating_inflow,
            outflow: request.operating_outflow,
        },
        investing: lines(request.investing),
        financing: lines(request.financing),
        opening_cash: request.opening_cash,
    };

    let entry = close_month(state.book.as_ref(), &input)
        .await
        .map_err(book_error)?;
    Ok(Json(entry))
}

async fn derive_cash_flow(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<CashFlowEntry>, HandlerError> {
    let month = month_key(year, month)?;
    let snapshot = state.book.snapshot().await;
    let input = CashFlowInput::from_records(month, &snapshot);

    let entry = close_month(state.book.as_ref(), &input)
        .await
        .map_err(book_error)?;
    Ok(Json(entry))
}

async fn consistency_checks(State(state): State<AppState>) -> Json<ConsistencyReport> {
    let snapshot = state.book.snapshot().await;
    let balance = BalanceSheet::build(&snapshot, None, state.strategy.as_ref());
    let report = ConsistencyReport::run(&snapshot, &balance, state.clock.as_ref());
    if !report.alerts.is_empty() {
        info!("consistency checks raised {} alerts", report.alerts.len());
    }
    Json(report)
}

async fn transaction_summary(State(state): State<AppState>) -> Json<TransactionSummary> {
    let snapshot = state.book.snapshot().await;
    Json(TransactionSummary::build(&snapshot))
}

async fn inventory_stock(
    State(state): State<AppState>,
    Query(query): Query<StockQuery>,
) -> Json<Vec<StockLevel>> {
    let snapshot = state.book.snapshot().await;
    let mut levels = stock_levels(&snapshot.movements, &snapshot.inventory);
    if query.low_only {
        levels.retain(|level| level.status == StockStatus::Low);
    }
    Json(levels)
}

async fn suggest_classification(
    Path(category): Path<String>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<Value>, HandlerError> {
    let amount = query.amount.unwrap_or_default();
    let suggestion = match record_category(&category)? {
        RecordCategory::Costs => serde_json::to_value(suggest_cost(&query.description, amount)),
        RecordCategory::Capital => serde_json::to_value(suggest_capital(&query.description)),
        RecordCategory::Miscellaneous => {
            serde_json::to_value(suggest_misc(&query.description, amount))
        }
        other => {
            return Err((
                StatusCode::NOT_FOUND,
                format!("no classification rules for {other}"),
            ));
        }
    };
    suggestion.map(Json).map_err(internal_error)
}

async fn list_records(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Value>>, HandlerError> {
    let category = record_category(&category)?;
    let records = match category {
        RecordCategory::Payroll => state.book.list_payroll().await,
        _ => state.book.list(category).await,
    };
    Ok(Json(records))
}

async fn create_record(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(record): Json<Value>,
) -> Result<(StatusCode, Json<RecordCreated>), HandlerError> {
    let category = writable_category(&category)?;
    let id = state
        .book
        .create(category, record)
        .await
        .map_err(book_error)?;

    let inventory_movement_id = if state.auto_inventory {
        sync_inventory(&state, category, id).await
    } else {
        None
    };

    Ok((
        StatusCode::CREATED,
        Json(RecordCreated {
            id,
            category: category.key().to_string(),
            inventory_movement_id,
        }),
    ))
}

async fn update_record(
    State(state): State<AppState>,
    Path((category, id)): Path<(String, i64)>,
    Json(record): Json<Value>,
) -> Result<StatusCode, HandlerError> {
    let category = writable_category(&category)?;
    state
        .book
        .edit(category, id, record)
        .await
        .map_err(book_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_record(
    State(state): State<AppState>,
    Path((category, id)): Path<(String, i64)>,
) -> Result<StatusCode, HandlerError> {
    let category = writable_category(&category)?;
    state
        .book
        .delete(category, id)
        .await
        .map_err(book_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Records the inventory movement implied by a new cost or sale. A failure
/// here leaves the created record in place.
async fn sync_inventory(state: &AppState, category: RecordCategory, id: i64) -> Option<i64> {
    let stored = state.book.list(category).await;
    let movement = match category {
        RecordCategory::Costs => normalize::costs(&stored)
            .iter()
            .find(|cost| cost.id == id)
            .and_then(movement_from_cost),
        RecordCategory::Sales => normalize::sales(&stored)
            .iter()
            .find(|sale| sale.id == id)
            .and_then(movement_from_sale),
        _ => None,
    }?;

    match record_movement(state.book.as_ref(), movement).await {
        Ok(movement_id) => Some(movement_id),
        Err(err) => {
            warn!("inventory movement for {category} record {id} was not recorded: {err}");
            None
        }
    }
}

/// Rejects entered figures too large for the ledger to carry.
fn bounded(figures: &[(&str, Decimal)]) -> Result<(), HandlerError> {
    match figures
        .iter()
        .find(|(_, amount)| !normalize::within_amount_limit(*amount))
    {
        Some((label, amount)) => Err(bad_request(format!(
            "{label} {amount} exceeds the supported magnitude of {}",
            normalize::AMOUNT_LIMIT
        ))),
        None => Ok(()),
    }
}

fn month_key(year: i32, month: u32) -> Result<MonthKey, HandlerError> {
    MonthKey::new(year, month).map_err(|err| bad_request(err.to_string()))
}

fn record_category(raw: &str) -> Result<RecordCategory, HandlerError> {
    RecordCategory::from_key(raw)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown record category {raw}")))
}

fn writable_category(raw: &str) -> Result<RecordCategory, HandlerError> {
    match record_category(raw)? {
        RecordCategory::CashFlow => Err(bad_request(
            "cash flow months are closed through /statements/cash-flow",
        )),
        category => Ok(category),
    }
}

fn book_error(err: BookError) -> HandlerError {
    match err {
        BookError::Validation(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        BookError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        BookError::Store(err) => {
            error!("record store failure: {err:#}");
            internal_error(err)
        }
    }
}

fn bad_request(message: impl Into<String>) -> HandlerError {
    (StatusCode::BAD_REQUEST, message.into())
}

fn internal_error<E: std::fmt::Display>(err: E) -> HandlerError {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickbooks_core::FixedClock;
    use brickbooks_finance::AlertKind;
    use chrono::NaiveDate;
    use serde_json::json;

    fn state_with(document: Value, auto_inventory: bool) -> AppState {
        let store: Arc<dyn RecordStore> =
            Arc::new(InMemoryRecordStore::from_document(document).unwrap());
        AppState {
            book: Arc::new(RecordBook::new(store)),
            strategy: Arc::new(HeuristicDerivation::default()),
            clock: Arc::new(FixedClock(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap())),
            auto_inventory,
        }
    }

    fn state() -> AppState {
        state_with(json!({}), false)
    }

    fn cost(description: &str, amount: i64) -> Value {
        json!({
            "date": "2025-01-10",
            "category": "Raw Materials",
            "description": description,
            "amount": amount,
        })
    }

    #[tokio::test]
    async fn health_reports_strategy() {
        let Json(health) = healthz(State(state())).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.balance_strategy, "heuristic-ratios");
    }

    #[tokio::test]
    async fn created_records_flow_into_statements() {
        let state = state();
        create_record(
            State(state.clone()),
            Path("sales".to_string()),
            Json(json!({"date": "2025-01-05", "description": "Blocks", "amount": 100})),
        )
        .await
        .unwrap();
        create_record(
            State(state.clone()),
            Path("costs".to_string()),
            Json(cost("Cement", 40)),
        )
        .await
        .unwrap();

        let Json(statement) = income_statement(State(state), Query(IncomeQuery::default()))
            .await
            .unwrap();

        assert_eq!(statement.gross_profit, Decimal::from(60));
    }

    #[tokio::test]
    async fn half_open_periods_are_rejected() {
        let query = IncomeQuery {
            from: NaiveDate::from_ymd_opt(2025, 1, 1),
            ..IncomeQuery::default()
        };

        let (status, _) = income_statement(State(state()), Query(query))
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_records_are_unprocessable() {
        let (status, message) = create_record(
            State(state()),
            Path("costs".to_string()),
            Json(json!({"date": "2025-01-10"})),
        )
        .await
        .unwrap_err();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(message.contains("category"));
    }

    #[tokio::test]
    async fn unknown_categories_and_ids_are_not_found() {
        let state = state();

        let (unknown, _) = list_records(State(state.clone()), Path("invoices".to_string()))
            .await
            .unwrap_err();
        let (missing, _) = delete_record(State(state), Path(("costs".to_string(), 42)))
            .await
            .unwrap_err();

        assert_eq!(unknown, StatusCode::NOT_FOUND);
        assert_eq!(missing, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn edits_and_deletes_by_id() {
        let state = state();
        let (_, Json(created)) = create_record(
            State(state.clone()),
            Path("costs".to_string()),
            Json(cost("Cement", 40)),
        )
        .await
        .unwrap();

        let edited = update_record(
            State(state.clone()),
            Path(("costs".to_string(), created.id)),
            Json(cost("Cement", 55)),
        )
        .await
        .unwrap();
        assert_eq!(edited, StatusCode::NO_CONTENT);

        let Json(records) = list_records(State(state.clone()), Path("costs".to_string()))
            .await
            .unwrap();
        assert_eq!(records[0]["amount"], json!(55));

        delete_record(State(state.clone()), Path(("costs".to_string(), created.id)))
            .await
            .unwrap();
        let Json(records) = list_records(State(state), Path("costs".to_string()))
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn cash_flow_months_chain() {
        let state = state();
        let december = CashFlowRequest {
            operating_inflow: Decimal::from(500),
            operating_outflow: Decimal::from(200),
            opening_cash: Some(Decimal::from(100)),
            ..CashFlowRequest::default()
        };

        close_cash_flow(State(state.clone()), Path((2024, 12)), Json(december))
            .await
            .unwrap();
        let Json(january) = close_cash_flow(
            State(state.clone()),
            Path((2025, 1)),
            Json(CashFlowRequest::default()),
        )
        .await
        .unwrap();
        assert_eq!(january.beginning_cash, Decimal::from(400));

        let Json(stored) = cash_flow_month(State(state.clone()), Path((2024, 12)))
            .await
            .unwrap();
        assert_eq!(stored.ending_cash, Decimal::from(400));

        let (status, _) = cash_flow_month(State(state), Path((2025, 13)))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn derived_cash_flow_uses_recorded_sales() {
        let state = state_with(
            json!({
                "sales": [{"id": 1, "date": "2025-02-03", "amount": 250, "paid": "yes"}],
                "costs": [{"id": 2, "date": "2025-02-04", "category": "Rent", "amount": 100}],
            }),
            false,
        );

        let Json(entry) = derive_cash_flow(State(state), Path((2025, 2)))
            .await
            .unwrap();

        assert_eq!(entry.net_operating, Decimal::from(150));
        assert_eq!(entry.ending_cash, Decimal::from(150));
    }

    #[tokio::test]
    async fn cash_flow_cannot_be_written_as_records() {
        let (status, _) = create_record(
            State(state()),
            Path("cashFlow".to_string()),
            Json(json!({"month": "2025-01"})),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn checks_flag_overdue_receivables() {
        let state = state_with(
            json!({
                "sales": [{"id": 1, "date": "2025-02-19", "description": "Blocks", "amount": 80, "paid": "no"}],
            }),
            false,
        );

        let Json(report) = consistency_checks(State(state)).await;

        assert!(
            report
                .alerts
                .iter()
                .any(|alert| alert.kind == AlertKind::OverdueReceivable)
        );
        assert_eq!(report.overdue_receivables[0].days_overdue, 40);
    }

    #[tokio::test]
    async fn production_costs_move_stock_when_enabled() {
        let state = state_with(json!({}), true);
        let (_, Json(created)) = create_record(
            State(state.clone()),
            Path("costs".to_string()),
            Json(json!({
                "date": "2025-01-10",
                "category": "Raw Materials",
                "description": "Cement",
                "amount": 400,
                "usedInProduction": "yes",
                "quantity": 20,
                "unit": "bags",
            })),
        )
        .await
        .unwrap();
        assert!(created.inventory_movement_id.is_some());

        let Json(levels) = inventory_stock(State(state), Query(StockQuery::default())).await;

        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].item, "Cement");
        assert_eq!(levels[0].current_stock, Decimal::from(20));
    }

    #[tokio::test]
    async fn summary_and_balance_read_the_same_ledger() {
        let state = state_with(
            json!({
                "sales": [{"id": 1, "date": "2025-01-05", "amount": 1000}],
                "costs": [{"id": 2, "date": "2025-01-10", "category": "Rent", "amount": 400}],
            }),
            false,
        );

        let Json(summary) = transaction_summary(State(state.clone())).await;
        let Json(sheet) = balance_sheet(State(state), Query(BalanceQuery::default())).await;

        assert_eq!(summary.sales.total, Decimal::from(1000));
        assert_eq!(sheet.current_assets.cash, Decimal::from(600));
    }

    #[tokio::test]
    async fn out_of_range_stored_amounts_do_not_break_reports() {
        let huge = "79228162514264337593543950335";
        let state = state_with(
            json!({
                "sales": [
                    {"id": 1, "date": "2025-01-05", "description": "Blocks", "amount": huge},
                    {"id": 2, "date": "2025-01-06", "description": "Blocks", "amount": huge},
                    {"id": 3, "date": "2025-01-07", "description": "Pavers", "amount": 10},
                ],
            }),
            false,
        );

        let Json(statement) =
            income_statement(State(state.clone()), Query(IncomeQuery::default()))
                .await
                .unwrap();
        let Json(summary) = transaction_summary(State(state.clone())).await;
        let Json(report) = consistency_checks(State(state)).await;

        assert_eq!(statement.sales, Decimal::from(10));
        assert_eq!(summary.sales.total, Decimal::from(10));
        assert_eq!(report.checked_on, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
    }

    #[tokio::test]
    async fn oversized_figures_and_years_are_bad_requests() {
        let query = IncomeQuery {
            tax: Some(Decimal::MAX),
            ..IncomeQuery::default()
        };
        let (income, _) = income_statement(State(state()), Query(query))
            .await
            .unwrap_err();

        let request = CashFlowRequest {
            financing: vec![CashFlowLine {
                label: "Loan".to_string(),
                amount: Decimal::MAX,
            }],
            ..CashFlowRequest::default()
        };
        let (cash, message) = close_cash_flow(State(state()), Path((2025, 1)), Json(request))
            .await
            .unwrap_err();

        let (year, _) = close_cash_flow(
            State(state()),
            Path((i32::MAX, 1)),
            Json(CashFlowRequest::default()),
        )
        .await
        .unwrap_err();

        assert_eq!(income, StatusCode::BAD_REQUEST);
        assert_eq!(cash, StatusCode::BAD_REQUEST);
        assert!(message.starts_with("Loan"));
        assert_eq!(year, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn legacy_payslips_are_listed_and_editable_as_payroll() {
        let state = state_with(
            json!({
                "payslips": [{
                    "id": 1,
                    "date": "2025-01-31",
                    "name": "Ana",
                    "position": "Mason",
                    "basicSalary": 300,
                }],
            }),
            false,
        );
        create_record(
            State(state.clone()),
            Path("payroll".to_string()),
            Json(json!({
                "date": "2025-02-28",
                "name": "Ben",
                "position": "Driver",
                "basicSalary": 250,
            })),
        )
        .await
        .unwrap();

        let Json(listed) = list_records(State(state.clone()), Path("payroll".to_string()))
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);

        let edited = update_record(
            State(state.clone()),
            Path(("payroll".to_string(), 1)),
            Json(json!({
                "date": "2025-01-31",
                "name": "Ana",
                "position": "Mason",
                "basicSalary": 320,
            })),
        )
        .await
        .unwrap();
        assert_eq!(edited, StatusCode::NO_CONTENT);

        let Json(statement) = income_statement(State(state), Query(IncomeQuery::default()))
            .await
            .unwrap();
        assert_eq!(statement.payroll, Decimal::from(570));
    }

    #[tokio::test]
    async fn suggestions_follow_the_category_rules() {
        let query = |description: &str, amount: i64| SuggestQuery {
            description: description.to_string(),
            amount: Some(Decimal::from(amount)),
        };

        let Json(cost) = suggest_classification(
            Path("costs".to_string()),
            Query(query("Cement bags", 300)),
        )
        .await
        .unwrap();
        let Json(capital) = suggest_classification(
            Path("capital".to_string()),
            Query(query("Bank loan", 0)),
        )
        .await
        .unwrap();
        let (status, _) =
            suggest_classification(Path("sales".to_string()), Query(query("Blocks", 1)))
                .await
                .unwrap_err();

        assert_eq!(cost["group"], json!("COGS"));
        assert_eq!(capital["kind"], json!("loan"));
        assert_eq!(capital["cashFlow"], json!("financing"));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn production_costs_without_quantity_receive_one_unit() {
        let state = state_with(json!({}), true);
        create_record(
            State(state.clone()),
            Path("costs".to_string()),
            Json(json!({
                "date": "2025-01-10",
                "category": "Raw Materials",
                "description": "Sand",
                "amount": 150,
                "usedInProduction": true,
            })),
        )
        .await
        .unwrap();

        let Json(levels) =
            inventory_stock(State(state.clone()), Query(StockQuery::default())).await;
        assert_eq!(levels[0].current_stock, Decimal::ONE);
        assert_eq!(levels[0].unit, "units");

        let Json(movements) =
            list_records(State(state), Path("inventoryMovements".to_string()))
                .await
                .unwrap();
        assert!(
            movements[0]["referenceNumber"]
                .as_str()
                .is_some_and(|reference| reference.starts_with("TX-INV-"))
        );
        assert!(
            movements[0]["sourceReference"]
                .as_str()
                .is_some_and(|reference| reference.starts_with("TX-COSTS-"))
        );
    }
}
