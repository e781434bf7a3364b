//! Web routes for the dashboard.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use seperlima_charts::{COUNT, books, leader, loans, members};
use seperlima_data::{CachePolicy, DataProvider, Table, columns as col};

use crate::error::WebError;
use crate::export::{Entity, csv_response, write_csv};
use crate::filters::{BookParams, LoanParams, MemberParams};
use crate::kpi::{LoanKpis, OverviewKpis, format_rupiah};
use crate::page::{self, ChartGrid, FilterForm, View};

/// Shared application state.
pub struct AppState {
    pub provider: Arc<DataProvider>,
}

/// Create the web router.
pub fn create_router(provider: Arc<DataProvider>) -> Router {
    let state = Arc::new(AppState { provider });

    Router::new()
        .route("/", get(overview))
        .route("/loans", get(loan_records))
        .route("/loans.csv", get(loans_csv))
        .route("/members", get(member_records))
        .route("/members.csv", get(members_csv))
        .route("/books", get(book_records))
        .route("/books.csv", get(books_csv))
        .route("/admin/cache/invalidate", post(invalidate_cache))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Overview
// ============================================================================

async fn overview(State(state): State<Arc<AppState>>) -> Result<Html<String>, WebError> {
    let loan_table = state.provider.fetch(Entity::Loans.query()).await?;
    let kpis = OverviewKpis::compute(&loan_table);

    let cards = page::kpi_row(&[
        page::kpi_card("Total loans", &kpis.total_loans.to_string(), "Every recorded transaction"),
        page::kpi_card("Unique members", &kpis.unique_members.to_string(), "Members who have borrowed"),
        page::kpi_card("Unique books", &kpis.unique_books.to_string(), "Distinct copies borrowed"),
        page::kpi_card("Total fines", &format_rupiah(kpis.total_fines), "Across all transactions"),
    ]);

    let mut charts = ChartGrid::new();

    let trend = loans::monthly_trend_by_status(&loan_table);
    let peak = loans::peak_month(&loan_table)
        .map(|(month, n)| format!("Busiest month: {month} ({n} loans)."));
    charts.push(&trend, peak);

    let per_faculty = loans::loans_per_faculty(&loan_table);
    let top_faculty = leader(&per_faculty.summary, COUNT).map(|row| {
        format!(
            "{} has the most loans, with {} transactions.",
            row.get(col::FACULTY_NAME),
            row.get(COUNT)
        )
    });
    charts.push(&per_faculty, top_faculty);

    charts.push(&loans::loans_per_category(&loan_table), None);

    let matrix = loans::faculty_category_matrix(&loan_table);
    let dominant = leader(&matrix.summary, COUNT).map(|row| {
        format!(
            "Most common pairing: {} × {} with {} loans.",
            row.get(col::FACULTY_NAME),
            row.get(col::BOOK_CATEGORY),
            row.get(COUNT)
        )
    });
    charts.push(&matrix, dominant);

    let durations = loans::mean_duration_per_faculty(&loan_table);
    let longest = leader(&durations.summary, loans::MEAN_DURATION).map(|row| {
        let days = row.get(loans::MEAN_DURATION).as_f64().unwrap_or_default();
        format!(
            "Longest average loan: {} ({days:.1} days).",
            row.get(col::FACULTY_NAME)
        )
    });
    charts.push(&durations, longest);

    let body = format!("{}<h2>Charts</h2>{}", cards, charts.render());
    Ok(Html(page::layout(View::Overview, "Library overview", &body)))
}

// ============================================================================
// Record pages
// ============================================================================

async fn loan_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LoanParams>,
) -> Result<Html<String>, WebError> {
    let all = state.provider.fetch(Entity::Loans.query()).await?;
    let filtered = params.filter().apply(&all);

    let bounds = all
        .min_max(col::LOAN_DATE)
        .and_then(|(lo, hi)| Some((lo.as_date()?, hi.as_date()?)));
    let range = params.range();

    let form = FilterForm::new()
        .date("start", "From", range.start, bounds)
        .date("end", "To", range.end, bounds)
        .select(
            "faculty",
            "Faculty",
            &all.distinct(col::FACULTY_NAME),
            params.faculty.as_deref(),
        )
        .select(
            "status",
            "Status",
            &all.distinct(col::LOAN_STATUS),
            params.status.as_deref(),
        )
        .search("q", "Book title...", params.q.as_deref())
        .render(Entity::Loans.path());

    let kpis = LoanKpis::compute(&filtered);
    let cards = page::kpi_row(&[
        page::kpi_card("Loans", &kpis.count.to_string(), "Matching the filters"),
        page::kpi_card("Total fines", &format_rupiah(kpis.total_fine), "Matching the filters"),
        page::kpi_card("Average duration", &kpis.mean_duration_label(), "Returned loans only"),
    ]);

    let mut charts = ChartGrid::new();
    charts.push(&loans::loans_per_status(&filtered), None);
    charts.push(&loans::top_titles(&filtered), None);
    charts.push(&loans::duration_buckets_per_status(&filtered), None);
    charts.push(&loans::duration_histogram(&filtered), None);
    charts.push(&loans::duration_vs_fine(&filtered), None);

    let body = [
        form,
        page::caption(&params.caption(bounds)),
        cards,
        records_section(Entity::Loans, &filtered, &params.pairs()),
        charts.render(),
    ]
    .concat();
    Ok(Html(page::layout(View::Loans, "Loan records", &body)))
}

async fn member_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MemberParams>,
) -> Result<Html<String>, WebError> {
    let all = state.provider.fetch(Entity::Members.query()).await?;
    let filtered = params.filter().apply(&all);

    let form = FilterForm::new()
        .select(
            "status",
            "Status",
            &all.distinct(col::MEMBER_STATUS),
            params.status.as_deref(),
        )
        .select(
            "faculty",
            "Faculty",
            &all.distinct(col::FACULTY_NAME),
            params.faculty.as_deref(),
        )
        .search("q", "Member name...", params.q.as_deref())
        .render(Entity::Members.path());

    let mut charts = ChartGrid::new();
    charts.push(&members::members_per_status(&filtered), None);
    charts.push(&members::members_per_faculty(&filtered), None);

    let body = [
        form,
        records_section(Entity::Members, &filtered, &params.pairs()),
        charts.render(),
    ]
    .concat();
    Ok(Html(page::layout(View::Members, "Member records", &body)))
}

async fn book_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BookParams>,
) -> Result<Html<String>, WebError> {
    let all = state.provider.fetch(Entity::Books.query()).await?;
    let filtered = params.filter().apply(&all);

    let limits = all
        .min_max(col::PUBLICATION_YEAR)
        .and_then(|(lo, hi)| Some((lo.as_i64()?, hi.as_i64()?)));
    let years = params.years();

    let form = FilterForm::new()
        .year("from_year", "Published from", years.from, limits)
        .year("to_year", "Published until", years.to, limits)
        .select(
            "category",
            "Category",
            &all.distinct(col::CATEGORY),
            params.category.as_deref(),
        )
        .search("q", "Book title...", params.q.as_deref())
        .render(Entity::Books.path());

    let mut charts = ChartGrid::new();
    charts.push(&books::books_per_category(&filtered), None);
    charts.push(&books::books_per_year(&filtered), None);
    charts.push(&books::books_per_physical_status(&filtered), None);

    let body = [
        form,
        records_section(Entity::Books, &filtered, &params.pairs()),
        charts.render(),
    ]
    .concat();
    Ok(Html(page::layout(View::Books, "Book records", &body)))
}

fn records_section(entity: Entity, table: &Table, params: &[(&str, &str)]) -> String {
    let action = format!("{}.csv", entity.path());
    format!(
        "{}{}",
        page::table_html(table),
        page::export_button(&action, params)
    )
}

// ============================================================================
// CSV export
// ============================================================================

async fn loans_csv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LoanParams>,
) -> Result<Response, WebError> {
    export(&state, Entity::Loans, |t| params.filter().apply(t)).await
}

async fn members_csv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MemberParams>,
) -> Result<Response, WebError> {
    export(&state, Entity::Members, |t| params.filter().apply(t)).await
}

async fn books_csv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BookParams>,
) -> Result<Response, WebError> {
    export(&state, Entity::Books, |t| params.filter().apply(t)).await
}

async fn export(
    state: &AppState,
    entity: Entity,
    filter: impl FnOnce(&Table) -> Table,
) -> Result<Response, WebError> {
    let all = state.provider.fetch(entity.query()).await?;
    let filtered = filter(all.as_ref());
    let body = write_csv(&filtered)?;
    info!(file = entity.file_name(), rows = filtered.len(), "csv exported");
    Ok(csv_response(entity, body))
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Serialize)]
struct InvalidateResponse {
    dropped: usize,
}

async fn invalidate_cache(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let dropped = state.provider.invalidate_all().await;
    Json(InvalidateResponse { dropped })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    cached: Vec<&'static str>,
    /// Absent under manual invalidation.
    cache_ttl_secs: Option<u64>,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cache = state.provider.cache();
    let cache_ttl_secs = match cache.policy() {
        CachePolicy::Manual => None,
        CachePolicy::Ttl(ttl) => Some(ttl.as_secs()),
    };
    let cached = cache
        .cached_queries()
        .await
        .into_iter()
        .map(|q| q.as_str())
        .collect();
    Json(HealthResponse {
        status: "ok",
        cached,
        cache_ttl_secs,
    })
}
