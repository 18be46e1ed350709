use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Path, Query, State,
    },
    http::StatusCode,
};
use serde_json::{Map, Value};
use tracing::info;

use super::{AppError, ListResponse, OptionEntry, Selection};
use crate::{
    db::Database,
    error::ConsoleError,
    lead::{self, Lead, LeadColumn, LeadStatus, KNOWN_SOURCES},
    query::{self, ListQuery},
    stats::{self, LeadStats},
    store::{Deletion, Record},
    validation::{form_from_json, Mode},
};

pub async fn list_leads(
    State(db): State<Database>,
    list_query: Result<Query<ListQuery<LeadColumn>>, QueryRejection>,
) -> Result<Json<ListResponse<Lead>>, AppError> {
    let Query(list_query) = list_query?;
    let leads = db.leads.read().await;
    let items: Vec<Lead> = query::apply(leads.list(), &list_query)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ListResponse {
        matched: items.len(),
        total: leads.len(),
        items,
    }))
}

pub async fn get_lead(State(db): State<Database>, Path(id): Path<String>) -> Result<Json<Lead>, AppError> {
    db.leads
        .read()
        .await
        .get_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ConsoleError::not_found(Lead::KIND, id).into())
}

pub async fn create_lead(
    State(db): State<Database>,
    Json(body): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Lead>), AppError> {
    let draft = lead::parse_draft(&form_from_json(body)).map_err(ConsoleError::from)?;
    let lead = db.leads.write().await.create(draft);
    info!(id = %lead.id, status = %lead.status, "Lead created");

    Ok((StatusCode::CREATED, Json(lead)))
}

pub async fn replace_lead(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<Lead>, AppError> {
    update_lead(db, id, body, Mode::Full).await
}

pub async fn patch_lead(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<Lead>, AppError> {
    update_lead(db, id, body, Mode::Partial).await
}

async fn update_lead(
    db: Database,
    id: String,
    body: Map<String, Value>,
    mode: Mode,
) -> Result<Json<Lead>, AppError> {
    let patch = lead::parse_form(&form_from_json(body), mode).map_err(ConsoleError::from)?;
    let updated = db
        .leads
        .write()
        .await
        .update(&id, patch)
        .ok_or_else(|| ConsoleError::not_found(Lead::KIND, id))?;
    info!(id = %updated.id, "Lead updated");

    Ok(Json(updated))
}

pub async fn delete_lead(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<(StatusCode, String), AppError> {
    if !db.leads.write().await.delete(&id) {
        return Err(ConsoleError::not_found(Lead::KIND, id).into());
    }
    info!(%id, "Lead deleted");

    Ok((StatusCode::OK, "Lead deleted".to_string()))
}

pub async fn delete_leads(
    State(db): State<Database>,
    selection: Result<Json<Selection>, JsonRejection>,
) -> Result<Json<Deletion>, AppError> {
    let Json(selection) = selection?;
    let outcome = db
        .leads
        .write()
        .await
        .delete_many(selection.ids.iter().map(String::as_str));
    info!(
        deleted = outcome.deleted.len(),
        missing = outcome.missing.len(),
        "Leads deleted in bulk"
    );

    Ok(Json(outcome))
}

pub async fn lead_stats(State(db): State<Database>) -> Json<LeadStats> {
    Json(stats::lead_stats(db.leads.read().await.list()))
}

pub async fn lead_statuses() -> Json<Vec<OptionEntry>> {
    Json(
        LeadStatus::ALL
            .into_iter()
            .map(|status| OptionEntry {
                value: status.as_str(),
                label: status.label(),
            })
            .collect(),
    )
}

pub async fn lead_sources() -> Json<Vec<OptionEntry>> {
    Json(
        KNOWN_SOURCES
            .iter()
            .map(|&(value, _)| OptionEntry {
                value,
                label: lead::source_label(value),
            })
            .collect(),
    )
}
