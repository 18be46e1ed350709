use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use super::{AppError, ListResponse, OptionEntry, Selection};
use crate::{
    client::{self, Client, ClientColumn, ClientPatch, ContractFile, PackageType},
    db::Database,
    error::ConsoleError,
    query::{self, ListQuery},
    stats::{self, ClientStats},
    store::{Deletion, Record},
    validation::{form_from_json, Mode, ValidationErrors},
};

pub async fn list_clients(
    State(db): State<Database>,
    list_query: Result<Query<ListQuery<ClientColumn>>, QueryRejection>,
) -> Result<Json<ListResponse<Client>>, AppError> {
    let Query(list_query) = list_query?;
    let clients = db.clients.read().await;
    let items: Vec<Client> = query::apply(clients.list(), &list_query)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ListResponse {
        matched: items.len(),
        total: clients.len(),
        items,
    }))
}

pub async fn get_client(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<Json<Client>, AppError> {
    db.clients
        .read()
        .await
        .get_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ConsoleError::not_found(Client::KIND, id).into())
}

pub async fn create_client(
    State(db): State<Database>,
    Json(body): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    let draft = client::parse_draft(&form_from_json(body)).map_err(ConsoleError::from)?;
    let client = db.clients.write().await.create(draft);
    info!(id = %client.id, package = %client.package_type, "Client created");

    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn replace_client(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<Client>, AppError> {
    let patch = client::parse_form(&form_from_json(body), Mode::Full).map_err(ConsoleError::from)?;
    update_client(db, id, patch).await
}

pub async fn patch_client(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<Client>, AppError> {
    let patch = client::parse_form(&form_from_json(body), Mode::Partial).map_err(ConsoleError::from)?;
    update_client(db, id, patch).await
}

async fn update_client(db: Database, id: String, patch: ClientPatch) -> Result<Json<Client>, AppError> {
    let updated = db
        .clients
        .write()
        .await
        .update(&id, patch)
        .ok_or_else(|| ConsoleError::not_found(Client::KIND, id))?;
    info!(id = %updated.id, "Client updated");

    Ok(Json(updated))
}

pub async fn delete_client(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<(StatusCode, String), AppError> {
    if !db.clients.write().await.delete(&id) {
        return Err(ConsoleError::not_found(Client::KIND, id).into());
    }
    info!(%id, "Client deleted");

    Ok((StatusCode::OK, "Client deleted".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct ContractUpload {
    file_name: Option<String>,
}

pub async fn attach_contract(
    State(db): State<Database>,
    Path(id): Path<String>,
    Query(upload): Query<ContractUpload>,
    content: Bytes,
) -> Result<Json<Client>, AppError> {
    let file_name = upload
        .file_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("file_name query parameter is required".to_string()))?;
    let contract = ContractFile::new(&file_name, content, Utc::now())
        .map_err(|error| ConsoleError::from(ValidationErrors::from(error)))?;
    let size = contract.size_bytes;

    let updated = update_client(db, id, ClientPatch::contract(Some(contract))).await?;
    info!(id = %updated.id, %file_name, size, "Contract attached");

    Ok(updated)
}

pub async fn download_contract(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let clients = db.clients.read().await;
    let client = clients
        .get_by_id(&id)
        .ok_or_else(|| ConsoleError::not_found(Client::KIND, id.as_str()))?;
    let contract = client
        .contract_file
        .as_ref()
        .ok_or_else(|| ConsoleError::not_found("contract of client", id.as_str()))?;

    let file_name: String = contract
        .file_name
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect();
    let headers = [
        (header::CONTENT_TYPE, contract.content_type().to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
    ];

    Ok((headers, contract.content.clone()).into_response())
}

pub async fn detach_contract(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<Json<Client>, AppError> {
    update_client(db, id, ClientPatch::contract(None)).await
}

pub async fn delete_clients(
    State(db): State<Database>,
    selection: Result<Json<Selection>, JsonRejection>,
) -> Result<Json<Deletion>, AppError> {
    let Json(selection) = selection?;
    let outcome = db
        .clients
        .write()
        .await
        .delete_many(selection.ids.iter().map(String::as_str));
    info!(
        deleted = outcome.deleted.len(),
        missing = outcome.missing.len(),
        "Clients deleted in bulk"
    );

    Ok(Json(outcome))
}

pub async fn client_stats(State(db): State<Database>) -> Json<ClientStats> {
    let today = Utc::now().date_naive();
    Json(stats::client_stats(db.clients.read().await.list(), today))
}

pub async fn client_packages() -> Json<Vec<OptionEntry>> {
    Json(
        PackageType::ALL
            .into_iter()
            .map(|package| OptionEntry {
                value: package.as_str(),
                label: package.label(),
            })
            .collect(),
    )
}
