use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// A stored client: an arbitrary JSON object keyed by its `client_id`.
pub type Client = Map<String, Value>;

pub type Db = Arc<RwLock<HashMap<String, Client>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/clients", get(list_clients).post(create_client).put(update_client))
        .route("/clients/{id}", get(get_client).delete(delete_client))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// The body the service returns in place of a client that does not exist.
pub fn not_found_body() -> Value {
    json!({ "status": "404" })
}

fn str_field<'a>(client: &'a Client, key: &str) -> &'a str {
    client.get(key).and_then(Value::as_str).unwrap_or("")
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Parsed list query. Repeated keys (`tags_filter`) accumulate.
#[derive(Debug, Default)]
pub struct ListQuery {
    pub active_only: bool,
    pub client_name: Option<String>,
    pub search_terms: Option<String>,
    pub tags: Vec<String>,
    pub count: Option<usize>,
    pub offset: usize,
    pub sort_by: Option<String>,
    pub descending: bool,
    pub secondary_sort_by: Option<String>,
}

impl ListQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, String> {
        let mut query = ListQuery::default();
        for (key, value) in pairs {
            match key.as_str() {
                "activeClientsOnly" => query.active_only = value == "true",
                "client_name_filter" => query.client_name = Some(value),
                "search_terms_filter" => query.search_terms = Some(value),
                "tags_filter" => query.tags.push(value),
                "count" => {
                    query.count = Some(value.parse::<usize>().map_err(|_| format!("bad count '{value}'"))?)
                }
                "cursor" => {
                    query.offset = value.parse::<usize>().map_err(|_| format!("bad cursor '{value}'"))?
                }
                "sort_by" => query.sort_by = Some(value),
                "sort_order" => query.descending = value.eq_ignore_ascii_case("DESC"),
                "secondary_sort_by" => query.secondary_sort_by = Some(value),
                _ => {}
            }
        }
        Ok(query)
    }

    fn matches(&self, client: &Client) -> bool {
        if self.active_only && str_field(client, "status") != "active" {
            return false;
        }
        if let Some(name) = &self.client_name {
            if !contains_ignore_case(str_field(client, "client_name"), name) {
                return false;
            }
        }
        if let Some(terms) = &self.search_terms {
            if !contains_ignore_case(str_field(client, "client_name"), terms)
                && !contains_ignore_case(str_field(client, "description"), terms)
            {
                return false;
            }
        }
        let tags: Vec<&str> = client
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        self.tags.iter().all(|wanted| tags.contains(&wanted.as_str()))
    }

    fn compare(&self, a: &Client, b: &Client) -> Ordering {
        let primary = self.sort_by.as_deref().unwrap_or("client_id");
        let mut ordering = str_field(a, primary).cmp(str_field(b, primary));
        if let Some(secondary) = &self.secondary_sort_by {
            ordering = ordering.then_with(|| str_field(a, secondary).cmp(str_field(b, secondary)));
        }
        let ordering = ordering.then_with(|| str_field(a, "client_id").cmp(str_field(b, "client_id")));
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }

    pub fn apply(&self, clients: impl Iterator<Item = Client>) -> Vec<Client> {
        let mut selected: Vec<Client> = clients.filter(|c| self.matches(c)).collect();
        selected.sort_by(|a, b| self.compare(a, b));
        let page = selected.into_iter().skip(self.offset);
        match self.count {
            Some(count) => page.take(count).collect(),
            None => page.collect(),
        }
    }
}

async fn list_clients(
    State(db): State<Db>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Client>>, (StatusCode, String)> {
    let query = ListQuery::from_pairs(pairs).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    tracing::debug!(?query, "listing clients");
    let clients = db.read().await;
    Ok(Json(query.apply(clients.values().cloned())))
}

async fn create_client(
    State(db): State<Db>,
    Json(mut client): Json<Client>,
) -> Result<(StatusCode, Json<Client>), StatusCode> {
    let id = match client.get("client_id").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            let id = Uuid::new_v4().to_string();
            client.insert("client_id".to_string(), Value::String(id.clone()));
            id
        }
    };
    let mut clients = db.write().await;
    if clients.contains_key(&id) {
        tracing::debug!(client_id = %id, "client already exists");
        return Err(StatusCode::CONFLICT);
    }
    clients.insert(id, client.clone());
    Ok((StatusCode::CREATED, Json(client)))
}

async fn update_client(
    State(db): State<Db>,
    Json(mut client): Json<Client>,
) -> Result<Json<Client>, (StatusCode, Json<Value>)> {
    let id = str_field(&client, "client_id").to_string();
    let mut clients = db.write().await;
    let existing = clients
        .get_mut(&id)
        .ok_or((StatusCode::NOT_FOUND, Json(not_found_body())))?;

    // The creation time is owned by the store, not by the caller.
    if let Some(created) = existing.get("meta").and_then(|m| m.get("created")).cloned() {
        if let Some(meta) = client.get_mut("meta").and_then(Value::as_object_mut) {
            meta.insert("created".to_string(), created);
        }
    }
    *existing = client.clone();
    Ok(Json(client))
}

async fn get_client(State(db): State<Db>, Path(id): Path<String>) -> Json<Value> {
    let clients = db.read().await;
    match clients.get(&id) {
        Some(client) => Json(Value::Object(client.clone())),
        None => Json(not_found_body()),
    }
}

async fn delete_client(State(db): State<Db>, Path(id): Path<String>) -> StatusCode {
    let mut clients = db.write().await;
    match clients.remove(&id) {
        Some(_) => {
            tracing::debug!(client_id = %id, "client deleted");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}
