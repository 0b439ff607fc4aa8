//! `POST /api/share` — publish a note and any linked notes.

use axum::{Json, extract::State};
use serde::Deserialize;

use evergreen_core::store::ObjectStore;

use crate::{
  AppState,
  error::ApiError,
  repo::{LinkedInput, PublishReceipt, PublishRequest},
};

/// Body: the primary note plus optional linked notes published in the
/// same operation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareBody {
  pub vault:   Option<String>,
  pub title:   Option<String>,
  pub content: Option<String>,
  #[serde(default)]
  pub linked_notes:   Vec<LinkedNoteBody>,
  #[serde(default)]
  pub retention_days: u32,
}

#[derive(Debug, Deserialize)]
pub struct LinkedNoteBody {
  pub title:   String,
  pub content: String,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<ShareBody>,
) -> Result<Json<PublishReceipt>, ApiError>
where
  S: ObjectStore + Clone + 'static,
{
  let vault = require(body.vault, "vault")?;
  let title = require(body.title, "title")?;
  let content = body
    .content
    .ok_or_else(|| ApiError::BadRequest("missing content".into()))?;

  let receipt = state
    .repo
    .publish(PublishRequest {
      vault,
      title,
      content,
      linked: body
        .linked_notes
        .into_iter()
        .map(|n| LinkedInput { title: n.title, content: n.content })
        .collect(),
      retention_days: body.retention_days,
    })
    .await?;

  Ok(Json(receipt))
}

fn require(field: Option<String>, name: &str) -> Result<String, ApiError> {
  field
    .filter(|v| !v.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest(format!("missing {name}")))
}
