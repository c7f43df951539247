use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State as AxumState},
    Json,
};
use serde::{Deserialize, Serialize};
use skillswap_core::profile::{PublicProfile, RequesterSummary};
use skillswap_core::{Decision, GraphError, Profile, ProfileId, RequestOutcome, UserId};

use crate::{error::AppError, extract::AuthUser, form::ProfileForm, state::State};

/// Reply to a connection request. A repeated request still succeeds and is
/// marked with `alreadyRequested`; asking an existing connection is the only
/// `success: false` outcome.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestReply {
    success: bool,
    already_requested: bool,
    message: &'static str,
    profile_id: ProfileId,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_count: Option<usize>,
}

impl From<RequestOutcome> for RequestReply {
    fn from(outcome: RequestOutcome) -> Self {
        let request_count = match outcome {
            RequestOutcome::Sent { request_count, .. }
            | RequestOutcome::AlreadyRequested { request_count, .. } => Some(request_count),
            RequestOutcome::AlreadyConnected { .. } => None,
        };
        Self {
            success: !matches!(outcome, RequestOutcome::AlreadyConnected { .. }),
            already_requested: matches!(outcome, RequestOutcome::AlreadyRequested { .. }),
            message: outcome.message(),
            profile_id: outcome.profile_id(),
            request_count,
        }
    }
}

#[derive(Deserialize)]
pub struct HandleRequest {
    #[serde(default)]
    action: String,
}

#[derive(Serialize)]
pub struct HandleReply {
    success: bool,
    message: String,
}

pub async fn all_profiles_handler(
    AxumState(state): AxumState<Arc<State>>,
    user: AuthUser,
) -> Result<Json<Vec<PublicProfile>>, AppError> {
    Ok(Json(state.graph.list_public_profiles(user.id).await?))
}

pub async fn own_profile_handler(
    AxumState(state): AxumState<Arc<State>>,
    user: AuthUser,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(state.graph.get_profile(user.id).await?))
}

pub async fn upsert_profile_handler(
    AxumState(state): AxumState<Arc<State>>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<Profile>, AppError> {
    let form = ProfileForm::read(multipart).await?;
    let profile = state
        .graph
        .upsert_profile(user.id, form.update, form.photo)
        .await?;
    Ok(Json(profile))
}

pub async fn requests_handler(
    AxumState(state): AxumState<Arc<State>>,
    user: AuthUser,
) -> Result<Json<Vec<RequesterSummary>>, AppError> {
    Ok(Json(state.graph.get_incoming_requests(user.id).await?))
}

pub async fn request_connection_handler(
    AxumState(state): AxumState<Arc<State>>,
    user: AuthUser,
    Path(profile_id): Path<String>,
) -> Result<Json<RequestReply>, AppError> {
    let target: ProfileId = profile_id
        .parse()
        .map_err(|_| GraphError::not_found("User not found"))?;

    let outcome = state.graph.request_connection(user.id, target).await?;
    Ok(Json(outcome.into()))
}

pub async fn handle_request_handler(
    AxumState(state): AxumState<Arc<State>>,
    user: AuthUser,
    Path(requester_id): Path<String>,
    payload: Result<Json<HandleRequest>, JsonRejection>,
) -> Result<Json<HandleReply>, AppError> {
    let Json(payload) = payload?;
    let requester: UserId = requester_id
        .parse()
        .map_err(|_| GraphError::not_found("Request not found"))?;
    let decision: Decision = payload.action.parse().map_err(GraphError::ValidationFailed)?;

    let outcome = state
        .graph
        .resolve_request(user.id, requester, decision)
        .await?;

    Ok(Json(HandleReply {
        success: true,
        message: outcome.message(),
    }))
}
