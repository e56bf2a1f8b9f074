// handlers.rs
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;

use crate::error::PollError;
use crate::extract::{JsonBody, QueryParams};
use crate::ledger::{Question, SubmissionOutcome};
use crate::models::{
    AdminResults, BallotResponse, Configuration, ConfigurationUpdate, QuestionStatus,
    RealTallies, ResultComparison, ResultsResponse, SubmissionRequest, SubmissionResponse,
    TokenQuery, TokenRecord, VoteRecord,
};
use crate::services::PollService;
use crate::tally::Distribution;

pub type AppState = Arc<PollService>;

/// Token state and the options of each question.
pub async fn get_ballot(
    State(poll): State<AppState>,
    QueryParams(query): QueryParams<TokenQuery>,
) -> Result<Json<BallotResponse>, PollError> {
    let state = poll.token_state(query.token()?).await?;
    let questions = Question::ALL
        .into_iter()
        .map(|question| QuestionStatus {
            question,
            open: state.is_open(question),
            options: poll.ballot().options(question),
        })
        .collect();

    Ok(Json(BallotResponse { state, questions }))
}

pub async fn submit_intention(
    State(poll): State<AppState>,
    JsonBody(request): JsonBody<SubmissionRequest>,
) -> Result<Response, PollError> {
    submit(&poll, Question::Intention, request).await
}

pub async fn submit_rejection(
    State(poll): State<AppState>,
    JsonBody(request): JsonBody<SubmissionRequest>,
) -> Result<Response, PollError> {
    submit(&poll, Question::Rejection, request).await
}

async fn submit(
    poll: &PollService,
    question: Question,
    request: SubmissionRequest,
) -> Result<Response, PollError> {
    let outcome = poll
        .submit(question, &request.candidate, &request.token)
        .await?;
    let status = match outcome {
        SubmissionOutcome::Recorded => StatusCode::CREATED,
        SubmissionOutcome::AlreadyUsed => StatusCode::CONFLICT,
        SubmissionOutcome::NotFound => StatusCode::NOT_FOUND,
    };
    let body = SubmissionResponse {
        question,
        candidate: request.candidate,
        outcome,
    };
    Ok((status, Json(body)).into_response())
}

/// Displayed distributions for the questions this token already answered.
pub async fn get_results(
    State(poll): State<AppState>,
    QueryParams(query): QueryParams<TokenQuery>,
) -> Result<Json<ResultsResponse>, PollError> {
    let state = poll.token_state(query.token()?).await?;

    let mut results = ResultsResponse::default();
    for question in Question::ALL {
        if state.is_open(question) {
            continue;
        }
        let shown = Distribution::from(&poll.displayed_tally(question).await?);
        match question {
            Question::Intention => results.intention = Some(shown),
            Question::Rejection => results.rejection = Some(shown),
        }
    }
    Ok(Json(results))
}

pub async fn get_configuration(
    State(poll): State<AppState>,
) -> Result<Json<Configuration>, PollError> {
    Ok(Json(poll.configuration().await?))
}

pub async fn put_configuration(
    State(poll): State<AppState>,
    JsonBody(update): JsonBody<ConfigurationUpdate>,
) -> Result<Json<Configuration>, PollError> {
    Ok(Json(poll.save_configuration(update).await?))
}

pub async fn list_tokens(
    State(poll): State<AppState>,
) -> Result<Json<Vec<TokenRecord>>, PollError> {
    Ok(Json(poll.tokens().await?))
}

pub async fn reset_tokens(State(poll): State<AppState>) -> Result<impl IntoResponse, PollError> {
    let reset = poll.reset_tokens().await?;
    Ok(Json(json!({ "reset": reset })))
}

pub async fn list_votes(
    State(poll): State<AppState>,
    Path(question): Path<String>,
) -> Result<Json<Vec<VoteRecord>>, PollError> {
    let question: Question = question.parse()?;
    Ok(Json(poll.votes(question).await?))
}

pub async fn clear_votes(
    State(poll): State<AppState>,
    Path(question): Path<String>,
) -> Result<impl IntoResponse, PollError> {
    let question: Question = question.parse()?;
    let removed = poll.clear_votes(question).await?;
    Ok(Json(json!({ "question": question, "removed": removed })))
}

/// Untransformed tallies, zero-filled with every known option.
pub async fn real_tallies(State(poll): State<AppState>) -> Result<Json<RealTallies>, PollError> {
    let intention = poll
        .real_tally(Question::Intention)
        .await?
        .including(&poll.ballot().options(Question::Intention));
    let rejection = poll
        .real_tally(Question::Rejection)
        .await?
        .including(poll.ballot().candidates());
    Ok(Json(RealTallies {
        intention,
        rejection,
    }))
}

/// What participants are shown next to the real numbers, no token needed.
pub async fn admin_results(State(poll): State<AppState>) -> Result<Json<AdminResults>, PollError> {
    Ok(Json(AdminResults {
        intention: compare(&poll, Question::Intention).await?,
        rejection: compare(&poll, Question::Rejection).await?,
    }))
}

async fn compare(poll: &PollService, question: Question) -> Result<ResultComparison, PollError> {
    let (real, displayed) = poll.real_and_displayed(question).await?;
    Ok(ResultComparison {
        real: Distribution::from(&real),
        displayed: Distribution::from(&displayed),
    })
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
