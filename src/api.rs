//! Transport-independent request handling. Both the HTTP server and the
//! function binding route every request through [`dispatch`], so validation
//! and response shapes live in one place.

use axum::http::{Method, StatusCode};
use serde::Serialize;
use serde_json::json;

use crate::{
    ledger::Ledger,
    models::{Guess, NewGuess, PredictedSex, Stats},
    result::{LedgerError, ValidationError},
};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const CACHE_CONTROL_VALUE: &str = "no-cache, no-store, must-revalidate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Guesses,
    Stats,
}

impl Resource {
    pub fn from_path(path: &str) -> Self {
        let path = path.split('?').next().unwrap_or_default();
        return if path.trim_end_matches('/').ends_with("/stats") {
            Self::Stats
        } else {
            Self::Guesses
        };
    }

    pub fn allowed_methods(&self) -> &'static str {
        return match self {
            Self::Guesses => "GET, POST, DELETE, OPTIONS",
            Self::Stats => "GET, OPTIONS",
        };
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("method not allowed")]
    MethodNotAllowed,
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        return Self::Ledger(LedgerError::Validation(err));
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        return match self {
            Self::Ledger(LedgerError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Ledger(LedgerError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        };
    }
}

/// A finished response: status plus a JSON document (empty for preflight).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn empty(status: StatusCode) -> Self {
        return Self {
            status,
            body: String::new(),
        };
    }

    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        return match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize response");
                Self::error(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        };
    }

    pub fn error(status: StatusCode, message: &str) -> Self {
        return Self {
            status,
            body: json!({ "error": message }).to_string(),
        };
    }
}

impl From<ApiError> for ApiResponse {
    fn from(err: ApiError) -> Self {
        let status = err.status();

        match &err {
            ApiError::Ledger(LedgerError::Storage(cause)) => {
                tracing::error!(error = ?cause, "storage failure");
            }
            ApiError::Ledger(LedgerError::Validation(cause)) => {
                tracing::debug!(field = ?cause.field(), "rejected guess: {cause}");
            }
            ApiError::MethodNotAllowed => {}
        }

        return Self::error(status, &err.to_string());
    }
}

#[derive(Serialize, Debug)]
pub struct GuessList {
    pub guesses: Vec<Guess>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedGuess {
    pub id: i64,
    pub message: &'static str,
    pub is_winner: bool,
}

#[derive(Serialize, Debug)]
pub struct Confirmation {
    pub message: &'static str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    #[serde(flatten)]
    pub stats: Stats,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_details: Option<Guess>,
}

type Fields = serde_json::Map<String, serde_json::Value>;

/// `None` for an absent or null field; a non-string value is rejected by name.
fn string_field(fields: &Fields, key: &'static str) -> Result<Option<String>, ValidationError> {
    return match fields.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(ValidationError::WrongType(key)),
    };
}

fn required_field(fields: &Fields, key: &'static str) -> Result<String, ValidationError> {
    return string_field(fields, key)?.ok_or(ValidationError::MissingField(key));
}

/// Validates a create-guess body. Required fields are checked in the order
/// `name`, `predictedSex`, `message`, `guessDate`.
pub fn parse_new_guess(body: &[u8]) -> Result<NewGuess, ValidationError> {
    let text =
        std::str::from_utf8(body).map_err(|err| ValidationError::Malformed(err.to_string()))?;
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyBody);
    }

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|err| ValidationError::Malformed(err.to_string()))?;
    let fields = match value {
        serde_json::Value::Object(fields) if fields.is_empty() => {
            return Err(ValidationError::EmptyBody)
        }
        serde_json::Value::Object(fields) => fields,
        _ => return Err(ValidationError::Malformed("expected a JSON object".to_string())),
    };

    let name = required_field(&fields, "name")?;
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyField("name"));
    }

    let predicted_sex = required_field(&fields, "predictedSex")?;
    let message = required_field(&fields, "message")?;
    let guess_date = required_field(&fields, "guessDate")?;

    let predicted_sex: PredictedSex = predicted_sex
        .parse()
        .map_err(|_| ValidationError::InvalidSex(predicted_sex.clone()))?;

    let suggested_name =
        string_field(&fields, "suggestedName")?.filter(|s| !s.trim().is_empty());

    return Ok(NewGuess {
        name,
        predicted_sex,
        suggested_name,
        message,
        guess_date,
    });
}

pub async fn list_guesses(ledger: &Ledger) -> Result<GuessList, ApiError> {
    let guesses = ledger.list_all().await?;
    return Ok(GuessList { guesses });
}

pub async fn create_guess(ledger: &Ledger, body: &[u8]) -> Result<CreatedGuess, ApiError> {
    let guess = parse_new_guess(body)?;

    let recorded = ledger.record(&guess).await?;
    if recorded.is_winner {
        tracing::info!(id = recorded.id, name = %guess.name, "winning guess recorded");
    } else {
        tracing::debug!(id = recorded.id, "guess recorded");
    }

    return Ok(CreatedGuess {
        id: recorded.id,
        message: "Guess added successfully",
        is_winner: recorded.is_winner,
    });
}

pub async fn clear_guesses(ledger: &Ledger) -> Result<Confirmation, ApiError> {
    let removed = ledger.clear_all().await?;
    tracing::warn!(removed, "all guesses removed");

    return Ok(Confirmation {
        message: "All guesses were removed",
    });
}

pub async fn get_stats(ledger: &Ledger) -> Result<StatsReport, ApiError> {
    let stats = ledger.compute_stats().await?;
    let winner_details = match stats.winner {
        Some(_) => ledger.winner_details().await?,
        None => None,
    };

    return Ok(StatsReport {
        stats,
        winner_details,
    });
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, ApiError>) -> ApiResponse {
    return match result {
        Ok(value) => ApiResponse::json(status, &value),
        Err(err) => err.into(),
    };
}

pub async fn dispatch(
    ledger: &Ledger,
    resource: Resource,
    method: &Method,
    body: &[u8],
) -> ApiResponse {
    if *method == Method::OPTIONS {
        return ApiResponse::empty(StatusCode::OK);
    }

    return match (resource, method) {
        (Resource::Guesses, &Method::GET) => respond(StatusCode::OK, list_guesses(ledger).await),
        (Resource::Guesses, &Method::POST) => {
            respond(StatusCode::CREATED, create_guess(ledger, body).await)
        }
        (Resource::Guesses, &Method::DELETE) => {
            respond(StatusCode::OK, clear_guesses(ledger).await)
        }
        (Resource::Stats, &Method::GET) => respond(StatusCode::OK, get_stats(ledger).await),
        _ => ApiError::MethodNotAllowed.into(),
    };
}
