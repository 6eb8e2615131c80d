//! The mail relay: one HTTP endpoint that hands a message to SMTP.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use lazy_static::lazy_static;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::CorsLayer;

use crate::settings::RelaySettings;

lazy_static! {
    static ref RE_ADDRESS: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub fn is_valid_address(address: &str) -> bool {
    RE_ADDRESS.is_match(address.trim())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailRequest {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MailResponse {
    pub fn sent(message: impl Into<String>) -> Self {
        MailResponse {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        MailResponse {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
    #[error(transparent)]
    Address(#[from] lettre::address::AddressError),
    #[error(transparent)]
    Message(#[from] lettre::error::Error),
    #[error(transparent)]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error("relay refused the message: {0}")]
    Rejected(String),
}

/// Something that can deliver a [`MailRequest`]. Returns the transport's
/// status line on success.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, request: &MailRequest) -> Result<String, MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Implicit-TLS SMTP relay with login credentials.
    pub fn new(settings: &RelaySettings) -> Result<Self, MailError> {
        let from: Mailbox = settings.from_address.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)?
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.smtp_user.clone(),
                settings.smtp_password.clone(),
            ))
            .build();
        Ok(SmtpMailer { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, request: &MailRequest) -> Result<String, MailError> {
        let to: Mailbox = request.to.trim().parse()?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(request.subject.clone())
            .body(request.text.clone())?;
        let response = self.transport.send(message).await?;
        let lines: Vec<&str> = response.message().collect();
        Ok(format!("{} {}", response.code(), lines.join(" ")))
    }
}

#[derive(Clone)]
struct RelayState {
    mailer: Arc<dyn Mailer>,
}

pub fn router(mailer: Arc<dyn Mailer>) -> Router {
    Router::new()
        .route("/send-email", post(send_email))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(RelayState { mailer })
}

async fn health() -> Json<MailResponse> {
    Json(MailResponse {
        success: true,
        message: None,
        error: None,
    })
}

async fn send_email(
    State(state): State<RelayState>,
    payload: Result<Json<MailRequest>, JsonRejection>,
) -> (StatusCode, Json<MailResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            log::warn!("Rejected mail request: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(MailResponse::failed(rejection.body_text())),
            );
        }
    };
    if !is_valid_address(&request.to) {
        let e = MailError::InvalidAddress(request.to);
        log::warn!("Rejected mail request: {}", e);
        return (StatusCode::BAD_REQUEST, Json(MailResponse::failed(e.to_string())));
    }

    match state.mailer.send(&request).await {
        Ok(status) => {
            log::info!("Mail to {} sent: {}", request.to, status);
            (
                StatusCode::OK,
                Json(MailResponse::sent(format!("Email sent: {}", status))),
            )
        }
        Err(e) => {
            log::error!("Mail to {} failed: {}", request.to, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MailResponse::failed(e.to_string())),
            )
        }
    }
}
