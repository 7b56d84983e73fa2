use crate::models::chat::Language;
use serde::{ Deserialize, Serialize };
use thiserror::Error;

/// Failure of a hosted chat-completion call, classified at the client boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication or quota error (HTTP {status}): {message}")]
    AuthOrQuota {
        status: u16,
        message: String,
    },

    #[error("model is loading, retry in {estimated_time:?}s")]
    ModelLoading {
        estimated_time: Option<f64>,
    },

    #[error("provider error: {0}")]
    Generic(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    AuthOrQuota,
    ModelLoading,
    Generic,
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::Network(_) => ErrorKind::Network,
            ProviderError::AuthOrQuota { .. } => ErrorKind::AuthOrQuota,
            ProviderError::ModelLoading { .. } => ErrorKind::ModelLoading,
            ProviderError::Generic(_) => ErrorKind::Generic,
        }
    }

    /// Maps a non-success HTTP status. 503 is only meaningful as "warming up"
    /// for the Llama proxy, so callers opt in with `model_loading_on_503`.
    pub fn from_status(status: u16, message: impl Into<String>, model_loading_on_503: bool) -> Self {
        match status {
            401 | 403 | 429 =>
                ProviderError::AuthOrQuota {
                    status,
                    message: message.into(),
                },
            503 if model_loading_on_503 => ProviderError::ModelLoading { estimated_time: None },
            _ => ProviderError::Generic(format!("HTTP {}: {}", status, message.into())),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return ProviderError::from_status(status.as_u16(), err.to_string(), false);
        }
        if err.is_decode() {
            return ProviderError::Generic(format!("unexpected response body: {}", err));
        }
        ProviderError::Network(err.to_string())
    }
}

impl ErrorKind {
    /// Banner text shown to the patient when an answer came from the offline library.
    pub fn user_message(&self, language: Language) -> &'static str {
        match (self, language) {
            (ErrorKind::Network, Language::En) =>
                "We couldn't reach the AI service, so this answer comes from the offline library.",
            (ErrorKind::Network, Language::Es) =>
                "No pudimos conectar con el servicio de IA, así que esta respuesta viene de la biblioteca sin conexión.",
            (ErrorKind::AuthOrQuota, Language::En) =>
                "The AI service key is invalid or its usage limit was reached. Offline answers are being used until it is reset.",
            (ErrorKind::AuthOrQuota, Language::Es) =>
                "La clave del servicio de IA no es válida o se alcanzó su límite de uso. Se usarán respuestas sin conexión hasta que se restablezca.",
            (ErrorKind::ModelLoading, Language::En) =>
                "The AI model is still warming up. Please try again in a moment.",
            (ErrorKind::ModelLoading, Language::Es) =>
                "El modelo de IA todavía se está cargando. Intente de nuevo en un momento.",
            (ErrorKind::Generic, Language::En) =>
                "The AI service returned an unexpected answer, so this reply comes from the offline library.",
            (ErrorKind::Generic, Language::Es) =>
                "El servicio de IA devolvió una respuesta inesperada, así que esta respuesta viene de la biblioteca sin conexión.",
        }
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("failed to encode chat message: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("chat history store failed: {0}")]
    History(#[from] HistoryError),
}
