use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use log::info;
use crate::llm::ProviderKind;
use crate::models::chat::Language;

const OPENAI_SYSTEM_EN: &str = "You are a friendly health assistant for a free community clinic. Answer in English, in plain language a patient can understand. Give general health information only, never a diagnosis or prescription. Encourage the patient to book a visit with a clinic provider for personal concerns, and tell them to call 911 for emergencies.";
const OPENAI_SYSTEM_ES: &str = "Eres un asistente de salud amable de una clínica comunitaria gratuita. Responde en español, con lenguaje sencillo que un paciente pueda entender. Da solo información general de salud, nunca un diagnóstico ni una receta. Anima al paciente a hacer una cita con un proveedor de la clínica para asuntos personales y dile que llame al 911 en caso de emergencia.";
const LLAMA_SYSTEM_EN: &str = "You are a helpful community clinic health assistant. Reply in English with short, clear, general health information. Do not diagnose or prescribe. Recommend seeing a clinic provider for personal medical questions and calling 911 in an emergency.";
const LLAMA_SYSTEM_ES: &str = "Eres un asistente de salud útil de una clínica comunitaria. Responde en español con información general de salud breve y clara. No diagnostiques ni recetes. Recomienda ver a un proveedor de la clínica para preguntas médicas personales y llamar al 911 en una emergencia.";

#[derive(Debug)]
pub enum PromptError {
    TemplateNotFound(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::TemplateNotFound(key) => write!(f, "Prompt template '{}' not found", key),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
            PromptError::JsonError(e) => write!(f, "Prompt JSON parsing error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            PromptError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::JsonError(err)
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LocalizedPrompt {
    pub en: Option<String>,
    pub es: Option<String>,
}

/// System prompts keyed by provider name (`openai`, `llama`). Entries missing
/// from a prompts file fall back to the built-in text.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct PromptConfig {
    #[serde(default)]
    pub system_prompts: HashMap<String, LocalizedPrompt>,
}

impl PromptConfig {
    pub fn system_prompt(&self, provider: ProviderKind, language: Language) -> Result<&str, PromptError> {
        let configured = self.system_prompts.get(provider.as_str()).and_then(|p| {
            match language {
                Language::En => p.en.as_deref(),
                Language::Es => p.es.as_deref(),
            }
        });
        match configured {
            Some(prompt) => Ok(prompt),
            None => default_system_prompt(provider, language),
        }
    }
}

pub fn default_system_prompt(
    provider: ProviderKind,
    language: Language
) -> Result<&'static str, PromptError> {
    match (provider, language) {
        (ProviderKind::OpenAI, Language::En) => Ok(OPENAI_SYSTEM_EN),
        (ProviderKind::OpenAI, Language::Es) => Ok(OPENAI_SYSTEM_ES),
        (ProviderKind::Llama, Language::En) => Ok(LLAMA_SYSTEM_EN),
        (ProviderKind::Llama, Language::Es) => Ok(LLAMA_SYSTEM_ES),
        (ProviderKind::Offline, _) =>
            Err(PromptError::TemplateNotFound(format!("system_prompts:offline.{}", language))),
    }
}

pub fn load_prompts_from_str(json: &str) -> Result<Arc<PromptConfig>, PromptError> {
    let config: PromptConfig = serde_json::from_str(json)?;
    Ok(Arc::new(config))
}

pub fn load_prompts<P: AsRef<Path>>(path: P) -> Result<Arc<PromptConfig>, PromptError> {
    let file_content = fs::read_to_string(path.as_ref())?;
    let config = load_prompts_from_str(&file_content)?;
    info!("Loaded system prompts from: {}", path.as_ref().display());
    Ok(config)
}
