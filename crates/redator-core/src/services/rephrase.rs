//! Rewriting a selected span of text.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ports::{CompletionRequest, TextGenerationClient};

const SYSTEM_PROMPT: &str = "Você é um assistente especializado em reformulação de texto, \
mantendo o tom profissional e adequado ao contexto.";

pub const REPHRASE_TEMPERATURE: f32 = 0.7;
pub const REPHRASE_MAX_TOKENS: u32 = 500;

/// How a selected span should be transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RephraseMode {
    Rephrase,
    Simplify,
    Expand,
    Summarize,
}

impl RephraseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RephraseMode::Rephrase => "rephrase",
            RephraseMode::Simplify => "simplify",
            RephraseMode::Expand => "expand",
            RephraseMode::Summarize => "summarize",
        }
    }

    /// The instruction wrapping `text` for this mode.
    pub fn instruction(&self, text: &str) -> String {
        match self {
            RephraseMode::Rephrase => format!(
                "Reformule o seguinte texto mantendo o mesmo significado, mas usando palavras diferentes: \"{text}\""
            ),
            RephraseMode::Simplify => format!(
                "Simplifique o seguinte texto, tornando-o mais fácil de entender: \"{text}\""
            ),
            RephraseMode::Expand => format!(
                "Expanda o seguinte texto, adicionando mais detalhes e explicações: \"{text}\""
            ),
            RephraseMode::Summarize => {
                format!("Resuma o seguinte texto mantendo os pontos principais: \"{text}\"")
            }
        }
    }
}

impl fmt::Display for RephraseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RephraseMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rephrase" => Ok(RephraseMode::Rephrase),
            "simplify" => Ok(RephraseMode::Simplify),
            "expand" => Ok(RephraseMode::Expand),
            "summarize" => Ok(RephraseMode::Summarize),
            other => Err(DomainError::InvalidInput(format!(
                "unknown rephrase mode '{other}'"
            ))),
        }
    }
}

/// Transforms a text span according to a [`RephraseMode`].
///
/// The response is returned verbatim. It is not sanitized here; whoever
/// splices it into a document must sanitize before storage or render.
#[derive(Clone)]
pub struct RephraseService {
    client: Arc<dyn TextGenerationClient>,
}

impl RephraseService {
    pub fn new(client: Arc<dyn TextGenerationClient>) -> Self {
        Self { client }
    }

    pub fn request_for(text: &str, mode: RephraseMode) -> CompletionRequest {
        CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: mode.instruction(text),
            temperature: REPHRASE_TEMPERATURE,
            max_tokens: REPHRASE_MAX_TOKENS,
        }
    }

    pub async fn rephrase(&self, text: &str, mode: RephraseMode) -> Result<String, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "select some text to rephrase".to_string(),
            ));
        }

        let result = self
            .client
            .complete(Self::request_for(text, mode))
            .await
            .map_err(|e| {
                tracing::warn!(mode = %mode, error = %e, "Rephrase failed");
                DomainError::from(e)
            })?;

        tracing::debug!(mode = %mode, input_chars = text.chars().count(), "Text rephrased");
        Ok(result)
    }

    /// Like [`RephraseService::rephrase`] with a mode name as it arrives on
    /// the wire. Unknown names fail before any request is made.
    pub async fn rephrase_named(&self, text: &str, mode: &str) -> Result<String, DomainError> {
        let mode: RephraseMode = mode.parse()?;
        self.rephrase(text, mode).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::TextGenerationError;
    use crate::services::testing::ScriptedClient;

    #[test]
    fn parses_known_modes() {
        for mode in [
            RephraseMode::Rephrase,
            RephraseMode::Simplify,
            RephraseMode::Expand,
            RephraseMode::Summarize,
        ] {
            assert_eq!(mode.as_str().parse::<RephraseMode>().unwrap(), mode);
        }
    }

    #[test]
    fn each_mode_has_its_own_instruction() {
        let prompts: Vec<String> = ["rephrase", "simplify", "expand", "summarize"]
            .iter()
            .map(|m| m.parse::<RephraseMode>().unwrap().instruction("texto"))
            .collect();
        for (i, a) in prompts.iter().enumerate() {
            assert!(a.ends_with("\"texto\""));
            for b in &prompts[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[tokio::test]
    async fn unknown_mode_fails_without_a_request() {
        let client = Arc::new(ScriptedClient::replying("ok"));
        let service = RephraseService::new(client.clone());

        let err = service.rephrase_named("algum texto", "translate").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn empty_selection_fails_without_a_request() {
        let client = Arc::new(ScriptedClient::replying("ok"));
        let service = RephraseService::new(client.clone());

        let err = service.rephrase(" ", RephraseMode::Expand).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn returns_model_text_verbatim() {
        let client = Arc::new(ScriptedClient::replying("Texto <b>mais simples</b>."));
        let service = RephraseService::new(client.clone());

        let out = service
            .rephrase("Texto rebuscado.", RephraseMode::Simplify)
            .await
            .unwrap();
        assert_eq!(out, "Texto <b>mais simples</b>.");

        let request = client.last_request().unwrap();
        assert_eq!(request.max_tokens, REPHRASE_MAX_TOKENS);
        assert!(request.prompt.starts_with("Simplifique"));
        assert!(request.prompt.contains("\"Texto rebuscado.\""));
    }

    #[tokio::test]
    async fn api_failure_surfaces_as_generation_failed() {
        let client = Arc::new(ScriptedClient::failing(TextGenerationError::Api(
            "rate limited".into(),
        )));
        let service = RephraseService::new(client);

        let err = service
            .rephrase("texto", RephraseMode::Rephrase)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::GenerationFailed(_)));
    }
}
