use axum::extract::State;
use axum::Json;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ApiError;
use crate::character::CharacterData;
use crate::media::{self, JPEG_QUALITY};
use crate::prompt;
use crate::state::AppState;

/// Inbound body for `POST /generate`. The discriminator stays a plain
/// string so an unrecognized value reaches the handler and gets the fixed
/// "Invalid generation type." answer instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "characterData", default)]
    pub character_data: Option<CharacterData>,
}

/// Outbound body: exactly one of the two shapes, per generation type.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GenerateResponse {
    Story {
        text: String,
    },
    Portrait {
        image_base_64: String,
        mime_type: &'static str,
    },
}

/// Single endpoint of the relay. Strictly sequential per request:
/// validate, build the prompt, call the generation backend, and for
/// portraits transcode the returned bitmap to JPEG before answering.
pub async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Some(character) = request.character_data else {
        return Err(ApiError::MissingCharacterData);
    };

    match request.kind.as_str() {
        "story" => {
            let prompt = prompt::story_prompt(&character);
            debug!(target: "handlers.generate", prompt_len = prompt.len(), "Dispatching story generation");

            let text = state.backend.generate_text(&prompt).await?;
            info!("Story generated ({} chars)", text.len());
            Ok(Json(GenerateResponse::Story { text }))
        }
        "portrait" => {
            if let Some(field) = character.first_incomplete_portrait_field() {
                return Err(ApiError::IncompleteCharacterData(field));
            }

            let prompt = prompt::portrait_prompt(&character);
            debug!(target: "handlers.generate", prompt_len = prompt.len(), "Dispatching portrait generation");

            let raw = state.backend.generate_image(&prompt).await?;
            let jpeg = media::transcode_to_jpeg(&raw, JPEG_QUALITY)?;
            info!(
                "Portrait generated ({} raw bytes, {} JPEG bytes)",
                raw.len(),
                jpeg.len()
            );

            Ok(Json(GenerateResponse::Portrait {
                image_base_64: general_purpose::STANDARD.encode(jpeg),
                mime_type: "image/jpeg",
            }))
        }
        _ => Err(ApiError::InvalidGenerationType),
    }
}
