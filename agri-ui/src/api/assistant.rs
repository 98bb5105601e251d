//! Voice assistant endpoint
//!
//! Takes the transcript of a spoken question and answers with the matched
//! topic and canned response. When `speak` is set the response is also
//! handed to the configured synthesizer; a synthesizer failure is reported
//! in the reply without failing the request.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use agri_advisor::{classify_intent, IntentMatch};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub utterance: String,
    #[serde(default)]
    pub speak: bool,
}

#[derive(Debug, Serialize)]
pub struct AssistantReply {
    #[serde(flatten)]
    pub answer: IntentMatch,
    /// Present when speech was requested and could not be produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_error: Option<String>,
}

/// POST /api/assistant
pub async fn ask_assistant(
    State(state): State<AppState>,
    Json(request): Json<AssistantRequest>,
) -> Json<AssistantReply> {
    let answer = classify_intent(&request.utterance);
    debug!(topic = %answer.topic, refinement = answer.refinement, "Assistant reply");

    let mut speech_error = None;
    if request.speak {
        if let Err(e) = state.speech.speak(answer.response).await {
            warn!(error = %e, "Speech output failed");
            speech_error = Some(e.user_message());
        }
    }

    Json(AssistantReply {
        answer,
        speech_error,
    })
}
