//! Post text generation
//!
//! Builds a prompt from the request's pillar/type/format/topic, enriched
//! with a learning context of previously posted posts, then parses the
//! LLM's reply into content + hashtags and scores it.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ApiError;
use crate::clients::supabase::SupabaseClient;
use crate::AppState;

/// How many posted posts feed the learning context
const LEARNING_POSTS: usize = 10;

/// Hashtag cap on the response
const MAX_HASHTAGS: usize = 5;

/// Request body for POST /posts/generate
#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub pillar: String,
    #[serde(default = "default_post_type")]
    pub post_type: String,
    pub format_type: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default = "default_provider")]
    pub provider: String,
}

fn default_post_type() -> String {
    "standard".to_string()
}

fn default_provider() -> String {
    "gemini".to_string()
}

/// Response body for POST /posts/generate
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub content: String,
    pub voice_score: f64,
    pub hashtags: Vec<String>,
}

/// POST /posts/generate
///
/// Generate a LinkedIn post, learning from previously posted posts.
pub async fn generate_post(
    State(state): State<AppState>,
    Json(request): Json<PostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    if request.provider != "gemini" {
        return Err(ApiError::InvalidInput(format!(
            "Provider '{}' not supported. Currently only 'gemini' is configured.",
            request.provider
        )));
    }

    let gemini = state.gemini.as_ref().ok_or_else(|| {
        ApiError::NotConfigured(
            "Google API key not configured. Set LPF_GOOGLE_API_KEY or add google_api_key \
             to the TOML config."
                .to_string(),
        )
    })?;

    // Learning context is best-effort: a failed fetch only warns
    let learning_context = match &state.storage {
        Some(storage) => learning_context(storage).await,
        None => String::new(),
    };

    let prompt = build_prompt(&request, &learning_context);
    let content = gemini.generate_text(&prompt).await?;

    Ok(Json(parse_generated_post(&content)))
}

/// Build the learning-context block from recent posted posts
async fn learning_context(storage: &SupabaseClient) -> String {
    let posts = match storage.fetch_posted_posts(LEARNING_POSTS).await {
        Ok(posts) => posts,
        Err(e) => {
            warn!("Could not fetch posted posts for learning: {}", e);
            return String::new();
        }
    };
    if posts.is_empty() {
        return String::new();
    }

    let mut context = String::from(
        "\n\nLEARN FROM THESE SUCCESSFUL POSTS (analyze their tone, structure, and style):\n",
    );
    for (i, post) in posts.iter().enumerate() {
        context.push_str(&format!("\n--- Example {} ---\n{}\n", i + 1, post.text));
        if let Some(hashtags) = &post.hashtags {
            if !hashtags.is_empty() {
                context.push_str(&format!("Hashtags: {}\n", hashtags.join(" ")));
            }
        }
    }
    context.push_str("\nMatch the voice, tone, and approach of these successful posts.\n");
    context
}

/// Extra prompt instructions per post type
fn type_instructions(post_type: &str) -> &'static str {
    match post_type {
        "carousel" => {
            "\nSTRICT CAROUSEL FORMAT REQUIRED:\n\
             Structure the content clearly for a PDF Carousel.\n\
             - Slide 1: Hook/Title (Big impact)\n\
             - Slides 2-6: One key point per slide (Concise text + Visual idea descriptions)\n\
             - Last Slide: Summary & CTA\n\
             Format each slide clearly (e.g., \"SLIDE 1: ...\")\n"
        }
        "interactive" => {
            "\nINTERACTIVE DEMO CONTEXT:\n\
             This post promotes a new interactive tool/simulator.\n\
             - Focus on the problem the tool solves.\n\
             - Tease the capability (\"I built a tool that...\")\n\
             - Explicit Call-to-Action: \"Try the simulator at the link below\" or \
             \"Comment for access\"\n"
        }
        _ => "",
    }
}

/// Assemble the full generation prompt
fn build_prompt(request: &PostRequest, learning_context: &str) -> String {
    format!(
        "Generate a LinkedIn post with the following specifications:\n\n\
         Content Pillar: {}\n\
         Post Type: {}\n\
         Format: {}\n\
         Topic: {}\n\n\
         Requirements:\n\
         - Write in a professional yet engaging tone\n\
         - Keep it concise (under 1300 characters)\n\
         - Use line breaks for readability\n\
         - Include relevant hashtags (3-5)\n\
         - Make it authentic and valuable\n\
         {}\n{}\n\
         Return ONLY the post content followed by hashtags on a new line.",
        request.pillar,
        request.post_type,
        request.format_type,
        request.topic.as_deref().unwrap_or("none"),
        type_instructions(&request.post_type),
        learning_context,
    )
}

/// Split the LLM reply into post content and hashtags and score it
///
/// Lines starting with `#` contribute whitespace-separated tags; the
/// rest is the post body. The voice score is the original's length
/// heuristic: min(95, 70 + chars/20), one decimal.
pub(crate) fn parse_generated_post(content: &str) -> PostResponse {
    let mut body_lines = Vec::new();
    let mut hashtags = Vec::new();

    for line in content.trim().lines() {
        if line.trim().starts_with('#') {
            hashtags.extend(
                line.split_whitespace()
                    .filter(|tag| tag.starts_with('#'))
                    .map(str::to_string),
            );
        } else {
            body_lines.push(line);
        }
    }

    let final_content = body_lines.join("\n").trim().to_string();

    let voice_score = (95.0_f64).min(70.0 + final_content.chars().count() as f64 / 20.0);
    let voice_score = (voice_score * 10.0).round() / 10.0;

    hashtags.truncate(MAX_HASHTAGS);
    if hashtags.is_empty() {
        hashtags = vec!["#LinkedIn".to_string(), "#Professional".to_string()];
    }

    PostResponse {
        content: final_content,
        voice_score,
        hashtags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(post_type: &str) -> PostRequest {
        PostRequest {
            pillar: "AI & Innovation".to_string(),
            post_type: post_type.to_string(),
            format_type: "story".to_string(),
            topic: Some("shipping fast".to_string()),
            provider: "gemini".to_string(),
        }
    }

    #[test]
    fn parses_content_and_hashtags() {
        let reply = "Shipped a new tool today.\nIt saves hours.\n\n#DevTools #Productivity";
        let parsed = parse_generated_post(reply);
        assert_eq!(parsed.content, "Shipped a new tool today.\nIt saves hours.");
        assert_eq!(parsed.hashtags, vec!["#DevTools", "#Productivity"]);
    }

    #[test]
    fn hashtags_are_capped_at_five() {
        let reply = "Body.\n#a #b #c #d #e #f #g";
        let parsed = parse_generated_post(reply);
        assert_eq!(parsed.hashtags.len(), 5);
    }

    #[test]
    fn missing_hashtags_get_defaults() {
        let parsed = parse_generated_post("Just a body with no tags.");
        assert_eq!(parsed.hashtags, vec!["#LinkedIn", "#Professional"]);
    }

    #[test]
    fn voice_score_grows_with_length_and_caps_at_95() {
        let short = parse_generated_post("Hi.");
        assert!(short.voice_score < 75.0);

        let long = parse_generated_post(&"word ".repeat(200));
        assert_eq!(long.voice_score, 95.0);
    }

    #[test]
    fn voice_score_has_one_decimal() {
        let parsed = parse_generated_post("abcdefg");
        assert_eq!(parsed.voice_score, (parsed.voice_score * 10.0).round() / 10.0);
    }

    #[test]
    fn carousel_type_adds_slide_instructions() {
        let prompt = build_prompt(&request("carousel"), "");
        assert!(prompt.contains("STRICT CAROUSEL FORMAT REQUIRED"));
        assert!(prompt.contains("Content Pillar: AI & Innovation"));
    }

    #[test]
    fn interactive_type_adds_demo_instructions() {
        let prompt = build_prompt(&request("interactive"), "");
        assert!(prompt.contains("INTERACTIVE DEMO CONTEXT"));
    }

    #[test]
    fn standard_type_adds_nothing_extra() {
        let prompt = build_prompt(&request("standard"), "");
        assert!(!prompt.contains("CAROUSEL"));
        assert!(!prompt.contains("INTERACTIVE DEMO"));
        assert!(prompt.contains("Topic: shipping fast"));
    }
}
