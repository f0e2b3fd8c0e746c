//! Integration tests for the mapping pipeline.
//!
//! These run the full retrieval → model → validation → fallback flow with
//! the local hashing embedder. The language model is either absent, a
//! scripted in-process stand-in, or a wiremock chat-completion server.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taxonomy_mapper::config::LlmConfig;
use taxonomy_mapper::error::MapError;
use taxonomy_mapper::llm::completion::{ChatCompletionClient, LanguageModel};
use taxonomy_mapper::llm::hashing::HashingEmbedder;
use taxonomy_mapper::mapper::{rule_based_fallback, TaxonomyMapper};
use taxonomy_mapper::models::{MappingResult, UNMAPPED};
use taxonomy_mapper::search::retriever::ContextRetriever;
use taxonomy_mapper::taxonomy::Taxonomy;

/// Always answers with the same text.
struct FixedReply(String);

#[async_trait]
impl LanguageModel for FixedReply {
    async fn complete(&self, _prompt: &str) -> Result<String, MapError> {
        Ok(self.0.clone())
    }
}

async fn mapper(llm: Option<Arc<dyn LanguageModel>>) -> TaxonomyMapper {
    let taxonomy = Arc::new(Taxonomy::builtin());
    let retriever = ContextRetriever::build(&taxonomy, Arc::new(HashingEmbedder::new(256)), 4)
        .await
        .unwrap();
    TaxonomyMapper::new(taxonomy, retriever, llm)
}

fn fixed(reply: serde_json::Value) -> Option<Arc<dyn LanguageModel>> {
    Some(Arc::new(FixedReply(reply.to_string())) as Arc<dyn LanguageModel>)
}

/// Either fully in-taxonomy or fully UNMAPPED.
fn assert_well_formed(taxonomy: &Taxonomy, result: &MappingResult) {
    if result.genre == UNMAPPED {
        assert_eq!(result.subgenre, UNMAPPED, "partial result: {result:?}");
    } else {
        assert!(
            taxonomy.contains(&result.genre, &result.subgenre),
            "out-of-taxonomy result: {result:?}"
        );
    }
}

const STORIES: &[&str] = &[
    "The spy was given a classified mission behind enemy lines.",
    "A quiet bakery story with no conflict.",
    "The lawyer saw a ghost in the court house.",
    "They met again, years later, at the same café.",
    "",
    "日本語の物語",
];

#[tokio::test]
async fn test_spy_story_without_backend() {
    let mapper = mapper(None).await;
    let result = mapper
        .map_story(&[], "The spy was given a classified mission behind enemy lines.")
        .await;

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json,
        json!({
            "genre": "Thriller",
            "subgenre": "Espionage",
            "reasoning": "Espionage-related terms indicate spy thriller."
        })
    );
}

#[tokio::test]
async fn test_bakery_story_is_unmapped_regardless_of_tags() {
    let mapper = mapper(None).await;
    let result = mapper
        .map_story(
            &["Slice of Life".to_string()],
            "A quiet bakery story with no conflict.",
        )
        .await;

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "genre": "UNMAPPED",
            "subgenre": "UNMAPPED",
            "reasoning": "Story does not fit any category in the taxonomy."
        })
    );
}

#[tokio::test]
async fn test_court_beats_ghost() {
    let mapper = mapper(None).await;
    let result = mapper
        .map_story(&[], "A ghost haunts the court where the trial is held.")
        .await;
    assert_eq!(result.genre, "Thriller");
    assert_eq!(result.subgenre, "Legal Thriller");
}

#[tokio::test]
async fn test_model_genre_outside_taxonomy_is_coerced() {
    let mapper = mapper(fixed(json!({
        "genre": "Mystery",
        "subgenre": "Cozy",
        "reasoning": "A detective solves it."
    })))
    .await;

    let result = mapper.map_story(&[], "A detective finds a clue.").await;
    assert_eq!(result, MappingResult::unmapped("Genre not present in taxonomy."));
}

#[tokio::test]
async fn test_model_subgenre_from_other_genre_is_coerced() {
    let mapper = mapper(fixed(json!({
        "genre": "Romance",
        "subgenre": "Gothic",
        "reasoning": "Love in a dark castle."
    })))
    .await;

    let result = mapper.map_story(&[], "Love in a dark castle.").await;
    assert_eq!(
        result,
        MappingResult::unmapped("Subgenre not present in taxonomy.")
    );
}

#[tokio::test]
async fn test_every_path_yields_well_formed_results() {
    let taxonomy = Taxonomy::builtin();
    let replies = vec![
        None,
        fixed(json!({"genre": "Horror", "subgenre": "Slasher", "reasoning": "blood"})),
        fixed(json!({"genre": "UNMAPPED", "subgenre": "Cyberpunk", "reasoning": "odd"})),
        fixed(json!({"genre": "Sci-Fi", "subgenre": "Gothic", "reasoning": "wrong"})),
        Some(Arc::new(FixedReply("not json".to_string())) as Arc<dyn LanguageModel>),
    ];

    for llm in replies {
        let mapper = mapper(llm).await;
        for story in STORIES {
            let result = mapper.map_story(&["Tag".to_string()], story).await;
            assert_well_formed(&taxonomy, &result);
        }
    }
}

#[tokio::test]
async fn test_fallback_is_idempotent() {
    let taxonomy = Taxonomy::builtin();
    for story in STORIES {
        assert_eq!(
            rule_based_fallback(&taxonomy, story),
            rule_based_fallback(&taxonomy, story)
        );
    }
}

#[tokio::test]
async fn test_end_to_end_with_chat_completion_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "```json\n{\"genre\": \"Romance\", \"subgenre\": \"Enemies-to-Lovers\", \"reasoning\": \"Rivals fall in love.\"}\n```"
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = LlmConfig {
        base_url: server.uri(),
        api_key: Some("gsk-test".to_string()),
    };
    let client = ChatCompletionClient::from_config(reqwest::Client::new(), &config).unwrap();
    let mapper = mapper(Some(Arc::new(client) as Arc<dyn LanguageModel>)).await;

    let result = mapper
        .map_story(
            &["Love".to_string()],
            "Two rival chefs fall for each other.",
        )
        .await;
    assert_eq!(
        result,
        MappingResult::new("Romance", "Enemies-to-Lovers", "Rivals fall in love.")
    );
}

#[tokio::test]
async fn test_chat_server_error_falls_back_for_that_request_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "{\"genre\": \"Horror\", \"subgenre\": \"Slasher\", \"reasoning\": \"Masked killer.\"}"}}]
        })))
        .mount(&server)
        .await;

    let config = LlmConfig {
        base_url: server.uri(),
        api_key: Some("gsk-test".to_string()),
    };
    let client = ChatCompletionClient::from_config(reqwest::Client::new(), &config).unwrap();
    let mapper = mapper(Some(Arc::new(client) as Arc<dyn LanguageModel>)).await;

    let story = "A masked killer stalks the haunted mansion.";
    let first = mapper.map_story(&[], story).await;
    assert_eq!(first.subgenre, "Gothic", "first call should use the fallback");

    let second = mapper.map_story(&[], story).await;
    assert_eq!(second.subgenre, "Slasher", "backend is tried again on the next call");
}
