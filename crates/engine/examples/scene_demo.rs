//! A two-character coffee shop scene against the in-memory store and a
//! scripted generation backend.
//!
//! Run with:
//!
//! ```text
//! cargo run -p ensemble-engine --example scene_demo
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use ensemble_core::character::CharacterRecord;
use ensemble_core::event::EventBus;
use ensemble_core::generate::GenerationReply;
use ensemble_core::memory::MemoryEntry;
use ensemble_core::persona::UserPersona;
use ensemble_core::scene::Scene;
use ensemble_core::store::RecordStore;
use ensemble_core::turn::TurnRequest;
use ensemble_engine::mock::ScriptedGenerator;
use ensemble_engine::{EngineConfig, TurnScheduler};
use ensemble_store::MemStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let store = Arc::new(MemStore::new());
    store
        .seed_default(CharacterRecord::stock(
            "default_zoe",
            "Zoe",
            24,
            "female",
            "sarcastic tech enthusiast with a soft spot for retro hardware",
        ))
        .await;
    store
        .seed_default(CharacterRecord::stock(
            "default_marcus",
            "Marcus",
            35,
            "male",
            "stoic ex-detective who notices everything",
        ))
        .await;
    store
        .set_active_persona(UserPersona::new(
            "demo_user",
            "Avery",
            "curious and easygoing",
            vec!["music".into(), "code".into()],
        ))
        .await?;
    store
        .seed_memory(
            "demo_user",
            "default_zoe",
            MemoryEntry::new("prefers oat milk", "preference", 0.4),
        )
        .await;

    let scene = Scene::new(
        "Coffee Shop",
        "A cozy corner café with mismatched chairs",
        "You are all regulars here, chatting over drinks.",
    )
    .with_atmosphere("relaxed and friendly");
    let scene_id = scene.id.clone();
    store.seed_scene(scene).await;

    let generator = Arc::new(
        ScriptedGenerator::new()
            .script(
                "Zoe",
                GenerationReply::text("Missed? You missed Marcus staring at the door for an hour.")
                    .with_mood("amused", 0.7),
            )
            .script_with_latency(
                "Marcus",
                GenerationReply::text("Someone new ordered your usual. I took notes.")
                    .with_mood("calm", 0.3),
                Duration::from_millis(1200),
            ),
    );

    let scheduler = TurnScheduler::new(
        store,
        generator,
        Arc::new(EventBus::default()),
        EngineConfig::default(),
    );

    let turn = scheduler
        .submit_turn(TurnRequest {
            session_id: "demo_session".into(),
            user_id: "demo_user".into(),
            user_message: "Hey you two. What did I miss?".into(),
            active_character_ids: vec!["default_zoe".into(), "default_marcus".into()],
            scene_id: Some(scene_id),
        })
        .await?;

    println!("\nYou: {}\n", turn.user_message);
    for response in &turn.responses {
        println!(
            "[{} ms] {} ({} {:.1}): {}",
            response.delay_ms,
            response.character_name,
            response.mood,
            response.mood_intensity,
            response.content
        );
    }

    Ok(())
}
