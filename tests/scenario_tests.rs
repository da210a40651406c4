//! End-to-end frame loop against a mocked translation service

mod common;

use common::*;
use mockito::{Matcher, Server, ServerGuard};
use piclingo_core::config::RunConfig;
use piclingo_core::error::PipelineError;
use piclingo_core::overlay::{Position, TextStyle, BANNER_ANCHOR, NO_OBJECTS_BANNER};
use piclingo_core::pipeline::FramePipeline;
use piclingo_lingo::GoogleTranslator;
use std::sync::Arc;
use std::time::Duration;

type GtxPipeline = FramePipeline<CanvasSource, FixedDetector, CanvasRenderer, CanvasSink, GoogleTranslator>;

fn gtx_query(sl: &str, tl: &str, q: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("client".into(), "gtx".into()),
        Matcher::UrlEncoded("sl".into(), sl.into()),
        Matcher::UrlEncoded("tl".into(), tl.into()),
        Matcher::UrlEncoded("q".into(), q.into()),
    ])
}

async fn reply(server: &mut ServerGuard, sl: &str, tl: &str, q: &str, text: &str, detected: &str) -> mockito::Mock {
    server
        .mock("GET", "/translate_a/single")
        .match_query(gtx_query(sl, tl, q))
        .with_status(200)
        .with_header("content-type", "application/json; charset=utf-8")
        .with_body(gtx_body(text, q, detected))
        .create_async()
        .await
}

fn gtx_body(text: &str, original: &str, detected: &str) -> String {
    format!(r#"[[["{}","{}",null,null,10]],null,"{}",null,null,null,1,[]]"#, text, original, detected)
}

fn pipeline(server: &ServerGuard, config: RunConfig, detections: Vec<piclingo_core::Detection>, frames: usize) -> GtxPipeline {
    let translator = GoogleTranslator::new(&server.url(), Duration::from_secs(5)).unwrap();
    FramePipeline::new(
        Arc::new(config),
        CanvasSource::new(frames),
        FixedDetector { detections },
        CanvasRenderer,
        CanvasSink::default(),
        translator,
    )
}

#[tokio::test]
async fn test_person_english_to_spanish() {
    let mut server = Server::new_async().await;
    let first = reply(&mut server, "auto", "en", "person", "person", "en").await;
    let second = reply(&mut server, "en", "es", "person", "persona", "en").await;

    let mut pipeline = pipeline(&server, RunConfig::default(), vec![boxed(0, 120.0, 60.0)], 1);
    let stats = pipeline.run().await.unwrap();

    assert_eq!(stats.frames, 1);
    assert_eq!(stats.translation_calls, 2);
    first.assert_async().await;
    second.assert_async().await;

    let frame = &pipeline.sink().rendered[0];
    assert_eq!(
        frame.texts,
        vec![
            ("person".to_string(), Position::new(125, 60), TextStyle::LABEL),
            ("persona".to_string(), Position::new(125, 87), TextStyle::LABEL),
            ("english ---> spanish".to_string(), BANNER_ANCHOR, TextStyle::BANNER),
        ]
    );
    assert_eq!(pipeline.sink().status, "yolov8n | Network 60 FPS");
}

#[tokio::test]
async fn test_empty_frames_never_reach_the_service() {
    let mut server = Server::new_async().await;
    let untouched = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut pipeline = pipeline(&server, RunConfig::default(), vec![], 3);
    let stats = pipeline.run().await.unwrap();

    assert_eq!(stats.frames, 3);
    for frame in &pipeline.sink().rendered {
        assert_eq!(frame.texts, vec![(NO_OBJECTS_BANNER.to_string(), BANNER_ANCHOR, TextStyle::BANNER)]);
    }
    untouched.assert_async().await;
}

#[tokio::test]
async fn test_language_names_and_accents() {
    let mut server = Server::new_async().await;
    let _first = reply(&mut server, "auto", "fr", "bicycle", "vélo", "en").await;
    let _second = reply(&mut server, "fr", "de", "vélo", "Fahrrad", "fr").await;

    let mut config = RunConfig::default();
    config.intermediate_language = "French".to_string();
    config.final_language = "DE".to_string();
    let config = config.resolve_languages().unwrap();

    let mut pipeline = pipeline(&server, config, vec![boxed(1, 0.0, 0.0)], 1);
    pipeline.run().await.unwrap();

    let texts: Vec<_> = pipeline.sink().rendered[0].texts.iter().map(|(t, _, _)| t.as_str()).collect();
    assert_eq!(texts, vec!["velo", "Fahrrad", "french ---> german"]);
}

#[tokio::test]
async fn test_service_failure_aborts_run() {
    let mut server = Server::new_async().await;
    let _first = reply(&mut server, "auto", "en", "car", "car", "en").await;
    let _second = server
        .mock("GET", "/translate_a/single")
        .match_query(gtx_query("en", "es", "car"))
        .with_status(500)
        .create_async()
        .await;

    let mut pipeline = pipeline(&server, RunConfig::default(), vec![boxed(2, 10.0, 10.0)], 2);

    assert!(matches!(pipeline.run().await, Err(PipelineError::Translation(_))));
    assert!(pipeline.sink().rendered.is_empty());
    assert_eq!(pipeline.stats().frames, 0);
}
