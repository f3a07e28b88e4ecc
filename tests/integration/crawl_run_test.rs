// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{catalog_html, detail_html, model_html, test_orchestrator, test_settings};
use sparecrawl::domain::models::ModelStatus;
use sparecrawl::store::ModelStore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_run_then_resume_without_refetch() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    // One catalog tile X4 -> /x4; the catalog must be fetched exactly once
    // across both runs, since the models file short-circuits discovery.
    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_html(&[("X4", "/x4")])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/x4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(model_html(&[
            "/parts/p1.html",
            "/parts/p2.html",
        ])))
        .expect(1)
        .mount(&server)
        .await;

    for (part, image) in [("p1", "img-p1.jpg"), ("p2", "img-p2.jpg")] {
        let image_url = format!("{}/media/{}", server.uri(), image);
        Mock::given(method("GET"))
            .and(path(format!("/parts/{}.html", part)))
            .respond_with(ResponseTemplate::new(200).set_body_string(detail_html(
                &format!("Part {}", part),
                &format!("SKU-{}", part),
                "€25.00",
                &image_url,
            )))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/media/{}", image)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
    }

    let settings = test_settings(&server.uri(), dir.path());

    // First run: discover, scrape both parts, flip the model to Done
    let summary = test_orchestrator(settings.clone()).run().await.unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.deferred, 0);

    let models_csv = std::fs::read_to_string(dir.path().join("models.csv")).unwrap();
    let expected_row = format!("X4,{}/x4,Done,2", server.uri());
    assert_eq!(
        models_csv.trim_end(),
        format!("model_name,model_link,status,num_parts\n{}", expected_row)
    );

    let parts_csv = std::fs::read_to_string(dir.path().join("spare_parts.csv")).unwrap();
    let mut lines = parts_csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Model,Title,SKU,Price,Image Links,Details"
    );
    assert_eq!(lines.clone().count(), 2);
    assert!(parts_csv.contains("X4,Part p1,SKU-p1,€25.00,img-p1.jpg,Replacement part."));

    assert!(dir.path().join("images/img-p1.jpg").exists());
    assert!(dir.path().join("images/img-p2.jpg").exists());

    // Second run: Done models are never re-fetched and the header is not
    // duplicated. The .expect(1) mocks above verify no page is hit again.
    let summary = test_orchestrator(settings).run().await.unwrap();
    assert_eq!(summary.completed, 0);
    assert_eq!(summary.deferred, 0);

    let parts_csv = std::fs::read_to_string(dir.path().join("spare_parts.csv")).unwrap();
    let headers = parts_csv
        .lines()
        .filter(|l| l.starts_with("Model,Title"))
        .count();
    assert_eq!(headers, 1);
    assert_eq!(parts_csv.lines().count(), 3);
}

#[tokio::test]
async fn test_retryable_failure_defers_model_and_run_continues() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(catalog_html(&[("X4", "/x4"), ("X5", "/x5")])),
        )
        .mount(&server)
        .await;

    // X4's part resolves, but its image host answers 500 (retryable)
    Mock::given(method("GET"))
        .and(path("/x4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(model_html(&["/parts/bad.html"])))
        .mount(&server)
        .await;
    let bad_image = format!("{}/media/bad.jpg", server.uri());
    Mock::given(method("GET"))
        .and(path("/parts/bad.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_html(
            "Bad Part",
            "SKU-bad",
            "€9.00",
            &bad_image,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/media/bad.jpg"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    // X5 works end to end
    Mock::given(method("GET"))
        .and(path("/x5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(model_html(&["/parts/good.html"])))
        .mount(&server)
        .await;
    let good_image = format!("{}/media/good.jpg", server.uri());
    Mock::given(method("GET"))
        .and(path("/parts/good.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_html(
            "Good Part",
            "SKU-good",
            "€11.00",
            &good_image,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/media/good.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .mount(&server)
        .await;

    let settings = test_settings(&server.uri(), dir.path());
    let summary = test_orchestrator(settings.clone()).run().await.unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.deferred, 1);

    // The failed model stays Pending with no part count; the healthy one is Done
    let models = ModelStore::new(&settings.crawl.models_file).load().unwrap();
    assert_eq!(models[0].model_name, "X4");
    assert_eq!(models[0].status, ModelStatus::Pending);
    assert_eq!(models[0].num_parts, None);
    assert_eq!(models[1].model_name, "X5");
    assert_eq!(models[1].status, ModelStatus::Done);
    assert_eq!(models[1].num_parts, Some(1));

    // Nothing from the failed model was appended
    let parts_csv = std::fs::read_to_string(dir.path().join("spare_parts.csv")).unwrap();
    assert!(parts_csv.contains("Good Part"));
    assert!(!parts_csv.contains("Bad Part"));
}

#[tokio::test]
async fn test_structure_change_aborts_run_and_model_stays_pending() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_html(&[("X4", "/x4")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/x4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(model_html(&["/parts/p1.html"])))
        .mount(&server)
        .await;
    // Detail page without the required title element: a fatal fault
    Mock::given(method("GET"))
        .and(path("/parts/p1.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let settings = test_settings(&server.uri(), dir.path());
    let result = test_orchestrator(settings.clone()).run().await;
    assert!(result.is_err());

    let models = ModelStore::new(&settings.crawl.models_file).load().unwrap();
    assert_eq!(models[0].status, ModelStatus::Pending);
    assert!(!dir.path().join("spare_parts.csv").exists());
}

#[tokio::test]
async fn test_catalog_failure_writes_no_models_file() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let settings = test_settings(&server.uri(), dir.path());
    let result = test_orchestrator(settings).run().await;

    assert!(result.is_err());
    assert!(!dir.path().join("models.csv").exists());
}
