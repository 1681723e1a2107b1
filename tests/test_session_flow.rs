use mockito::{Matcher, Server};
use recipe_lens::{
    DetailState, FlaskClient, ImageRef, Message, RecipeSummary, Route, Session,
    StaticContentResolver,
};
use std::sync::Arc;

fn session_for(server: &Server, content: StaticContentResolver) -> Session {
    let client = FlaskClient::builder()
        .base_url(server.url())
        .build()
        .unwrap();
    Session::new(client, Arc::new(content))
}

fn recipe(id: i64, title: &str) -> RecipeSummary {
    RecipeSummary {
        id,
        title: title.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_photo_to_recipe_detail() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("fridge.jpg");
    std::fs::write(&photo, b"\xff\xd8\xff\xe0jpeg").unwrap();

    let upload = server
        .mock("POST", "/upload_and_find")
        .match_header("content-type", Matcher::Regex("multipart/form-data".into()))
        .with_status(200)
        .with_body(r#"Detected: {"output_image": "out_17.jpg", "ingredients": "egg, onion"}"#)
        .create_async()
        .await;
    let search = server
        .mock("GET", "/findfoodlist")
        .match_query(Matcher::UrlEncoded(
            "ingredients".into(),
            "egg,onion,garlic".into(),
        ))
        .with_status(200)
        .with_body(r#"[{"id": 7, "title": "Frittata", "image": "7.jpg", "likes": 12}]"#)
        .create_async()
        .await;
    let detail = server
        .mock("GET", "/saverecipe/7")
        .with_status(200)
        .with_body(
            r#"[{"id": 7, "title": "Frittata", "analyzedInstructions": [{"name": "", "steps": [{"number": 1, "step": "Beat the eggs."}]}]}]"#,
        )
        .create_async()
        .await;

    let mut session = session_for(&server, StaticContentResolver::new());
    session.dispatch(Message::ImageChosen(ImageRef::from_path(&photo).unwrap()));
    session.run(Message::AnalyzeRequested).await;

    let state = session.state();
    assert!(matches!(state.route(), Route::Analysis { .. }));
    assert_eq!(state.ingredients.visible(), vec!["egg", "onion"]);
    let analysis = state.analysis.as_ref().unwrap();
    assert_eq!(analysis.image_url, format!("{}/download/out_17.jpg", server.url()));
    upload.assert_async().await;

    session.dispatch(Message::AddIngredient("garlic".to_string()));
    session.run(Message::RecommendRequested).await;
    assert_eq!(session.state().route(), &Route::RecipeList);
    assert_eq!(session.state().recipes.len(), 1);
    search.assert_async().await;

    let frittata = session.state().recipes[0].clone();
    session.dispatch(Message::ToggleFavorite(frittata.clone()));
    assert!(session.state().favorites.contains(&frittata));

    session.run(Message::SelectRecipe(frittata)).await;
    assert_eq!(session.state().route(), &Route::RecipeInfo { id: 7 });
    match &session.state().detail {
        DetailState::Ready(detail) => {
            assert_eq!(detail.title, "Frittata");
            assert_eq!(detail.numbered_steps(), vec!["1. Beat the eggs.".to_string()]);
        }
        other => panic!("Expected a loaded recipe, got {:?}", other),
    }
    detail.assert_async().await;
    assert!(session.take_notices().is_empty());
}

#[tokio::test]
async fn test_unresolvable_reference_makes_no_request() {
    let mut server = Server::new_async().await;
    let upload = server
        .mock("POST", "/upload_and_find")
        .expect(0)
        .create_async()
        .await;

    let mut session = session_for(&server, StaticContentResolver::new());
    let remote = ImageRef::parse("https://example.com/fridge.jpg").unwrap();
    session.dispatch(Message::ImageChosen(remote));
    session.run(Message::AnalyzeRequested).await;

    assert_eq!(session.state().route(), &Route::Home);
    assert!(!session.state().loading);
    assert_eq!(
        session.take_notices(),
        vec!["Upload Error: File is null".to_string()]
    );
    upload.assert_async().await;
}

#[tokio::test]
async fn test_content_reference_is_uploaded_from_its_data_column() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("IMG_0012.jpg");
    std::fs::write(&photo, b"jpeg").unwrap();

    let upload = server
        .mock("POST", "/upload_and_find")
        .match_body(Matcher::Regex("filename=\"IMG_0012.jpg\"".into()))
        .with_status(200)
        .with_body(r#"{"output_image": "o.jpg", "ingredients": "tomato"}"#)
        .create_async()
        .await;

    let uri = "content://media/external/images/media/12";
    let content = StaticContentResolver::new().with_row(uri, photo.to_string_lossy());
    let mut session = session_for(&server, content);
    session.dispatch(Message::ImageChosen(ImageRef::parse(uri).unwrap()));
    session.run(Message::AnalyzeRequested).await;

    assert_eq!(session.state().ingredients.visible(), vec!["tomato"]);
    upload.assert_async().await;
}

#[tokio::test]
async fn test_failed_search_keeps_previous_list() {
    let mut server = Server::new_async().await;
    let ok = server
        .mock("GET", "/findfoodlist")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"[{"id": 1, "title": "Soup"}]"#)
        .expect(1)
        .create_async()
        .await;

    let mut session = session_for(&server, StaticContentResolver::new());
    session.run(Message::RecommendRequested).await;
    assert_eq!(session.state().recipes, vec![recipe(1, "Soup")]);
    ok.assert_async().await;
    ok.remove_async().await;

    let missing = server
        .mock("GET", "/findfoodlist")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body("Not Found")
        .create_async()
        .await;

    session.dispatch(Message::Back);
    session.run(Message::RecommendRequested).await;

    assert_eq!(session.state().recipes, vec![recipe(1, "Soup")]);
    let notices = session.take_notices();
    assert!(notices.contains(&"Request failed: Not Found".to_string()));
    assert!(notices.contains(&"Failed to load recipes".to_string()));
    missing.assert_async().await;
}

#[tokio::test]
async fn test_empty_detail_is_unavailable() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/saverecipe/99")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let mut session = session_for(&server, StaticContentResolver::new());
    session.run(Message::SelectRecipe(recipe(99, "Ghost"))).await;

    assert_eq!(session.state().detail, DetailState::Unavailable);
    assert_eq!(
        session.state().detail.message(),
        Some("The recipe could not be loaded.")
    );
}

#[tokio::test]
async fn test_leaving_the_list_cancels_its_search() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/findfoodlist")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"[{"id": 1, "title": "Soup"}]"#)
        .create_async()
        .await;

    let mut session = session_for(&server, StaticContentResolver::new());
    session.dispatch(Message::RecommendRequested);
    assert_eq!(session.in_flight(), 1);

    session.dispatch(Message::Back);
    assert_eq!(session.in_flight(), 0);
    session.settle().await;

    assert_eq!(session.state().route(), &Route::Home);
    assert!(session.state().recipes.is_empty());
    assert!(!session.state().loading);
}
