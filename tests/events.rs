mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{expect_status, spawn_server, user_body, TestServer};

struct Family {
    parent: String,
    kid: String,
    kid_id: String,
}

/// Two members of one family plus their tokens.
async fn family(server: &TestServer, code: &str) -> Result<Family> {
    let mut body = user_body(&format!("parent-{}@example.com", code.to_lowercase()));
    body["family"] = json!({ "name": "Family", "code": code });
    let parent = server.signup(body).await?;

    let mut body = user_body(&format!("kid-{}@example.com", code.to_lowercase()));
    body["familyCode"] = json!(code);
    let kid = server.signup(body).await?;
    let kid_id = server.authed(&kid).await?["id"].as_str().unwrap_or_default().to_string();

    Ok(Family { parent, kid, kid_id })
}

async fn create_event(server: &TestServer, token: &str, body: Value) -> Result<Value> {
    let res = server.post("/api/events").header("authorization", token).json(&body).send().await?;
    expect_status(res, StatusCode::CREATED).await
}

#[tokio::test]
async fn new_events_default_to_upcoming() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.signup_user("owner@example.com").await?;
    let owner = server.authed(&token).await?;

    let event = create_event(
        &server,
        &token,
        json!({ "title": "title", "category": "chore", "deadline": "2030-01-01T00:00:00Z" }),
    )
    .await?;
    assert_eq!(event["title"], "title");
    assert_eq!(event["status"], "upcoming");
    assert_eq!(event["category"], "chore");
    assert_eq!(event["ownerId"], owner["id"]);
    Ok(())
}

#[tokio::test]
async fn invalid_category_is_rejected_and_not_stored() -> Result<()> {
    let server = spawn_server().await?;
    let f = family(&server, "CAT").await?;

    let res = server
        .post("/api/events")
        .header("authorization", &f.parent)
        .json(&json!({ "title": "title", "category": "not a cat" }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let res = server.get("/api/events").header("authorization", &f.parent).send().await?;
    assert_eq!(expect_status(res, StatusCode::OK).await?, json!([]));
    Ok(())
}

#[tokio::test]
async fn missing_title_is_rejected() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.signup_user("notitle@example.com").await?;

    let res = server
        .post("/api/events")
        .header("authorization", &token)
        .json(&json!({ "title": "  ", "category": "errand" }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["message"], "Event must have a title.");
    Ok(())
}

#[tokio::test]
async fn assignment_is_visible_both_ways() -> Result<()> {
    let server = spawn_server().await?;
    let f = family(&server, "ASSIGN").await?;
    let event = create_event(&server, &f.parent, json!({ "title": "sometitle", "category": "appointment" })).await?;
    let event_id = event["id"].as_str().unwrap();

    let res = server
        .post(&format!("/api/events/{}/assignees", event_id))
        .header("authorization", &f.parent)
        .json(&json!({ "userId": f.kid_id }))
        .send()
        .await?;
    let assigned = expect_status(res, StatusCode::CREATED).await?;
    assert_eq!(assigned["eventId"], event["id"]);
    assert_eq!(assigned["userId"], f.kid_id.as_str());

    let res = server.get("/api/users/events").header("authorization", &f.kid).send().await?;
    let events = expect_status(res, StatusCode::OK).await?;
    assert_eq!(events.as_array().map(Vec::len), Some(1));
    assert_eq!(events[0]["title"], "sometitle");
    assert_eq!(events[0]["category"], "appointment");

    let res = server
        .get(&format!("/api/events/{}/assignees", event_id))
        .header("authorization", &f.kid)
        .send()
        .await?;
    let assignees = expect_status(res, StatusCode::OK).await?;
    assert_eq!(assignees.as_array().map(Vec::len), Some(1));
    assert_eq!(assignees[0]["id"], f.kid_id.as_str());
    Ok(())
}

#[tokio::test]
async fn duplicate_invites_are_idempotent() -> Result<()> {
    let server = spawn_server().await?;
    let f = family(&server, "TWICE").await?;
    let event = create_event(&server, &f.parent, json!({ "title": "event title", "category": "chore" })).await?;
    let path = format!("/api/events/{}/assignees", event["id"].as_str().unwrap());

    for _ in 0..2 {
        let res = server
            .post(&path)
            .header("authorization", &f.parent)
            .json(&json!({ "userId": f.kid_id }))
            .send()
            .await?;
        expect_status(res, StatusCode::CREATED).await?;
    }

    let res = server.get(&path).header("authorization", &f.parent).send().await?;
    assert_eq!(expect_status(res, StatusCode::OK).await?.as_array().map(Vec::len), Some(1));

    let res = server.get("/api/users/events").header("authorization", &f.kid).send().await?;
    assert_eq!(expect_status(res, StatusCode::OK).await?.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn invites_outside_the_family_are_rejected() -> Result<()> {
    let server = spawn_server().await?;
    let ours = family(&server, "OURS").await?;
    let theirs = family(&server, "THEIRS").await?;
    let event = create_event(&server, &ours.parent, json!({ "title": "a test event", "category": "chore" })).await?;
    let path = format!("/api/events/{}/assignees", event["id"].as_str().unwrap());

    for user_id in [theirs.kid_id.as_str(), "00000000-0000-0000-0000-000000000000"] {
        let res = server
            .post(&path)
            .header("authorization", &ours.parent)
            .json(&json!({ "userId": user_id }))
            .send()
            .await?;
        expect_status(res, StatusCode::BAD_REQUEST).await?;
    }
    Ok(())
}

#[tokio::test]
async fn events_are_scoped_to_the_family() -> Result<()> {
    let server = spawn_server().await?;
    let ours = family(&server, "MINE").await?;
    let theirs = family(&server, "OTHER").await?;
    let event = create_event(&server, &ours.parent, json!({ "title": "Private", "category": "event" })).await?;
    let path = format!("/api/events/{}", event["id"].as_str().unwrap());

    let res = server.get(&path).header("authorization", &ours.kid).send().await?;
    assert_eq!(expect_status(res, StatusCode::OK).await?["title"], "Private");

    for res in [
        server.get(&path).header("authorization", &theirs.parent).send().await?,
        server.delete(&path).header("authorization", &theirs.parent).send().await?,
        server
            .put(&path)
            .header("authorization", &theirs.parent)
            .json(&json!({ "title": "Hijacked" }))
            .send()
            .await?,
    ] {
        expect_status(res, StatusCode::NOT_FOUND).await?;
    }

    let res = server.get("/api/events").header("authorization", &ours.kid).send().await?;
    assert_eq!(expect_status(res, StatusCode::OK).await?.as_array().map(Vec::len), Some(1));
    let res = server.get("/api/events").header("authorization", &theirs.kid).send().await?;
    assert_eq!(expect_status(res, StatusCode::OK).await?, json!([]));
    Ok(())
}

#[tokio::test]
async fn update_and_delete_lifecycle() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.signup_user("cycle@example.com").await?;
    let event = create_event(
        &server,
        &token,
        json!({ "title": "Laundry", "category": "chore", "description": "whites", "deadline": "2030-01-01T00:00:00Z" }),
    )
    .await?;
    let path = format!("/api/events/{}", event["id"].as_str().unwrap());

    let res = server
        .put(&path)
        .header("authorization", &token)
        .json(&json!({ "status": "completed-pending", "description": null }))
        .send()
        .await?;
    let updated = expect_status(res, StatusCode::OK).await?;
    assert_eq!(updated["status"], "completed-pending");
    assert_eq!(updated["description"], Value::Null);
    assert_eq!(updated["deadline"], event["deadline"]);

    let res = server
        .put(&path)
        .header("authorization", &token)
        .json(&json!({ "status": "finished" }))
        .send()
        .await?;
    expect_status(res, StatusCode::BAD_REQUEST).await?;

    let res = server.delete(&path).header("authorization", &token).send().await?;
    expect_status(res, StatusCode::NO_CONTENT).await?;

    let res = server.get(&path).header("authorization", &token).send().await?;
    expect_status(res, StatusCode::NOT_FOUND).await?;
    Ok(())
}
