mod support;

use pretty_assertions::assert_eq;
use revu_api::Method;
use serde_json::json;
use support::{READ_TOKEN, call_as, delete, get, id_of, post, reviewed};

#[tokio::test]
async fn like_a_review() {
    let state = support::app().await;
    let fixture = reviewed(&state).await;

    let res = post(
        &state,
        &format!("/reviews/{}/likes", fixture.review),
        json!({"like": {"from_type": "Company", "from_id": fixture.client}}),
    )
    .await;
    assert_eq!(res.status, 201);
    let like = id_of(&res);
    assert_eq!(res.header("Location"), Some(format!("/api/v1/likes/{like}").as_str()));

    let body = res.body_json();
    assert_eq!(body["liker"], json!({"type": "Company", "id": fixture.client}));
    assert_eq!(body["likeable"], json!({"type": "Review", "id": fixture.review}));

    let listed = get(&state, &format!("/reviews/{}/likes", fixture.review)).await;
    assert_eq!(listed.status, 200);
    assert_eq!(listed.header("Total"), Some("1"));
    assert_eq!(listed.body_json()[0]["id"], like);

    let shown = get(&state, &format!("/likes/{like}")).await;
    assert_eq!(shown.status, 200);
}

#[tokio::test]
async fn from_type_is_accepted_in_any_inflection() {
    let state = support::app().await;
    let fixture = reviewed(&state).await;

    let res = post(
        &state,
        &format!("/reviews/{}/likes", fixture.review),
        json!({"like": {"from_type": "companies", "from_id": fixture.client}}),
    )
    .await;
    assert_eq!(res.status, 201);
}

#[tokio::test]
async fn missing_parameters_fail_before_any_lookup() {
    let state = support::app().await;

    // Neither the review nor the company exist: the 400 proves no lookup ran.
    let res = post(
        &state,
        "/reviews/doesnotexist/likes",
        json!({"like": {"from_type": "Company"}}),
    )
    .await;
    assert_eq!(res.status, 400);
    assert_eq!(
        res.body_json(),
        json!({"errors": {"params": ["from_id/from_type is missing"]}})
    );

    let res = post(&state, "/reviews/doesnotexist/likes", json!({"like": {"from_id": "abc"}})).await;
    assert_eq!(res.status, 400);

    let res = post(&state, "/reviews/doesnotexist/likes", json!({"unrelated": true})).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body_json(), json!({"errors": {"params": ["like is missing"]}}));

    let res = post(&state, "/reviews/doesnotexist/likes", json!({"like": {}})).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body_json(), json!({"errors": {"params": ["like is missing"]}}));
}

#[tokio::test]
async fn non_liker_type_is_invalid_regardless_of_id() {
    let state = support::app().await;
    let fixture = reviewed(&state).await;

    for from_type in ["Grant", "Review", "Spaceship"] {
        let res = post(
            &state,
            &format!("/reviews/{}/likes", fixture.review),
            json!({"like": {"from_type": from_type, "from_id": "doesnotexist"}}),
        )
        .await;
        assert_eq!(res.status, 422, "from_type {from_type}");
        assert_eq!(res.body_json(), json!({"errors": {"from_type": ["is invalid"]}}));
    }
}

#[tokio::test]
async fn unknown_likeable_is_not_found() {
    let state = support::app().await;
    let fixture = reviewed(&state).await;

    let res = post(
        &state,
        "/reviews/0/likes",
        json!({"like": {"from_type": "Company", "from_id": fixture.client}}),
    )
    .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body_json(), json!({"errors": {"review": ["not found"]}}));
}

#[tokio::test]
async fn discarded_liker_is_not_found_under_from_id() {
    let state = support::app().await;
    let fixture = reviewed(&state).await;
    assert_eq!(delete(&state, &format!("/companies/{}", fixture.client)).await.status, 204);

    let res = post(
        &state,
        &format!("/reviews/{}/likes", fixture.review),
        json!({"like": {"from_type": "Company", "from_id": fixture.client}}),
    )
    .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body_json(), json!({"errors": {"from_id": ["not found"]}}));
}

#[tokio::test]
async fn duplicate_like_is_rejected_until_discarded() {
    let state = support::app().await;
    let fixture = reviewed(&state).await;
    let path = format!("/reviews/{}/likes", fixture.review);
    let body = json!({"like": {"from_type": "Company", "from_id": fixture.client}});

    let first = post(&state, &path, body.clone()).await;
    assert_eq!(first.status, 201);

    let second = post(&state, &path, body.clone()).await;
    assert_eq!(second.status, 422);
    assert_eq!(
        second.body_json(),
        json!({"errors": {"liker_id": ["has already been taken"]}})
    );

    let like = id_of(&first);
    assert_eq!(delete(&state, &format!("/likes/{like}")).await.status, 204);
    assert_eq!(get(&state, &format!("/likes/{like}")).await.status, 404);
    assert_eq!(post(&state, &path, body).await.status, 201);
}

#[tokio::test]
async fn comments_can_be_liked() {
    let state = support::app().await;
    let fixture = reviewed(&state).await;
    let comment = post(
        &state,
        &format!("/reviews/{}/comments", fixture.review),
        json!({"comment": {"from_type": "Company", "from_id": fixture.vendor, "content": "Thank you!"}}),
    )
    .await;
    assert_eq!(comment.status, 201);

    let res = post(
        &state,
        &format!("/comments/{}/likes", id_of(&comment)),
        json!({"like": {"from_type": "Company", "from_id": fixture.client}}),
    )
    .await;
    assert_eq!(res.status, 201);
    assert_eq!(res.body_json()["likeable"]["type"], "Comment");
}

#[tokio::test]
async fn likes_require_a_write_scope() {
    let state = support::app().await;
    let fixture = reviewed(&state).await;
    let path = format!("/reviews/{}/likes", fixture.review);
    let body = json!({"like": {"from_type": "Company", "from_id": fixture.client}});

    let anonymous = call_as(&state, None, Method::Post, &path, Some(body.clone())).await;
    assert_eq!(anonymous.status, 401);

    let unknown = call_as(&state, Some("nope"), Method::Post, &path, Some(body.clone())).await;
    assert_eq!(unknown.status, 401);

    let reader = call_as(&state, Some(READ_TOKEN), Method::Post, &path, Some(body)).await;
    assert_eq!(reader.status, 403);

    let listing = call_as(&state, Some(READ_TOKEN), Method::Get, &path, None).await;
    assert_eq!(listing.status, 200);
}
