//! Response bodies validated against the JSON schemas of their serializers.

mod support;

use revu_api::serializers::{
    AgencyJson, AspectCountJson, AspectJson, CommentJson, CompanyJson, GrantJson, IndustryJson, LikeJson,
    OfferingJson, ReviewJson,
};
use revu_api::Method;
use schemars::{JsonSchema, schema_for};
use serde_json::{Value, json};
use support::{call, get, id_of, post, reviewed};

fn validate_against_schema(schema: &Value, instance: &Value) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator.iter_errors(instance).map(|e| format!("{e}")).collect()
}

fn assert_matches<T: JsonSchema>(instance: &Value) {
    let schema = serde_json::to_value(schema_for!(T)).unwrap();
    let errors = validate_against_schema(&schema, instance);
    assert!(
        errors.is_empty(),
        "{} does not match its schema: {errors:?}\n{instance:#}",
        std::any::type_name::<T>()
    );
}

#[tokio::test]
async fn member_responses_match_schemas() {
    let state = support::app().await;
    let fixture = reviewed(&state).await;

    let grant = post(&state, "/grants", json!({"grant": {"name": "Productivity Solutions Grant", "acronym": "PSG"}})).await;
    assert_matches::<GrantJson>(&grant.body_json());

    let review = post(
        &state,
        &format!("/services/{}/reviews", fixture.service),
        json!({"review": {
            "score": 0,
            "vendor_id": fixture.vendor,
            "from_type": "Company",
            "from_id": fixture.client,
            "grant_id": id_of(&grant),
            "aspects": [{"name": "Quality"}],
        }}),
    )
    .await;
    assert_eq!(review.status, 201);
    assert_matches::<ReviewJson>(&review.body_json());
    let review = id_of(&review);

    let comment = post(
        &state,
        &format!("/reviews/{review}/comments"),
        json!({"comment": {"from_type": "Company", "from_id": fixture.vendor, "content": "Noted"}}),
    )
    .await;
    assert_matches::<CommentJson>(&comment.body_json());

    let like = post(
        &state,
        &format!("/reviews/{review}/likes"),
        json!({"like": {"from_type": "Company", "from_id": fixture.vendor}}),
    )
    .await;
    assert_matches::<LikeJson>(&like.body_json());

    let aspect = get(&state, &format!("/reviews/{review}/aspects")).await.body_json();
    assert_matches::<AspectJson>(&aspect[0]);

    assert_matches::<CompanyJson>(&get(&state, &format!("/companies/{}", fixture.vendor)).await.body_json());
    assert_matches::<OfferingJson>(&get(&state, &format!("/services/{}", fixture.service)).await.body_json());
}

#[tokio::test]
async fn collection_responses_match_schemas() {
    let state = support::app().await;
    let fixture = reviewed(&state).await;

    assert_matches::<Vec<CompanyJson>>(&get(&state, "/companies").await.body_json());
    assert_matches::<Vec<ReviewJson>>(
        &get(&state, &format!("/companies/{}/reviews", fixture.vendor)).await.body_json(),
    );
    assert_matches::<Vec<OfferingJson>>(
        &get(&state, &format!("/companies/{}/offerings", fixture.vendor)).await.body_json(),
    );
    assert_matches::<Vec<AspectCountJson>>(
        &get(&state, &format!("/companies/{}/aspects?count=true", fixture.vendor)).await.body_json(),
    );
    assert_matches::<Vec<CompanyJson>>(
        &get(&state, &format!("/companies/{}/clients", fixture.vendor)).await.body_json(),
    );
}

#[tokio::test]
async fn industry_and_agency_responses_match_schemas() {
    let state = support::app().await;
    let fixture = reviewed(&state).await;

    let industry = post(&state, "/industries", json!({"industry": {"name": "Logistics"}})).await;
    assert_matches::<IndustryJson>(&industry.body_json());
    let linked = call(
        &state,
        Method::Put,
        &format!("/companies/{}/industries/{}", fixture.client, id_of(&industry)),
        None,
    )
    .await;
    assert_matches::<Vec<IndustryJson>>(&linked.body_json());
    assert_matches::<Vec<IndustryJson>>(
        &get(&state, &format!("/companies/{}/client_industries", fixture.vendor)).await.body_json(),
    );

    let agency = post(&state, "/agencies", json!({"agency": {"name": "Enterprise Singapore", "acronym": "ESG"}})).await;
    assert_matches::<AgencyJson>(&agency.body_json());
    assert_matches::<Vec<AgencyJson>>(&get(&state, "/agencies").await.body_json());
}
