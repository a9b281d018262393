mod common;

use common::{Route, TestServer};
use propertifi::api::{
    endpoints, AgentRegistration, ApiError, LeadCriteria, LegacyLeadRequest, Preferences, QuestionAnswer,
};
use serde_json::json;

#[tokio::test]
async fn blog_detail_and_categories() {
    let server = TestServer::start(vec![
        Route::post(
            "blog/get",
            json!({
                "success": true,
                "blog": {
                    "id": 7,
                    "heading": "Screening tenants",
                    "slug": "screening-tenants",
                    "description": "<p>Start with income.</p>",
                    "featured": "1",
                    "banner": "https://cdn.example.com/b7.jpg"
                }
            }),
        ),
        Route::post(
            "blog-category/list",
            json!({
                "success": true,
                "blogCategories": [{"id": 1, "name": "Landlords"}, {"id": 2, "name": "Investors", "slug": "investors"}]
            }),
        ),
    ])
    .await;
    let client = server.client();

    let blog = endpoints::blog(&client, "screening-tenants").await.unwrap();
    assert_eq!(blog.id, 7);
    assert!(blog.featured);
    assert_eq!(blog.banner.as_deref(), Some("https://cdn.example.com/b7.jpg"));
    assert!(blog.blog_banner.is_none());
    assert_eq!(server.requests_to("/api/blog/get")[0].json(), json!({"slug": "screening-tenants"}));

    let categories = endpoints::blog_categories(&client).await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].slug, None);
    assert_eq!(categories[1].slug.as_deref(), Some("investors"));
}

#[tokio::test]
async fn testimonial_carries_neighbours() {
    let server = TestServer::start(vec![Route::post(
        "testimonial/get",
        json!({
            "success": true,
            "testimonial": {
                "id": 4,
                "heading": "Dana R.",
                "designation": "Owner, 3 units",
                "description": "Found a manager in a week.",
                "next_id": 5,
                "previous_id": 0
            }
        }),
    )])
    .await;

    let t = endpoints::testimonial(&server.client(), 4).await.unwrap();
    assert_eq!(t.heading, "Dana R.");
    assert_eq!(t.next_id, 5);
    assert_eq!(t.previous_id, 0);
    assert_eq!(server.requests_to("/api/testimonial/get")[0].json(), json!({"id": 4}));
}

#[tokio::test]
async fn missing_page_is_none() {
    let server = TestServer::start(vec![Route::post("page/get", json!({"success": true}))]).await;
    let page = endpoints::page(&server.client(), 3).await.unwrap();
    assert!(page.is_none());
}

#[tokio::test]
async fn agent_directory_listing_and_detail() {
    let server = TestServer::start(vec![
        Route::post(
            "agents/list",
            json!({
                "success": true,
                "cityName": "Denver",
                "stateName": "Colorado",
                "agents": {
                    "current_page": 1,
                    "last_page": 2,
                    "total": 11,
                    "data": [
                        {"user_id": 31, "company_name": "Mile High PM", "slug": "mile-high-pm", "featured": 1, "mobile": 3035550100u64},
                        {"user_id": 32, "company_name": "Front Range Homes", "slug": "front-range", "featured": null, "mobile": "303-555-0111"}
                    ]
                }
            }),
        ),
        Route::post(
            "agent/get",
            json!({
                "success": true,
                "cityName": "Denver",
                "stateName": "Colorado",
                "agent_data": {"user_id": 31, "company_name": "Mile High PM", "slug": "mile-high-pm", "email": "hi@milehigh.example"}
            }),
        ),
    ])
    .await;
    let client = server.client();

    let listing = endpoints::agents(&client, 1, "co", "denver").await.unwrap();
    assert_eq!(listing.city_name, "Denver");
    assert_eq!(listing.agents.total, 11);
    assert_eq!(listing.agents.last_page, 2);
    assert_eq!(listing.agents.data.len(), 2);
    assert_eq!(listing.agents.data[0].id, 31);
    assert!(listing.agents.data[0].featured);
    assert_eq!(listing.agents.data[0].mobile, "3035550100");
    assert!(!listing.agents.data[1].featured);
    assert_eq!(
        server.requests_to("/api/agents/list")[0].json(),
        json!({"cate_id": 1, "state": "co", "city": "denver"})
    );

    let detail = endpoints::agent(&client, "mile-high-pm", "co", "denver").await.unwrap();
    assert_eq!(detail.agent_data.company_name, "Mile High PM");
    assert_eq!(detail.agent_data.email.as_deref(), Some("hi@milehigh.example"));
    assert_eq!(server.requests_to("/api/agent/get")[0].json()["agent_id"], "mile-high-pm");
}

#[tokio::test]
async fn questions_then_legacy_lead() {
    let server = TestServer::start(vec![
        Route::post(
            "question/list",
            json!({
                "success": true,
                "questions": [
                    {
                        "id": 9,
                        "question_text": "Is the property occupied?",
                        "input_type": "radio",
                        "options": [{"value": "yes", "label": "Yes"}, {"value": "no", "label": "No"}],
                        "is_required": "1"
                    },
                    {"id": 10, "question_text": "Anything else?", "input_type": "textarea", "is_required": 0}
                ]
            }),
        ),
        Route::post("lead/save", json!({"success": true, "message": "Lead saved"})),
    ])
    .await;
    let client = server.client();

    let questions = endpoints::questions(&client, "Residential").await.unwrap();
    assert_eq!(questions.len(), 2);
    assert!(questions[0].is_required);
    assert_eq!(questions[0].options.as_ref().map(Vec::len), Some(2));
    assert!(!questions[1].is_required);
    assert!(questions[1].options.is_none());

    let lead = LegacyLeadRequest {
        property_category: 1,
        property_address: "1600 Blake St".into(),
        property_city: "Denver".into(),
        property_zip: "80202".into(),
        property_price: "450000".into(),
        full_name: "Riley Park".into(),
        email_address: "riley@example.com".into(),
        property_number: "3035550199".into(),
        exam: vec![QuestionAnswer {
            question_id: questions[0].id,
            answer: "yes".into(),
        }],
    };
    let ack = endpoints::save_lead(&client, &lead).await.unwrap();
    assert_eq!(ack.message.as_deref(), Some("Lead saved"));

    let body = server.requests_to("/api/lead/save")[0].json();
    assert_eq!(body["exam"], json!([{"question_id": 9, "answer": "yes"}]));
    assert_eq!(body["property_category"], 1);
}

#[tokio::test]
async fn agent_registration_rejected() {
    let server = TestServer::start(vec![Route::post(
        "agent/save",
        json!({"success": false, "message": "Email already registered"}),
    )])
    .await;

    let registration = AgentRegistration {
        company_name: "Ortiz PM".into(),
        email: "sam@ortizpm.com".into(),
        mobile: "5125550142".into(),
        country_code: "+1".into(),
        ..Default::default()
    };
    let err = endpoints::register_agent(&server.client(), &registration)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Rejected { ref message } if message == "Email already registered"));
    let requests = server.requests_to("/api/agent/save");
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].json(),
        json!({"company_name": "Ortiz PM", "email": "sam@ortizpm.com", "mobile": "5125550142", "country_code": "+1"})
    );
}

#[tokio::test]
async fn preferences_update_round_trip() {
    let server = TestServer::start(vec![Route::new(
        "PUT",
        "v1/preferences",
        200,
        json!({
            "success": true,
            "data": {
                "profile": {"name": "Sam Ortiz", "company_name": "Ortiz PM"},
                "leadCriteria": {"property_types": ["condo"], "zip_codes": ["78701"], "service_radius_miles": 25},
                "notifications": {"email_notifications": true, "sms_notifications": false}
            }
        }),
    )])
    .await;

    let prefs = Preferences {
        lead_criteria: LeadCriteria {
            property_types: vec!["condo".into()],
            zip_codes: vec!["78701".into()],
            service_radius_miles: Some(25),
            ..Default::default()
        },
        ..Default::default()
    };
    let saved = endpoints::update_preferences(&server.client(), &prefs).await.unwrap();
    assert_eq!(saved.profile.company_name, "Ortiz PM");
    assert_eq!(saved.lead_criteria.service_radius_miles, Some(25));
    assert!(saved.notifications.email_notifications);

    let req = &server.requests_to("/api/v1/preferences")[0];
    assert_eq!(req.method, "PUT");
    assert_eq!(req.json()["leadCriteria"]["zip_codes"], json!(["78701"]));
}
