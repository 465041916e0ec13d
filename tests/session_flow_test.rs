//! Session and filter flow tests
//!
//! Exercises the controller's chat-session and marketplace-filter entry
//! points together with the view they produce.

mod helpers;

use std::sync::Arc;

use helpers::*;
use meditrip::models::{FilterState, FilterUpdate, GeoPoint, Message};
use meditrip::services::Catalog;
use meditrip::state::{NavigationIntent, Page};
use serde_json::json;

#[test]
fn test_first_user_message_sets_truncated_title() {
    let mut ctx = TestContext::new();
    let id = ctx.controller.current_session().id.clone();
    let content = "Looking for a second opinion on my MRI scans!";
    assert_eq!(content.chars().count(), 45);

    assert!(ctx.controller.update_session_messages(&id, vec![Message::user(content)]));

    let expected = format!("{}...", &content[..30]);
    assert_eq!(ctx.controller.current_session().title, expected);
    assert_eq!(ctx.persisted_sessions()[0].title, expected);
}

#[test]
fn test_short_first_message_is_used_verbatim() {
    let mut ctx = TestContext::new();
    let id = ctx.controller.current_session().id.clone();

    ctx.controller.update_session_messages(
        &id,
        vec![Message::assistant("Hello! How can I help?"), Message::user("Knee surgery cost")],
    );
    assert_eq!(ctx.controller.current_session().title, "Knee surgery cost");
}

#[test]
fn test_message_update_refreshes_timestamp() {
    let mut ctx = TestContext::new();
    let session = ctx.controller.current_session().clone();

    std::thread::sleep(std::time::Duration::from_millis(5));
    ctx.controller.update_session_messages(&session.id, vec![Message::assistant("Welcome")]);

    assert!(ctx.controller.current_session().updated_at > session.updated_at);
}

#[test]
fn test_filter_snapshot_isolation_between_sessions() {
    let mut ctx = TestContext::new();
    let session_a = ctx.controller.current_session().id.clone();
    let session_b = ctx.controller.create_session();

    ctx.controller.select_session(&session_a).unwrap();
    ctx.controller.apply_filters(FilterUpdate::query("mri"));
    assert_eq!(ctx.controller.page(), Page::Marketplace);

    ctx.controller.select_session(&session_b).unwrap();
    assert_eq!(ctx.controller.filters(), &FilterState::default());

    ctx.controller.select_session(&session_a).unwrap();
    assert_eq!(ctx.controller.filters(), &FilterState::with_query("mri"));
}

#[test]
fn test_selecting_session_with_filters_opens_marketplace() {
    let mut ctx = TestContext::new();
    let session_a = ctx.controller.current_session().id.clone();
    ctx.controller.apply_filters(FilterUpdate::query("ivf").with_field("country", "Thailand"));
    ctx.controller.create_session();

    ctx.controller.navigate(NavigationIntent::NavigateToDoctors).unwrap();
    ctx.controller.select_session(&session_a).unwrap();

    assert_eq!(ctx.controller.page(), Page::Marketplace);
    assert_eq!(ctx.controller.filters().extra["country"], json!("Thailand"));
    assert_eq!(ctx.address_bar(), "/");
}

#[test]
fn test_selecting_session_without_filters_off_marketplace_keeps_filters() {
    let mut ctx = TestContext::new();
    ctx.controller.apply_filters(FilterUpdate::query("lasik"));
    let plain = ctx.controller.create_session();
    ctx.controller.navigate(NavigationIntent::NavigateToPackages).unwrap();

    ctx.controller.select_session(&plain).unwrap();

    assert_eq!(ctx.controller.page(), Page::Packages);
    assert_eq!(ctx.controller.filters().search_query, "lasik");
}

#[test]
fn test_apply_filters_renames_session_from_list_name() {
    let mut ctx = TestContext::at("/doctors");
    let merged = ctx
        .controller
        .apply_filters(FilterUpdate::query("cardiac").with_list_name("Cardiac Centres in Penang"));

    assert_eq!(merged.search_query, "cardiac");
    assert_eq!(ctx.controller.current_session().title, "Cardiac Centres in Penang");
    assert_eq!(ctx.controller.page(), Page::Marketplace);
    assert_eq!(ctx.address_bar(), "/");

    let snapshot = ctx.persisted_sessions()[0].last_active_filters.clone().unwrap();
    assert_eq!(snapshot.ai_list_name.as_deref(), Some("Cardiac Centres in Penang"));
}

#[test]
fn test_partial_filters_merge_shallowly() {
    let mut ctx = TestContext::new();
    ctx.controller.apply_filters(FilterUpdate::query("dental").with_field("budget", json!({"max": 3000})));
    ctx.controller.apply_filters(FilterUpdate::default().with_field("country", "Malaysia"));

    let filters = ctx.controller.filters();
    assert_eq!(filters.search_query, "dental");
    assert_eq!(filters.extra["budget"], json!({"max": 3000}));
    assert_eq!(filters.extra["country"], json!("Malaysia"));
}

#[test]
fn test_clear_filters_keeps_session() {
    let mut ctx = TestContext::new();
    ctx.controller.apply_filters(FilterUpdate::query("hair transplant"));
    let sessions_before = ctx.controller.sessions().len();

    ctx.controller.clear_filters();

    assert_eq!(ctx.controller.filters(), &FilterState::default());
    assert!(ctx.controller.current_session().last_active_filters.is_none());
    assert_eq!(ctx.controller.sessions().len(), sessions_before);
    assert!(ctx.persisted_sessions()[0].last_active_filters.is_none());
}

#[test]
fn test_quick_search_starts_session_and_opens_chat() {
    let mut ctx = TestContext::at("/packages");
    let previous = ctx.controller.current_session().id.clone();
    let kl = GeoPoint { lat: 3.139, lng: 101.6869 };

    let id = ctx
        .controller
        .quick_search("  rhinoplasty   in Seoul ", Some("Jakarta".to_string()), Some(kl));

    assert_ne!(id, previous);
    assert_eq!(ctx.controller.current_session().id, id);
    assert!(ctx.controller.chat_open());
    assert_eq!(ctx.controller.page(), Page::Marketplace);
    assert_eq!(ctx.controller.filters().user_origin.as_deref(), Some("Jakarta"));
    assert_eq!(ctx.controller.filters().user_location, Some(kl));
    assert_eq!(ctx.controller.take_initial_query().as_deref(), Some("rhinoplasty in Seoul"));
    assert_eq!(ctx.controller.take_initial_query(), None);
}

#[test]
fn test_quick_search_stays_on_hospital_page() {
    let mut ctx = TestContext::new();
    let hospital = Arc::clone(&ctx.controller.catalog().list_hospitals()[0]);
    ctx.controller.navigate(NavigationIntent::NavigateToHospital(hospital)).unwrap();
    let path = ctx.address_bar();

    ctx.controller.quick_search("oncology second opinion", None, None);

    assert_eq!(ctx.controller.page(), Page::HospitalPage);
    assert_eq!(ctx.address_bar(), path);
    assert!(ctx.controller.chat_open());
}

#[test]
fn test_quick_search_without_origin_keeps_existing_origin() {
    let mut ctx = TestContext::new();
    ctx.controller.quick_search("ivf", Some("Manila".to_string()), None);
    ctx.controller.quick_search("egg freezing", None, None);

    assert_eq!(ctx.controller.filters().user_origin.as_deref(), Some("Manila"));
}

#[test]
fn test_initial_query_withheld_once_conversation_started() {
    let mut ctx = TestContext::new();
    let id = ctx.controller.quick_search("gastric sleeve", None, None);
    ctx.controller.update_session_messages(&id, vec![Message::user("gastric sleeve")]);

    assert_eq!(ctx.controller.take_initial_query(), None);
}

#[test]
fn test_session_retention_bound() {
    let mut ctx = TestContext::new_with_config(TestConfig {
        max_sessions: 3,
        ..TestConfig::default()
    });

    let mut created = Vec::new();
    for _ in 0..5 {
        created.push(ctx.controller.create_session());
        std::thread::sleep(std::time::Duration::from_millis(2));
    }

    let kept: Vec<String> = ctx.controller.sessions().sessions().iter().map(|s| s.id.clone()).collect();
    assert_eq!(kept.len(), 3);
    assert_eq!(kept[0], created[4]);
    assert_eq!(ctx.persisted_sessions().len(), 3);
}

#[test]
fn test_view_snapshot_reflects_state() {
    let mut ctx = TestContext::at("/hospitals/gleneagles-penang/facilities/mri-3t-suite");
    ctx.controller.set_chat_open(true);
    let view = ctx.controller.view();

    assert_eq!(view.page, Page::FacilityDetails);
    assert_eq!(view.context.facility_name.as_deref(), Some("MRI (3T) Suite"));
    assert_eq!(view.breadcrumbs.len(), 5);
    assert_eq!(view.breadcrumbs[2].path, "/hospitals/gleneagles-penang");
    assert!(view.chat_open);
    assert_eq!(view.current_session_title, "New Conversation");
}
