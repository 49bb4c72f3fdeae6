use super::names::*;
use super::*;

fn table() -> RouteTable {
    RouteTable::library().unwrap()
}

// =============================================================================
// library routes
// =============================================================================

#[test]
fn library_route_names_are_unique() {
    let names: Vec<_> = table().names().collect();
    assert_eq!(
        names,
        vec![LANDING, MAIN, BOOK_DETAIL, SEARCH_RESULT, SIGN_UP, PROFILE_DETAIL, PROFILE_UPDATE]
    );
}

#[test]
fn public_routes_are_not_protected() {
    let table = table();
    assert!(!table.match_path("/").unwrap().requires_auth);
    assert!(!table.match_path("/signup").unwrap().requires_auth);
}

#[test]
fn main_routes_are_protected() {
    let table = table();
    for path in ["/main", "/main/books/3", "/main/dune", "/main/profile", "/main/profile/update"] {
        assert!(table.match_path(path).unwrap().requires_auth, "{path} should be protected");
    }
}

#[test]
fn profile_children_inherit_protection_and_views() {
    let m = table().match_path("/main/profile/update").unwrap();
    assert_eq!(m.name, Some(PROFILE_UPDATE));
    assert_eq!(m.views, vec![ViewId::Profile, ViewId::ProfileUpdate]);
    assert!(m.requires_auth);
}

#[test]
fn profile_root_renders_detail_child() {
    let m = table().match_path("/main/profile").unwrap();
    assert_eq!(m.name, Some(PROFILE_DETAIL));
    assert_eq!(m.view(), Some(ViewId::ProfileInfo));
}

// =============================================================================
// matching
// =============================================================================

#[test]
fn static_segment_beats_param() {
    let m = table().match_path("/main/profile").unwrap();
    assert_eq!(m.pattern, "/main/profile");
}

#[test]
fn param_route_captures_value() {
    let m = table().match_path("/main/books/42").unwrap();
    assert_eq!(m.name, Some(BOOK_DETAIL));
    assert_eq!(m.param("id"), Some("42"));
}

#[test]
fn search_route_captures_term() {
    let m = table().match_path("/main/dune").unwrap();
    assert_eq!(m.name, Some(SEARCH_RESULT));
    assert_eq!(m.param("search"), Some("dune"));
}

#[test]
fn trailing_slash_and_query_are_normalized() {
    let m = table().match_path("/main/books/7/?tab=reviews#top").unwrap();
    assert_eq!(m.path, "/main/books/7");
    assert_eq!(m.query.as_deref(), Some("tab=reviews"));
    assert_eq!(m.full_path(), "/main/books/7?tab=reviews");
}

#[test]
fn empty_query_is_dropped() {
    let m = table().match_path("/signup?").unwrap();
    assert_eq!(m.query, None);
}

#[test]
fn unknown_path_does_not_match() {
    assert!(table().match_path("/admin/users").is_none());
    assert!(table().match_path("/main/books/3/reviews").is_none());
}

#[test]
fn ties_go_to_declaration_order() {
    let table = RouteTable::new(vec![
        RouteEntry::new("/x/:a", ViewId::Main).named("first"),
        RouteEntry::new("/x/:b", ViewId::Main).named("second"),
    ])
    .unwrap();
    assert_eq!(table.match_path("/x/1").unwrap().name, Some("first"));
}

// =============================================================================
// reverse lookup
// =============================================================================

#[test]
fn resolve_named_fills_params() {
    assert_eq!(table().resolve_named(BOOK_DETAIL, &[("id", "3")]).unwrap(), "/main/books/3");
}

#[test]
fn resolve_named_root() {
    assert_eq!(table().resolve_named(LANDING, &[]).unwrap(), "/");
}

#[test]
fn resolve_named_child() {
    assert_eq!(table().resolve_named(PROFILE_UPDATE, &[]).unwrap(), "/main/profile/update");
}

#[test]
fn resolve_named_missing_param_errors() {
    let err = table().resolve_named(BOOK_DETAIL, &[]).unwrap_err();
    assert_eq!(err, RouterError::MissingParam { name: BOOK_DETAIL.into(), param: "id".into() });
}

#[test]
fn resolve_named_unknown_errors() {
    assert_eq!(table().resolve_named("nope", &[]).unwrap_err(), RouterError::UnknownName("nope".into()));
}

// =============================================================================
// construction
// =============================================================================

#[test]
fn duplicate_names_are_rejected() {
    let err = RouteTable::new(vec![
        RouteEntry::new("/a", ViewId::Main).named("dup"),
        RouteEntry::new("/b", ViewId::Main).named("dup"),
    ])
    .unwrap_err();
    assert_eq!(err, RouterError::DuplicateName("dup".into()));
}

#[test]
fn parent_without_empty_child_is_matchable() {
    let table = RouteTable::new(vec![
        RouteEntry::new("/shelf", ViewId::Main)
            .named("shelf")
            .with_children(vec![RouteEntry::new("edit", ViewId::ProfileUpdate).named("shelf_edit")]),
    ])
    .unwrap();
    assert_eq!(table.match_path("/shelf").unwrap().name, Some("shelf"));
    assert_eq!(table.match_path("/shelf/edit").unwrap().views, vec![ViewId::Main, ViewId::ProfileUpdate]);
}

#[test]
fn join_pattern_handles_absolute_child() {
    assert_eq!(join_pattern("/main", "/signup"), "/signup");
    assert_eq!(join_pattern("/main/profile", ""), "/main/profile");
    assert_eq!(join_pattern("/", "update"), "/update");
}

// =============================================================================
// param escaping
// =============================================================================

#[test]
fn search_term_with_slash_stays_a_search() {
    let table = table();
    let path = table.resolve_named(SEARCH_RESULT, &[("search", "books/7")]).unwrap();
    assert_eq!(path, "/main/books%2F7");

    let m = table.match_path(&path).unwrap();
    assert_eq!(m.name, Some(SEARCH_RESULT));
    assert_eq!(m.param("search"), Some("books/7"));
}

#[test]
fn search_term_with_question_mark_is_not_a_query() {
    let table = table();
    let path = table.resolve_named(SEARCH_RESULT, &[("search", "what?")]).unwrap();
    assert_eq!(path, "/main/what%3F");

    let m = table.match_path(&path).unwrap();
    assert_eq!(m.param("search"), Some("what?"));
    assert_eq!(m.query, None);
}

#[test]
fn non_ascii_search_term_round_trips() {
    let table = table();
    let path = table.resolve_named(SEARCH_RESULT, &[("search", "소설 #1")]).unwrap();
    assert!(path.is_ascii());

    let m = table.match_path(&path).unwrap();
    assert_eq!(m.name, Some(SEARCH_RESULT));
    assert_eq!(m.param("search"), Some("소설 #1"));
}

#[test]
fn escaped_params_are_decoded_on_match() {
    let m = table().match_path("/main/caf%C3%A9%20noir").unwrap();
    assert_eq!(m.param("search"), Some("café noir"));
    assert_eq!(m.path, "/main/caf%C3%A9%20noir");
}
