//! End-to-end tests through the HTTP router

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`
use uuid::Uuid;

use athenaeum::auth::create_jwt;
use athenaeum::server;
use common::{create_approved_member, create_test_user, seed_book, setup_test_db};

fn bearer(user_id: Uuid, role: &str) -> String {
    format!(
        "Bearer {}",
        create_jwt(user_id, role).expect("Failed to create token")
    )
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&body).expect("Body should be JSON")
}

#[tokio::test]
async fn test_health_check() {
    let db = setup_test_db().await;
    let app = server::build_router(db);

    let req = Request::builder()
        .uri("/api/health")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "athenaeum");
}

#[tokio::test]
async fn test_missing_or_malformed_tokens_are_rejected() {
    let db = setup_test_db().await;
    let app = server::build_router(db);

    // 1. No Authorization header
    let req = Request::builder()
        .uri("/api/membership/me")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // 2. Wrong scheme
    let req = Request::builder()
        .uri("/api/membership/me")
        .method("GET")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // 3. Garbage token
    let req = Request::builder()
        .uri("/api/membership/me")
        .method("GET")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_reject_plain_users() {
    let db = setup_test_db().await;
    let user_id = create_test_user(&db, "plain-user", "user").await;
    let app = server::build_router(db);
    let token = bearer(user_id, "user");

    // 1. Membership roster
    let req = Request::builder()
        .uri("/api/membership")
        .method("GET")
        .header(header::AUTHORIZATION, &token)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // 2. Moderation queue
    let req = Request::builder()
        .uri("/api/reviews/pending")
        .method("GET")
        .header(header::AUTHORIZATION, &token)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // 3. Book creation
    let payload = serde_json::json!({
        "title": "Nope",
        "author_id": Uuid::new_v4(),
        "genre_id": Uuid::new_v4()
    });
    let req = Request::builder()
        .uri("/api/books")
        .method("POST")
        .header(header::AUTHORIZATION, &token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_membership_application_flow() {
    let db = setup_test_db().await;
    let user_id = create_test_user(&db, "alice", "user").await;
    let admin_id = create_test_user(&db, "admin", "admin").await;
    let app = server::build_router(db);
    let user_auth = bearer(user_id, "user");
    let admin_auth = bearer(admin_id, "admin");

    // 1. A token for an unknown identity cannot apply
    let payload = serde_json::json!({ "name": "Ghost" });
    let req = Request::builder()
        .uri("/api/membership/apply")
        .method("POST")
        .header(header::AUTHORIZATION, bearer(Uuid::new_v4(), "user"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // 2. Alice applies
    let payload = serde_json::json!({ "name": "Alice", "reason": "Love books" });
    let req = Request::builder()
        .uri("/api/membership/apply")
        .method("POST")
        .header(header::AUTHORIZATION, &user_auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["member"]["status"], "pending");
    let member_id = body["member"]["id"].as_str().expect("Member id").to_string();

    // 3. The application shows up in the admin's pending queue
    let req = Request::builder()
        .uri("/api/membership?status=pending")
        .method("GET")
        .header(header::AUTHORIZATION, &admin_auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["members"][0]["name"], "Alice");

    // 4. The admin approves it
    let payload = serde_json::json!({ "status": "approved" });
    let req = Request::builder()
        .uri(format!("/api/membership/{}/status", member_id))
        .method("PUT")
        .header(header::AUTHORIZATION, &admin_auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 5. Alice sees her approved membership
    let req = Request::builder()
        .uri("/api/membership/me")
        .method("GET")
        .header(header::AUTHORIZATION, &user_auth)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["member"]["status"], "approved");
}

#[tokio::test]
async fn test_borrowing_flow() {
    let db = setup_test_db().await;
    let (user_id, _) = create_approved_member(&db, "Alice").await;
    let book_x = seed_book(&db, "Dune").await;
    let book_y = seed_book(&db, "Emma").await;
    let app = server::build_router(db);
    let auth = bearer(user_id, "user");

    // 1. Borrow the first book
    let req = Request::builder()
        .uri(format!("/api/books/{}/borrow", book_x))
        .method("POST")
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Book borrowed successfully");

    // 2. A second loan is refused while the first is open
    let req = Request::builder()
        .uri(format!("/api/books/{}/borrow", book_y))
        .method("POST")
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // 3. Return the first book
    let req = Request::builder()
        .uri(format!("/api/books/{}/return", book_x))
        .method("PUT")
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 4. Now the second borrow goes through
    let req = Request::builder()
        .uri(format!("/api/books/{}/borrow", book_y))
        .method("POST")
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 5. The history lists both loans, newest first
    let req = Request::builder()
        .uri("/api/borrowing/history")
        .method("GET")
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["history"][0]["book_title"], "Emma");
    assert!(body["history"][0]["returned_at"].is_null());
    assert_eq!(body["history"][1]["book_title"], "Dune");
    assert!(!body["history"][1]["returned_at"].is_null());
}

#[tokio::test]
async fn test_borrowing_requires_approved_membership() {
    let db = setup_test_db().await;
    let user_id = create_test_user(&db, "no-member", "user").await;
    let book_id = seed_book(&db, "Walden").await;
    let app = server::build_router(db);

    let req = Request::builder()
        .uri(format!("/api/books/{}/borrow", book_id))
        .method("POST")
        .header(header::AUTHORIZATION, bearer(user_id, "user"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_review_moderation_flow() {
    let db = setup_test_db().await;
    let (user_id, _) = create_approved_member(&db, "Mina").await;
    let admin_id = create_test_user(&db, "admin", "admin").await;
    let book_id = seed_book(&db, "Dracula").await;
    let app = server::build_router(db);
    let user_auth = bearer(user_id, "user");
    let admin_auth = bearer(admin_id, "admin");

    // 1. Submit a review
    let payload = serde_json::json!({ "rating": 4, "content": "Good" });
    let req = Request::builder()
        .uri(format!("/api/books/{}/reviews", book_id))
        .method("POST")
        .header(header::AUTHORIZATION, &user_auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // 2. Not public while pending
    let req = Request::builder()
        .uri(format!("/api/books/{}/reviews", book_id))
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total_items"], 0);
    assert_eq!(body["average_rating"], 0.0);

    // 3. The moderation queue names the book and the member
    let req = Request::builder()
        .uri("/api/reviews/pending")
        .method("GET")
        .header(header::AUTHORIZATION, &admin_auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["reviews"][0]["book_title"], "Dracula");
    assert_eq!(body["reviews"][0]["member_name"], "Mina");
    let review_id = body["reviews"][0]["id"].as_str().expect("Review id").to_string();

    // 4. The admin rejects it
    let req = Request::builder()
        .uri(format!("/api/reviews/{}", review_id))
        .method("DELETE")
        .header(header::AUTHORIZATION, &admin_auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Review rejected");

    // 5. The member's review is gone
    let req = Request::builder()
        .uri(format!("/api/books/{}/reviews/mine", book_id))
        .method("GET")
        .header(header::AUTHORIZATION, &user_auth)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_approval_publishes() {
    let db = setup_test_db().await;
    let (user_id, _) = create_approved_member(&db, "Jonathan").await;
    let admin_id = create_test_user(&db, "admin", "admin").await;
    let book_id = seed_book(&db, "Dracula").await;
    let app = server::build_router(db);
    let user_auth = bearer(user_id, "user");
    let admin_auth = bearer(admin_id, "admin");

    // 1. Submit and approve
    let payload = serde_json::json!({ "rating": 5, "content": "Superb" });
    let req = Request::builder()
        .uri(format!("/api/books/{}/reviews", book_id))
        .method("POST")
        .header(header::AUTHORIZATION, &user_auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let req = Request::builder()
        .uri("/api/reviews/pending")
        .method("GET")
        .header(header::AUTHORIZATION, &admin_auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let body = read_json(response).await;
    let review_id = body["reviews"][0]["id"].as_str().expect("Review id").to_string();

    let req = Request::builder()
        .uri(format!("/api/reviews/{}/approve", review_id))
        .method("PUT")
        .header(header::AUTHORIZATION, &admin_auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 2. The review is now public, with the reviewer's name
    let req = Request::builder()
        .uri(format!("/api/books/{}/reviews", book_id))
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total_items"], 1);
    assert_eq!(body["reviews"][0]["member_name"], "Jonathan");
    assert_eq!(body["reviews"][0]["rating"], 5);
    assert_eq!(body["average_rating"], 5.0);

    // 3. A duplicate submission is rejected
    let payload = serde_json::json!({ "rating": 3 });
    let req = Request::builder()
        .uri(format!("/api/books/{}/reviews", book_id))
        .method("POST")
        .header(header::AUTHORIZATION, &user_auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_out_of_range_rating_is_rejected() {
    let db = setup_test_db().await;
    let (user_id, _) = create_approved_member(&db, "Lucy").await;
    let book_id = seed_book(&db, "Carmilla").await;
    let app = server::build_router(db);

    let payload = serde_json::json!({ "rating": 6 });
    let req = Request::builder()
        .uri(format!("/api/books/{}/reviews", book_id))
        .method("POST")
        .header(header::AUTHORIZATION, bearer(user_id, "user"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Invalid review or already reviewed");
}

#[tokio::test]
async fn test_favourites_flow() {
    let db = setup_test_db().await;
    let (user_id, _) = create_approved_member(&db, "Alice").await;
    let book_id = seed_book(&db, "Middlemarch").await;
    let app = server::build_router(db);
    let auth = bearer(user_id, "user");

    // 1. Add the book to favourites
    let req = Request::builder()
        .uri(format!("/api/books/{}/favourite", book_id))
        .method("POST")
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // 2. The probe and the shelf agree
    let req = Request::builder()
        .uri(format!("/api/books/{}/favourite", book_id))
        .method("GET")
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let body = read_json(response).await;
    assert_eq!(body["favourite"], true);

    let req = Request::builder()
        .uri("/api/favourites")
        .method("GET")
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["favourites"][0]["title"], "Middlemarch");

    // 3. Remove it; a second removal has nothing to delete
    let req = Request::builder()
        .uri(format!("/api/books/{}/favourite", book_id))
        .method("DELETE")
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let req = Request::builder()
        .uri(format!("/api/books/{}/favourite", book_id))
        .method("DELETE")
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_queries_validate() {
    let db = setup_test_db().await;
    let app = server::build_router(db);

    // 1. Page numbers start at 1
    let req = Request::builder()
        .uri("/api/books?page=0")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // 2. Unknown book ids are a 404
    let req = Request::builder()
        .uri(format!("/api/books/{}", Uuid::new_v4()))
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Book not found");
}

#[tokio::test]
async fn test_book_management_flow() {
    let db = setup_test_db().await;
    let admin_id = create_test_user(&db, "admin", "admin").await;
    let app = server::build_router(db);
    let auth = bearer(admin_id, "admin");

    // 1. Create an author and a genre
    let payload = serde_json::json!({ "name": "Frank Herbert" });
    let req = Request::builder()
        .uri("/api/authors")
        .method("POST")
        .header(header::AUTHORIZATION, &auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    let author_id = body["author"]["id"].as_str().expect("Author id").to_string();

    let payload = serde_json::json!({ "name": "Science Fiction" });
    let req = Request::builder()
        .uri("/api/genres")
        .method("POST")
        .header(header::AUTHORIZATION, &auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    let genre_id = body["genre"]["id"].as_str().expect("Genre id").to_string();

    // 2. Create a book
    let payload = serde_json::json!({
        "title": "Dune",
        "description": "Desert planet",
        "author_id": author_id,
        "genre_id": genre_id
    });
    let req = Request::builder()
        .uri("/api/books")
        .method("POST")
        .header(header::AUTHORIZATION, &auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    let book_id = body["book"]["id"].as_str().expect("Book id").to_string();

    // 3. It is browsable, with names resolved
    let req = Request::builder()
        .uri("/api/books")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total_items"], 1);
    assert_eq!(body["books"][0]["author_name"], "Frank Herbert");
    assert_eq!(body["books"][0]["genre_name"], "Science Fiction");

    // 4. Rename it
    let payload = serde_json::json!({ "title": "Dune (1965)" });
    let req = Request::builder()
        .uri(format!("/api/books/{}", book_id))
        .method("PUT")
        .header(header::AUTHORIZATION, &auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["book"]["title"], "Dune (1965)");

    // 5. Delete it; the public catalog forgets it, the creator's view keeps it
    let req = Request::builder()
        .uri(format!("/api/books/{}", book_id))
        .method("DELETE")
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let req = Request::builder()
        .uri("/api/books")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let body = read_json(response).await;
    assert_eq!(body["total_items"], 0);

    let req = Request::builder()
        .uri("/api/books/mine")
        .method("GET")
        .header(header::AUTHORIZATION, &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["books"][0]["is_deleted"], true);
}
