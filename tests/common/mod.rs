#![allow(dead_code)]

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

use athenaeum::db;
use athenaeum::infrastructure::AppState;
use athenaeum::models;

// Helper to create a test database
pub async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

// Helper to create a test app state over a fresh in-memory database
pub async fn setup_test_state() -> AppState {
    AppState::new(setup_test_db().await)
}

pub async fn create_test_user(db: &DatabaseConnection, username: &str, role: &str) -> Uuid {
    let id = Uuid::new_v4();
    let user = models::user::ActiveModel {
        id: Set(id),
        username: Set(username.to_string()),
        role: Set(role.to_string()),
        created_at: Set(Utc::now()),
    };
    user.insert(db).await.expect("Failed to create user");
    id
}

pub async fn create_test_member(
    db: &DatabaseConnection,
    user_id: Uuid,
    name: &str,
    status: &str,
) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let member = models::member::ActiveModel {
        id: Set(id),
        user_id: Set(user_id),
        name: Set(name.to_string()),
        reason: Set(None),
        status: Set(status.to_string()),
        joined_at: Set(now),
        updated_at: Set(now),
    };
    member.insert(db).await.expect("Failed to create member");
    id
}

// User plus approved member in one step; returns (user_id, member_id)
pub async fn create_approved_member(db: &DatabaseConnection, name: &str) -> (Uuid, Uuid) {
    let user_id = create_test_user(db, &format!("{}-{}", name, Uuid::new_v4()), "user").await;
    let member_id = create_test_member(db, user_id, name, "approved").await;
    (user_id, member_id)
}

pub async fn create_test_author(db: &DatabaseConnection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    let author = models::author::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        created_at: Set(Utc::now()),
    };
    author.insert(db).await.expect("Failed to create author");
    id
}

pub async fn create_test_genre(db: &DatabaseConnection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    let genre = models::genre::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        created_at: Set(Utc::now()),
    };
    genre.insert(db).await.expect("Failed to create genre");
    id
}

pub async fn create_test_book(
    db: &DatabaseConnection,
    title: &str,
    author_id: Uuid,
    genre_id: Uuid,
    created_by: Uuid,
) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let book = models::book::ActiveModel {
        id: Set(id),
        title: Set(title.to_string()),
        description: Set(Some("Test description".to_string())),
        author_id: Set(author_id),
        genre_id: Set(genre_id),
        published_date: Set(None),
        image_url: Set(None),
        created_by: Set(created_by),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };
    book.insert(db).await.expect("Failed to create book");
    id
}

// Author, genre and a fresh admin creator seeded in one step; returns the book id
pub async fn seed_book(db: &DatabaseConnection, title: &str) -> Uuid {
    let admin_id = create_test_user(db, &format!("admin-{}", Uuid::new_v4()), "admin").await;
    let author_id = create_test_author(db, "Test Author").await;
    let genre_id = create_test_genre(db, "Test Genre").await;
    create_test_book(db, title, author_id, genre_id, admin_id).await
}
