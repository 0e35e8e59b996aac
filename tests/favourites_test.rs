//! Integration tests for the favourites shelf

mod common;

use sea_orm::EntityTrait;
use uuid::Uuid;

use athenaeum::models;
use common::{
    create_approved_member, create_test_author, create_test_book, create_test_genre,
    create_test_user, seed_book, setup_test_state,
};

#[tokio::test]
async fn test_add_and_check_favourite() {
    let state = setup_test_state().await;
    let (_, member_id) = create_approved_member(state.db(), "Alice").await;
    let book_id = seed_book(state.db(), "Dune").await;
    let other_book = seed_book(state.db(), "Emma").await;

    // 1. Add one favourite
    let added = state
        .favourites
        .add(member_id, book_id)
        .await
        .expect("Failed to add favourite");
    assert!(added);

    // 2. The probe sees exactly that pair
    assert!(
        state
            .favourites
            .is_favourite(member_id, book_id)
            .await
            .expect("Failed to check favourite")
    );
    assert!(
        !state
            .favourites
            .is_favourite(member_id, other_book)
            .await
            .expect("Failed to check favourite")
    );
}

#[tokio::test]
async fn test_duplicate_add_reports_false() {
    let state = setup_test_state().await;
    let (_, member_id) = create_approved_member(state.db(), "Bob").await;
    let book_id = seed_book(state.db(), "Walden").await;

    assert!(
        state
            .favourites
            .add(member_id, book_id)
            .await
            .expect("Failed to add favourite")
    );
    let again = state
        .favourites
        .add(member_id, book_id)
        .await
        .expect("Failed to call add");
    assert!(!again);

    let shelf = state
        .favourites
        .list_favourite_books(member_id)
        .await
        .expect("Failed to list favourites");
    assert_eq!(shelf.len(), 1);
}

#[tokio::test]
async fn test_add_rejects_missing_and_deleted_books() {
    let state = setup_test_state().await;
    let (_, member_id) = create_approved_member(state.db(), "Carol").await;

    // 1. A book id that never existed
    let added = state
        .favourites
        .add(member_id, Uuid::new_v4())
        .await
        .expect("Failed to call add");
    assert!(!added);

    // 2. A soft-deleted book is treated the same way
    let admin_id = create_test_user(state.db(), "admin-carol", "admin").await;
    let author_id = create_test_author(state.db(), "Test Author").await;
    let genre_id = create_test_genre(state.db(), "Test Genre").await;
    let book_id = create_test_book(state.db(), "Gone", author_id, genre_id, admin_id).await;
    state
        .catalog
        .soft_delete(book_id, admin_id)
        .await
        .expect("Failed to soft-delete book");

    let added = state
        .favourites
        .add(member_id, book_id)
        .await
        .expect("Failed to call add");
    assert!(!added);
}

#[tokio::test]
async fn test_nil_ids_are_rejected() {
    let state = setup_test_state().await;
    let (_, member_id) = create_approved_member(state.db(), "Dave").await;
    let book_id = seed_book(state.db(), "Hamlet").await;

    assert!(
        !state
            .favourites
            .add(Uuid::nil(), book_id)
            .await
            .expect("Failed to call add")
    );
    assert!(
        !state
            .favourites
            .add(member_id, Uuid::nil())
            .await
            .expect("Failed to call add")
    );
}

#[tokio::test]
async fn test_remove_favourite() {
    let state = setup_test_state().await;
    let (_, member_id) = create_approved_member(state.db(), "Erin").await;
    let book_id = seed_book(state.db(), "Middlemarch").await;

    state
        .favourites
        .add(member_id, book_id)
        .await
        .expect("Failed to add favourite");

    // 1. Removing an existing favourite succeeds once
    let removed = state
        .favourites
        .remove(member_id, book_id)
        .await
        .expect("Failed to remove favourite");
    assert!(removed);
    assert!(
        !state
            .favourites
            .is_favourite(member_id, book_id)
            .await
            .expect("Failed to check favourite")
    );

    // 2. A second removal has nothing to do
    let removed = state
        .favourites
        .remove(member_id, book_id)
        .await
        .expect("Failed to call remove");
    assert!(!removed);
}

#[tokio::test]
async fn test_shelf_lists_newest_first() {
    let state = setup_test_state().await;
    let (_, member_id) = create_approved_member(state.db(), "Frank").await;
    let first = seed_book(state.db(), "First").await;
    let second = seed_book(state.db(), "Second").await;
    let third = seed_book(state.db(), "Third").await;

    for book_id in [first, second, third] {
        state
            .favourites
            .add(member_id, book_id)
            .await
            .expect("Failed to add favourite");
    }

    let shelf = state
        .favourites
        .list_favourite_books(member_id)
        .await
        .expect("Failed to list favourites");
    assert_eq!(shelf.len(), 3);
    assert_eq!(shelf[0].title, "Third");
    assert_eq!(shelf[1].title, "Second");
    assert_eq!(shelf[2].title, "First");
    assert_eq!(shelf[0].author_name, "Test Author");
    assert_eq!(shelf[0].genre_name, "Test Genre");
}

#[tokio::test]
async fn test_shelf_skips_soft_deleted_books() {
    let state = setup_test_state().await;
    let (_, member_id) = create_approved_member(state.db(), "Grace").await;

    let admin_id = create_test_user(state.db(), "admin-grace", "admin").await;
    let author_id = create_test_author(state.db(), "Test Author").await;
    let genre_id = create_test_genre(state.db(), "Test Genre").await;
    let keep = create_test_book(state.db(), "Keep", author_id, genre_id, admin_id).await;
    let drop = create_test_book(state.db(), "Drop", author_id, genre_id, admin_id).await;

    state
        .favourites
        .add(member_id, keep)
        .await
        .expect("Failed to add favourite");
    state
        .favourites
        .add(member_id, drop)
        .await
        .expect("Failed to add favourite");

    state
        .catalog
        .soft_delete(drop, admin_id)
        .await
        .expect("Failed to soft-delete book");

    // The shelf hides the soft-deleted book, though the entry remains
    let shelf = state
        .favourites
        .list_favourite_books(member_id)
        .await
        .expect("Failed to list favourites");
    assert_eq!(shelf.len(), 1);
    assert_eq!(shelf[0].title, "Keep");
    assert!(
        state
            .favourites
            .is_favourite(member_id, drop)
            .await
            .expect("Failed to check favourite")
    );
}

#[tokio::test]
async fn test_shelf_names_unknown_authors_and_genres() {
    let state = setup_test_state().await;
    let (_, member_id) = create_approved_member(state.db(), "Heidi").await;

    let admin_id = create_test_user(state.db(), "admin-heidi", "admin").await;
    let author_id = create_test_author(state.db(), "Herman Melville").await;
    let genre_id = create_test_genre(state.db(), "Adventure").await;
    let book_id = create_test_book(state.db(), "Moby-Dick", author_id, genre_id, admin_id).await;

    state
        .favourites
        .add(member_id, book_id)
        .await
        .expect("Failed to add favourite");

    // Books reference authors and genres loosely, so both can vanish
    assert!(
        state
            .catalog
            .delete_author(author_id)
            .await
            .expect("Failed to delete author")
    );
    assert!(
        state
            .catalog
            .delete_genre(genre_id)
            .await
            .expect("Failed to delete genre")
    );

    let shelf = state
        .favourites
        .list_favourite_books(member_id)
        .await
        .expect("Failed to list favourites");
    assert_eq!(shelf.len(), 1);
    assert_eq!(shelf[0].title, "Moby-Dick");
    assert_eq!(shelf[0].author_name, "Unknown Author");
    assert_eq!(shelf[0].genre_name, "Unknown Genre");
}

#[tokio::test]
async fn test_favourites_follow_deleted_rows() {
    let state = setup_test_state().await;
    let (_, member_id) = create_approved_member(state.db(), "Ivy").await;
    let book_id = seed_book(state.db(), "Dracula").await;

    state
        .favourites
        .add(member_id, book_id)
        .await
        .expect("Failed to add favourite");

    // Physically deleting the book cascades the favourite away
    models::book::Entity::delete_by_id(book_id)
        .exec(state.db())
        .await
        .expect("Failed to delete book");

    assert!(
        !state
            .favourites
            .is_favourite(member_id, book_id)
            .await
            .expect("Failed to check favourite")
    );
    let shelf = state
        .favourites
        .list_favourite_books(member_id)
        .await
        .expect("Failed to list favourites");
    assert!(shelf.is_empty());
}
