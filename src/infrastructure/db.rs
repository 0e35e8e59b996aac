//! Database bootstrap
//!
//! Connects and applies the idempotent schema. There is no migration
//! framework; every statement is safe to re-run.

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    create_schema(&db).await?;

    Ok(db)
}

async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Users are provisioned by the external identity service; this
    // application only reads them.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BLOB PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            role TEXT NOT NULL DEFAULT 'user',
            created_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // One member per identity, enforced here rather than in service code
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id BLOB PRIMARY KEY,
            user_id BLOB NOT NULL UNIQUE,
            name TEXT NOT NULL,
            reason TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            joined_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS genres (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // author_id/genre_id are deliberately loose references (no FK):
    // deleting an author or genre leaves the book in place and read
    // paths substitute placeholder names.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id BLOB PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            author_id BLOB NOT NULL,
            genre_id BLOB NOT NULL,
            published_date TEXT,
            image_url TEXT,
            created_by BLOB NOT NULL,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_books_created_by ON books(created_by)".to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_books_is_deleted ON books(is_deleted)".to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS borrow_records (
            id BLOB PRIMARY KEY,
            book_id BLOB NOT NULL,
            member_id BLOB NOT NULL,
            borrowed_at TEXT NOT NULL,
            returned_at TEXT
        )
        "#
        .to_owned(),
    ))
    .await?;

    // The loan invariants: at most one active record per book and per
    // member. Partial unique indexes close the check-then-insert race.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_borrow_active_book
        ON borrow_records(book_id) WHERE returned_at IS NULL
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_borrow_active_member
        ON borrow_records(member_id) WHERE returned_at IS NULL
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_borrow_records_member_id ON borrow_records(member_id)"
            .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id BLOB PRIMARY KEY,
            book_id BLOB NOT NULL,
            member_id BLOB NOT NULL,
            rating INTEGER NOT NULL,
            content TEXT,
            is_approved INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            UNIQUE (member_id, book_id)
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_reviews_book_id ON reviews(book_id)".to_owned(),
    ))
    .await?;

    // The only real foreign keys in the schema: favourites follow their
    // member and book rows out of existence.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS favourites (
            member_id BLOB NOT NULL,
            book_id BLOB NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (member_id, book_id),
            FOREIGN KEY (member_id) REFERENCES members(id) ON DELETE CASCADE,
            FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    Ok(())
}
