//! Application state containing services and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{
    AuthorRepository, BookRepository, BorrowingRepository, FavouriteRepository, GenreRepository,
    MemberRepository, ReviewRepository, UserRepository,
};
use crate::infrastructure::repositories::{
    SeaOrmAuthorRepository, SeaOrmBookRepository, SeaOrmBorrowingRepository,
    SeaOrmFavouriteRepository, SeaOrmGenreRepository, SeaOrmMemberRepository,
    SeaOrmReviewRepository, SeaOrmUserRepository,
};
use crate::services::{
    BorrowingService, CatalogService, FavouritesService, MembershipService, ReviewService,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection
    db: DatabaseConnection,
    /// Membership applications and status management
    pub membership: Arc<MembershipService>,
    /// Book catalog, authors and genres
    pub catalog: Arc<CatalogService>,
    /// Borrowing and returns
    pub borrowing: Arc<BorrowingService>,
    /// Review submission and moderation
    pub reviews: Arc<ReviewService>,
    /// Favourite books per member
    pub favourites: Arc<FavouritesService>,
}

impl AppState {
    /// Create a new AppState with all repositories and services initialized
    pub fn new(db: DatabaseConnection) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(SeaOrmUserRepository::new(db.clone()));
        let members: Arc<dyn MemberRepository> = Arc::new(SeaOrmMemberRepository::new(db.clone()));
        let authors: Arc<dyn AuthorRepository> = Arc::new(SeaOrmAuthorRepository::new(db.clone()));
        let genres: Arc<dyn GenreRepository> = Arc::new(SeaOrmGenreRepository::new(db.clone()));
        let books: Arc<dyn BookRepository> = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let borrows: Arc<dyn BorrowingRepository> =
            Arc::new(SeaOrmBorrowingRepository::new(db.clone()));
        let reviews: Arc<dyn ReviewRepository> = Arc::new(SeaOrmReviewRepository::new(db.clone()));
        let favourites: Arc<dyn FavouriteRepository> =
            Arc::new(SeaOrmFavouriteRepository::new(db.clone()));

        let membership = Arc::new(MembershipService::new(members.clone(), users));
        let catalog = Arc::new(CatalogService::new(
            books.clone(),
            authors.clone(),
            genres.clone(),
        ));
        let borrowing = Arc::new(BorrowingService::new(
            borrows,
            books.clone(),
            members.clone(),
        ));
        let review_service = Arc::new(ReviewService::new(reviews, books.clone(), members));
        let favourite_service = Arc::new(FavouritesService::new(favourites, books, authors, genres));

        Self {
            db,
            membership,
            catalog,
            borrowing,
            reviews: review_service,
            favourites: favourite_service,
        }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
