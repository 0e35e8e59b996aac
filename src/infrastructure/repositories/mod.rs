//! Repository implementations using SeaORM

pub mod author_repository;
pub mod book_repository;
pub mod borrow_repository;
pub mod favourite_repository;
pub mod genre_repository;
pub mod member_repository;
pub mod review_repository;
pub mod user_repository;

pub use author_repository::SeaOrmAuthorRepository;
pub use book_repository::SeaOrmBookRepository;
pub use borrow_repository::SeaOrmBorrowingRepository;
pub use favourite_repository::SeaOrmFavouriteRepository;
pub use genre_repository::SeaOrmGenreRepository;
pub use member_repository::SeaOrmMemberRepository;
pub use review_repository::SeaOrmReviewRepository;
pub use user_repository::SeaOrmUserRepository;
