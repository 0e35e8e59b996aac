pub mod author;
pub mod book;
pub mod borrow_record;
pub mod favourite;
pub mod genre;
pub mod member;
pub mod review;
pub mod user;
