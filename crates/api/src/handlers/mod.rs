pub mod auth;
pub mod dashboard;
pub mod profile;
pub mod qr;
pub mod student;
pub mod teacher;
