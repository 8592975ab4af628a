pub mod chat;
pub mod class;
pub mod contact;
pub mod exercise;
pub mod grade;
pub mod notification;
pub mod progress;
pub mod school;
pub mod subject;
pub mod user;
