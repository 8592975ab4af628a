pub mod chat;
pub mod chat_message;
pub mod class;
pub mod contact;
pub mod exercise;
pub mod grade;
pub mod notification;
pub mod notification_read;
pub mod school;
pub mod student_progress;
pub mod subject;
pub mod teacher_subject;
pub mod user;
