pub mod accounts;
pub mod home;
pub mod images;
pub mod notifications;
pub mod review;
pub mod select;
pub mod widgets;
