pub mod credentials;
pub mod login_page;
pub mod sensor;
pub mod visit;
pub mod visit_window;
