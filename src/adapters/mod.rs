pub mod api;
pub mod club_debug_file;
pub mod club_http;
