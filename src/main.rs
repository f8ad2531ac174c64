fn main() {
    if let Err(err) = our_club_login::app::run() {
        eprintln!("application startup failed: {err}");
        std::process::exit(1);
    }
}
