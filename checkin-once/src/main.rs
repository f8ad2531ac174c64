fn main() {
    if let Err(err) = our_club_login::app::run_once() {
        eprintln!("check-in refresh failed: {err}");
        std::process::exit(1);
    }
}
