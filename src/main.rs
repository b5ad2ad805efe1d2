fn main() {
    if let Err(err) = circle_pack_renderer::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
