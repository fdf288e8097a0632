pub mod backend;
pub mod frontend;


fn main() {
    env_logger::init();

    frontend::cli::cli();
}
