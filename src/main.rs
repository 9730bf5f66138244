// src/main.rs
use log::LevelFilter;
use rust_rnn_textgen::runtime_interface;

fn main() {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Info)
        .parse_env(env_logger::Env::default().filter_or("RNN_TEXTGEN_LOG", "info"))
        .init();

    if let Err(e) = runtime_interface::run_cli() {
        eprintln!("Application error: {}", e);
        let mut current_err: Option<&(dyn std::error::Error + 'static)> = e.source();
        while let Some(source) = current_err {
            eprintln!("Caused by: {}", source);
            current_err = source.source();
        }
        std::process::exit(1);
    }
}
