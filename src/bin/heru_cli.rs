use heru_core::{cli::run_cli, init, utils::build_info};

fn main() {
    init();
    tracing::debug!("{}", build_info::current().summary());

    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
