fn main() {
    if let Err(err) = column_typer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
