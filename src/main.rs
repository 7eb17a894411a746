fn main() {
    if let Err(err) = memo_picker::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
