use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    pvai::cli::main()
}
