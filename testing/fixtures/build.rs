use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    querygen_build::build!("app", "schema.toml", "queries");

    Ok(())
}
