use anyhow::Result;

fn main() -> Result<()> {
    keys::logging::init();
    keys::cli::run()
}
