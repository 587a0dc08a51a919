use anyhow::Result;

use heartcards::{cards::CardKind, window};

fn main() -> Result<()> {
    pretty_env_logger::init();

    pollster::block_on(window::run(CardKind::RotatingHeart))?;

    Ok(())
}
