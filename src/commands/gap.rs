use std::path::Path;

use corpscout::error::Result;
use corpscout::matching::{gap_from_texts, EventMatcher};

/// Gap analysis between saved AI events and a database export
pub fn gap(ai_path: &Path, db_path: &Path, threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(corpscout::error::Error::config("threshold must be between 0.0 and 1.0"));
    }

    let ai_text = std::fs::read_to_string(ai_path)?;
    let db_text = std::fs::read_to_string(db_path)?;

    let analysis = gap_from_texts(&EventMatcher::new(threshold), &ai_text, &db_text)?;

    println!("Gap analysis (threshold {threshold:.2})");
    println!("================================");
    println!("AI events: {}", analysis.total());
    println!("Already in database: {}", analysis.matched.len());
    println!("Missing: {}\n", analysis.missing.len());

    for matched in &analysis.matched {
        println!(
            "  = {} (db #{}, score {:.2})",
            matched.event.headline(),
            matched.db_index,
            matched.score
        );
    }
    for event in &analysis.missing {
        println!("  + {} ({})", event.headline(), event.display_date());
    }

    Ok(())
}
