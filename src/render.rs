//! Text rendering of the daily checklist.

use chrono::{DateTime, Utc};

use crate::clock::Calendar;
use crate::completion;
use crate::models::Plant;

const WATERED: char = '●';
const THIRSTY: char = '○';
const BAR_WIDTH: usize = 20;

/// Render today's checklist.
///
/// Example output:
/// ```text
/// My Plants 🌱
/// 1 of your plants feel loved today ✨
/// [██████████··········] 50%
/// ├── ● Pothos (in Bedroom · Full Sun · 20-50 ml)
/// └── ○ Monstera (in Living Room · Partial Sun · 100-200 ml)
/// ```
pub fn render_today<C>(plants: &[Plant], now: DateTime<Utc>, calendar: &C) -> String
where
    C: Calendar + ?Sized,
{
    let mut output = String::from("My Plants 🌱\n");

    if plants.is_empty() {
        output.push_str("Start your plant journey!\n");
        return output;
    }

    if completion::is_all_done(plants, now, calendar) {
        output.push_str("All Done! 🎉\nAll Reminders Completed\n");
        return output;
    }

    output.push_str(&completion::status(plants, now, calendar).to_string());
    output.push('\n');
    output.push_str(&progress_bar(completion::progress_fraction(plants, now, calendar)));
    output.push('\n');

    for (i, plant) in plants.iter().enumerate() {
        let branch = if i == plants.len() - 1 { "└── " } else { "├── " };
        let symbol = if plant.is_watered_today(now, calendar) { WATERED } else { THIRSTY };
        output.push_str(branch);
        output.push(symbol);
        output.push(' ');
        output.push_str(&plant_line(plant));
        output.push('\n');
    }
    output
}

/// One-line description of a plant's care settings.
pub fn plant_line(plant: &Plant) -> String {
    format!(
        "{} (in {} · {} · {})",
        plant.name,
        plant.room.title(),
        plant.light.title(),
        plant.water.title()
    )
}

/// `fraction` is clamped to `[0, 1]`.
pub fn progress_bar(fraction: f64) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {}%",
        "█".repeat(filled),
        "·".repeat(BAR_WIDTH - filled),
        (fraction * 100.0).round() as u32
    )
}
